use bytes::BytesMut;

use super::codec::{get_i32, get_str, put_i32, put_str, FixedRecord};
use crate::common::{EntityKind, Result, DEPT_SLOT, EMAIL_SLOT, ID_SLOT, NAME_SLOT};

/// A student record.
///
/// ```text
/// +--------+----------+------------+-----------+-----------+
/// | id(16) | name(64) | dept(32)   | batch(i32)| email(64) |
/// +--------+----------+------------+-----------+-----------+
/// ```
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Student {
    pub id: String,
    pub name: String,
    pub department: String,
    /// Intake code, e.g. 241
    pub batch: i32,
    pub email: String,
}

impl Student {
    pub fn new(
        id: impl Into<String>,
        name: impl Into<String>,
        department: impl Into<String>,
        batch: i32,
        email: impl Into<String>,
    ) -> Self {
        Self {
            id: id.into(),
            name: name.into(),
            department: department.into(),
            batch,
            email: email.into(),
        }
    }
}

impl FixedRecord for Student {
    const ENTITY: EntityKind = EntityKind::Student;
    const ENCODED_LEN: usize = ID_SLOT + NAME_SLOT + DEPT_SLOT + 4 + EMAIL_SLOT;

    fn encode_into(&self, buf: &mut BytesMut) {
        put_str(buf, &self.id, ID_SLOT);
        put_str(buf, &self.name, NAME_SLOT);
        put_str(buf, &self.department, DEPT_SLOT);
        put_i32(buf, self.batch);
        put_str(buf, &self.email, EMAIL_SLOT);
    }

    fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        Ok(Self {
            id: get_str(buf, ID_SLOT),
            name: get_str(buf, NAME_SLOT),
            department: get_str(buf, DEPT_SLOT),
            batch: get_i32(buf),
            email: get_str(buf, EMAIL_SLOT),
        })
    }
}
