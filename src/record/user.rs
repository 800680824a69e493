use bytes::{Buf, BufMut, BytesMut};

use super::codec::{corrupt, get_i32, get_str, put_i32, put_str, FixedRecord};
use crate::auth::obfuscate;
use crate::common::{EntityKind, Result, Role, ID_SLOT, PASSWORD_LEN, USERNAME_SLOT};

/// A login account: username(32) | role(i32) | ref_id(16) | password(32)
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub username: String,
    pub role: Role,
    /// Student or faculty id this account belongs to; empty for admins
    pub ref_id: String,
    /// Obfuscated password block
    pub password: [u8; PASSWORD_LEN],
}

impl User {
    /// Creates an account, obfuscating the plaintext password.
    pub fn new(
        username: impl Into<String>,
        role: Role,
        ref_id: impl Into<String>,
        password: &str,
    ) -> Self {
        Self {
            username: username.into(),
            role,
            ref_id: ref_id.into(),
            password: obfuscate(password),
        }
    }
}

impl FixedRecord for User {
    const ENTITY: EntityKind = EntityKind::User;
    const ENCODED_LEN: usize = USERNAME_SLOT + 4 + ID_SLOT + PASSWORD_LEN;

    fn encode_into(&self, buf: &mut BytesMut) {
        put_str(buf, &self.username, USERNAME_SLOT);
        put_i32(buf, self.role.code());
        put_str(buf, &self.ref_id, ID_SLOT);
        buf.put_slice(&self.password);
    }

    fn decode_from(buf: &mut &[u8]) -> Result<Self> {
        let username = get_str(buf, USERNAME_SLOT);
        let code = get_i32(buf);
        let role = Role::from_code(code).ok_or_else(|| {
            corrupt(
                EntityKind::User,
                format!("unknown role code {code} for '{username}'"),
            )
        })?;
        let ref_id = get_str(buf, ID_SLOT);
        let mut password = [0u8; PASSWORD_LEN];
        buf.copy_to_slice(&mut password);
        Ok(Self {
            username,
            role,
            ref_id,
            password,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::common::RegistrarError;

    #[test]
    fn test_user_layout() {
        assert_eq!(User::ENCODED_LEN, 84);

        let user = User::new("rezwan", Role::Faculty, "FAC-EEE-001", "teacher123");
        let bytes = user.encode();
        assert_eq!(&bytes[32..36], &2i32.to_le_bytes());
        assert_eq!(User::decode(&bytes).unwrap(), user);
    }

    #[test]
    fn test_unknown_role_is_corrupt() {
        let mut bytes = User::new("admin", Role::Admin, "", "pw").encode().to_vec();
        bytes[32..36].copy_from_slice(&9i32.to_le_bytes());
        assert!(matches!(
            User::decode(&bytes),
            Err(RegistrarError::CorruptRecord { .. })
        ));
    }
}
