use std::fmt;

/// Record index inside a store file (0 = oldest record)
pub type RecordIndex = u64;

/// The kinds of entity persisted by the registrar, one store file each.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum EntityKind {
    Student,
    Faculty,
    Course,
    Enrollment,
    User,
}

impl fmt::Display for EntityKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let name = match self {
            EntityKind::Student => "Student",
            EntityKind::Faculty => "Faculty",
            EntityKind::Course => "Course",
            EntityKind::Enrollment => "Enrollment",
            EntityKind::User => "User",
        };
        f.write_str(name)
    }
}

/// Login role. The discriminants are the on-disk role codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Role {
    Admin = 1,
    Faculty = 2,
    Student = 3,
}

impl Role {
    pub fn code(&self) -> i32 {
        *self as i32
    }

    pub fn from_code(code: i32) -> Option<Self> {
        match code {
            1 => Some(Role::Admin),
            2 => Some(Role::Faculty),
            3 => Some(Role::Student),
            _ => None,
        }
    }
}

impl fmt::Display for Role {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Role::Admin => write!(f, "admin"),
            Role::Faculty => write!(f, "faculty"),
            Role::Student => write!(f, "student"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_role_codes() {
        assert_eq!(Role::Admin.code(), 1);
        assert_eq!(Role::Faculty.code(), 2);
        assert_eq!(Role::Student.code(), 3);
        assert_eq!(Role::from_code(2), Some(Role::Faculty));
        assert_eq!(Role::from_code(0), None);
        assert_eq!(Role::from_code(4), None);
    }
}
