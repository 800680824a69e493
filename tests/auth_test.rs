//! Integration tests for login against the user store

use registrar::auth::{authenticate, obfuscate, verify, Session};
use registrar::bootstrap::initialize_if_empty;
use registrar::common::{Role, StoreConfig};
use registrar::record::User;
use registrar::repository::Registry;
use registrar::RegistrarError;
use tempfile::TempDir;

fn seeded_registry() -> (Registry, TempDir) {
    let dir = TempDir::new().unwrap();
    let registry = Registry::open(StoreConfig::new(dir.path())).unwrap();
    initialize_if_empty(&registry).unwrap();
    (registry, dir)
}

#[test]
fn test_demo_logins() {
    let (registry, _dir) = seeded_registry();

    let admin = authenticate(registry.users(), "admin", "admin123")
        .unwrap()
        .unwrap();
    assert_eq!(admin.role, Role::Admin);
    assert_eq!(admin.ref_id, "");

    let session = Session::login(registry.users(), "rezwan", "teacher123")
        .unwrap()
        .unwrap();
    assert_eq!(session.role(), Role::Faculty);
    assert_eq!(session.ref_id(), Some("FAC-EEE-001"));

    let session = Session::login(registry.users(), "sabbir", "student123")
        .unwrap()
        .unwrap();
    assert_eq!(session.role(), Role::Student);
    let profile = registry.student_profile(session.ref_id().unwrap()).unwrap();
    assert_eq!(profile.name, "Sabbir Ahmed");
}

#[test]
fn test_rejected_logins() {
    let (registry, _dir) = seeded_registry();

    assert!(authenticate(registry.users(), "admin", "wrong")
        .unwrap()
        .is_none());
    assert!(authenticate(registry.users(), "nobody", "admin123")
        .unwrap()
        .is_none());
    assert!(Session::login(registry.users(), "", "")
        .unwrap()
        .is_none());
}

#[test]
fn test_password_is_not_stored_in_plaintext() {
    let (registry, _dir) = seeded_registry();
    let raw = std::fs::read(registry.users().file().path()).unwrap();
    let needle = b"admin123";
    assert!(!raw.windows(needle.len()).any(|w| w == needle));

    let admin = registry.users().get("admin").unwrap();
    assert_eq!(admin.password, obfuscate("admin123"));
    assert!(verify(&admin.password, "admin123"));
}

#[test]
fn test_duplicate_username_rejected() {
    let (registry, _dir) = seeded_registry();
    let result = registry.add_user(&User::new("admin", Role::Student, "S1", "pw"));
    assert!(matches!(result, Err(RegistrarError::DuplicateKey { .. })));
    assert_eq!(registry.users().count().unwrap(), 5);
}
