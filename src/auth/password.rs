use crate::common::PASSWORD_LEN;

/// Rotating XOR salt
const SALT: [u8; 8] = [0x55, 0x2A, 0x11, 0xC3, 0x7E, 0x90, 0x04, 0xD1];

/// Obfuscates a password into a fixed 32-byte block.
///
/// The plaintext is zero-padded (or cut) to 32 bytes and XOR-ed with a rotating salt.
/// This hides passwords from casual inspection of the user file; it is not a hash.
pub fn obfuscate(plain: &str) -> [u8; PASSWORD_LEN] {
    let bytes = plain.as_bytes();
    let mut out = [0u8; PASSWORD_LEN];
    for (i, slot) in out.iter_mut().enumerate() {
        let p = bytes.get(i).copied().unwrap_or(0);
        *slot = p ^ SALT[i % SALT.len()];
    }
    out
}

/// Checks a candidate password against an obfuscated block.
pub fn verify(obfuscated: &[u8; PASSWORD_LEN], candidate: &str) -> bool {
    let expected = obfuscate(candidate);
    // Compare every byte regardless of where the first mismatch is
    obfuscated
        .iter()
        .zip(expected.iter())
        .fold(0u8, |diff, (a, b)| diff | (a ^ b))
        == 0
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_obfuscate_is_deterministic() {
        assert_eq!(obfuscate("admin123"), obfuscate("admin123"));
        assert_ne!(obfuscate("admin123"), obfuscate("admin124"));
    }

    #[test]
    fn test_empty_password_is_the_salt() {
        let block = obfuscate("");
        assert_eq!(&block[..8], &SALT);
        assert_eq!(&block[8..16], &SALT);
    }

    #[test]
    fn test_verify() {
        let block = obfuscate("teacher123");
        assert!(verify(&block, "teacher123"));
        assert!(!verify(&block, "teacher12"));
        assert!(!verify(&block, "Teacher123"));
        assert!(!verify(&block, ""));
    }
}
