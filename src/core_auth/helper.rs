use bcrypt::{hash, verify, BcryptError, DEFAULT_COST};

/// Hashes a password for storage in the `[users]` table.
pub fn hash_password(password: &str) -> Result<String, BcryptError> {
    hash(password, DEFAULT_COST)
}

/// Stored values with a bcrypt prefix are hashes, anything else is plain text.
pub fn is_bcrypt_hash(stored: &str) -> bool {
    ["$2a$", "$2b$", "$2y$"]
        .iter()
        .any(|prefix| stored.starts_with(prefix))
}

pub fn verify_password(password: &str, stored: &str) -> bool {
    if is_bcrypt_hash(stored) {
        verify(password, stored).unwrap_or(false)
    } else {
        password == stored
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn plain_passwords_compare_exactly() {
        assert!(verify_password("topsecret", "topsecret"));
        assert!(!verify_password("TopSecret", "topsecret"));
        assert!(!verify_password("", "topsecret"));
    }

    #[test]
    fn bcrypt_hashes_are_verified() {
        // Low cost keeps the test fast; verification reads the cost from the hash.
        let hashed = hash("hidden", 4).unwrap();
        assert!(is_bcrypt_hash(&hashed));
        assert!(verify_password("hidden", &hashed));
        assert!(!verify_password("nope", &hashed));
    }
}
