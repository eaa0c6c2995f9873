use crate::core_auth::helper::verify_password;
use std::collections::HashMap;

/// Static username -> password table, keyed by lowercased username.
#[derive(Debug, Clone, Default)]
pub struct Credentials {
    users: HashMap<String, String>,
}

impl Credentials {
    pub fn new(users: &HashMap<String, String>) -> Self {
        Self {
            users: users
                .iter()
                .map(|(name, password)| (name.to_lowercase(), password.clone()))
                .collect(),
        }
    }

    pub fn len(&self) -> usize {
        self.users.len()
    }

    pub fn is_empty(&self) -> bool {
        self.users.is_empty()
    }

    /// `username` must already be lowercased.
    pub fn has_user(&self, username: &str) -> bool {
        self.users.contains_key(username)
    }

    pub fn check(&self, username: &str, password: &str) -> bool {
        self.users
            .get(username)
            .map(|stored| verify_password(password, stored))
            .unwrap_or(false)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn table() -> Credentials {
        let mut users = HashMap::new();
        users.insert("CwYark".to_string(), "topsecret".to_string());
        users.insert("karl".to_string(), "hidden".to_string());
        Credentials::new(&users)
    }

    #[test]
    fn usernames_are_case_insensitive() {
        let creds = table();
        assert_eq!(creds.len(), 2);
        assert!(creds.has_user("cwyark"));
        assert!(!creds.has_user("CwYark"));
        assert!(!creds.has_user("nobody"));
    }

    #[test]
    fn password_check() {
        let creds = table();
        assert!(creds.check("karl", "hidden"));
        assert!(!creds.check("karl", "topsecret"));
        assert!(!creds.check("nobody", "hidden"));
    }
}
