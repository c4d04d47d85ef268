//! Account record and capability projection.

/// Role assigned to every self-registered account.
pub const DEFAULT_ROLE: &str = "user";

/// A persisted account.
///
/// `username` and `email` are each globally unique. `password_hash` holds a
/// one-way bcrypt hash; plaintext never survives signup. The four status
/// flags default to `true` and are only changed through administrative
/// operations.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct User {
    pub id: i64,
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
    pub account_non_expired: bool,
    pub account_non_locked: bool,
    pub credentials_non_expired: bool,
    pub enabled: bool,
}

impl User {
    /// Authority labels consumed by the authorization layer.
    pub fn authorities(&self) -> Vec<String> {
        vec![format!("ROLE_{}", self.role)]
    }

    /// Whether every account-status flag still permits authentication.
    pub fn is_active(&self) -> bool {
        self.enabled
            && self.account_non_expired
            && self.account_non_locked
            && self.credentials_non_expired
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_user() -> User {
        User {
            id: 1,
            username: "alice".to_string(),
            email: "a@x.com".to_string(),
            password_hash: "$2b$12$hash".to_string(),
            role: DEFAULT_ROLE.to_string(),
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            enabled: true,
        }
    }

    #[test]
    fn authorities_prefix_the_role() {
        assert_eq!(sample_user().authorities(), vec!["ROLE_user".to_string()]);
    }

    #[test]
    fn any_cleared_flag_deactivates_the_account() {
        assert!(sample_user().is_active());

        let mut locked = sample_user();
        locked.account_non_locked = false;
        assert!(!locked.is_active());

        let mut disabled = sample_user();
        disabled.enabled = false;
        assert!(!disabled.is_active());
    }
}
