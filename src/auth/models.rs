use serde::{Deserialize, Serialize};

/// The caller identity derived from a verified bearer token.
///
/// Every API route requires one; handlers receive it through the extractor
/// in [`crate::auth::middleware`].
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct AuthenticatedUser {
    /// Unique user identifier (the `_id` of the user's profile document).
    pub user_id: String,
    /// The user's display handle.
    pub user_name: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_serialization_roundtrip() {
        let user = AuthenticatedUser {
            user_id: "uid-123".to_string(),
            user_name: "alice".to_string(),
        };
        let json = serde_json::to_string(&user).unwrap();
        let deserialized: AuthenticatedUser = serde_json::from_str(&json).unwrap();
        assert_eq!(deserialized.user_id, "uid-123");
        assert_eq!(deserialized.user_name, "alice");
    }
}
