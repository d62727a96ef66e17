use serde::Deserialize;
use serde::Serialize;

use crate::role::Role;

/// Identity claims carried by every issued token.
///
/// All fields are required; a token lacking any of them (or carrying a role
/// outside the closed set) fails verification as malformed. The key
/// identifier travels in the token header, not here.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
pub struct Claims {
    /// Subject (decimal user identifier)
    pub sub: String,

    /// Authorization level of the subject
    pub role: Role,

    /// Issued at (Unix timestamp)
    pub iat: i64,

    /// Expiration time (Unix timestamp)
    pub exp: i64,

    /// Issuer
    pub iss: String,
}

impl Claims {
    /// Create claims for a user with a fixed lifetime.
    ///
    /// # Arguments
    /// * `subject` - User identifier
    /// * `role` - Role of the user
    /// * `issuer` - Issuer identity (base URL of the authority)
    /// * `issued_at` - Unix timestamp of issuance
    /// * `lifetime_seconds` - Seconds until expiry
    ///
    /// # Returns
    /// Claims with `exp = iat + lifetime`, or None when the addition overflows
    pub fn for_user(
        subject: impl ToString,
        role: Role,
        issuer: impl ToString,
        issued_at: i64,
        lifetime_seconds: i64,
    ) -> Option<Self> {
        let exp = issued_at.checked_add(lifetime_seconds)?;
        Some(Self {
            sub: subject.to_string(),
            role,
            iat: issued_at,
            exp,
            iss: issuer.to_string(),
        })
    }

    /// Seconds between issuance and expiry.
    pub fn lifetime(&self) -> i64 {
        self.exp - self.iat
    }

    /// Check if token is expired.
    ///
    /// A token stops being valid at the instant `exp` is reached.
    pub fn is_expired(&self, current_timestamp: i64) -> bool {
        current_timestamp >= self.exp
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_for_user() {
        let claims = Claims::for_user(42, Role::User, "http://auth", 1_000, 3600).unwrap();

        assert_eq!(claims.sub, "42");
        assert_eq!(claims.role, Role::User);
        assert_eq!(claims.iss, "http://auth");
        assert_eq!(claims.iat, 1_000);
        assert_eq!(claims.exp, 4_600);
        assert_eq!(claims.lifetime(), 3600);
    }

    #[test]
    fn test_for_user_overflow() {
        assert!(Claims::for_user(1, Role::User, "iss", i64::MAX, 1).is_none());
    }

    #[test]
    fn test_is_expired() {
        let claims = Claims::for_user(1, Role::User, "iss", 0, 1000).unwrap();

        assert!(!claims.is_expired(999)); // Not expired
        assert!(claims.is_expired(1000)); // Exactly at expiration
        assert!(claims.is_expired(1001)); // Expired
    }

    #[test]
    fn test_wire_shape() {
        let claims = Claims::for_user(7, Role::Admin, "iss", 10, 5).unwrap();
        let json = serde_json::to_value(&claims).unwrap();

        assert_eq!(
            json,
            serde_json::json!({
                "sub": "7",
                "role": "admin",
                "iat": 10,
                "exp": 15,
                "iss": "iss"
            })
        );
    }

    #[test]
    fn test_missing_claim_rejected() {
        let result = serde_json::from_value::<Claims>(serde_json::json!({
            "sub": "7",
            "iat": 10,
            "exp": 15,
            "iss": "iss"
        }));
        assert!(result.is_err());
    }
}
