use async_trait::async_trait;
use auth::SignedToken;

use crate::domain::user::models::EmailAddress;
use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PlainPassword;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::domain::user::models::Username;
use crate::user::errors::UserError;

/// Port for registration and login.
#[async_trait]
pub trait UserServicePort: Send + Sync + 'static {
    /// Register a new user.
    ///
    /// Hashes the password before anything is persisted; exactly one durable
    /// write happens on success and none on failure.
    ///
    /// # Arguments
    /// * `command` - Validated command containing username, email, and password
    ///
    /// # Returns
    /// Created user entity
    ///
    /// # Errors
    /// * `DuplicateCredential` - Username or email is already taken
    /// * `StoreUnavailable` - Credential store unreachable or timed out
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError>;

    /// Verify credentials and issue a signed token.
    ///
    /// # Arguments
    /// * `command` - Username-or-email identifier and plaintext password
    ///
    /// # Returns
    /// Signed token with its lifetime
    ///
    /// # Errors
    /// * `InvalidCredentials` - Unknown identifier or wrong password (indistinguishable)
    /// * `StoreUnavailable` - Credential store unreachable or timed out
    /// * `Token` - Token issuance failed
    async fn login(&self, command: LoginCommand) -> Result<SignedToken, UserError>;
}

/// Persistence operations for user records.
///
/// Uniqueness of username and email (case-insensitive) is enforced by the
/// store itself, in the same write that inserts the record.
#[async_trait]
pub trait UserRepository: Send + Sync + 'static {
    /// Persist a new user to storage.
    ///
    /// # Arguments
    /// * `user` - User record to insert
    ///
    /// # Returns
    /// Created user entity with assigned id and timestamps
    ///
    /// # Errors
    /// * `DuplicateCredential` - Username or email is already taken
    /// * `StoreUnavailable` - Store unreachable or timed out
    /// * `DatabaseError` - Database operation failed
    async fn create(&self, user: NewUser) -> Result<User, UserError>;

    /// Retrieve user whose username or email matches the identifier.
    ///
    /// # Arguments
    /// * `identifier` - Username or email, compared case-insensitively
    ///
    /// # Returns
    /// Optional user entity (None if not found)
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store unreachable or timed out
    /// * `DatabaseError` - Database operation failed
    async fn find_by_username_or_email(&self, identifier: &str)
        -> Result<Option<User>, UserError>;

    /// Check whether the username or the email is already taken.
    ///
    /// Advisory only; `create` remains the authority on uniqueness.
    ///
    /// # Errors
    /// * `StoreUnavailable` - Store unreachable or timed out
    /// * `DatabaseError` - Database operation failed
    async fn exists(&self, username: &Username, email: &EmailAddress) -> Result<bool, UserError>;
}

/// One-way password hashing, isolated from request handling.
#[async_trait]
pub trait CredentialHasher: Send + Sync + 'static {
    /// Hash a plaintext password.
    ///
    /// # Errors
    /// * `Password` - Hashing failed
    async fn hash(&self, password: &PlainPassword) -> Result<String, UserError>;

    /// Verify a plaintext password against a stored hash.
    ///
    /// # Errors
    /// * `Password` - Stored hash is unusable
    async fn verify(&self, password: &PlainPassword, hash: &str) -> Result<bool, UserError>;
}
