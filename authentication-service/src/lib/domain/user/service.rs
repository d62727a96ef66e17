use std::sync::Arc;

use async_trait::async_trait;
use auth::Role;
use auth::SignedToken;
use auth::TokenIssuer;

use crate::domain::user::models::LoginCommand;
use crate::domain::user::models::NewUser;
use crate::domain::user::models::PlainPassword;
use crate::domain::user::models::RegisterUserCommand;
use crate::domain::user::models::User;
use crate::user::errors::UserError;
use crate::user::ports::CredentialHasher;
use crate::user::ports::UserRepository;
use crate::user::ports::UserServicePort;

/// Verified against when the identifier is unknown, so both login failure
/// paths pay for one password verification.
const TIMING_DUMMY_PASSWORD: &str = "timing-equalisation-dummy";

/// Domain service implementation for registration and login.
///
/// Concrete implementation of UserServicePort with dependency injection.
pub struct UserService<UR, PH>
where
    UR: UserRepository,
    PH: CredentialHasher,
{
    repository: Arc<UR>,
    hasher: Arc<PH>,
    token_issuer: Arc<TokenIssuer>,
    dummy_hash: String,
}

impl<UR, PH> UserService<UR, PH>
where
    UR: UserRepository,
    PH: CredentialHasher,
{
    /// Create a new user service with injected dependencies.
    ///
    /// Hashes the timing-equalisation dummy up front, so an unknown
    /// identifier costs exactly one verification from the first login on.
    ///
    /// # Arguments
    /// * `repository` - Credential store implementation
    /// * `hasher` - Password hashing implementation
    /// * `token_issuer` - Signs tokens for successful logins
    ///
    /// # Returns
    /// Configured user service instance
    ///
    /// # Errors
    /// * `Password` - The dummy hash could not be produced
    pub async fn new(
        repository: Arc<UR>,
        hasher: Arc<PH>,
        token_issuer: Arc<TokenIssuer>,
    ) -> Result<Self, UserError> {
        let dummy = PlainPassword::new(TIMING_DUMMY_PASSWORD.to_string())?;
        let dummy_hash = hasher.hash(&dummy).await?;

        Ok(Self {
            repository,
            hasher,
            token_issuer,
            dummy_hash,
        })
    }

    async fn burn_verification(&self, password: &PlainPassword) {
        let _ = self.hasher.verify(password, &self.dummy_hash).await;
    }
}

#[async_trait]
impl<UR, PH> UserServicePort for UserService<UR, PH>
where
    UR: UserRepository,
    PH: CredentialHasher,
{
    async fn register(&self, command: RegisterUserCommand) -> Result<User, UserError> {
        // Cheap existence check to skip hashing for obvious duplicates; the insert below
        // is still the authority on uniqueness.
        if self
            .repository
            .exists(&command.username, &command.email)
            .await?
        {
            tracing::info!(username = %command.username, "Registration rejected: duplicate credential");
            return Err(UserError::DuplicateCredential);
        }

        let password_hash = self.hasher.hash(&command.password).await?;

        let user = self
            .repository
            .create(NewUser {
                username: command.username,
                email: command.email,
                password_hash,
                role: Role::default(),
            })
            .await?;

        tracing::info!(user_id = %user.id, username = %user.username, "User registered");

        Ok(user)
    }

    async fn login(&self, command: LoginCommand) -> Result<SignedToken, UserError> {
        let identifier = command.identifier.trim();

        let user = match self.repository.find_by_username_or_email(identifier).await? {
            Some(user) => user,
            None => {
                self.burn_verification(&command.password).await;
                tracing::info!(reason = "unknown identifier", "Login failed");
                return Err(UserError::InvalidCredentials);
            }
        };

        match self
            .hasher
            .verify(&command.password, &user.password_hash)
            .await
        {
            Ok(true) => {}
            Ok(false) => {
                tracing::info!(user_id = %user.id, reason = "password mismatch", "Login failed");
                return Err(UserError::InvalidCredentials);
            }
            Err(e) => {
                tracing::error!(user_id = %user.id, error = %e, "Stored password hash is unusable");
                return Err(UserError::InvalidCredentials);
            }
        }

        let token = self.token_issuer.issue(user.id, user.role)?;

        tracing::info!(
            user_id = %user.id,
            role = %user.role,
            expires_in = token.expires_in,
            "Token issued"
        );

        Ok(token)
    }
}
