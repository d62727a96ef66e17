use std::sync::Arc;

use async_trait::async_trait;
use auth::PasswordHasher;
use tokio::sync::Semaphore;

use crate::domain::user::models::PlainPassword;
use crate::domain::user::ports::CredentialHasher;
use crate::user::errors::UserError;

/// Argon2id hashing on the blocking thread pool.
///
/// Each hash or verification takes a permit from a bounded pool before it is
/// moved to `spawn_blocking`, so a burst of logins queues here instead of
/// occupying every CPU while async request workers keep running.
pub struct BlockingPasswordHasher {
    hasher: Arc<PasswordHasher>,
    permits: Arc<Semaphore>,
}

impl BlockingPasswordHasher {
    /// Create a hashing pool.
    ///
    /// # Arguments
    /// * `hasher` - Configured Argon2id hasher
    /// * `max_concurrent` - Maximum hashes running at once
    pub fn new(hasher: PasswordHasher, max_concurrent: usize) -> Self {
        Self {
            hasher: Arc::new(hasher),
            permits: Arc::new(Semaphore::new(max_concurrent.max(1))),
        }
    }

    async fn run<T, F>(&self, job: F) -> Result<T, UserError>
    where
        T: Send + 'static,
        F: FnOnce(&PasswordHasher) -> Result<T, auth::PasswordError> + Send + 'static,
    {
        let permit = Arc::clone(&self.permits)
            .acquire_owned()
            .await
            .map_err(|e| UserError::Unknown(format!("Hashing pool closed: {}", e)))?;

        let hasher = Arc::clone(&self.hasher);
        tokio::task::spawn_blocking(move || {
            let _permit = permit;
            job(&hasher)
        })
        .await
        .map_err(|e| UserError::Unknown(format!("Hashing task failed: {}", e)))?
        .map_err(UserError::from)
    }
}

#[async_trait]
impl CredentialHasher for BlockingPasswordHasher {
    async fn hash(&self, password: &PlainPassword) -> Result<String, UserError> {
        let password = password.clone();
        self.run(move |hasher| hasher.hash(password.expose())).await
    }

    async fn verify(&self, password: &PlainPassword, hash: &str) -> Result<bool, UserError> {
        let password = password.clone();
        let hash = hash.to_string();
        self.run(move |hasher| hasher.verify(password.expose(), &hash))
            .await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn pool(max_concurrent: usize) -> BlockingPasswordHasher {
        BlockingPasswordHasher::new(
            PasswordHasher::with_cost(1024, 1, 1).expect("valid cost"),
            max_concurrent,
        )
    }

    fn password(s: &str) -> PlainPassword {
        PlainPassword::new(s.to_string()).unwrap()
    }

    #[tokio::test]
    async fn test_hash_and_verify() {
        let hasher = pool(2);

        let hash = hasher.hash(&password("pw1234")).await.unwrap();
        assert!(hash.starts_with("$argon2id$"));

        assert!(hasher.verify(&password("pw1234"), &hash).await.unwrap());
        assert!(!hasher.verify(&password("wrongpw"), &hash).await.unwrap());
    }

    #[tokio::test]
    async fn test_unusable_stored_hash() {
        let hasher = pool(1);
        let result = hasher.verify(&password("pw"), "not-a-phc-string").await;
        assert!(matches!(result, Err(UserError::Password(_))));
    }

    #[tokio::test]
    async fn test_concurrent_jobs_share_bounded_pool() {
        let hasher = Arc::new(pool(1));

        let jobs: Vec<_> = (0..4)
            .map(|i| {
                let hasher = Arc::clone(&hasher);
                tokio::spawn(async move { hasher.hash(&password(&format!("pw{}", i))).await })
            })
            .collect();

        for job in jobs {
            assert!(job.await.unwrap().is_ok());
        }
        assert_eq!(hasher.permits.available_permits(), 1);
    }
}
