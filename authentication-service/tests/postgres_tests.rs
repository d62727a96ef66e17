//! Credential store tests against a real Postgres instance.
//!
//! Run with `cargo test -- --ignored` and `DATABASE_URL` pointing at a server
//! where the test user may create databases.

mod common;

use std::sync::Arc;
use std::time::Duration;

use auth::Role;
use authentication_service::domain::user::models::EmailAddress;
use authentication_service::domain::user::models::NewUser;
use authentication_service::domain::user::models::Username;
use authentication_service::domain::user::ports::UserRepository;
use authentication_service::outbound::repositories::PostgresUserRepository;
use authentication_service::user::errors::UserError;
use chrono::DateTime;
use chrono::Utc;
use common::TestDb;

fn new_user(username: &str, email: &str) -> NewUser {
    NewUser {
        username: Username::new(username.to_string()).unwrap(),
        email: EmailAddress::new(email.to_string()).unwrap(),
        password_hash: "$argon2id$v=19$m=1024,t=1,p=1$c2FsdHNhbHQ$aGFzaGhhc2hoYXNo".to_string(),
        role: Role::User,
    }
}

fn repository(db: &TestDb) -> PostgresUserRepository {
    PostgresUserRepository::new(db.pool.clone(), Duration::from_secs(5))
}

#[tokio::test]
#[ignore = "requires a Postgres instance"]
async fn test_create_and_find() {
    let db = TestDb::new().await;
    let repository = repository(&db);

    let created = repository
        .create(new_user("Alice", "Alice@x.com"))
        .await
        .expect("Failed to create user");
    assert!(created.id.0 > 0);
    assert_eq!(created.username.as_str(), "Alice");
    assert_eq!(created.role, Role::User);

    let by_username = repository
        .find_by_username_or_email("alice")
        .await
        .unwrap()
        .expect("User not found by username");
    assert_eq!(by_username.id, created.id);

    let by_email = repository
        .find_by_username_or_email("ALICE@X.COM")
        .await
        .unwrap()
        .expect("User not found by email");
    assert_eq!(by_email.id, created.id);

    assert!(repository
        .find_by_username_or_email("bob")
        .await
        .unwrap()
        .is_none());
}

#[tokio::test]
#[ignore = "requires a Postgres instance"]
async fn test_ids_increase() {
    let db = TestDb::new().await;
    let repository = repository(&db);

    let first = repository.create(new_user("alice", "alice@x.com")).await.unwrap();
    let second = repository.create(new_user("bob", "bob@x.com")).await.unwrap();

    assert!(second.id > first.id);
}

#[tokio::test]
#[ignore = "requires a Postgres instance"]
async fn test_duplicates_rejected_case_insensitively() {
    let db = TestDb::new().await;
    let repository = repository(&db);

    repository
        .create(new_user("alice", "alice@x.com"))
        .await
        .unwrap();

    let result = repository.create(new_user("ALICE", "other@x.com")).await;
    assert!(matches!(result, Err(UserError::DuplicateCredential)));

    let result = repository.create(new_user("other", "Alice@X.com")).await;
    assert!(matches!(result, Err(UserError::DuplicateCredential)));

    let username = Username::new("Alice".to_string()).unwrap();
    let email = EmailAddress::new("new@x.com".to_string()).unwrap();
    assert!(repository.exists(&username, &email).await.unwrap());
}

#[tokio::test]
#[ignore = "requires a Postgres instance"]
async fn test_concurrent_inserts_create_one_user() {
    let db = TestDb::new().await;
    let repository = Arc::new(repository(&db));

    let attempts: Vec<_> = (0..8)
        .map(|i| {
            let repository = Arc::clone(&repository);
            tokio::spawn(async move {
                repository
                    .create(new_user("alice", &format!("alice{}@x.com", i)))
                    .await
            })
        })
        .collect();

    let mut created = 0;
    let mut duplicates = 0;
    for attempt in attempts {
        match attempt.await.unwrap() {
            Ok(_) => created += 1,
            Err(UserError::DuplicateCredential) => duplicates += 1,
            Err(e) => panic!("Unexpected error: {}", e),
        }
    }

    assert_eq!(created, 1);
    assert_eq!(duplicates, 7);
}

#[tokio::test]
#[ignore = "requires a Postgres instance"]
async fn test_update_touches_updated_at() {
    let db = TestDb::new().await;
    let repository = repository(&db);

    let created = repository
        .create(new_user("alice", "alice@x.com"))
        .await
        .unwrap();

    tokio::time::sleep(Duration::from_millis(20)).await;

    sqlx::query("UPDATE users SET role = 'admin' WHERE id = $1")
        .bind(created.id.0)
        .execute(&db.pool)
        .await
        .unwrap();

    let (created_at, updated_at): (DateTime<Utc>, DateTime<Utc>) =
        sqlx::query_as("SELECT created_at, updated_at FROM users WHERE id = $1")
            .bind(created.id.0)
            .fetch_one(&db.pool)
            .await
            .unwrap();
    assert!(updated_at > created_at);

    let reloaded = repository
        .find_by_username_or_email("alice")
        .await
        .unwrap()
        .unwrap();
    assert_eq!(reloaded.role, Role::Admin);
}

#[tokio::test]
#[ignore = "requires a Postgres instance"]
async fn test_unknown_stored_role_is_an_error() {
    let db = TestDb::new().await;
    let repository = repository(&db);

    let created = repository
        .create(new_user("alice", "alice@x.com"))
        .await
        .unwrap();

    sqlx::query("UPDATE users SET role = 'superuser' WHERE id = $1")
        .bind(created.id.0)
        .execute(&db.pool)
        .await
        .unwrap();

    let result = repository.find_by_username_or_email("alice").await;
    assert!(matches!(result, Err(UserError::InvalidRole(_))));
}

#[tokio::test]
#[ignore = "requires a Postgres instance"]
async fn test_non_ascii_emails_collide_across_case() {
    let db = TestDb::new().await;
    let repository = repository(&db);

    let created = repository
        .create(new_user("alice", "ÄRGER@x.com"))
        .await
        .unwrap();

    let result = repository.create(new_user("bob", "ärger@x.com")).await;
    assert!(matches!(result, Err(UserError::DuplicateCredential)));

    let found = repository
        .find_by_username_or_email("Ärger@X.com")
        .await
        .unwrap()
        .expect("User not found by differently cased email");
    assert_eq!(found.id, created.id);
    assert_eq!(found.email.as_str(), "ÄRGER@x.com");

    let username = Username::new("carol".to_string()).unwrap();
    let email = EmailAddress::new("ärger@X.COM".to_string()).unwrap();
    assert!(repository.exists(&username, &email).await.unwrap());
}
