use anyhow::Context;
use tracing::{error, warn};

use crate::{
    auth::{
        password::{hash_password, verify_dummy, verify_password},
        repo_types::{User, UserId},
    },
    error::AppError,
    store::Store,
};

/// Creates a user with a freshly salted Argon2 hash of `secret`.
///
/// Uniqueness of the handle is decided by the store, so two racing
/// registrations of the same handle yield exactly one success.
pub async fn register(
    store: &dyn Store,
    handle: &str,
    secret: &str,
    contact: Option<&str>,
) -> Result<UserId, AppError> {
    if handle.is_empty() || secret.is_empty() {
        return Err(AppError::missing("Missing username or password"));
    }
    let contact = contact.filter(|c| !c.is_empty());

    let secret = secret.to_owned();
    let hash = tokio::task::spawn_blocking(move || hash_password(&secret))
        .await
        .context("password hashing task")??;
    let user = store.insert_user(handle, &hash, contact).await?;
    Ok(user.id)
}

/// Checks a handle/secret pair. Unknown handles and wrong secrets both
/// produce `AuthFailure`; empty fields are `MissingField`, as on register.
pub async fn verify(store: &dyn Store, handle: &str, secret: &str) -> Result<User, AppError> {
    if handle.is_empty() || secret.is_empty() {
        return Err(AppError::missing("Missing username or password"));
    }
    let secret = secret.to_owned();

    let Some(user) = store.find_user_by_username(handle).await? else {
        tokio::task::spawn_blocking(move || verify_dummy(&secret))
            .await
            .context("dummy verification task")?;
        warn!(username = %handle, "login unknown username");
        return Err(AppError::AuthFailure);
    };

    let hash = user.password_hash.clone();
    let ok = tokio::task::spawn_blocking(move || verify_password(&secret, &hash))
        .await
        .context("password verification task")?
        .map_err(|e| {
            error!(error = %e, user_id = user.id, "stored hash unreadable");
            AppError::Internal(e)
        })?;
    if !ok {
        warn!(user_id = user.id, "login invalid password");
        return Err(AppError::AuthFailure);
    }
    Ok(user)
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::store::MemoryStore;

    #[tokio::test]
    async fn register_then_verify() {
        let store = MemoryStore::new();
        let id = register(&store, "bob", "s3cret", Some("bob@example.com")).await.unwrap();
        let user = verify(&store, "bob", "s3cret").await.unwrap();
        assert_eq!(user.id, id);
        assert_eq!(user.email.as_deref(), Some("bob@example.com"));
        assert_ne!(user.password_hash, "s3cret");
    }

    #[tokio::test]
    async fn register_rejects_empty_fields() {
        let store = MemoryStore::new();
        assert!(matches!(
            register(&store, "", "pw", None).await,
            Err(AppError::MissingField(_))
        ));
        assert!(matches!(
            register(&store, "bob", "", None).await,
            Err(AppError::MissingField(_))
        ));
    }

    #[tokio::test]
    async fn verify_rejects_empty_fields_before_lookup() {
        let store = MemoryStore::new();
        register(&store, "bob", "pw", None).await.unwrap();
        assert!(matches!(
            verify(&store, "", "pw").await,
            Err(AppError::MissingField(_))
        ));
        assert!(matches!(
            verify(&store, "bob", "").await,
            Err(AppError::MissingField(_))
        ));
    }

    #[tokio::test(flavor = "current_thread")]
    async fn hashing_runs_off_the_runtime_thread() {
        let store = MemoryStore::new();
        let ticker = tokio::spawn(async {
            for _ in 0..3 {
                tokio::task::yield_now().await;
            }
        });
        register(&store, "bob", "pw", None).await.unwrap();
        verify(&store, "bob", "pw").await.unwrap();
        assert!(ticker.is_finished());
    }

    #[tokio::test]
    async fn register_twice_is_duplicate() {
        let store = MemoryStore::new();
        register(&store, "bob", "pw", None).await.unwrap();
        assert!(matches!(
            register(&store, "bob", "other", None).await,
            Err(AppError::DuplicateHandle)
        ));
    }

    #[tokio::test]
    async fn empty_email_is_treated_as_absent() {
        let store = MemoryStore::new();
        register(&store, "a", "pw", Some("")).await.unwrap();
        register(&store, "b", "pw", Some("")).await.unwrap();
        assert_eq!(verify(&store, "b", "pw").await.unwrap().email, None);
    }

    #[tokio::test]
    async fn wrong_secret_and_unknown_handle_look_the_same() {
        let store = MemoryStore::new();
        register(&store, "bob", "right", None).await.unwrap();

        let wrong = verify(&store, "bob", "wrong").await.unwrap_err();
        let unknown = verify(&store, "nobody", "right").await.unwrap_err();
        assert!(matches!(wrong, AppError::AuthFailure));
        assert!(matches!(unknown, AppError::AuthFailure));
        assert_eq!(wrong.to_string(), unknown.to_string());
    }

    #[tokio::test]
    async fn concurrent_duplicate_registration_has_one_winner() {
        let store = Arc::new(MemoryStore::new());
        let a = {
            let store = store.clone();
            tokio::spawn(async move { register(store.as_ref(), "bob", "pw1", None).await })
        };
        let b = {
            let store = store.clone();
            tokio::spawn(async move { register(store.as_ref(), "bob", "pw2", None).await })
        };
        let results = [a.await.unwrap(), b.await.unwrap()];

        let ok = results.iter().filter(|r| r.is_ok()).count();
        let dup = results
            .iter()
            .filter(|r| matches!(r, Err(AppError::DuplicateHandle)))
            .count();
        assert_eq!((ok, dup), (1, 1));
    }
}
