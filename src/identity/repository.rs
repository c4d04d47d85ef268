//! Account storage abstraction.
//!
//! The identity service consumes accounts through [`UserRepository`];
//! persistence is an external collaborator. [`InMemoryUserRepository`] is
//! the in-process implementation used by the server and by tests.

use std::collections::HashMap;
use std::sync::atomic::{AtomicI64, Ordering};

use async_trait::async_trait;
use tokio::sync::RwLock;

use super::user::User;

/// Fields for a new account; the repository assigns the id and defaults the
/// status flags.
#[derive(Debug, Clone)]
pub struct NewUser {
    pub username: String,
    pub email: String,
    pub password_hash: String,
    pub role: String,
}

#[async_trait]
pub trait UserRepository: Send + Sync {
    async fn find_by_username(&self, username: &str) -> Option<User>;

    async fn find_by_email(&self, email: &str) -> Option<User>;

    /// Find the account whose username **or** email equals `identifier`.
    async fn find_by_identifier(&self, identifier: &str) -> Option<User>;

    /// Find any account conflicting with a prospective `username`/`email`
    /// pair, covering both uniqueness checks in one lookup.
    async fn find_conflicting(&self, username: &str, email: &str) -> Option<User>;

    async fn insert(&self, new_user: NewUser) -> User;
}

/// In-process account store.
#[derive(Default)]
pub struct InMemoryUserRepository {
    users: RwLock<HashMap<i64, User>>,
    next_id: AtomicI64,
}

impl InMemoryUserRepository {
    pub fn new() -> Self {
        Self {
            users: RwLock::new(HashMap::new()),
            next_id: AtomicI64::new(1),
        }
    }
}

#[async_trait]
impl UserRepository for InMemoryUserRepository {
    async fn find_by_username(&self, username: &str) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|u| u.username == username).cloned()
    }

    async fn find_by_email(&self, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users.values().find(|u| u.email == email).cloned()
    }

    async fn find_by_identifier(&self, identifier: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.username == identifier || u.email == identifier)
            .cloned()
    }

    async fn find_conflicting(&self, username: &str, email: &str) -> Option<User> {
        let users = self.users.read().await;
        users
            .values()
            .find(|u| u.username == username || u.email == email)
            .cloned()
    }

    async fn insert(&self, new_user: NewUser) -> User {
        let id = self.next_id.fetch_add(1, Ordering::Relaxed);
        let user = User {
            id,
            username: new_user.username,
            email: new_user.email,
            password_hash: new_user.password_hash,
            role: new_user.role,
            account_non_expired: true,
            account_non_locked: true,
            credentials_non_expired: true,
            enabled: true,
        };

        let mut users = self.users.write().await;
        users.insert(id, user.clone());
        user
    }
}
