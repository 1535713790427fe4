//! Data-access functions: one method per (entity, operation) pair.
//!
//! Each method performs a single store round trip (plus, for writes, one
//! existence pre-check) and maps store failures into the domain error
//! taxonomy. The pre-check and the write are not transactionally linked;
//! a concurrent delete between them surfaces as the store's own not-found,
//! which is collapsed into the same `DomainError::NotFound` here.

use std::sync::Arc;

use chrono::Utc;

use ripple_core::{DomainError, DomainResult, PaginationWindow, UserId};
use ripple_infra::{Store, StoreError, UserWithPosts};
use ripple_users::{CreateUser, UpdateUser, User, UserView};

pub struct AppServices {
    store: Arc<dyn Store>,
}

impl AppServices {
    pub fn new(store: Arc<dyn Store>) -> Self {
        Self { store }
    }

    pub async fn fetch_user(&self, id: &UserId) -> DomainResult<UserView> {
        let user = self
            .store
            .find_user(id)
            .await
            .map_err(store_error)?
            .ok_or_else(|| DomainError::not_found("User", id.as_str()))?;
        Ok(user.view())
    }

    pub async fn create_user(&self, input: CreateUser) -> DomainResult<UserView> {
        let now = Utc::now();
        let user = User {
            id: UserId::new(),
            email: input.email,
            password: input.password,
            name: input.name,
            image: input.image,
            created_at: now,
            updated_at: now,
        };
        let created = self.store.insert_user(user).await.map_err(store_error)?;
        Ok(created.view())
    }

    pub async fn update_user(&self, id: &UserId, changes: UpdateUser) -> DomainResult<UserView> {
        self.ensure_user_exists(id).await?;
        let updated = self
            .store
            .update_user(id, changes)
            .await
            .map_err(|e| write_miss_as_not_found(e, id))?;
        Ok(updated.view())
    }

    pub async fn delete_user(&self, id: &UserId) -> DomainResult<()> {
        self.ensure_user_exists(id).await?;
        self.store
            .delete_user(id)
            .await
            .map_err(|e| write_miss_as_not_found(e, id))
    }

    pub async fn following_with_pagination(
        &self,
        id: &UserId,
        window: PaginationWindow,
    ) -> DomainResult<Vec<UserWithPosts>> {
        self.store
            .following_page(id, window)
            .await
            .map_err(store_error)
    }

    async fn ensure_user_exists(&self, id: &UserId) -> DomainResult<()> {
        match self.store.find_user(id).await.map_err(store_error)? {
            Some(_) => Ok(()),
            None => Err(DomainError::not_found("User", id.as_str())),
        }
    }
}

fn store_error(err: StoreError) -> DomainError {
    DomainError::Store(err.to_string())
}

/// The store's not-found on a write is the same condition as a failed
/// pre-check; both become `NotFound` (the check-then-act race collapses
/// into one error kind).
fn write_miss_as_not_found(err: StoreError, id: &UserId) -> DomainError {
    match err {
        StoreError::NotFound => DomainError::not_found("User", id.as_str()),
        other => store_error(other),
    }
}
