use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::users::{UserChangeset, UserEntity},
    value_objects::{
        pagination::Pagination,
        users::{UserWithStats, UsersFilter},
    },
};

#[automock]
#[async_trait]
pub trait UserRepository {
    async fn find_by_id(&self, user_id: i64) -> Result<UserEntity>;
    async fn list(&self, filter: UsersFilter, pagination: Pagination) -> Result<Vec<UserWithStats>>;
    async fn count(&self, filter: UsersFilter) -> Result<i64>;
    /// Fails with `DomainError::NoRowsAffected` when no user has `user_id`.
    async fn update(&self, user_id: i64, changeset: UserChangeset) -> Result<()>;
}
