use std::sync::Arc;

use anyhow::Result;
use crates::domain::{
    errors::DomainError,
    repositories::users::UserRepository,
    value_objects::{
        pagination::Pagination,
        status::StatusResponse,
        users::{UpdateUserModel, UserDto, UserResponse, UsersFilter, UsersListResponse},
    },
};
use tracing::{error, info};

pub struct UsersUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    user_repository: Arc<U>,
}

impl<U> UsersUseCase<U>
where
    U: UserRepository + Send + Sync + 'static,
{
    pub fn new(user_repository: Arc<U>) -> Self {
        Self { user_repository }
    }

    pub async fn get_user(&self, user_id: i64) -> Result<UserResponse> {
        if user_id == 0 {
            return Err(DomainError::validation("invalid user id").into());
        }

        let user = self.user_repository.find_by_id(user_id).await?;

        Ok(UserResponse {
            user: UserDto::from(user),
        })
    }

    pub async fn list_users(
        &self,
        filter: UsersFilter,
        pagination: Pagination,
    ) -> Result<UsersListResponse> {
        let users = self
            .user_repository
            .list(filter.clone(), pagination)
            .await
            .map_err(|err| {
                error!(db_error = ?err, "users: failed to list users");
                err
            })?;

        let total = self.user_repository.count(filter).await.map_err(|err| {
            error!(db_error = ?err, "users: failed to count users");
            err
        })?;

        Ok(UsersListResponse {
            users: users.into_iter().map(UserDto::from).collect(),
            total,
        })
    }

    pub async fn update_user(&self, model: UpdateUserModel) -> Result<StatusResponse> {
        let user_id = model.id;
        if user_id == 0 {
            return Err(DomainError::validation("invalid user id").into());
        }

        match self.user_repository.update(user_id, model.to_changeset()).await {
            Ok(()) => {
                info!(%user_id, "users: user updated");
                Ok(StatusResponse::ok(""))
            }
            Err(err) if DomainError::find(&err) == Some(&DomainError::NoRowsAffected) => {
                info!(%user_id, "users: update matched no rows");
                Ok(StatusResponse::ok("has no rows affected"))
            }
            Err(err) => {
                error!(%user_id, db_error = ?err, "users: failed to update user");
                Err(err)
            }
        }
    }
}
