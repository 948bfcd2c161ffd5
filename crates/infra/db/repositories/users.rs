use std::{collections::HashMap, sync::Arc};

use anyhow::{Context, Result};
use async_trait::async_trait;
use diesel::{RunQueryDsl, dsl::count_star, pg::Pg, prelude::*, update};

use crate::{
    domain,
    infra::db::postgres::{
        postgres_connection::PgPoolSquad,
        schema::{questionnaires, users},
    },
};
use domain::{
    entities::users::{UserChangeset, UserEntity},
    errors::DomainError,
    repositories::users::UserRepository,
    value_objects::{
        pagination::Pagination,
        users::{UserWithStats, UsersFilter},
    },
};

pub struct UserPostgres {
    db_pool: Arc<PgPoolSquad>,
}

impl UserPostgres {
    pub fn new(db_pool: Arc<PgPoolSquad>) -> Self {
        Self { db_pool }
    }
}

fn filtered_users(filter: &UsersFilter) -> users::BoxedQuery<'static, Pg> {
    let mut query = users::table.into_boxed();

    if let Some(status) = filter.status {
        query = query.filter(users::status.eq(status));
    }

    if let Some(accepted_offer) = filter.accepted_offer {
        query = query.filter(users::accepted_offer.eq(accepted_offer));
    }

    if let Some(date_from) = filter.date_from {
        query = query.filter(users::created_at.ge(date_from));
    }

    if let Some(date_to) = filter.date_to {
        query = query.filter(users::created_at.lt(date_to));
    }

    match filter.promocode_patterns().as_slice() {
        [] => {}
        [only] => query = query.filter(users::promocode.ilike(only.clone())),
        [first, second, ..] => {
            query = query.filter(
                users::promocode
                    .ilike(first.clone())
                    .or(users::promocode.ilike(second.clone())),
            )
        }
    }

    if let Some(age_from) = filter.age_from {
        query = query.filter(users::age.ge(age_from));
    }

    if let Some(age_to) = filter.age_to {
        query = query.filter(users::age.le(age_to));
    }

    if let Some(gender) = &filter.gender {
        query = query.filter(users::gender.eq(gender.clone()));
    }

    if let Some(map_binding) = filter.map_binding {
        query = query.filter(users::map_binding.eq(map_binding));
    }

    query
}

#[async_trait]
impl UserRepository for UserPostgres {
    async fn find_by_id(&self, user_id: i64) -> Result<UserEntity> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let user = users::table
            .find(user_id)
            .select(UserEntity::as_select())
            .first::<UserEntity>(&mut conn)
            .optional()?
            .ok_or(DomainError::NotFound("user"))?;

        Ok(user)
    }

    async fn list(&self, filter: UsersFilter, pagination: Pagination) -> Result<Vec<UserWithStats>> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let rows = filtered_users(&filter)
            .select(UserEntity::as_select())
            .order(users::id.asc())
            .limit(pagination.limit)
            .offset(pagination.offset())
            .load::<UserEntity>(&mut conn)
            .context("load users page")?;

        if rows.is_empty() {
            return Ok(Vec::new());
        }

        let user_ids: Vec<i64> = rows.iter().map(|user| user.id).collect();

        let counts = questionnaires::table
            .filter(questionnaires::user_id.eq_any(user_ids))
            .group_by((questionnaires::user_id, questionnaires::payment))
            .select((questionnaires::user_id, questionnaires::payment, count_star()))
            .load::<(i64, bool, i64)>(&mut conn)
            .context("count questionnaires per user")?;

        // user_id -> (paid, unpaid)
        let mut stats: HashMap<i64, (i64, i64)> = HashMap::new();
        for (user_id, payment, count) in counts {
            let entry = stats.entry(user_id).or_default();
            if payment {
                entry.0 += count;
            } else {
                entry.1 += count;
            }
        }

        let result = rows
            .into_iter()
            .map(|user| {
                let (paid, unpaid) = stats.get(&user.id).copied().unwrap_or_default();
                UserWithStats {
                    user,
                    q_total: paid + unpaid,
                    q_paid: paid,
                    q_unpaid: unpaid,
                }
            })
            .collect();

        Ok(result)
    }

    async fn count(&self, filter: UsersFilter) -> Result<i64> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        let total = filtered_users(&filter)
            .count()
            .get_result::<i64>(&mut conn)?;

        Ok(total)
    }

    async fn update(&self, user_id: i64, changeset: UserChangeset) -> Result<()> {
        let mut conn = Arc::clone(&self.db_pool).get()?;

        // diesel refuses an empty SET clause
        if changeset.is_empty() {
            let exists = diesel::select(diesel::dsl::exists(users::table.find(user_id)))
                .get_result::<bool>(&mut conn)?;
            return if exists {
                Ok(())
            } else {
                Err(DomainError::NoRowsAffected.into())
            };
        }

        let affected = update(users::table.find(user_id))
            .set(&changeset)
            .execute(&mut conn)?;

        if affected == 0 {
            return Err(DomainError::NoRowsAffected.into());
        }

        Ok(())
    }
}
