use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::entities::users::{UserChangeset, UserEntity};

pub const DEFAULT_USERS_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct UsersFilter {
    pub status: Option<bool>,
    pub accepted_offer: Option<bool>,
    pub date_from: Option<DateTime<Utc>>,
    pub date_to: Option<DateTime<Utc>>,
    pub promocode: Option<String>,
    pub age_from: Option<i64>,
    pub age_to: Option<i64>,
    pub gender: Option<String>,
    pub map_binding: Option<bool>,
}

impl UsersFilter {
    /// Patterns matched against `promocode` with ILIKE: the trimmed value and,
    /// when it differs, the same value with spaces turned into `+` (codes
    /// arrive URL-decoded).
    pub fn promocode_patterns(&self) -> Vec<String> {
        let Some(promo) = self.promocode.as_deref().map(str::trim) else {
            return Vec::new();
        };
        if promo.is_empty() {
            return Vec::new();
        }

        let mut patterns = vec![promo.to_string()];
        let alt = promo.replace(' ', "+");
        if alt != promo {
            patterns.push(alt);
        }
        patterns
    }
}

/// A user row plus questionnaire counts computed by the list query.
#[derive(Debug, Clone, PartialEq)]
pub struct UserWithStats {
    pub user: UserEntity,
    pub q_total: i64,
    pub q_paid: i64,
    pub q_unpaid: i64,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct UserDto {
    pub id: i64,
    pub username: String,
    pub language: Option<String>,
    pub ref_boss_id: Option<i64>,
    pub status: bool,
    pub accepted_offer: bool,
    pub created_at: DateTime<Utc>,
    pub promocode: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub map_binding: Option<bool>,
    pub total: i64,
    pub paid: i64,
    pub unpaid: i64,
}

impl From<UserEntity> for UserDto {
    fn from(value: UserEntity) -> Self {
        Self {
            id: value.id,
            username: value.username,
            language: value.language,
            ref_boss_id: value.ref_boss_id,
            status: value.status,
            accepted_offer: value.accepted_offer,
            created_at: value.created_at,
            promocode: value.promocode,
            age: value.age,
            gender: value.gender,
            map_binding: value.map_binding,
            total: 0,
            paid: 0,
            unpaid: 0,
        }
    }
}

impl From<UserWithStats> for UserDto {
    fn from(value: UserWithStats) -> Self {
        Self {
            total: value.q_total,
            paid: value.q_paid,
            unpaid: value.q_unpaid,
            ..UserDto::from(value.user)
        }
    }
}

#[derive(Debug, Serialize)]
pub struct UserResponse {
    pub user: UserDto,
}

#[derive(Debug, Serialize)]
pub struct UsersListResponse {
    pub users: Vec<UserDto>,
    pub total: i64,
}

/// Body of `POST /api/users/update`. Absent fields are left untouched.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct UpdateUserModel {
    pub id: i64,
    pub username: Option<String>,
    pub language: Option<String>,
    pub ref_boss_id: Option<i64>,
    pub status: Option<bool>,
    pub accepted_offer: Option<bool>,
    pub promocode: Option<String>,
    pub age: Option<i64>,
    pub gender: Option<String>,
    pub map_binding: Option<bool>,
}

impl UpdateUserModel {
    pub fn to_changeset(&self) -> UserChangeset {
        UserChangeset {
            username: self.username.clone(),
            language: self.language.clone(),
            ref_boss_id: self.ref_boss_id,
            status: self.status,
            accepted_offer: self.accepted_offer,
            promocode: self.promocode.clone(),
            age: self.age,
            gender: self.gender.clone(),
            map_binding: self.map_binding,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn promocode_patterns_include_plus_variant() {
        let filter = UsersFilter {
            promocode: Some("  SPRING SALE ".to_string()),
            ..Default::default()
        };
        assert_eq!(filter.promocode_patterns(), vec!["SPRING SALE", "SPRING+SALE"]);
    }

    #[test]
    fn blank_promocode_adds_no_condition() {
        let filter = UsersFilter {
            promocode: Some("   ".to_string()),
            ..Default::default()
        };
        assert!(filter.promocode_patterns().is_empty());
        assert!(UsersFilter::default().promocode_patterns().is_empty());
    }
}
