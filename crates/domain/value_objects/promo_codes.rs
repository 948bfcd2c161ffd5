use serde::{Deserialize, Serialize};

use crate::domain::{
    entities::promo_codes::{InsertPromoCodeEntity, PromoCodeChangeset, PromoCodeEntity},
    errors::DomainError,
};

pub const DEFAULT_PROMO_CODES_LIMIT: i64 = 50;

#[derive(Debug, Clone, Default, PartialEq)]
pub struct PromoCodeFilter {
    pub status: Option<bool>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PromoCodeDto {
    pub id: i64,
    pub value: String,
    pub number_uses: Option<i32>,
    pub status: Option<bool>,
    pub percent: i64,
    pub description: String,
}

impl From<PromoCodeEntity> for PromoCodeDto {
    fn from(value: PromoCodeEntity) -> Self {
        Self {
            id: value.id,
            value: value.value,
            number_uses: value.number_uses,
            status: value.status,
            percent: value.percent,
            description: value.description,
        }
    }
}

#[derive(Debug, Serialize)]
pub struct PromoCodeResponse {
    pub promo_code: PromoCodeDto,
}

#[derive(Debug, Serialize)]
pub struct PromoCodesListResponse {
    pub promo_codes: Vec<PromoCodeDto>,
    pub total: i64,
}

/// Body of both create and update. `id` is ignored on create.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct PromoCodeModel {
    #[serde(default)]
    pub id: i64,
    #[serde(default)]
    pub value: String,
    pub number_uses: Option<i32>,
    pub status: Option<bool>,
    #[serde(default)]
    pub percent: i64,
    #[serde(default)]
    pub description: String,
}

impl PromoCodeModel {
    pub fn validate(&self) -> Result<(), DomainError> {
        if self.value.trim().is_empty() {
            return Err(DomainError::validation("promo code value is required"));
        }
        if self.percent <= 0 {
            return Err(DomainError::validation("promo code percent must be positive"));
        }
        if self.description.trim().is_empty() {
            return Err(DomainError::validation("promo code description is required"));
        }
        Ok(())
    }

    pub fn to_insert_entity(&self) -> InsertPromoCodeEntity {
        InsertPromoCodeEntity {
            value: self.value.clone(),
            number_uses: self.number_uses,
            status: self.status,
            percent: self.percent,
            description: self.description.clone(),
        }
    }

    pub fn to_changeset(&self) -> PromoCodeChangeset {
        PromoCodeChangeset {
            value: Some(self.value.clone()),
            number_uses: self.number_uses,
            status: self.status,
            percent: Some(self.percent),
            description: Some(self.description.clone()),
        }
    }
}
