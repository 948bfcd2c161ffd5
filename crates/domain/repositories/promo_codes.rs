use anyhow::Result;
use async_trait::async_trait;
use mockall::automock;

use crate::domain::{
    entities::promo_codes::{InsertPromoCodeEntity, PromoCodeChangeset, PromoCodeEntity},
    value_objects::{pagination::Pagination, promo_codes::PromoCodeFilter},
};

#[automock]
#[async_trait]
pub trait PromoCodeRepository {
    async fn find_by_id(&self, promo_code_id: i64) -> Result<PromoCodeEntity>;
    async fn list(
        &self,
        filter: PromoCodeFilter,
        pagination: Pagination,
    ) -> Result<Vec<PromoCodeEntity>>;
    async fn count(&self, filter: PromoCodeFilter) -> Result<i64>;
    async fn create(&self, promo_code: InsertPromoCodeEntity) -> Result<i64>;
    async fn update(&self, promo_code_id: i64, changeset: PromoCodeChangeset) -> Result<()>;
}
