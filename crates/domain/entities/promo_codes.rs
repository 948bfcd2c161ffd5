use diesel::prelude::*;

use crate::infra::db::postgres::schema::promo_codes;

#[derive(Debug, Clone, PartialEq, Identifiable, Selectable, Queryable)]
#[diesel(table_name = promo_codes)]
pub struct PromoCodeEntity {
    pub id: i64,
    pub value: String,
    pub number_uses: Option<i32>,
    pub status: Option<bool>,
    pub percent: i64,
    pub description: String,
}

#[derive(Debug, Clone, PartialEq, Insertable)]
#[diesel(table_name = promo_codes)]
pub struct InsertPromoCodeEntity {
    pub value: String,
    pub number_uses: Option<i32>,
    pub status: Option<bool>,
    pub percent: i64,
    pub description: String,
}

#[derive(Debug, Clone, Default, PartialEq, AsChangeset)]
#[diesel(table_name = promo_codes)]
pub struct PromoCodeChangeset {
    pub value: Option<String>,
    pub number_uses: Option<i32>,
    pub status: Option<bool>,
    pub percent: Option<i64>,
    pub description: Option<String>,
}
