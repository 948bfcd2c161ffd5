pub mod photos;
pub mod promo_codes;
pub mod questionnaires;
pub mod reviews;
pub mod users;
pub mod videos;

use super::error_responses::AppError;

pub(crate) fn parse_path_id(raw: &str, what: &str) -> Result<i64, AppError> {
    raw.trim()
        .parse()
        .map_err(|_| AppError::BadRequest(format!("invalid {what}")))
}
