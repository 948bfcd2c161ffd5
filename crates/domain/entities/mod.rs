pub mod photos;
pub mod promo_codes;
pub mod questionnaires;
pub mod reviews;
pub mod users;
pub mod videos;
