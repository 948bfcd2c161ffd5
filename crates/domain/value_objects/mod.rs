pub mod enums;
pub mod media;
pub mod notifications;
pub mod pagination;
pub mod photos;
pub mod promo_codes;
pub mod questionnaires;
pub mod reviews;
pub mod status;
pub mod users;
pub mod videos;
