pub mod photo_types;
pub mod video_types;
