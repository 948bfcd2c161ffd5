pub mod db;
pub mod storages;
pub mod telegram;
