pub mod artist;
pub mod bucket;
pub mod config;
pub mod deal;
pub mod score;
