pub mod config;
pub mod errors;
pub mod models;
pub mod player;
pub mod proxy;
pub mod quality;
pub mod utils;
