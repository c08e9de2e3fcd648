pub mod config;
pub mod sections;
pub mod snap;
pub mod views;
