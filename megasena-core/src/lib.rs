pub mod config;
pub mod frequency;
pub mod generator;
pub mod models;
pub mod pool;
pub mod simulator;
pub mod source;
