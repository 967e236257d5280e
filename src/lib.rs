pub mod config;
pub mod engine;
pub mod error;
pub mod player;
pub mod renderer;
pub mod robot;
pub mod scheduler;
pub mod session;
pub mod types;
