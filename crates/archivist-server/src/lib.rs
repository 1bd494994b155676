pub mod app;
pub mod archiving;
pub mod config;
pub mod error;
pub mod routes;
pub mod scheduler;
pub mod state;
