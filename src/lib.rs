pub mod api;
pub mod app;
pub mod auth;
pub mod config;
pub mod console;
pub mod shared;
pub mod workflow;
