pub mod board;
pub mod calendar;
pub mod config;
pub mod courses;
pub mod error;
pub mod models;
pub mod services;
pub mod state;
