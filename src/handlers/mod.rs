// src/handlers/mod.rs

pub mod auth;
pub mod health;
pub mod progress;
pub mod questions;
pub mod regenerate;
pub mod systems;
