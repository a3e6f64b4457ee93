// src/models/mod.rs

pub mod question;
pub mod system;
