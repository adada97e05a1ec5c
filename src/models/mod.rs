// src/models/mod.rs

pub mod analysis;
pub mod attempt;
pub mod profile;
pub mod question;
pub mod settings;
