// src/utils/mod.rs

pub mod answer;
pub mod text;
