// src/services/mod.rs

pub mod analyzer;
pub mod generator;
pub mod llm;
pub mod prompts;
pub mod quiz;
