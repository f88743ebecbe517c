// src/utils/mod.rs

pub mod hash;
pub mod session;
pub mod validation;
