// src/client/mod.rs

//! Client-side application core: API access plus the state behind each screen.
//! Nothing here depends on a UI toolkit.

pub mod analytics;
pub mod api;
pub mod builder;
pub mod library;
pub mod results;
pub mod runner;
