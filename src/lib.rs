//! Music library web-data builder - shared modules for the CLI and tests.

pub mod aggregate;
pub mod chunks;
pub mod config;
pub mod extract;
pub mod models;
pub mod normalize;
pub mod pipeline;
pub mod progress;
pub mod row;
pub mod safety;
pub mod source;
