//! Core orchestration: configuration and parser dispatch.

pub mod config;
pub mod parser;
