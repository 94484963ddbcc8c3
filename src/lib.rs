//! Library crate for mingle-back, exposing modules for the binary and integration tests.

pub mod catalog;
pub mod config;
pub mod dto;
pub mod error;
pub mod routes;
pub mod services;
pub mod state;
