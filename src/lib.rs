//! River & Farm Guardian - crowd-sourced river and farm monitoring API
//!
//! This library exposes the core modules for testing and reuse.

pub mod common;
pub mod config;
pub mod entity;
pub mod error;
pub mod routes;
pub mod services;
