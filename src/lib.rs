//! # Trunk CLI
//!
//! Command-line client for the trunk package registry.
//!
//! This crate provides functionality to register sessions, publish and
//! manage podspecs, and administer pod ownership on a trunk registry.

pub mod api;
pub mod auth;
pub mod commands;
pub mod config;
pub mod utils;

pub use utils::error::{TrunkError, TrunkResult};
