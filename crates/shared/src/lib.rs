//! Shared utilities for the Stationery Desk workspace.
//!
//! This crate provides functionality used across the other crates:
//! - Password hashing with Argon2id
//! - Common validation logic

pub mod password;
pub mod validation;
