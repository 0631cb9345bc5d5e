//! DopeTech Core - Shared types and cart logic.
//!
//! This crate provides the common types used across all DopeTech components:
//! - `storefront` - Public-facing JSON API server
//! - `cli` - Command-line tools for migrations and catalog seeding
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no database
//! access, no HTTP clients. This keeps it lightweight and allows it to be
//! used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype IDs, money formatting, product and order types
//! - [`cart`] - The cart state machine: merge, dedupe, serialize

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use types::*;
