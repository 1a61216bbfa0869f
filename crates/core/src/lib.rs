//! Velvet Loom Core - Shared types and cart logic.
//!
//! This crate provides common types used across all Velvet Loom components:
//! - `storefront` - Public-facing e-commerce site
//! - `admin` - Internal administration panel
//! - `cli` - Command-line tools for seeding and health checks
//!
//! # Architecture
//!
//! The core crate contains only types and pure logic - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for type-safe IDs, emails, and
//!   statuses, plus the wire DTOs of the backend REST API
//! - [`cart`] - The session cart state machine and totals computation

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod cart;
pub mod types;

pub use cart::*;
pub use types::*;
