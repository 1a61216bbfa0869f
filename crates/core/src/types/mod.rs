//! Core types for Velvet Loom.
//!
//! This module provides type-safe wrappers for common domain concepts and
//! the wire DTOs exchanged with the backend REST API.

pub mod catalog;
pub mod contact;
pub mod email;
pub mod id;
pub mod order;
pub mod status;
pub mod user;

pub use catalog::{Category, Product};
pub use contact::{ContactSubmission, NewContactSubmission};
pub use email::{Email, EmailError};
pub use id::*;
pub use order::{CheckoutItem, CheckoutReceipt, CheckoutRequest, Order, OrderItem, OrderUpdate};
pub use status::OrderStatus;
pub use user::User;
