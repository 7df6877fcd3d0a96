//! Core types for Product Desk.
//!
//! This module provides type-safe wrappers for the catalog's domain concepts.

pub mod category;
pub mod id;
pub mod product;
pub mod product_code;

pub use category::{Category, category_name};
pub use id::*;
pub use product::{Product, StoredProduct};
pub use product_code::{ProductCode, ProductCodeError};
