//! Product Desk Core - Shared types library.
//!
//! This crate provides the types used across all Product Desk components:
//! - `web` - Server-rendered product list and create form
//! - `cli` - Command-line access to the same workflow
//!
//! # Architecture
//!
//! The core crate contains only types and validation - no I/O, no HTTP
//! clients. This keeps it lightweight and allows it to be used anywhere.
//!
//! # Modules
//!
//! - [`types`] - Newtype wrappers for ids, product codes, categories and products
//! - [`validation`] - The declarative product form schema

#![cfg_attr(not(test), forbid(unsafe_code))]

pub mod types;
pub mod validation;

pub use types::*;
pub use validation::{Field, FieldErrors, ProductForm, Rule, validate};
