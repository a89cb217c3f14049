// Caravan - WooCommerce to BigCommerce Migration Tool
// Copyright (c) 2026 Caravan Contributors
// Licensed under the MIT License

//! # Caravan - WooCommerce to BigCommerce Migration
//!
//! Caravan migrates a WooCommerce store's catalog, variants and order
//! history into BigCommerce. Transformation is pure and deterministic;
//! a resumable, idempotent batch runner does all the I/O and a
//! post-migration validator reconciles the two stores afterwards.
//!
//! ## Overview
//!
//! This library provides the core functionality for:
//! - **Transforming** products, variants and orders into BigCommerce shape
//! - **Migrating** entities sequentially with idempotent re-runs and a
//!   fixed inter-request delay
//! - **Resuming** interrupted runs from a persisted JSON state file
//! - **Validating** the result with count, price and image checks
//!
//! ## Architecture
//!
//! Caravan follows a layered architecture:
//!
//! - [`cli`] - Command-line interface and argument parsing
//! - [`core`] - Business logic (transform, migrate, validation)
//! - [`adapters`] - Platform clients (WooCommerce, BigCommerce)
//! - [`domain`] - Core domain types and models
//! - [`config`] - Configuration management
//! - [`logging`] - Structured logging
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use caravan::core::transform::catalog::transform_product;
//! use caravan::domain::{CategoryMap, SourceProduct};
//!
//! # fn example(product: &SourceProduct) -> caravan::domain::Result<()> {
//! let categories = CategoryMap::new();
//! let transformed = transform_product(product, None, &categories)
//!     .map_err(|r| caravan::domain::CaravanError::Migration(r.errors.join("; ")))?;
//!
//! println!("sku={}", transformed.product.sku);
//! for warning in &transformed.warnings {
//!     println!("warning: {warning}");
//! }
//! # Ok(())
//! # }
//! ```

pub mod adapters;
pub mod cli;
pub mod config;
pub mod core;
pub mod domain;
pub mod logging;
