//! # ordkv Testkit
//!
//! Test utilities for ordkv.
//!
//! This crate provides:
//! - Test fixtures and database helpers
//! - Property-based test generators using proptest
//! - A mixed concurrent workload driver for stress testing
//!
//! ## Usage
//!
//! ```rust
//! use ordkv_testkit::prelude::*;
//!
//! with_db(|db| {
//!     let col = db.collection("test").unwrap();
//!     col.put(1, bytes::Bytes::from_static(b"v")).unwrap();
//!     assert!(col.contains(1).unwrap());
//! });
//! ```

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod fixtures;
pub mod generators;
pub mod stress;

/// Prelude module for convenient imports.
pub mod prelude {
    pub use crate::fixtures::*;
    pub use crate::generators::*;
    pub use crate::stress::*;
}

pub use fixtures::*;
pub use generators::*;
pub use stress::*;
