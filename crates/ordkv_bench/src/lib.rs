//! Benchmark support for ordkv.

#![deny(unsafe_code)]
#![warn(missing_docs)]

pub mod utils;
