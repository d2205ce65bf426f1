//! core
//!
//! Core domain types and configuration for rangelog.
//!
//! # Modules
//!
//! - [`types`] - Strong types: Oid, IgnoreSet, RangeDescriptor
//! - [`config`] - Configuration schema and loading

pub mod config;
pub mod types;
