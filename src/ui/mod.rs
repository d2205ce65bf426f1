//! ui
//!
//! User-facing output.
//!
//! # Modules
//!
//! - [`output`] - Verbosity, output formats and commit rendering
//!
//! # Design
//!
//! All user-facing output goes through this module so that quiet mode and
//! machine-readable formats are handled in one place.

pub mod output;
