// ============================================================================
// Strict linting - Dangerous or non-idiomatic practices are forbidden
// ============================================================================

#![deny(warnings)]                    // All warnings are treated as errors
#![deny(unsafe_code)]                 // Unsafe code is forbidden
#![deny(missing_docs)]                // All public items must be documented
#![deny(dead_code)]                   // Unused code is forbidden
#![deny(non_camel_case_types)]        // Types must follow CamelCase convention

// Additional strictness - Leave nothing unchecked
#![deny(unused_imports)]              // Unused imports are forbidden
#![deny(unused_variables)]            // Unused variables are forbidden
#![deny(unused_must_use)]             // Must handle Result and Option explicitly
#![deny(non_snake_case)]              // Variables and functions must be snake_case
#![deny(non_upper_case_globals)]      // Constants must be UPPER_CASE
#![deny(nonstandard_style)]           // Non-standard code style is forbidden
#![forbid(unsafe_op_in_unsafe_fn)]    // Unsafe ops in unsafe fns are forbidden

// Clippy lints (warnings only)
#![warn(clippy::all)]                 // All standard Clippy lints
#![warn(clippy::pedantic)]            // Very strict Clippy lints
#![warn(clippy::nursery)]             // Experimental lints
#![warn(clippy::unwrap_used)]         // unwrap() warning
#![warn(clippy::expect_used)]         // expect() warning
#![warn(clippy::panic)]               // panic!() warning
#![warn(clippy::print_stdout)]        // println!() warning
#![warn(clippy::todo)]                // TODO warning
#![warn(clippy::unimplemented)]       // unimplemented!() warning
#![warn(clippy::missing_const_for_fn)] // Force const when possible
#![warn(clippy::unwrap_in_result)]    // unwrap() in Result warning
#![warn(clippy::module_inception)]    // Module with same name as crate warning
#![warn(clippy::redundant_clone)]     // Useless clones warning
#![warn(clippy::shadow_unrelated)]    // Shadowing unrelated variables warning
#![warn(clippy::too_many_arguments)]  // Limit function arguments
#![warn(clippy::cognitive_complexity)] // Limit cognitive complexity

// Safety and robustness lints
#![deny(overflowing_literals)]        // Overflowing literals are forbidden
#![deny(arithmetic_overflow)]         // Arithmetic overflow is forbidden

// ============================================================================
// Crate Documentation
// ============================================================================

//! # Pillar CI Tools
//!
//! Helpers for continuous-integration workflows that validate pull requests
//! against environment-scoped pillar data.
//!
//! ## Overview
//!
//! A pull request moves pillar from a target environment (usually `base`)
//! to an incoming environment (e.g. `dev.<change_id>`). For every host the
//! tools:
//!
//! 1. **Resolve** the rendered pillar under both environments
//! 2. **Diff** the two trees into added, removed and changed keys
//! 3. **Report** the deltas grouped by host and top-level namespace
//!
//! Hosts without differences are left out of the report.
//!
//! ## Modules
//!
//! - [`tree`]: Pillar value model
//! - [`diff`]: Structural tree diff
//! - [`report`]: Report aggregation and rendering
//! - [`source`]: Pillar sources (rendered directories, snapshots)
//! - [`validator`]: Per-host validation runs
//! - [`config`]: Settings and pillar document parsing
//! - [`cli`]: Command-line interface
//!
//! ## Example
//!
//! ```
//! use pillar_citools::{ConfigTree, ReportRenderer, diff};
//!
//! let base = ConfigTree::new().with("ghar", ConfigTree::new());
//! let incoming = ConfigTree::new().with(
//!     "ghar",
//!     ConfigTree::new().with("testing_key01", "x"),
//! );
//!
//! let deltas = diff(&base, &incoming).expect("supported values");
//! let report = ReportRenderer::new().render(vec![("ghar01.tkclabs.io", deltas)]);
//! assert!(report.text.contains("testing_key01: added"));
//! ```

// ============================================================================
// Modules
// ============================================================================

pub mod cli;
pub mod config;
pub mod diff;
pub mod error;
pub mod report;
pub mod source;
pub mod tree;
pub mod validator;

// ============================================================================
// Re-exports
// ============================================================================

pub use cli::{Cli, Commands, OutputFormatter};
pub use config::{ConfigParser, ConfigValidator, ToolConfig};
pub use diff::{Delta, DiffEngine, KeyPath, diff};
pub use error::{CitoolsError, Result};
pub use report::{HostReport, RenderedReport, ReportRenderer, StructuredReport, ValidationResult};
pub use source::{DirectorySource, PillarSource, SnapshotSource};
pub use tree::{ConfigTree, ConfigValue, Scalar};
pub use validator::PrValidator;
