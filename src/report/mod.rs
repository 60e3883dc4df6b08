//! Validation reports.
//!
//! This module groups per-host deltas by namespace and renders them as the
//! indented text report and as a structured report.

mod render;
mod types;

pub use render::{ChangeEntry, RenderedReport, ReportRenderer, StructuredReport};
pub use types::{HostFailure, HostReport, NamespaceReport, ValidationResult};
