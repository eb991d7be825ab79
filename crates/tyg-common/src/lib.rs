//! Common types and utilities for the tyg annotation fixer.
//!
//! This crate provides foundational types used across all tyg crates:
//! - Type-checker diagnostics (`Diagnostic`, `DiagnosticCategory`, `Severity`)
//! - The diagnostic line parser (`DiagnosticParser`)
//! - Source locations (`Location`)
//! - Centralized limits and thresholds

// Diagnostic records, categorization and the line parser
pub mod diagnostics;
pub use diagnostics::{
    Diagnostic, DiagnosticCategory, DiagnosticContext, DiagnosticParser, Severity,
};

// Centralized limits and thresholds
pub mod limits;

// Line/column source locations
pub mod position;
pub use position::Location;
