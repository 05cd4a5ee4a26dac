//! # Workflows Module
//!
//! High-level entry points that tie [`crate::core`] and [`crate::engine`]
//! together into complete procedures.
//!
//! ## Overview
//!
//! Each workflow takes its configuration and a
//! [`ProgressReporter`](crate::engine::progress::ProgressReporter) explicitly
//! and owns the structures it works on for the duration of the call.
//!
//! - **Annotation** ([`annotate`]) - Parse, scan, resolve and write disulfide annotations
//! - **Coverage** ([`coverage`]) - Per-chain gap reports and quality summaries for one or many files
//! - **Comparative modeling** ([`modeling`]) - Boundary to an external modeling engine,
//!   restraint strategy and score-based model ranking
//! - **Molecular dynamics** ([`dynamics`]) - Boundary to an external MD engine and its
//!   mobility descriptor files
//!
//! The external engines are traits; this crate ships no implementation of them.

pub mod annotate;
pub mod coverage;
pub mod dynamics;
pub mod modeling;
