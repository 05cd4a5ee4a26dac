//! # modelprep Core Library
//!
//! Preparation and cross-validation of the structure and alignment files that
//! drive external homology-modeling and molecular-dynamics engines.
//!
//! ## Architectural Philosophy
//!
//! The library follows a strict three-layer architecture.
//!
//! - **[`core`]: The Foundation.** Stateless record models for structures
//!   (`Structure`) and alignments (`AlignmentSet`), the fixed-column and
//!   alignment file formats, the region-preference mini-language, and residue
//!   tables.
//!
//! - **[`engine`]: The Logic Core.** Disulfide candidate generation and
//!   resolution, synthesis of `SSBOND`/`CONECT` annotations, coverage and
//!   quality analysis, sequence extraction and CSV reports.
//!
//! - **[`workflows`]: The Public API.** Complete procedures built from the two
//!   layers below, plus the boundaries to the external modeling and MD engines.

pub mod core;
pub mod engine;
pub mod workflows;
