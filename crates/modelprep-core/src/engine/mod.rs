//! # Engine Module
//!
//! Derivation logic that works on the record models of [`crate::core`]:
//! inferring disulfide bonds, writing them back as annotations, and
//! measuring how complete a structure is.
//!
//! ## Overview
//!
//! Every operation here is synchronous and takes its inputs explicitly. The
//! only function that mutates a structure is [`annotation::annotate`]; the
//! rest read a [`Structure`](crate::core::models::structure::Structure) and
//! return new values.
//!
//! ## Architecture
//!
//! - **Configuration** ([`config`]) - Search parameters, resolution policy and their builder
//! - **Bond inference** ([`disulfide`]) - Candidate generation and greedy conflict resolution
//! - **Annotation** ([`annotation`]) - Linkage and connectivity record synthesis
//! - **Coverage** ([`coverage`]) - Missing-residue runs and completeness per chain
//! - **Quality** ([`quality`]) - Backbone completeness and coordinate sanity checks
//! - **Sequences** ([`sequence`]) - One-letter chain sequences, FASTA and alignment blocks
//! - **Reports** ([`report`]) - CSV rows for bonds, rejections and gaps
//! - **Progress Monitoring** ([`progress`]) - Callback-based progress events
//! - **Error Handling** ([`error`]) - The engine error taxonomy

pub mod annotation;
pub mod config;
pub mod coverage;
pub mod disulfide;
pub mod error;
pub mod progress;
pub mod quality;
pub mod report;
pub mod sequence;
