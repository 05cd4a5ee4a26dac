//! # Core Module
//!
//! This module provides the stateless building blocks of modelprep: the data
//! model of a structure file, the alignment record model, file formats, and
//! residue-level lookup tables.
//!
//! ## Architecture
//!
//! - **Structure Representation** ([`models`]) - Atoms, residues, chains and the record layout of a file
//! - **Alignments** ([`alignment`]) - Alignment entries, role classification and region preferences
//! - **File I/O** ([`io`]) - Fixed-column structure files and PIR alignments
//! - **Utilities** ([`utils`]) - Residue-name tables and geometric helpers
//!
//! Nothing in this module derives new information from a structure; that is the
//! job of [`crate::engine`].

pub mod alignment;
pub mod io;
pub mod models;
pub mod utils;
