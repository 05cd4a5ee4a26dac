//! Provides input/output functionality for structure and alignment files.
//!
//! Structure formats implement the [`traits::StructureFile`] trait so that
//! callers can read from any `BufRead` source or from a path. Readers are
//! lenient: records that can be skipped without losing the rest of the file
//! are reported as [`traits::ParseWarning`] values in the returned metadata,
//! while malformed required fields abort the read.

pub mod pdb;
pub mod pir;
pub mod traits;
