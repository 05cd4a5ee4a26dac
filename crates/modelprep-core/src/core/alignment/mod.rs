//! # Alignment Module
//!
//! Record model for multi-sequence alignments that drive an external
//! comparative-modeling engine.
//!
//! ## Overview
//!
//! An alignment file is a sequence of named blocks. Each block is classified as
//! the single target (the sequence to model) or as a template structure. The
//! classification heuristics live in [`classify`] as pure functions so that the
//! rule chain can be tested on its own; [`set::AlignmentSet`] applies them and
//! enforces that exactly one target and at least one template exist.
//!
//! [`region`] holds the small `start-end:template[:weight]` language used to
//! express per-region template preferences. Preferences are hints passed on to
//! the modeling engine and are never enforced here.
//!
//! Reading and writing the on-disk format is handled by
//! [`crate::core::io::pir`].

pub mod classify;
pub mod entry;
pub mod region;
pub mod set;
