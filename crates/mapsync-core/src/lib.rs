//! # mapsync-core
//!
//! Core library for the mapsync asset pipeline.
//!
//! This library unzips downloaded asset archives, prunes junk entries,
//! mirrors the extracted tree into a directory of symbolic links with
//! cleaned-up names, and writes a manifest of the mirror.

#![warn(missing_docs)]
#![warn(clippy::all)]

/// Core error types for the mapsync library
pub mod error {
    /// Result type alias using `anyhow::Error`
    pub type Result<T> = anyhow::Result<T>;
}

/// Archive extraction
pub mod archive;

/// Configuration file parsing, merging, validation and directory layout
pub mod config;

/// Browser download helper generation
pub mod helper;

/// Manifest building and diffing
pub mod manifest;

/// Path name normalization
pub mod normalize;

/// Stage orchestration for one or more categories
pub mod pipeline;

/// Junk file pruning
pub mod prune;

/// Symbolic link tree synchronization
pub mod sync;
