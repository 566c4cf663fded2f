//! Shared test utilities for the add-on resolver workspace.
//!
//! This crate provides standardised fixtures for writing add-on manifest
//! trees to disk. It is a dev-dependency only and is never published.
//!
//! # Modules
//!
//! - [`manifest`]: [`ManifestToml`] builder for `addon.toml` content
//! - [`tree`]: [`ManifestTree`] temporary directory of add-on manifests

pub mod manifest;
pub mod tree;

pub use manifest::ManifestToml;
pub use tree::ManifestTree;
