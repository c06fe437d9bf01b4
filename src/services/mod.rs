//! Service layer containing the comparison pipeline and its collaborators.
//!
//! ## Service map
//! - `parser.rs` — XML reader, document field extraction, input digests.
//! - `discovery.rs` — data directory iteration with skip-and-continue.
//! - `walker.rs` — pre-order flattening of a form subtree.
//! - `differ.rs` — tag/text/attribute symmetric differences.
//! - `locator.rs` — root-to-node paths and representative-node lookup.
//! - `reporter.rs` — difference sets to located records.
//! - `compare.rs` — precondition gate + full pipeline.
//! - `config.rs` — TOML config with defaults.
//! - `output.rs` — JSON/text output helpers.
//!
//! ## Conventions
//! - Prefer pure helpers where possible.
//! - Side effects should be explicit and localized.
//! - Keep command handlers thin; delegate to services.

pub mod compare;
pub mod config;
pub mod differ;
pub mod discovery;
pub mod locator;
pub mod output;
pub mod parser;
pub mod reporter;
pub mod walker;
