//! Turn a GenBank-style NDJSON feed into curated metadata and sequence files.
//!
//! # Overview
//! Each line of the feed is one JSON object describing a sequenced sample. A run reads the feed,
//! curates every record, keeps one record per strain, and writes:
//! * a metadata TSV with a fixed column list,
//! * a FASTA file with one sequence per metadata row, in the same order,
//! * a problem TSV with the records that need a curator.
//!
//! ## Graph API
//! Curation is a [`Graph`](graph::Graph) of ops (rename fields, standardize dates, parse the
//! geography, apply geo rules, etc.). Records are pulled through the graph one at a time, so the
//! feed never has to fit in memory.
//!
//! See [`graph`] for all supported ops, and [`pipeline::run`] for the full transform.
//!
//! ## Records
//! A [`Record`] is a JSON object together with the feed line it came from. A null field means the
//! value is unknown, while an empty string means it is known to be blank. The distinction
//! survives until the output, where nulls become empty cells and missing fields become the
//! placeholder.
//!
//! ## Two passes
//! By default sequences are dropped after the first pass has measured them, and read again from
//! the feed only for the records that survived. This keeps memory bounded by the metadata. With
//! `sorted_fasta` set, sequences stay in memory and both outputs are written sorted by strain.

pub mod annotations;
pub mod config;
pub mod errors;
pub mod geo_rules;
pub mod graph;
pub mod pipeline;
pub mod reconcile;
pub mod state_codes;
pub mod writers;

mod parse_utils;
mod patterns;
mod record;

// commonly used functions and types

pub use crate::config::Config;
pub use crate::patterns::*;
pub use crate::pipeline::{run, Summary};
pub use crate::record::*;
