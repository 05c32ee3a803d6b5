//! Sparse directed link-graph store and loader.
//!
//! A [`LinkGraph`] is an explicit value owned by the caller: the loader
//! populates one, the estimators read it, nothing mutates it in between.
//! Documents are interned to dense `u32` ids in strict first-seen order, so
//! every downstream score vector is a plain dense array indexed by
//! [`DocId`].

pub mod graph;
pub mod loader;

pub use graph::{DocId, LinkGraph};
pub use loader::{load_link_file, parse_links, LoadError, LoadedGraph, LoaderConfig};
