//! Link-file loader.
//!
//! Source format: one record per line, `<source>;<target1>,<target2>,...`.
//! A line with no semicolon (or an empty target list) describes a document
//! with zero outlinks. Malformed records are tolerated, never fatal; the
//! only fatal failure is an unreadable source, which aborts the load before
//! any partial graph escapes.

use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

use tracing::{info, warn};

use crate::graph::LinkGraph;

#[derive(Debug, thiserror::Error)]
pub enum LoadError {
    #[error("failed to read link file: {0}")]
    Io(#[from] std::io::Error),
}

/// Loader settings.
#[derive(Debug, Clone, Copy)]
pub struct LoaderConfig {
    /// Upper bound on distinct documents. Once reached, no further input is
    /// consumed and the partial graph is returned with `truncated` set.
    pub max_docs: usize,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            max_docs: 2_000_000,
        }
    }
}

/// A populated graph plus how the load ended.
///
/// Callers must size score vectors from `graph.node_count()`, not from the
/// configured capacity.
#[derive(Debug)]
pub struct LoadedGraph {
    pub graph: LinkGraph,
    /// True when the document capacity stopped the load early.
    pub truncated: bool,
}

/// Read a link file from disk.
pub fn load_link_file(path: &Path, config: LoaderConfig) -> Result<LoadedGraph, LoadError> {
    let file = File::open(path)?;
    parse_links(BufReader::new(file), config)
}

/// Parse a line-oriented link listing.
///
/// Index assignment is strict first-occurrence order: a line's source is
/// interned before its targets, targets left to right. Duplicate targets on
/// a line do not inflate the source's out-degree. When the capacity bound is
/// hit, the remaining input is not consumed (matching the sized-table
/// behavior the format was designed for).
pub fn parse_links<R: BufRead>(reader: R, config: LoaderConfig) -> Result<LoadedGraph, LoadError> {
    let mut graph = LinkGraph::new();

    for line in reader.lines() {
        let line = line?;
        if graph.node_count() >= config.max_docs {
            break;
        }
        let line = line.strip_suffix('\r').unwrap_or(&line);
        if line.is_empty() {
            continue;
        }

        let (source, targets) = match line.split_once(';') {
            Some((source, targets)) => (source, Some(targets)),
            None => (line, None),
        };
        let from = graph.intern(source);

        let Some(targets) = targets else {
            continue;
        };
        for token in targets.split(',') {
            if token.is_empty() {
                continue;
            }
            if graph.node_count() >= config.max_docs {
                break;
            }
            let to = graph.intern(token);
            graph.add_link(from, to);
        }
    }

    let truncated = graph.node_count() >= config.max_docs;
    if truncated {
        warn!(
            documents = graph.node_count(),
            max_docs = config.max_docs,
            "document capacity reached, load stopped early"
        );
    }
    info!(
        documents = graph.node_count(),
        edges = graph.edge_count(),
        sinks = graph.sink_count(),
        "link file loaded"
    );

    Ok(LoadedGraph { graph, truncated })
}
