//! Ranked score reports.

use std::path::Path;

use linkrank_graph::{DocId, LinkGraph};
use serde::{Deserialize, Serialize};

use crate::score::ScoreVector;

#[derive(Debug, thiserror::Error)]
pub enum ReportError {
    #[error("failed to write score report: {0}")]
    Io(#[from] std::io::Error),
}

/// One report row.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankedEntryV1 {
    pub rank: usize,
    pub name: String,
    pub score: f64,
}

/// Versioned report wrapper for the JSON output format.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RankReportV1 {
    pub version: String,
    pub input: String,
    pub method: String,
    pub node_count: usize,
    pub sink_count: usize,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub iterations: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub converged: Option<bool>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub walks: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub visits: Option<u64>,
    pub entries: Vec<RankedEntryV1>,
}

pub const RANK_REPORT_VERSION: &str = "page_rank_v1";

/// The top `k` documents by score, descending. Ties keep index order (the
/// sort is stable), and at most `node_count` entries come back.
pub fn top_entries(graph: &LinkGraph, scores: &ScoreVector, k: usize) -> Vec<RankedEntryV1> {
    let mut ranked: Vec<(DocId, f64)> = (0..graph.node_count() as DocId)
        .map(|doc| (doc, scores.get(doc)))
        .collect();
    ranked.sort_by(|a, b| b.1.partial_cmp(&a.1).unwrap_or(std::cmp::Ordering::Equal));
    ranked
        .into_iter()
        .take(k)
        .enumerate()
        .map(|(i, (doc, score))| RankedEntryV1 {
            rank: i + 1,
            name: graph.name(doc).unwrap_or_default().to_string(),
            score,
        })
        .collect()
}

/// Render the plain-text format: one `"<rank>: <name> <score>"` line per
/// entry.
pub fn render_text(entries: &[RankedEntryV1]) -> String {
    let mut out = String::new();
    for entry in entries {
        out.push_str(&format!("{}: {} {}\n", entry.rank, entry.name, entry.score));
    }
    out
}

/// Report filename derived from the estimator token.
pub fn default_report_filename(token: &str, json: bool) -> String {
    let ext = if json { "json" } else { "txt" };
    format!("page_rank_{token}.{ext}")
}

pub fn write_report(path: &Path, contents: &str) -> Result<(), ReportError> {
    std::fs::write(path, contents)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use linkrank_graph::{parse_links, LoaderConfig};

    fn graph_from(input: &str) -> LinkGraph {
        parse_links(input.as_bytes(), LoaderConfig::default())
            .expect("parse")
            .graph
    }

    #[test]
    fn emits_at_most_node_count_entries() {
        let graph = graph_from("a;b\nb;c\nc;d\nd;e\ne;a\n");
        let scores = ScoreVector::from_vec(vec![0.1, 0.3, 0.2, 0.25, 0.15]);
        let entries = top_entries(&graph, &scores, 60);
        assert_eq!(entries.len(), 5);
        assert_eq!(entries[0].name, "b");
        assert_eq!(entries[0].rank, 1);
        assert!(entries.windows(2).all(|w| w[0].score >= w[1].score));
    }

    #[test]
    fn ties_keep_index_order() {
        let graph = graph_from("a;b\nb;a\nc;a\n");
        let scores = ScoreVector::from_vec(vec![0.4, 0.3, 0.3]);
        let entries = top_entries(&graph, &scores, 3);
        assert_eq!(entries[1].name, "b");
        assert_eq!(entries[2].name, "c");
    }

    #[test]
    fn text_format_is_rank_name_score() {
        let entries = vec![
            RankedEntryV1 {
                rank: 1,
                name: "b".to_string(),
                score: 0.5,
            },
            RankedEntryV1 {
                rank: 2,
                name: "a".to_string(),
                score: 0.25,
            },
        ];
        assert_eq!(render_text(&entries), "1: b 0.5\n2: a 0.25\n");
    }

    #[test]
    fn report_filenames_follow_the_token() {
        assert_eq!(default_report_filename("mc3", false), "page_rank_mc3.txt");
        assert_eq!(default_report_filename("s", true), "page_rank_s.json");
    }

    #[test]
    fn writes_report_to_disk() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("page_rank_s.txt");
        write_report(&path, "1: a 0.5\n").expect("write");
        assert_eq!(std::fs::read_to_string(&path).expect("read"), "1: a 0.5\n");
    }

    #[test]
    fn unwritable_path_reports_io_error() {
        let dir = tempfile::tempdir().expect("tempdir");
        let path = dir.path().join("missing-dir").join("report.txt");
        let err = write_report(&path, "x").unwrap_err();
        assert!(matches!(err, ReportError::Io(_)));
    }

    #[test]
    fn json_report_round_trips() {
        let report = RankReportV1 {
            version: RANK_REPORT_VERSION.to_string(),
            input: "links.txt".to_string(),
            method: "mc1".to_string(),
            node_count: 2,
            sink_count: 1,
            iterations: None,
            converged: None,
            walks: Some(100),
            visits: Some(100),
            entries: vec![RankedEntryV1 {
                rank: 1,
                name: "a".to_string(),
                score: 0.75,
            }],
        };
        let json = serde_json::to_string_pretty(&report).expect("serialize");
        let back: RankReportV1 = serde_json::from_str(&json).expect("deserialize");
        assert_eq!(back.method, "mc1");
        assert_eq!(back.entries.len(), 1);
        assert!(json.contains("\"walks\": 100"));
        assert!(!json.contains("iterations"));
    }
}
