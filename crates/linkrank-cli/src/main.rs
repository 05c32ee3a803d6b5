//! Linkrank CLI
//!
//! Loads a line-oriented link file, runs the selected PageRank estimator,
//! and writes the top-ranked documents to a report file
//! (`page_rank_<method>.txt` unless overridden).

use std::path::PathBuf;

use anyhow::{anyhow, Result};
use clap::Parser;
use colored::Colorize;
use tracing::info;
use tracing_subscriber::EnvFilter;

use linkrank_engine::{
    default_report_filename, estimate, render_text, top_entries, write_report, EstimatorConfig,
    Method, PowerIterationConfig, RankReportV1, RunDetail, RANK_REPORT_VERSION,
};
use linkrank_graph::{load_link_file, LoaderConfig};

#[derive(Parser)]
#[command(name = "linkrank")]
#[command(author, version, about = "PageRank estimation over a link graph")]
struct Cli {
    /// Link file: one `<doc>;<target1>,<target2>,...` record per line.
    links: PathBuf,

    /// Estimator: `s` for exact power iteration, `mc1`..`mc5` for the Monte
    /// Carlo variants. Unrecognized tokens fall back to `s`.
    #[arg(default_value = "s")]
    method: String,

    /// Number of entries in the ranked report.
    #[arg(long, default_value_t = 60)]
    top: usize,

    /// RNG seed for the Monte Carlo estimators (deterministic).
    #[arg(long, default_value_t = 1)]
    seed: u64,

    /// Walks started from every node by the cyclic-start estimators
    /// (mc2/mc3/mc4).
    #[arg(long, default_value_t = 100)]
    walks_per_node: u64,

    /// Total walks for the random-start estimators (mc1/mc5); defaults to
    /// the loaded node count.
    #[arg(long)]
    walks: Option<u64>,

    /// Maximum number of distinct documents accepted by the loader.
    #[arg(long, default_value_t = 2_000_000)]
    max_docs: usize,

    /// Output report path (defaults to `page_rank_<method>.<ext>` in the
    /// working directory).
    #[arg(short, long)]
    out: Option<PathBuf>,

    /// Output format: text|json
    #[arg(long, default_value = "text")]
    format: String,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    let json = match cli.format.to_ascii_lowercase().as_str() {
        "text" => false,
        "json" => true,
        other => return Err(anyhow!("unknown --format `{other}` (expected text|json)")),
    };

    let method = Method::parse(&cli.method).unwrap_or_else(|| {
        eprintln!(
            "{} unknown method `{}`, falling back to exact power iteration",
            "warning:".yellow().bold(),
            cli.method
        );
        Method::Power
    });

    let loaded = load_link_file(
        &cli.links,
        LoaderConfig {
            max_docs: cli.max_docs,
        },
    )?;
    let graph = loaded.graph;
    if loaded.truncated {
        eprintln!(
            "{} document capacity reached, ranking the {} documents loaded",
            "warning:".yellow().bold(),
            graph.node_count()
        );
    }

    let config = EstimatorConfig {
        seed: cli.seed,
        walks_per_node: cli.walks_per_node,
        walks: cli.walks,
        power: PowerIterationConfig::default(),
    };
    let run = estimate(&graph, method, &config);
    match run.detail {
        RunDetail::Exact {
            iterations,
            converged,
        } => info!(iterations, converged, "power iteration finished"),
        RunDetail::Sampled { walks, visits } => info!(walks, visits, "walk simulation finished"),
    }

    let entries = top_entries(&graph, &run.scores, cli.top);
    let contents = if json {
        let (iterations, converged, walks, visits) = match run.detail {
            RunDetail::Exact {
                iterations,
                converged,
            } => (Some(iterations), Some(converged), None, None),
            RunDetail::Sampled { walks, visits } => (None, None, Some(walks), Some(visits)),
        };
        let report = RankReportV1 {
            version: RANK_REPORT_VERSION.to_string(),
            input: cli.links.display().to_string(),
            method: method.token().to_string(),
            node_count: graph.node_count(),
            sink_count: graph.sink_count(),
            iterations,
            converged,
            walks,
            visits,
            entries,
        };
        let mut json = serde_json::to_string_pretty(&report)?;
        json.push('\n');
        json
    } else {
        render_text(&entries)
    };

    let out_path = cli
        .out
        .unwrap_or_else(|| PathBuf::from(default_report_filename(method.token(), json)));
    match write_report(&out_path, &contents) {
        Ok(()) => println!("wrote {}", out_path.display()),
        Err(err) => {
            // The scores are already computed; a report-write failure must
            // not lose them.
            eprintln!("{} {err}", "error:".red().bold());
            print!("{contents}");
        }
    }

    Ok(())
}
