//! KAGForge Context Engine
//!
//! Command-line front end:
//! - Loads the chunk corpus and the optional entity graph
//! - Solves a question into per-sub-question evidence
//! - Explains answer entities with a graph reasoning trace

use anyhow::Result;
use clap::Parser;
use kagforge_common::cache::ResolutionCache;
use kagforge_common::config::{AppConfig, ObservabilityConfig};
use kagforge_common::metrics::{register_metrics, SOLVE_BUCKETS};
use kagforge_common::models::SolvedStep;
use kagforge_common::VERSION;
use kagforge_context::Solver;
use kagforge_search::graph::{load_graph, EntityGraph};
use kagforge_search::index::{load_chunks_dir, SimilarityIndex, TfIdfIndex};
use kagforge_search::reasoning::{AnswerExplanation, EntityMatcher, GraphReasoner};
use kagforge_search::retrieval::{HybridIndex, MultiHopRetriever};
use metrics_exporter_prometheus::PrometheusBuilder;
use std::net::SocketAddr;
use std::path::PathBuf;
use std::sync::Arc;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Question to answer; read from stdin when omitted
    question: Vec<String>,

    /// Path to configuration file (overrides the layered config/ lookup)
    #[arg(short, long, env = "KAGFORGE_CONFIG")]
    config: Option<PathBuf>,

    /// Answer entities to explain, comma separated
    #[arg(long, value_delimiter = ',')]
    explain: Vec<String>,

    /// Also list the N most connected graph entities
    #[arg(long)]
    hubs: Option<usize>,

    /// Print results as JSON
    #[arg(long)]
    json: bool,
}

#[tokio::main]
async fn main() -> Result<()> {
    // Load environment variables
    dotenvy::dotenv().ok();
    let args = Args::parse();

    // Load configuration
    let config = match &args.config {
        Some(path) => AppConfig::from_file(&path.to_string_lossy())?,
        None => AppConfig::load()?,
    };

    init_tracing(&config.observability);
    info!(
        service = %config.observability.service_name,
        "Starting KAGForge Context Engine v{}", VERSION
    );

    if config.observability.metrics_port != 0 {
        let addr = SocketAddr::from(([0, 0, 0, 0], config.observability.metrics_port));
        PrometheusBuilder::new()
            .with_http_listener(addr)
            .set_buckets(SOLVE_BUCKETS)?
            .install()?;
        info!("Metrics exporter listening on {}", addr);
    }
    register_metrics();

    let question = if args.question.is_empty() {
        std::io::read_to_string(std::io::stdin())?
    } else {
        args.question.join(" ")
    };

    // Knowledge sources; either may be missing
    let index = build_index(&config);
    let graph = build_graph(&config);

    let sources = HybridIndex::new(index, graph.clone());
    info!(capability = sources.capability().as_str(), "Knowledge sources ready");

    let retriever =
        MultiHopRetriever::new(sources).with_alias_matching(config.retrieval.match_aliases);
    let mut solver = Solver::from_config(&config);

    let solved = solver
        .solve(&question, &retriever, config.retrieval.top_k, config.retrieval.hops)
        .await;

    let explanation = match (&graph, args.explain.is_empty()) {
        (Some(graph), false) => Some(explain(graph, &config, &args.explain)),
        (None, false) => {
            warn!("No entity graph configured, skipping explanation");
            None
        }
        _ => None,
    };

    if args.json {
        let report = serde_json::json!({
            "session_id": solver.session_id(),
            "steps": solved,
            "explanation": explanation,
        });
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        print_steps(&solved);
        if let Some(explanation) = &explanation {
            print_explanation(explanation);
        }
    }

    if let (Some(graph), Some(top_n)) = (&graph, args.hubs) {
        for (id, degree) in graph.degree_centrality(top_n) {
            println!("hub {} (degree {})", id, degree);
        }
    }

    info!("Context engine finished");
    Ok(())
}

/// Install the global subscriber; `RUST_LOG` overrides the configured level
fn init_tracing(config: &ObservabilityConfig) {
    let filter =
        EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(&config.log_level));
    let builder = tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_target(true)
        .with_writer(std::io::stderr);

    if config.json_logging {
        builder.json().init();
    } else {
        builder.pretty().init();
    }
}

fn build_index(config: &AppConfig) -> Option<Arc<dyn SimilarityIndex>> {
    let chunks = match load_chunks_dir(&config.data.chunks_dir, &config.data.chunk_delimiter) {
        Ok(chunks) => chunks,
        Err(e) => {
            warn!(error = %e, "Failed to load corpus, similarity search disabled");
            return None;
        }
    };

    match TfIdfIndex::from_chunks(&chunks) {
        Ok(index) => {
            let index: Arc<dyn SimilarityIndex> =
                Arc::new(index.with_min_score(config.index.min_score));
            Some(index)
        }
        Err(e) => {
            warn!(error = %e, "Similarity search disabled");
            None
        }
    }
}

fn build_graph(config: &AppConfig) -> Option<Arc<EntityGraph>> {
    let path = config.data.graph_path.as_ref()?;
    match load_graph(path) {
        Ok(graph) => Some(Arc::new(graph)),
        Err(e) => {
            warn!(path = %path, error = %e, "Failed to load entity graph, hop expansion disabled");
            None
        }
    }
}

fn explain(graph: &EntityGraph, config: &AppConfig, candidates: &[String]) -> AnswerExplanation {
    let reasoner = GraphReasoner::new(graph).with_max_path_hops(config.reasoning.max_path_hops);
    let matcher = EntityMatcher::new(graph, &config.matcher)
        .with_alias_matching(config.retrieval.match_aliases);
    let mut cache = ResolutionCache::new();
    matcher.explain_with_fallback(&reasoner, candidates, &mut cache)
}

fn print_steps(solved: &[SolvedStep]) {
    for (n, step) in solved.iter().enumerate() {
        println!("Q{}: {}", n + 1, step.sub_question);
        for passage in &step.context {
            println!("  - {}", passage);
        }
    }
}

fn print_explanation(explanation: &AnswerExplanation) {
    println!("{}", explanation.trace);
    for suggestion in &explanation.suggestions {
        let in_graph = explanation
            .present
            .iter()
            .any(|id| id.as_str() == suggestion.candidate);
        let status = if in_graph { "in graph" } else { "not in graph" };
        println!(
            "  '{}' ({}), did you mean '{}' ({:.2})",
            suggestion.candidate, status, suggestion.node, suggestion.score
        );
    }
}
