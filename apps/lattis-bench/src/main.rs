//! Recall/latency benchmark driver.
//!
//! Builds an exploration graph over a benchmark corpus, then sweeps the
//! configured eps grid over the query set, reporting recall against ground
//! truth plus per-query latency and distance-evaluation counts. Missing
//! ground-truth files are computed on the fly with the brute-force index.

mod config;

use config::BenchConfig;
use lattis_data::{recall_at_k, Dataset, DatasetName, Metric};
use lattis_graph::ExplorationGraph;
use lattis_vector::{BruteForceIndex, DistanceFunction};
use std::time::Instant;
use tracing::{info, warn};

fn main() -> Result<(), Box<dyn std::error::Error>> {
    tracing_subscriber::fmt()
        .with_max_level(tracing::Level::INFO)
        .init();

    let config_path = std::env::args()
        .nth(1)
        .unwrap_or_else(|| "lattis-bench.yaml".to_string());

    let config = if std::path::Path::new(&config_path).exists() {
        info!("loading configuration from {}", config_path);
        BenchConfig::load_from_file(&config_path)?
    } else {
        warn!("config file not found, loading from environment variables");
        BenchConfig::load_from_env()?
    };

    let name: DatasetName = config.dataset.parse()?;
    let dataset = Dataset::new(name, &config.data_root);
    let distance = match dataset.info().metric {
        Metric::L2 => DistanceFunction::Euclidean,
        Metric::Cosine => DistanceFunction::Cosine,
        Metric::InnerProduct => DistanceFunction::InnerProduct,
    };

    let base = dataset.load_base(config.half_base)?;
    let mut queries = dataset.load_queries()?;
    if let Some(max) = config.max_queries {
        queries.truncate(max);
    }
    let dims = dataset.info().dims;

    // Build.
    let started = Instant::now();
    let graph = match config.seed {
        Some(seed) => {
            ExplorationGraph::with_seed(dims, distance, config.graph.clone(), seed)?
        }
        None => ExplorationGraph::new(dims, distance, config.graph.clone())?,
    };
    for (i, vector) in base.iter().enumerate() {
        graph.insert(vector)?;
        if (i + 1) % 100_000 == 0 {
            info!(inserted = i + 1, "build progress");
        }
    }
    let insert_secs = started.elapsed().as_secs_f64();

    let improve_started = Instant::now();
    let mut committed = 0usize;
    for _ in 0..config.improve_rounds {
        if graph.improve_once()? {
            committed += 1;
        }
    }
    info!(
        nodes = graph.len(),
        insert_secs = format!("{:.1}", insert_secs),
        improve_rounds = config.improve_rounds,
        swaps_committed = committed,
        improve_secs = format!("{:.1}", improve_started.elapsed().as_secs_f64()),
        connected = graph.is_connected(),
        "graph built"
    );

    let ground_truth = load_or_compute_groundtruth(&dataset, &config, &base, &queries, distance)?;

    // Sweep.
    for &eps in &config.eps_grid {
        let mut results = Vec::with_capacity(queries.len());
        let mut distance_evals = 0usize;
        let started = Instant::now();
        for query in &queries {
            let (neighbors, stats) = graph.search_with_stats(query, config.k, eps)?;
            distance_evals += stats.distance_evals;
            results.push(neighbors.iter().map(|n| n.id).collect::<Vec<u32>>());
        }
        let elapsed = started.elapsed();

        let recall = recall_at_k(&results, &ground_truth, config.k);
        info!(
            eps,
            k = config.k,
            recall = format!("{:.4}", recall),
            mean_latency_us =
                format!("{:.1}", elapsed.as_micros() as f64 / queries.len() as f64),
            mean_distance_evals = distance_evals / queries.len().max(1),
            "sweep point"
        );
    }

    Ok(())
}

/// Load the precomputed ground truth; fall back to brute force when the
/// file is absent.
fn load_or_compute_groundtruth(
    dataset: &Dataset,
    config: &BenchConfig,
    base: &[Vec<f32>],
    queries: &[Vec<f32>],
    distance: DistanceFunction,
) -> Result<Vec<Vec<u32>>, Box<dyn std::error::Error>> {
    match dataset.load_groundtruth(config.k, config.half_base) {
        Ok(mut rows) => {
            rows.truncate(queries.len());
            Ok(rows)
        }
        Err(err) => {
            warn!(%err, "ground truth unavailable, computing by brute force");

            let oracle = BruteForceIndex::new(dataset.info().dims, distance);
            for vector in base {
                oracle.push(vector)?;
            }

            let started = Instant::now();
            let mut rows = Vec::with_capacity(queries.len());
            for query in queries {
                let mut ids: Vec<u32> = oracle
                    .search(query, config.k)?
                    .iter()
                    .map(|n| n.id)
                    .collect();
                ids.sort_unstable();
                rows.push(ids);
            }
            info!(
                queries = rows.len(),
                secs = format!("{:.1}", started.elapsed().as_secs_f64()),
                "brute-force ground truth computed"
            );
            Ok(rows)
        }
    }
}
