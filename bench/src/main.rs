use std::collections::HashSet;
use std::path::PathBuf;
use std::time::Instant;

use anyhow::{ensure, Context, Result};
use clap::{Parser, ValueEnum};
use graph_adt_core::{GraphConfig, UndirectedGraph, Weight};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};
use tracing_subscriber::EnvFilter;

/// Timed stress run over an undirected graph: bulk insert, edge churn,
/// vertex removal, copy and clear, checking postconditions after each phase.
#[derive(Debug, Parser)]
#[command(name = "graph-adt-bench", version)]
struct Cli {
    /// Run the pipeline up to and including this phase.
    #[arg(value_enum, default_value_t = Phase::All)]
    phase: Phase,

    #[arg(long)]
    vertices: Option<u32>,

    #[arg(long)]
    edges: Option<u32>,

    #[arg(long)]
    seed: Option<u64>,

    #[arg(long, value_enum)]
    topology: Option<Topology>,

    /// JSON file with a `StressConfig`; flags override its values.
    #[arg(long)]
    config: Option<PathBuf>,

    /// Skip the full invariant scan after each phase (it is O(V + E·deg)).
    #[arg(long)]
    skip_invariants: bool,

    /// Print a JSON report instead of the table.
    #[arg(long)]
    json: bool,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, ValueEnum, Serialize)]
#[serde(rename_all = "kebab-case")]
enum Phase {
    Insert,
    Edges,
    RemoveEdges,
    RemoveVertices,
    Copy,
    Clear,
    All,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, ValueEnum, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
enum Topology {
    /// Edge i joins i mod n and (i + 1) mod n.
    Ring,
    /// Uniform random endpoints.
    Random,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(default)]
struct StressConfig {
    vertices: u32,
    edges: u32,
    seed: u64,
    topology: Topology,
    graph: GraphConfig,
}

impl Default for StressConfig {
    fn default() -> Self {
        Self {
            vertices: 10_000,
            edges: 50_000,
            seed: 42,
            topology: Topology::Ring,
            graph: GraphConfig::default(),
        }
    }
}

impl StressConfig {
    fn load(cli: &Cli) -> Result<Self> {
        let mut config = match &cli.config {
            Some(path) => {
                let content = std::fs::read_to_string(path)
                    .with_context(|| format!("Failed to read {}", path.display()))?;
                serde_json::from_str(&content)
                    .with_context(|| format!("Failed to parse {}", path.display()))?
            }
            None => StressConfig::default(),
        };
        if let Some(v) = cli.vertices {
            config.vertices = v;
        }
        if let Some(e) = cli.edges {
            config.edges = e;
        }
        if let Some(s) = cli.seed {
            config.seed = s;
        }
        if let Some(t) = cli.topology {
            config.topology = t;
        }
        ensure!(config.vertices >= 2, "need at least 2 vertices");
        Ok(config)
    }
}

#[derive(Debug, Serialize)]
struct PhaseReport {
    phase: Phase,
    operations: usize,
    elapsed_ms: f64,
    vertex_count: usize,
    edge_count: usize,
}

#[derive(Debug, Serialize)]
struct Report<'a> {
    config: &'a StressConfig,
    phases: Vec<PhaseReport>,
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();
    let config = StressConfig::load(&cli)?;
    info!(
        vertices = config.vertices,
        edges = config.edges,
        seed = config.seed,
        "starting stress run"
    );

    let mut run = StressRun::new(&config, !cli.skip_invariants);
    let phases = [
        Phase::Insert,
        Phase::Edges,
        Phase::RemoveEdges,
        Phase::RemoveVertices,
        Phase::Copy,
        Phase::Clear,
    ];

    if !cli.json {
        println!("graph-adt-bench");
        println!("===============");
        println!();
        println!("{:>16} {:>12} {:>10} {:>10} {:>12}", "phase", "ops", "vertices", "edges", "time");
        println!("{:->16} {:->12} {:->10} {:->10} {:->12}", "", "", "", "", "");
    }

    let mut reports = Vec::new();
    for phase in phases.into_iter().filter(|p| *p <= cli.phase) {
        let report = run
            .run_phase(phase)
            .with_context(|| format!("phase {:?} failed", phase))?;
        if !cli.json {
            println!(
                "{:>16} {:>12} {:>10} {:>10} {:>10.1}ms",
                format!("{:?}", report.phase),
                report.operations,
                report.vertex_count,
                report.edge_count,
                report.elapsed_ms
            );
        }
        reports.push(report);
    }

    if cli.json {
        let report = Report {
            config: &config,
            phases: reports,
        };
        println!("{}", serde_json::to_string_pretty(&report)?);
    } else {
        println!();
        println!("All postconditions held.");
    }
    Ok(())
}

/// State carried between phases.
struct StressRun<'a> {
    config: &'a StressConfig,
    graph: UndirectedGraph<u32>,
    /// Edges successfully added and not yet removed, in insertion order.
    live_edges: Vec<(u32, u32)>,
    check_invariants: bool,
}

impl<'a> StressRun<'a> {
    fn new(config: &'a StressConfig, check_invariants: bool) -> Self {
        Self {
            config,
            graph: UndirectedGraph::with_config(config.graph),
            live_edges: Vec::new(),
            check_invariants,
        }
    }

    fn run_phase(&mut self, phase: Phase) -> Result<PhaseReport> {
        let t = Instant::now();
        let operations = match phase {
            Phase::Insert => self.insert()?,
            Phase::Edges => self.add_edges()?,
            Phase::RemoveEdges => self.remove_edges()?,
            Phase::RemoveVertices => self.remove_vertices()?,
            Phase::Copy => self.copy()?,
            Phase::Clear => self.clear()?,
            Phase::All => 0,
        };
        let elapsed_ms = t.elapsed().as_secs_f64() * 1000.0;

        if self.check_invariants {
            self.graph
                .check_invariants()
                .context("invariant check after phase")?;
        }
        debug!(?phase, elapsed_ms, "phase complete");

        Ok(PhaseReport {
            phase,
            operations,
            elapsed_ms,
            vertex_count: self.graph.vertex_count(),
            edge_count: self.graph.edge_count(),
        })
    }

    fn insert(&mut self) -> Result<usize> {
        let n = self.config.vertices;
        for v in 0..n {
            self.graph.add_vertex(v)?;
            ensure!(self.graph.contains_vertex(&v), "vertex {} missing after insert", v);
        }
        ensure!(
            self.graph.vertex_count() == n as usize,
            "expected {} vertices, found {}",
            n,
            self.graph.vertex_count()
        );
        Ok(n as usize)
    }

    fn add_edges(&mut self) -> Result<usize> {
        let n = self.config.vertices;
        let mut rng = FastRng::new(self.config.seed);
        let mut seen: HashSet<(u32, u32)> = self
            .live_edges
            .iter()
            .map(|&(a, b)| (a.min(b), a.max(b)))
            .collect();

        for i in 0..self.config.edges {
            let (a, b) = match self.config.topology {
                Topology::Ring => (i % n, (i + 1) % n),
                Topology::Random => (rng.next(n as u64) as u32, rng.next(n as u64) as u32),
            };
            let weight = (i % 100) as Weight / 10.0;

            let added = self.graph.add_edge(&a, &b, weight)?;
            let key = (a.min(b), a.max(b));
            let expected = a != b && !seen.contains(&key);
            ensure!(
                added == expected,
                "add_edge({}, {}) returned {}, expected {}",
                a,
                b,
                added,
                expected
            );
            if added {
                seen.insert(key);
                self.live_edges.push((a, b));
                ensure!(
                    self.graph.edge_weight(&a, &b) == Some(weight)
                        && self.graph.edge_weight(&b, &a) == Some(weight),
                    "edge {} <-> {} has wrong weight",
                    a,
                    b
                );
            }
        }
        self.expect_edges(self.live_edges.len())?;
        Ok(self.config.edges as usize)
    }

    fn remove_edges(&mut self) -> Result<usize> {
        let half = self.live_edges.len() / 2;
        let removed: Vec<(u32, u32)> = self.live_edges.drain(..half).collect();
        for &(a, b) in &removed {
            ensure!(self.graph.remove_edge(&a, &b), "edge {} <-> {} not removed", a, b);
            ensure!(
                !self.graph.contains_edge(&a, &b) && !self.graph.contains_edge(&b, &a),
                "edge {} <-> {} still present",
                a,
                b
            );
        }
        self.expect_edges(self.live_edges.len())?;
        Ok(removed.len())
    }

    fn remove_vertices(&mut self) -> Result<usize> {
        let cut = self.config.vertices / 2;
        for v in 0..cut {
            ensure!(self.graph.remove_vertex(&v), "vertex {} not removed", v);
            ensure!(!self.graph.contains_vertex(&v), "vertex {} still present", v);
        }
        self.live_edges.retain(|&(a, b)| a >= cut && b >= cut);

        ensure!(
            self.graph.vertex_count() == (self.config.vertices - cut) as usize,
            "expected {} vertices, found {}",
            self.config.vertices - cut,
            self.graph.vertex_count()
        );
        self.expect_edges(self.live_edges.len())?;
        Ok(cut as usize)
    }

    fn copy(&mut self) -> Result<usize> {
        let mut copy = UndirectedGraph::with_config(self.config.graph);
        copy.copy_from(&self.graph).context("copy of the stressed graph")?;
        ensure!(
            copy.vertex_count() == self.graph.vertex_count()
                && copy.edge_count() == self.graph.edge_count(),
            "copy counts differ from source"
        );
        for &(a, b) in &self.live_edges {
            ensure!(
                copy.edge_weight(&a, &b) == self.graph.edge_weight(&a, &b),
                "copy lost edge {} <-> {}",
                a,
                b
            );
        }

        // Mutating the copy must not reach the source.
        let victims: Vec<u32> = copy.vertices().copied().take(16).collect();
        for v in &victims {
            copy.remove_vertex(v);
        }
        for v in &victims {
            ensure!(self.graph.contains_vertex(v), "source lost vertex {}", v);
        }
        self.expect_edges(self.live_edges.len())?;
        Ok(self.graph.vertex_count())
    }

    fn clear(&mut self) -> Result<usize> {
        let vertices = self.graph.vertex_count();
        self.graph.clear();
        self.live_edges.clear();
        ensure!(self.graph.is_empty(), "graph not empty after clear");
        self.expect_edges(0)?;
        Ok(vertices)
    }

    fn expect_edges(&self, expected: usize) -> Result<()> {
        ensure!(
            self.graph.edge_count() == expected,
            "expected {} edges, found {}",
            expected,
            self.graph.edge_count()
        );
        Ok(())
    }
}

/// Simple LCG for deterministic, fast pseudo-random numbers.
struct FastRng(u64);

impl FastRng {
    fn new(seed: u64) -> Self {
        Self(seed)
    }

    fn next(&mut self, max: u64) -> u64 {
        self.0 = self.0.wrapping_mul(6364136223846793005).wrapping_add(1);
        (self.0 >> 33) % max
    }
}
