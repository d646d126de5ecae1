//! Minimum-weight perfect matching of a graph read from a JSON file
//!
//! ```text
//! {"vertices": 4, "edges": [{"u": 0, "v": 1, "weight": 1.0}, ...]}
//! ```
use std::fs::File;
use std::io::BufReader;
use std::path::PathBuf;

use clap::{Parser, ValueEnum};
use env_logger::Env;
use log::info;

use cp_matching::graph::Graph;
use cp_matching::solvers::{CbcSolver, MicroLpSolver, SolverTrait};
use cp_matching::{CpMatching, MatchingConfig, DEFAULT_PRECISION};

#[derive(Debug, Clone, Copy, ValueEnum)]
enum Backend {
    /// In-process simplex
    Microlp,
    /// The `cbc` program, which must be on the PATH
    Cbc,
}

#[derive(Debug, Parser)]
#[command(name = "cpmatching", version, about = "Minimum-weight perfect matching with C-P-Matching")]
struct Args {
    /// Graph in JSON
    graph: PathBuf,

    /// Decimal places intermediate LP solutions are rounded to
    #[arg(short, long, default_value_t = DEFAULT_PRECISION)]
    precision: u32,

    #[arg(short, long, value_enum, default_value = "microlp")]
    solver: Backend,

    /// Add 0.5^i to the weight of the i-th edge before solving
    #[arg(long)]
    perturb: bool,

    /// Keep a copy of every LP, in the .lp format, in this directory
    #[arg(long)]
    dump_dir: Option<PathBuf>,
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    env_logger::Builder::from_env(Env::default().default_filter_or("warn")).init();
    let args = Args::parse();

    let mut graph: Graph = serde_json::from_reader(BufReader::new(File::open(&args.graph)?))?;
    info!(
        "{}: {} vertices, {} edges",
        args.graph.display(),
        graph.vertex_count(),
        graph.edge_count()
    );
    if args.perturb {
        graph.perturb_weights();
    }

    let mut config = MatchingConfig::new().with_precision(args.precision);
    if let Some(dir) = args.dump_dir {
        std::fs::create_dir_all(&dir)?;
        config = config.with_dump_dir(dir);
    }
    let solver: Box<dyn SolverTrait> = match args.solver {
        Backend::Microlp => Box::new(MicroLpSolver::new()),
        Backend::Cbc => Box::new(CbcSolver::new()),
    };
    let matching = CpMatching::new(solver, config).run(&graph)?;
    info!("{} rounds, |F| = {}", matching.rounds, matching.family_size);
    println!("{}", matching);
    Ok(())
}
