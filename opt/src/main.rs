use std::fs::File;
use std::io::{self, BufWriter, Write};
use std::path::PathBuf;
use std::process::ExitCode;

use clap::Parser;
use itertools::Itertools;
use log::{error, info};
use mffc::{mffc, Aig, ConeSupport, EdgePolicy, GraphAig, MffcConfig, NodeId, Traversal};

/// Report the maximum fanout-free cone of every AND gate in an AIGER file
#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// ASCII AIGER file to read
    file: PathBuf,

    /// Collect at most this many cone nodes per gate
    #[arg(short, long)]
    cut: Option<usize>,

    /// Do not walk through inverted edges
    #[arg(short, long, default_value_t = false)]
    stop_at_complement: bool,

    /// Walk with an explicit stack instead of recursion
    #[arg(short, long, default_value_t = false)]
    iterative: bool,

    /// Only report cones with at least this many nodes
    #[arg(short, long, default_value_t = 1)]
    min_size: usize,

    /// Write the network as graphviz, highlighting the largest cone
    #[arg(short, long)]
    dot: Option<PathBuf>,

    /// Log at debug level unless RUST_LOG says otherwise
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

impl Args {
    fn config(&self) -> MffcConfig {
        let mut config = MffcConfig::new();
        if self.stop_at_complement {
            config = config.with_policy(EdgePolicy::StopAtComplement);
        }
        if self.iterative {
            config = config.with_traversal(Traversal::Iterative);
        }
        if let Some(cut) = self.cut {
            config = config.with_cut_limit(cut);
        }
        config
    }
}

fn label(aig: &Aig, node: NodeId) -> String {
    aig.name(node).map_or_else(|| node.to_string(), str::to_owned)
}

fn report(mut out: impl Write, aig: &Aig, node: NodeId, found: &ConeSupport) -> io::Result<()> {
    writeln!(
        out,
        "Node = {} : Supp = {}  Cone = {}  ( {} )",
        label(aig, node),
        found.support.len(),
        found.cone.len(),
        found.cone.iter().map(|&member| label(aig, member)).join(" ")
    )
}

fn run(args: &Args) -> mffc::Result<()> {
    let config = args.config();
    let mut aig = Aig::from_aiger_file(&args.file)?;
    aig.check_fanouts()?;

    let ands = aig.iter_ands().collect::<Vec<_>>();
    let cones = ands
        .into_iter()
        .map(|node| (node, mffc(&mut aig, node, &config)))
        .collect::<Vec<_>>();

    let stdout = io::stdout();
    let mut out = BufWriter::new(stdout.lock());
    let mut reported = 0;
    for (node, found) in cones.iter().filter(|(_, found)| found.cone.len() >= args.min_size) {
        report(&mut out, &aig, *node, found)?;
        reported += 1;
    }
    out.flush()?;

    let total = cones.iter().map(|(_, found)| found.cone.len()).sum::<usize>();
    info!("{} of {} gates reported, {} cone nodes in total", reported, cones.len(), total);

    if let Some(path) = &args.dot {
        let largest = cones.iter().max_by_key(|(_, found)| found.cone.len());
        let highlight = largest.map(|(_, found)| found.cone.as_slice()).unwrap_or_default();
        if let Some((node, found)) = largest {
            info!("largest cone: {} with {} nodes", label(&aig, *node), found.cone.len());
        }
        let graph = GraphAig::from(&aig);
        graph.to_graphviz(BufWriter::new(File::create(path)?), highlight)?;
    }

    Ok(())
}

fn main() -> ExitCode {
    let args = Args::parse();
    let level = if args.verbose { "debug" } else { "info" };
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(level)).init();

    match run(&args) {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            error!("{}: {}", args.file.display(), err);
            ExitCode::FAILURE
        }
    }
}
