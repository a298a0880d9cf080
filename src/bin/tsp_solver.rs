use std::{fs::File, path::PathBuf, time::Duration};

use anyhow::Context;
use log::{info, warn};
use structopt::StructOpt;
use tss::{
    algorithm::IterativeAlgorithm,
    exact::{BranchAndBound, Solutions, branch_and_bound_solver},
    io::{CostMatrixReader, SolutionWriter},
    log::build_solver_logger_for_level,
    matrix::CostMatrix,
    utils::signal_handling,
};

#[derive(StructOpt)]
struct Opts {
    /// Instance file; read from stdin if omitted
    #[structopt(short, long)]
    instance: Option<PathBuf>,

    /// Output file; written to stdout if omitted
    #[structopt(short, long)]
    output: Option<PathBuf>,

    /// Emit the solutions as JSON instead of the text format
    #[structopt(long)]
    json: bool,

    /// Abort after this many seconds and report the tours found so far
    #[structopt(short, long)]
    time_limit: Option<u64>,
}

fn load_matrix(path: &Option<PathBuf>) -> anyhow::Result<CostMatrix> {
    Ok(if let Some(path) = path {
        CostMatrix::try_read_tsp_file(path)
            .with_context(|| format!("reading instance {}", path.display()))?
    } else {
        let stdin = std::io::stdin().lock();
        CostMatrix::try_read_tsp(stdin).context("reading instance from stdin")?
    })
}

fn solve(matrix: &CostMatrix, time_limit: Option<u64>) -> Solutions {
    let Some(seconds) = time_limit else {
        return branch_and_bound_solver(matrix);
    };

    let mut algo = BranchAndBound::new(matrix.clone());
    algo.run_until_timeout(Duration::from_secs(seconds));

    if !algo.is_completed() {
        warn!("time limit reached; the reported tours may be suboptimal");
    }

    algo.best_known_solution().unwrap_or_default()
}

fn write_solutions(solutions: &Solutions, opts: &Opts) -> anyhow::Result<()> {
    if let Some(path) = &opts.output {
        let writer = std::io::BufWriter::new(File::create(path)?);
        if opts.json {
            serde_json::to_writer_pretty(writer, solutions)?;
        } else {
            solutions.try_write_solutions(writer)?;
        }
    } else {
        let writer = std::io::stdout();
        if opts.json {
            serde_json::to_writer_pretty(writer, solutions)?;
        } else {
            solutions.try_write_solutions(writer)?;
        }
    }

    Ok(())
}

fn main() -> anyhow::Result<()> {
    build_solver_logger_for_level(log::LevelFilter::Info);
    signal_handling::initialize();

    let opts = Opts::from_args();

    let matrix = load_matrix(&opts.instance)?;
    info!("instance with {} vertices", matrix.number_of_vertices());

    let solutions = solve(&matrix, opts.time_limit);
    write_solutions(&solutions, &opts)?;

    Ok(())
}
