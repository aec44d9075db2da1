use clap::{Parser, Subcommand};
use slidereel::solver::{EdgeSolver, MilpSolver, SolveOutcome};
use slidereel::{conflicts, emit, instance, model, output, scoring, sequence, slides, validate};
use std::path::PathBuf;
use std::time::Duration;

#[derive(Parser)]
#[command(name = "slidereel")]
#[command(about = "Orders a photo slideshow to maximize transition interest")]
#[command(long_about = "\
Orders a photo slideshow to maximize transition interest

A slide shows one horizontal photo or a pair of vertical photos. The
transition between two consecutive slides scores
min(common tags, tags only in the first, tags only in the second), and the
total score is what gets maximized — exactly, by an external MILP solver,
not by a heuristic.

Instance format (plain text):

  4                  photo count
  H 2 beach sunset   orientation, tag count, tags
  V 1 cat
  V 1 dog
  H 3 beach cat dog

Solutions are written as <instance-name>_solution_<score>.txt: a slide
count followed by one line per slide holding one photo index (horizontal)
or two (vertical pair), in presentation order. A JSON run summary lands
beside it.")]
#[command(version)]
struct Cli {
    /// Directory for solution files and run summaries
    #[arg(long, default_value = ".", global = true)]
    output_dir: PathBuf,

    /// Worker threads for pairwise scoring (capped at available cores)
    #[arg(long, global = true)]
    threads: Option<usize>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Solve an instance and write the best slide ordering found
    Run {
        /// Instance file
        instance: PathBuf,
        /// Wall-clock budget for the solver, in seconds
        #[arg(long)]
        time_limit: Option<u64>,
    },
    /// Independently check a solution file against its instance
    Validate {
        /// Instance file
        instance: PathBuf,
        /// Solution file
        solution: PathBuf,
    },
    /// Parse an instance and report its shape without solving
    Check {
        /// Instance file
        instance: PathBuf,
    },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    init_thread_pool(cli.threads);

    match cli.command {
        Command::Run {
            instance: instance_path,
            time_limit,
        } => {
            println!("==> Loading {}", instance_path.display());
            let inst = instance::Instance::from_file(&instance_path)?;
            let deck = slides::SlideDeck::build(&inst);
            output::print_instance_summary(&inst, &deck);

            let scores = scoring::ScoreMatrix::compute(&deck, &inst);
            let conflicts = conflicts::ConflictSet::detect(&deck);
            let model = model::EdgeModel::build(&deck, scores, conflicts);

            println!("==> Solving");
            let solver = MilpSolver::new(time_limit.map(Duration::from_secs));
            let outcome = solver.solve(&model)?;

            match &outcome {
                SolveOutcome::Optimal { edges, objective }
                | SolveOutcome::Feasible { edges, objective } => {
                    let order = sequence::linearize(edges)?;
                    std::fs::create_dir_all(&cli.output_dir)?;
                    let solution_path = emit::write_solution(
                        &cli.output_dir,
                        &instance_path,
                        &deck,
                        &order,
                        *objective,
                    )?;
                    let summary = emit::RunSummary {
                        instance: instance_file_name(&instance_path),
                        photos: inst.len(),
                        candidate_slides: deck.len(),
                        placed_slides: order.len(),
                        objective: *objective,
                        proven_optimal: matches!(outcome, SolveOutcome::Optimal { .. }),
                        sequence: order.clone(),
                    };
                    emit::write_summary(&cli.output_dir, &summary)?;
                    output::print_outcome(&outcome, order.len(), Some(&solution_path));
                }
                SolveOutcome::Infeasible | SolveOutcome::TimedOut => {
                    output::print_outcome(&outcome, 0, None);
                    std::process::exit(1);
                }
            }
        }
        Command::Validate { instance, solution } => {
            let inst = instance::Instance::from_file(&instance)?;
            let rows = emit::read_solution(&solution)?;
            let report = validate::validate(&inst, &rows);
            output::print_validation_report(&report);
            if !report.is_valid() {
                std::process::exit(1);
            }
        }
        Command::Check { instance: path } => {
            println!("==> Checking {}", path.display());
            let inst = instance::Instance::from_file(&path)?;
            let deck = slides::SlideDeck::build(&inst);
            output::print_instance_summary(&inst, &deck);
            let conflicts = conflicts::ConflictSet::detect(&deck);
            println!("Conflicting slide pairs: {}", conflicts.len());
            println!("==> Instance is valid");
        }
    }

    Ok(())
}

fn instance_file_name(path: &std::path::Path) -> String {
    path.file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_else(|| "instance".to_string())
}

/// Initialize the rayon thread pool.
///
/// Caps at the number of available cores — users can constrain down, not up.
fn init_thread_pool(requested: Option<usize>) {
    let available = std::thread::available_parallelism()
        .map(|n| n.get())
        .unwrap_or(1);
    let threads = requested.unwrap_or(available).clamp(1, available);
    rayon::ThreadPoolBuilder::new()
        .num_threads(threads)
        .build_global()
        .ok();
}
