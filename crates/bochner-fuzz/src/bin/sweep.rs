//! Parameter sweep binary for randomized law checking.

use anyhow::{bail, Context, Result};
use bochner_fuzz::{AtomShape, FuzzConfig, FuzzRunner, LogScale, Presets, SetFunctionKind};
use clap::Parser;
use std::path::{Path, PathBuf};

#[derive(Parser, Debug)]
#[command(name = "sweep")]
#[command(about = "Run parameter sweeps checking the laws of bochner extensions")]
struct Args {
    /// Output directory for results
    #[arg(short, long, default_value = "./tmp/fuzz_results")]
    output_dir: PathBuf,

    /// Random seed for reproducibility
    #[arg(short, long)]
    seed: Option<u64>,

    /// Run only presets (skip parameter sweep)
    #[arg(long)]
    presets_only: bool,

    /// Run a quick sweep (fewer parameter combinations)
    #[arg(long)]
    quick: bool,

    /// Specific preset to run
    #[arg(long)]
    preset: Option<String>,

    /// Point count filter (only run this count)
    #[arg(long)]
    points: Option<u32>,

    /// Atom shape filter (singletons, grouped, trivial)
    #[arg(long)]
    shape: Option<String>,

    /// Set function filter (weighted_smul, matrix, combination)
    #[arg(long)]
    set_function: Option<String>,

    /// Lipschitz integrands checked per trial
    #[arg(long, default_value = "1")]
    lipschitz_checks: u32,

    /// Number of threads for concurrent execution
    #[arg(long, default_value = "1")]
    threads: usize,

    /// Also write the raw event stream of every run next to its record
    #[arg(long)]
    events: bool,

    /// Enable verbose output
    #[arg(short, long)]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();

    std::fs::create_dir_all(&args.output_dir).with_context(|| {
        format!(
            "failed to create output directory {}",
            args.output_dir.display()
        )
    })?;

    let seed = args.seed.unwrap_or_else(rand::random);
    println!("Using seed: {}", seed);
    println!("Output directory: {}", args.output_dir.display());
    println!();

    let failed = if args.presets_only || args.preset.is_some() {
        run_presets(&args, seed)?
    } else {
        run_parameter_sweep(&args, seed)?
    };

    if failed > 0 {
        bail!("{} configuration(s) violated a law", failed);
    }
    Ok(())
}

fn run_presets(args: &Args, seed: u64) -> Result<usize> {
    println!("=== Running Presets ===\n");

    let presets: Vec<_> = match &args.preset {
        Some(name) => Presets::all()
            .into_iter()
            .filter(|(n, _)| n == name)
            .collect(),
        None => Presets::all(),
    };

    if presets.is_empty() {
        let available: Vec<_> = Presets::all().into_iter().map(|(n, _)| n).collect();
        bail!(
            "no matching presets found; available: {}",
            available.join(", ")
        );
    }

    let mut failed = 0;
    for (name, config) in presets {
        let config = config
            .with_seed(seed)
            .with_recording(true)
            .with_threads(args.threads);
        if !run_single_config(args, name, config)? {
            failed += 1;
        }
    }
    Ok(failed)
}

fn run_parameter_sweep(args: &Args, seed: u64) -> Result<usize> {
    println!("=== Running Parameter Sweep ===\n");

    let point_counts: Vec<u64> = if args.quick {
        LogScale::SMALL.values().collect() // 1, 10, 100
    } else {
        LogScale::STANDARD.values().collect() // 1, 10, 100, 1000
    };

    let shapes = filter_named(get_shapes(), &args.shape);
    let set_functions = filter_named(get_set_functions(), &args.set_function);

    let total = point_counts.len() * shapes.len() * set_functions.len();
    let mut completed = 0;
    let mut failed = 0;

    for points in &point_counts {
        let points = *points as u32;

        if args.points.is_some_and(|filter| filter != points) {
            continue;
        }

        for (shape_name, shape) in &shapes {
            for (kind_name, kind) in &set_functions {
                completed += 1;

                let config = FuzzConfig::minimal()
                    .with_point_count(points)
                    .with_atom_shape(*shape)
                    .with_set_function(*kind)
                    .with_max_pieces(points.clamp(1, 16))
                    .with_lipschitz_checks(args.lipschitz_checks)
                    .with_threads(args.threads)
                    .with_seed(seed)
                    .with_recording(true)
                    .with_trials(if args.quick { 20 } else { 100 });

                let name = format!("points{}_{}_{}", points, shape_name, kind_name);

                if args.verbose {
                    println!("[{}/{}] Running: {}", completed, total, name);
                }

                if !run_single_config(args, &name, config)? {
                    failed += 1;
                }
            }
        }
    }

    println!("\nCompleted {} configurations", completed);
    Ok(failed)
}

/// Run one configuration and write its record. Returns whether every law held.
fn run_single_config(args: &Args, name: &str, config: FuzzConfig) -> Result<bool> {
    let start = std::time::Instant::now();

    let config = if args.events {
        config.with_event_output_path(args.output_dir.join(format!("{}.events.json", name)))
    } else {
        config
    };
    let mut runner = FuzzRunner::new(config);
    let result = runner.run();

    let elapsed = start.elapsed();
    let record = runner.export_run_record(&result);

    let filename = record_path(&args.output_dir, name);
    record
        .export_to_file(&filename)
        .with_context(|| format!("failed to write {}", filename.display()))?;
    runner
        .export_events()
        .with_context(|| format!("failed to write events for {}", name))?;

    let status = if result.is_success() { "OK" } else { "FAIL" };
    println!(
        "{}: {} | checks={} evaluations={} fallbacks={} max_depth={} time={:?}",
        name,
        status,
        record.stats.validation_passes,
        record.stats.evaluations,
        record.stats.fallbacks,
        record.stats.max_depth,
        elapsed
    );

    if args.verbose && !result.is_success() {
        for failure in &result.validation_failures {
            eprintln!(
                "  Trial {} violated {}: {}",
                failure.trial,
                failure.law.name(),
                failure.detail
            );
        }
        for (trial, err) in &result.construction_errors {
            eprintln!("  Trial {} could not be built: {}", trial, err);
        }
    }

    Ok(result.is_success())
}

fn record_path(output_dir: &Path, name: &str) -> PathBuf {
    output_dir.join(format!("{}.json", name))
}

fn filter_named<T>(all: Vec<(&'static str, T)>, filter: &Option<String>) -> Vec<(&'static str, T)> {
    match filter {
        Some(f) => all
            .into_iter()
            .filter(|(name, _)| name.contains(f.as_str()))
            .collect(),
        None => all,
    }
}

fn get_shapes() -> Vec<(&'static str, AtomShape)> {
    vec![
        ("singletons", AtomShape::Singletons),
        ("grouped4", AtomShape::Grouped { max_atom_size: 4 }),
        ("trivial", AtomShape::Trivial),
    ]
}

fn get_set_functions() -> Vec<(&'static str, SetFunctionKind)> {
    vec![
        ("weighted_smul", SetFunctionKind::WeightedSmul),
        ("matrix", SetFunctionKind::Matrix { max_entry: 3.0 }),
        (
            "combination",
            SetFunctionKind::Combination {
                terms: 3,
                max_entry: 2.0,
            },
        ),
    ]
}
