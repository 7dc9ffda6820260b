//! KeyBench - Main Entry Point
//!
//! Command line front end for the key codec and the operator timing analysis.

use anyhow::{bail, Context, Result};
use clap::{Parser, Subcommand};
use std::path::{Path, PathBuf};
use tracing::info;

use keybench::analysis::{
    collect_timing_rows, render_comparison, render_operator_stats, run_analysis, write_timing_rows,
};
use keybench::{
    convert_batch, parse_query_plan, render_plan_outline, AnalysisConfig, Benchmark, IdEncoding,
    PlanNode, PlanSource,
};

#[derive(Parser)]
#[command(name = "keybench")]
#[command(about = "Identifier-encoding benchmark tooling")]
#[command(version = env!("CARGO_PKG_VERSION"))]
struct Cli {
    /// JSON configuration file
    #[arg(short, long, global = true)]
    config: Option<PathBuf>,

    /// Enable verbose output
    #[arg(short, long, global = true)]
    verbose: bool,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand)]
enum Command {
    /// Convert keys to an identifier encoding, one per line
    Convert {
        /// Target encoding (int64_sorted, int64_random, uuid_v4, uuid_v7, base64_16_bytes, base64_32_bytes)
        #[arg(short, long)]
        encoding: IdEncoding,

        /// Keys to convert
        ids: Vec<i64>,

        /// Convert the half-open range START..END instead of explicit keys
        #[arg(long, num_args = 2, value_names = ["START", "END"], conflicts_with = "ids")]
        range: Option<Vec<i64>>,

        /// Print the source key next to each encoded value
        #[arg(long)]
        with_source: bool,
    },

    /// List the supported encodings and their column types
    Encodings,

    /// List the key columns a benchmark rewrites and their type under an encoding
    Keys {
        /// Benchmark family (tpch, tpcds)
        #[arg(short, long, default_value = "tpch")]
        benchmark: Benchmark,

        /// Target encoding
        #[arg(short, long)]
        encoding: IdEncoding,
    },

    /// Export per-operator timings of both datasets to CSV
    Export {
        /// Output CSV path
        #[arg(short, long)]
        output: Option<PathBuf>,
    },

    /// Print per-operator statistics and the baseline comparison per DBMS
    Analyze {
        /// Only analyze this DBMS
        #[arg(long)]
        dbms: Option<String>,

        /// Number of operators in the slowdown ranking
        #[arg(long)]
        top: Option<usize>,

        /// Worker threads
        #[arg(long)]
        threads: Option<usize>,

        /// Skip the CSV export
        #[arg(long)]
        no_export: bool,
    },

    /// Print the operator tree of a plan from a result file
    Outline {
        /// Benchmark result CSV
        results: PathBuf,

        /// Query name; defaults to the first successful query
        #[arg(short, long)]
        query: Option<String>,
    },
}

fn init_logging(config: &AnalysisConfig, verbose: bool) {
    let level = if verbose {
        "debug".to_string()
    } else {
        config.log_level.to_lowercase()
    };
    tracing_subscriber::fmt()
        .with_writer(std::io::stderr)
        .with_env_filter(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| tracing_subscriber::EnvFilter::new(level)),
        )
        .try_init()
        .ok();
}

fn run_convert(
    config: &AnalysisConfig,
    encoding: IdEncoding,
    ids: Vec<i64>,
    range: Option<Vec<i64>>,
    with_source: bool,
) -> Result<()> {
    let ids = match range.as_deref() {
        Some([start, end]) => {
            if start > end {
                bail!("invalid range {}..{}", start, end);
            }
            (*start..*end).collect()
        }
        Some(_) => bail!("--range takes exactly two values"),
        None => ids,
    };

    let encoded = convert_batch(&ids, encoding, &config.parallel_context())?;
    for (id, value) in ids.iter().zip(encoded) {
        if with_source {
            println!("{}\t{}", id, value);
        } else {
            println!("{}", value);
        }
    }
    Ok(())
}

fn run_export(config: &AnalysisConfig) -> Result<()> {
    let rows = collect_timing_rows(config)?;
    if rows.is_empty() {
        println!("No operator timing data to export.");
    }
    write_timing_rows(&config.output_csv, &rows)
        .with_context(|| format!("writing {}", config.output_csv.display()))?;
    println!(
        "Exported {} operator timing records to {}",
        rows.len(),
        config.output_csv.display()
    );
    Ok(())
}

fn run_analyze(config: &AnalysisConfig) -> Result<()> {
    let systems = run_analysis(config)?;
    if systems.is_empty() {
        println!("No database systems found in result files.");
        return Ok(());
    }
    let names: Vec<&str> = systems.iter().map(|s| s.dbms.as_str()).collect();
    println!("Found {} database system(s): {}", names.len(), names.join(", "));

    let banner = "=".repeat(80);
    for system in &systems {
        println!("\n{}\nANALYZING: {}\n{}", banner, system.dbms.to_uppercase(), banner);

        for (label, analysis) in [
            (&config.baseline.benchmark, &system.baseline),
            (&config.comparison.benchmark, &system.comparison),
        ] {
            if let Some(analysis) = analysis {
                println!("\n{}:", label);
                print!("{}", render_operator_stats(analysis));
            }
        }

        match (&system.report, system.missing_side(config)) {
            (Some(report), _) => print!(
                "{}",
                render_comparison(
                    &system.dbms,
                    &config.baseline.benchmark,
                    &config.comparison.benchmark,
                    report,
                    config.top_n,
                )
            ),
            (None, Some(missing)) => {
                println!("\nNote: {} is not available in {}.", system.dbms, missing)
            }
            (None, None) => {}
        }
    }
    Ok(())
}

fn run_outline(results: &Path, query: Option<&str>) -> Result<()> {
    let source = PlanSource::open(results)?;
    let row = source
        .rows()
        .iter()
        .filter(|row| !row.plan.is_empty())
        .find(|row| query.map_or(true, |q| row.query == q))
        .context("no successful query with a plan")?;

    let plan = parse_query_plan(&row.plan)?;
    println!("Query Plan ({} / {}):", row.dbms, row.query);
    print!("{}", render_plan_outline(PlanNode::new(&plan)));
    Ok(())
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = AnalysisConfig::load_or_default(cli.config.as_deref())?;
    init_logging(&config, cli.verbose);
    info!("KeyBench v{}", env!("CARGO_PKG_VERSION"));

    match cli.command {
        Command::Convert {
            encoding,
            ids,
            range,
            with_source,
        } => run_convert(&config, encoding, ids, range, with_source),
        Command::Encodings => {
            for encoding in IdEncoding::ALL {
                println!("{:<16} {}", encoding.name(), encoding.engine_type());
            }
            Ok(())
        }
        Command::Keys {
            benchmark,
            encoding,
        } => {
            for (table, columns) in benchmark.key_columns() {
                for column in columns.iter() {
                    println!("{}.{} {}", table, column, encoding.engine_type());
                }
            }
            Ok(())
        }
        Command::Export { output } => {
            if let Some(output) = output {
                config.output_csv = output;
            }
            run_export(&config)
        }
        Command::Analyze {
            dbms,
            top,
            threads,
            no_export,
        } => {
            if dbms.is_some() {
                config.dbms = dbms;
            }
            if let Some(top) = top {
                config.top_n = top;
            }
            if let Some(threads) = threads {
                config.threads = threads;
            }
            config.validate()?;
            if !no_export {
                run_export(&config)?;
            }
            run_analyze(&config)
        }
        Command::Outline { results, query } => run_outline(&results, query.as_deref()),
    }
}
