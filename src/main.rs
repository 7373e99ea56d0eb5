//! titlelab: Shopping Title Optimizer CLI

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use colored::Colorize;
use serde::Serialize;
use std::path::{Path, PathBuf};
use std::process::ExitCode;
use titlelab::catalog::{load_catalog, FEED_EXTENSIONS};
use titlelab::config::{default_config_json, load_config, Config, CONFIG_FILENAME};
use titlelab::export::export_to_dir;
use titlelab::reporter::{aggregate_stats, ConsoleReporter, JsonReporter, ProductReport};
use titlelab::session::{Session, DEFAULT_SESSION_FILE};
use titlelab::{Formula, VariantGenerator, VariantMetrics, Winner};

/// titlelab: Shopping title optimizer for Google Shopping feeds
#[derive(Parser, Debug)]
#[command(name = "titlelab")]
#[command(author, version, about, long_about = None)]
struct Args {
    #[command(subcommand)]
    command: Commands,

    /// Path to config file (default: search .titlelabrc.json in current dir and parents)
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Session file (default: sessionFile from config, else .titlelab-session.json)
    #[arg(long, global = true)]
    session: Option<PathBuf>,

    /// Verbose output
    #[arg(long, short, global = true)]
    verbose: bool,
}

#[derive(Subcommand, Debug)]
enum Commands {
    /// Score one or more titles against the title rules
    Analyze {
        /// Titles to score
        #[arg(required = true)]
        titles: Vec<String>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Load a product feed and generate scored title variants
    Generate {
        /// CSV or TSV product feed
        feed: PathBuf,

        /// Only report (and with --force, only regenerate) this product
        #[arg(long, short)]
        product: Option<String>,

        /// Regenerate variants and reset counters even for unchanged products
        #[arg(long)]
        force: bool,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,

        /// Quiet mode (one line per product)
        #[arg(long, short)]
        quiet: bool,

        /// Minimum best-variant score per product (exit 1 if below)
        #[arg(long, short)]
        threshold: Option<u8>,

        /// Number of parallel threads (default: number of CPU cores)
        #[arg(long, value_name = "N")]
        jobs: Option<usize>,
    },

    /// Overwrite the performance counters of one variant
    Record {
        /// Product id from the feed
        product_id: String,

        /// Formula name, e.g. "Brand First" or brand-first
        formula: Formula,

        #[arg(long)]
        impressions: u64,

        #[arg(long)]
        clicks: u64,

        #[arg(long, default_value_t = 0)]
        conversions: u64,
    },

    /// Show the best performing variant by CTR
    Winner {
        /// Product id (default: every product in the session)
        product_id: Option<String>,

        /// Output format as JSON
        #[arg(long, short)]
        json: bool,
    },

    /// Write every variant with its counters to a timestamped TSV file
    Export {
        /// Directory for the export file (default: current)
        #[arg(long, short)]
        output: Option<PathBuf>,
    },

    /// Create .titlelabrc.json with sensible defaults
    Init {
        /// Directory in which to create config (default: current)
        #[arg(long)]
        dir: Option<PathBuf>,

        /// Minimum score threshold (e.g. 70)
        #[arg(long)]
        threshold: Option<u8>,
    },
}

/// Config and session location shared by every subcommand
struct Workspace {
    config: Config,
    session_path: PathBuf,
    verbose: bool,
}

fn main() -> ExitCode {
    match run() {
        Ok(code) => code,
        Err(e) => {
            eprintln!("{}: {:#}", "Error".red().bold(), e);
            ExitCode::from(2)
        }
    }
}

fn run() -> Result<ExitCode> {
    let args = Args::parse();
    titlelab::logging::init_logging(args.verbose);

    let cwd = std::env::current_dir().context("Failed to get current directory")?;

    if let Commands::Init { dir, threshold } = &args.command {
        return run_init(dir.as_deref().unwrap_or(&cwd), *threshold);
    }

    let config = load_config(&cwd, args.config.as_deref())?;
    let session_path = args
        .session
        .clone()
        .or_else(|| config.session_file.as_ref().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from(DEFAULT_SESSION_FILE));
    let ctx = Workspace {
        config,
        session_path,
        verbose: args.verbose,
    };

    match args.command {
        Commands::Analyze { titles, json } => run_analyze(&ctx, &titles, json),
        Commands::Generate {
            feed,
            product,
            force,
            json,
            quiet,
            threshold,
            jobs,
        } => run_generate(
            &ctx,
            &feed,
            GenerateOptions {
                product,
                force,
                json,
                quiet,
                threshold,
                jobs,
            },
        ),
        Commands::Record {
            product_id,
            formula,
            impressions,
            clicks,
            conversions,
        } => run_record(
            &ctx,
            &product_id,
            formula,
            VariantMetrics::new(impressions, clicks, conversions),
        ),
        Commands::Winner { product_id, json } => run_winner(&ctx, product_id.as_deref(), json),
        Commands::Export { output } => run_export(&ctx, output.as_deref().unwrap_or(&cwd)),
        Commands::Init { .. } => Ok(ExitCode::SUCCESS),
    }
}

fn console(ctx: &Workspace) -> ConsoleReporter {
    let reporter = ConsoleReporter::new();
    if ctx.verbose {
        reporter.verbose()
    } else {
        reporter
    }
}

fn run_analyze(ctx: &Workspace, titles: &[String], json: bool) -> Result<ExitCode> {
    let analyzer = ctx.config.analyzer()?;
    let analyses: Vec<_> = titles.iter().map(|t| analyzer.analyze(t)).collect();

    if json {
        println!("{}", JsonReporter::new().pretty().report_analyses(&analyses));
    } else {
        let reporter = console(ctx);
        for analysis in &analyses {
            reporter.report_analysis(analysis);
        }
    }
    Ok(ExitCode::SUCCESS)
}

struct GenerateOptions {
    product: Option<String>,
    force: bool,
    json: bool,
    quiet: bool,
    threshold: Option<u8>,
    jobs: Option<usize>,
}

fn run_generate(ctx: &Workspace, feed: &Path, opts: GenerateOptions) -> Result<ExitCode> {
    // Set up parallel processing
    if let Some(jobs) = opts.jobs {
        rayon::ThreadPoolBuilder::new()
            .num_threads(jobs)
            .build_global()
            .ok();
    }

    let config = ctx.config.clone().merge_with_cli(opts.threshold);
    let generator = VariantGenerator::with_analyzer(config.analyzer()?);
    let silent = opts.quiet || opts.json;

    let known_extension = feed
        .extension()
        .and_then(|e| e.to_str())
        .is_some_and(|e| FEED_EXTENSIONS.contains(&e.to_lowercase().as_str()));
    if !known_extension && !silent {
        eprintln!(
            "{}: {} is not a .csv/.tsv/.txt file, reading it anyway",
            "Warning".yellow(),
            feed.display()
        );
    }

    let catalog = load_catalog(feed)?;
    if catalog.is_empty() && !silent {
        eprintln!("{}: No products found in {}", "Warning".yellow(), feed.display());
    }

    let mut session = Session::load(&ctx.session_path)?;
    let summary = session.sync_catalog(&catalog, &generator, opts.force && opts.product.is_none());
    if let (true, Some(id)) = (opts.force, opts.product.as_deref()) {
        session.regenerate(id, &generator)?;
    }
    session.feed = Some(feed.display().to_string());
    session.save(&ctx.session_path)?;

    if !silent {
        eprintln!(
            "{}: {} products ({} generated, {} unchanged, {} removed)",
            "Info".blue(),
            catalog.len(),
            summary.generated,
            summary.unchanged,
            summary.removed
        );
    }

    let reports: Vec<ProductReport> = match opts.product.as_deref() {
        Some(id) => vec![ProductReport::from_entry(session.entry(id)?)],
        None => session
            .entries()
            .iter()
            .map(ProductReport::from_entry)
            .collect(),
    };
    let stats = aggregate_stats(&reports);

    if opts.json {
        let reporter = JsonReporter::new().pretty();
        if reports.len() == 1 {
            println!("{}", reporter.report(&reports[0]));
        } else {
            println!("{}", reporter.report_with_summary(&reports, &stats));
        }
    } else if opts.quiet {
        let reporter = ConsoleReporter::new();
        for report in &reports {
            reporter.report_quiet(report);
        }
    } else {
        let reporter = console(ctx);
        if reports.len() == 1 {
            reporter.report(&reports[0]);
        } else {
            reporter.report_many(&reports, &stats);
        }
    }

    // Check threshold
    if let Some(threshold) = config.threshold {
        let failing = reports
            .iter()
            .filter(|r| r.below_threshold(threshold))
            .count();
        if failing > 0 {
            if !opts.json {
                eprintln!(
                    "{}: {} product(s) have no variant scoring at least {}",
                    "Failed".red().bold(),
                    failing,
                    threshold
                );
            }
            return Ok(ExitCode::from(1));
        }
    }

    Ok(ExitCode::SUCCESS)
}

fn run_record(
    ctx: &Workspace,
    product_id: &str,
    formula: Formula,
    metrics: VariantMetrics,
) -> Result<ExitCode> {
    if metrics.clicks > metrics.impressions {
        eprintln!(
            "{}: clicks ({}) exceed impressions ({})",
            "Warning".yellow(),
            metrics.clicks,
            metrics.impressions
        );
    }

    let mut session = Session::load(&ctx.session_path)?;
    session.record(product_id, formula, metrics)?;
    session.save(&ctx.session_path)?;

    println!(
        "Recorded {} for {}: CTR {:.2}%",
        formula,
        product_id,
        metrics.ctr()
    );
    if let Some(winner) = session.winner(product_id)? {
        println!("{}", winner_line(&winner));
    }
    Ok(ExitCode::SUCCESS)
}

fn winner_line(winner: &Winner<Formula>) -> String {
    format!("Winner: {} (CTR: {:.2}%)", winner.formula, winner.ctr)
}

#[derive(Serialize)]
#[serde(rename_all = "camelCase")]
struct WinnerOutput<'a> {
    product_id: &'a str,
    winner: Option<Winner<Formula>>,
}

fn run_winner(ctx: &Workspace, product_id: Option<&str>, json: bool) -> Result<ExitCode> {
    let session = Session::load(&ctx.session_path)?;
    let entries = match product_id {
        Some(id) => vec![session.entry(id)?],
        None => session.entries().iter().collect(),
    };

    if entries.is_empty() && !json {
        eprintln!(
            "{}: Session {} is empty; run generate first",
            "Warning".yellow(),
            ctx.session_path.display()
        );
    }

    let outputs: Vec<WinnerOutput<'_>> = entries
        .iter()
        .map(|e| WinnerOutput {
            product_id: &e.product.id,
            winner: e.winner(),
        })
        .collect();

    if json {
        let json = serde_json::to_string_pretty(&outputs).context("Failed to serialize winners")?;
        println!("{}", json);
        return Ok(ExitCode::SUCCESS);
    }

    for output in &outputs {
        match output.winner {
            Some(ref winner) => println!("{}: {}", output.product_id, winner_line(winner)),
            None => println!("{}: no winner yet", output.product_id),
        }
    }
    Ok(ExitCode::SUCCESS)
}

fn run_export(ctx: &Workspace, dir: &Path) -> Result<ExitCode> {
    let session = Session::load(&ctx.session_path)?;
    if session.is_empty() {
        eprintln!(
            "{}: Session {} is empty; the export has only a header",
            "Warning".yellow(),
            ctx.session_path.display()
        );
    }
    let rows = session.export_rows();
    let path = export_to_dir(&rows, dir)?;
    match session.feed.as_deref() {
        Some(feed) => eprintln!(
            "{}: Exported {} rows generated from {}",
            "Info".blue(),
            rows.len(),
            feed
        ),
        None => eprintln!("{}: Exported {} rows", "Info".blue(), rows.len()),
    }
    println!("{}", path.display());
    Ok(ExitCode::SUCCESS)
}

fn run_init(dir: &Path, threshold: Option<u8>) -> Result<ExitCode> {
    let config_path = dir.join(CONFIG_FILENAME);

    if config_path.exists() {
        eprintln!(
            "{}: {} already exists; use --dir to write elsewhere or remove it first",
            "Warning".yellow(),
            config_path.display()
        );
        return Ok(ExitCode::SUCCESS);
    }

    std::fs::create_dir_all(dir)
        .with_context(|| format!("Failed to create directory: {}", dir.display()))?;
    let json = default_config_json(threshold)?;
    std::fs::write(&config_path, json + "\n")
        .with_context(|| format!("Failed to write {}", config_path.display()))?;
    eprintln!("{}: Created {}", "Info".blue(), config_path.display());
    Ok(ExitCode::SUCCESS)
}
