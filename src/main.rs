use std::path::{Path, PathBuf};

use anyhow::Context;
use clap::{Parser, Subcommand, ValueEnum};
use college_timetable::audit::audit;
use college_timetable::config::TimetableConfig;
use college_timetable::conflict::ClashKey;
use college_timetable::models::{Catalog, Weekday};
use college_timetable::scheduler::{GenerationReport, GenerationScope, TimetableGenerator, TimetableKpi};
use college_timetable::store::{MemoryStore, SharedStore, SlotStore};
use college_timetable::validation::{validate_catalog, validate_week};
use college_timetable::view::{batch_status, timetable_grid};
use tracing_subscriber::filter::LevelFilter;
use tracing_subscriber::EnvFilter;

#[derive(Parser)]
#[command(
    name = "timetable",
    about = "Generate and inspect weekly college timetables",
    version,
    propagate_version = true
)]
struct Cli {
    /// Catalog of classrooms, batches, lecturers, and offerings (YAML or JSON)
    #[arg(long, global = true, env = "TIMETABLE_CATALOG")]
    catalog: Option<PathBuf>,

    /// Generator configuration (YAML)
    #[arg(long, global = true, env = "TIMETABLE_CONFIG")]
    config: Option<PathBuf>,

    /// Slot store, read before and written after generation (JSON)
    #[arg(long, global = true, env = "TIMETABLE_SLOTS", default_value = "timetable.json")]
    slots: PathBuf,

    /// Fixed RNG seed (overrides the config)
    #[arg(long, global = true)]
    seed: Option<u64>,

    /// Teaching clash key (overrides the config)
    #[arg(long, global = true, value_enum)]
    clash_key: Option<ClashKeyArg>,

    /// Output as JSON
    #[arg(long, global = true, short = 'j')]
    json: bool,

    /// Log generation progress
    #[arg(long, global = true, short = 'v')]
    verbose: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Clone, Copy, ValueEnum)]
enum ClashKeyArg {
    Offering,
    Lecturer,
}

impl From<ClashKeyArg> for ClashKey {
    fn from(arg: ClashKeyArg) -> Self {
        match arg {
            ClashKeyArg::Offering => ClashKey::Offering,
            ClashKeyArg::Lecturer => ClashKey::Lecturer,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Clear and regenerate timetable slots
    Generate {
        #[command(subcommand)]
        target: GenerateTarget,
    },

    /// Print the timetable grouped by batch and day
    Show {
        /// Only this batch
        #[arg(long)]
        batch: Option<String>,
    },

    /// Show which batches have a timetable
    Status,

    /// Check the catalog and configuration
    Validate,

    /// Timetable quality metrics
    Kpi,

    /// List room, offering, and lecturer clashes in the stored slots
    Audit,
}

#[derive(Subcommand)]
enum GenerateTarget {
    /// Every batch, every day
    All,
    /// One day (0 = Mon .. 5 = Sat), hourly windows
    Day { day: u8 },
    /// One batch, every day
    Batch { id: String },
}

fn main() {
    let cli = Cli::parse();

    let rust_log = std::env::var(EnvFilter::DEFAULT_ENV).unwrap_or_default();
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(cli.verbose, &rust_log))
        .with_target(false)
        .with_writer(std::io::stderr)
        .init();

    if let Err(e) = run(&cli) {
        eprintln!("error: {e:#}");
        std::process::exit(1);
    }
}

/// `RUST_LOG` wins when set; otherwise WARN, or INFO with `--verbose`.
fn log_filter(verbose: bool, rust_log: &str) -> EnvFilter {
    let default_level = if verbose {
        LevelFilter::INFO
    } else {
        LevelFilter::WARN
    };
    EnvFilter::builder()
        .with_default_directive(default_level.into())
        .parse_lossy(rust_log)
}

fn run(cli: &Cli) -> anyhow::Result<()> {
    let catalog = load_catalog(cli)?;
    let config = load_config(cli)?;

    match &cli.command {
        Commands::Generate { target } => {
            let scope = match target {
                GenerateTarget::All => GenerationScope::All,
                GenerateTarget::Day { day } => GenerationScope::Day(Weekday::from_index(*day)?),
                GenerateTarget::Batch { id } => GenerationScope::Batch(id.clone()),
            };
            generate(cli, &catalog, &config, &scope)
        }
        Commands::Show { batch } => {
            let slots = MemoryStore::load(&cli.slots)?.slots();
            let grid = timetable_grid(&catalog, &slots, batch.as_deref());
            if cli.json {
                return print_json(&grid);
            }
            if grid.is_empty() {
                println!("No timetable slots.");
            }
            for (title, days) in &grid {
                println!("{title}");
                for (day, entries) in days {
                    println!("  {day}");
                    for e in entries {
                        println!(
                            "    {}-{}  {:<10} {} ({})",
                            e.start.format("%H:%M"),
                            e.end.format("%H:%M"),
                            e.classroom,
                            e.course,
                            e.lecturer
                        );
                    }
                }
            }
            Ok(())
        }
        Commands::Status => {
            let slots = MemoryStore::load(&cli.slots)?.slots();
            let status = batch_status(&catalog, &slots);
            if cli.json {
                return print_json(&status);
            }
            for s in &status {
                let mark = if s.has_timetable { "yes" } else { "no" };
                println!("{:<10} {:<24} {:<24} {:>4} slots  timetable: {mark}", s.id, s.title, s.program, s.slot_count);
            }
            Ok(())
        }
        Commands::Validate => {
            let mut errors = Vec::new();
            if let Err(e) = validate_catalog(&catalog) {
                errors.extend(e);
            }
            if let Err(e) = validate_week(&config.week) {
                errors.extend(e);
            }
            if cli.json {
                let messages: Vec<&str> = errors.iter().map(|e| e.message.as_str()).collect();
                print_json(&serde_json::json!({ "valid": errors.is_empty(), "errors": messages }))?;
            } else {
                for e in &errors {
                    println!("{}", e.message);
                }
            }
            if errors.is_empty() {
                if !cli.json {
                    println!("Catalog is valid.");
                }
                Ok(())
            } else {
                anyhow::bail!("{} validation error(s)", errors.len())
            }
        }
        Commands::Kpi => {
            let slots = MemoryStore::load(&cli.slots)?.slots();
            let kpi = TimetableKpi::calculate(&slots, &catalog, &config.week);
            if cli.json {
                return print_json(&kpi);
            }
            println!("Slots:                    {}", kpi.total_slots);
            println!("Average room utilization: {:.1}%", kpi.avg_utilization * 100.0);
            for (room, util) in &kpi.utilization_by_room {
                println!("  {room:<12} {:.1}%", util * 100.0);
            }
            println!("Weekly shortfall:         {}", kpi.total_shortfall);
            println!("Weekly surplus:           {}", kpi.total_surplus);
            println!("Unscheduled offerings:    {}", kpi.unscheduled.join(", "));
            println!("Lecturer double bookings: {}", kpi.lecturer_double_bookings);
            Ok(())
        }
        Commands::Audit => {
            let slots = MemoryStore::load(&cli.slots)?.slots();
            let violations = audit(&slots);
            if cli.json {
                return print_json(&violations);
            }
            if violations.is_empty() {
                println!("No clashes.");
            }
            for v in &violations {
                println!("[{:>3}] {}", v.severity, v.message);
            }
            Ok(())
        }
    }
}

fn generate(
    cli: &Cli,
    catalog: &Catalog,
    config: &TimetableConfig,
    scope: &GenerationScope,
) -> anyhow::Result<()> {
    let generator = TimetableGenerator::new(catalog, config)?;
    let store = SharedStore::new(
        MemoryStore::load(&cli.slots)
            .with_context(|| format!("failed to read slots from {}", cli.slots.display()))?,
    );

    let report = generator
        .generate_shared(&store, scope)
        .with_context(|| format!("failed to generate timetable for {scope}"))?;

    store
        .into_store()?
        .save(&cli.slots)
        .with_context(|| format!("failed to write slots to {}", cli.slots.display()))?;

    if cli.json {
        return print_json(&report);
    }
    print_report(&report);
    Ok(())
}

fn print_report(report: &GenerationReport) {
    println!(
        "Regenerated {}: cleared {}, created {}, omitted {}.",
        report.scope,
        report.cleared,
        report.created(),
        report.omitted()
    );
    for (batch, created) in report.created_by_batch() {
        println!("  {batch:<12} {created} slots");
    }
}

fn load_catalog(cli: &Cli) -> anyhow::Result<Catalog> {
    let path = cli
        .catalog
        .as_deref()
        .context("no catalog given: pass --catalog or set TIMETABLE_CATALOG")?;
    Catalog::load(path).with_context(|| format!("failed to load catalog {}", path.display()))
}

fn load_config(cli: &Cli) -> anyhow::Result<TimetableConfig> {
    let mut config = match cli.config.as_deref() {
        Some(path) => read_config(path)?,
        None => TimetableConfig::default(),
    };
    if let Some(seed) = cli.seed {
        config.seed = Some(seed);
    }
    if let Some(key) = cli.clash_key {
        config.clash_key = key.into();
    }
    Ok(config)
}

fn read_config(path: &Path) -> anyhow::Result<TimetableConfig> {
    TimetableConfig::load(path).with_context(|| format!("failed to load config {}", path.display()))
}

fn print_json<T: serde::Serialize>(value: &T) -> anyhow::Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
