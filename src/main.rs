//! Canvas-Harvest main entry point
//!
//! Command-line interface that pulls assignments, announcements, and module
//! items from a Canvas LMS instance and writes them as one JSON document.

use anyhow::Context;
use canvas_harvest::aggregate::{resolve_courses, Aggregation, CourseDiagnostic, CourseResource};
use canvas_harvest::config::{api_settings, load_config, Config};
use canvas_harvest::models::{
    flatten_modules, normalize, sort_newest_first, upcoming_only, Announcement, Assignment, Course,
    Module, ModuleItem, RowRecord, RECENT_DAYS,
};
use canvas_harvest::{ApiError, CanvasClient, HarvestError};
use chrono::Utc;
use clap::Parser;
use serde::Serialize;
use std::path::PathBuf;
use tracing_subscriber::EnvFilter;

/// Canvas-Harvest: course data ingestion for Canvas LMS
///
/// Walks every page of the Canvas REST API for the selected courses and
/// prints the normalized records as JSON on stdout. Courses that fail are
/// reported under `diagnostics`; an invalid token stops the run.
#[derive(Parser, Debug)]
#[command(name = "canvas-harvest")]
#[command(version)]
#[command(about = "Course data ingestion for Canvas LMS", long_about = None)]
struct Cli {
    /// Path to TOML configuration file
    #[arg(value_name = "CONFIG")]
    config: PathBuf,

    /// Comma-separated course ids (default: every active course)
    #[arg(long, value_delimiter = ',')]
    courses: Option<Vec<String>>,

    /// Fetch assignments (the default when no resource is selected)
    #[arg(long)]
    assignments: bool,

    /// Fetch announcements
    #[arg(long)]
    announcements: bool,

    /// Fetch module items
    #[arg(long)]
    modules: bool,

    /// Keep only assignments that are not yet due (or have no due date)
    #[arg(long)]
    upcoming_only: bool,

    /// Emit flat export rows (column name to display value) instead of records
    #[arg(long)]
    flat: bool,

    /// List courses and exit
    #[arg(long, conflicts_with_all = ["check", "assignments", "announcements", "modules"])]
    list_courses: bool,

    /// Verify the API token and exit
    #[arg(long, conflicts_with_all = ["list_courses", "assignments", "announcements", "modules"])]
    check: bool,

    /// Increase logging verbosity (-v, -vv, -vvv)
    #[arg(short, long, action = clap::ArgAction::Count)]
    verbose: u8,

    /// Suppress non-error output
    #[arg(short, long, conflicts_with = "verbose")]
    quiet: bool,
}

impl Cli {
    /// Resources to fetch; none selected means assignments only
    fn selection(&self) -> (bool, bool, bool) {
        if self.assignments || self.announcements || self.modules {
            (self.assignments, self.announcements, self.modules)
        } else {
            (true, false, false)
        }
    }
}

/// Document written to stdout
#[derive(Debug, Default, Serialize)]
struct Harvest {
    assignments: Vec<Assignment>,
    announcements: Vec<Announcement>,
    module_items: Vec<ModuleItem>,
    diagnostics: Vec<CourseDiagnostic>,
}

/// The same document with every record flattened into its export row
#[derive(Debug, Serialize)]
struct FlatHarvest {
    assignments: Vec<RowRecord>,
    announcements: Vec<RowRecord>,
    module_items: Vec<RowRecord>,
    diagnostics: Vec<CourseDiagnostic>,
}

impl From<Harvest> for FlatHarvest {
    fn from(harvest: Harvest) -> Self {
        Self {
            assignments: harvest
                .assignments
                .iter()
                .map(|a| RowRecord(a.export_row()))
                .collect(),
            announcements: harvest
                .announcements
                .iter()
                .map(|a| RowRecord(a.export_row()))
                .collect(),
            module_items: harvest
                .module_items
                .iter()
                .map(|i| RowRecord(i.export_row()))
                .collect(),
            diagnostics: harvest.diagnostics,
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    let cli = Cli::parse();

    setup_logging(cli.verbose, cli.quiet);

    tracing::info!("Loading configuration from: {}", cli.config.display());
    let config = load_config(&cli.config)
        .with_context(|| format!("failed to load {}", cli.config.display()))?;

    let result = run(&cli, &config).await;

    if let Err(HarvestError::Api(ApiError::Authentication(_))) = &result {
        tracing::error!("Canvas rejected the credential; check your Canvas API token");
    }

    Ok(result?)
}

/// Sets up the logging/tracing subscriber based on verbosity level
fn setup_logging(verbose: u8, quiet: bool) {
    let filter = if quiet {
        EnvFilter::new("error")
    } else {
        match verbose {
            0 => EnvFilter::new("canvas_harvest=info,warn"),
            1 => EnvFilter::new("canvas_harvest=debug,info"),
            2 => EnvFilter::new("canvas_harvest=trace,debug"),
            _ => EnvFilter::new("trace"),
        }
    };

    // Logs go to stderr; stdout carries the JSON document.
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .init();
}

async fn run(cli: &Cli, config: &Config) -> canvas_harvest::Result<()> {
    let settings = api_settings(config)?;
    tracing::info!("Using Canvas instance {}", settings.base_url());
    let client = CanvasClient::new(settings)?;

    if cli.check {
        return handle_check(&client).await;
    }
    if cli.list_courses {
        return handle_list_courses(&client).await;
    }

    handle_harvest(cli, config, &client).await
}

/// Handles --check: fetches the current user's profile
async fn handle_check(client: &CanvasClient) -> canvas_harvest::Result<()> {
    let profile = client.verify_credentials().await?;
    let name = profile
        .get("name")
        .and_then(|n| n.as_str())
        .unwrap_or("unknown user");

    println!("✓ Token is valid (authenticated as {})", name);
    Ok(())
}

/// Handles --list-courses: prints the active named courses
async fn handle_list_courses(client: &CanvasClient) -> canvas_harvest::Result<()> {
    let listing = client.list_courses(false).await?;
    let courses: Vec<Course> = listing
        .iter()
        .filter_map(|value| match Course::from_value(value) {
            Ok(course) => Some(course),
            Err(e) => {
                tracing::warn!("Skipping malformed course: {}", e);
                None
            }
        })
        .collect();

    println!("{}", serde_json::to_string_pretty(&courses)?);
    Ok(())
}

/// Handles the main harvest: one aggregation per selected resource
async fn handle_harvest(
    cli: &Cli,
    config: &Config,
    client: &CanvasClient,
) -> canvas_harvest::Result<()> {
    let (want_assignments, want_announcements, want_modules) = cli.selection();

    let courses = resolve_courses(client.walker(), cli.courses.as_deref()).await?;
    tracing::info!("Harvesting from {} course(s)", courses.len());

    let aggregator = client.aggregator();
    let mut harvest = Harvest::default();

    if want_assignments {
        let aggregation = aggregator
            .collect_for(&CourseResource::Assignments, &courses)
            .await?;
        let mut assignments = normalize(&aggregation.records, Assignment::from_record);
        if cli.upcoming_only {
            assignments = upcoming_only(assignments, Utc::now());
        }
        harvest.assignments = assignments;
        absorb_diagnostics(&mut harvest, aggregation);
    }

    if want_announcements {
        let resource = CourseResource::announcements_within(
            config.fetch.announcement_days,
            Utc::now().date_naive(),
        );
        let aggregation = aggregator.collect_for(&resource, &courses).await?;
        let mut announcements = normalize(&aggregation.records, Announcement::from_record);
        sort_newest_first(&mut announcements);

        let now = Utc::now();
        let recent = announcements.iter().filter(|a| a.is_recent(now)).count();
        tracing::info!(
            "{} announcement(s), {} from the last {} days",
            announcements.len(),
            recent,
            RECENT_DAYS
        );
        harvest.announcements = announcements;
        absorb_diagnostics(&mut harvest, aggregation);
    }

    if want_modules {
        let aggregation = aggregator
            .collect_for(&CourseResource::Modules, &courses)
            .await?;
        let modules = normalize(&aggregation.records, Module::from_record);
        harvest.module_items = flatten_modules(modules);
        absorb_diagnostics(&mut harvest, aggregation);
    }

    if !harvest.diagnostics.is_empty() {
        tracing::warn!(
            "{} course fetch(es) failed; see diagnostics",
            harvest.diagnostics.len()
        );
    }

    let document = if cli.flat {
        serde_json::to_string_pretty(&FlatHarvest::from(harvest))?
    } else {
        serde_json::to_string_pretty(&harvest)?
    };
    println!("{}", document);
    Ok(())
}

fn absorb_diagnostics(harvest: &mut Harvest, aggregation: Aggregation) {
    harvest.diagnostics.extend(aggregation.diagnostics);
}
