//! Apprisk - Appraisal Anomaly Risk Engine
//!
//! A CLI tool that flags valuation reports whose value opinion deviates
//! abnormally from the statistical baseline, summarizes the appraisers
//! responsible, and annotates the affected properties for map rendering.
//!
//! Exit codes:
//!   0 - Success
//!   1 - Runtime error (dataset load, config, report write failure, etc.)
//!   2 - Invalid cluster-selection input

mod analysis;
mod cli;
mod config;
mod dataset;
mod error;
mod format;
mod map;
mod models;
mod report;

use anyhow::{Context, Result};
use chrono::Utc;
use cli::{Args, OutputFormat};
use config::Config;
use dataset::RecordStore;
use format::NumberFormat;
use models::{AnalysisSummary, ReportMetadata, RiskReport};
use tracing::{debug, error, info, warn};
use tracing_subscriber::FmtSubscriber;

fn main() -> Result<()> {
    // Parse command-line arguments
    let args = Args::parse_args();

    // Validate arguments
    if let Err(e) = args.validate() {
        eprintln!("Error: {}", e);
        std::process::exit(1);
    }

    // Handle --init-config early (no logging needed)
    if args.init_config {
        return handle_init_config();
    }

    // Initialize logging
    init_logging(&args);

    info!("Apprisk v{}", env!("CARGO_PKG_VERSION"));
    debug!("Arguments: {:?}", args);

    // Run the analysis
    match run_analysis(args) {
        Ok(exit_code) => {
            std::process::exit(exit_code);
        }
        Err(e) => {
            error!("Analysis failed: {}", e);
            eprintln!("\n❌ Error: {:#}", e);
            std::process::exit(1);
        }
    }
}

/// Handle --init-config: generate a default .apprisk.toml.
fn handle_init_config() -> Result<()> {
    let path = std::path::Path::new(".apprisk.toml");

    if path.exists() {
        eprintln!("⚠️  .apprisk.toml already exists. Remove it first or edit it manually.");
        std::process::exit(1);
    }

    let content = Config::default_toml();
    std::fs::write(path, &content).context("Failed to write .apprisk.toml")?;

    println!("✅ Created .apprisk.toml with default settings.");
    println!("   Edit it to customize the dataset path, locale, and report output.");
    Ok(())
}

/// Initialize logging based on verbosity settings.
fn init_logging(args: &Args) {
    let level = args.log_level();

    let subscriber = FmtSubscriber::builder()
        .with_max_level(level)
        .with_target(false)
        .with_thread_ids(false)
        .with_file(false)
        .with_line_number(false)
        .compact()
        .finish();

    tracing::subscriber::set_global_default(subscriber).expect("Failed to set tracing subscriber");
}

/// Run the complete analysis workflow. Returns exit code (0 or 2).
fn run_analysis(args: Args) -> Result<i32> {
    // Load configuration
    let mut config = load_config(&args)?;
    config.merge_with_args(&args);

    let data_path = config.dataset_path().context(
        "No dataset path provided. Use --data or set [dataset] path in .apprisk.toml",
    )?;

    // Step 1: Load the dataset (the one-time I/O of the pipeline)
    println!("📥 Loading dataset: {}", data_path.display());
    let store = RecordStore::load(&data_path)
        .with_context(|| format!("Failed to load dataset from {}", data_path.display()))?;
    info!("Loaded {} report records", store.len());

    // Handle --dry-run: validate the dataset, print stats, exit
    if args.dry_run {
        return handle_dry_run(&store);
    }

    // The threshold's upper bound comes from the data, so it can only be
    // checked after load.
    let range = store.threshold_range();
    if !range.contains(args.threshold) {
        anyhow::bail!(
            "Threshold {} is outside the valid range {} for this dataset",
            args.threshold,
            range
        );
    }

    // Step 2: Classify and roll up by appraiser
    let anomalous = analysis::classify(store.records(), args.threshold);
    let appraisers = analysis::aggregate(store.records(), &anomalous);
    let summary = AnalysisSummary {
        anomalous_reports: anomalous.len(),
        anomalous_appraisers: appraisers.len(),
    };
    debug!(
        "{} anomalous reports across {} appraisers",
        summary.anomalous_reports, summary.anomalous_appraisers
    );

    // Step 3: Parse the cluster selection and annotate the map
    let selection = match analysis::ClusterSelection::parse(args.cluster_input()) {
        Ok(selection) => selection,
        Err(e) => {
            warn!("Rejected cluster input: {}", e);
            eprintln!(
                "\n⛔ {}. Please enter valid integer values for cluster numbers.",
                e
            );
            return Ok(2);
        }
    };

    let number_format = NumberFormat::from(&config.locale);
    let map_view = match &selection {
        analysis::ClusterSelection::None => None,
        analysis::ClusterSelection::Clusters(clusters) => {
            let selected = analysis::select(store.records(), clusters);
            debug!("Cluster selection matched {} records", selected.len());
            Some(map::annotate(
                &selected,
                args.threshold,
                store.center(),
                &number_format,
            ))
        }
    };

    // Step 4: Build the report
    let risk_report = RiskReport {
        metadata: ReportMetadata {
            dataset_path: data_path.display().to_string(),
            analysis_date: Utc::now(),
            threshold: args.threshold,
            records_total: store.len(),
            max_deviation: store.max_deviation(),
        },
        summary,
        appraisers,
        map: map_view,
        default_center: store.center(),
    };

    // Step 5: Generate and save the report
    let output = match args.format {
        OutputFormat::Json => report::generate_json_report(&risk_report)?,
        OutputFormat::Markdown => report::generate_markdown_report(&risk_report, &config.report),
    };

    let out_path = config.output_path();
    std::fs::write(&out_path, &output)
        .with_context(|| format!("Failed to write report to {}", out_path.display()))?;

    // Print summary
    println!("\n📊 Analysis results for a {} threshold:", args.threshold);
    println!(
        "   {} anomalies found in property reports.",
        risk_report.summary.anomalous_reports
    );
    println!(
        "   {} anomaly appraisers are identified.",
        risk_report.summary.anomalous_appraisers
    );
    if let Some(ref view) = risk_report.map {
        println!("   {} properties annotated for the map view.", view.markers.len());
    }
    println!(
        "\n✅ Analysis complete! Report saved to: {}",
        out_path.display()
    );

    Ok(0)
}

/// Handle --dry-run: print dataset statistics, write nothing.
fn handle_dry_run(store: &RecordStore) -> Result<i32> {
    println!("\n🔍 Dry run: dataset statistics (no report written)...\n");

    let clusters: Vec<String> = store
        .cluster_ids()
        .into_iter()
        .map(|c| c.to_string())
        .collect();
    let center = store.center();

    println!("   Records: {}", store.len());
    println!("   Appraisers: {}", store.distinct_signers());
    println!("   Valid threshold range: {}", store.threshold_range());
    println!("   Clusters present: {}", clusters.join(", "));
    println!(
        "   Dataset center: {:.5}, {:.5}",
        center.latitude, center.longitude
    );

    println!("\n✅ Dry run complete.");
    Ok(0)
}

/// Load configuration from file or use defaults.
fn load_config(args: &Args) -> Result<Config> {
    // Try explicit config path
    if let Some(ref config_path) = args.config {
        info!("Loading config from: {}", config_path.display());
        return Config::load(config_path);
    }

    // Try default location
    match Config::load_default() {
        Ok(Some(config)) => {
            info!("Loaded default config from .apprisk.toml");
            Ok(config)
        }
        Ok(None) => {
            debug!("No config file found, using defaults");
            Ok(Config::default())
        }
        Err(e) => {
            warn!("Failed to load config: {}", e);
            Ok(Config::default())
        }
    }
}
