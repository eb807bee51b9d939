// LicUsage - main.rs
//
// Application entry point. Handles:
// 1. CLI argument parsing
// 2. Config loading and logging initialisation (debug mode support)
// 3. Batch extraction when a file is given, eframe GUI launch otherwise

mod gui;

// Re-export modules from the library crate so that `gui.rs` and other
// binary-side code can still use `crate::app::...`, `crate::core::...` etc.
pub use licusage::app;

pub use licusage::core;
pub use licusage::platform;
pub use licusage::ui;
pub use licusage::util;

use clap::Parser;
use crate::core::export::ExportFormat;
use std::path::{Path, PathBuf};
use std::process::ExitCode;

/// LicUsage - License resource usage extractor and compliance checker.
///
/// Reads a network-device command log, pulls the FeatureName /
/// ConfigureItemName / ResourceUsage rows out of every
/// `display license resource usage` block, and checks each site for a
/// complete set of configure items.
#[derive(Parser, Debug)]
#[command(name = "licusage", version, about)]
struct Cli {
    /// Log file to process. Without it (or with --gui) the desktop window opens.
    path: Option<PathBuf>,

    /// Write the extracted records to this file.
    #[arg(short = 'o', long = "output")]
    output: Option<PathBuf>,

    /// Export format (xlsx, csv, json). Defaults to the output extension.
    #[arg(short = 'f', long = "format", requires = "output")]
    format: Option<ExportFormat>,

    /// Exit with status 2 when any site fails the compliance check.
    #[arg(long = "strict")]
    strict: bool,

    /// Read configuration from this file instead of the platform default.
    #[arg(short = 'c', long = "config")]
    config: Option<PathBuf>,

    /// Open the desktop window even when a file is given.
    #[arg(long = "gui")]
    gui: bool,

    /// Enable debug logging (equivalent to RUST_LOG=debug).
    #[arg(short = 'd', long = "debug")]
    debug: bool,
}

fn main() -> ExitCode {
    let cli = Cli::parse();

    // Config must be read before logging is up; its warnings are replayed below.
    let config_path = cli
        .config
        .clone()
        .unwrap_or_else(|| platform::config::PlatformPaths::resolve().config_file());
    let (config, config_warnings) = platform::config::load_config(&config_path);

    util::logging::init(
        cli.debug,
        config.log_level.as_deref(),
        config.log_file.as_deref(),
    );

    tracing::info!(
        version = util::constants::APP_VERSION,
        debug = cli.debug,
        config = %config_path.display(),
        "LicUsage starting"
    );
    for warning in &config_warnings {
        tracing::warn!(warning = %warning, "Config warning");
    }

    match cli.path.clone() {
        Some(path) if !cli.gui => run_batch(&cli, &path, config),
        path => run_gui(config, config_warnings, path, cli.debug),
    }
}

/// Process one document without a window: print the table and verdict to
/// stdout, optionally export, and map the outcome to an exit status.
fn run_batch(cli: &Cli, path: &Path, config: platform::config::AppConfig) -> ExitCode {
    let report = match app::load::load_report(path, &config) {
        Ok(r) => r,
        Err(e) => {
            tracing::error!(path = %path.display(), error = %e, "Extraction failed");
            eprintln!("Error: {e}");
            return ExitCode::FAILURE;
        }
    };

    let table = crate::core::table::UsageTable::new(&report.records);
    if table.is_empty() {
        println!("No license resource usage blocks found in {}.", path.display());
    } else {
        print!("{}", crate::core::table::render_text(&table));
    }
    println!();
    println!(
        "{}",
        crate::core::compliance::describe(&report.compliance, &config.compliance)
    );

    if let Some(ref dest) = cli.output {
        let format = cli
            .format
            .or_else(|| ExportFormat::from_path(dest))
            .unwrap_or(config.default_export_format);
        let written = std::fs::File::create(dest)
            .map_err(|e| format!("cannot create '{}': {e}", dest.display()))
            .and_then(|f| {
                crate::core::export::export(format, &report, f, dest).map_err(|e| e.to_string())
            });
        match written {
            Ok(n) => println!("Wrote {n} record(s) to {} ({}).", dest.display(), format.label()),
            Err(msg) => {
                eprintln!("Error: {msg}");
                return ExitCode::FAILURE;
            }
        }
    }

    if cli.strict && !report.compliance.all_compliant() {
        return ExitCode::from(2);
    }
    ExitCode::SUCCESS
}

fn run_gui(
    config: platform::config::AppConfig,
    warnings: Vec<String>,
    initial: Option<PathBuf>,
    debug: bool,
) -> ExitCode {
    let mut state = app::state::AppState::new(config, warnings, debug);
    state.pending_load = initial;

    let native_options = eframe::NativeOptions {
        viewport: egui::ViewportBuilder::default()
            .with_title(format!(
                "{} v{}",
                util::constants::APP_NAME,
                util::constants::APP_VERSION
            ))
            .with_inner_size([1000.0, 640.0])
            .with_min_inner_size([640.0, 400.0])
            .with_drag_and_drop(true),
        ..Default::default()
    };

    let result = eframe::run_native(
        util::constants::APP_ID,
        native_options,
        Box::new(move |_cc| Ok(Box::new(gui::LicUsageApp::new(state)))),
    );

    if let Err(e) = result {
        tracing::error!(error = %e, "Failed to launch GUI");
        eprintln!("Error: Failed to launch LicUsage GUI: {e}");
        return ExitCode::FAILURE;
    }
    ExitCode::SUCCESS
}
