//! Application startup and command dispatch
//!
//! `startup` owns the process boundary: it parses the command line, builds
//! the async runtime and turns every outcome into an exit code. Everything
//! below it returns errors instead of exiting.

use crate::analysis::api::ClaudeClient;
use crate::app::cli::{Cli, Command, ScanArgs};
use crate::app::report;
use crate::core::config::AppConfig;
use crate::core::logging;
use crate::core::version;
use crate::scan::api::{
    CreateScanRequest, MemoryScanStore, PipelineSettings, Scan, ScanKind, ScanManager, ScanStatus,
};
use crate::source::api::GithubSource;
use clap::Parser;
use std::io::IsTerminal;
use std::sync::Arc;
use std::time::Duration;

const EXIT_SUCCESS: i32 = 0;
const EXIT_FAILURE: i32 = 1;
// Conventional code for termination by SIGINT
const EXIT_INTERRUPTED: i32 = 130;

const POLL_INTERVAL: Duration = Duration::from_millis(500);

/// Application entry point, returns the process exit code.
pub fn startup() -> i32 {
    let cli = Cli::parse();

    let runtime = match tokio::runtime::Builder::new_multi_thread()
        .enable_all()
        .build()
    {
        Ok(runtime) => runtime,
        Err(e) => {
            eprintln!("Failed to start the async runtime: {}", e);
            return EXIT_FAILURE;
        }
    };

    match runtime.block_on(run(cli)) {
        Ok(code) => code,
        Err(message) => {
            eprintln!("Error: {}", message);
            EXIT_FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<i32, String> {
    let mut config = AppConfig::load(cli.config_file.as_deref())
        .await
        .map_err(|e| e.to_string())?;
    apply_cli_overrides(&mut config, &cli);
    config.validate().map_err(|e| e.to_string())?;

    let color = color_enabled(&cli);
    logging::init_logging(
        config.log_level.as_deref(),
        config.log_format.as_deref(),
        config.log_file.as_deref(),
        color,
    )
    .map_err(|e| format!("Failed to initialize logging: {}", e))?;

    log::debug!(
        "repoaudit {} ({}, built {})",
        env!("CARGO_PKG_VERSION"),
        version::git_hash(),
        version::build_time()
    );

    match cli.command {
        Command::Scan(args) => run_scan(&config, args, color).await,
        Command::Filter(args) => {
            report::print_filter_decisions(&args.paths);
            Ok(EXIT_SUCCESS)
        }
    }
}

fn apply_cli_overrides(config: &mut AppConfig, cli: &Cli) {
    if let Some(level) = &cli.log_level {
        config.log_level = Some(level.clone());
    }
    if let Some(format) = &cli.log_format {
        config.log_format = Some(format.clone());
    }
    if let Some(file) = &cli.log_file {
        config.log_file = Some(file.display().to_string());
    }
}

/// Explicit flags win; otherwise color follows TTY detection and `NO_COLOR`.
fn color_enabled(cli: &Cli) -> bool {
    if cli.color {
        return true;
    }
    if cli.no_color || std::env::var_os("NO_COLOR").is_some() {
        return false;
    }
    std::io::stdout().is_terminal()
}

async fn run_scan(config: &AppConfig, args: ScanArgs, color: bool) -> Result<i32, String> {
    let api_key = config.claude_api_key.clone().ok_or_else(|| {
        "No Claude API key configured. Set CLAUDE_API_KEY or add 'claude-api-key' \
         to the configuration file."
            .to_string()
    })?;

    let request_timeout = Duration::from_secs(config.request_timeout_secs);
    let source = Arc::new(GithubSource::new(
        config.github_token.clone().unwrap_or_default(),
        config.github_api_url.clone(),
        request_timeout,
    ));
    let analyzer = Arc::new(ClaudeClient::new(
        api_key,
        config.claude_api_url.clone(),
        config.model.clone(),
        request_timeout,
    ));
    let store = Arc::new(MemoryScanStore::new());

    let manager = ScanManager::new(store, source, analyzer, PipelineSettings::from(config));
    let executor = manager.attach_executor(config.executor_capacity);

    let request = CreateScanRequest {
        owner: args.owner,
        name: args.name.unwrap_or_else(|| args.target.clone()),
        description: args.description,
        kind: ScanKind::Repository,
        target: args.target,
        branch: Some(args.branch),
    };

    let scan = manager
        .create_scan(request)
        .await
        .map_err(|e| e.to_string())?;
    log::info!("Scan '{}' submitted, waiting for completion", scan.id);

    let exit_code = match wait_for_scan(&manager, &scan.id).await? {
        Some(finished) => {
            if args.json {
                report::print_json(&finished)
                    .map_err(|e| format!("Failed to serialize the scan: {}", e))?;
            } else {
                report::print_report(&finished, color);
            }
            if finished.status == ScanStatus::Failed {
                EXIT_FAILURE
            } else {
                EXIT_SUCCESS
            }
        }
        None => {
            eprintln!("Interrupted, the scan was abandoned.");
            EXIT_INTERRUPTED
        }
    };

    executor.shutdown().await;
    Ok(exit_code)
}

/// Poll until the scan reaches a terminal status. Returns `None` when the
/// user interrupts the wait with Ctrl-C.
async fn wait_for_scan(manager: &ScanManager, scan_id: &str) -> Result<Option<Scan>, String> {
    loop {
        let scan = manager.get_scan(scan_id).await.map_err(|e| e.to_string())?;
        if scan.is_terminal() {
            return Ok(Some(scan));
        }
        tokio::select! {
            _ = tokio::time::sleep(POLL_INTERVAL) => {}
            result = tokio::signal::ctrl_c() => {
                if let Err(e) = result {
                    return Err(format!("Failed to listen for Ctrl-C: {}", e));
                }
                return Ok(None);
            }
        }
    }
}
