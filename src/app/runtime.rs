//! Top-level run: parse flags, load config, then discover, watch and sync.

use std::sync::Arc;

use anyhow::{Context, Result};
use chapter_sync_core::{
    Credentials, Database, HttpClient, RunReport, Store, SyncEngine, VendorClient, add_to_watch,
    discover,
};
use clap::Parser;
use tokio_util::sync::CancellationToken;
use tracing::{debug, info, warn};

use crate::app::{config_manager, exit_handler, output, plan::RunPlan, terminal};
use crate::app_config;
use crate::cli::Args;
use crate::ProcessExit;

pub(crate) async fn run_chapter_sync() -> Result<ProcessExit> {
    let args = Args::parse();

    let loaded = app_config::load_file_config_from(args.config.as_deref())?;
    let file_config = loaded.config.as_ref();

    let default_level = config_manager::resolve_default_log_level(&args, file_config);
    terminal::init_tracing(default_level, terminal::is_no_color_requested());

    debug!(?args, config_path = ?loaded.path, config_loaded = file_config.is_some(), "CLI arguments parsed");
    load_dotenv();

    let settings = config_manager::resolve_settings(&args, file_config);
    let plan = RunPlan::from_args(&args, &settings, chrono::Utc::now().timestamp());
    debug!(?settings, ?plan, "run plan resolved");
    info!("chapter-sync starting");

    if let Some(parent) = settings.db_path.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create state directory '{}'", parent.display()))?;
    }
    let db = Database::new(&settings.db_path)
        .await
        .with_context(|| format!("Failed to open state store '{}'", settings.db_path.display()))?;
    let store = Arc::new(Store::new(db));

    if args.list {
        let summaries = store.list_watch_summaries().await?;
        print!("{}", output::render_watch_list(&summaries));
        return Ok(ProcessExit::Success);
    }

    let cancel = CancellationToken::new();
    spawn_interrupt_listener(cancel.clone());

    let credentials = Credentials::from_env();
    let missing = credentials.missing();
    if !missing.is_empty() {
        warn!(missing = ?missing, "vendor credentials incomplete; chapter downloads will fail");
    }
    let vendor = Arc::new(
        VendorClient::new(&settings.api_base_url, credentials)
            .context("Failed to build vendor API client")?,
    );

    let mut failed_probes = 0;
    if let Some(options) = plan.discover {
        let report = discover(store.as_ref(), vendor.as_ref(), &options, &cancel).await?;
        failed_probes = report.failed.len();
        if !args.quiet {
            println!(
                "Discovery: probed {}, found {}, failed {}",
                report.probed,
                report.found.len(),
                report.failed.len()
            );
        }
    }

    if !plan.watch_additions.is_empty() {
        let report = add_to_watch(store.as_ref(), &plan.watch_additions).await?;
        if !args.quiet {
            print!("{}", output::render_watch_additions(&report));
        }
    }

    if cancel.is_cancelled() {
        info!("interrupted before sync");
        return Ok(exit_handler::determine_exit_outcome(
            &RunReport::default(),
            failed_probes,
        ));
    }

    let fetcher = Arc::new(HttpClient::new().context("Failed to build download client")?);
    let engine = SyncEngine::new(
        store,
        vendor.clone(),
        vendor,
        fetcher,
        settings.data_dir,
        plan.sync,
    );
    let report = engine.run(&cancel).await?;

    if !args.quiet {
        print!("{}", output::render_run_summary(&report));
    }

    Ok(exit_handler::determine_exit_outcome(&report, failed_probes))
}

fn load_dotenv() {
    match dotenvy::dotenv() {
        Ok(path) => debug!(path = %path.display(), "loaded .env"),
        Err(error) if error.not_found() => {}
        Err(error) => warn!(error = %error, "could not read .env file"),
    }
}

fn spawn_interrupt_listener(cancel: CancellationToken) {
    tokio::spawn(async move {
        if tokio::signal::ctrl_c().await.is_ok() {
            warn!("interrupt received; stopping after the current step");
            cancel.cancel();
        }
    });
}
