use std::io::{self, BufRead, IsTerminal, Write};

use anyhow::{Context, Result, bail};
use indicatif::{ProgressBar, ProgressStyle};
use tracing::{info, info_span, warn};

use fuiman_cli::pipeline::{SourceCheck, check_sources, prepare_import};
use fuiman_folio::{FolioClient, FolioConfig};
use fuiman_import::{BatchExecutor, BatchProgress, BatchStatus, batch_count};
use fuiman_ingest::resolve_sources;

use crate::cli::{CheckArgs, FolioArgs, ImportArgs, PASSWORD_ENV};
use crate::types::{CheckResult, ImportRun, ImportSummary};

pub fn run_check(args: &CheckArgs) -> Result<CheckResult> {
    let client = folio_client(&args.folio)?;
    let sources = resolve_sources(&args.data).context("resolve input files")?;
    info!(sources = sources.len(), "Checking sources");

    let folio_error = {
        let span = info_span!("folio", endpoint = %client.config().endpoint);
        let _guard = span.enter();
        client.check_connectivity().err()
    };
    if let Some(reason) = &folio_error {
        warn!(%reason, "FOLIO connectivity check failed");
    }

    Ok(CheckResult {
        folio_error,
        sources: check_sources(&sources),
    })
}

pub fn run_import(args: &ImportArgs) -> Result<ImportRun> {
    let options = args.options.to_options();
    options.validate().context("invalid import options")?;
    let client = folio_client(&args.folio)?;
    let sources = resolve_sources(&args.data).context("resolve input files")?;

    let checks = check_sources(&sources);
    if !checks.iter().all(SourceCheck::is_ok) {
        return Ok(ImportRun::Blocked(CheckResult {
            folio_error: None,
            sources: checks,
        }));
    }
    let prepared = prepare_import(&checks)?;

    let batches: usize = prepared
        .iter()
        .map(|source| batch_count(source.records.len(), options.batch_size))
        .sum();
    let threshold = options.failed_user_threshold;
    let progress = progress_bar(batches as u64);
    let executor = BatchExecutor::new(options).with_observer(|batch: &BatchProgress<'_>| {
        progress.set_message(batch.source.to_string());
        if let BatchStatus::Failed { attempts, .. } = batch.status {
            progress.println(format!(
                "batch {} of {} failed after {attempts} attempts",
                batch.index + 1,
                batch.source
            ));
        }
        progress.inc(1);
    });
    let outcome = executor
        .run_sources(&client, &prepared)
        .context("import users")?;
    progress.finish_and_clear();

    Ok(ImportRun::Completed(ImportSummary {
        sources: prepared
            .iter()
            .map(|source| (source.name.clone(), source.records.len()))
            .collect(),
        outcome,
        threshold,
    }))
}

fn folio_client(args: &FolioArgs) -> Result<FolioClient> {
    let password = folio_password(args)?;
    let config = FolioConfig::new(&args.endpoint, &args.tenant, &args.username, password)
        .context("invalid FOLIO settings")?;
    FolioClient::new(config).context("create FOLIO client")
}

fn folio_password(args: &FolioArgs) -> Result<String> {
    if args.ask_password {
        eprint!("FOLIO Password: ");
        io::stderr().flush().context("write password prompt")?;
        return read_password(io::stdin().lock());
    }
    match args.password.as_deref() {
        Some(password) if !password.is_empty() => Ok(password.to_string()),
        _ => bail!("FOLIO Password is required (use --ask-folio-password or set {PASSWORD_ENV})"),
    }
}

/// Reads one line as the password, without its line ending.
fn read_password(mut reader: impl BufRead) -> Result<String> {
    let mut line = String::new();
    reader
        .read_line(&mut line)
        .context("read FOLIO password")?;
    let password = line.trim_end_matches(['\r', '\n']);
    if password.is_empty() {
        bail!("FOLIO Password is required");
    }
    Ok(password.to_string())
}

fn progress_bar(batches: u64) -> ProgressBar {
    if !io::stderr().is_terminal() {
        return ProgressBar::hidden();
    }
    let bar = ProgressBar::new(batches);
    if let Ok(style) =
        ProgressStyle::with_template("{spinner:.green} {msg} [{bar:40.cyan/blue}] {pos}/{len} batches")
    {
        bar.set_style(style.progress_chars("█▓▒░"));
    }
    bar
}
