//! CLI argument definitions for fuiman.

use std::path::PathBuf;

use clap::{Args, Parser, Subcommand, ValueEnum};
use clap_verbosity_flag::{Verbosity, WarnLevel};
use colorchoice_clap::Color;
use fuiman_import::{ImportOptions, TotalRecordsScope};

pub const ENDPOINT_ENV: &str = "FUIMAN__FOLIO__ENDPOINT";
pub const TENANT_ENV: &str = "FUIMAN__FOLIO__TENANT";
pub const USERNAME_ENV: &str = "FUIMAN__FOLIO__USERNAME";
pub const PASSWORD_ENV: &str = "FUIMAN__FOLIO__PASSWORD";

#[derive(Parser)]
#[command(
    name = "fuiman",
    version,
    about = "Initiates, monitors, and reports on mod-user-import operations in FOLIO",
    long_about = "Initiates, monitors, and reports on mod-user-import operations in FOLIO.\n\n\
                  Input files are CSVs with a header row; directories are searched \
                  recursively for *.csv files."
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Adjust log verbosity (-v for info, -vv for debug, -q for errors only).
    #[command(flatten)]
    pub verbosity: Verbosity<WarnLevel>,

    /// Control ANSI color output (auto, always, never).
    #[command(flatten)]
    pub color: Color,

    /// Explicit log level (overrides -v/-q flags).
    #[arg(long = "log-level", value_enum, global = true)]
    pub log_level: Option<LogLevelArg>,

    /// Log output format (pretty for human, json for machine parsing).
    #[arg(
        long = "log-format",
        value_enum,
        default_value = "pretty",
        global = true
    )]
    pub log_format: LogFormatArg,

    /// Write logs to a file instead of stderr.
    #[arg(long = "log-file", value_name = "PATH", global = true)]
    pub log_file: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Check FOLIO connectivity and validate the input files.
    Check(CheckArgs),

    /// Validate the input files and import their users into FOLIO.
    Import(ImportArgs),
}

#[derive(Args)]
pub struct FolioArgs {
    /// Service url of the FOLIO instance.
    #[arg(short = 'e', long = "folio-endpoint", env = ENDPOINT_ENV, value_name = "URL")]
    pub endpoint: String,

    /// Tenant of the FOLIO instance.
    #[arg(short = 't', long = "folio-tenant", env = TENANT_ENV)]
    pub tenant: String,

    /// Username of the FOLIO service user.
    #[arg(short = 'u', long = "folio-username", env = USERNAME_ENV)]
    pub username: String,

    /// Read the password of the FOLIO service user from standard input.
    ///
    /// Without this flag the password is taken from FUIMAN__FOLIO__PASSWORD.
    #[arg(short = 'p', long = "ask-folio-password")]
    pub ask_password: bool,

    #[arg(
        long = "folio-password",
        env = PASSWORD_ENV,
        hide = true,
        hide_env_values = true
    )]
    pub password: Option<String>,
}

#[derive(Args)]
pub struct CheckArgs {
    #[command(flatten)]
    pub folio: FolioArgs,

    /// One or more .csv files or directories containing .csv files.
    #[arg(value_name = "DATA", required = true, num_args = 1..)]
    pub data: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ImportArgs {
    #[command(flatten)]
    pub folio: FolioArgs,

    #[command(flatten)]
    pub options: ImportOptionArgs,

    /// One or more .csv files or directories containing .csv files.
    #[arg(value_name = "DATA", required = true, num_args = 1..)]
    pub data: Vec<PathBuf>,
}

#[derive(Args)]
pub struct ImportOptionArgs {
    /// Users sent per request.
    #[arg(long = "batch-size", default_value_t = 100)]
    pub batch_size: usize,

    /// Upper bound on concurrent requests. Batches are currently sent one at a time.
    #[arg(long = "max-concurrency", default_value_t = 1)]
    pub max_concurrency: usize,

    /// Extra attempts for a batch after a network error or server failure.
    #[arg(long = "retry-count", default_value_t = 1)]
    pub retry_count: u32,

    /// Delay before the first retry, doubled for each following attempt.
    #[arg(long = "retry-backoff-ms", value_name = "MS", default_value_t = 500)]
    pub retry_backoff_ms: u64,

    /// Percentage of failed users above which the import exits with an error.
    #[arg(long = "failed-user-threshold", value_name = "PERCENT", default_value_t = 50.0)]
    pub failed_user_threshold: f64,

    /// Deactivate users of the source type that are missing from the input.
    #[arg(long = "deactivate-missing-users")]
    pub deactivate_missing_users: bool,

    /// Overwrite every field of existing users, clearing fields absent from the input.
    #[arg(long = "update-all-fields")]
    pub update_all_fields: bool,

    /// Prefix FOLIO uses to scope externalSystemId values.
    #[arg(long = "source-type")]
    pub source_type: Option<String>,

    /// What totalRecords counts in each request.
    #[arg(long = "total-records", value_enum, default_value = "run")]
    pub total_records: TotalRecordsArg,
}

impl ImportOptionArgs {
    pub fn to_options(&self) -> ImportOptions {
        ImportOptions::default()
            .with_batch_size(self.batch_size)
            .with_max_concurrency(self.max_concurrency)
            .with_retry_count(self.retry_count)
            .with_retry_backoff_ms(self.retry_backoff_ms)
            .with_failed_user_threshold(self.failed_user_threshold)
            .with_deactivate_missing_users(self.deactivate_missing_users)
            .with_update_all_fields(self.update_all_fields)
            .with_source_type(self.source_type.clone())
            .with_total_records_scope(match self.total_records {
                TotalRecordsArg::Run => TotalRecordsScope::Run,
                TotalRecordsArg::Source => TotalRecordsScope::Source,
            })
    }
}

/// CLI choices for `totalRecords`.
#[derive(Clone, Copy, ValueEnum)]
pub enum TotalRecordsArg {
    /// All records of the run.
    Run,
    /// Records of the batch's own source.
    Source,
}

/// CLI log level choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogLevelArg {
    Error,
    Warn,
    Info,
    Debug,
    Trace,
}

/// CLI log format choices.
#[derive(Clone, Copy, ValueEnum)]
pub enum LogFormatArg {
    Pretty,
    Compact,
    Json,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn parse(args: &[&str]) -> Cli {
        Cli::try_parse_from(args).unwrap()
    }

    #[test]
    fn test_import_defaults_match_library() {
        let cli = parse(&[
            "fuiman", "import", "-e", "folio.example.org", "-t", "diku", "-u", "admin",
            "users.csv",
        ]);
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        let options = args.options.to_options();
        let defaults = ImportOptions::default();
        assert_eq!(options.batch_size, defaults.batch_size);
        assert_eq!(options.retry_count, defaults.retry_count);
        assert_eq!(options.failed_user_threshold, defaults.failed_user_threshold);
        assert_eq!(options.retry_backoff_ms, 500);
        assert_eq!(options.total_records_scope, TotalRecordsScope::Run);
        assert!(options.update_only_present_fields());
        assert_eq!(args.data, vec![PathBuf::from("users.csv")]);
    }

    #[test]
    fn test_import_flags() {
        let cli = parse(&[
            "fuiman",
            "-v",
            "import",
            "--folio-endpoint=https://folio.example.org",
            "--folio-tenant=diku",
            "--folio-username=admin",
            "--ask-folio-password",
            "--batch-size=25",
            "--update-all-fields",
            "--deactivate-missing-users",
            "--source-type=ldap",
            "--total-records=source",
            "a.csv",
            "dir",
        ]);
        let Command::Import(args) = cli.command else {
            panic!("expected import");
        };
        assert!(args.folio.ask_password);
        let options = args.options.to_options();
        assert_eq!(options.batch_size, 25);
        assert!(!options.update_only_present_fields());
        assert!(options.deactivate_missing_users);
        assert_eq!(options.source_type.as_deref(), Some("ldap"));
        assert_eq!(options.total_records_scope, TotalRecordsScope::Source);
        assert_eq!(args.data.len(), 2);
    }

    #[test]
    fn test_data_is_required() {
        assert!(
            Cli::try_parse_from(["fuiman", "check", "-e", "x", "-t", "diku", "-u", "admin"])
                .is_err()
        );
    }
}
