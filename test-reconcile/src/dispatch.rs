// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

use crate::{
    ExpectedError, Result,
    output::{OutputContext, OutputOpts, OutputWriter, clap_styles},
};
use camino::{Utf8Path, Utf8PathBuf};
use clap::{Args, Parser, ValueEnum};
use reconcile_runner::{
    ReconcileExitCode,
    compare::compare,
    config::ReconcileConfig,
    dialect::LogDialect,
    input::{InputLabel, read_input},
    reporter::{ReportFormat, ReporterBuilder, to_json},
    structured::StructuredExtractor,
};
use supports_color::Stream;

/// Check that a structured test-result file and a test-runner log agree.
///
/// Both sources are reduced to a mapping from test name to canonical outcome, then compared:
/// tests present in only one source and tests whose outcomes differ are reported.
#[derive(Debug, Parser)]
#[command(version, styles = clap_styles::style())]
pub struct ReconcileApp {
    /// Structured reference results: a JSON document or newline-delimited JSON
    #[arg(long, value_name = "PATH")]
    reference: Utf8PathBuf,

    /// Test-runner log to reconcile against the reference
    #[arg(long, value_name = "PATH")]
    log: Utf8PathBuf,

    /// Log dialect [default: from the profile]
    #[arg(long, value_enum, value_name = "DIALECT")]
    dialect: Option<DialectOpt>,

    #[command(flatten)]
    config_opts: ConfigOpts,

    #[command(flatten)]
    reporter_opts: ReporterOpts,

    #[command(flatten)]
    output: OutputOpts,
}

impl ReconcileApp {
    /// Initializes the output context.
    pub fn init_output(&self) -> OutputContext {
        self.output.init()
    }

    /// Executes the app, returning the process exit code on success.
    pub fn exec(self, output: OutputContext, output_writer: &mut OutputWriter) -> Result<i32> {
        let config = self.config_opts.make_config(Utf8Path::new("."))?;
        let profile_name = self
            .config_opts
            .profile
            .as_deref()
            .unwrap_or(ReconcileConfig::DEFAULT_PROFILE);
        let profile = config.profile(profile_name)?;

        let dialect = self.dialect.map_or_else(|| profile.dialect(), LogDialect::from);
        let canonicalizer = profile.canonicalizer_for(dialect);
        tracing::debug!("using profile `{}` with the {dialect} log dialect", profile.name());

        let reference_text = read_input(&self.reference, InputLabel::Reference)?;
        let log_text = read_input(&self.log, InputLabel::Log)?;

        let reference = StructuredExtractor::new(&canonicalizer)
            .with_keys(profile.structured_keys())
            .with_preview_chars(profile.preview_chars())
            .extract(&reference_text)
            .map_err(|err| {
                ExpectedError::extraction_failed(InputLabel::Reference, &self.reference, err)
            })?;
        tracing::info!("parsed {} tests from {}", reference.len(), self.reference);

        let observed = dialect
            .extract(&log_text, &canonicalizer)
            .map_err(|err| ExpectedError::extraction_failed(InputLabel::Log, &self.log, err))?;
        tracing::info!("parsed {} tests from {}", observed.len(), self.log);

        let result = compare(&reference, &observed);

        let reporter = ReporterBuilder::default()
            .set_format(self.reporter_opts.message_format.into())
            .set_json_diff(profile.json_diff())
            .set_colorize(output.color.should_colorize(Stream::Stdout))
            .build();
        reporter
            .write_report(&result, &mut output_writer.stdout_writer())
            .map_err(|err| ExpectedError::WriteOutputError { err })?;

        if let Some(path) = &self.reporter_opts.json_out {
            let mut json = to_json(&result);
            json.push('\n');
            std::fs::write(path, json).map_err(|err| ExpectedError::JsonOutWriteError {
                path: path.clone(),
                err,
            })?;
            tracing::debug!("wrote JSON comparison to {path}");
        }

        if !result.same && profile.fail_on_mismatch() {
            tracing::debug!("sources differ and fail-on-mismatch is set");
            Ok(ReconcileExitCode::MISMATCH)
        } else {
            Ok(ReconcileExitCode::OK)
        }
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Config options")]
struct ConfigOpts {
    /// Config file [default: .config/reconcile.toml]
    #[arg(long, value_name = "PATH")]
    config_file: Option<Utf8PathBuf>,

    /// Config profile to use
    #[arg(long, short = 'P', env = "RECONCILE_PROFILE", value_name = "NAME")]
    profile: Option<String>,
}

impl ConfigOpts {
    fn make_config(&self, dir: &Utf8Path) -> Result<ReconcileConfig> {
        Ok(ReconcileConfig::from_sources(dir, self.config_file.as_deref())?)
    }
}

#[derive(Debug, Args)]
#[command(next_help_heading = "Reporter options")]
struct ReporterOpts {
    /// Report format
    #[arg(long, value_enum, default_value_t, value_name = "FMT")]
    message_format: MessageFormatOpt,

    /// Also write the JSON comparison to this file
    #[arg(long, value_name = "PATH")]
    json_out: Option<Utf8PathBuf>,
}

#[derive(Copy, Clone, Debug, ValueEnum)]
enum DialectOpt {
    /// `<name> <STATUS>` lines, as printed by pytest -v
    #[value(alias = "pytest")]
    Generic,

    /// googletest console output or JSON report
    #[value(alias = "gtest")]
    Bracketed,

    /// Rust libtest console output or JSON events
    #[value(alias = "rust")]
    Libtest,
}

impl From<DialectOpt> for LogDialect {
    fn from(opt: DialectOpt) -> Self {
        match opt {
            DialectOpt::Generic => LogDialect::Generic,
            DialectOpt::Bracketed => LogDialect::Bracketed,
            DialectOpt::Libtest => LogDialect::Libtest,
        }
    }
}

#[derive(Copy, Clone, Debug, Default, ValueEnum)]
enum MessageFormatOpt {
    /// Section-banner report for humans
    #[default]
    Human,

    /// The comparison as JSON
    Json,
}

impl From<MessageFormatOpt> for ReportFormat {
    fn from(opt: MessageFormatOpt) -> Self {
        match opt {
            MessageFormatOpt::Human => ReportFormat::Human,
            MessageFormatOpt::Json => ReportFormat::Json,
        }
    }
}
