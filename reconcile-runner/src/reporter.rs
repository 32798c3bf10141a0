// Copyright (c) The nextest Contributors
// SPDX-License-Identifier: MIT OR Apache-2.0

//! Rendering of comparison results.
//!
//! Two formats are supported: a human-readable report with section banners, and the
//! machine-readable JSON serialization of [`ComparisonResult`]. By default the human report
//! embeds the JSON as well, so that one log captures both.

use crate::compare::{ComparisonResult, Verdict};
use owo_colors::{OwoColorize, Style};
use std::io;
use swrite::{SWrite, swrite, swriteln};

const RULE_WIDTH: usize = 72;

/// The format a comparison report is rendered in.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
pub enum ReportFormat {
    /// Section-banner report for humans.
    #[default]
    Human,

    /// Pretty-printed JSON only.
    Json,
}

/// Builds a [`Reporter`].
#[derive(Clone, Debug)]
pub struct ReporterBuilder {
    format: ReportFormat,
    json_diff: bool,
    colorize: bool,
}

impl Default for ReporterBuilder {
    fn default() -> Self {
        Self {
            format: ReportFormat::Human,
            json_diff: true,
            colorize: false,
        }
    }
}

impl ReporterBuilder {
    /// Sets the output format.
    pub fn set_format(&mut self, format: ReportFormat) -> &mut Self {
        self.format = format;
        self
    }

    /// Sets whether the human report ends with the JSON serialization.
    pub fn set_json_diff(&mut self, json_diff: bool) -> &mut Self {
        self.json_diff = json_diff;
        self
    }

    /// Sets whether the human report is colorized.
    pub fn set_colorize(&mut self, colorize: bool) -> &mut Self {
        self.colorize = colorize;
        self
    }

    /// Creates the reporter.
    pub fn build(&self) -> Reporter {
        let mut styles = Styles::default();
        if self.colorize {
            styles.colorize();
        }
        Reporter {
            format: self.format,
            json_diff: self.json_diff,
            styles,
        }
    }
}

/// Renders [`ComparisonResult`]s.
#[derive(Clone, Debug)]
pub struct Reporter {
    format: ReportFormat,
    json_diff: bool,
    styles: Styles,
}

impl Reporter {
    /// Writes the report for `result` to `writer`.
    pub fn write_report(
        &self,
        result: &ComparisonResult,
        writer: &mut dyn io::Write,
    ) -> io::Result<()> {
        writer.write_all(self.render(result).as_bytes())?;
        writer.flush()
    }

    /// Renders the report for `result` to a string.
    pub fn render(&self, result: &ComparisonResult) -> String {
        match self.format {
            ReportFormat::Human => self.render_human(result),
            ReportFormat::Json => {
                let mut out = to_json(result);
                out.push('\n');
                out
            }
        }
    }

    fn render_human(&self, result: &ComparisonResult) -> String {
        let styles = &self.styles;
        let heavy_rule = "=".repeat(RULE_WIDTH);
        let light_rule = "-".repeat(RULE_WIDTH);
        let verdict_style = if result.same { styles.pass } else { styles.fail };

        let mut out = String::new();
        swriteln!(out, "{heavy_rule}");
        let banner = if result.same {
            "MATCH"
        } else {
            "DIFFERENCES FOUND"
        };
        swriteln!(out, "{}", banner.style(verdict_style));
        swriteln!(out, "{heavy_rule}");
        swriteln!(
            out,
            "Counts equal:   {} (JSON={}, LOG={})",
            self.flag(result.counts_equal),
            result.count_json.style(styles.count),
            result.count_log.style(styles.count),
        );
        swriteln!(out, "Names equal:    {}", self.flag(result.names_equal));
        swriteln!(out, "Statuses equal: {}", self.flag(result.statuses_equal));
        swriteln!(out, "{light_rule}");

        if !result.only_in_json.is_empty() {
            swriteln!(out, "{}", "Present only in JSON:".style(styles.heading));
            for name in &result.only_in_json {
                swriteln!(out, "  • {name}");
            }
            swriteln!(out, "{light_rule}");
        }

        if !result.only_in_log.is_empty() {
            swriteln!(out, "{}", "Present only in LOG:".style(styles.heading));
            for name in &result.only_in_log {
                swriteln!(out, "  • {name}");
            }
            swriteln!(out, "{light_rule}");
        }

        if !result.status_mismatches.is_empty() {
            swriteln!(out, "{}", "Status mismatches:".style(styles.heading));
            for mismatch in &result.status_mismatches {
                swriteln!(out, "  • {}", mismatch.name);
                swriteln!(
                    out,
                    "      JSON={} | LOG={}",
                    mismatch.reference.style(styles.outcome),
                    mismatch.observed.style(styles.outcome),
                );
            }
            swriteln!(out, "{light_rule}");
        }

        if result.same {
            swriteln!(out, "All checks passed: counts, names, and statuses match.");
        } else {
            swriteln!(out, "See details above for differences.");
        }

        if self.json_diff {
            out.push('\n');
            swriteln!(out, "JSON_DIFF =");
            swriteln!(out, "{}", to_json(result));
        }

        let verdict = result.verdict();
        swriteln!(out, "{heavy_rule}");
        swrite!(out, "FINAL REVIEW STATUS: ");
        swriteln!(
            out,
            "{}",
            verdict.style(match verdict {
                Verdict::Pass => styles.pass,
                Verdict::Fail => styles.fail,
            })
        );
        swriteln!(out, "{heavy_rule}");
        out
    }

    fn flag(&self, value: bool) -> String {
        let style = if value {
            self.styles.pass
        } else {
            self.styles.fail
        };
        format!("{}", value.style(style))
    }
}

/// Serializes a comparison result as pretty-printed JSON.
pub fn to_json(result: &ComparisonResult) -> String {
    serde_json::to_string_pretty(result).expect("ComparisonResult serialization is infallible")
}

#[derive(Clone, Debug, Default)]
struct Styles {
    pass: Style,
    fail: Style,
    count: Style,
    heading: Style,
    outcome: Style,
}

impl Styles {
    fn colorize(&mut self) {
        self.pass = Style::new().green().bold();
        self.fail = Style::new().red().bold();
        self.count = Style::new().bold();
        self.heading = Style::new().bold();
        self.outcome = Style::new().yellow();
    }
}
