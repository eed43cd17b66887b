// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Markdown output generation for comparison results.
//!
//! Reports can be rendered from a live [`ComparisonReport`] or from the two
//! records persisted by an earlier run.

use crate::result::{format_duration, ResultRecord};
use crate::runner::{ComparisonReport, InvocationSummary};
use sdk_parity_core::{ClientLabel, ComparisonOutcome};
use std::fmt::Write;

/// Generate a markdown summary of a finished run.
pub fn generate_summary(report: &ComparisonReport) -> String {
    let mut output = String::new();

    writeln!(output, "# SDK Latency Comparison").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "Run: `{}`", report.run_id).unwrap();
    writeln!(output).unwrap();
    writeln!(output, "| Client | Duration | Duration (ms) | Started |").unwrap();
    writeln!(output, "|--------|----------|---------------|---------|").unwrap();

    for summary in [&report.direct, &report.framework] {
        write_summary_row(&mut output, summary);
    }

    writeln!(output).unwrap();
    write_verdict(&mut output, &report.outcome, report.tolerance_ms);

    output
}

/// Generate a markdown report from persisted records.
///
/// The verdict is only rendered when both records are present.
pub fn generate_record_report(
    records: &[(ClientLabel, Option<ResultRecord>)],
    tolerance_ms: u64,
) -> String {
    let mut output = String::new();

    writeln!(output, "# Persisted SDK Results").unwrap();
    writeln!(output).unwrap();
    writeln!(output, "| Client | Duration | Duration (ms) | Captured |").unwrap();
    writeln!(output, "|--------|----------|---------------|----------|").unwrap();

    for (label, record) in records {
        match record {
            Some(record) => writeln!(
                output,
                "| {} | {} | {} | {} |",
                label.display_name(),
                record.duration,
                record.duration_ms,
                record.timestamp.format("%Y-%m-%d %H:%M:%S UTC")
            )
            .unwrap(),
            None => writeln!(output, "| {} | - | - | missing |", label.display_name()).unwrap(),
        }
    }

    writeln!(output).unwrap();

    let durations: Vec<u64> = records
        .iter()
        .filter_map(|(_, record)| record.as_ref().map(|r| r.duration_ms))
        .collect();
    if let &[first, second] = durations.as_slice() {
        let outcome = ComparisonOutcome::evaluate(first, second, tolerance_ms);
        write_verdict(&mut output, &outcome, tolerance_ms);
    } else {
        writeln!(output, "Not enough records for a comparison.").unwrap();
    }

    output
}

fn write_summary_row(output: &mut String, summary: &InvocationSummary) {
    writeln!(
        output,
        "| {} | {} | {} | {} |",
        summary.label.display_name(),
        summary.duration,
        summary.duration_ms,
        summary.started_at.format("%Y-%m-%d %H:%M:%S%.3f UTC")
    )
    .unwrap();
}

fn write_verdict(output: &mut String, outcome: &ComparisonOutcome, tolerance_ms: u64) {
    writeln!(
        output,
        "**Time difference:** {} ({}ms)",
        format_duration(outcome.time_difference_ms),
        outcome.time_difference_ms
    )
    .unwrap();
    writeln!(
        output,
        "**Tolerance:** {} ({}ms)",
        format_duration(tolerance_ms),
        tolerance_ms
    )
    .unwrap();
    let verdict = if outcome.within_tolerance {
        "within tolerance"
    } else {
        "EXCEEDS tolerance"
    };
    writeln!(output, "**Verdict:** {}", verdict).unwrap();
}
