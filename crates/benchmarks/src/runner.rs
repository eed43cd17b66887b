// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! The dual-client comparison runner.
//!
//! Both clients are launched together and awaited jointly. A failure on one
//! side never cancels the other. Once both have settled, each successful call
//! is persisted and the latencies are judged against the tolerance.

use crate::io;
use crate::result::format_duration;
use chrono::{DateTime, Utc};
use sdk_parity_core::{
    ClientError, ClientInvocation, ClientLabel, ComparisonOutcome, ModelClient, Prompt,
    DEFAULT_TOLERANCE_MS,
};
use serde::Serialize;
use std::path::PathBuf;
use std::time::Instant;
use thiserror::Error;
use tracing::{info, warn};
use uuid::Uuid;

/// Errors that end a comparison run without a verdict.
#[derive(Debug, Error)]
pub enum BenchmarkError {
    /// One client failed; the other succeeded
    #[error("{} test failed: {source}", .label.display_name())]
    ClientFailed {
        /// The failing client
        label: ClientLabel,
        /// What the client reported
        #[source]
        source: ClientError,
    },

    /// Both clients failed
    #[error("both calls failed: Google GenAI: {direct}; LangChain Vertex: {framework}")]
    BothFailed {
        /// Error of the direct client
        direct: ClientError,
        /// Error of the framework client
        framework: ClientError,
    },

    /// A result record could not be written
    #[error("failed to persist {label} result: {source}")]
    Persist {
        /// Client whose record failed to write
        label: ClientLabel,
        /// Underlying I/O error
        #[source]
        source: std::io::Error,
    },
}

/// Options for one comparison run.
#[derive(Debug, Clone)]
pub struct RunOptions {
    /// Directory the result records are written to
    pub results_dir: PathBuf,
    /// Maximum accepted latency difference
    pub tolerance_ms: u64,
}

impl Default for RunOptions {
    fn default() -> Self {
        Self {
            results_dir: PathBuf::from(io::RESULTS_DIR),
            tolerance_ms: DEFAULT_TOLERANCE_MS,
        }
    }
}

/// Timing summary of one successful call.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvocationSummary {
    /// Which client
    pub label: ClientLabel,
    /// Duration as `seconds:milliseconds`
    pub duration: String,
    /// Duration in milliseconds
    pub duration_ms: u64,
    /// Launch time
    pub started_at: DateTime<Utc>,
    /// Settle time
    pub ended_at: DateTime<Utc>,
    /// Where the record was written
    pub result_path: PathBuf,
}

/// Everything a successful run produced.
#[derive(Debug, Clone, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ComparisonReport {
    /// Unique id of this run
    pub run_id: Uuid,
    /// Tolerance the outcome was judged against
    pub tolerance_ms: u64,
    /// The direct client's call
    pub direct: InvocationSummary,
    /// The framework client's call
    pub framework: InvocationSummary,
    /// The verdict
    pub outcome: ComparisonOutcome,
}

impl ComparisonReport {
    /// The time difference formatted as `seconds:milliseconds`.
    pub fn difference(&self) -> String {
        format_duration(self.outcome.time_difference_ms)
    }
}

/// Call one client once and time it.
pub async fn timed_invoke(client: &dyn ModelClient, prompt: &Prompt) -> ClientInvocation {
    let label = client.label();
    let started_at = Utc::now();
    let clock = Instant::now();

    info!(client = %label, "Sending request");
    let outcome = client.invoke(prompt).await;

    let duration_ms = clock.elapsed().as_millis() as u64;
    let invocation = ClientInvocation {
        label,
        started_at,
        ended_at: Utc::now(),
        duration_ms,
        outcome,
    };

    metrics::histogram!("sdk_parity_call_duration_ms", "client" => label.as_str())
        .record(duration_ms as f64);
    match invocation.error() {
        None => info!(client = %label, duration_ms, "Call succeeded"),
        Some(e) => {
            metrics::counter!("sdk_parity_call_failures_total", "client" => label.as_str())
                .increment(1);
            warn!(
                client = %label,
                duration_ms,
                input_error = e.is_input_error(),
                error = %e,
                "Call failed"
            );
        }
    }

    invocation
}

/// Run both clients concurrently on the same prompt and compare latencies.
///
/// Records are written for every call that succeeded, after both calls have
/// settled. A failed call gets no record, and any record left for it by an
/// earlier run is removed. If either call failed the run returns an error and
/// no verdict.
///
/// # Errors
///
/// Returns [`BenchmarkError::ClientFailed`] or [`BenchmarkError::BothFailed`]
/// when a call fails. A client failure takes precedence over a write failure,
/// which is only logged in that case. [`BenchmarkError::Persist`] is returned
/// when both calls succeeded but a record cannot be written.
pub async fn run_comparison(
    direct: &dyn ModelClient,
    framework: &dyn ModelClient,
    prompt: &Prompt,
    options: &RunOptions,
) -> Result<ComparisonReport, BenchmarkError> {
    let run_id = Uuid::new_v4();
    info!(
        %run_id,
        direct = direct.label().display_name(),
        framework = framework.label().display_name(),
        has_image = prompt.image().is_some(),
        "Starting comparison"
    );

    let (direct_call, framework_call) =
        tokio::join!(timed_invoke(direct, prompt), timed_invoke(framework, prompt));

    info!(
        %run_id,
        direct_ok = direct_call.is_success(),
        framework_ok = framework_call.is_success(),
        "Both calls settled"
    );

    // Both sides are written before any error is returned.
    let direct_path = persist_invocation(&direct_call, options);
    let framework_path = persist_invocation(&framework_call, options);
    for err in [&direct_path, &framework_path]
        .into_iter()
        .filter_map(|persisted| persisted.as_ref().err())
    {
        warn!(%run_id, error = %err, "Result record not updated");
    }

    let (direct, framework) = match (direct_call, framework_call) {
        (
            ClientInvocation {
                outcome: Err(direct), ..
            },
            ClientInvocation {
                outcome: Err(framework),
                ..
            },
        ) => return Err(BenchmarkError::BothFailed { direct, framework }),
        (
            ClientInvocation {
                label,
                outcome: Err(source),
                ..
            },
            _,
        )
        | (
            _,
            ClientInvocation {
                label,
                outcome: Err(source),
                ..
            },
        ) => return Err(BenchmarkError::ClientFailed { label, source }),
        (direct, framework) => (
            summarize(&direct, direct_path?),
            summarize(&framework, framework_path?),
        ),
    };

    let outcome =
        ComparisonOutcome::evaluate(direct.duration_ms, framework.duration_ms, options.tolerance_ms);

    let report = ComparisonReport {
        run_id,
        tolerance_ms: options.tolerance_ms,
        direct,
        framework,
        outcome,
    };

    info!(
        %run_id,
        direct_ms = report.direct.duration_ms,
        framework_ms = report.framework.duration_ms,
        difference_ms = outcome.time_difference_ms,
        within_tolerance = outcome.within_tolerance,
        "Comparison complete"
    );

    Ok(report)
}

/// Write the record for a successful call, or clear a stale one for a failed call.
fn persist_invocation(
    invocation: &ClientInvocation,
    options: &RunOptions,
) -> Result<PathBuf, BenchmarkError> {
    let label = invocation.label;
    let persisted = match invocation.response() {
        Some(response) => {
            io::persist_result(&options.results_dir, label, invocation.duration_ms, response)
        }
        None => io::remove_result(&options.results_dir, label)
            .map(|_| io::result_path(&options.results_dir, label)),
    };
    persisted.map_err(|source| BenchmarkError::Persist { label, source })
}

fn summarize(invocation: &ClientInvocation, result_path: PathBuf) -> InvocationSummary {
    InvocationSummary {
        label: invocation.label,
        duration: format_duration(invocation.duration_ms),
        duration_ms: invocation.duration_ms,
        started_at: invocation.started_at,
        ended_at: invocation.ended_at,
        result_path,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::io::{read_result, result_path};
    use async_trait::async_trait;
    use mockall::mock;
    use serde_json::json;
    use std::time::Duration;

    mock! {
        pub Client {}

        #[async_trait]
        impl ModelClient for Client {
            fn label(&self) -> ClientLabel;
            async fn invoke(&self, prompt: &Prompt) -> Result<serde_json::Value, ClientError>;
        }
    }

    fn mock_client(label: ClientLabel, outcome: fn() -> Result<serde_json::Value, ClientError>) -> MockClient {
        let mut client = MockClient::new();
        client.expect_label().return_const(label);
        client.expect_invoke().times(1).returning(move |_| outcome());
        client
    }

    /// Fake client that sleeps before answering.
    struct SlowClient {
        label: ClientLabel,
        delay: Duration,
    }

    #[async_trait]
    impl ModelClient for SlowClient {
        fn label(&self) -> ClientLabel {
            self.label
        }

        async fn invoke(&self, prompt: &Prompt) -> Result<serde_json::Value, ClientError> {
            tokio::time::sleep(self.delay).await;
            Ok(json!({ "echo": prompt.user_input() }))
        }
    }

    fn options(dir: &std::path::Path) -> RunOptions {
        RunOptions {
            results_dir: dir.to_path_buf(),
            tolerance_ms: DEFAULT_TOLERANCE_MS,
        }
    }

    fn prompt() -> Prompt {
        Prompt::new("system", "user")
    }

    #[tokio::test]
    async fn test_successful_run_writes_two_records() {
        let dir = tempfile::tempdir().unwrap();
        let direct = mock_client(ClientLabel::Direct, || Ok(json!({"text": "a"})));
        let framework = mock_client(ClientLabel::FrameworkWrapped, || Ok(json!({"content": "b"})));

        let report = run_comparison(&direct, &framework, &prompt(), &options(dir.path()))
            .await
            .unwrap();

        assert!(report.outcome.within_tolerance);
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);

        for label in ClientLabel::ALL {
            let record = read_result(dir.path(), label).unwrap();
            assert!(record.is_consistent());
        }
        let genai = read_result(dir.path(), ClientLabel::Direct).unwrap();
        assert_eq!(genai.result, json!({"text": "a"}));
        assert_eq!(report.framework.result_path, dir.path().join("langchain.json"));
    }

    #[tokio::test]
    async fn test_calls_run_concurrently() {
        let dir = tempfile::tempdir().unwrap();
        let direct = SlowClient {
            label: ClientLabel::Direct,
            delay: Duration::from_millis(300),
        };
        let framework = SlowClient {
            label: ClientLabel::FrameworkWrapped,
            delay: Duration::from_millis(300),
        };

        let clock = Instant::now();
        let report = run_comparison(&direct, &framework, &prompt(), &options(dir.path()))
            .await
            .unwrap();

        // Sequential calls would take at least 600ms.
        assert!(clock.elapsed() < Duration::from_millis(600));
        assert!(report.direct.duration_ms >= 300);
        assert!(report.framework.duration_ms >= 300);
    }

    #[tokio::test]
    async fn test_one_failure_does_not_cancel_the_other() {
        let dir = tempfile::tempdir().unwrap();
        let direct = mock_client(ClientLabel::Direct, || Ok(json!({"text": "a"})));
        let framework = mock_client(ClientLabel::FrameworkWrapped, || Err(ClientError::MissingImage));

        let err = run_comparison(&direct, &framework, &prompt(), &options(dir.path()))
            .await
            .unwrap_err();

        match err {
            BenchmarkError::ClientFailed { label, source } => {
                assert_eq!(label, ClientLabel::FrameworkWrapped);
                assert!(matches!(source, ClientError::MissingImage));
            }
            other => panic!("unexpected error: {other}"),
        }
        assert!(result_path(dir.path(), ClientLabel::Direct).exists());
        assert!(!result_path(dir.path(), ClientLabel::FrameworkWrapped).exists());
    }

    #[tokio::test]
    async fn test_client_failure_wins_over_write_failure() {
        let dir = tempfile::tempdir().unwrap();
        let blocker = dir.path().join("results");
        std::fs::write(&blocker, "not a directory").unwrap();

        let direct = mock_client(ClientLabel::Direct, || Ok(json!({"text": "a"})));
        let framework = mock_client(ClientLabel::FrameworkWrapped, || Err(ClientError::MissingImage));

        let err = run_comparison(&direct, &framework, &prompt(), &options(&blocker))
            .await
            .unwrap_err();

        match err {
            BenchmarkError::ClientFailed { label, source } => {
                assert_eq!(label, ClientLabel::FrameworkWrapped);
                assert!(matches!(source, ClientError::MissingImage));
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[tokio::test]
    async fn test_write_failure_does_not_skip_other_record() {
        let dir = tempfile::tempdir().unwrap();
        // A directory where the direct record belongs makes that write fail.
        std::fs::create_dir(result_path(dir.path(), ClientLabel::Direct)).unwrap();

        let direct = mock_client(ClientLabel::Direct, || Ok(json!({"text": "a"})));
        let framework = mock_client(ClientLabel::FrameworkWrapped, || Ok(json!({"content": "b"})));

        let err = run_comparison(&direct, &framework, &prompt(), &options(dir.path()))
            .await
            .unwrap_err();

        assert!(matches!(
            err,
            BenchmarkError::Persist {
                label: ClientLabel::Direct,
                ..
            }
        ));
        let record = read_result(dir.path(), ClientLabel::FrameworkWrapped).unwrap();
        assert_eq!(record.result, json!({"content": "b"}));
    }

    #[tokio::test]
    async fn test_failed_side_clears_stale_record() {
        let dir = tempfile::tempdir().unwrap();
        io::persist_result(dir.path(), ClientLabel::Direct, 10, &json!("old")).unwrap();

        let direct = mock_client(ClientLabel::Direct, || {
            Err(ClientError::Transport("connection refused".into()))
        });
        let framework = mock_client(ClientLabel::FrameworkWrapped, || Ok(json!("ok")));

        let err = run_comparison(&direct, &framework, &prompt(), &options(dir.path()))
            .await
            .unwrap_err();

        assert!(err.to_string().starts_with("Google GenAI test failed"));
        assert!(!result_path(dir.path(), ClientLabel::Direct).exists());
        assert!(result_path(dir.path(), ClientLabel::FrameworkWrapped).exists());
    }

    #[tokio::test]
    async fn test_both_failures_are_reported() {
        let dir = tempfile::tempdir().unwrap();
        let direct = mock_client(ClientLabel::Direct, || {
            Err(ClientError::MissingCredential("GOOGLE_API_KEY".into()))
        });
        let framework = mock_client(ClientLabel::FrameworkWrapped, || Err(ClientError::MissingImage));

        let err = run_comparison(&direct, &framework, &prompt(), &options(dir.path()))
            .await
            .unwrap_err();

        assert!(matches!(err, BenchmarkError::BothFailed { .. }));
        let message = err.to_string();
        assert!(message.contains("GOOGLE_API_KEY"));
        assert!(message.contains("image input is required"));
        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 0);
    }

    #[tokio::test]
    async fn test_rerun_overwrites_records() {
        let dir = tempfile::tempdir().unwrap();
        for text in ["first", "second"] {
            let direct = SlowClient {
                label: ClientLabel::Direct,
                delay: Duration::ZERO,
            };
            let framework = SlowClient {
                label: ClientLabel::FrameworkWrapped,
                delay: Duration::ZERO,
            };
            let prompt = Prompt::new("system", text);
            run_comparison(&direct, &framework, &prompt, &options(dir.path()))
                .await
                .unwrap();
        }

        assert_eq!(std::fs::read_dir(dir.path()).unwrap().count(), 2);
        let record = read_result(dir.path(), ClientLabel::FrameworkWrapped).unwrap();
        assert_eq!(record.result, json!({"echo": "second"}));
    }

    #[tokio::test]
    async fn test_tolerance_comes_from_options() {
        let dir = tempfile::tempdir().unwrap();
        let direct = SlowClient {
            label: ClientLabel::Direct,
            delay: Duration::ZERO,
        };
        let framework = SlowClient {
            label: ClientLabel::FrameworkWrapped,
            delay: Duration::from_millis(150),
        };
        let options = RunOptions {
            results_dir: dir.path().to_path_buf(),
            tolerance_ms: 50,
        };

        let report = run_comparison(&direct, &framework, &prompt(), &options)
            .await
            .unwrap();
        assert_eq!(report.tolerance_ms, 50);
        assert!(report.outcome.time_difference_ms >= 100);
        assert!(!report.outcome.within_tolerance);
    }
}
