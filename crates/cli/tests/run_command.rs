// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! End-to-end tests of the `run` command against mocked backends.

use clap::Parser;
use sdk_parity_benchmarks::{io, parse_duration};
use sdk_parity_cli::{execute, Cli, EXIT_OK, EXIT_TOLERANCE_EXCEEDED};
use sdk_parity_core::ClientLabel;
use serde_json::{json, Value};
use std::fs;
use std::path::Path;
use std::time::Duration;
use wiremock::matchers::{method, path};
use wiremock::{Mock, MockServer, ResponseTemplate};

const GENAI_PATH: &str = "/v1beta/models/gemini-2.5-flash:generateContent";
const VERTEX_PATH: &str = "/v1/publishers/google/models/gemini-2.5-flash:generateContent";

fn reply(text: &str) -> Value {
    json!({
        "candidates": [{"content": {"role": "model", "parts": [{"text": text}]}, "finishReason": "STOP"}],
        "usageMetadata": {"promptTokenCount": 5, "candidatesTokenCount": 2, "totalTokenCount": 7}
    })
}

async fn mount_backends(server: &MockServer, vertex_delay: Duration) {
    Mock::given(method("POST"))
        .and(path(GENAI_PATH))
        .respond_with(ResponseTemplate::new(200).set_body_json(reply("direct")))
        .mount(server)
        .await;
    Mock::given(method("POST"))
        .and(path(VERTEX_PATH))
        .respond_with(
            ResponseTemplate::new(200)
                .set_body_json(reply("framework"))
                .set_delay(vertex_delay),
        )
        .mount(server)
        .await;
}

/// Lay out prompt documents and a settings file pointing at `server`.
fn workspace(dir: &Path, server: &MockServer, with_image: bool) -> std::path::PathBuf {
    fs::write(dir.join("system-instructions.md"), "Be terse.").unwrap();
    fs::write(dir.join("user-input.md"), "What is this?").unwrap();
    if with_image {
        fs::write(dir.join("snapshot.png"), [0x89, b'P', b'N', b'G']).unwrap();
    }

    let config = dir.join("bench.toml");
    fs::write(
        &config,
        format!(
            "prompt_dir = {:?}\nresults_dir = {:?}\nflush_delay_ms = 0\ntimeout_secs = 10\ngenai_base_url = {:?}\nvertex_base_url = {:?}\n",
            dir.display().to_string(),
            dir.join("results").display().to_string(),
            server.uri(),
            server.uri(),
        ),
    )
    .unwrap();
    config
}

fn cli(config: &Path, extra: &[&str]) -> Cli {
    let mut args = vec![
        "sdk-parity".to_string(),
        "run".to_string(),
        "--config".to_string(),
        config.display().to_string(),
        "--genai-api-key".to_string(),
        "direct-key".to_string(),
        "--langchain-api-key".to_string(),
        "framework-key".to_string(),
    ];
    args.extend(extra.iter().map(|s| s.to_string()));
    Cli::try_parse_from(args).unwrap()
}

#[tokio::test]
async fn test_run_writes_exactly_two_records() {
    let server = MockServer::start().await;
    mount_backends(&server, Duration::ZERO).await;
    let dir = tempfile::tempdir().unwrap();
    let config = workspace(dir.path(), &server, true);

    let code = execute(cli(&config, &[])).await.unwrap();
    assert_eq!(code, EXIT_OK);

    let results_dir = dir.path().join("results");
    assert_eq!(fs::read_dir(&results_dir).unwrap().count(), 2);

    for label in ClientLabel::ALL {
        let raw = fs::read_to_string(io::result_path(&results_dir, label)).unwrap();
        let value: Value = serde_json::from_str(&raw).unwrap();
        for field in ["duration", "durationMs", "result", "timestamp"] {
            assert!(value.get(field).is_some(), "{label}: missing {field}");
        }
        let formatted = value["duration"].as_str().unwrap();
        assert_eq!(parse_duration(formatted), value["durationMs"].as_u64());
    }

    let framework = io::read_result(&results_dir, ClientLabel::FrameworkWrapped).unwrap();
    assert_eq!(framework.result["content"], "framework");
    let direct = io::read_result(&results_dir, ClientLabel::Direct).unwrap();
    assert_eq!(direct.result["candidates"][0]["content"]["parts"][0]["text"], "direct");
}

#[tokio::test]
async fn test_run_without_image_fails() {
    let server = MockServer::start().await;
    mount_backends(&server, Duration::ZERO).await;
    let dir = tempfile::tempdir().unwrap();
    let config = workspace(dir.path(), &server, false);

    let err = execute(cli(&config, &[])).await.unwrap_err();
    assert!(format!("{err:#}").contains("LangChain Vertex test failed"));

    let results_dir = dir.path().join("results");
    assert!(io::result_path(&results_dir, ClientLabel::Direct).exists());
    assert!(!io::result_path(&results_dir, ClientLabel::FrameworkWrapped).exists());

    let requests = server.received_requests().await.unwrap();
    assert_eq!(requests.len(), 1);
    assert_eq!(requests[0].url.path(), GENAI_PATH);
}

#[tokio::test]
async fn test_run_reports_tolerance_exceeded() {
    let server = MockServer::start().await;
    mount_backends(&server, Duration::from_millis(300)).await;
    let dir = tempfile::tempdir().unwrap();
    let config = workspace(dir.path(), &server, true);

    let code = execute(cli(&config, &["--tolerance-ms", "50", "--format", "json"]))
        .await
        .unwrap();
    assert_eq!(code, EXIT_TOLERANCE_EXCEEDED);
}

#[tokio::test]
async fn test_run_times_out() {
    let server = MockServer::start().await;
    mount_backends(&server, Duration::from_secs(5)).await;
    let dir = tempfile::tempdir().unwrap();
    let config = workspace(dir.path(), &server, true);

    let err = execute(cli(&config, &["--timeout-secs", "1"])).await.unwrap_err();
    assert!(err.to_string().contains("time budget"));
}

#[tokio::test]
async fn test_zero_time_budget_is_rejected() {
    let server = MockServer::start().await;
    mount_backends(&server, Duration::ZERO).await;
    let dir = tempfile::tempdir().unwrap();
    let config = workspace(dir.path(), &server, true);

    let err = execute(cli(&config, &["--timeout-secs", "0"])).await.unwrap_err();
    assert!(format!("{err:#}").contains("timeout_secs"));
    assert!(server.received_requests().await.unwrap().is_empty());
}
