// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! Dual-client latency benchmark.
//!
//! This crate runs two [`ModelClient`](sdk_parity_core::ModelClient)s
//! concurrently on the same prompt, persists each call's timing and raw
//! response, and judges whether the two latencies are comparable.
//!
//! # Quick Start
//!
//! ```no_run
//! # async fn demo(
//! #     direct: &dyn sdk_parity_core::ModelClient,
//! #     framework: &dyn sdk_parity_core::ModelClient,
//! # ) -> Result<(), Box<dyn std::error::Error>> {
//! use sdk_parity_benchmarks::{run_comparison, RunOptions};
//! use sdk_parity_core::Prompt;
//!
//! let prompt = Prompt::new("You are terse.", "Describe the screenshot.");
//! let report = run_comparison(direct, framework, &prompt, &RunOptions::default()).await?;
//! println!("difference: {}", report.difference());
//! # Ok(())
//! # }
//! ```
//!
//! # Modules
//!
//! - [`runner`] - The concurrent comparison runner
//! - [`result`] - The persisted `ResultRecord` and duration formatting
//! - [`io`] - Reading and writing result records
//! - [`markdown`] - Markdown report generation

#![warn(missing_docs, rust_2018_idioms)]
#![deny(unsafe_code)]

pub mod io;
pub mod markdown;
pub mod result;
pub mod runner;

pub use result::{format_duration, parse_duration, ResultRecord};
pub use runner::{
    run_comparison, timed_invoke, BenchmarkError, ComparisonReport, InvocationSummary, RunOptions,
};
