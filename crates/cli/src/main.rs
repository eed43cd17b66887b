// Copyright 2025 SDK Parity Contributors
// SPDX-License-Identifier: Apache-2.0

//! SDK parity CLI entry point.

#[tokio::main]
async fn main() {
    match sdk_parity_cli::run().await {
        Ok(code) => std::process::exit(code),
        Err(e) => {
            eprintln!("Error: {:#}", e);
            std::process::exit(sdk_parity_cli::EXIT_FAILURE);
        }
    }
}
