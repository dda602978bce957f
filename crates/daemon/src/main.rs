// SPDX-License-Identifier: BUSL-1.1
// Copyright (c) 2026 Alfred Jean LLC

//! studiod: local studio daemon

use std::process::ExitCode;

use studio_daemon::lifecycle::{self, Adapters, Config, LifecycleError};
use studio_daemon::{env, logging};
use tracing::{error, info};

#[tokio::main]
async fn main() -> ExitCode {
    match run().await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            eprintln!("studiod: {e}");
            ExitCode::FAILURE
        }
    }
}

async fn run() -> Result<(), LifecycleError> {
    let config = Config::load()?;
    let _guard = logging::init_tracing(&config.log_dir, env::log_to_stderr())?;
    info!(version = env!("CARGO_PKG_VERSION"), root = %config.root.display(), "starting studiod");

    let daemon = match lifecycle::startup(&config, Adapters::real()).await {
        Ok(daemon) => daemon,
        Err(e) => {
            error!(error = %e, "startup failed");
            return Err(e);
        }
    };

    tokio::signal::ctrl_c().await?;
    daemon.shutdown();
    Ok(())
}
