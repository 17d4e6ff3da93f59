mod cli;

use clap::Parser;
use fanout_common::{Config, FanoutError};
use std::{process::ExitCode, time::Instant};
use tracing::{debug, error, warn};
use tracing_subscriber::EnvFilter;

use crate::cli::Cli;

fn default_filter(debug: bool) -> &'static str {
    if debug {
        "fanout=debug,fanout_worker=debug,fanout_common=debug"
    } else {
        "fanout=info,fanout_worker=info,fanout_common=info"
    }
}

/// `RUST_LOG` tiene prioridad sobre el filtro por defecto.
fn init_tracing(debug: bool) {
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(default_filter(debug)));

    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .init();
}

#[tokio::main]
async fn main() -> ExitCode {
    let args = Cli::parse();

    let (config, warnings) = Config::from_env();
    init_tracing(config.debug);
    for w in warnings {
        warn!("{}", w);
    }

    let start = Instant::now();
    let code = match cli::run(args, config).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(e) => {
            let kind = e
                .downcast_ref::<FanoutError>()
                .map(FanoutError::as_label)
                .unwrap_or("internal");
            error!(kind, "falló con: {:#}", e);
            ExitCode::FAILURE
        }
    };
    debug!("tiempo total: {:.3}s", start.elapsed().as_secs_f64());

    code
}
