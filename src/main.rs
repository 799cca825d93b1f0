use std::process::ExitCode;
use std::sync::Arc;
use std::time::Duration;

use anyhow::{Context, Result};
use base64::Engine;
use base64::engine::general_purpose::STANDARD;
use clap::Parser;
use log::{LevelFilter, error, info, warn};

use meshkey::backend::{self, Backend, Baseline, Library, Packed};
use meshkey::keys::x25519::SecretKey;
use meshkey::search::{self, SearchConfig, SearchState, StdoutSink, default_threads, parse_patterns};
use meshkey::verify::{self, HarnessConfig, Reference, Traceable, diagnose};

mod cli;

use cli::{Against, Cli, Command};

/// Exit status of `trace` when the two ladders diverge.
const TRACE_DIVERGED: u8 = 4;

fn main() -> ExitCode {
    let cli = Cli::parse();
    init_logging();

    let outcome = match cli.command {
        Command::Search {
            search,
            threads,
            count,
            backend,
            batch,
            interval,
            affinity,
        } => {
            let mut config = SearchConfig::new(Vec::new());
            config.threads = threads.unwrap_or_else(default_threads);
            config.count = count;
            config.backend = backend;
            config.batch = batch;
            config.quiet = cli.quiet;
            config.interval = Duration::from_secs(interval);
            config.affinity = affinity;

            run_search(&search, config)
        }
        Command::Selftest {
            seed,
            trials,
            ladder_trials,
            accelerator,
            threads,
            no_library,
        } => run_selftest(HarnessConfig {
            seed,
            trials,
            ladder_trials,
            accelerator: accelerator.then(|| threads.unwrap_or_else(default_threads)),
            library: !no_library,
        }),
        Command::Trace {
            secret,
            against,
            threads,
        } => run_trace(&secret, against, threads.unwrap_or_else(default_threads)),
    };

    match outcome {
        Ok(code) => code,
        Err(err) => {
            error!("{err:#}");
            ExitCode::FAILURE
        }
    }
}

/// Logs at `info` unless `RUST_LOG` says otherwise. `-q` only turns off the
/// progress reporter, so the start and summary lines always show.
fn logger() -> env_logger::Builder {
    let mut builder = env_logger::Builder::new();
    builder.filter_level(LevelFilter::Info).format_target(false);
    builder
}

fn init_logging() {
    logger().parse_default_env().init();
}

fn run_search(searches: &[String], mut config: SearchConfig) -> Result<ExitCode> {
    config.patterns = parse_patterns(searches)?;
    config.validate()?;

    let backend = backend::select_with_affinity(config.backend, config.threads, config.affinity)
        .with_context(|| format!("cannot start the {} backend", config.backend))?;

    let state = Arc::new(SearchState::new(config.count));
    {
        let state = Arc::clone(&state);
        ctrlc::set_handler(move || state.request_stop())
            .context("failed to install the interrupt handler")?;
    }

    info!(
        "Start: {}",
        chrono::Local::now().format("%Y-%m-%d %H:%M:%S%:z")
    );

    let summary = search::run(&config, &state, backend.as_ref(), &StdoutSink)?;
    info!("{summary}");

    Ok(ExitCode::SUCCESS)
}

fn run_selftest(config: HarnessConfig) -> Result<ExitCode> {
    info!("self-test with seed {}", config.seed);

    match verify::run(&config) {
        Ok(summary) => {
            info!(
                "self-test passed: {} encodings, {} field operations, {} ladders \
                 ({} against the library), {} packed keys",
                summary.round_trips,
                summary.arithmetic,
                summary.ladder,
                summary.library,
                summary.accelerator
            );
            Ok(ExitCode::SUCCESS)
        }
        Err(divergence) => {
            error!("{divergence}");
            Ok(ExitCode::from(divergence.exit_code()))
        }
    }
}

/// Accepts 64 hex digits or standard base64.
fn decode_secret(secret: &str) -> Result<SecretKey> {
    let bytes = if secret.len() == 64 && secret.bytes().all(|c| c.is_ascii_hexdigit()) {
        hex::decode(secret).context("invalid hex secret")?
    } else {
        STANDARD
            .decode(secret.trim())
            .context("secret is neither 64 hex digits nor base64")?
    };

    Ok(SecretKey::try_from(bytes.as_slice())?)
}

fn run_trace(secret: &str, against: Against, threads: usize) -> Result<ExitCode> {
    let secret = decode_secret(secret)?;
    let scalar = secret.as_bytes();
    let baseline = Baseline::new();

    let other: Box<dyn Traceable> = match against {
        Against::Reference => Box::new(Reference),
        Against::Packed => Box::new(Packed::new(threads)?),
    };

    let public = secret.public_key();
    println!("pub={} priv={}", public.to_base64(), secret.to_base64());

    if let Ok(library) = Library::new() {
        if library.derive(scalar) != *public.as_bytes() {
            warn!("library derives a different public key");
        }
    }

    match diagnose(scalar, &baseline, other.as_ref()) {
        None => {
            info!("baseline and {} agree on every ladder step", other.name());
            Ok(ExitCode::SUCCESS)
        }
        Some(report) => {
            error!("{report}");
            Ok(ExitCode::from(TRACE_DIVERGED))
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn quiet_keeps_summary_lines() {
        let cli = Cli::try_parse_from(["meshkey", "-q", "search", "-s", "Ab"]).unwrap();

        assert!(cli.quiet);
        assert_eq!(logger().build().filter(), LevelFilter::Info);
    }

    #[test]
    fn affinity_flag_parses() {
        let cli = Cli::try_parse_from(["meshkey", "search", "-s", "Ab", "--affinity"]).unwrap();

        match cli.command {
            Command::Search { affinity, .. } => assert!(affinity),
            _ => panic!("expected the search command"),
        }
    }
}
