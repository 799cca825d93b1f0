use std::fmt;
use std::io::{self, Write};
use std::sync::{Mutex, PoisonError};
use std::thread;
use std::time::Instant;

use log::{debug, error, info};
use zeroize::Zeroize;

use super::report::{Summary, reporter};
use super::{Pattern, SearchConfig, SearchState, matches_any};
use crate::affinity;
use crate::backend::{Backend, Batch};
use crate::error::Error;
use crate::keys::x25519::{ENCODED_LEN, PublicKey, SecretKey, clamp, encode_key};
use crate::rng::KeySource;

/// Keys derived by a scalar worker between two updates of the shared total.
pub const COUNTER_FLUSH: u64 = 1024;

/// A keypair whose public encoding matched a pattern.
pub struct Match {
    pub public: PublicKey,
    pub secret: SecretKey,
}

impl fmt::Display for Match {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(
            f,
            "FOUND: pub={} priv={}",
            self.public.to_base64(),
            self.secret.to_base64()
        )
    }
}

/// Destination of matches. Called concurrently from every worker.
pub trait MatchSink: Sync {
    fn emit(&self, found: Match);
}

/// Collects matches in memory.
impl MatchSink for Mutex<Vec<Match>> {
    fn emit(&self, found: Match) {
        self.lock()
            .unwrap_or_else(PoisonError::into_inner)
            .push(found);
    }
}

/// Prints one `FOUND:` line per match on standard output.
#[derive(Clone, Copy, Debug, Default)]
pub struct StdoutSink;

impl MatchSink for StdoutSink {
    fn emit(&self, found: Match) {
        let mut out = io::stdout().lock();

        if let Err(err) = writeln!(out, "{found}").and_then(|_| out.flush()) {
            error!("could not write match to stdout: {err}");
        }
    }
}

/// Encodes `public`, tests it and reports a match if a slot is left.
#[inline]
fn inspect(
    patterns: &[Pattern],
    state: &SearchState,
    sink: &dyn MatchSink,
    scalar: &[u8; 32],
    public: &[u8; 32],
    encoded: &mut [u8; ENCODED_LEN],
) {
    let len = encode_key(public, encoded);

    if matches_any(patterns, &encoded[..len]) && state.claim_match() {
        sink.emit(Match {
            public: PublicKey::from_bytes(*public),
            secret: SecretKey::from_raw(*scalar),
        });
    }
}

/// One key at a time until a stop is requested.
fn scalar_worker(
    index: usize,
    config: &SearchConfig,
    state: &SearchState,
    backend: &dyn Backend,
    sink: &dyn MatchSink,
) {
    if config.affinity {
        affinity::pin_current(index);
    }

    let mut source = KeySource::from_os();
    let mut raw = [0u8; 32];
    let mut encoded = [0u8; ENCODED_LEN];
    let mut pending = 0;

    while !state.should_stop() {
        source.fill(&mut raw);
        let mut scalar = clamp(raw);
        let public = backend.derive(&scalar);

        inspect(&config.patterns, state, sink, &scalar, &public, &mut encoded);
        scalar.zeroize();

        pending += 1;
        if pending == COUNTER_FLUSH {
            state.add_keys(pending);
            pending = 0;
        }
    }

    state.add_keys(pending);
    raw.zeroize();
}

/// Feeds a batched backend from the calling thread.
fn batched_driver(
    config: &SearchConfig,
    state: &SearchState,
    backend: &dyn Backend,
    sink: &dyn MatchSink,
) {
    let mut source = KeySource::from_os();
    let mut encoded = [0u8; ENCODED_LEN];

    let mut fill = |scalars: &mut Batch| {
        if state.should_stop() {
            return false;
        }

        for scalar in scalars.iter_mut() {
            source.fill(scalar);
            *scalar = clamp(*scalar);
        }

        true
    };

    let mut consume = |scalars: &Batch, publics: &Batch| {
        for (scalar, public) in scalars.iter().zip(publics) {
            inspect(&config.patterns, state, sink, scalar, public, &mut encoded);
        }
        state.add_keys(scalars.len() as u64);

        !state.should_stop()
    };

    backend.pipeline(config.batch, &mut fill, &mut consume);
}

/// Runs a search until `state` reaches its target or a stop is requested.
///
/// Scalar backends get `config.threads` workers; batched backends are
/// driven through their pipeline by a single thread and parallelize
/// internally. Unless `config.quiet` is set, a reporter thread logs
/// progress every `config.interval`. With `config.affinity`, scalar workers
/// pin themselves to cores; a batched backend's pool is pinned when it is
/// built (see [`crate::backend::select_with_affinity`]).
pub fn run(
    config: &SearchConfig,
    state: &SearchState,
    backend: &dyn Backend,
    sink: &dyn MatchSink,
) -> Result<Summary, Error> {
    config.validate()?;

    let started = Instant::now();
    info!(
        "searching with {} backend on {} threads for {} match(es)",
        backend.name(),
        config.threads,
        state.target()
    );

    let outcome = thread::scope(|scope| {
        let progress = (!config.quiet).then(|| {
            thread::Builder::new()
                .name("meshkey-report".into())
                .spawn_scoped(scope, || reporter(state, config.interval))
        });

        let outcome = if backend.is_batched() {
            batched_driver(config, state, backend, sink);
            Ok(())
        } else {
            let mut workers = Vec::with_capacity(config.threads);
            let mut spawned = Ok(());

            for index in 0..config.threads {
                let worker = thread::Builder::new()
                    .name(format!("meshkey-worker-{index}"))
                    .spawn_scoped(scope, move || {
                        scalar_worker(index, config, state, backend, sink)
                    });

                match worker {
                    Ok(handle) => workers.push(handle),
                    Err(err) => {
                        state.request_stop();
                        spawned = Err(Error::Spawn(err));
                        break;
                    }
                }
            }

            debug!("{} workers running", workers.len());
            for worker in workers {
                if worker.join().is_err() {
                    error!("a worker thread panicked");
                }
            }

            spawned
        };

        state.request_stop();

        if let Some(Err(err)) = progress {
            error!("could not start progress reporter: {err}");
        }

        outcome
    });

    outcome?;

    Ok(Summary {
        total: state.total(),
        found: state.found(),
        elapsed: started.elapsed(),
    })
}
