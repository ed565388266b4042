//! Connection Supervisor
//!
//! Owns the bound Unix domain socket and keeps the bridge alive across
//! external connect/disconnect cycles.
//!
//! Two threads cooperate here and share nothing but atomic flags:
//!
//! - the **worker** owns the listener for its generation and serves one
//!   client at a time (further connection attempts queue at the OS backlog);
//! - the **watchdog** polls the socket's backing path and the worker's
//!   liveness, retiring the generation and rebinding a fresh socket when
//!   either goes away. Bind failures are retried on the next tick, so a
//!   failed initial bind recovers without restarting the host.

use std::fs;
use std::io;
use std::os::unix::net::UnixListener;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::thread;
use std::time::{Duration, Instant};

use crate::config::Config;
use crate::dispatch::RequestDispatcher;
use crate::error::{BridgeError, Result};
use crate::provider::StateProvider;

use super::connection::FramedConnection;

/// Idle backoff between accept polls
const ACCEPT_BACKOFF: Duration = Duration::from_millis(25);

/// Backoff after an accept error
const ERROR_BACKOFF: Duration = Duration::from_millis(150);

/// Granularity of the watchdog's interruptible sleep
const WATCHDOG_TICK: Duration = Duration::from_millis(50);

/// Entry point for the bridge subsystem
pub struct Bridge;

impl Bridge {
    /// Start the bridge: bind the socket and run the serving worker and the
    /// watchdog.
    ///
    /// Never fails the caller: a bind failure is logged and retried by the
    /// watchdog until it clears or the bridge is stopped.
    pub fn start(config: Config, provider: Arc<dyn StateProvider>) -> BridgeHandle {
        let running = Arc::new(AtomicBool::new(true));
        let socket_path = config.socket_path();

        let dispatcher = Arc::new(RequestDispatcher::new(provider, &config));
        let spawned = {
            let running = Arc::clone(&running);
            thread::Builder::new()
                .name("simbridge-watchdog".to_string())
                .spawn(move || run_watchdog(&config, running, dispatcher))
        };
        let watchdog = match spawned {
            Ok(handle) => Some(handle),
            Err(e) => {
                tracing::error!("failed to spawn watchdog thread: {}; bridge not running", e);
                running.store(false, Ordering::SeqCst);
                None
            }
        };

        BridgeHandle {
            running,
            watchdog,
            socket_path,
        }
    }
}

/// Handle to a running bridge
pub struct BridgeHandle {
    running: Arc<AtomicBool>,
    watchdog: Option<thread::JoinHandle<()>>,
    socket_path: PathBuf,
}

impl BridgeHandle {
    /// The socket path derived at start
    pub fn socket_path(&self) -> &Path {
        &self.socket_path
    }

    pub fn is_running(&self) -> bool {
        self.running.load(Ordering::SeqCst)
    }

    /// Signal shutdown without waiting for teardown
    pub fn shutdown(&self) {
        self.running.store(false, Ordering::SeqCst);
    }

    /// Stop the bridge and wait for the watchdog to tear the socket down.
    /// Teardown errors are logged, never returned.
    pub fn stop(mut self) {
        self.shutdown();
        if let Some(handle) = self.watchdog.take() {
            if handle.join().is_err() {
                tracing::warn!("watchdog thread panicked during shutdown");
            }
        }
    }
}

impl Drop for BridgeHandle {
    fn drop(&mut self) {
        self.shutdown();
    }
}

/// One bind's worth of serving state
struct Generation {
    live: Arc<AtomicBool>,
    worker: thread::JoinHandle<()>,
}

impl Generation {
    fn retire(self) {
        self.live.store(false, Ordering::SeqCst);
        // The worker exits at its next accept poll; if it is mid-client it
        // lingers until that client disconnects. Not joined here: the
        // watchdog must stay responsive.
    }

    fn healthy(&self, path: &Path) -> bool {
        !self.worker.is_finished() && path.exists()
    }
}

fn run_watchdog(config: &Config, running: Arc<AtomicBool>, dispatcher: Arc<RequestDispatcher>) {
    let mut generation: Option<Generation> = None;
    let mut path = config.socket_path();

    while running.load(Ordering::SeqCst) {
        let healthy = generation
            .as_ref()
            .map(|gen| gen.healthy(&path))
            .unwrap_or(false);

        if !healthy {
            if let Some(old) = generation.take() {
                tracing::info!(path = %path.display(), "socket lost, restarting bridge");
                old.retire();
            }

            // Recomputed per bind so a changed environment is picked up
            path = config.socket_path();
            match bind_socket(&path) {
                Ok(listener) => {
                    tracing::info!(path = %path.display(), "socket bound");
                    generation = spawn_worker(listener, Arc::clone(&dispatcher));
                }
                Err(e) => {
                    tracing::warn!("bind failed: {}; retrying", e);
                }
            }
        }

        sleep_interruptibly(config.watchdog_interval, &running);
    }

    if let Some(old) = generation.take() {
        old.retire();
    }
    remove_socket_file(&path);
}

/// Bind the socket, deleting any stale file first so bind is idempotent
fn bind_socket(path: &Path) -> Result<UnixListener> {
    match fs::remove_file(path) {
        Ok(()) => {}
        Err(e) if e.kind() == io::ErrorKind::NotFound => {}
        Err(e) => {
            return Err(BridgeError::Bind {
                path: path.to_path_buf(),
                source: e,
            })
        }
    }

    let listener = UnixListener::bind(path).map_err(|source| BridgeError::Bind {
        path: path.to_path_buf(),
        source,
    })?;

    // Non-blocking accept so the worker can notice retirement; accepted
    // streams are switched back to blocking.
    listener.set_nonblocking(true)?;
    Ok(listener)
}

fn spawn_worker(listener: UnixListener, dispatcher: Arc<RequestDispatcher>) -> Option<Generation> {
    let live = Arc::new(AtomicBool::new(true));
    let worker_live = Arc::clone(&live);
    let worker = thread::Builder::new()
        .name("simbridge-worker".to_string())
        .spawn(move || run_accept_loop(listener, worker_live, dispatcher));

    match worker {
        Ok(worker) => Some(Generation { live, worker }),
        Err(e) => {
            tracing::error!("failed to spawn worker thread: {}", e);
            None
        }
    }
}

fn run_accept_loop(
    listener: UnixListener,
    live: Arc<AtomicBool>,
    dispatcher: Arc<RequestDispatcher>,
) {
    let mut last_error = None::<io::ErrorKind>;

    while live.load(Ordering::SeqCst) {
        match listener.accept() {
            Ok((stream, _addr)) => {
                last_error = None;
                if let Err(e) = stream.set_nonblocking(false) {
                    tracing::warn!("failed to configure client stream: {}", e);
                    continue;
                }
                serve_client(stream, &dispatcher);
            }
            Err(e) if e.kind() == io::ErrorKind::WouldBlock => {
                thread::sleep(ACCEPT_BACKOFF);
            }
            Err(e) => {
                // Log each distinct error kind once, not every backoff cycle
                if last_error != Some(e.kind()) {
                    tracing::warn!("socket accept error: {}", e);
                }
                last_error = Some(e.kind());
                thread::sleep(ERROR_BACKOFF);
            }
        }
    }

    tracing::debug!("worker retired");
}

/// Serve one client to completion; its failures never reach the accept loop
fn serve_client(stream: std::os::unix::net::UnixStream, dispatcher: &RequestDispatcher) {
    match FramedConnection::new(stream, dispatcher) {
        Ok(mut connection) => {
            if let Err(e) = connection.serve() {
                tracing::debug!("connection closed after error: {}", e);
            }
        }
        Err(e) => {
            tracing::warn!("failed to set up connection: {}", e);
        }
    }
}

fn sleep_interruptibly(interval: Duration, running: &AtomicBool) {
    let deadline = Instant::now() + interval;
    while running.load(Ordering::SeqCst) {
        let now = Instant::now();
        if now >= deadline {
            break;
        }
        thread::sleep(WATCHDOG_TICK.min(deadline - now));
    }
}

fn remove_socket_file(path: &Path) {
    if let Err(e) = fs::remove_file(path) {
        if e.kind() != io::ErrorKind::NotFound {
            tracing::warn!(path = %path.display(), "failed to remove socket file: {}", e);
        }
    }
}
