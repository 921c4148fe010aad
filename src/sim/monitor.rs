//! Progress and cancellation contract
//!
//! The engine must be drivable from an interactive caller without blocking
//! it: the caller hands the engine a [`RunMonitor`] carrying an optional
//! progress callback and an optional cancellation token, and keeps a clone
//! of the token for itself. That pair is the ONLY shared state between the
//! engine and its caller — one-way progress out, one-way cancellation in.
//! Which thread, task or process drives the run is entirely the caller's
//! concern; the engine only promises to check the token at step (or bounded
//! batch) boundaries and to report monotonically increasing completion
//! fractions in `[0, 1]`.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

// =================================================================================================
// Cancellation Token
// =================================================================================================

/// One-way cancellation flag shared between a caller and a run
///
/// Cloning is cheap (an `Arc` clone); all clones observe the same flag.
/// Once set the flag stays set — a token is for one run.
///
/// # Example
///
/// ```rust
/// use belt_rs::sim::CancellationToken;
///
/// let token = CancellationToken::new();
/// let engine_side = token.clone();
///
/// assert!(!engine_side.is_cancelled());
/// token.cancel();
/// assert!(engine_side.is_cancelled());
/// ```
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    flag: Arc<AtomicBool>,
}

impl CancellationToken {
    /// Create a fresh, unset token
    pub fn new() -> Self {
        Self::default()
    }

    /// Request cancellation
    ///
    /// Safe to call from any thread and any number of times.
    pub fn cancel(&self) {
        self.flag.store(true, Ordering::Relaxed);
    }

    /// Whether cancellation has been requested
    pub fn is_cancelled(&self) -> bool {
        self.flag.load(Ordering::Relaxed)
    }
}

// =================================================================================================
// Run Monitor
// =================================================================================================

/// Progress callback invoked with completion fractions in `[0, 1]`
pub type ProgressFn = dyn Fn(f64) + Send + Sync;

/// Caller-side hooks for one engine run
///
/// The default monitor reports nothing and can never cancel — fine for
/// batch use. Interactive callers attach a callback and a token:
///
/// ```rust
/// use belt_rs::sim::{CancellationToken, RunMonitor};
///
/// let token = CancellationToken::new();
/// let monitor = RunMonitor::new()
///     .with_progress(|fraction| eprintln!("{:.0}%", fraction * 100.0))
///     .with_cancellation(token.clone());
/// # let _ = monitor;
/// ```
#[derive(Default)]
pub struct RunMonitor {
    progress: Option<Box<ProgressFn>>,
    cancellation: Option<CancellationToken>,
}

impl RunMonitor {
    /// Create a monitor with no hooks attached
    pub fn new() -> Self {
        Self::default()
    }

    /// Builder pattern: attach a progress callback
    pub fn with_progress<F>(mut self, callback: F) -> Self
    where
        F: Fn(f64) + Send + Sync + 'static,
    {
        self.progress = Some(Box::new(callback));
        self
    }

    /// Builder pattern: attach a cancellation token
    pub fn with_cancellation(mut self, token: CancellationToken) -> Self {
        self.cancellation = Some(token);
        self
    }

    /// Report a completion fraction to the caller, if a callback is attached
    pub(crate) fn report(&self, fraction: f64) {
        if let Some(progress) = &self.progress {
            progress(fraction.clamp(0.0, 1.0));
        }
    }

    /// Whether the caller has requested cancellation
    pub(crate) fn is_cancelled(&self) -> bool {
        self.cancellation
            .as_ref()
            .is_some_and(CancellationToken::is_cancelled)
    }
}

impl std::fmt::Debug for RunMonitor {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RunMonitor")
            .field("progress", &self.progress.as_ref().map(|_| "<callback>"))
            .field("cancellation", &self.cancellation)
            .finish()
    }
}

// =================================================================================================
// Tests
// =================================================================================================
