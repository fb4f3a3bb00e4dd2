//! Two-phase scan orchestration.
//!
//! Phase one, [`ScanOrchestrator::dispatch`], captures the request and
//! hands it to the evaluation side through a channel without touching
//! the repository, so the caller regains control immediately even for a
//! whole-project scan. Phase two, [`ScanOrchestrator::evaluate`], runs
//! on the thread that owns the asset graph: it performs the deferred
//! discovery, evaluates assets one at a time, checks for cancellation
//! between assets, and yields to the host's pump callback at a fixed
//! cadence so an interactive frontend stays responsive.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, Receiver};
use std::sync::{Arc, Mutex};

use crate::error::{GuardError, Result};
use crate::host::AssetRepository;
use crate::profile::Profile;
use crate::report::ScanReport;
use crate::rules::CheckContext;
use crate::scanner::{ScanRequest, Scanner};

/// Assets evaluated between pump-callback yields. Evaluation cannot be
/// preempted mid-asset, so this bounds frontend stall time.
const PUMP_INTERVAL: usize = 10;

/// Cooperative cancellation flag, checked once per asset. Cancelling
/// mid-scan keeps every result produced so far.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::Relaxed);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::Relaxed)
    }
}

/// Where a scan currently stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ScanPhase {
    Idle,
    /// Request captured, evaluation not started.
    Dispatched,
    /// Path-based request awaiting repository enumeration.
    DiscoveryPending,
    Evaluating,
    Complete,
    Cancelled,
}

/// The hand-off between the dispatch and evaluation phases.
#[derive(Debug)]
pub struct DispatchSignal {
    pub request: ScanRequest,
    pub message: String,
}

/// Progress snapshot passed to the pump callback.
#[derive(Debug, Clone, Copy)]
pub struct ScanProgress {
    pub processed: usize,
    pub total: usize,
}

pub struct ScanOrchestrator {
    scanner: Scanner,
    phase: Mutex<ScanPhase>,
}

impl ScanOrchestrator {
    pub fn new(scanner: Scanner) -> Self {
        Self {
            scanner,
            phase: Mutex::new(ScanPhase::Idle),
        }
    }

    pub fn phase(&self) -> ScanPhase {
        // A poisoned lock means an evaluation panicked; report that as
        // cancelled rather than propagating the poison.
        self.phase
            .lock()
            .map(|p| *p)
            .unwrap_or(ScanPhase::Cancelled)
    }

    fn set_phase(&self, phase: ScanPhase) {
        if let Ok(mut p) = self.phase.lock() {
            tracing::debug!(?phase, "scan phase");
            *p = phase;
        }
    }

    /// Phase one: capture the request and return immediately. Discovery
    /// is deliberately deferred; only asset-based requests already carry
    /// their handles.
    pub fn dispatch(&self, request: ScanRequest) -> Receiver<DispatchSignal> {
        self.set_phase(ScanPhase::Dispatched);
        let (tx, rx) = mpsc::channel();
        let message = format!("scan dispatched: {}", request.mode());
        std::thread::spawn(move || {
            // Send can only fail when the receiver was dropped, which
            // means the scan was abandoned before evaluation.
            let _ = tx.send(DispatchSignal { request, message });
        });
        rx
    }

    /// Phase two: discover (if deferred), then evaluate synchronously.
    pub fn evaluate(
        &self,
        signal: DispatchSignal,
        repository: &dyn AssetRepository,
        profile: &Profile,
        ctx: &CheckContext,
        cancel: &CancelToken,
        mut pump: impl FnMut(ScanProgress),
    ) -> Result<ScanReport> {
        tracing::info!(message = %signal.message, "scan evaluation starting");
        if signal.request.needs_discovery() {
            self.set_phase(ScanPhase::DiscoveryPending);
        }
        let assets = self.scanner.resolve(&signal.request, repository)?;
        let total = assets.len();

        self.set_phase(ScanPhase::Evaluating);
        let mut results = Vec::new();
        let mut processed = 0;
        let mut cancelled = false;

        for asset in &assets {
            if cancel.is_cancelled() {
                cancelled = true;
                break;
            }
            self.scanner
                .evaluate(asset, repository, profile, ctx, &mut results);
            processed += 1;
            if processed % PUMP_INTERVAL == 0 {
                pump(ScanProgress { processed, total });
            }
        }

        let message = if cancelled {
            self.set_phase(ScanPhase::Cancelled);
            format!("Scan cancelled after {processed} of {total} assets.")
        } else {
            self.set_phase(ScanPhase::Complete);
            format!(
                "Scan complete: {total} assets evaluated, {} issues found.",
                results.len()
            )
        };
        tracing::info!(%message, cancelled, "scan evaluation finished");

        Ok(ScanReport {
            mode: signal.request.mode(),
            results,
            assets_processed: processed,
            assets_total: total,
            cancelled,
            message,
        })
    }

    /// Dispatch and evaluate back to back. Hosts with their own event
    /// loop call the two phases separately instead.
    pub fn run(
        &self,
        request: ScanRequest,
        repository: &dyn AssetRepository,
        profile: &Profile,
        ctx: &CheckContext,
        cancel: &CancelToken,
        pump: impl FnMut(ScanProgress),
    ) -> Result<ScanReport> {
        let rx = self.dispatch(request);
        let signal = rx
            .recv()
            .map_err(|_| GuardError::Scan("dispatch channel closed before hand-off".into()))?;
        self.evaluate(signal, repository, profile, ctx, cancel, pump)
    }
}
