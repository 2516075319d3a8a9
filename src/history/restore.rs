//! Sequenced snapshot restores.
//!
//! Every history-cursor change issues a request with a strictly increasing
//! sequence number. Only the completion carrying the latest number is
//! applied; anything older is stale and dropped, whatever order the decodes
//! finish in.

use super::snapshot::Snapshot;
use crate::draw::{PixelFrame, SurfaceError};
use std::sync::{Arc, mpsc as std_mpsc};
use std::time::{Duration, Instant};
use thiserror::Error;
use tokio::sync::mpsc;

/// A decode job for one cursor change.
#[derive(Debug, Clone)]
pub struct RestoreRequest {
    pub seq: u64,
    pub snapshot: Snapshot,
}

/// Result of decoding a [`RestoreRequest`].
#[derive(Debug)]
pub struct RestoreCompletion {
    pub seq: u64,
    pub result: Result<PixelFrame, String>,
}

/// A decoded frame ready to replace the raster.
#[derive(Debug, Clone, PartialEq)]
pub struct RestoredFrame {
    pub seq: u64,
    pub frame: PixelFrame,
}

pub type RestoreOutcome = Result<RestoredFrame, RestoreFailed>;

/// A restore that could not be applied. The surface keeps its last-good frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("restore #{seq} failed: {reason}")]
pub struct RestoreFailed {
    pub seq: u64,
    pub reason: String,
}

pub type Decoder = Arc<dyn Fn(&Snapshot) -> Result<PixelFrame, SurfaceError> + Send + Sync>;

/// Background decoder backed by a Tokio runtime.
///
/// Requests travel over a Tokio channel to a dispatcher task that decodes each
/// one on the blocking pool. Completions come back over a std channel so the
/// drawing thread can drain them without being inside the runtime.
pub struct RestoreWorker {
    request_tx: mpsc::UnboundedSender<RestoreRequest>,
    completion_rx: std_mpsc::Receiver<RestoreCompletion>,
}

impl std::fmt::Debug for RestoreWorker {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RestoreWorker")
            .field("closed", &self.request_tx.is_closed())
            .finish()
    }
}

impl RestoreWorker {
    /// Spawns the dispatcher task on the given runtime.
    pub fn new(runtime_handle: &tokio::runtime::Handle) -> Self {
        Self::with_decoder(runtime_handle, Arc::new(Snapshot::decode))
    }

    /// Spawns a worker with a custom decode function (useful for testing).
    pub fn with_decoder(runtime_handle: &tokio::runtime::Handle, decoder: Decoder) -> Self {
        let (request_tx, mut request_rx) = mpsc::unbounded_channel::<RestoreRequest>();
        let (completion_tx, completion_rx) = std_mpsc::channel();

        runtime_handle.spawn(async move {
            while let Some(request) = request_rx.recv().await {
                log::debug!("Decoding restore #{}", request.seq);
                let decoder = decoder.clone();
                let completion_tx = completion_tx.clone();
                // Decodes run concurrently; completion order is not guaranteed.
                tokio::spawn(async move {
                    let seq = request.seq;
                    let result =
                        tokio::task::spawn_blocking(move || decoder(&request.snapshot)).await;
                    let result = match result {
                        Ok(Ok(frame)) => Ok(frame),
                        Ok(Err(err)) => Err(err.to_string()),
                        Err(join_err) => Err(format!("decode task failed: {join_err}")),
                    };
                    if completion_tx.send(RestoreCompletion { seq, result }).is_err() {
                        log::debug!("Restore #{} finished after its receiver closed", seq);
                    }
                });
            }
            log::debug!("Restore worker stopped");
        });

        Self {
            request_tx,
            completion_rx,
        }
    }

    fn submit(&self, request: RestoreRequest) -> Result<(), RestoreRequest> {
        self.request_tx.send(request).map_err(|err| err.0)
    }
}

/// How restore requests are decoded.
#[derive(Debug, Default)]
pub enum RestoreMode {
    /// Decode synchronously inside the request call
    #[default]
    Inline,
    /// Decode on a background worker; completions are polled
    Worker(RestoreWorker),
}

/// Issues sequence numbers and filters stale completions.
#[derive(Debug, Default)]
pub struct RestoreSequencer {
    latest: u64,
    pending: bool,
    /// Snapshot of the request the worker is decoding
    in_flight: Option<Snapshot>,
    mode: RestoreMode,
}

impl RestoreSequencer {
    pub fn new() -> Self {
        Self::default()
    }

    /// Switches to background decoding. Any in-flight request is abandoned.
    pub fn attach_worker(&mut self, worker: RestoreWorker) {
        self.invalidate();
        self.mode = RestoreMode::Worker(worker);
    }

    /// Sequence number of the most recent cursor change.
    pub fn latest_seq(&self) -> u64 {
        self.latest
    }

    /// True while the latest request has not completed.
    pub fn is_pending(&self) -> bool {
        self.pending
    }

    /// Records a cursor change that needs no decode (the empty state).
    ///
    /// Any in-flight request becomes stale.
    pub fn settle_empty(&mut self) -> u64 {
        self.invalidate();
        self.latest
    }

    /// Issues a restore for `snapshot`.
    ///
    /// Inline mode (or a worker whose runtime has shut down) returns the
    /// completion immediately; worker mode returns `None` and the result
    /// arrives through [`poll`](Self::poll) or [`settle`](Self::settle).
    pub fn request(&mut self, snapshot: Snapshot) -> Option<RestoreCompletion> {
        self.latest += 1;
        let seq = self.latest;
        match &self.mode {
            RestoreMode::Inline => Some(decode_inline(seq, &snapshot)),
            RestoreMode::Worker(worker) => match worker.submit(RestoreRequest {
                seq,
                snapshot: snapshot.clone(),
            }) {
                Ok(()) => {
                    self.pending = true;
                    self.in_flight = Some(snapshot);
                    None
                }
                Err(request) => {
                    log::warn!("Restore worker unavailable, decoding #{} inline", seq);
                    Some(decode_inline(seq, &request.snapshot))
                }
            },
        }
    }

    /// Filters a completion.
    ///
    /// Returns `None` for stale completions, otherwise the decoded frame or
    /// the failure to report.
    pub fn accept(&mut self, completion: RestoreCompletion) -> Option<RestoreOutcome> {
        if completion.seq != self.latest {
            log::debug!(
                "Discarding stale restore #{} (latest #{})",
                completion.seq,
                self.latest
            );
            return None;
        }
        self.pending = false;
        self.in_flight = None;
        let seq = completion.seq;
        Some(
            completion
                .result
                .map(|frame| RestoredFrame { seq, frame })
                .map_err(|reason| RestoreFailed { seq, reason }),
        )
    }

    /// Drains finished completions without blocking and returns the one to
    /// apply, if the latest request has finished.
    pub fn poll(&mut self) -> Option<RestoreOutcome> {
        let mut outcome = None;
        loop {
            let completion = match &self.mode {
                RestoreMode::Worker(worker) => match worker.completion_rx.try_recv() {
                    Ok(completion) => completion,
                    Err(std_mpsc::TryRecvError::Empty) => break,
                    Err(std_mpsc::TryRecvError::Disconnected) => {
                        if self.pending {
                            log::warn!("Restore worker shut down during #{}", self.latest);
                            outcome = self.decode_in_flight_inline();
                        }
                        break;
                    }
                },
                RestoreMode::Inline => break,
            };
            if let Some(result) = self.accept(completion) {
                outcome = Some(result);
            }
        }
        outcome
    }

    /// Blocks until the latest request completes or `timeout` elapses.
    ///
    /// On timeout the worker's request is abandoned and the same snapshot is
    /// decoded on the calling thread, so the returned frame always matches the
    /// history cursor. The late worker completion is then stale.
    pub fn settle(&mut self, timeout: Duration) -> Option<RestoreOutcome> {
        if !self.pending {
            return None;
        }
        let deadline = Instant::now() + timeout;
        while self.pending {
            let remaining = deadline.saturating_duration_since(Instant::now());
            let received = match &self.mode {
                RestoreMode::Worker(worker) => worker.completion_rx.recv_timeout(remaining),
                RestoreMode::Inline => {
                    self.pending = false;
                    self.in_flight = None;
                    return None;
                }
            };
            match received {
                Ok(completion) => {
                    if let Some(result) = self.accept(completion) {
                        return Some(result);
                    }
                }
                Err(std_mpsc::RecvTimeoutError::Timeout) => {
                    log::warn!(
                        "Restore #{} did not finish within {:?}; decoding inline",
                        self.latest,
                        timeout
                    );
                    return self.decode_in_flight_inline();
                }
                Err(std_mpsc::RecvTimeoutError::Disconnected) => {
                    log::warn!("Restore worker shut down during #{}", self.latest);
                    return self.decode_in_flight_inline();
                }
            }
        }
        None
    }

    /// Makes every outstanding request stale.
    fn invalidate(&mut self) {
        self.latest += 1;
        self.pending = false;
        self.in_flight = None;
    }

    /// Reissues the abandoned worker request as an inline decode.
    fn decode_in_flight_inline(&mut self) -> Option<RestoreOutcome> {
        let snapshot = self.in_flight.take();
        self.invalidate();
        let snapshot = snapshot?;
        self.accept(decode_inline(self.latest, &snapshot))
    }
}

fn decode_inline(seq: u64, snapshot: &Snapshot) -> RestoreCompletion {
    RestoreCompletion {
        seq,
        result: snapshot.decode().map_err(|err| err.to_string()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn frame(fill: u8) -> PixelFrame {
        PixelFrame::from_raw(2, 2, 8, vec![fill; 16]).unwrap()
    }

    fn snapshot(fill: u8) -> Snapshot {
        Snapshot::encode(&frame(fill)).unwrap()
    }

    fn restored(seq: u64, fill: u8) -> Option<RestoreOutcome> {
        Some(Ok(RestoredFrame {
            seq,
            frame: frame(fill),
        }))
    }

    fn worker_sequencer(runtime: &tokio::runtime::Runtime, decoder: Decoder) -> RestoreSequencer {
        let mut sequencer = RestoreSequencer::new();
        sequencer.attach_worker(RestoreWorker::with_decoder(runtime.handle(), decoder));
        sequencer
    }

    #[test]
    fn inline_requests_complete_immediately() {
        let mut sequencer = RestoreSequencer::new();
        let completion = sequencer.request(snapshot(7)).unwrap();
        assert_eq!(completion.seq, 1);
        assert_eq!(sequencer.accept(completion), restored(1, 7));
        assert!(!sequencer.is_pending());
    }

    #[test]
    fn stale_completions_are_discarded() {
        let mut sequencer = RestoreSequencer::new();
        let first = sequencer.request(snapshot(1)).unwrap();
        let second = sequencer.request(snapshot(2)).unwrap();
        // Completion order reversed relative to request order.
        assert_eq!(sequencer.accept(second), restored(2, 2));
        assert_eq!(sequencer.accept(first), None);
    }

    #[test]
    fn empty_state_invalidates_in_flight_request() {
        let mut sequencer = RestoreSequencer::new();
        let pending = sequencer.request(snapshot(3)).unwrap();
        sequencer.settle_empty();
        assert_eq!(sequencer.accept(pending), None);
    }

    #[test]
    fn decode_failure_is_reported_with_seq() {
        let mut sequencer = RestoreSequencer::new();
        let bogus = Snapshot::from_bytes({
            let mut bytes = snapshot(1).as_bytes().to_vec();
            bytes.truncate(20);
            bytes
        })
        .unwrap();
        let completion = sequencer.request(bogus).unwrap();
        match sequencer.accept(completion) {
            Some(Err(failed)) => assert_eq!(failed.seq, 1),
            other => panic!("expected failure, got {other:?}"),
        }
    }

    #[test]
    fn worker_applies_latest_even_when_it_finishes_first() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        // The first (older) request decodes slowly.
        let decoder: Decoder = Arc::new(|snapshot: &Snapshot| -> Result<PixelFrame, SurfaceError> {
            let frame = snapshot.decode()?;
            if frame.data()[0] == 1 {
                std::thread::sleep(Duration::from_millis(150));
            }
            Ok(frame)
        });
        let mut sequencer = worker_sequencer(&runtime, decoder);
        let base = sequencer.latest_seq();

        assert!(sequencer.request(snapshot(1)).is_none());
        assert!(sequencer.request(snapshot(2)).is_none());
        assert!(sequencer.is_pending());

        let outcome = sequencer.settle(Duration::from_secs(5));
        assert_eq!(outcome, restored(base + 2, 2));

        // The slow, stale completion arrives later and is ignored.
        std::thread::sleep(Duration::from_millis(300));
        assert_eq!(sequencer.poll(), None);
    }

    #[test]
    fn settle_timeout_decodes_the_requested_snapshot_inline() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let decoder: Decoder = Arc::new(|snapshot: &Snapshot| {
            std::thread::sleep(Duration::from_millis(200));
            snapshot.decode()
        });
        let mut sequencer = worker_sequencer(&runtime, decoder);
        assert!(sequencer.request(snapshot(4)).is_none());
        let requested = sequencer.latest_seq();

        match sequencer.settle(Duration::from_millis(20)) {
            Some(Ok(restored)) => {
                assert_eq!(restored.frame, frame(4));
                assert!(restored.seq > requested);
            }
            other => panic!("expected inline restore, got {other:?}"),
        }
        assert!(!sequencer.is_pending());

        std::thread::sleep(Duration::from_millis(400));
        assert_eq!(sequencer.poll(), None);
    }

    #[test]
    fn settle_timeout_reports_inline_decode_failure() {
        let runtime = tokio::runtime::Runtime::new().unwrap();
        let decoder: Decoder = Arc::new(|snapshot: &Snapshot| {
            std::thread::sleep(Duration::from_millis(200));
            snapshot.decode()
        });
        let mut sequencer = worker_sequencer(&runtime, decoder);
        let bogus = Snapshot::from_bytes({
            let mut bytes = snapshot(1).as_bytes().to_vec();
            bytes.truncate(20);
            bytes
        })
        .unwrap();
        sequencer.request(bogus);

        match sequencer.settle(Duration::from_millis(20)) {
            Some(Err(failed)) => assert_eq!(failed.seq, sequencer.latest_seq()),
            other => panic!("expected failure, got {other:?}"),
        }
        assert!(!sequencer.is_pending());
    }
}
