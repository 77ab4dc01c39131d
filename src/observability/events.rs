//! Structured event stream.
//!
//! Discrete, typed events emitted during a harness run. Events are
//! serialized as newline-delimited JSON (JSONL) and include a monotonically
//! increasing sequence number for ordering guarantees.

use std::io::{BufWriter, Write};
use std::path::Path;
use std::sync::Mutex;
use std::sync::atomic::{AtomicU64, Ordering};
use std::time::Duration;

use chrono::{DateTime, Utc};
use serde::Serialize;

// ---------------------------------------------------------------------------
// Event variants
// ---------------------------------------------------------------------------

/// A discrete event emitted during a harness run.
///
/// Each variant is tagged with `"type"` when serialized to JSON so consumers
/// can dispatch on the event kind.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "type")]
pub enum Event {
    /// The pipeline has started.
    RunStarted {
        /// When the run started.
        timestamp: DateTime<Utc>,
        /// Configured harness name.
        harness: String,
        /// Number of checks in the pipeline.
        checks: usize,
    },

    /// A check has started executing.
    CheckStarted {
        /// When the check started.
        timestamp: DateTime<Utc>,
        /// Check name.
        check: String,
        /// Check kind identifier.
        kind: String,
    },

    /// A check completed successfully.
    CheckPassed {
        /// When the check completed.
        timestamp: DateTime<Utc>,
        /// Check name.
        check: String,
        /// Wall time in milliseconds.
        duration_ms: u64,
    },

    /// A check failed; the run is over.
    CheckFailed {
        /// When the failure was observed.
        timestamp: DateTime<Utc>,
        /// Check name.
        check: String,
        /// Exit code the harness will terminate with.
        exit_code: i32,
    },

    /// A load-check target (or other verified item) was confirmed.
    TargetConfirmed {
        /// When the confirmation was emitted.
        timestamp: DateTime<Utc>,
        /// The confirmation line as printed to stdout.
        confirmation: String,
    },

    /// The run is over.
    RunFinished {
        /// When the run finished.
        timestamp: DateTime<Utc>,
        /// `"passed"` or `"failed"`.
        outcome: String,
    },
}

impl Event {
    /// Builds a [`Event::RunStarted`] stamped now.
    #[must_use]
    pub fn run_started(harness: &str, checks: usize) -> Self {
        Self::RunStarted {
            timestamp: Utc::now(),
            harness: harness.to_string(),
            checks,
        }
    }

    /// Builds a [`Event::CheckStarted`] stamped now.
    #[must_use]
    pub fn check_started(check: &str, kind: &str) -> Self {
        Self::CheckStarted {
            timestamp: Utc::now(),
            check: check.to_string(),
            kind: kind.to_string(),
        }
    }

    /// Builds a [`Event::CheckPassed`] stamped now.
    #[must_use]
    pub fn check_passed(check: &str, duration: Duration) -> Self {
        Self::CheckPassed {
            timestamp: Utc::now(),
            check: check.to_string(),
            duration_ms: u64::try_from(duration.as_millis()).unwrap_or(u64::MAX),
        }
    }

    /// Builds a [`Event::CheckFailed`] stamped now.
    #[must_use]
    pub fn check_failed(check: &str, exit_code: i32) -> Self {
        Self::CheckFailed {
            timestamp: Utc::now(),
            check: check.to_string(),
            exit_code,
        }
    }

    /// Builds a [`Event::TargetConfirmed`] stamped now.
    #[must_use]
    pub fn target_confirmed(confirmation: &str) -> Self {
        Self::TargetConfirmed {
            timestamp: Utc::now(),
            confirmation: confirmation.to_string(),
        }
    }

    /// Builds a [`Event::RunFinished`] stamped now.
    #[must_use]
    pub fn run_finished(outcome: &str) -> Self {
        Self::RunFinished {
            timestamp: Utc::now(),
            outcome: outcome.to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Envelope (adds sequence number via serde flatten)
// ---------------------------------------------------------------------------

/// Wraps an [`Event`] with a monotonically increasing sequence number.
#[derive(Debug, Serialize)]
struct EventEnvelope {
    /// Zero-based, monotonically increasing sequence counter.
    sequence: u64,
    /// The wrapped event (flattened into the same JSON object).
    #[serde(flatten)]
    event: Event,
}

// ---------------------------------------------------------------------------
// Emitter
// ---------------------------------------------------------------------------

/// Thread-safe, buffered JSONL event writer.
///
/// Each call to [`emit`](Self::emit) atomically increments the sequence
/// counter, serializes the event as a single JSON line, and flushes the
/// underlying writer. Serialization or I/O failures are silently dropped
/// because observability must never fail the harness.
pub struct EventEmitter {
    writer: Mutex<BufWriter<Box<dyn Write + Send>>>,
    sequence: AtomicU64,
}

// Box<dyn Write> is not Debug, so provide a manual impl.
impl std::fmt::Debug for EventEmitter {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("EventEmitter")
            .field("sequence", &self.sequence.load(Ordering::Relaxed))
            .finish_non_exhaustive()
    }
}

impl EventEmitter {
    /// Creates an emitter that writes to the given writer.
    #[must_use]
    pub fn new(writer: Box<dyn Write + Send>) -> Self {
        Self {
            writer: Mutex::new(BufWriter::new(writer)),
            sequence: AtomicU64::new(0),
        }
    }

    /// Creates an emitter that writes to stderr.
    ///
    /// Stderr does not conflict with the stdout banner/confirmation
    /// contract.
    #[must_use]
    pub fn stderr() -> Self {
        Self::new(Box::new(std::io::stderr()))
    }

    /// Creates an emitter that silently discards all events.
    #[must_use]
    pub fn noop() -> Self {
        Self::new(Box::new(std::io::sink()))
    }

    /// Creates an emitter that writes to a file at `path`.
    ///
    /// # Errors
    ///
    /// Returns an I/O error if the file cannot be created or opened.
    pub fn from_file(path: &Path) -> std::io::Result<Self> {
        let file = std::fs::File::create(path)?;
        Ok(Self::new(Box::new(file)))
    }

    /// Emits an event as a single JSONL line.
    ///
    /// Failures are silently dropped; observability must not fail the run.
    pub fn emit(&self, event: Event) {
        let seq = self.sequence.fetch_add(1, Ordering::SeqCst);
        let envelope = EventEnvelope {
            sequence: seq,
            event,
        };

        if let Ok(mut w) = self.writer.lock() {
            if let Ok(line) = serde_json::to_string(&envelope) {
                let _ = writeln!(w, "{line}");
                let _ = w.flush();
            }
        }
    }

    /// Returns the number of events emitted so far.
    #[must_use]
    pub fn event_count(&self) -> u64 {
        self.sequence.load(Ordering::Relaxed)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex as StdMutex};

    /// A writer that appends into a shared buffer for assertions.
    #[derive(Clone)]
    struct SharedBuf(Arc<StdMutex<Vec<u8>>>);

    impl Write for SharedBuf {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    fn emitter_with_buffer() -> (EventEmitter, Arc<StdMutex<Vec<u8>>>) {
        let buffer = Arc::new(StdMutex::new(Vec::new()));
        let emitter = EventEmitter::new(Box::new(SharedBuf(Arc::clone(&buffer))));
        (emitter, buffer)
    }

    fn lines(buffer: &Arc<StdMutex<Vec<u8>>>) -> Vec<serde_json::Value> {
        let raw = buffer.lock().unwrap();
        String::from_utf8_lossy(&raw)
            .lines()
            .map(|l| serde_json::from_str(l).expect("event line must be valid JSON"))
            .collect()
    }

    #[test]
    fn events_serialize_with_type_tag() {
        let (emitter, buffer) = emitter_with_buffer();
        emitter.emit(Event::run_started("t", 4));

        let events = lines(&buffer);
        assert_eq!(events.len(), 1);
        assert_eq!(events[0]["type"], "RunStarted");
        assert_eq!(events[0]["harness"], "t");
        assert_eq!(events[0]["checks"], 4);
    }

    #[test]
    fn sequence_numbers_increase_monotonically() {
        let (emitter, buffer) = emitter_with_buffer();
        emitter.emit(Event::run_started("t", 1));
        emitter.emit(Event::check_started("a", "environment"));
        emitter.emit(Event::run_finished("passed"));

        let events = lines(&buffer);
        let sequences: Vec<u64> = events
            .iter()
            .map(|e| e["sequence"].as_u64().unwrap())
            .collect();
        assert_eq!(sequences, vec![0, 1, 2]);
    }

    #[test]
    fn check_failed_carries_exit_code() {
        let (emitter, buffer) = emitter_with_buffer();
        emitter.emit(Event::check_failed("strict lint pass", 5));

        let events = lines(&buffer);
        assert_eq!(events[0]["type"], "CheckFailed");
        assert_eq!(events[0]["exit_code"], 5);
    }

    #[test]
    fn check_passed_reports_millis() {
        let (emitter, buffer) = emitter_with_buffer();
        emitter.emit(Event::check_passed("load checks", Duration::from_millis(42)));

        let events = lines(&buffer);
        assert_eq!(events[0]["duration_ms"], 42);
    }

    #[test]
    fn event_count_tracks_emissions() {
        let (emitter, _) = emitter_with_buffer();
        assert_eq!(emitter.event_count(), 0);
        emitter.emit(Event::run_finished("passed"));
        emitter.emit(Event::run_finished("failed"));
        assert_eq!(emitter.event_count(), 2);
    }

    #[test]
    fn noop_emitter_swallows_events() {
        let emitter = EventEmitter::noop();
        emitter.emit(Event::run_started("t", 0));
        assert_eq!(emitter.event_count(), 1);
    }

    #[test]
    fn file_emitter_writes_jsonl() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("events.jsonl");
        let emitter = EventEmitter::from_file(&path).unwrap();
        emitter.emit(Event::target_confirmed("auth service OK"));
        drop(emitter);

        let raw = std::fs::read_to_string(&path).unwrap();
        let event: serde_json::Value = serde_json::from_str(raw.trim()).unwrap();
        assert_eq!(event["type"], "TargetConfirmed");
        assert_eq!(event["confirmation"], "auth service OK");
    }
}
