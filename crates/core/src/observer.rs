//! Polling observers.
//!
//! There is no push channel between the actors of this system: the reviewer
//! writes to the store, and the submitter finds out by re-reading it. These
//! watchers make that loop explicit. Each one runs a timer-driven re-read on
//! the tokio runtime, emits a snapshot whenever the observed data changes,
//! and stops when its handle is stopped or dropped.
//!
//! Storage problems never cross the polling boundary: a read that fails
//! degrades to "nothing persisted" inside the store, and the watcher simply
//! keeps reflecting whatever the next tick sees. Consistency is eventual,
//! within one polling interval of the writer's write.

use crate::queue::PrescriptionService;
use carebridge_types::{PrescriptionRecord, StatusFilter};
use std::time::Duration;
use tokio::sync::{mpsc, watch};

const WATCH_CHANNEL_CAPACITY: usize = 16;

/// Handle for a single-record watcher.
///
/// Dropping the handle cancels the underlying polling task at its next
/// tick; [`RecordWatch::stop`] cancels it immediately.
pub struct RecordWatch {
    rx: mpsc::Receiver<PrescriptionRecord>,
    cancel: watch::Sender<bool>,
}

impl RecordWatch {
    /// Receives the next observed snapshot of the record.
    ///
    /// Returns `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<PrescriptionRecord> {
        self.rx.recv().await
    }

    /// Stops the watcher.
    pub fn stop(&self) {
        let _ = self.cancel.send(true);
    }
}

/// Handle for a whole-queue watcher. Same lifecycle as [`RecordWatch`].
pub struct QueueWatch {
    rx: mpsc::Receiver<Vec<PrescriptionRecord>>,
    cancel: watch::Sender<bool>,
}

impl QueueWatch {
    /// Receives the next observed snapshot of the filtered queue.
    ///
    /// Returns `None` once the watcher has stopped.
    pub async fn recv(&mut self) -> Option<Vec<PrescriptionRecord>> {
        self.rx.recv().await
    }

    /// Stops the watcher.
    pub fn stop(&self) {
        let _ = self.cancel.send(true);
    }
}

/// Watches a single record by id, emitting a snapshot on every observed
/// change (the first successful read included).
///
/// Nothing is emitted while the record is absent; if it appears later (or
/// the collection heals after corruption), emission resumes. Must be called
/// from within a tokio runtime.
pub fn watch_record(
    service: PrescriptionService,
    id: impl Into<String>,
    interval: Duration,
) -> RecordWatch {
    let id = id.into();
    let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
    let (cancel, mut cancelled) = watch::channel(false);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut last: Option<PrescriptionRecord> = None;

        loop {
            tokio::select! {
                changed = cancelled.changed() => {
                    if changed.is_err() || *cancelled.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let Some(current) = service.get(&id) else {
                        continue;
                    };
                    if last.as_ref() != Some(&current) {
                        if tx.send(current.clone()).await.is_err() {
                            break;
                        }
                        last = Some(current);
                    }
                }
            }
        }
    });

    RecordWatch { rx, cancel }
}

/// Watches the queue under a status filter, emitting the full filtered
/// listing on every observed change (the first read included, even when
/// empty).
///
/// This is the dashboard-style watcher; it re-reads the whole collection at
/// a slower cadence than the single-record watcher. Must be called from
/// within a tokio runtime.
pub fn watch_queue(
    service: PrescriptionService,
    filter: StatusFilter,
    interval: Duration,
) -> QueueWatch {
    let (tx, rx) = mpsc::channel(WATCH_CHANNEL_CAPACITY);
    let (cancel, mut cancelled) = watch::channel(false);

    tokio::spawn(async move {
        let mut ticker = tokio::time::interval(interval);
        let mut last: Option<Vec<PrescriptionRecord>> = None;

        loop {
            tokio::select! {
                changed = cancelled.changed() => {
                    if changed.is_err() || *cancelled.borrow() {
                        break;
                    }
                }
                _ = ticker.tick() => {
                    let current = service.list_by_status(filter, None);
                    if last.as_ref() != Some(&current) {
                        if tx.send(current.clone()).await.is_err() {
                            break;
                        }
                        last = Some(current);
                    }
                }
            }
        }
    });

    QueueWatch { rx, cancel }
}

impl PrescriptionService {
    /// Watches a single record at the configured record polling interval.
    ///
    /// See [`watch_record`].
    pub fn watch(&self, id: impl Into<String>) -> RecordWatch {
        let interval = self.cfg().record_poll_interval();
        watch_record(self.clone(), id, interval)
    }

    /// Watches the filtered queue at the configured queue polling interval.
    ///
    /// See [`watch_queue`].
    pub fn watch_all(&self, filter: StatusFilter) -> QueueWatch {
        let interval = self.cfg().queue_poll_interval();
        watch_queue(self.clone(), filter, interval)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::CoreConfig;
    use crate::queue::NewPrescription;
    use crate::review::ReviewDecision;
    use carebridge_types::{NonEmptyText, ReviewStatus};
    use std::path::Path;
    use std::sync::Arc;
    use tempfile::TempDir;

    fn test_service(data_dir: &Path) -> PrescriptionService {
        let cfg = CoreConfig::new(data_dir.to_path_buf()).expect("CoreConfig::new should succeed");
        PrescriptionService::new(Arc::new(cfg))
    }

    fn new_prescription(id: &str) -> NewPrescription {
        NewPrescription {
            id: id.into(),
            patient_name: "Amina Okafor".into(),
            service_type: "IV Therapy".into(),
            attachment: None,
            preferred_nurse: None,
            price: None,
            extra: serde_json::Map::new(),
        }
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_record_sees_review_from_other_actor() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        service
            .submit(new_prescription("RX-1"))
            .expect("submit should succeed");

        let mut watch = watch_record(service.clone(), "RX-1", Duration::from_millis(20));

        let first = watch.recv().await.expect("initial snapshot expected");
        assert_eq!(first.status, ReviewStatus::Pending);

        // A different actor's session reviews the record.
        let reviewer_side = test_service(temp_dir.path());
        reviewer_side
            .review(
                "RX-1",
                "dr.mensah",
                &ReviewDecision::Rejected {
                    reason: NonEmptyText::new("illegible").unwrap(),
                },
            )
            .expect("review should succeed");

        let second = watch.recv().await.expect("change snapshot expected");
        assert_eq!(second.status, ReviewStatus::Rejected);
        assert_eq!(second.rejection_reason.as_deref(), Some("illegible"));
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_record_is_quiet_without_changes() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        service
            .submit(new_prescription("RX-1"))
            .expect("submit should succeed");

        let mut watch = watch_record(service, "RX-1", Duration::from_millis(20));
        watch.recv().await.expect("initial snapshot expected");

        let outcome =
            tokio::time::timeout(Duration::from_millis(200), watch.recv()).await;
        assert!(outcome.is_err(), "no change should mean no emission");
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_record_stop_ends_stream() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        service
            .submit(new_prescription("RX-1"))
            .expect("submit should succeed");

        let mut watch = watch_record(service, "RX-1", Duration::from_millis(20));
        watch.recv().await.expect("initial snapshot expected");

        watch.stop();
        assert!(
            watch.recv().await.is_none(),
            "stream should end after stop()"
        );
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_record_emits_nothing_for_missing_record() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        let mut watch = watch_record(service.clone(), "RX-404", Duration::from_millis(20));
        let outcome =
            tokio::time::timeout(Duration::from_millis(200), watch.recv()).await;
        assert!(outcome.is_err(), "absent record should produce no snapshots");

        // Once the record appears, emission starts.
        service
            .submit(new_prescription("RX-404"))
            .expect("submit should succeed");
        let snapshot = watch.recv().await.expect("snapshot after appearance");
        assert_eq!(snapshot.id, "RX-404");
    }

    #[tokio::test(start_paused = true)]
    async fn test_service_watch_uses_configured_interval() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let cfg = CoreConfig::with_poll_intervals(
            temp_dir.path().to_path_buf(),
            Duration::from_millis(20),
            Duration::from_millis(30),
        )
        .expect("config should build");
        let service = PrescriptionService::new(Arc::new(cfg));

        service
            .submit(new_prescription("RX-1"))
            .expect("submit should succeed");

        let mut watch = service.watch("RX-1");
        let snapshot = watch.recv().await.expect("initial snapshot expected");
        assert_eq!(snapshot.id, "RX-1");
        watch.stop();
        assert!(watch.recv().await.is_none());
    }

    #[tokio::test(start_paused = true)]
    async fn test_watch_queue_emits_on_new_submission() {
        let temp_dir = TempDir::new().expect("Failed to create temp dir");
        let service = test_service(temp_dir.path());

        let mut watch = watch_queue(service.clone(), StatusFilter::All, Duration::from_millis(30));

        let initial = watch.recv().await.expect("initial listing expected");
        assert!(initial.is_empty());

        service
            .submit(new_prescription("RX-1"))
            .expect("submit should succeed");

        let updated = watch.recv().await.expect("listing after submit expected");
        assert_eq!(updated.len(), 1);
        assert_eq!(updated[0].id, "RX-1");

        watch.stop();
        assert!(watch.recv().await.is_none());
    }
}
