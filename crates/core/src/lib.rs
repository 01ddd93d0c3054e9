//! # CareBridge Core
//!
//! Core business logic for the CareBridge prescription-review workflow.
//!
//! This crate contains pure data operations over JSON collections on disk:
//! - Record store with whole-collection read/write and a read-corrupt-as-empty policy
//! - Prescription queue (submit, list, review)
//! - Review state machine with downstream booking and nurse-assignment creation
//! - Cancellable polling observers simulating push notification
//!
//! **No API concerns**: HTTP servers, OpenAPI documentation, or CLI parsing
//! belong in the `carebridge-run` and `carebridge-cli` binaries.

pub mod booking;
pub mod config;
pub mod constants;
pub mod error;
pub mod observer;
pub mod queue;
pub mod review;
pub mod store;
pub mod validation;

pub use booking::BookingService;
pub use config::CoreConfig;
pub use error::{WorkflowError, WorkflowResult};
pub use observer::{QueueWatch, RecordWatch};
pub use queue::{NewPrescription, PrescriptionService};
pub use review::{Continuation, ReviewDecision, ServiceOverride};
pub use store::RecordStore;
