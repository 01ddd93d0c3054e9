use clap::{Parser, Subcommand};
use std::path::PathBuf;
use std::sync::Arc;
use std::time::Duration;

use carebridge_core::config::poll_interval_from_env_value;
use carebridge_core::constants::{DEFAULT_QUEUE_POLL_INTERVAL, DEFAULT_RECORD_POLL_INTERVAL};
use carebridge_core::{
    BookingService, Continuation, CoreConfig, NewPrescription, PrescriptionService, ReviewDecision,
    ServiceOverride,
};
use carebridge_files::AttachmentService;
use carebridge_types::{BookingStatus, NonEmptyText, Nurse, StatusFilter};

#[derive(Parser)]
#[command(name = "carebridge")]
#[command(about = "CareBridge prescription-review workflow CLI")]
struct Cli {
    /// Data directory for the JSON collections (default: CARE_DATA_DIR or /care_data)
    #[arg(long)]
    data_dir: Option<PathBuf>,
    #[command(subcommand)]
    command: Option<Commands>,
}

#[derive(Subcommand)]
enum Commands {
    /// Submit a prescription for review
    Submit {
        /// Patient name
        patient_name: String,
        /// Requested service type
        service_type: String,
        /// Record id (generated when omitted)
        #[arg(long)]
        id: Option<String>,
        /// Requested price
        #[arg(long)]
        price: Option<f64>,
        /// Path to the prescription file; only metadata is stored
        #[arg(long)]
        attachment: Option<PathBuf>,
        /// Id of a nurse picked before submission
        #[arg(long)]
        nurse_id: Option<String>,
        /// Name of a nurse picked before submission
        #[arg(long)]
        nurse_name: Option<String>,
        /// Free-text notes carried to the nurse assignment
        #[arg(long)]
        notes: Option<String>,
        /// Symptoms carried to the nurse assignment
        #[arg(long)]
        symptoms: Option<String>,
        /// Mark the request urgent
        #[arg(long)]
        urgent: bool,
    },
    /// Review a pending prescription
    Review {
        /// Record id
        id: String,
        /// Decision: approved or rejected
        decision: String,
        /// Reviewer identity
        reviewer: String,
        /// Id of the nurse to assign on approval
        #[arg(long)]
        nurse_id: Option<String>,
        /// Name of the nurse to assign on approval
        #[arg(long)]
        nurse_name: Option<String>,
        /// Corrected service type
        #[arg(long)]
        service_type: Option<String>,
        /// Corrected or confirmed price
        #[arg(long)]
        price: Option<f64>,
        /// Rejection reason (required when rejecting)
        #[arg(long)]
        reason: Option<String>,
    },
    /// List prescriptions
    List {
        /// Status filter: all, pending, approved, rejected
        #[arg(long, default_value = "all")]
        status: String,
        /// Case-insensitive search on patient name or service type
        #[arg(long)]
        search: Option<String>,
    },
    /// Show the next step for a submitted prescription
    Continuation {
        /// Record id
        id: String,
    },
    /// Poll a prescription until it is reviewed
    Watch {
        /// Record id
        id: String,
        /// Polling interval in seconds (default: CARE_RECORD_POLL_SECS or 2)
        #[arg(long)]
        interval_secs: Option<u64>,
    },
    /// List bookings
    Bookings,
    /// List nurse assignments
    Assignments,
    /// Update a booking's status
    BookingStatus {
        /// Booking id
        id: String,
        /// New status: confirmed, completed, cancelled, emergency
        status: String,
    },
}

fn resolve_config(data_dir: Option<PathBuf>) -> Result<Arc<CoreConfig>, Box<dyn std::error::Error>> {
    let data_dir = data_dir
        .or_else(|| std::env::var("CARE_DATA_DIR").ok().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("/care_data"));
    Ok(Arc::new(CoreConfig::new(data_dir)?))
}

fn nurse_from_args(id: Option<String>, name: Option<String>) -> Result<Option<Nurse>, String> {
    match (id, name) {
        (None, None) => Ok(None),
        (Some(id), Some(name)) => Ok(Some(Nurse {
            id,
            name,
            rating: None,
            specialization: None,
            phone: None,
            image: None,
        })),
        _ => Err("both --nurse-id and --nurse-name are required to name a nurse".into()),
    }
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();
    let cfg = resolve_config(cli.data_dir)?;

    match cli.command {
        Some(Commands::Submit {
            patient_name,
            service_type,
            id,
            price,
            attachment,
            nurse_id,
            nurse_name,
            notes,
            symptoms,
            urgent,
        }) => {
            let preferred_nurse = match nurse_from_args(nurse_id, nurse_name) {
                Ok(nurse) => nurse,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(());
                }
            };

            let attachment = match attachment {
                Some(path) => match AttachmentService::new().inspect(&path) {
                    Ok(meta) => Some(meta),
                    Err(e) => {
                        eprintln!("Error inspecting attachment: {}", e);
                        return Ok(());
                    }
                },
                None => None,
            };

            let mut extra = serde_json::Map::new();
            if let Some(notes) = notes {
                extra.insert("notes".into(), serde_json::Value::String(notes));
            }
            if let Some(symptoms) = symptoms {
                extra.insert("symptoms".into(), serde_json::Value::String(symptoms));
            }
            if urgent {
                extra.insert("urgent".into(), serde_json::Value::Bool(true));
            }

            let submission = NewPrescription {
                id: id.unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
                patient_name,
                service_type,
                attachment,
                preferred_nurse,
                price,
                extra,
            };

            let service = PrescriptionService::new(cfg);
            match service.submit(submission) {
                Ok(record) => println!("Submitted prescription {}", record.id),
                Err(e) => eprintln!("Error submitting prescription: {}", e),
            }
        }
        Some(Commands::Review {
            id,
            decision,
            reviewer,
            nurse_id,
            nurse_name,
            service_type,
            price,
            reason,
        }) => {
            let decision = match decision.as_str() {
                "approved" => {
                    let assigned_nurse = match nurse_from_args(nurse_id, nurse_name) {
                        Ok(nurse) => nurse,
                        Err(e) => {
                            eprintln!("Error: {}", e);
                            return Ok(());
                        }
                    };
                    let service_override = if service_type.is_some() || price.is_some() {
                        Some(ServiceOverride {
                            service_type,
                            price,
                        })
                    } else {
                        None
                    };
                    ReviewDecision::Approved {
                        assigned_nurse,
                        service_override,
                    }
                }
                "rejected" => {
                    let Some(reason) = reason.and_then(|r| NonEmptyText::new(r).ok()) else {
                        eprintln!("Error: rejecting requires a non-empty --reason");
                        return Ok(());
                    };
                    ReviewDecision::Rejected { reason }
                }
                other => {
                    eprintln!("Error: unknown decision '{}' (use approved or rejected)", other);
                    return Ok(());
                }
            };

            let service = PrescriptionService::new(cfg);
            match service.review(&id, &reviewer, &decision) {
                Ok(record) => println!("Prescription {} is now {}", record.id, record.status),
                Err(e) => eprintln!("Error reviewing prescription: {}", e),
            }
        }
        Some(Commands::List { status, search }) => {
            let filter = match StatusFilter::from_str_value(&status) {
                Ok(filter) => filter,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(());
                }
            };

            let service = PrescriptionService::new(cfg);
            let records = service.list_by_status(filter, search.as_deref());
            if records.is_empty() {
                println!("No prescriptions found.");
            } else {
                for record in records {
                    println!(
                        "ID: {}, Patient: {}, Service: {}, Status: {}, Created: {}",
                        record.id,
                        record.patient_name,
                        record.service_type,
                        record.status,
                        record.created_at.to_rfc3339()
                    );
                }
            }
        }
        Some(Commands::Continuation { id }) => {
            let service = PrescriptionService::new(cfg);
            match service.continuation(&id) {
                Ok(Continuation::AwaitingReview) => {
                    println!("Prescription {} is awaiting review", id)
                }
                Ok(Continuation::ProceedToCheckout { nurse }) => {
                    println!("Prescription {} approved; continue with nurse {}", id, nurse.name)
                }
                Ok(Continuation::ResubmitRequired { reason }) => {
                    println!("Prescription {} rejected ({}); submit a new request", id, reason)
                }
                Err(e) => eprintln!("Error: {}", e),
            }
        }
        Some(Commands::Watch { id, interval_secs }) => {
            let interval = match interval_secs {
                Some(secs) if secs > 0 => Duration::from_secs(secs),
                Some(_) => {
                    eprintln!("Error: --interval-secs must be greater than zero");
                    return Ok(());
                }
                None => poll_interval_from_env_value(
                    std::env::var("CARE_RECORD_POLL_SECS").ok(),
                    DEFAULT_RECORD_POLL_INTERVAL,
                )?,
            };

            let watch_cfg = Arc::new(CoreConfig::with_poll_intervals(
                cfg.care_data_dir().to_path_buf(),
                interval,
                DEFAULT_QUEUE_POLL_INTERVAL,
            )?);
            let service = PrescriptionService::new(watch_cfg);
            let runtime = tokio::runtime::Builder::new_current_thread()
                .enable_time()
                .build()?;

            runtime.block_on(async move {
                let mut watch = service.watch(id.clone());
                println!("Watching prescription {} (ctrl-c to stop)", id);
                while let Some(record) = watch.recv().await {
                    println!("Prescription {} is {}", record.id, record.status);
                    if record.status.is_terminal() {
                        watch.stop();
                        break;
                    }
                }
            });
        }
        Some(Commands::Bookings) => {
            let service = BookingService::new(cfg);
            let bookings = service.list();
            if bookings.is_empty() {
                println!("No bookings found.");
            } else {
                for booking in bookings {
                    println!(
                        "ID: {}, Patient: {}, Service: {}, Status: {}, Nurse: {}",
                        booking.id,
                        booking.patient_name,
                        booking.service_type,
                        booking.status,
                        booking
                            .nurse
                            .map(|n| n.name)
                            .unwrap_or_else(|| "-".to_string())
                    );
                }
            }
        }
        Some(Commands::Assignments) => {
            let service = BookingService::new(cfg);
            let assignments = service.list_assignments();
            if assignments.is_empty() {
                println!("No nurse assignments found.");
            } else {
                for assignment in assignments {
                    println!(
                        "ID: {}, Booking: {}, Patient: {}, Service: {}, Status: {}, Priority: {:?}",
                        assignment.id,
                        assignment.booking_id,
                        assignment.patient_name,
                        assignment.service_type,
                        assignment.status,
                        assignment.priority
                    );
                }
            }
        }
        Some(Commands::BookingStatus { id, status }) => {
            let status = match BookingStatus::from_str_value(&status) {
                Ok(status) => status,
                Err(e) => {
                    eprintln!("Error: {}", e);
                    return Ok(());
                }
            };

            let service = BookingService::new(cfg);
            match service.update_status(&id, status) {
                Ok(booking) => println!("Booking {} is now {}", booking.id, booking.status),
                Err(e) => eprintln!("Error updating booking: {}", e),
            }
        }
        None => {
            println!("Use 'carebridge --help' for commands");
        }
    }

    Ok(())
}
