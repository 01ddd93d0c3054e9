use axum::{
    extract::{Path, Query, State},
    http::StatusCode,
    response::Json,
    routing::{get, post},
    Router,
};
use tower_http::cors::CorsLayer;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};
use utoipa::OpenApi;
use utoipa_swagger_ui::SwaggerUi;

use api_shared::{
    ContinuationRes, HealthRes, HealthService, ListBookingsRes, ListPrescriptionsRes, ReviewReq,
    SubmitPrescriptionReq,
};
use carebridge_core::config::poll_interval_from_env_value;
use carebridge_core::constants::{DEFAULT_QUEUE_POLL_INTERVAL, DEFAULT_RECORD_POLL_INTERVAL};
use carebridge_core::{
    BookingService, Continuation, CoreConfig, NewPrescription, PrescriptionService, ReviewDecision,
    ServiceOverride, WorkflowError,
};
use carebridge_types::{
    AttachmentMeta, BookingRecord, BookingStatus, NonEmptyText, Nurse, PrescriptionRecord,
    ReviewStatus, StatusFilter,
};

/// Application state shared across REST API handlers
///
/// Contains the services needed by the REST API endpoints: the prescription
/// queue and the booking collections, both bound to the same data directory.
#[derive(Clone)]
struct AppState {
    prescriptions: PrescriptionService,
    bookings: BookingService,
}

#[derive(OpenApi)]
#[openapi(
    paths(
        health,
        submit_prescription,
        list_prescriptions,
        get_prescription,
        review_prescription,
        get_continuation,
        list_bookings
    ),
    components(schemas(
        HealthRes,
        SubmitPrescriptionReq,
        ReviewReq,
        ListPrescriptionsRes,
        ContinuationRes,
        ListBookingsRes,
        PrescriptionRecord,
        BookingRecord,
        Nurse,
        AttachmentMeta,
        ReviewStatus,
        BookingStatus
    ))
)]
struct ApiDoc;

/// Main entry point for the CareBridge application
///
/// Starts the REST server exposing the prescription-review workflow.
///
/// # Environment Variables
/// - `CARE_REST_ADDR`: REST server address (default: "0.0.0.0:3000")
/// - `CARE_DATA_DIR`: Directory for the JSON collections (default: "/care_data")
/// - `CARE_RECORD_POLL_SECS`: Single-record watcher interval (default: 2)
/// - `CARE_QUEUE_POLL_SECS`: Whole-queue watcher interval (default: 3)
///
/// # Returns
/// * `Ok(())` - If the server starts and runs successfully
/// * `Err(anyhow::Error)` - If server startup or runtime fails
#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenvy::dotenv().ok();

    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::from_default_env()
                .add_directive("carebridge=info".parse()?),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    let rest_addr = std::env::var("CARE_REST_ADDR").unwrap_or_else(|_| "0.0.0.0:3000".into());
    let data_dir = std::env::var("CARE_DATA_DIR").unwrap_or_else(|_| "/care_data".into());

    let record_poll_interval = poll_interval_from_env_value(
        std::env::var("CARE_RECORD_POLL_SECS").ok(),
        DEFAULT_RECORD_POLL_INTERVAL,
    )?;
    let queue_poll_interval = poll_interval_from_env_value(
        std::env::var("CARE_QUEUE_POLL_SECS").ok(),
        DEFAULT_QUEUE_POLL_INTERVAL,
    )?;

    let cfg = std::sync::Arc::new(CoreConfig::with_poll_intervals(
        data_dir.into(),
        record_poll_interval,
        queue_poll_interval,
    )?);

    tracing::info!("++ Starting CareBridge REST on {}", rest_addr);

    let state = AppState {
        prescriptions: PrescriptionService::new(cfg.clone()),
        bookings: BookingService::new(cfg),
    };

    let listener = tokio::net::TcpListener::bind(&rest_addr).await?;
    axum::serve(listener, app(state)).await?;

    Ok(())
}

/// Builds the REST router; shared between `main` and the handler tests.
fn app(state: AppState) -> Router {
    Router::new()
        .route("/health", get(health))
        .route("/prescriptions", post(submit_prescription))
        .route("/prescriptions", get(list_prescriptions))
        .route("/prescriptions/:id", get(get_prescription))
        .route("/prescriptions/:id/review", post(review_prescription))
        .route("/prescriptions/:id/continuation", get(get_continuation))
        .route("/bookings", get(list_bookings))
        .merge(SwaggerUi::new("/swagger-ui").url("/api-docs/openapi.json", ApiDoc::openapi()))
        .layer(CorsLayer::permissive())
        .with_state(state)
}

/// Maps a workflow error to the REST status code and a terse message.
///
/// Details are logged server-side; clients get the category only.
fn error_response(e: &WorkflowError) -> (StatusCode, &'static str) {
    match e {
        WorkflowError::InvalidInput(_) => (StatusCode::BAD_REQUEST, "Invalid input"),
        WorkflowError::RecordNotFound(_) | WorkflowError::BookingNotFound(_) => {
            (StatusCode::NOT_FOUND, "Not found")
        }
        WorkflowError::DuplicateRecordId(_) => (StatusCode::CONFLICT, "Duplicate prescription id"),
        WorkflowError::AlreadyReviewed { .. } => (StatusCode::CONFLICT, "Already reviewed"),
        WorkflowError::StorageDirCreation(_)
        | WorkflowError::FileRead(_)
        | WorkflowError::FileWrite(_)
        | WorkflowError::Serialization(_) => (StatusCode::INTERNAL_SERVER_ERROR, "Internal error"),
    }
}

#[utoipa::path(
    get,
    path = "/health",
    responses(
        (status = 200, description = "Health check response", body = HealthRes)
    )
)]
/// Health check endpoint for the REST API
///
/// Returns the current health status of the CareBridge service.
/// This endpoint is used for monitoring and load balancer health checks.
///
/// # Returns
/// * `Json<HealthRes>` - Health status response containing service status
async fn health(State(_state): State<AppState>) -> Json<HealthRes> {
    Json(HealthService::check_health())
}

#[utoipa::path(
    post,
    path = "/prescriptions",
    request_body = SubmitPrescriptionReq,
    responses(
        (status = 201, description = "Prescription submitted", body = PrescriptionRecord),
        (status = 400, description = "Bad request"),
        (status = 409, description = "Duplicate prescription id"),
        (status = 500, description = "Internal server error")
    )
)]
/// Submit a prescription for review
///
/// The record enters the queue with status `pending`. When no id is given,
/// the server generates one. Unknown fields in the body are persisted
/// unchanged and carried into the downstream booking.
async fn submit_prescription(
    State(state): State<AppState>,
    Json(req): Json<SubmitPrescriptionReq>,
) -> Result<(StatusCode, Json<PrescriptionRecord>), (StatusCode, &'static str)> {
    let submission = NewPrescription {
        id: req
            .id
            .unwrap_or_else(|| uuid::Uuid::new_v4().simple().to_string()),
        patient_name: req.patient_name,
        service_type: req.service_type,
        attachment: req.attachment,
        preferred_nurse: req.preferred_nurse,
        price: req.price,
        extra: req.extra,
    };

    match state.prescriptions.submit(submission) {
        Ok(record) => Ok((StatusCode::CREATED, Json(record))),
        Err(e) => {
            tracing::error!("Submit prescription error: {:?}", e);
            Err(error_response(&e))
        }
    }
}

#[derive(serde::Deserialize, utoipa::IntoParams)]
struct ListQuery {
    /// Status filter: all, pending, approved, rejected (default: all)
    status: Option<String>,
    /// Case-insensitive search on patient name or service type
    search: Option<String>,
}

#[utoipa::path(
    get,
    path = "/prescriptions",
    params(ListQuery),
    responses(
        (status = 200, description = "Prescriptions matching the filter", body = ListPrescriptionsRes),
        (status = 400, description = "Unknown status filter")
    )
)]
/// List prescriptions in the review queue
///
/// Records come back in insertion order. A corrupt collection on disk reads
/// as empty rather than failing the request.
async fn list_prescriptions(
    State(state): State<AppState>,
    Query(query): Query<ListQuery>,
) -> Result<Json<ListPrescriptionsRes>, (StatusCode, &'static str)> {
    let filter = match query.status.as_deref() {
        None => StatusFilter::All,
        Some(raw) => StatusFilter::from_str_value(raw)
            .map_err(|_| (StatusCode::BAD_REQUEST, "Unknown status filter"))?,
    };

    let prescriptions = state
        .prescriptions
        .list_by_status(filter, query.search.as_deref());
    Ok(Json(ListPrescriptionsRes { prescriptions }))
}

#[utoipa::path(
    get,
    path = "/prescriptions/{id}",
    params(("id" = String, Path, description = "Prescription id")),
    responses(
        (status = 200, description = "The prescription", body = PrescriptionRecord),
        (status = 404, description = "No prescription with this id")
    )
)]
/// Fetch a single prescription by id
async fn get_prescription(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<PrescriptionRecord>, (StatusCode, &'static str)> {
    state
        .prescriptions
        .get(&id)
        .map(Json)
        .ok_or((StatusCode::NOT_FOUND, "Not found"))
}

#[utoipa::path(
    post,
    path = "/prescriptions/{id}/review",
    params(("id" = String, Path, description = "Prescription id")),
    request_body = ReviewReq,
    responses(
        (status = 200, description = "The reviewed prescription", body = PrescriptionRecord),
        (status = 400, description = "Bad request"),
        (status = 404, description = "No prescription with this id"),
        (status = 409, description = "Already reviewed"),
        (status = 500, description = "Internal server error")
    )
)]
/// Review a pending prescription
///
/// Approving may attach a nurse and override the service type or price;
/// rejecting requires a reason. Approval also creates the downstream
/// booking and nurse assignment.
async fn review_prescription(
    State(state): State<AppState>,
    Path(id): Path<String>,
    Json(req): Json<ReviewReq>,
) -> Result<Json<PrescriptionRecord>, (StatusCode, &'static str)> {
    let decision = match req.decision.as_str() {
        "approved" => {
            let service_override = if req.service_type.is_some() || req.price.is_some() {
                Some(ServiceOverride {
                    service_type: req.service_type,
                    price: req.price,
                })
            } else {
                None
            };
            ReviewDecision::Approved {
                assigned_nurse: req.assigned_nurse,
                service_override,
            }
        }
        "rejected" => {
            let reason = req
                .rejection_reason
                .and_then(|r| NonEmptyText::new(r).ok())
                .ok_or((StatusCode::BAD_REQUEST, "Rejection requires a reason"))?;
            ReviewDecision::Rejected { reason }
        }
        _ => return Err((StatusCode::BAD_REQUEST, "Unknown decision")),
    };

    match state.prescriptions.review(&id, &req.reviewer, &decision) {
        Ok(record) => Ok(Json(record)),
        Err(e) => {
            tracing::error!("Review prescription error: {:?}", e);
            Err(error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/prescriptions/{id}/continuation",
    params(("id" = String, Path, description = "Prescription id")),
    responses(
        (status = 200, description = "The submitter-side next step", body = ContinuationRes),
        (status = 404, description = "No prescription with this id")
    )
)]
/// Next step for a submitted prescription
///
/// Pending records keep the submitter waiting; approved records unlock the
/// continue action with the selected nurse (reviewer-assigned, then
/// pre-submission preference, then the duty nurse); rejected records only
/// offer resubmission.
async fn get_continuation(
    State(state): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<ContinuationRes>, (StatusCode, &'static str)> {
    match state.prescriptions.continuation(&id) {
        Ok(Continuation::AwaitingReview) => Ok(Json(ContinuationRes {
            state: "awaiting_review".into(),
            nurse: None,
            reason: None,
        })),
        Ok(Continuation::ProceedToCheckout { nurse }) => Ok(Json(ContinuationRes {
            state: "proceed_to_checkout".into(),
            nurse: Some(nurse),
            reason: None,
        })),
        Ok(Continuation::ResubmitRequired { reason }) => Ok(Json(ContinuationRes {
            state: "resubmit_required".into(),
            nurse: None,
            reason: Some(reason),
        })),
        Err(e) => {
            tracing::error!("Continuation error: {:?}", e);
            Err(error_response(&e))
        }
    }
}

#[utoipa::path(
    get,
    path = "/bookings",
    responses(
        (status = 200, description = "All bookings", body = ListBookingsRes)
    )
)]
/// List bookings created from approved prescriptions
async fn list_bookings(State(state): State<AppState>) -> Json<ListBookingsRes> {
    Json(ListBookingsRes {
        bookings: state.bookings.list(),
    })
}
