//! Defines the Axum API routes and handlers.

use std::sync::Arc;

use axum::{
    Json, Router,
    extract::{Path, Query, State},
    http::StatusCode,
    response::{IntoResponse, Response},
    routing::{get, post, put},
};

use crate::dispatch::{DispatchError, DispatchService};
use crate::model::{Customer, Document, JobView, Printer};
use crate::store::{JobFilter, StoreError};
use crate::web::models::{
    CreateCustomerRequest, CreateDocumentRequest, CreatePrinterRequest, ErrorResponse,
    SearchJobsQuery, SubmitJobRequest, UpdatePrinterStatusRequest,
};

pub type AppState = Arc<DispatchService>;

/// Creates the Axum router with all the API endpoints.
pub fn create_router(service: AppState) -> Router {
    Router::new()
        .route("/api/v1/jobs", post(submit_job).get(search_jobs))
        .route("/api/v1/jobs/{id}", get(get_job))
        .route("/api/v1/printers", get(list_printers).post(create_printer))
        .route("/api/v1/printers/{id}/status", put(update_printer_status))
        .route("/api/v1/customers", post(create_customer))
        .route("/api/v1/documents", post(create_document))
        .with_state(service)
}

/// Maps dispatch/store errors to HTTP responses: missing records are
/// 404, admission/filter rejections 400, transition violations 500.
pub struct ApiError(DispatchError);

impl From<DispatchError> for ApiError {
    fn from(e: DispatchError) -> Self {
        Self(e)
    }
}

impl From<StoreError> for ApiError {
    fn from(e: StoreError) -> Self {
        Self(DispatchError::Store(e))
    }
}

impl IntoResponse for ApiError {
    fn into_response(self) -> Response {
        let status = match &self.0 {
            DispatchError::Store(StoreError::CustomerNotFound(_))
            | DispatchError::Store(StoreError::PrinterNotFound(_))
            | DispatchError::Store(StoreError::DocumentNotFound(_))
            | DispatchError::Store(StoreError::JobNotFound(_)) => StatusCode::NOT_FOUND,
            DispatchError::Store(StoreError::IllegalTransition { .. }) => {
                StatusCode::INTERNAL_SERVER_ERROR
            }
            DispatchError::EmptyDocumentList
            | DispatchError::PrinterNotEnabled(_)
            | DispatchError::InvalidTimeRange => StatusCode::BAD_REQUEST,
        };
        (
            status,
            Json(ErrorResponse {
                error: self.0.to_string(),
            }),
        )
            .into_response()
    }
}

/// Admits a print job. Returns 201 with the PENDING job; printing
/// completes asynchronously and is observed via the job endpoints.
async fn submit_job(
    State(service): State<AppState>,
    Json(payload): Json<SubmitJobRequest>,
) -> Result<(StatusCode, Json<JobView>), ApiError> {
    let job = service
        .submit_job(
            &payload.printer_id,
            &payload.customer_id,
            payload.document_ids,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(job)))
}

async fn get_job(
    State(service): State<AppState>,
    Path(id): Path<String>,
) -> Result<Json<JobView>, ApiError> {
    Ok(Json(service.get_job(&id).await?))
}

async fn search_jobs(
    State(service): State<AppState>,
    Query(query): Query<SearchJobsQuery>,
) -> Result<Json<Vec<JobView>>, ApiError> {
    let filter = JobFilter {
        customer_id: query.customer_id,
        printer_id: query.printer_id,
        document_id: query.document_id,
        status: query.status,
        start_time: query.start_time,
        end_time: query.end_time,
    };
    Ok(Json(service.search_jobs(filter).await?))
}

async fn list_printers(State(service): State<AppState>) -> Json<Vec<Printer>> {
    Json(service.store().list_printers().await)
}

async fn create_printer(
    State(service): State<AppState>,
    Json(payload): Json<CreatePrinterRequest>,
) -> (StatusCode, Json<Printer>) {
    let printer = service
        .store()
        .create_printer(
            payload.id,
            payload.brand_name,
            payload.model,
            payload.status,
        )
        .await;
    (StatusCode::CREATED, Json(printer))
}

async fn update_printer_status(
    State(service): State<AppState>,
    Path(id): Path<String>,
    Json(payload): Json<UpdatePrinterStatusRequest>,
) -> Result<Json<Printer>, ApiError> {
    Ok(Json(
        service.store().set_printer_status(&id, payload.status).await?,
    ))
}

async fn create_customer(
    State(service): State<AppState>,
    Json(payload): Json<CreateCustomerRequest>,
) -> (StatusCode, Json<Customer>) {
    let customer = service
        .store()
        .create_customer(payload.name, payload.email)
        .await;
    (StatusCode::CREATED, Json(customer))
}

async fn create_document(
    State(service): State<AppState>,
    Json(payload): Json<CreateDocumentRequest>,
) -> Result<(StatusCode, Json<Document>), ApiError> {
    let document = service
        .store()
        .create_document(
            &payload.customer_id,
            payload.file_name,
            payload.total_cost_page,
        )
        .await?;
    Ok((StatusCode::CREATED, Json(document)))
}
