use crate::application::use_cases::template::{requisition_template, TEMPLATE_FILE_NAME};
use crate::application::{BulkImportUseCase, UploadedFile};
use crate::domain::error::AppError;
use crate::infrastructure::config::HttpConfig;
use crate::infrastructure::db::requisitions::SqliteRequisitionRepository;
use actix_cors::Cors;
use actix_web::http::header::{CONTENT_DISPOSITION, CONTENT_TYPE};
use actix_web::{
    delete, dev::Server, get, post, web, App, HttpRequest, HttpResponse, HttpServer, Responder,
};
use serde::Deserialize;
use std::sync::Arc;
use tracing::{error, info, warn};
use uuid::Uuid;

const DEFAULT_LIST_LIMIT: i64 = 50;
const MAX_LIST_LIMIT: i64 = 500;

pub struct HttpState {
    pub import: Arc<BulkImportUseCase>,
    pub repository: Arc<SqliteRequisitionRepository>,
}

#[derive(Deserialize)]
pub struct UploadQuery {
    pub filename: String,
}

#[derive(Deserialize)]
pub struct ListQuery {
    pub limit: Option<i64>,
}

fn error_response(err: &AppError) -> HttpResponse {
    let mut builder = match err {
        AppError::NotFound(_) => HttpResponse::NotFound(),
        AppError::ValidationError(_) | AppError::ParseError(_) => HttpResponse::BadRequest(),
        AppError::CommitRejected(_) => HttpResponse::Conflict(),
        _ => HttpResponse::InternalServerError(),
    };
    builder.body(err.to_string())
}

#[get("/health")]
async fn health() -> impl Responder {
    HttpResponse::Ok().json(serde_json::json!({ "status": "ok" }))
}

#[get("/requisitions/template")]
async fn download_template() -> impl Responder {
    match requisition_template() {
        Ok(template) => HttpResponse::Ok()
            .insert_header((CONTENT_TYPE, "text/csv; charset=utf-8"))
            .insert_header((
                CONTENT_DISPOSITION,
                format!("attachment; filename=\"{}\"", TEMPLATE_FILE_NAME),
            ))
            .body(template),
        Err(e) => {
            error!(error = %e, "Template generation failed");
            error_response(&e)
        }
    }
}

#[post("/requisitions/uploads")]
async fn upload_requisitions(
    data: web::Data<HttpState>,
    req: HttpRequest,
    query: web::Query<UploadQuery>,
    body: web::Bytes,
) -> impl Responder {
    let content_type = req
        .headers()
        .get(CONTENT_TYPE)
        .and_then(|v| v.to_str().ok())
        .map(str::to_string);

    info!(
        file = %query.filename,
        bytes = body.len(),
        content_type = content_type.as_deref().unwrap_or("-"),
        "Received requisition upload"
    );

    let file = UploadedFile {
        name: query.into_inner().filename,
        content_type,
        bytes: body.to_vec(),
    };

    match data.import.upload(file) {
        Ok(session) => HttpResponse::Created().json(data.import.summary(&session)),
        Err(e) => {
            warn!(error = %e, "Upload rejected");
            error_response(&e)
        }
    }
}

#[get("/requisitions/uploads/{id}")]
async fn get_upload(data: web::Data<HttpState>, id: web::Path<Uuid>) -> impl Responder {
    match data.import.session(id.into_inner()) {
        Ok(session) => HttpResponse::Ok().json(data.import.summary(&session)),
        Err(e) => error_response(&e),
    }
}

#[delete("/requisitions/uploads/{id}")]
async fn discard_upload(data: web::Data<HttpState>, id: web::Path<Uuid>) -> impl Responder {
    match data.import.discard(id.into_inner()) {
        Ok(()) => HttpResponse::NoContent().finish(),
        Err(e) => error_response(&e),
    }
}

#[post("/requisitions/uploads/{id}/commit")]
async fn commit_upload(data: web::Data<HttpState>, id: web::Path<Uuid>) -> impl Responder {
    match data.import.commit(id.into_inner()).await {
        Ok(session) => HttpResponse::Ok().json(data.import.summary(&session)),
        Err(e) => {
            if !matches!(e, AppError::CommitRejected(_) | AppError::NotFound(_)) {
                error!(error = %e, "Commit failed");
            }
            error_response(&e)
        }
    }
}

#[get("/requisitions")]
async fn list_requisitions(
    data: web::Data<HttpState>,
    query: web::Query<ListQuery>,
) -> impl Responder {
    let limit = query
        .limit
        .unwrap_or(DEFAULT_LIST_LIMIT)
        .clamp(1, MAX_LIST_LIMIT);

    match data.repository.list(limit).await {
        Ok(requisitions) => HttpResponse::Ok().json(requisitions),
        Err(e) => {
            error!(error = %e, "Failed to list requisitions");
            error_response(&e)
        }
    }
}

/// Register the `/api` scope and its shared state
pub fn configure(cfg: &mut web::ServiceConfig, state: web::Data<HttpState>) {
    let payload_limit = usize::try_from(state.import.config().max_file_bytes).unwrap_or(usize::MAX);

    cfg.app_data(state)
        .app_data(web::PayloadConfig::new(payload_limit))
        .service(
            web::scope("/api")
                .service(health)
                .service(download_template)
                .service(upload_requisitions)
                .service(get_upload)
                .service(discard_upload)
                .service(commit_upload)
                .service(list_requisitions),
        );
}

pub fn start_server(state: HttpState, config: &HttpConfig) -> std::io::Result<Server> {
    let state = web::Data::new(state);

    let server = HttpServer::new(move || {
        let cors = Cors::permissive(); // Browser UI is served from another origin

        App::new()
            .wrap(cors)
            .configure(|cfg| configure(cfg, state.clone()))
    })
    .bind((config.host.as_str(), config.port))?
    .run();

    info!(host = %config.host, port = config.port, "HTTP API listening");
    Ok(server)
}
