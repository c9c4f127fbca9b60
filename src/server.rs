use std::{
    io::Result,
    sync::{Mutex, MutexGuard},
};

use actix_cors::Cors;
use actix_web::{
    http::StatusCode,
    middleware::Logger,
    web::{self, resource, scope},
    App, HttpResponse, HttpServer, ResponseError,
};
use serde_json::json;
use thiserror::Error;
use tracing::{info, warn};

use crate::{
    core::{
        data::{default_card_index, ProjectCard},
        settings::Settings,
    },
    jobs::{JobsClient, JobsView},
    page::{
        consent::{banner_shows, Consent, CONSENT_KEY},
        featured::select,
    },
    storage::{FileStorage, Storage, StorageError},
};

/// Shared by every worker. The awc client is not `Send`, so handlers build
/// their own from `api_base`.
pub struct AppState {
    pub cards: Vec<ProjectCard>,
    pub api_base: String,
    pub consent: Mutex<FileStorage>,
}

#[derive(Debug, Error)]
pub enum PreviewError {
    #[error("No project at index {0}")]
    ProjectNotFound(usize),

    #[error("The projects catalogue is empty")]
    EmptyCatalogue,

    #[error("Unknown consent choice: {0}")]
    UnknownConsent(String),

    #[error("Consent could not be stored: {0}")]
    Storage(String),
}

impl From<StorageError> for PreviewError {
    fn from(err: StorageError) -> Self {
        PreviewError::Storage(err.to_string())
    }
}

impl ResponseError for PreviewError {
    fn status_code(&self) -> StatusCode {
        match self {
            PreviewError::ProjectNotFound(_) | PreviewError::EmptyCatalogue => {
                StatusCode::NOT_FOUND
            }
            PreviewError::UnknownConsent(_) => StatusCode::BAD_REQUEST,
            PreviewError::Storage(_) => StatusCode::INTERNAL_SERVER_ERROR,
        }
    }

    fn error_response(&self) -> HttpResponse {
        let code = match self {
            PreviewError::ProjectNotFound(_) | PreviewError::EmptyCatalogue => "NOT_FOUND",
            PreviewError::UnknownConsent(_) => "BAD_REQUEST",
            PreviewError::Storage(_) => "STORAGE_ERROR",
        };
        HttpResponse::build(self.status_code()).json(json!({
            "error": {
                "code": code,
                "message": self.to_string()
            }
        }))
    }
}

pub fn configure(cfg: &mut web::ServiceConfig) {
    cfg.service(
        scope("/v1")
            .service(resource("/projects").route(web::get().to(projects_handler)))
            .service(resource("/featured").route(web::get().to(default_featured_handler)))
            .service(resource("/featured/{index}").route(web::get().to(featured_handler)))
            .service(resource("/jobs").route(web::get().to(jobs_handler)))
            .service(
                resource("/consent")
                    .route(web::get().to(consent_handler))
                    .route(web::delete().to(clear_consent_handler)),
            )
            .service(resource("/consent/{choice}").route(web::put().to(record_consent_handler)))
            .service(resource("/folio").route(web::get().to(status_handler))),
    );
}

pub async fn start_server(
    settings: &Settings,
    cards: Vec<ProjectCard>,
    consent: FileStorage,
) -> Result<()> {
    let addr = settings.socket_addr();
    let state = web::Data::new(AppState {
        cards,
        api_base: settings.api_base.value.clone(),
        consent: Mutex::new(consent),
    });
    info!("preview server starting at {}", addr);
    HttpServer::new(move || {
        App::new()
            .app_data(state.clone())
            .configure(configure)
            .wrap(
                Cors::default()
                    .allow_any_origin()
                    .allow_any_header()
                    .allow_any_method(),
            )
            .wrap(Logger::default())
    })
    .bind(addr)?
    .run()
    .await
}

async fn projects_handler(state: web::Data<AppState>) -> HttpResponse {
    HttpResponse::Ok().json(&state.cards)
}

async fn default_featured_handler(
    state: web::Data<AppState>,
) -> std::result::Result<HttpResponse, PreviewError> {
    let index = default_card_index(&state.cards).ok_or(PreviewError::EmptyCatalogue)?;
    Ok(HttpResponse::Ok().json(select(&state.cards[index])))
}

async fn featured_handler(
    state: web::Data<AppState>,
    index: web::Path<usize>,
) -> std::result::Result<HttpResponse, PreviewError> {
    let index = index.into_inner();
    let card = state
        .cards
        .get(index)
        .ok_or(PreviewError::ProjectNotFound(index))?;
    Ok(HttpResponse::Ok().json(select(card)))
}

async fn jobs_handler(state: web::Data<AppState>) -> HttpResponse {
    let result = JobsClient::new(&state.api_base).load_jobs().await;
    HttpResponse::Ok().json(JobsView::from_result(&result))
}

fn consent_body<S: Storage>(storage: &S) -> serde_json::Value {
    let consent = Consent::stored(storage);
    json!({
        "consent": consent.map(Consent::as_str),
        "bannerVisible": banner_shows(storage),
    })
}

fn lock_consent(
    state: &AppState,
) -> std::result::Result<MutexGuard<'_, FileStorage>, PreviewError> {
    state
        .consent
        .lock()
        .map_err(|_| PreviewError::Storage("consent store is poisoned".to_string()))
}

async fn consent_handler(
    state: web::Data<AppState>,
) -> std::result::Result<HttpResponse, PreviewError> {
    let storage = lock_consent(&state)?;
    Ok(HttpResponse::Ok().json(consent_body(&*storage)))
}

async fn record_consent_handler(
    state: web::Data<AppState>,
    choice: web::Path<String>,
) -> std::result::Result<HttpResponse, PreviewError> {
    let choice = choice.into_inner();
    let consent = Consent::parse(&choice).ok_or(PreviewError::UnknownConsent(choice))?;
    let mut storage = lock_consent(&state)?;
    storage.set_item(CONSENT_KEY, consent.as_str()).map_err(|err| {
        warn!("could not persist cookie consent: {}", err);
        PreviewError::from(err)
    })?;
    info!(consent = consent.as_str(), "cookie consent recorded");
    Ok(HttpResponse::Ok().json(consent_body(&*storage)))
}

async fn clear_consent_handler(
    state: web::Data<AppState>,
) -> std::result::Result<HttpResponse, PreviewError> {
    let mut storage = lock_consent(&state)?;
    storage.remove_item(CONSENT_KEY)?;
    info!("cookie consent cleared");
    Ok(HttpResponse::Ok().json(consent_body(&*storage)))
}

async fn status_handler() -> HttpResponse {
    HttpResponse::Ok().body("folio is running")
}
