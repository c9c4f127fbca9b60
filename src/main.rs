use std::{
    fs,
    io::{Error, ErrorKind, Result},
    path::Path,
};

use folio::{
    core::{
        data::{load_catalogue, write_catalogue, ProjectCard},
        settings::{Settings, DEFAULT_SETTINGS_PATH},
    },
    server::start_server,
    storage::FileStorage,
};
use tracing::{info, warn};
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

#[actix_web::main]
async fn main() -> Result<()> {
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| EnvFilter::new("folio=info,actix_web=info")),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting folio v{}", env!("CARGO_PKG_VERSION"));

    let settings = Settings::load_or_default(DEFAULT_SETTINGS_PATH)
        .map_err(|err| Error::new(ErrorKind::InvalidInput, err))?;
    let cards = init_local_files(&settings.projects_path.value)?;
    info!("Serving {} project(s), jobs from {}", cards.len(), settings.api_base.value);

    let consent = open_consent_storage(&settings.consent_path.value)?;

    start_server(&settings, cards, consent).await
}

/// Opens the file that keeps the cookie-consent flag, creating its directory.
fn open_consent_storage(consent_path: &str) -> Result<FileStorage> {
    if let Some(parent) = Path::new(consent_path).parent() {
        fs::create_dir_all(parent)?;
    }
    let storage = FileStorage::open(consent_path)
        .map_err(|err| Error::new(ErrorKind::InvalidData, err))?;
    info!("Cookie consent kept in {}", consent_path);
    Ok(storage)
}

/// Loads the projects catalogue, creating an empty one on first run.
fn init_local_files(projects_path: &str) -> Result<Vec<ProjectCard>> {
    match load_catalogue(projects_path) {
        Ok(cards) => Ok(cards),
        Err(err) if err.kind() == ErrorKind::NotFound => {
            warn!("No catalogue at {}, creating an empty one", projects_path);
            if let Some(parent) = Path::new(projects_path).parent() {
                fs::create_dir_all(parent)?;
            }
            write_catalogue(projects_path, &[])?;
            Ok(Vec::new())
        }
        Err(err) => Err(err),
    }
}
