use std::sync::Arc;
use std::time::Instant;

use axum::extract::FromRef;

use crate::auth::AuthContext;
use crate::db::code_files::CodeFileRepository;
use crate::db::hero_slides::HeroSlideRepository;
use crate::db::projects::ProjectRepository;
use crate::storage::client::StorageClient;

/// Shared application state handed to every handler.
///
/// Repositories and storage are trait objects so integration tests can wire
/// in containers and unit tests can wire in fakes.
#[derive(Clone)]
pub struct AppState {
    pub code_files: Arc<dyn CodeFileRepository>,
    pub projects: Arc<dyn ProjectRepository>,
    pub hero_slides: Arc<dyn HeroSlideRepository>,
    pub storage: Arc<dyn StorageClient>,
    pub auth: AuthContext,
    pub environment: String,
    /// Process start, for the health endpoint's uptime figure.
    pub started_at: Instant,
}

impl FromRef<AppState> for AuthContext {
    fn from_ref(state: &AppState) -> Self {
        state.auth.clone()
    }
}
