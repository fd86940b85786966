/// Application context and dependency wiring
use crate::accounts::{self, Account, RegisterRequest};
use crate::api::ApiClient;
use crate::config::ClientConfig;
use crate::dashboard::DashboardService;
use crate::donations::Donation;
use crate::error::ClientResult;
use crate::list::{HttpGateway, ResourceListController};
use crate::session::{LoginResponse, Session, SessionStore};
use serde::Serialize;
use std::sync::Arc;
use tracing::info;

pub const LOGIN_PATH: &str = "/api/auth/login";
pub const REGISTER_PATH: &str = "/api/auth/register";

#[derive(Serialize)]
struct LoginRequest<'a> {
    username: &'a str,
    password: &'a str,
}

/// Shared services behind every screen
#[derive(Clone)]
pub struct AppContext {
    pub config: Arc<ClientConfig>,
    pub session: Arc<SessionStore>,
    pub api: Arc<ApiClient>,
}

impl AppContext {
    /// Build the context and adopt any persisted session
    pub fn new(config: ClientConfig) -> ClientResult<Self> {
        config.validate()?;

        let session = Arc::new(SessionStore::new(&config.storage.session_file));
        if let Some(restored) = session.restore() {
            info!(username = %restored.user.username, "Restored persisted session");
        }

        let api = Arc::new(ApiClient::new(&config, Arc::clone(&session))?);

        Ok(Self {
            config: Arc::new(config),
            session,
            api,
        })
    }

    /// Authenticate against the backend and persist the resulting session
    pub async fn sign_in(&self, username: &str, password: &str) -> ClientResult<Session> {
        let response: LoginResponse = self
            .api
            .post_public(LOGIN_PATH, &LoginRequest { username, password })
            .await?;
        self.session.login(response)
    }

    /// Clear the session; safe to call when already signed out
    pub fn sign_out(&self) {
        self.session.logout();
    }

    /// Public self-registration; does not sign the new account in
    pub async fn register(&self, request: &RegisterRequest) -> ClientResult<()> {
        accounts::validate_registration(request)?;
        self.api.post_public_unit(REGISTER_PATH, request).await
    }

    /// List controller for the admin user directory
    pub fn accounts_controller(&self) -> ResourceListController<Account> {
        ResourceListController::new(Arc::new(HttpGateway::new(Arc::clone(&self.api))))
    }

    /// List controller for the donations screen
    pub fn donations_controller(&self) -> ResourceListController<Donation> {
        ResourceListController::new(Arc::new(HttpGateway::new(Arc::clone(&self.api))))
    }

    /// Read-side service for the dashboard screen
    pub fn dashboard(&self) -> DashboardService {
        DashboardService::new(Arc::clone(&self.api))
    }
}
