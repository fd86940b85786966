/// Mandal Client - donation tracker client library
///
/// A headless client for the mandal donation tracker backend, covering
/// sessions, access control, and the list screens built on top of them.

pub mod accounts;
pub mod api;
pub mod config;
pub mod context;
pub mod dashboard;
pub mod donations;
pub mod error;
pub mod guard;
pub mod list;
pub mod session;
pub mod validation;

pub use context::AppContext;
pub use error::{ClientError, ClientResult};

use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

/// Initialize logging for binaries embedding this crate
pub fn init_tracing() {
    tracing_subscriber::registry()
        .with(
            tracing_subscriber::EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| "mandal_client=debug".into()),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();
}
