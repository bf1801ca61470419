//! Shared application state handed to the route builders.

use axum_helpers::JwtAuth;
use mongodb::{Client, Database};

#[derive(Clone)]
pub struct AppState {
    pub config: crate::config::Config,
    /// Shares its connection pool across clones
    pub mongo_client: Client,
    pub db: Database,
    pub jwt: JwtAuth,
}
