// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tally authorization server.
//!
//! Wires the guards from `tally-server-auth` into axum routes backed by the
//! SQLite adapters in `tally-server-db`.

pub mod api_response;
pub mod error;
pub mod guards;
pub mod routes;
pub mod state;
pub mod version;

use axum::Router;

pub use api_response::{ApiFailure, ApiSuccess, AuthzRejection};
pub use error::ServerError;
pub use guards::{Guard, GuardLayer, GuardRequest};
pub use routes::authz::AuthorizationSummary;
pub use state::{AuthzState, GuardSettings};
pub use tally_server_config::ServerConfig;

/// Build the full router: public routes plus every guarded route.
pub fn create_router(state: AuthzState) -> Router {
	routes::public_routes().merge(routes::authz_routes(&state))
}
