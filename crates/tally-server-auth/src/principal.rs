// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Principal resolution.
//!
//! # Resolution Order
//!
//! ```text
//! Request ─┬─ API key header + external API enabled ─→ API key lookup ──→ Principal
//!          │                                            (fail: INVALID_APIKEY)
//!          ├─ session cookie ─┬─ not found ─────────┐
//!          │                  ├─ invalid ─→ INVALID_USER
//!          │                  └─ valid ─→ session lookup ──→ Principal
//!          │                               (fail: INVALID_USER)
//!          └─ guest cookie ←──────────────────────────┘
//!               └─→ guest lookup ──→ Principal (any failure: INVALID_USER)
//! ```
//!
//! The first credential that applies decides the outcome; a failure never falls
//! through to a weaker credential, with the one exception of an absent session
//! cookie.

use std::sync::Arc;

use http::HeaderMap;
use tracing::instrument;

use crate::credentials::{extract_api_key, CredentialValidator, API_KEY_HEADER};
use crate::error::{AuthzError, CookieError, ErrorCode};
use crate::store::PrincipalStore;
use crate::types::{Principal, UserId};

/// Settings that change which credentials are honoured.
#[derive(Debug, Clone)]
pub struct ResolverSettings {
	/// Header carrying an API key.
	pub api_key_header: String,
	/// API keys are only accepted when the external API is enabled.
	pub external_api_enabled: bool,
}

impl Default for ResolverSettings {
	fn default() -> Self {
		Self {
			api_key_header: API_KEY_HEADER.to_string(),
			external_api_enabled: false,
		}
	}
}

/// Turns request credentials into a [`Principal`].
#[derive(Clone)]
pub struct PrincipalResolver {
	settings: ResolverSettings,
	credentials: Arc<dyn CredentialValidator>,
	principals: Arc<dyn PrincipalStore>,
}

impl PrincipalResolver {
	pub fn new(
		settings: ResolverSettings,
		credentials: Arc<dyn CredentialValidator>,
		principals: Arc<dyn PrincipalStore>,
	) -> Self {
		Self {
			settings,
			credentials,
			principals,
		}
	}

	pub fn settings(&self) -> &ResolverSettings {
		&self.settings
	}

	/// Resolve the caller, or fail with a 401-class error.
	#[instrument(level = "debug", skip_all)]
	pub async fn resolve(&self, headers: &HeaderMap) -> Result<Principal, AuthzError> {
		if self.settings.external_api_enabled {
			if let Some(api_key) = extract_api_key(headers, &self.settings.api_key_header) {
				return self.resolve_api_key(&api_key).await;
			}
		}

		match self.credentials.validate_session_cookie(headers) {
			Ok(session_token) => return self.resolve_session(&session_token).await,
			Err(CookieError::NotFound) => {}
			Err(err) => {
				tracing::debug!(error = %err, "session cookie rejected");
				return Err(AuthzError::Unauthenticated(ErrorCode::InvalidUser));
			}
		}

		self.resolve_guest(headers).await
	}

	async fn resolve_api_key(&self, api_key: &str) -> Result<Principal, AuthzError> {
		match self.principals.principal_by_api_key(api_key).await {
			Ok(principal) => {
				tracing::debug!(user_id = %principal.id, "principal resolved from API key");
				Ok(principal)
			}
			Err(err) => {
				tracing::info!(error = %err, "API key authentication failed");
				Err(AuthzError::Unauthenticated(ErrorCode::InvalidApiKey))
			}
		}
	}

	async fn resolve_session(&self, session_token: &str) -> Result<Principal, AuthzError> {
		match self.principals.principal_by_session(session_token).await {
			Ok(principal) => {
				tracing::debug!(user_id = %principal.id, "principal resolved from session");
				Ok(principal)
			}
			Err(err) => {
				tracing::info!(error = %err, "session lookup failed");
				Err(AuthzError::Unauthenticated(ErrorCode::InvalidUser))
			}
		}
	}

	async fn resolve_guest(&self, headers: &HeaderMap) -> Result<Principal, AuthzError> {
		let cookie = self.credentials.validate_user_cookie(headers).map_err(|err| {
			tracing::debug!(error = %err, "no usable guest cookie");
			AuthzError::Unauthenticated(ErrorCode::InvalidUser)
		})?;

		let user_id: UserId = cookie.parse().map_err(|_| {
			tracing::debug!("guest cookie does not carry a user id");
			AuthzError::Unauthenticated(ErrorCode::InvalidUser)
		})?;

		match self.principals.guest_principal(&user_id).await {
			Ok(principal) => {
				tracing::debug!(user_id = %principal.id, "principal resolved from guest cookie");
				Ok(principal)
			}
			Err(err) => {
				tracing::info!(%user_id, error = %err, "guest lookup failed");
				Err(AuthzError::Unauthenticated(ErrorCode::InvalidUser))
			}
		}
	}
}
