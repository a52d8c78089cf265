// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Shared state handed to every guard layer.

use std::sync::Arc;

use sqlx::SqlitePool;
use tally_server_auth::{
	CookieCredentialValidator, CredentialValidator, PrincipalResolver, PrincipalStore,
	ResolverSettings, ScopeRoleStore, SubscriptionStore,
};
use tally_server_config::ServerConfig;
use tally_server_db::{PrincipalRepository, ScopeRepository, SubscriptionRepository};

/// Feature flags consulted by guards.
#[derive(Debug, Clone, Copy, Default)]
pub struct GuardSettings {
	pub subscriptions_enabled: bool,
	pub require_verified_email: bool,
}

/// Stores and settings used by the guard chain. Immutable once built.
#[derive(Clone)]
pub struct AuthzState {
	pub resolver: PrincipalResolver,
	pub principals: Arc<dyn PrincipalStore>,
	pub scopes: Arc<dyn ScopeRoleStore>,
	pub subscriptions: Arc<dyn SubscriptionStore>,
	pub settings: GuardSettings,
}

impl AuthzState {
	pub fn new(
		resolver_settings: ResolverSettings,
		credentials: Arc<dyn CredentialValidator>,
		principals: Arc<dyn PrincipalStore>,
		scopes: Arc<dyn ScopeRoleStore>,
		subscriptions: Arc<dyn SubscriptionStore>,
		settings: GuardSettings,
	) -> Self {
		let resolver = PrincipalResolver::new(resolver_settings, credentials, Arc::clone(&principals));
		Self {
			resolver,
			principals,
			scopes,
			subscriptions,
			settings,
		}
	}

	/// Build state backed by the SQLite repositories.
	pub fn from_config(config: &ServerConfig, pool: SqlitePool) -> Self {
		let resolver_settings = ResolverSettings {
			api_key_header: config.auth.api_key_header.clone(),
			external_api_enabled: config.auth.external_api_enabled,
		};
		let credentials = Arc::new(CookieCredentialValidator::new(
			config.auth.session_cookie_name.clone(),
			config.auth.guest_cookie_name.clone(),
		));
		let settings = GuardSettings {
			subscriptions_enabled: config.subscriptions.enabled,
			require_verified_email: config.auth.require_verified_email,
		};

		Self::new(
			resolver_settings,
			credentials,
			Arc::new(PrincipalRepository::new(pool.clone())),
			Arc::new(ScopeRepository::new(pool.clone())),
			Arc::new(SubscriptionRepository::new(pool)),
			settings,
		)
	}
}
