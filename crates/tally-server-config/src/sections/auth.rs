// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential and identity-check configuration.

use serde::Deserialize;

const DEFAULT_SESSION_COOKIE: &str = "tally_session";
const DEFAULT_GUEST_COOKIE: &str = "tally_user";
const DEFAULT_API_KEY_HEADER: &str = "X-API-Key";
const DEFAULT_ENVIRONMENT: &str = "development";

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct AuthConfig {
	pub session_cookie_name: String,
	pub guest_cookie_name: String,
	pub api_key_header: String,
	/// API keys are only honoured when the external API is enabled.
	pub external_api_enabled: bool,
	/// `VerifiedUserOnly` denies unverified target users when set.
	pub require_verified_email: bool,
	pub environment: String,
}

impl Default for AuthConfig {
	fn default() -> Self {
		AuthConfigLayer::default().finalize()
	}
}

impl AuthConfig {
	pub fn is_production(&self) -> bool {
		self.environment == "production"
	}
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct AuthConfigLayer {
	#[serde(default)]
	pub session_cookie_name: Option<String>,
	#[serde(default)]
	pub guest_cookie_name: Option<String>,
	#[serde(default)]
	pub api_key_header: Option<String>,
	#[serde(default)]
	pub external_api_enabled: Option<bool>,
	#[serde(default)]
	pub require_verified_email: Option<bool>,
	#[serde(default)]
	pub environment: Option<String>,
}

impl AuthConfigLayer {
	pub fn merge(&mut self, other: AuthConfigLayer) {
		if other.session_cookie_name.is_some() {
			self.session_cookie_name = other.session_cookie_name;
		}
		if other.guest_cookie_name.is_some() {
			self.guest_cookie_name = other.guest_cookie_name;
		}
		if other.api_key_header.is_some() {
			self.api_key_header = other.api_key_header;
		}
		if other.external_api_enabled.is_some() {
			self.external_api_enabled = other.external_api_enabled;
		}
		if other.require_verified_email.is_some() {
			self.require_verified_email = other.require_verified_email;
		}
		if other.environment.is_some() {
			self.environment = other.environment;
		}
	}

	pub fn finalize(self) -> AuthConfig {
		AuthConfig {
			session_cookie_name: self
				.session_cookie_name
				.unwrap_or_else(|| DEFAULT_SESSION_COOKIE.to_string()),
			guest_cookie_name: self
				.guest_cookie_name
				.unwrap_or_else(|| DEFAULT_GUEST_COOKIE.to_string()),
			api_key_header: self
				.api_key_header
				.unwrap_or_else(|| DEFAULT_API_KEY_HEADER.to_string()),
			external_api_enabled: self.external_api_enabled.unwrap_or(false),
			require_verified_email: self.require_verified_email.unwrap_or(false),
			environment: self
				.environment
				.unwrap_or_else(|| DEFAULT_ENVIRONMENT.to_string()),
		}
	}
}
