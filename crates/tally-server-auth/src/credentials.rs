// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Credential extraction from request headers.
//!
//! Cookie signing and session issuance belong to the identity subsystem. This
//! module only pulls raw credential values off the request and reports whether a
//! cookie was absent or unusable, which is what principal resolution needs.
//!
//! # Security Notes
//!
//! - Credential values are never logged
//! - A missing session cookie is reported as [`CookieError::NotFound`] so the
//!   resolver can fall through to the guest cookie

use http::header::COOKIE;
use http::HeaderMap;
use tracing::instrument;

use crate::error::CookieError;

/// Default name for the registered-user session cookie.
pub const SESSION_COOKIE_NAME: &str = "tally_session";

/// Default name for the guest-user cookie.
pub const GUEST_COOKIE_NAME: &str = "tally_user";

/// Default header carrying an API key. Header names are matched
/// case-insensitively.
pub const API_KEY_HEADER: &str = "x-api-key";

/// Validates credential cookies and returns their payload.
pub trait CredentialValidator: Send + Sync {
	/// Returns the session token carried by the session cookie.
	fn validate_session_cookie(&self, headers: &HeaderMap) -> Result<String, CookieError>;

	/// Returns the user ID carried by the guest cookie.
	fn validate_user_cookie(&self, headers: &HeaderMap) -> Result<String, CookieError>;
}

/// Reads credential cookies by name without further decoding.
///
/// Suitable when a fronting proxy has already verified cookie integrity, and
/// in tests.
#[derive(Debug, Clone)]
pub struct CookieCredentialValidator {
	session_cookie_name: String,
	guest_cookie_name: String,
}

impl Default for CookieCredentialValidator {
	fn default() -> Self {
		Self {
			session_cookie_name: SESSION_COOKIE_NAME.to_string(),
			guest_cookie_name: GUEST_COOKIE_NAME.to_string(),
		}
	}
}

impl CookieCredentialValidator {
	pub fn new(session_cookie_name: impl Into<String>, guest_cookie_name: impl Into<String>) -> Self {
		Self {
			session_cookie_name: session_cookie_name.into(),
			guest_cookie_name: guest_cookie_name.into(),
		}
	}

	fn read(&self, headers: &HeaderMap, name: &str) -> Result<String, CookieError> {
		let value = extract_cookie(headers, name).ok_or(CookieError::NotFound)?;
		if value.is_empty() {
			return Err(CookieError::Invalid(format!("cookie '{name}' is empty")));
		}
		if !value.chars().all(|c| c.is_ascii_graphic()) {
			return Err(CookieError::Invalid(format!(
				"cookie '{name}' contains invalid characters"
			)));
		}
		Ok(value)
	}
}

impl CredentialValidator for CookieCredentialValidator {
	fn validate_session_cookie(&self, headers: &HeaderMap) -> Result<String, CookieError> {
		self.read(headers, &self.session_cookie_name)
	}

	fn validate_user_cookie(&self, headers: &HeaderMap) -> Result<String, CookieError> {
		self.read(headers, &self.guest_cookie_name)
	}
}

/// Extract a cookie value by name from all `Cookie` headers.
///
/// Returns `None` if no cookie with that name is present.
pub fn extract_cookie(headers: &HeaderMap, cookie_name: &str) -> Option<String> {
	headers
		.get_all(COOKIE)
		.iter()
		.filter_map(|value| value.to_str().ok())
		.flat_map(|value| value.split(';'))
		.find_map(|cookie| {
			let (name, value) = cookie.trim().split_once('=')?;
			if name == cookie_name {
				Some(value.to_string())
			} else {
				None
			}
		})
}

/// Extract a non-empty API key from the given header.
#[instrument(level = "trace", skip_all, fields(header = header_name))]
pub fn extract_api_key(headers: &HeaderMap, header_name: &str) -> Option<String> {
	let value = headers.get(header_name)?.to_str().ok()?.trim();
	if value.is_empty() {
		None
	} else {
		Some(value.to_string())
	}
}
