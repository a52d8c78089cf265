// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Response envelopes.
//!
//! Every response body is one of:
//! - `{"success":true,"data":...}` from a handler
//! - `{"success":false,"error":"<CODE>"}` from a guard that denied

use axum::{
	http::StatusCode,
	response::{IntoResponse, Response},
	Json,
};
use serde::Serialize;
use tally_server_auth::{AuthzError, ErrorCode};

/// Successful handler output.
#[derive(Debug, Serialize)]
pub struct ApiSuccess<T: Serialize> {
	pub success: bool,
	pub data: T,
}

impl<T: Serialize> ApiSuccess<T> {
	pub fn new(data: T) -> Self {
		Self {
			success: true,
			data,
		}
	}
}

impl<T: Serialize> IntoResponse for ApiSuccess<T> {
	fn into_response(self) -> Response {
		(StatusCode::OK, Json(self)).into_response()
	}
}

/// Failure body. Carries only the error code; no authorization context.
#[derive(Debug, Serialize)]
pub struct ApiFailure {
	pub success: bool,
	pub error: &'static str,
}

impl ApiFailure {
	pub fn new(code: ErrorCode) -> Self {
		Self {
			success: false,
			error: code.as_str(),
		}
	}
}

/// Create a failure response with an explicit status.
pub fn failure(status: StatusCode, code: ErrorCode) -> Response {
	(status, Json(ApiFailure::new(code))).into_response()
}

/// A denied authorization check, rendered as the failure envelope.
#[derive(Debug)]
pub struct AuthzRejection(pub AuthzError);

impl From<AuthzError> for AuthzRejection {
	fn from(err: AuthzError) -> Self {
		Self(err)
	}
}

impl IntoResponse for AuthzRejection {
	fn into_response(self) -> Response {
		failure(self.0.status(), self.0.code())
	}
}
