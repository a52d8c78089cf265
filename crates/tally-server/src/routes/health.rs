// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Serialize;

use crate::api_response::ApiSuccess;

#[derive(Debug, Serialize)]
pub struct HealthResponse {
	pub status: &'static str,
	pub version: &'static str,
}

/// GET /health - Liveness probe. Not guarded.
pub async fn health_check() -> ApiSuccess<HealthResponse> {
	ApiSuccess::new(HealthResponse {
		status: "ok",
		version: env!("CARGO_PKG_VERSION"),
	})
}
