// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Handlers behind the guarded routes.
//!
//! Each handler reports what the guard chain resolved for the request. The
//! guards already decided; handlers only read the context.

use axum::Extension;
use serde::Serialize;
use tally_server_auth::{
	AuthorizationContext, Principal, ResolvedDepartment, ResolvedOrganization, ResolvedProject,
	ResolvedTeam,
};

use crate::api_response::ApiSuccess;

/// The caller plus every scope the chain resolved for this request.
#[derive(Debug, Clone, Serialize)]
pub struct AuthorizationSummary {
	pub principal: Principal,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub organization: Option<ResolvedOrganization>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub department: Option<ResolvedDepartment>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub team: Option<ResolvedTeam>,
	#[serde(skip_serializing_if = "Option::is_none")]
	pub project: Option<ResolvedProject>,
}

impl From<&AuthorizationContext> for AuthorizationSummary {
	fn from(context: &AuthorizationContext) -> Self {
		Self {
			principal: context.principal().clone(),
			organization: context.resolved_organization().cloned(),
			department: context.resolved_department().cloned(),
			team: context.resolved_team().cloned(),
			project: context.resolved_project().cloned(),
		}
	}
}

pub async fn summary(
	Extension(context): Extension<AuthorizationContext>,
) -> ApiSuccess<AuthorizationSummary> {
	ApiSuccess::new(AuthorizationSummary::from(&context))
}
