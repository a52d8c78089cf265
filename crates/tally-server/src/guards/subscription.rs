// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subscription gates for organizations, teams and projects.
//!
//! The scope ID is validated even when the gate is off, so a malformed ID is a
//! 400 regardless of configuration.

use async_trait::async_trait;
use tally_server_auth::precedence::{
	require_subscription, subscription_check_required, SubscriptionScope,
};
use tally_server_auth::{AuthzError, ErrorCode, OrgId, ProjectId, TeamId};

use super::{params, Guard, GuardRequest};
use crate::state::AuthzState;

fn gate_applies(state: &AuthzState, req: &GuardRequest) -> Result<bool, AuthzError> {
	Ok(subscription_check_required(
		state.settings.subscriptions_enabled,
		req.principal()?,
	))
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribedOrgOnly;

#[async_trait]
impl Guard for SubscribedOrgOnly {
	const NAME: &'static str = "subscribed_org_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let org_id: OrgId = req.param(params::ORGANIZATION_ID, ErrorCode::InvalidOrganizationId)?;
		if !gate_applies(state, req)? {
			return Ok(());
		}
		require_subscription(
			SubscriptionScope::Organization,
			state.subscriptions.organization_subscribed(&org_id).await,
		)
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribedTeamOnly;

#[async_trait]
impl Guard for SubscribedTeamOnly {
	const NAME: &'static str = "subscribed_team_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let team_id: TeamId = req.param(params::TEAM_ID, ErrorCode::InvalidTeamId)?;
		if !gate_applies(state, req)? {
			return Ok(());
		}
		require_subscription(
			SubscriptionScope::Team,
			state.subscriptions.team_subscribed(&team_id).await,
		)
	}
}

/// Satisfied by an active subscription on the project's organization or team.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribedProjectOnly;

#[async_trait]
impl Guard for SubscribedProjectOnly {
	const NAME: &'static str = "subscribed_project_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let project_id: ProjectId = req.param(params::PROJECT_ID, ErrorCode::InvalidProjectId)?;
		if !gate_applies(state, req)? {
			return Ok(());
		}
		require_subscription(
			SubscriptionScope::Project,
			state.subscriptions.project_subscribed(&project_id).await,
		)
	}
}
