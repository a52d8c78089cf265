// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Membership and admin guards for each tenancy scope.
//!
//! Membership guards fetch role facts and record them in the context. Admin
//! guards never fetch; they read what the membership guard recorded for the
//! same scope ID and deny when nothing was recorded.

use async_trait::async_trait;
use tally_server_auth::precedence::{
	evaluate_department_admin, evaluate_department_user, evaluate_organization_admin,
	evaluate_organization_user, evaluate_project_admin, evaluate_project_user, evaluate_team_admin,
	evaluate_team_user,
};
use tally_server_auth::{
	AuthzError, DepartmentId, Entity, ErrorCode, OrgId, ProjectId, StoreError, TeamId,
};

use super::{params, Guard, GuardRequest};
use crate::state::AuthzState;

fn organization_id(req: &GuardRequest) -> Result<OrgId, AuthzError> {
	req.param(params::ORGANIZATION_ID, ErrorCode::InvalidOrganizationId)
}

fn department_id(req: &GuardRequest) -> Result<DepartmentId, AuthzError> {
	req.param(params::DEPARTMENT_ID, ErrorCode::InvalidDepartmentId)
}

fn team_id(req: &GuardRequest) -> Result<TeamId, AuthzError> {
	req.param(params::TEAM_ID, ErrorCode::InvalidTeamId)
}

fn project_id(req: &GuardRequest) -> Result<ProjectId, AuthzError> {
	req.param(params::PROJECT_ID, ErrorCode::InvalidProjectId)
}

// =============================================================================
// Organization
// =============================================================================

/// Organization must exist (404 otherwise) and the caller must hold any role in it.
#[derive(Debug, Clone, Copy, Default)]
pub struct OrgUserOnly;

#[async_trait]
impl Guard for OrgUserOnly {
	const NAME: &'static str = "org_user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let org_id = organization_id(req)?;
		let principal = req.principal()?.clone();

		let exists = state
			.scopes
			.organization_exists(&org_id)
			.await
			.map_err(|err| {
				AuthzError::from_existence_lookup(
					err,
					Entity::Organization,
					ErrorCode::OrganizationNotFound,
					ErrorCode::RequiresOrganizationUser,
				)
			})?;
		if !exists {
			return Err(AuthzError::NotFound(ErrorCode::OrganizationNotFound));
		}

		let role = StoreError::or_absent(state.scopes.organization_role(&principal.id, &org_id).await)
			.map_err(|err| AuthzError::from_role_lookup(err, ErrorCode::RequiresOrganizationUser))?;

		let resolved = evaluate_organization_user(&principal, org_id, role)?;
		req.context_mut()?.record_organization(resolved);
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct OrgAdminOnly;

#[async_trait]
impl Guard for OrgAdminOnly {
	const NAME: &'static str = "org_admin_only";

	async fn check(&self, _state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let org_id = organization_id(req)?;
		let resolved = req
			.context()?
			.organization(&org_id)
			.ok_or(AuthzError::Forbidden(ErrorCode::RequiresOrganizationAdmin))?;
		evaluate_organization_admin(resolved).map(|_| ())
	}
}

// =============================================================================
// Department
// =============================================================================

#[derive(Debug, Clone, Copy, Default)]
pub struct DeptUserOnly;

#[async_trait]
impl Guard for DeptUserOnly {
	const NAME: &'static str = "dept_user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let org_id = organization_id(req)?;
		let department_id = department_id(req)?;
		let principal = req.principal()?.clone();

		let roles = StoreError::or_absent(
			state
				.scopes
				.department_roles(&principal.id, &org_id, &department_id)
				.await,
		)
		.map_err(|err| AuthzError::from_role_lookup(err, ErrorCode::RequiresDepartmentUser))?;

		let resolved = evaluate_department_user(&principal, org_id, department_id, roles)?;
		req.context_mut()?.record_department(resolved);
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct DeptAdminOnly;

#[async_trait]
impl Guard for DeptAdminOnly {
	const NAME: &'static str = "dept_admin_only";

	async fn check(&self, _state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let org_id = organization_id(req)?;
		let department_id = department_id(req)?;
		let resolved = req
			.context()?
			.department(&org_id, &department_id)
			.ok_or(AuthzError::Forbidden(ErrorCode::RequiresDepartmentAdmin))?;
		evaluate_department_admin(resolved).map(|_| ())
	}
}

// =============================================================================
// Team
// =============================================================================

/// A missing team is a 404. Empty role facts, or a store reporting some other
/// record missing, deny with 403.
#[derive(Debug, Clone, Copy, Default)]
pub struct TeamUserOnly;

#[async_trait]
impl Guard for TeamUserOnly {
	const NAME: &'static str = "team_user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let team_id = team_id(req)?;
		let principal = req.principal()?.clone();

		let info = state
			.scopes
			.team_role_info(&principal.id, &team_id)
			.await
			.map_err(|err| {
				AuthzError::from_existence_lookup(
					err,
					Entity::Team,
					ErrorCode::TeamNotFound,
					ErrorCode::RequiresTeamUser,
				)
			})?;

		let resolved = evaluate_team_user(&principal, team_id, info)?;
		req.context_mut()?.record_team(resolved);
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TeamAdminOnly;

#[async_trait]
impl Guard for TeamAdminOnly {
	const NAME: &'static str = "team_admin_only";

	async fn check(&self, _state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let team_id = team_id(req)?;
		let resolved = req
			.context()?
			.team(&team_id)
			.ok_or(AuthzError::Forbidden(ErrorCode::RequiresTeamAdmin))?;
		evaluate_team_admin(resolved).map(|_| ())
	}
}

// =============================================================================
// Project
// =============================================================================

/// Direct project membership only; ancestor roles are not consulted.
#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectUserOnly;

#[async_trait]
impl Guard for ProjectUserOnly {
	const NAME: &'static str = "project_user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let project_id = project_id(req)?;
		let principal = req.principal()?.clone();

		let membership = StoreError::or_absent(
			state
				.scopes
				.project_membership(&principal.id, &project_id)
				.await,
		)
		.map_err(|err| AuthzError::from_role_lookup(err, ErrorCode::RequiresProjectUser))?;

		let resolved = evaluate_project_user(&principal, project_id, membership)?;
		req.context_mut()?.record_project(resolved);
		Ok(())
	}
}

#[derive(Debug, Clone, Copy, Default)]
pub struct ProjectAdminOnly;

#[async_trait]
impl Guard for ProjectAdminOnly {
	const NAME: &'static str = "project_admin_only";

	async fn check(&self, _state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let project_id = project_id(req)?;
		let resolved = req
			.context()?
			.project(&project_id)
			.ok_or(AuthzError::Forbidden(ErrorCode::RequiresProjectAdmin))?;
		evaluate_project_admin(resolved).map(|_| ())
	}
}
