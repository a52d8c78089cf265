// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-scoped authorization state.
//!
//! An [`AuthorizationContext`] is created by principal resolution and then grows
//! as scope guards run. Each guard records what it fetched together with the
//! scope ID it fetched it for. Readers look entries up by ID, so a fact recorded
//! for one team can never be read as another team's.
//!
//! Entries are only ever added: the first entry recorded for a scope is kept
//! and later records for it are ignored. An absent entry means the writing
//! guard has not run for that scope; readers must treat it as ungranted.

use serde::Serialize;

use crate::types::{
	DepartmentId, DepartmentRoles, EffectiveRole, OrgId, Principal, ProjectId, ProjectMembership,
	ScopeRole, TeamId, TeamRoleInfo,
};

/// Organization facts resolved by the organization membership guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedOrganization {
	pub org_id: OrgId,
	pub role: Option<ScopeRole>,
	pub effective: EffectiveRole,
}

/// Department facts resolved by the department membership guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedDepartment {
	pub org_id: OrgId,
	pub department_id: DepartmentId,
	pub roles: DepartmentRoles,
	pub effective: EffectiveRole,
}

/// Team facts resolved by the team membership guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedTeam {
	pub team_id: TeamId,
	pub info: TeamRoleInfo,
	pub effective: EffectiveRole,
}

/// Project facts resolved by the project membership guard.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ResolvedProject {
	pub project_id: ProjectId,
	pub membership: ProjectMembership,
	pub effective: EffectiveRole,
}

/// Everything the guard chain has learned about the current request.
#[derive(Debug, Clone)]
pub struct AuthorizationContext {
	principal: Principal,
	organization: Option<ResolvedOrganization>,
	department: Option<ResolvedDepartment>,
	team: Option<ResolvedTeam>,
	project: Option<ResolvedProject>,
}

impl AuthorizationContext {
	pub fn new(principal: Principal) -> Self {
		Self {
			principal,
			organization: None,
			department: None,
			team: None,
			project: None,
		}
	}

	pub fn principal(&self) -> &Principal {
		&self.principal
	}

	pub fn record_organization(&mut self, resolved: ResolvedOrganization) {
		if self.organization.is_none() {
			self.organization = Some(resolved);
		}
	}

	pub fn record_department(&mut self, resolved: ResolvedDepartment) {
		if self.department.is_none() {
			self.department = Some(resolved);
		}
	}

	pub fn record_team(&mut self, resolved: ResolvedTeam) {
		if self.team.is_none() {
			self.team = Some(resolved);
		}
	}

	pub fn record_project(&mut self, resolved: ResolvedProject) {
		if self.project.is_none() {
			self.project = Some(resolved);
		}
	}

	/// Organization facts, if resolved for `org_id`.
	pub fn organization(&self, org_id: &OrgId) -> Option<&ResolvedOrganization> {
		self.organization.as_ref().filter(|o| o.org_id == *org_id)
	}

	/// Department facts, if resolved for this exact organization and department.
	pub fn department(
		&self,
		org_id: &OrgId,
		department_id: &DepartmentId,
	) -> Option<&ResolvedDepartment> {
		self
			.department
			.as_ref()
			.filter(|d| d.org_id == *org_id && d.department_id == *department_id)
	}

	pub fn team(&self, team_id: &TeamId) -> Option<&ResolvedTeam> {
		self.team.as_ref().filter(|t| t.team_id == *team_id)
	}

	pub fn project(&self, project_id: &ProjectId) -> Option<&ResolvedProject> {
		self.project.as_ref().filter(|p| p.project_id == *project_id)
	}

	pub fn resolved_organization(&self) -> Option<&ResolvedOrganization> {
		self.organization.as_ref()
	}

	pub fn resolved_department(&self) -> Option<&ResolvedDepartment> {
		self.department.as_ref()
	}

	pub fn resolved_team(&self) -> Option<&ResolvedTeam> {
		self.team.as_ref()
	}

	pub fn resolved_project(&self) -> Option<&ResolvedProject> {
		self.project.as_ref()
	}
}
