// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Project precedence is flat: only the direct project membership counts.
//! Admin roles on the project's organization, department or team do not carry
//! down.

use super::require_role;
use crate::context::ResolvedProject;
use crate::error::{AuthzError, ErrorCode};
use crate::types::{is_admin_fact, EffectiveRole, Principal, ProjectId, ProjectMembership};

pub fn project_effective_role(principal: &Principal, membership: &ProjectMembership) -> EffectiveRole {
	if principal.is_admin() {
		return EffectiveRole::GlobalAdmin;
	}
	if !membership.is_member {
		return EffectiveRole::None;
	}
	if is_admin_fact(membership.role) {
		EffectiveRole::Admin
	} else {
		EffectiveRole::Member
	}
}

pub fn evaluate_project_user(
	principal: &Principal,
	project_id: ProjectId,
	membership: ProjectMembership,
) -> Result<ResolvedProject, AuthzError> {
	let effective = project_effective_role(principal, &membership);
	require_role(
		effective,
		EffectiveRole::Member,
		ErrorCode::RequiresProjectUser,
	)?;
	Ok(ResolvedProject {
		project_id,
		membership,
		effective,
	})
}

pub fn evaluate_project_admin(resolved: &ResolvedProject) -> Result<EffectiveRole, AuthzError> {
	require_role(
		resolved.effective,
		EffectiveRole::Admin,
		ErrorCode::RequiresProjectAdmin,
	)
}
