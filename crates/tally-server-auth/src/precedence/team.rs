// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Three-level team precedence.
//!
//! A team may hang off an organization directly or off one of its departments.
//! An `ADMIN` role at the department or organization makes the caller a team
//! admin. The team's own role, plain or `ADMIN`, only counts when the
//! association is direct, at the team itself.

use super::require_role;
use crate::context::ResolvedTeam;
use crate::error::{AuthzError, ErrorCode};
use crate::types::{is_admin_fact, AssociationLevel, EffectiveRole, Principal, TeamId, TeamRoleInfo};

pub fn team_effective_role(principal: &Principal, info: &TeamRoleInfo) -> EffectiveRole {
	if principal.is_admin() {
		return EffectiveRole::GlobalAdmin;
	}
	if is_admin_fact(info.department_role) || is_admin_fact(info.organization_role) {
		return EffectiveRole::Admin;
	}
	// The team role only counts for a direct team association.
	if info.association_level != AssociationLevel::Team {
		return EffectiveRole::None;
	}
	if is_admin_fact(info.team_role) {
		EffectiveRole::Admin
	} else {
		EffectiveRole::Member
	}
}

pub fn evaluate_team_user(
	principal: &Principal,
	team_id: TeamId,
	info: TeamRoleInfo,
) -> Result<ResolvedTeam, AuthzError> {
	let effective = team_effective_role(principal, &info);
	require_role(effective, EffectiveRole::Member, ErrorCode::RequiresTeamUser)?;
	Ok(ResolvedTeam {
		team_id,
		info,
		effective,
	})
}

/// Reads the facts [`evaluate_team_user`] produced; never fetches again.
pub fn evaluate_team_admin(resolved: &ResolvedTeam) -> Result<EffectiveRole, AuthzError> {
	require_role(
		resolved.effective,
		EffectiveRole::Admin,
		ErrorCode::RequiresTeamAdmin,
	)
}
