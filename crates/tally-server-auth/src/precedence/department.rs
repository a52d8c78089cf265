// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use super::require_role;
use crate::context::ResolvedDepartment;
use crate::error::{AuthzError, ErrorCode};
use crate::types::{is_admin_fact, DepartmentId, DepartmentRoles, EffectiveRole, OrgId, Principal};

/// An organization admin is a department admin. A plain organization member is
/// not a department member.
pub fn department_effective_role(principal: &Principal, roles: &DepartmentRoles) -> EffectiveRole {
	if principal.is_admin() {
		return EffectiveRole::GlobalAdmin;
	}
	if is_admin_fact(roles.department_role) || is_admin_fact(roles.organization_role) {
		return EffectiveRole::Admin;
	}
	if roles.department_role.is_some() {
		return EffectiveRole::Member;
	}
	EffectiveRole::None
}

pub fn evaluate_department_user(
	principal: &Principal,
	org_id: OrgId,
	department_id: DepartmentId,
	roles: DepartmentRoles,
) -> Result<ResolvedDepartment, AuthzError> {
	let effective = department_effective_role(principal, &roles);
	require_role(
		effective,
		EffectiveRole::Member,
		ErrorCode::RequiresDepartmentUser,
	)?;
	Ok(ResolvedDepartment {
		org_id,
		department_id,
		roles,
		effective,
	})
}

pub fn evaluate_department_admin(
	resolved: &ResolvedDepartment,
) -> Result<EffectiveRole, AuthzError> {
	require_role(
		resolved.effective,
		EffectiveRole::Admin,
		ErrorCode::RequiresDepartmentAdmin,
	)
}
