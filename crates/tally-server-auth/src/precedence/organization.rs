// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use super::require_role;
use crate::context::ResolvedOrganization;
use crate::error::{AuthzError, ErrorCode};
use crate::types::{EffectiveRole, OrgId, Principal, ScopeRole};

/// Any membership record grants `Member`; `ADMIN` grants `Admin`.
pub fn organization_effective_role(principal: &Principal, role: Option<ScopeRole>) -> EffectiveRole {
	if principal.is_admin() {
		return EffectiveRole::GlobalAdmin;
	}
	match role {
		Some(ScopeRole::Admin) => EffectiveRole::Admin,
		Some(ScopeRole::Member) => EffectiveRole::Member,
		None => EffectiveRole::None,
	}
}

/// Membership check. On success the returned facts feed
/// [`evaluate_organization_admin`].
pub fn evaluate_organization_user(
	principal: &Principal,
	org_id: OrgId,
	role: Option<ScopeRole>,
) -> Result<ResolvedOrganization, AuthzError> {
	let effective = organization_effective_role(principal, role);
	require_role(
		effective,
		EffectiveRole::Member,
		ErrorCode::RequiresOrganizationUser,
	)?;
	Ok(ResolvedOrganization {
		org_id,
		role,
		effective,
	})
}

pub fn evaluate_organization_admin(
	resolved: &ResolvedOrganization,
) -> Result<EffectiveRole, AuthzError> {
	require_role(
		resolved.effective,
		EffectiveRole::Admin,
		ErrorCode::RequiresOrganizationAdmin,
	)
}
