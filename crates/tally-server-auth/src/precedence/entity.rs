// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Checks against the caller's own identity rather than a tenancy scope.

use crate::error::{AuthzError, ErrorCode};
use crate::types::{Principal, UserId, UserRecord};

/// The `{userId}` in the route must be the caller, unless the caller is a
/// global admin.
pub fn entity_user(principal: &Principal, target: &UserId) -> Result<(), AuthzError> {
	if principal.is_admin() || principal.id == *target {
		Ok(())
	} else {
		Err(AuthzError::Forbidden(ErrorCode::InvalidUser))
	}
}

pub fn registered_user(principal: &Principal) -> Result<(), AuthzError> {
	if principal.is_guest() {
		Err(AuthzError::Forbidden(ErrorCode::RequiresRegisteredUser))
	} else {
		Ok(())
	}
}

/// Ownership check plus, when `require_verified` is set, the target user's
/// verified flag. The verification requirement applies to the target even when
/// a global admin is acting on it.
pub fn verified_user(
	principal: &Principal,
	target: &UserRecord,
	require_verified: bool,
) -> Result<(), AuthzError> {
	entity_user(principal, &target.id)?;
	if require_verified && !target.verified {
		return Err(AuthzError::Forbidden(ErrorCode::RequiresVerifiedUser));
	}
	Ok(())
}

/// The user must hold an active subscription while subscriptions are enabled.
/// Global admins bypass.
pub fn subscribed_user(
	principal: &Principal,
	user: &UserRecord,
	subscriptions_enabled: bool,
) -> Result<(), AuthzError> {
	if !subscriptions_enabled || principal.is_admin() || user.subscribed {
		Ok(())
	} else {
		Err(AuthzError::Forbidden(ErrorCode::RequiresSubscribedUser))
	}
}
