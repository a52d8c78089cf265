// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subscription gate. Independent of the role hierarchy.

use std::fmt;

use crate::error::{AuthzError, ErrorCode, StoreError};
use crate::types::Principal;

/// Scope whose subscription is checked.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum SubscriptionScope {
	Organization,
	Team,
	/// Subscribed through its organization or its team.
	Project,
}

impl SubscriptionScope {
	pub fn denied_code(&self) -> ErrorCode {
		match self {
			SubscriptionScope::Organization => ErrorCode::OrganizationSubscriptionRequired,
			SubscriptionScope::Team => ErrorCode::TeamSubscriptionRequired,
			SubscriptionScope::Project => ErrorCode::OrganizationOrTeamSubscriptionRequired,
		}
	}
}

impl fmt::Display for SubscriptionScope {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			SubscriptionScope::Organization => write!(f, "organization"),
			SubscriptionScope::Team => write!(f, "team"),
			SubscriptionScope::Project => write!(f, "project"),
		}
	}
}

/// False when the gate is off or the caller is a global admin; the status
/// lookup is skipped entirely in that case.
pub fn subscription_check_required(subscriptions_enabled: bool, principal: &Principal) -> bool {
	subscriptions_enabled && !principal.is_admin()
}

/// Decide on a fetched subscription status.
///
/// A missing record or `false` denies with the scope's code. A backend failure
/// is a 500.
pub fn require_subscription(
	scope: SubscriptionScope,
	status: Result<bool, StoreError>,
) -> Result<(), AuthzError> {
	match status {
		Ok(true) => Ok(()),
		Ok(false) => Err(AuthzError::Forbidden(scope.denied_code())),
		Err(err) => Err(AuthzError::from_role_lookup(err, scope.denied_code())),
	}
}
