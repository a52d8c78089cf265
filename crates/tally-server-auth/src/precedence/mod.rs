// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Precedence evaluation.
//!
//! Every scope reduces its role facts to one [`EffectiveRole`]:
//!
//! | Scope        | `GlobalAdmin` | `Admin`                                   | `Member`                    |
//! |--------------|---------------|-------------------------------------------|-----------------------------|
//! | Organization | ADMIN caller  | org role ADMIN                            | any org role                |
//! | Department   | ADMIN caller  | dept ADMIN or org ADMIN                   | non-empty dept role         |
//! | Team         | ADMIN caller  | team, dept or org ADMIN                   | direct team membership      |
//! | Project      | ADMIN caller  | member with role ADMIN                    | member                      |
//!
//! Membership guards require `Member`, admin guards require `Admin`. The
//! functions here are pure: identical inputs always give identical outcomes.
//!
//! Admin evaluators take the resolved scope facts as an argument. The only way
//! to obtain those facts is to run the matching membership evaluator first.

mod department;
mod entity;
mod organization;
mod project;
mod subscription;
mod team;

pub use department::{department_effective_role, evaluate_department_admin, evaluate_department_user};
pub use entity::{entity_user, registered_user, subscribed_user, verified_user};
pub use organization::{
	evaluate_organization_admin, evaluate_organization_user, organization_effective_role,
};
pub use project::{evaluate_project_admin, evaluate_project_user, project_effective_role};
pub use subscription::{require_subscription, subscription_check_required, SubscriptionScope};
pub use team::{evaluate_team_admin, evaluate_team_user, team_effective_role};

use crate::error::{AuthzError, ErrorCode};
use crate::types::EffectiveRole;

/// Allow if `effective` meets `required`, else deny with `denied`.
pub fn require_role(
	effective: EffectiveRole,
	required: EffectiveRole,
	denied: ErrorCode,
) -> Result<EffectiveRole, AuthzError> {
	if effective.satisfies(required) {
		Ok(effective)
	} else {
		Err(AuthzError::Forbidden(denied))
	}
}
