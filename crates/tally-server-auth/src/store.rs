// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Data-layer contracts consumed by the authorization core.
//!
//! The core never computes or stores role facts; it asks these traits on every
//! request. Implementations must return [`StoreError::NotFound`] for a missing
//! record and [`StoreError::Backend`] for anything else, so callers can tell a
//! denial from an outage.

use async_trait::async_trait;

use crate::error::StoreError;
use crate::types::{
	DepartmentId, DepartmentRoles, OrgId, Principal, ProjectId, ProjectMembership, ScopeRole, TeamId,
	TeamRoleInfo, UserId, UserRecord,
};

/// Resolves credentials and user IDs to principals.
#[async_trait]
pub trait PrincipalStore: Send + Sync {
	/// Principal owning an active API key.
	async fn principal_by_api_key(&self, api_key: &str) -> Result<Principal, StoreError>;

	/// Registered (or admin) principal behind a validated session token.
	async fn principal_by_session(&self, session_token: &str) -> Result<Principal, StoreError>;

	/// Guest principal named by the guest cookie.
	async fn guest_principal(&self, user_id: &UserId) -> Result<Principal, StoreError>;

	/// Any user by ID, including the verified and subscribed flags.
	async fn user_by_id(&self, user_id: &UserId) -> Result<UserRecord, StoreError>;
}

/// Role facts per scope.
#[async_trait]
pub trait ScopeRoleStore: Send + Sync {
	async fn organization_exists(&self, org_id: &OrgId) -> Result<bool, StoreError>;

	/// The principal's organization role, or `None` without a membership record.
	async fn organization_role(
		&self,
		user_id: &UserId,
		org_id: &OrgId,
	) -> Result<Option<ScopeRole>, StoreError>;

	/// Organization and department roles in a single lookup.
	async fn department_roles(
		&self,
		user_id: &UserId,
		org_id: &OrgId,
		department_id: &DepartmentId,
	) -> Result<DepartmentRoles, StoreError>;

	/// Team role plus the roles at the team's department and organization.
	///
	/// Returns `StoreError::NotFound(Entity::Team)` when the team does not exist.
	async fn team_role_info(
		&self,
		user_id: &UserId,
		team_id: &TeamId,
	) -> Result<TeamRoleInfo, StoreError>;

	async fn project_membership(
		&self,
		user_id: &UserId,
		project_id: &ProjectId,
	) -> Result<ProjectMembership, StoreError>;
}

/// Subscription status per scope. Independent of the role hierarchy.
#[async_trait]
pub trait SubscriptionStore: Send + Sync {
	async fn organization_subscribed(&self, org_id: &OrgId) -> Result<bool, StoreError>;

	async fn team_subscribed(&self, team_id: &TeamId) -> Result<bool, StoreError>;

	/// True if the project's organization or team holds an active subscription.
	async fn project_subscribed(&self, project_id: &ProjectId) -> Result<bool, StoreError>;
}
