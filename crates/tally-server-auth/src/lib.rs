// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Request-time authorization for Tally.
//!
//! Entities nest as Organization → Department → Team → Project. A request is
//! authorized in two steps:
//!
//! 1. [`principal::PrincipalResolver`] turns credentials (API key, session cookie,
//!    guest cookie) into a [`Principal`].
//! 2. Scope evaluators in [`precedence`] turn the principal plus role facts fetched
//!    from a [`store::ScopeRoleStore`] into an [`EffectiveRole`], and compare it to
//!    the threshold a route requires.
//!
//! Resolved facts are appended to a typed [`AuthorizationContext`] that travels with
//! the request. Nothing here caches across requests; every fact is fetched fresh.
//!
//! The HTTP wiring (tower layers, failure envelope) lives in `tally-server`.

pub mod context;
pub mod credentials;
pub mod error;
pub mod precedence;
pub mod principal;
pub mod store;
pub mod types;

pub use context::{
	AuthorizationContext, ResolvedDepartment, ResolvedOrganization, ResolvedProject, ResolvedTeam,
};
pub use credentials::{CookieCredentialValidator, CredentialValidator};
pub use error::{AuthzError, CookieError, Entity, ErrorCode, StoreError};
pub use principal::{PrincipalResolver, ResolverSettings};
pub use store::{PrincipalStore, ScopeRoleStore, SubscriptionStore};
pub use types::{
	AssociationLevel, DepartmentId, DepartmentRoles, EffectiveRole, OrgId, Principal, PrincipalType,
	ProjectId, ProjectMembership, ScopeRole, TeamId, TeamRoleInfo, UserId, UserRecord,
};
