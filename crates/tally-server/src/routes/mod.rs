// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Route table.
//!
//! | Path                                                        | Guards after `UserOnly`                     |
//! |-------------------------------------------------------------|---------------------------------------------|
//! | `/authz/me`                                                 |                                             |
//! | `/authz/registered`                                         | `RegisteredUserOnly`                        |
//! | `/authz/subscribed`                                         | `SubscribedUserOnly`                        |
//! | `/authz/users/{userId}`                                     | `EntityUserOnly`                            |
//! | `/authz/users/{userId}/verified`                            | `VerifiedUserOnly`                          |
//! | `/authz/users/{userId}/subscribed`                          | `SubscribedEntityUserOnly`                  |
//! | `/authz/organizations/{orgId}`                              | `OrgUserOnly`                               |
//! | `/authz/organizations/{orgId}/admin`                        | `OrgUserOnly`, `OrgAdminOnly`               |
//! | `/authz/organizations/{orgId}/subscribed`                   | `OrgUserOnly`, `SubscribedOrgOnly`          |
//! | `/authz/organizations/{orgId}/departments/{departmentId}`   | `DeptUserOnly`                              |
//! | `/authz/organizations/{orgId}/departments/{departmentId}/admin` | `DeptUserOnly`, `DeptAdminOnly`         |
//! | `/authz/teams/{teamId}`                                     | `TeamUserOnly`                              |
//! | `/authz/teams/{teamId}/admin`                               | `TeamUserOnly`, `TeamAdminOnly`             |
//! | `/authz/teams/{teamId}/subscribed`                          | `TeamUserOnly`, `SubscribedTeamOnly`        |
//! | `/authz/projects/{projectId}`                               | `ProjectUserOnly`                           |
//! | `/authz/projects/{projectId}/admin`                         | `ProjectUserOnly`, `ProjectAdminOnly`       |
//! | `/authz/projects/{projectId}/subscribed`                    | `ProjectUserOnly`, `SubscribedProjectOnly`  |

pub mod authz;
pub mod health;

use axum::{routing::get, Router};

use crate::guards;
use crate::guards::{
	DeptAdminOnly, DeptUserOnly, EntityUserOnly, OrgAdminOnly, OrgUserOnly, ProjectAdminOnly,
	ProjectUserOnly, RegisteredUserOnly, SubscribedEntityUserOnly, SubscribedOrgOnly,
	SubscribedProjectOnly, SubscribedTeamOnly, SubscribedUserOnly, TeamAdminOnly, TeamUserOnly,
	UserOnly, VerifiedUserOnly,
};
use crate::state::AuthzState;
use authz::summary;

/// Unguarded routes.
pub fn public_routes() -> Router {
	Router::new().route("/health", get(health::health_check))
}

/// Guarded routes, one per guard composition.
pub fn authz_routes(state: &AuthzState) -> Router {
	Router::new()
		.route("/authz/me", get(summary).route_layer(guards!(state; UserOnly)))
		.route(
			"/authz/registered",
			get(summary).route_layer(guards!(state; UserOnly, RegisteredUserOnly)),
		)
		.route(
			"/authz/subscribed",
			get(summary).route_layer(guards!(state; UserOnly, SubscribedUserOnly)),
		)
		.merge(user_routes(state))
		.merge(organization_routes(state))
		.merge(team_routes(state))
		.merge(project_routes(state))
}

fn user_routes(state: &AuthzState) -> Router {
	Router::new()
		.route(
			"/authz/users/{userId}",
			get(summary).route_layer(guards!(state; UserOnly, EntityUserOnly)),
		)
		.route(
			"/authz/users/{userId}/verified",
			get(summary).route_layer(guards!(state; UserOnly, VerifiedUserOnly)),
		)
		.route(
			"/authz/users/{userId}/subscribed",
			get(summary).route_layer(guards!(state; UserOnly, SubscribedEntityUserOnly)),
		)
}

fn organization_routes(state: &AuthzState) -> Router {
	Router::new()
		.route(
			"/authz/organizations/{orgId}",
			get(summary).route_layer(guards!(state; UserOnly, OrgUserOnly)),
		)
		.route(
			"/authz/organizations/{orgId}/admin",
			get(summary).route_layer(guards!(state; UserOnly, OrgUserOnly, OrgAdminOnly)),
		)
		.route(
			"/authz/organizations/{orgId}/subscribed",
			get(summary).route_layer(guards!(state; UserOnly, OrgUserOnly, SubscribedOrgOnly)),
		)
		.route(
			"/authz/organizations/{orgId}/departments/{departmentId}",
			get(summary).route_layer(guards!(state; UserOnly, DeptUserOnly)),
		)
		.route(
			"/authz/organizations/{orgId}/departments/{departmentId}/admin",
			get(summary).route_layer(guards!(state; UserOnly, DeptUserOnly, DeptAdminOnly)),
		)
}

fn team_routes(state: &AuthzState) -> Router {
	Router::new()
		.route(
			"/authz/teams/{teamId}",
			get(summary).route_layer(guards!(state; UserOnly, TeamUserOnly)),
		)
		.route(
			"/authz/teams/{teamId}/admin",
			get(summary).route_layer(guards!(state; UserOnly, TeamUserOnly, TeamAdminOnly)),
		)
		.route(
			"/authz/teams/{teamId}/subscribed",
			get(summary).route_layer(guards!(state; UserOnly, TeamUserOnly, SubscribedTeamOnly)),
		)
}

fn project_routes(state: &AuthzState) -> Router {
	Router::new()
		.route(
			"/authz/projects/{projectId}",
			get(summary).route_layer(guards!(state; UserOnly, ProjectUserOnly)),
		)
		.route(
			"/authz/projects/{projectId}/admin",
			get(summary).route_layer(guards!(state; UserOnly, ProjectUserOnly, ProjectAdminOnly)),
		)
		.route(
			"/authz/projects/{projectId}/subscribed",
			get(summary).route_layer(guards!(state; UserOnly, ProjectUserOnly, SubscribedProjectOnly)),
		)
}
