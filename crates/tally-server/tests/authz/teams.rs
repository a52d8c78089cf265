// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use tally_server_auth::TeamId;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_team_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let team = format!("/authz/teams/{}", f.team_id);
	let team_admin = format!("/authz/teams/{}/admin", f.team_id);

	let cases = vec![
		AuthzCase::allow("member_can_access_team", team.clone(), &f.team_member),
		AuthzCase::allow("team_admin_can_access_team", team.clone(), &f.team_admin),
		AuthzCase::allow("dept_admin_can_access_team", team.clone(), &f.dept_admin),
		AuthzCase::allow("org_admin_can_access_team", team.clone(), &f.org_admin),
		AuthzCase::allow("global_admin_can_access_team", team.clone(), &f.admin),
		AuthzCase::deny(
			"dept_member_is_not_team_member",
			team.clone(),
			Some(&f.dept_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_TEAM_USER",
		),
		AuthzCase::deny(
			"org_member_is_not_team_member",
			team.clone(),
			Some(&f.org_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_TEAM_USER",
		),
		AuthzCase::deny(
			"outsider_cannot_access_team",
			team,
			Some(&f.outsider),
			StatusCode::FORBIDDEN,
			"REQUIRES_TEAM_USER",
		),
		AuthzCase::allow("team_admin_can_administer", team_admin.clone(), &f.team_admin),
		AuthzCase::allow("dept_admin_can_administer", team_admin.clone(), &f.dept_admin),
		AuthzCase::allow("org_admin_can_administer", team_admin.clone(), &f.org_admin),
		AuthzCase::allow("global_admin_can_administer", team_admin.clone(), &f.admin),
		AuthzCase::deny(
			"team_member_cannot_administer",
			team_admin,
			Some(&f.team_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_TEAM_ADMIN",
		),
		AuthzCase::deny(
			"unknown_team_is_not_found",
			format!("/authz/teams/{}", TeamId::generate()),
			Some(&f.team_member),
			StatusCode::NOT_FOUND,
			"TEAM_NOT_FOUND",
		),
		AuthzCase::deny(
			"malformed_team_id",
			"/authz/teams/platform".to_string(),
			Some(&f.team_member),
			StatusCode::BAD_REQUEST,
			"INVALID_TEAM_ID",
		),
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_team_directly_under_org() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let team_admin = format!("/authz/teams/{}/admin", f.org_team_id);

	let cases = vec![
		AuthzCase::allow("org_admin_administers_org_team", team_admin.clone(), &f.org_admin),
		AuthzCase::deny(
			"dept_admin_has_no_say_outside_department",
			team_admin,
			Some(&f.dept_admin),
			StatusCode::FORBIDDEN,
			"REQUIRES_TEAM_USER",
		),
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_team_summary_carries_role_info() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.get(&format!("/authz/teams/{}/admin", f.team_id), Some(&f.dept_admin))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	let team = &body["data"]["team"];
	assert_eq!(team["team_id"], f.team_id.to_string());
	assert_eq!(team["effective"], "ADMIN");
	assert_eq!(team["info"]["association_level"], "DEPARTMENT");
	assert_eq!(team["info"]["department_role"], "ADMIN");
}
