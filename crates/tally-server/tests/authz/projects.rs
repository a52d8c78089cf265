// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::{run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_project_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let project = format!("/authz/projects/{}", f.project_id);
	let project_admin = format!("/authz/projects/{}/admin", f.project_id);

	let cases = vec![
		AuthzCase::allow("member_can_access_project", project.clone(), &f.project_member),
		AuthzCase::allow("admin_can_access_project", project.clone(), &f.project_admin),
		AuthzCase::allow("global_admin_can_access_project", project.clone(), &f.admin),
		AuthzCase::deny(
			"outsider_cannot_access_project",
			project.clone(),
			Some(&f.outsider),
			StatusCode::FORBIDDEN,
			"REQUIRES_PROJECT_USER",
		),
		AuthzCase::allow("project_admin_can_administer", project_admin.clone(), &f.project_admin),
		AuthzCase::allow("global_admin_can_administer", project_admin.clone(), &f.admin),
		AuthzCase::deny(
			"member_without_admin_role_cannot_administer",
			project_admin,
			Some(&f.project_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_PROJECT_ADMIN",
		),
		AuthzCase::deny(
			"malformed_project_id",
			"/authz/projects/gateway".to_string(),
			Some(&f.project_member),
			StatusCode::BAD_REQUEST,
			"INVALID_PROJECT_ID",
		),
	];

	run_authz_cases(&app, &cases).await;
}

/// Ancestor admins get nothing on a project they are not a member of.
#[tokio::test]
async fn test_project_authorization_is_flat() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let project = format!("/authz/projects/{}", f.project_id);

	let cases = vec![
		AuthzCase::deny(
			"org_admin_is_not_project_user",
			project.clone(),
			Some(&f.org_admin),
			StatusCode::FORBIDDEN,
			"REQUIRES_PROJECT_USER",
		),
		AuthzCase::deny(
			"dept_admin_is_not_project_user",
			project.clone(),
			Some(&f.dept_admin),
			StatusCode::FORBIDDEN,
			"REQUIRES_PROJECT_USER",
		),
		AuthzCase::deny(
			"team_admin_is_not_project_user",
			project,
			Some(&f.team_admin),
			StatusCode::FORBIDDEN,
			"REQUIRES_PROJECT_USER",
		),
	];

	run_authz_cases(&app, &cases).await;
}
