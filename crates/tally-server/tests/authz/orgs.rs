// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;
use tally_server_auth::OrgId;

use super::support::{body_json, run_authz_cases, AuthzCase, TestApp};

#[tokio::test]
async fn test_org_authorization() {
	let app = TestApp::new().await;
	let f = &app.fixtures;
	let org = format!("/authz/organizations/{}", f.org_id);
	let org_admin = format!("/authz/organizations/{}/admin", f.org_id);
	let missing = format!("/authz/organizations/{}", OrgId::generate());

	let cases = vec![
		AuthzCase::allow("member_can_access_org", org.clone(), &f.org_member),
		AuthzCase::allow("owner_can_access_org", org.clone(), &f.org_admin),
		AuthzCase::allow("global_admin_can_access_org", org.clone(), &f.admin),
		AuthzCase::allow("api_key_member_can_access_org", org.clone(), &f.api_user),
		AuthzCase::deny(
			"outsider_cannot_access_org",
			org.clone(),
			Some(&f.outsider),
			StatusCode::FORBIDDEN,
			"REQUIRES_ORGANIZATION_USER",
		),
		AuthzCase::deny(
			"department_member_is_not_org_member",
			org,
			Some(&f.dept_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_ORGANIZATION_USER",
		),
		AuthzCase::deny(
			"unknown_org_is_not_found",
			missing.clone(),
			Some(&f.org_member),
			StatusCode::NOT_FOUND,
			"ORGANIZATION_NOT_FOUND",
		),
		AuthzCase::deny(
			"unknown_org_is_not_found_for_global_admin",
			missing,
			Some(&f.admin),
			StatusCode::NOT_FOUND,
			"ORGANIZATION_NOT_FOUND",
		),
		AuthzCase::deny(
			"malformed_org_id",
			"/authz/organizations/acme".to_string(),
			Some(&f.org_member),
			StatusCode::BAD_REQUEST,
			"INVALID_ORGANIZATION_ID",
		),
		AuthzCase::allow("owner_can_administer_org", org_admin.clone(), &f.org_admin),
		AuthzCase::allow("global_admin_can_administer_org", org_admin.clone(), &f.admin),
		AuthzCase::deny(
			"member_cannot_administer_org",
			org_admin.clone(),
			Some(&f.org_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_ORGANIZATION_ADMIN",
		),
		AuthzCase::deny(
			"outsider_stopped_at_membership",
			org_admin,
			Some(&f.outsider),
			StatusCode::FORBIDDEN,
			"REQUIRES_ORGANIZATION_USER",
		),
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_org_summary_reports_effective_role() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let response = app
		.get(&format!("/authz/organizations/{}/admin", f.org_id), Some(&f.org_admin))
		.await;
	assert_eq!(response.status(), StatusCode::OK);
	let body = body_json(response).await;
	assert_eq!(body["data"]["organization"]["org_id"], f.org_id.to_string());
	assert_eq!(body["data"]["organization"]["effective"], "ADMIN");

	let response = app
		.get(&format!("/authz/organizations/{}", f.org_id), Some(&f.admin))
		.await;
	let body = body_json(response).await;
	assert_eq!(body["data"]["organization"]["effective"], "GLOBAL_ADMIN");
}
