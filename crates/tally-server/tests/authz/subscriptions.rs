// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use axum::http::StatusCode;

use super::support::{run_authz_cases, AuthzCase, TestApp, TestOptions};

async fn subscriptions_enabled() -> TestApp {
	TestApp::with_options(TestOptions {
		subscriptions_enabled: true,
		..Default::default()
	})
	.await
}

#[tokio::test]
async fn test_subscriptions_disabled_allow_everything() {
	let app = TestApp::new().await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase::allow(
			"unsubscribed_org_allowed",
			format!("/authz/organizations/{}/subscribed", f.org_id),
			&f.org_member,
		),
		AuthzCase::allow(
			"unsubscribed_team_allowed",
			format!("/authz/teams/{}/subscribed", f.team_id),
			&f.team_member,
		),
		AuthzCase::allow(
			"unsubscribed_project_allowed",
			format!("/authz/projects/{}/subscribed", f.project_id),
			&f.project_member,
		),
		AuthzCase::allow("unsubscribed_user_allowed", "/authz/subscribed".to_string(), &f.org_member),
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_scope_subscriptions() {
	let app = subscriptions_enabled().await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase::deny(
			"unsubscribed_org_denied",
			format!("/authz/organizations/{}/subscribed", f.org_id),
			Some(&f.org_member),
			StatusCode::FORBIDDEN,
			"ORGANIZATION_SUBSCRIPTION_REQUIRED",
		),
		AuthzCase::allow(
			"subscribed_org_allowed",
			format!("/authz/organizations/{}/subscribed", f.paid_org_id),
			&f.paid_member,
		),
		AuthzCase::allow(
			"global_admin_bypasses_org_subscription",
			format!("/authz/organizations/{}/subscribed", f.org_id),
			&f.admin,
		),
		AuthzCase::deny(
			"unsubscribed_team_denied",
			format!("/authz/teams/{}/subscribed", f.team_id),
			Some(&f.team_member),
			StatusCode::FORBIDDEN,
			"TEAM_SUBSCRIPTION_REQUIRED",
		),
		AuthzCase::allow(
			"subscribed_team_allowed",
			format!("/authz/teams/{}/subscribed", f.paid_team_id),
			&f.paid_member,
		),
		AuthzCase::deny(
			"unsubscribed_project_denied",
			format!("/authz/projects/{}/subscribed", f.project_id),
			Some(&f.project_member),
			StatusCode::FORBIDDEN,
			"ORGANIZATION_OR_TEAM_SUBSCRIPTION_REQUIRED",
		),
		AuthzCase::allow(
			"project_subscribed_through_org",
			format!("/authz/projects/{}/subscribed", f.paid_project_id),
			&f.paid_member,
		),
		AuthzCase::deny(
			"membership_checked_before_subscription",
			format!("/authz/teams/{}/subscribed", f.paid_team_id),
			Some(&f.team_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_TEAM_USER",
		),
	];

	run_authz_cases(&app, &cases).await;
}

#[tokio::test]
async fn test_user_subscriptions() {
	let app = subscriptions_enabled().await;
	let f = &app.fixtures;

	let cases = vec![
		AuthzCase::allow("subscribed_user_allowed", "/authz/subscribed".to_string(), &f.paid_member),
		AuthzCase::allow("global_admin_bypasses", "/authz/subscribed".to_string(), &f.admin),
		AuthzCase::deny(
			"unsubscribed_user_denied",
			"/authz/subscribed".to_string(),
			Some(&f.org_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_SUBSCRIBED_USER",
		),
		AuthzCase::allow(
			"subscribed_entity_user_allowed",
			format!("/authz/users/{}/subscribed", f.paid_member.id),
			&f.paid_member,
		),
		AuthzCase::deny(
			"unsubscribed_entity_user_denied",
			format!("/authz/users/{}/subscribed", f.org_member.id),
			Some(&f.org_member),
			StatusCode::FORBIDDEN,
			"REQUIRES_SUBSCRIBED_USER",
		),
		AuthzCase::deny(
			"other_users_subscription_does_not_help",
			format!("/authz/users/{}/subscribed", f.paid_member.id),
			Some(&f.org_member),
			StatusCode::FORBIDDEN,
			"INVALID_USER",
		),
		AuthzCase::allow(
			"global_admin_bypasses_entity_subscription",
			format!("/authz/users/{}/subscribed", f.org_member.id),
			&f.admin,
		),
	];

	run_authz_cases(&app, &cases).await;
}
