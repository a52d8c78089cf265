// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use std::collections::HashMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use async_trait::async_trait;
use axum::{
	body::Body,
	http::{header::HeaderName, header::HeaderValue, Request, StatusCode},
	response::Response,
	Router,
};
use chrono::{Duration, Utc};
use tally_server::{create_router, AuthzState, GuardSettings, ServerConfig};
use tally_server_auth::{
	CookieCredentialValidator, DepartmentId, DepartmentRoles, Entity, OrgId, Principal,
	PrincipalStore, PrincipalType, ProjectId, ProjectMembership, ResolverSettings, ScopeRole,
	ScopeRoleStore, StoreError, SubscriptionStore, TeamId, TeamRoleInfo, UserId, UserRecord,
};
use tally_server_db::{
	PrincipalRepository, ScopeParents, ScopeRepository, SubscriptionRepository,
};
use tempfile::TempDir;
use tower::ServiceExt;

pub const API_KEY_HEADER: &str = "x-api-key";

#[derive(Clone, Debug)]
pub enum Credential {
	Session(String),
	Guest(UserId),
	ApiKey(String),
}

#[derive(Clone, Debug)]
pub struct TestUser {
	pub id: UserId,
	pub credential: Credential,
}

impl TestUser {
	pub fn auth_header(&self) -> (HeaderName, HeaderValue) {
		match &self.credential {
			Credential::Session(token) => (
				HeaderName::from_static("cookie"),
				HeaderValue::from_str(&format!("tally_session={token}")).unwrap(),
			),
			Credential::Guest(id) => (
				HeaderName::from_static("cookie"),
				HeaderValue::from_str(&format!("tally_user={id}")).unwrap(),
			),
			Credential::ApiKey(key) => (
				HeaderName::from_static(API_KEY_HEADER),
				HeaderValue::from_str(key).unwrap(),
			),
		}
	}
}

/// Organization → department → team → project, with one user per role.
#[derive(Clone)]
pub struct Fixtures {
	pub org_id: OrgId,
	pub department_id: DepartmentId,
	/// Under `department_id`.
	pub team_id: TeamId,
	/// Directly under `org_id`.
	pub org_team_id: TeamId,
	/// Under `team_id`.
	pub project_id: ProjectId,

	pub paid_org_id: OrgId,
	pub paid_team_id: TeamId,
	pub paid_project_id: ProjectId,

	pub admin: TestUser,
	pub org_admin: TestUser,
	pub org_member: TestUser,
	pub dept_admin: TestUser,
	pub dept_member: TestUser,
	/// Department row with an empty role.
	pub dept_unassigned: TestUser,
	pub team_admin: TestUser,
	pub team_member: TestUser,
	pub project_admin: TestUser,
	pub project_member: TestUser,
	pub outsider: TestUser,
	pub guest: TestUser,
	pub api_user: TestUser,
	pub paid_member: TestUser,
	pub unverified: TestUser,
}

#[derive(Debug, Clone, Copy, Default)]
pub struct TestOptions {
	pub subscriptions_enabled: bool,
	pub require_verified_email: bool,
}

pub struct TestApp {
	pub router: Router,
	pub fixtures: Fixtures,
	_temp_dir: TempDir,
}

impl TestApp {
	pub async fn new() -> Self {
		Self::with_options(TestOptions::default()).await
	}

	pub async fn with_options(options: TestOptions) -> Self {
		let temp_dir = tempfile::tempdir().unwrap();
		let db_path = temp_dir.path().join("test_authz.db");
		let db_url = format!("sqlite:{}", db_path.display());
		let pool = tally_server_db::create_pool(&db_url, 5).await.unwrap();
		tally_server_db::run_migrations(&pool).await.unwrap();

		let mut config = ServerConfig::default();
		config.auth.external_api_enabled = true;
		config.auth.require_verified_email = options.require_verified_email;
		config.subscriptions.enabled = options.subscriptions_enabled;

		let fixtures = create_fixtures(
			&PrincipalRepository::new(pool.clone()),
			&ScopeRepository::new(pool.clone()),
			&SubscriptionRepository::new(pool.clone()),
		)
		.await;

		let router = create_router(AuthzState::from_config(&config, pool));

		Self {
			router,
			fixtures,
			_temp_dir: temp_dir,
		}
	}

	pub async fn get(&self, path: &str, user: Option<&TestUser>) -> Response<Body> {
		send(&self.router, path, user.map(TestUser::auth_header)).await
	}
}

pub async fn send(
	router: &Router,
	path: &str,
	header: Option<(HeaderName, HeaderValue)>,
) -> Response<Body> {
	let mut builder = Request::builder().uri(path);
	if let Some((name, value)) = header {
		builder = builder.header(name, value);
	}
	let request = builder.body(Body::empty()).unwrap();
	router.clone().oneshot(request).await.unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
	let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
		.await
		.unwrap();
	serde_json::from_slice(&bytes).unwrap()
}

pub struct AuthzCase {
	pub name: &'static str,
	pub path: String,
	pub user: Option<TestUser>,
	pub expected_status: StatusCode,
	/// Error code expected in the failure envelope.
	pub expected_error: Option<&'static str>,
}

impl AuthzCase {
	pub fn allow(name: &'static str, path: String, user: &TestUser) -> Self {
		Self {
			name,
			path,
			user: Some(user.clone()),
			expected_status: StatusCode::OK,
			expected_error: None,
		}
	}

	pub fn deny(
		name: &'static str,
		path: String,
		user: Option<&TestUser>,
		status: StatusCode,
		error: &'static str,
	) -> Self {
		Self {
			name,
			path,
			user: user.cloned(),
			expected_status: status,
			expected_error: Some(error),
		}
	}
}

pub async fn run_authz_cases(app: &TestApp, cases: &[AuthzCase]) {
	for case in cases {
		let response = app.get(&case.path, case.user.as_ref()).await;
		let status = response.status();
		let body = body_json(response).await;

		if status != case.expected_status {
			panic!(
				"Case '{}': GET {} - expected {}, got {}\nResponse body: {}",
				case.name, case.path, case.expected_status, status, body
			);
		}

		match case.expected_error {
			Some(code) => {
				assert_eq!(
					body,
					serde_json::json!({"success": false, "error": code}),
					"Case '{}': unexpected failure body",
					case.name
				);
			}
			None => assert_eq!(
				body["success"], true,
				"Case '{}': expected success envelope, got {}",
				case.name, body
			),
		}
	}
}

async fn create_session_user(
	principals: &PrincipalRepository,
	name: &str,
	user_type: PrincipalType,
	verified: bool,
) -> TestUser {
	let id = principals.create_user(name, user_type, verified).await.unwrap();
	let token = format!("session-{}", UserId::generate());
	principals
		.create_session(&id, &token, Utc::now() + Duration::hours(1))
		.await
		.unwrap();
	TestUser {
		id,
		credential: Credential::Session(token),
	}
}

async fn create_fixtures(
	principals: &PrincipalRepository,
	scopes: &ScopeRepository,
	subscriptions: &SubscriptionRepository,
) -> Fixtures {
	let org_id = scopes.create_organization("Acme").await.unwrap();
	let department_id = scopes.create_department(&org_id, "Engineering").await.unwrap();
	let team_id = scopes
		.create_team("Platform", ScopeParents::department(department_id))
		.await
		.unwrap();
	let org_team_id = scopes
		.create_team("Leadership", ScopeParents::organization(org_id))
		.await
		.unwrap();
	let project_id = scopes
		.create_project("Gateway", ScopeParents::team(team_id))
		.await
		.unwrap();

	let paid_org_id = scopes.create_organization("Paid Co").await.unwrap();
	let paid_team_id = scopes
		.create_team("Paid Team", ScopeParents::organization(paid_org_id))
		.await
		.unwrap();
	let paid_project_id = scopes
		.create_project("Paid Project", ScopeParents::organization(paid_org_id))
		.await
		.unwrap();
	let expires = Utc::now() + Duration::days(30);
	subscriptions
		.create_organization_subscription(&paid_org_id, expires)
		.await
		.unwrap();
	subscriptions
		.create_team_subscription(&paid_team_id, expires)
		.await
		.unwrap();

	let reg = PrincipalType::Registered;
	let admin = create_session_user(principals, "Admin", PrincipalType::Admin, true).await;
	let org_admin = create_session_user(principals, "Org Admin", reg, true).await;
	let org_member = create_session_user(principals, "Org Member", reg, true).await;
	let dept_admin = create_session_user(principals, "Dept Admin", reg, true).await;
	let dept_member = create_session_user(principals, "Dept Member", reg, true).await;
	let dept_unassigned = create_session_user(principals, "Dept Unassigned", reg, true).await;
	let team_admin = create_session_user(principals, "Team Admin", reg, true).await;
	let team_member = create_session_user(principals, "Team Member", reg, true).await;
	let project_admin = create_session_user(principals, "Project Admin", reg, true).await;
	let project_member = create_session_user(principals, "Project Member", reg, true).await;
	let outsider = create_session_user(principals, "Outsider", reg, true).await;
	let paid_member = create_session_user(principals, "Paid Member", reg, true).await;
	let unverified = create_session_user(principals, "Unverified", reg, false).await;

	let guest_id = principals
		.create_user("Guest", PrincipalType::Guest, false)
		.await
		.unwrap();
	let guest = TestUser {
		id: guest_id,
		credential: Credential::Guest(guest_id),
	};

	let api_user_id = principals.create_user("Api User", reg, true).await.unwrap();
	let api_key = format!("key-{}", UserId::generate());
	principals.create_api_key(&api_user_id, &api_key).await.unwrap();
	let api_user = TestUser {
		id: api_user_id,
		credential: Credential::ApiKey(api_key),
	};

	let admin_role = ScopeRole::ADMIN;
	let member_role = ScopeRole::MEMBER;

	scopes.add_organization_user(&org_id, &org_admin.id, admin_role).await.unwrap();
	scopes.add_organization_user(&org_id, &org_member.id, member_role).await.unwrap();
	scopes.add_organization_user(&org_id, &api_user.id, member_role).await.unwrap();
	scopes.add_organization_user(&org_id, &guest.id, member_role).await.unwrap();
	scopes.add_department_user(&department_id, &dept_admin.id, admin_role).await.unwrap();
	scopes.add_department_user(&department_id, &dept_member.id, member_role).await.unwrap();
	scopes.add_department_user(&department_id, &dept_unassigned.id, "").await.unwrap();
	scopes.add_team_user(&team_id, &team_admin.id, admin_role).await.unwrap();
	scopes.add_team_user(&team_id, &team_member.id, member_role).await.unwrap();
	scopes.add_project_user(&project_id, &project_admin.id, admin_role).await.unwrap();
	scopes.add_project_user(&project_id, &project_member.id, "").await.unwrap();

	scopes.add_organization_user(&paid_org_id, &paid_member.id, member_role).await.unwrap();
	scopes.add_team_user(&paid_team_id, &paid_member.id, member_role).await.unwrap();
	scopes.add_project_user(&paid_project_id, &paid_member.id, member_role).await.unwrap();
	subscriptions
		.create_user_subscription(&paid_member.id, expires)
		.await
		.unwrap();

	Fixtures {
		org_id,
		department_id,
		team_id,
		org_team_id,
		project_id,
		paid_org_id,
		paid_team_id,
		paid_project_id,
		admin,
		org_admin,
		org_member,
		dept_admin,
		dept_member,
		dept_unassigned,
		team_admin,
		team_member,
		project_admin,
		project_member,
		outsider,
		guest,
		api_user,
		paid_member,
		unverified,
	}
}

// =============================================================================
// Stub stores
// =============================================================================

pub const STUB_SESSION: &str = "stub-session";

/// Resolves [`STUB_SESSION`] to a fixed principal.
pub struct StubPrincipals {
	pub principal: Principal,
	pub users: HashMap<UserId, UserRecord>,
}

#[async_trait]
impl PrincipalStore for StubPrincipals {
	async fn principal_by_api_key(&self, _api_key: &str) -> Result<Principal, StoreError> {
		Err(StoreError::NotFound(Entity::ApiKey))
	}

	async fn principal_by_session(&self, session_token: &str) -> Result<Principal, StoreError> {
		if session_token == STUB_SESSION {
			Ok(self.principal.clone())
		} else {
			Err(StoreError::NotFound(Entity::Session))
		}
	}

	async fn guest_principal(&self, _user_id: &UserId) -> Result<Principal, StoreError> {
		Err(StoreError::NotFound(Entity::User))
	}

	async fn user_by_id(&self, user_id: &UserId) -> Result<UserRecord, StoreError> {
		self
			.users
			.get(user_id)
			.cloned()
			.ok_or(StoreError::NotFound(Entity::User))
	}
}

/// Fixed role facts for every scope, counting lookups.
#[derive(Debug)]
pub struct StubScopes {
	pub organization_exists: Result<bool, StoreError>,
	pub organization_role: Result<Option<ScopeRole>, StoreError>,
	pub department_roles: Result<DepartmentRoles, StoreError>,
	pub team_role_info: Result<TeamRoleInfo, StoreError>,
	pub project_membership: Result<ProjectMembership, StoreError>,
	pub lookups: AtomicUsize,
}

impl Default for StubScopes {
	fn default() -> Self {
		Self {
			organization_exists: Ok(true),
			organization_role: Ok(None),
			department_roles: Ok(DepartmentRoles::default()),
			team_role_info: Ok(TeamRoleInfo::default()),
			project_membership: Ok(ProjectMembership::default()),
			lookups: AtomicUsize::new(0),
		}
	}
}

impl StubScopes {
	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}

	fn record<T: Clone>(&self, value: &Result<T, StoreError>) -> Result<T, StoreError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		value.clone()
	}
}

#[async_trait]
impl ScopeRoleStore for StubScopes {
	async fn organization_exists(&self, _org_id: &OrgId) -> Result<bool, StoreError> {
		self.record(&self.organization_exists)
	}

	async fn organization_role(
		&self,
		_user_id: &UserId,
		_org_id: &OrgId,
	) -> Result<Option<ScopeRole>, StoreError> {
		self.record(&self.organization_role)
	}

	async fn department_roles(
		&self,
		_user_id: &UserId,
		_org_id: &OrgId,
		_department_id: &DepartmentId,
	) -> Result<DepartmentRoles, StoreError> {
		self.record(&self.department_roles)
	}

	async fn team_role_info(
		&self,
		_user_id: &UserId,
		_team_id: &TeamId,
	) -> Result<TeamRoleInfo, StoreError> {
		self.record(&self.team_role_info)
	}

	async fn project_membership(
		&self,
		_user_id: &UserId,
		_project_id: &ProjectId,
	) -> Result<ProjectMembership, StoreError> {
		self.record(&self.project_membership)
	}
}

/// One subscription status for every scope, counting lookups.
pub struct StubSubscriptions {
	pub status: Result<bool, StoreError>,
	pub lookups: AtomicUsize,
}

impl StubSubscriptions {
	pub fn new(status: Result<bool, StoreError>) -> Self {
		Self {
			status,
			lookups: AtomicUsize::new(0),
		}
	}

	pub fn lookups(&self) -> usize {
		self.lookups.load(Ordering::SeqCst)
	}

	fn record(&self) -> Result<bool, StoreError> {
		self.lookups.fetch_add(1, Ordering::SeqCst);
		self.status.clone()
	}
}

#[async_trait]
impl SubscriptionStore for StubSubscriptions {
	async fn organization_subscribed(&self, _org_id: &OrgId) -> Result<bool, StoreError> {
		self.record()
	}

	async fn team_subscribed(&self, _team_id: &TeamId) -> Result<bool, StoreError> {
		self.record()
	}

	async fn project_subscribed(&self, _project_id: &ProjectId) -> Result<bool, StoreError> {
		self.record()
	}
}

/// Router over stub stores; every request is made as the stub principal.
pub struct StubApp {
	pub router: Router,
	pub state: AuthzState,
	pub scopes: Arc<StubScopes>,
	pub subscriptions: Arc<StubSubscriptions>,
}

impl StubApp {
	pub fn new(
		principals: StubPrincipals,
		scopes: StubScopes,
		subscriptions: StubSubscriptions,
		settings: GuardSettings,
	) -> Self {
		let scopes = Arc::new(scopes);
		let subscriptions = Arc::new(subscriptions);
		let state = AuthzState::new(
			ResolverSettings::default(),
			Arc::new(CookieCredentialValidator::default()),
			Arc::new(principals),
			scopes.clone(),
			subscriptions.clone(),
			settings,
		);
		Self {
			router: create_router(state.clone()),
			state,
			scopes,
			subscriptions,
		}
	}

	/// Stub app for a principal with no other users on record.
	pub fn for_principal(principal: Principal, scopes: StubScopes, settings: GuardSettings) -> Self {
		Self::new(
			StubPrincipals {
				principal,
				users: HashMap::new(),
			},
			scopes,
			StubSubscriptions::new(Ok(false)),
			settings,
		)
	}

	pub async fn get(&self, path: &str) -> Response<Body> {
		send(&self.router, path, Some(stub_session_header())).await
	}
}

pub fn stub_session_header() -> (HeaderName, HeaderValue) {
	(
		HeaderName::from_static("cookie"),
		HeaderValue::from_str(&format!("tally_session={STUB_SESSION}")).unwrap(),
	)
}
