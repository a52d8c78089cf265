// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tenancy entities and per-scope membership roles.
//!
//! Membership rows store the role string. A row with any role means the user is
//! a member of that scope; `ADMIN` is the only elevated value. Department and
//! project rows are the exception: an empty role there is no role.

use async_trait::async_trait;
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tally_server_auth::{
	AssociationLevel, DepartmentId, DepartmentRoles, Entity, OrgId, ProjectId, ProjectMembership,
	ScopeRole, ScopeRoleStore, StoreError, TeamId, TeamRoleInfo, UserId,
};

use crate::error::DbError;
use crate::row::now;

/// Where a team or project hangs in the hierarchy. At least one parent is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ScopeParents {
	pub organization_id: Option<OrgId>,
	pub department_id: Option<DepartmentId>,
	pub team_id: Option<TeamId>,
}

impl ScopeParents {
	pub fn organization(org_id: OrgId) -> Self {
		Self {
			organization_id: Some(org_id),
			..Default::default()
		}
	}

	pub fn department(department_id: DepartmentId) -> Self {
		Self {
			department_id: Some(department_id),
			..Default::default()
		}
	}

	pub fn team(team_id: TeamId) -> Self {
		Self {
			team_id: Some(team_id),
			..Default::default()
		}
	}

	fn is_orphan(&self) -> bool {
		self.organization_id.is_none() && self.department_id.is_none() && self.team_id.is_none()
	}
}

fn role_column(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<Option<ScopeRole>, DbError> {
	let role: Option<String> = row.try_get(column)?;
	Ok(role.as_deref().map(ScopeRole::from_membership))
}

/// Like [`role_column`], but an empty role string reads as no role.
fn fact_column(row: &sqlx::sqlite::SqliteRow, column: &str) -> Result<Option<ScopeRole>, DbError> {
	let role: Option<String> = row.try_get(column)?;
	Ok(role.as_deref().and_then(ScopeRole::parse_fact))
}

/// Repository for organizations, departments, teams, projects and memberships.
#[derive(Clone)]
pub struct ScopeRepository {
	pool: SqlitePool,
}

impl ScopeRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	// =========================================================================
	// Entities
	// =========================================================================

	#[tracing::instrument(skip(self, name))]
	pub async fn create_organization(&self, name: &str) -> Result<OrgId, DbError> {
		let id = OrgId::generate();
		sqlx::query("INSERT INTO organizations (id, name, created_at) VALUES (?, ?, ?)")
			.bind(id.to_string())
			.bind(name)
			.bind(now())
			.execute(&self.pool)
			.await?;
		tracing::debug!(org_id = %id, "organization created");
		Ok(id)
	}

	#[tracing::instrument(skip(self, name), fields(org_id = %org_id))]
	pub async fn create_department(
		&self,
		org_id: &OrgId,
		name: &str,
	) -> Result<DepartmentId, DbError> {
		let id = DepartmentId::generate();
		sqlx::query(
			"INSERT INTO departments (id, organization_id, name, created_at) VALUES (?, ?, ?, ?)",
		)
		.bind(id.to_string())
		.bind(org_id.to_string())
		.bind(name)
		.bind(now())
		.execute(&self.pool)
		.await?;
		Ok(id)
	}

	/// Create a team under an organization or a department.
	#[tracing::instrument(skip(self, name, parents))]
	pub async fn create_team(&self, name: &str, parents: ScopeParents) -> Result<TeamId, DbError> {
		if parents.organization_id.is_none() && parents.department_id.is_none() {
			return Err(DbError::Internal(
				"a team needs an organization or department".to_string(),
			));
		}
		let id = TeamId::generate();
		sqlx::query(
			r#"
			INSERT INTO teams (id, name, organization_id, department_id, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(name)
		.bind(parents.organization_id.map(|v| v.to_string()))
		.bind(parents.department_id.map(|v| v.to_string()))
		.bind(now())
		.execute(&self.pool)
		.await?;
		Ok(id)
	}

	#[tracing::instrument(skip(self, name, parents))]
	pub async fn create_project(
		&self,
		name: &str,
		parents: ScopeParents,
	) -> Result<ProjectId, DbError> {
		if parents.is_orphan() {
			return Err(DbError::Internal("a project needs a parent".to_string()));
		}
		let id = ProjectId::generate();
		sqlx::query(
			r#"
			INSERT INTO projects (id, name, organization_id, department_id, team_id, created_at)
			VALUES (?, ?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(name)
		.bind(parents.organization_id.map(|v| v.to_string()))
		.bind(parents.department_id.map(|v| v.to_string()))
		.bind(parents.team_id.map(|v| v.to_string()))
		.bind(now())
		.execute(&self.pool)
		.await?;
		Ok(id)
	}

	// =========================================================================
	// Memberships
	// =========================================================================

	#[tracing::instrument(skip(self), fields(org_id = %org_id, user_id = %user_id))]
	pub async fn add_organization_user(
		&self,
		org_id: &OrgId,
		user_id: &UserId,
		role: &str,
	) -> Result<(), DbError> {
		self
			.upsert_membership("organization_users", "organization_id", &org_id.to_string(), user_id, role)
			.await
	}

	#[tracing::instrument(skip(self), fields(department_id = %department_id, user_id = %user_id))]
	pub async fn add_department_user(
		&self,
		department_id: &DepartmentId,
		user_id: &UserId,
		role: &str,
	) -> Result<(), DbError> {
		self
			.upsert_membership(
				"department_users",
				"department_id",
				&department_id.to_string(),
				user_id,
				role,
			)
			.await
	}

	#[tracing::instrument(skip(self), fields(team_id = %team_id, user_id = %user_id))]
	pub async fn add_team_user(
		&self,
		team_id: &TeamId,
		user_id: &UserId,
		role: &str,
	) -> Result<(), DbError> {
		self
			.upsert_membership("team_users", "team_id", &team_id.to_string(), user_id, role)
			.await
	}

	#[tracing::instrument(skip(self), fields(project_id = %project_id, user_id = %user_id))]
	pub async fn add_project_user(
		&self,
		project_id: &ProjectId,
		user_id: &UserId,
		role: &str,
	) -> Result<(), DbError> {
		self
			.upsert_membership("project_users", "project_id", &project_id.to_string(), user_id, role)
			.await
	}

	/// `table` and `scope_column` are fixed identifiers from this module, never
	/// caller input.
	async fn upsert_membership(
		&self,
		table: &'static str,
		scope_column: &'static str,
		scope_id: &str,
		user_id: &UserId,
		role: &str,
	) -> Result<(), DbError> {
		let sql = format!(
			"INSERT INTO {table} ({scope_column}, user_id, role) VALUES (?, ?, ?) \
			 ON CONFLICT ({scope_column}, user_id) DO UPDATE SET role = excluded.role"
		);
		sqlx::query(&sql)
			.bind(scope_id)
			.bind(user_id.to_string())
			.bind(role)
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	// =========================================================================
	// Lookups
	// =========================================================================

	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn organization_exists_by_id(&self, org_id: &OrgId) -> Result<bool, DbError> {
		let row = sqlx::query("SELECT 1 FROM organizations WHERE id = ?")
			.bind(org_id.to_string())
			.fetch_optional(&self.pool)
			.await?;
		Ok(row.is_some())
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id, org_id = %org_id))]
	pub async fn get_organization_role(
		&self,
		user_id: &UserId,
		org_id: &OrgId,
	) -> Result<Option<ScopeRole>, DbError> {
		let row = sqlx::query(
			"SELECT role FROM organization_users WHERE organization_id = ? AND user_id = ?",
		)
		.bind(org_id.to_string())
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?;

		row.map(|r| role_column(&r, "role")).transpose().map(Option::flatten)
	}

	/// Organization and department roles in one query. The department must
	/// belong to the organization; otherwise its role is absent. An empty
	/// department role is no role.
	#[tracing::instrument(
		skip(self),
		fields(user_id = %user_id, org_id = %org_id, department_id = %department_id)
	)]
	pub async fn get_department_roles(
		&self,
		user_id: &UserId,
		org_id: &OrgId,
		department_id: &DepartmentId,
	) -> Result<DepartmentRoles, DbError> {
		let row = sqlx::query(
			r#"
			SELECT
				(SELECT ou.role FROM organization_users ou
					WHERE ou.organization_id = ? AND ou.user_id = ?) AS organization_role,
				(SELECT du.role FROM department_users du
					JOIN departments d ON d.id = du.department_id
					WHERE du.department_id = ? AND d.organization_id = ? AND du.user_id = ?)
					AS department_role
			"#,
		)
		.bind(org_id.to_string())
		.bind(user_id.to_string())
		.bind(department_id.to_string())
		.bind(org_id.to_string())
		.bind(user_id.to_string())
		.fetch_one(&self.pool)
		.await?;

		Ok(DepartmentRoles {
			organization_role: role_column(&row, "organization_role")?,
			department_role: fact_column(&row, "department_role")?,
		})
	}

	/// Team role plus the roles at the team's department and organization.
	///
	/// A team under a department takes its organization from the department.
	/// The association level is the most specific scope with a membership row.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, team_id = %team_id))]
	pub async fn get_team_role_info(
		&self,
		user_id: &UserId,
		team_id: &TeamId,
	) -> Result<TeamRoleInfo, DbError> {
		let user = user_id.to_string();
		let row = sqlx::query(
			r#"
			SELECT
				tu.role AS team_role,
				du.role AS department_role,
				ou.role AS organization_role
			FROM teams t
			LEFT JOIN departments d ON d.id = t.department_id
			LEFT JOIN team_users tu ON tu.team_id = t.id AND tu.user_id = ?
			LEFT JOIN department_users du ON du.department_id = t.department_id AND du.user_id = ?
			LEFT JOIN organization_users ou
				ON ou.organization_id = COALESCE(t.organization_id, d.organization_id)
				AND ou.user_id = ?
			WHERE t.id = ?
			"#,
		)
		.bind(&user)
		.bind(&user)
		.bind(&user)
		.bind(team_id.to_string())
		.fetch_optional(&self.pool)
		.await?
		.ok_or(DbError::NotFound(Entity::Team))?;

		let team_role = role_column(&row, "team_role")?;
		let department_role = role_column(&row, "department_role")?;
		let organization_role = role_column(&row, "organization_role")?;

		let association_level = if team_role.is_some() {
			AssociationLevel::Team
		} else if department_role.is_some() {
			AssociationLevel::Department
		} else if organization_role.is_some() {
			AssociationLevel::Organization
		} else {
			AssociationLevel::None
		};

		Ok(TeamRoleInfo {
			association_level,
			team_role,
			department_role,
			organization_role,
		})
	}

	/// Direct project membership. An empty role string is a member without a role.
	#[tracing::instrument(skip(self), fields(user_id = %user_id, project_id = %project_id))]
	pub async fn get_project_membership(
		&self,
		user_id: &UserId,
		project_id: &ProjectId,
	) -> Result<ProjectMembership, DbError> {
		let row = sqlx::query("SELECT role FROM project_users WHERE project_id = ? AND user_id = ?")
			.bind(project_id.to_string())
			.bind(user_id.to_string())
			.fetch_optional(&self.pool)
			.await?;

		match row {
			Some(row) => {
				let role: String = row.try_get("role")?;
				Ok(ProjectMembership {
					is_member: true,
					role: ScopeRole::parse_fact(&role),
				})
			}
			None => Ok(ProjectMembership::default()),
		}
	}
}

#[async_trait]
impl ScopeRoleStore for ScopeRepository {
	async fn organization_exists(&self, org_id: &OrgId) -> Result<bool, StoreError> {
		Ok(self.organization_exists_by_id(org_id).await?)
	}

	async fn organization_role(
		&self,
		user_id: &UserId,
		org_id: &OrgId,
	) -> Result<Option<ScopeRole>, StoreError> {
		Ok(self.get_organization_role(user_id, org_id).await?)
	}

	async fn department_roles(
		&self,
		user_id: &UserId,
		org_id: &OrgId,
		department_id: &DepartmentId,
	) -> Result<DepartmentRoles, StoreError> {
		Ok(self.get_department_roles(user_id, org_id, department_id).await?)
	}

	async fn team_role_info(
		&self,
		user_id: &UserId,
		team_id: &TeamId,
	) -> Result<TeamRoleInfo, StoreError> {
		Ok(self.get_team_role_info(user_id, team_id).await?)
	}

	async fn project_membership(
		&self,
		user_id: &UserId,
		project_id: &ProjectId,
	) -> Result<ProjectMembership, StoreError> {
		Ok(self.get_project_membership(user_id, project_id).await?)
	}
}
