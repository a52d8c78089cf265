// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Subscription status per organization, team, project and user.
//!
//! A subscription is active when its `active` flag is set and it has not yet
//! expired. Status is read fresh on every call.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tally_server_auth::{Entity, OrgId, ProjectId, StoreError, SubscriptionStore, TeamId, UserId};
use uuid::Uuid;

use crate::error::DbError;
use crate::row::{now, timestamp};

#[derive(Clone)]
pub struct SubscriptionRepository {
	pool: SqlitePool,
}

impl SubscriptionRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn create_organization_subscription(
		&self,
		org_id: &OrgId,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		self
			.insert("organization_id", org_id.to_string(), expires_at)
			.await
	}

	#[tracing::instrument(skip(self), fields(team_id = %team_id))]
	pub async fn create_team_subscription(
		&self,
		team_id: &TeamId,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		self.insert("team_id", team_id.to_string(), expires_at).await
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn create_user_subscription(
		&self,
		user_id: &UserId,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		self.insert("user_id", user_id.to_string(), expires_at).await
	}

	async fn insert(
		&self,
		owner_column: &'static str,
		owner_id: String,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		let sql = format!(
			"INSERT INTO subscriptions (id, {owner_column}, active, expires_at, created_at) \
			 VALUES (?, ?, 1, ?, ?)"
		);
		sqlx::query(&sql)
			.bind(Uuid::new_v4().to_string())
			.bind(owner_id)
			.bind(timestamp(expires_at))
			.bind(now())
			.execute(&self.pool)
			.await?;
		Ok(())
	}

	#[tracing::instrument(skip(self), fields(org_id = %org_id))]
	pub async fn is_organization_subscribed(&self, org_id: &OrgId) -> Result<bool, DbError> {
		let row = sqlx::query(
			r#"
			SELECT EXISTS (
				SELECT 1 FROM subscriptions
				WHERE organization_id = ? AND active = 1 AND expires_at > ?
			) AS subscribed
			"#,
		)
		.bind(org_id.to_string())
		.bind(now())
		.fetch_one(&self.pool)
		.await?;
		Ok(row.try_get("subscribed")?)
	}

	#[tracing::instrument(skip(self), fields(team_id = %team_id))]
	pub async fn is_team_subscribed(&self, team_id: &TeamId) -> Result<bool, DbError> {
		let row = sqlx::query(
			r#"
			SELECT EXISTS (
				SELECT 1 FROM subscriptions
				WHERE team_id = ? AND active = 1 AND expires_at > ?
			) AS subscribed
			"#,
		)
		.bind(team_id.to_string())
		.bind(now())
		.fetch_one(&self.pool)
		.await?;
		Ok(row.try_get("subscribed")?)
	}

	/// A project is subscribed through its organization or through its team.
	/// The organization is found directly or through the project's department
	/// or team.
	#[tracing::instrument(skip(self), fields(project_id = %project_id))]
	pub async fn is_project_subscribed(&self, project_id: &ProjectId) -> Result<bool, DbError> {
		let current = now();
		let row = sqlx::query(
			r#"
			SELECT EXISTS (
				SELECT 1 FROM subscriptions s
				WHERE s.active = 1 AND s.expires_at > ?
					AND (
						s.organization_id = COALESCE(
							p.organization_id,
							d.organization_id,
							t.organization_id,
							td.organization_id
						)
						OR s.team_id = p.team_id
					)
			) AS subscribed
			FROM projects p
			LEFT JOIN departments d ON d.id = p.department_id
			LEFT JOIN teams t ON t.id = p.team_id
			LEFT JOIN departments td ON td.id = t.department_id
			WHERE p.id = ?
			"#,
		)
		.bind(&current)
		.bind(project_id.to_string())
		.fetch_optional(&self.pool)
		.await?
		.ok_or(DbError::NotFound(Entity::Project))?;
		Ok(row.try_get("subscribed")?)
	}
}

#[async_trait]
impl SubscriptionStore for SubscriptionRepository {
	async fn organization_subscribed(&self, org_id: &OrgId) -> Result<bool, StoreError> {
		Ok(self.is_organization_subscribed(org_id).await?)
	}

	async fn team_subscribed(&self, team_id: &TeamId) -> Result<bool, StoreError> {
		Ok(self.is_team_subscribed(team_id).await?)
	}

	async fn project_subscribed(&self, project_id: &ProjectId) -> Result<bool, StoreError> {
		Ok(self.is_project_subscribed(project_id).await?)
	}
}
