// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Schema for identity, tenancy, membership and subscription facts.
//!
//! Timestamps are stored as RFC 3339 UTC strings with second precision, so
//! string comparison orders them correctly.

use sqlx::sqlite::SqlitePool;

use crate::error::DbError;

const STATEMENTS: &[&str] = &[
	r#"
	CREATE TABLE IF NOT EXISTS users (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL,
		user_type TEXT NOT NULL CHECK (user_type IN ('ADMIN', 'REGISTERED', 'GUEST')),
		verified INTEGER NOT NULL DEFAULT 0,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS api_keys (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		key_hash TEXT NOT NULL UNIQUE,
		active INTEGER NOT NULL DEFAULT 1,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS sessions (
		id TEXT PRIMARY KEY,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		token_hash TEXT NOT NULL UNIQUE,
		expires_at TEXT NOT NULL,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS organizations (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS organization_users (
		organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		role TEXT NOT NULL DEFAULT 'MEMBER',
		PRIMARY KEY (organization_id, user_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS departments (
		id TEXT PRIMARY KEY,
		organization_id TEXT NOT NULL REFERENCES organizations(id) ON DELETE CASCADE,
		name TEXT NOT NULL,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS department_users (
		department_id TEXT NOT NULL REFERENCES departments(id) ON DELETE CASCADE,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		role TEXT NOT NULL DEFAULT 'MEMBER',
		PRIMARY KEY (department_id, user_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS teams (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL,
		organization_id TEXT REFERENCES organizations(id) ON DELETE CASCADE,
		department_id TEXT REFERENCES departments(id) ON DELETE CASCADE,
		created_at TEXT NOT NULL
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS team_users (
		team_id TEXT NOT NULL REFERENCES teams(id) ON DELETE CASCADE,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		role TEXT NOT NULL DEFAULT 'MEMBER',
		PRIMARY KEY (team_id, user_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS projects (
		id TEXT PRIMARY KEY,
		name TEXT NOT NULL,
		organization_id TEXT REFERENCES organizations(id) ON DELETE CASCADE,
		department_id TEXT REFERENCES departments(id) ON DELETE CASCADE,
		team_id TEXT REFERENCES teams(id) ON DELETE CASCADE,
		created_at TEXT NOT NULL,
		CHECK (organization_id IS NOT NULL OR department_id IS NOT NULL OR team_id IS NOT NULL)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS project_users (
		project_id TEXT NOT NULL REFERENCES projects(id) ON DELETE CASCADE,
		user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
		role TEXT NOT NULL DEFAULT '',
		PRIMARY KEY (project_id, user_id)
	)
	"#,
	r#"
	CREATE TABLE IF NOT EXISTS subscriptions (
		id TEXT PRIMARY KEY,
		user_id TEXT REFERENCES users(id) ON DELETE CASCADE,
		organization_id TEXT REFERENCES organizations(id) ON DELETE CASCADE,
		team_id TEXT REFERENCES teams(id) ON DELETE CASCADE,
		active INTEGER NOT NULL DEFAULT 1,
		expires_at TEXT NOT NULL,
		created_at TEXT NOT NULL
	)
	"#,
	"CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
	"CREATE INDEX IF NOT EXISTS idx_departments_org ON departments(organization_id)",
	"CREATE INDEX IF NOT EXISTS idx_subscriptions_org ON subscriptions(organization_id)",
	"CREATE INDEX IF NOT EXISTS idx_subscriptions_team ON subscriptions(team_id)",
	"CREATE INDEX IF NOT EXISTS idx_subscriptions_user ON subscriptions(user_id)",
];

/// Create all tables. Safe to run on every start.
#[tracing::instrument(skip(pool))]
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), DbError> {
	for statement in STATEMENTS {
		sqlx::query(statement).execute(pool).await?;
	}
	tracing::info!(statements = STATEMENTS.len(), "database schema ready");
	Ok(())
}
