// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Users, API keys and sessions.
//!
//! Credentials are stored as SHA-256 hashes only. Lookups hash the presented
//! value and match on the hash.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sha2::{Digest, Sha256};
use sqlx::sqlite::SqlitePool;
use sqlx::Row;
use tally_server_auth::{
	Entity, Principal, PrincipalStore, PrincipalType, StoreError, UserId, UserRecord,
};
use uuid::Uuid;

use crate::error::DbError;
use crate::row::{now, principal_from_row, timestamp};

/// Hex-encoded SHA-256 of a credential.
pub fn hash_token(token: &str) -> String {
	let mut hasher = Sha256::new();
	hasher.update(token.as_bytes());
	hex::encode(hasher.finalize())
}

/// Repository for principals and their credentials.
#[derive(Clone)]
pub struct PrincipalRepository {
	pool: SqlitePool,
}

impl PrincipalRepository {
	pub fn new(pool: SqlitePool) -> Self {
		Self { pool }
	}

	#[tracing::instrument(skip(self, name), fields(user_type = %user_type))]
	pub async fn create_user(
		&self,
		name: &str,
		user_type: PrincipalType,
		verified: bool,
	) -> Result<UserId, DbError> {
		let id = UserId::generate();
		sqlx::query(
			r#"
			INSERT INTO users (id, name, user_type, verified, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(id.to_string())
		.bind(name)
		.bind(user_type.as_str())
		.bind(verified)
		.bind(now())
		.execute(&self.pool)
		.await?;

		tracing::debug!(user_id = %id, "user created");
		Ok(id)
	}

	/// Store an API key for a user. Only the hash is persisted.
	#[tracing::instrument(skip(self, raw_key), fields(user_id = %user_id))]
	pub async fn create_api_key(&self, user_id: &UserId, raw_key: &str) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO api_keys (id, user_id, key_hash, active, created_at)
			VALUES (?, ?, ?, 1, ?)
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(user_id.to_string())
		.bind(hash_token(raw_key))
		.bind(now())
		.execute(&self.pool)
		.await?;
		Ok(())
	}

	/// Deactivate an API key. Returns false if no active key matched.
	#[tracing::instrument(skip(self, raw_key))]
	pub async fn revoke_api_key(&self, raw_key: &str) -> Result<bool, DbError> {
		let result = sqlx::query("UPDATE api_keys SET active = 0 WHERE key_hash = ? AND active = 1")
			.bind(hash_token(raw_key))
			.execute(&self.pool)
			.await?;
		Ok(result.rows_affected() > 0)
	}

	#[tracing::instrument(skip(self, raw_token), fields(user_id = %user_id))]
	pub async fn create_session(
		&self,
		user_id: &UserId,
		raw_token: &str,
		expires_at: DateTime<Utc>,
	) -> Result<(), DbError> {
		sqlx::query(
			r#"
			INSERT INTO sessions (id, user_id, token_hash, expires_at, created_at)
			VALUES (?, ?, ?, ?, ?)
			"#,
		)
		.bind(Uuid::new_v4().to_string())
		.bind(user_id.to_string())
		.bind(hash_token(raw_token))
		.bind(timestamp(expires_at))
		.bind(now())
		.execute(&self.pool)
		.await?;
		Ok(())
	}

	#[tracing::instrument(skip(self, raw_key))]
	pub async fn get_principal_by_api_key(&self, raw_key: &str) -> Result<Principal, DbError> {
		let row = sqlx::query(
			r#"
			SELECT u.id, u.user_type, u.verified
			FROM api_keys k
			JOIN users u ON u.id = k.user_id
			WHERE k.key_hash = ? AND k.active = 1
			"#,
		)
		.bind(hash_token(raw_key))
		.fetch_optional(&self.pool)
		.await?
		.ok_or(DbError::NotFound(Entity::ApiKey))?;

		principal_from_row(&row)
	}

	/// Principal behind an unexpired session. Guests never hold sessions.
	#[tracing::instrument(skip(self, raw_token))]
	pub async fn get_principal_by_session(&self, raw_token: &str) -> Result<Principal, DbError> {
		let row = sqlx::query(
			r#"
			SELECT u.id, u.user_type, u.verified
			FROM sessions s
			JOIN users u ON u.id = s.user_id
			WHERE s.token_hash = ? AND s.expires_at > ? AND u.user_type != 'GUEST'
			"#,
		)
		.bind(hash_token(raw_token))
		.bind(now())
		.fetch_optional(&self.pool)
		.await?
		.ok_or(DbError::NotFound(Entity::Session))?;

		principal_from_row(&row)
	}

	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn get_guest_principal(&self, user_id: &UserId) -> Result<Principal, DbError> {
		let row = sqlx::query(
			r#"
			SELECT id, user_type, verified
			FROM users
			WHERE id = ? AND user_type = 'GUEST'
			"#,
		)
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?
		.ok_or(DbError::NotFound(Entity::User))?;

		principal_from_row(&row)
	}

	/// A user plus whether they hold an active personal subscription.
	#[tracing::instrument(skip(self), fields(user_id = %user_id))]
	pub async fn get_user_by_id(&self, user_id: &UserId) -> Result<UserRecord, DbError> {
		let row = sqlx::query(
			r#"
			SELECT u.id, u.user_type, u.verified,
				EXISTS (
					SELECT 1 FROM subscriptions s
					WHERE s.user_id = u.id AND s.active = 1 AND s.expires_at > ?
				) AS subscribed
			FROM users u
			WHERE u.id = ?
			"#,
		)
		.bind(now())
		.bind(user_id.to_string())
		.fetch_optional(&self.pool)
		.await?
		.ok_or(DbError::NotFound(Entity::User))?;

		let principal = principal_from_row(&row)?;
		let subscribed: bool = row.try_get("subscribed")?;
		Ok(UserRecord {
			id: principal.id,
			user_type: principal.user_type,
			verified: principal.verified,
			subscribed,
		})
	}
}

#[async_trait]
impl PrincipalStore for PrincipalRepository {
	async fn principal_by_api_key(&self, api_key: &str) -> Result<Principal, StoreError> {
		Ok(self.get_principal_by_api_key(api_key).await?)
	}

	async fn principal_by_session(&self, session_token: &str) -> Result<Principal, StoreError> {
		Ok(self.get_principal_by_session(session_token).await?)
	}

	async fn guest_principal(&self, user_id: &UserId) -> Result<Principal, StoreError> {
		Ok(self.get_guest_principal(user_id).await?)
	}

	async fn user_by_id(&self, user_id: &UserId) -> Result<UserRecord, StoreError> {
		Ok(self.get_user_by_id(user_id).await?)
	}
}
