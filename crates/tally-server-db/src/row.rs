// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Column decoding shared by the repositories.

use std::str::FromStr;

use chrono::{DateTime, SecondsFormat, Utc};
use sqlx::sqlite::SqliteRow;
use sqlx::Row;
use tally_server_auth::{Principal, PrincipalType, UserId};

use crate::error::DbError;

/// Storage form for timestamps.
pub(crate) fn timestamp(at: DateTime<Utc>) -> String {
	at.to_rfc3339_opts(SecondsFormat::Secs, true)
}

pub(crate) fn now() -> String {
	timestamp(Utc::now())
}

/// Parse a UUID-backed ID column.
pub(crate) fn parse_id<T: FromStr>(row: &SqliteRow, column: &str) -> Result<T, DbError>
where
	T::Err: std::fmt::Display,
{
	let raw: String = row.try_get(column)?;
	raw
		.parse()
		.map_err(|e| DbError::Internal(format!("invalid {column} '{raw}': {e}")))
}

/// Decode the `id`, `user_type` and `verified` columns of a users row.
pub(crate) fn principal_from_row(row: &SqliteRow) -> Result<Principal, DbError> {
	let id: UserId = parse_id(row, "id")?;
	let raw_type: String = row.try_get("user_type")?;
	let user_type = PrincipalType::from_str(&raw_type).map_err(DbError::Internal)?;
	let verified: bool = row.try_get("verified")?;
	Ok(Principal::new(id, user_type).with_verified(verified))
}
