// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Error kinds for authorization.
//!
//! Two layers:
//!
//! - [`StoreError`] is what data-layer lookups return. `NotFound` and `Backend`
//!   are different failure classes and must stay distinguishable.
//! - [`AuthzError`] is the outcome of a failed check. Its variant fixes the HTTP
//!   status; its [`ErrorCode`] is the string clients see.

use http::StatusCode;
use std::fmt;

/// Entities a lookup can fail to find.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Entity {
	User,
	ApiKey,
	Session,
	Organization,
	Department,
	Team,
	Project,
}

impl fmt::Display for Entity {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		let name = match self {
			Entity::User => "user",
			Entity::ApiKey => "api key",
			Entity::Session => "session",
			Entity::Organization => "organization",
			Entity::Department => "department",
			Entity::Team => "team",
			Entity::Project => "project",
		};
		f.write_str(name)
	}
}

/// Failure returned by a data-layer lookup.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum StoreError {
	/// No such record. A normal outcome for role lookups.
	#[error("{0} not found")]
	NotFound(Entity),

	/// The backend itself failed (connection, query, decode).
	#[error("backend failure: {0}")]
	Backend(String),
}

impl StoreError {
	pub fn is_not_found(&self) -> bool {
		matches!(self, StoreError::NotFound(_))
	}

	/// Treat a missing record as empty role facts; keep backend failures.
	///
	/// Role lookups report "no membership" either as empty facts or as
	/// `NotFound` depending on the adapter. Both must deny the same way.
	pub fn or_absent<T: Default>(result: Result<T, StoreError>) -> Result<T, StoreError> {
		match result {
			Err(StoreError::NotFound(_)) => Ok(T::default()),
			other => other,
		}
	}
}

/// Failure validating a credential cookie.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CookieError {
	/// The cookie is not on the request. Not a failure for the session cookie.
	#[error("cookie not found")]
	NotFound,

	#[error("invalid cookie: {0}")]
	Invalid(String),
}

/// Client-visible failure codes.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ErrorCode {
	InvalidUser,
	InvalidApiKey,
	InvalidOrganizationId,
	InvalidDepartmentId,
	InvalidTeamId,
	InvalidProjectId,
	InvalidUserId,
	OrganizationNotFound,
	TeamNotFound,
	UserNotFound,
	RequiresOrganizationUser,
	RequiresOrganizationAdmin,
	RequiresDepartmentUser,
	RequiresDepartmentAdmin,
	RequiresTeamUser,
	RequiresTeamAdmin,
	RequiresProjectUser,
	RequiresProjectAdmin,
	RequiresRegisteredUser,
	RequiresVerifiedUser,
	RequiresSubscribedUser,
	OrganizationSubscriptionRequired,
	TeamSubscriptionRequired,
	OrganizationOrTeamSubscriptionRequired,
	InternalError,
}

impl ErrorCode {
	pub fn as_str(&self) -> &'static str {
		match self {
			ErrorCode::InvalidUser => "INVALID_USER",
			ErrorCode::InvalidApiKey => "INVALID_APIKEY",
			ErrorCode::InvalidOrganizationId => "INVALID_ORGANIZATION_ID",
			ErrorCode::InvalidDepartmentId => "INVALID_DEPARTMENT_ID",
			ErrorCode::InvalidTeamId => "INVALID_TEAM_ID",
			ErrorCode::InvalidProjectId => "INVALID_PROJECT_ID",
			ErrorCode::InvalidUserId => "INVALID_USER_ID",
			ErrorCode::OrganizationNotFound => "ORGANIZATION_NOT_FOUND",
			ErrorCode::TeamNotFound => "TEAM_NOT_FOUND",
			ErrorCode::UserNotFound => "USER_NOT_FOUND",
			ErrorCode::RequiresOrganizationUser => "REQUIRES_ORGANIZATION_USER",
			ErrorCode::RequiresOrganizationAdmin => "REQUIRES_ORGANIZATION_ADMIN",
			ErrorCode::RequiresDepartmentUser => "REQUIRES_DEPARTMENT_USER",
			ErrorCode::RequiresDepartmentAdmin => "REQUIRES_DEPARTMENT_ADMIN",
			ErrorCode::RequiresTeamUser => "REQUIRES_TEAM_USER",
			ErrorCode::RequiresTeamAdmin => "REQUIRES_TEAM_ADMIN",
			ErrorCode::RequiresProjectUser => "REQUIRES_PROJECT_USER",
			ErrorCode::RequiresProjectAdmin => "REQUIRES_PROJECT_ADMIN",
			ErrorCode::RequiresRegisteredUser => "REQUIRES_REGISTERED_USER",
			ErrorCode::RequiresVerifiedUser => "REQUIRES_VERIFIED_USER",
			ErrorCode::RequiresSubscribedUser => "REQUIRES_SUBSCRIBED_USER",
			ErrorCode::OrganizationSubscriptionRequired => "ORGANIZATION_SUBSCRIPTION_REQUIRED",
			ErrorCode::TeamSubscriptionRequired => "TEAM_SUBSCRIPTION_REQUIRED",
			ErrorCode::OrganizationOrTeamSubscriptionRequired => {
				"ORGANIZATION_OR_TEAM_SUBSCRIPTION_REQUIRED"
			}
			ErrorCode::InternalError => "INTERNAL_ERROR",
		}
	}
}

impl fmt::Display for ErrorCode {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// A failed authorization check.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum AuthzError {
	/// Malformed scope identifier. 400.
	#[error("invalid request: {0}")]
	Invalid(ErrorCode),

	/// Missing or invalid credentials. 401.
	#[error("unauthenticated: {0}")]
	Unauthenticated(ErrorCode),

	/// The scope entity does not exist. 404.
	#[error("not found: {0}")]
	NotFound(ErrorCode),

	/// The principal lacks the required role, membership or subscription. 403.
	#[error("forbidden: {0}")]
	Forbidden(ErrorCode),

	/// Fetching facts failed for a reason other than a missing record. 500.
	#[error("internal error: {message}")]
	Internal { message: String },
}

impl AuthzError {
	pub fn internal(message: impl Into<String>) -> Self {
		AuthzError::Internal {
			message: message.into(),
		}
	}

	pub fn code(&self) -> ErrorCode {
		match self {
			AuthzError::Invalid(code)
			| AuthzError::Unauthenticated(code)
			| AuthzError::NotFound(code)
			| AuthzError::Forbidden(code) => *code,
			AuthzError::Internal { .. } => ErrorCode::InternalError,
		}
	}

	pub fn status(&self) -> StatusCode {
		match self {
			AuthzError::Invalid(_) => StatusCode::BAD_REQUEST,
			AuthzError::Unauthenticated(_) => StatusCode::UNAUTHORIZED,
			AuthzError::NotFound(_) => StatusCode::NOT_FOUND,
			AuthzError::Forbidden(_) => StatusCode::FORBIDDEN,
			AuthzError::Internal { .. } => StatusCode::INTERNAL_SERVER_ERROR,
		}
	}

	pub fn is_internal(&self) -> bool {
		matches!(self, AuthzError::Internal { .. })
	}

	/// Map a role-fact lookup failure: a missing record denies with `denied`,
	/// a backend failure is a 500.
	pub fn from_role_lookup(err: StoreError, denied: ErrorCode) -> Self {
		match err {
			StoreError::NotFound(_) => AuthzError::Forbidden(denied),
			StoreError::Backend(message) => AuthzError::Internal { message },
		}
	}

	/// Map an existence-check failure. A missing `checked` entity is a 404
	/// with `not_found`; a store reporting some other entity missing denies
	/// with `denied`. A backend failure is a 500.
	pub fn from_existence_lookup(
		err: StoreError,
		checked: Entity,
		not_found: ErrorCode,
		denied: ErrorCode,
	) -> Self {
		match err {
			StoreError::NotFound(entity) if entity == checked => AuthzError::NotFound(not_found),
			StoreError::NotFound(_) => AuthzError::Forbidden(denied),
			StoreError::Backend(message) => AuthzError::Internal { message },
		}
	}
}
