// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Core type definitions for principals and scope role facts.
//!
//! - **ID newtypes**: UUID wrappers per entity ([`UserId`], [`OrgId`], [`DepartmentId`],
//!   [`TeamId`], [`ProjectId`]) so scope identifiers cannot be mixed up
//! - **Principals**: the authenticated caller ([`Principal`], [`PrincipalType`])
//! - **Role facts**: what the data layer reports per scope ([`ScopeRole`],
//!   [`DepartmentRoles`], [`TeamRoleInfo`], [`ProjectMembership`])
//! - **Effective role**: the ordered lattice every scope is reduced to ([`EffectiveRole`])

use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;
use uuid::Uuid;

// =============================================================================
// ID Newtypes
// =============================================================================

macro_rules! define_id_type {
	($name:ident, $doc:expr) => {
		#[doc = $doc]
		#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
		#[serde(transparent)]
		pub struct $name(Uuid);

		impl $name {
			/// Create a new ID from a UUID.
			pub fn new(id: Uuid) -> Self {
				Self(id)
			}

			/// Generate a new random ID.
			pub fn generate() -> Self {
				Self(Uuid::new_v4())
			}

			/// Get the inner UUID value.
			pub fn into_inner(self) -> Uuid {
				self.0
			}

			/// Get a reference to the inner UUID.
			pub fn as_uuid(&self) -> &Uuid {
				&self.0
			}
		}

		impl fmt::Display for $name {
			fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
				write!(f, "{}", self.0)
			}
		}

		impl FromStr for $name {
			type Err = uuid::Error;

			fn from_str(s: &str) -> Result<Self, Self::Err> {
				Uuid::parse_str(s).map(Self)
			}
		}

		impl From<Uuid> for $name {
			fn from(id: Uuid) -> Self {
				Self(id)
			}
		}

		impl From<$name> for Uuid {
			fn from(id: $name) -> Self {
				id.0
			}
		}
	};
}

define_id_type!(UserId, "Unique identifier for a user (registered, guest or admin).");
define_id_type!(OrgId, "Unique identifier for an organization.");
define_id_type!(DepartmentId, "Unique identifier for a department.");
define_id_type!(TeamId, "Unique identifier for a team.");
define_id_type!(ProjectId, "Unique identifier for a project.");

// =============================================================================
// Principals
// =============================================================================

/// The kind of caller behind a request.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum PrincipalType {
	/// Global administrator; bypasses every scope check.
	Admin,
	/// A user with an account.
	Registered,
	/// An anonymous user identified only by a guest cookie.
	Guest,
}

impl PrincipalType {
	pub fn as_str(&self) -> &'static str {
		match self {
			PrincipalType::Admin => "ADMIN",
			PrincipalType::Registered => "REGISTERED",
			PrincipalType::Guest => "GUEST",
		}
	}
}

impl fmt::Display for PrincipalType {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

impl FromStr for PrincipalType {
	type Err = String;

	fn from_str(s: &str) -> Result<Self, Self::Err> {
		match s {
			"ADMIN" => Ok(PrincipalType::Admin),
			"REGISTERED" => Ok(PrincipalType::Registered),
			"GUEST" => Ok(PrincipalType::Guest),
			other => Err(format!("unknown principal type '{other}'")),
		}
	}
}

/// The authenticated caller. Read-only for the lifetime of a request.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Principal {
	pub id: UserId,
	#[serde(rename = "type")]
	pub user_type: PrincipalType,
	pub verified: bool,
}

impl Principal {
	pub fn new(id: UserId, user_type: PrincipalType) -> Self {
		Self {
			id,
			user_type,
			verified: false,
		}
	}

	/// Builder: set the verified flag.
	pub fn with_verified(mut self, verified: bool) -> Self {
		self.verified = verified;
		self
	}

	pub fn is_admin(&self) -> bool {
		self.user_type == PrincipalType::Admin
	}

	pub fn is_guest(&self) -> bool {
		self.user_type == PrincipalType::Guest
	}
}

/// A user as stored by the identity subsystem, fetched by ID.
///
/// Used by checks that inspect the *target* user of a `{userId}` route rather
/// than the caller.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct UserRecord {
	pub id: UserId,
	pub user_type: PrincipalType,
	pub verified: bool,
	pub subscribed: bool,
}

impl UserRecord {
	pub fn principal(&self) -> Principal {
		Principal::new(self.id, self.user_type).with_verified(self.verified)
	}
}

// =============================================================================
// Role Facts
// =============================================================================

/// A role held at a single scope.
///
/// The data layer stores roles as strings. `"ADMIN"` is the only role with
/// elevated meaning; any other non-empty value is an ordinary member.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum ScopeRole {
	Member,
	Admin,
}

impl ScopeRole {
	pub const ADMIN: &'static str = "ADMIN";
	pub const MEMBER: &'static str = "MEMBER";

	/// Role of an existing membership record. The record exists, so the
	/// principal is at least a member whatever the stored string says.
	pub fn from_membership(role: &str) -> Self {
		if role == Self::ADMIN {
			ScopeRole::Admin
		} else {
			ScopeRole::Member
		}
	}

	/// Role from a column where the empty string means "no role here".
	pub fn parse_fact(role: &str) -> Option<Self> {
		match role {
			"" => None,
			other => Some(Self::from_membership(other)),
		}
	}

	pub fn as_str(&self) -> &'static str {
		match self {
			ScopeRole::Member => Self::MEMBER,
			ScopeRole::Admin => Self::ADMIN,
		}
	}

	pub fn is_admin(&self) -> bool {
		*self == ScopeRole::Admin
	}
}

impl fmt::Display for ScopeRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// True if the optional role fact is present and `ADMIN`.
pub(crate) fn is_admin_fact(role: Option<ScopeRole>) -> bool {
	role.is_some_and(|r| r.is_admin())
}

/// The most specific scope at which a principal holds a *direct* membership.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum AssociationLevel {
	#[default]
	None,
	Team,
	Department,
	Organization,
}

impl AssociationLevel {
	pub fn as_str(&self) -> &'static str {
		match self {
			AssociationLevel::None => "NONE",
			AssociationLevel::Team => "TEAM",
			AssociationLevel::Department => "DEPARTMENT",
			AssociationLevel::Organization => "ORGANIZATION",
		}
	}
}

impl fmt::Display for AssociationLevel {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.write_str(self.as_str())
	}
}

/// Organization and department roles, fetched together for a department scope.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct DepartmentRoles {
	pub organization_role: Option<ScopeRole>,
	pub department_role: Option<ScopeRole>,
}

/// A principal's roles for a team and the team's ancestors.
///
/// Built fresh per request by the team lookup; a team may sit directly under an
/// organization or under a department, so the ancestor roles are optional.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct TeamRoleInfo {
	pub association_level: AssociationLevel,
	pub team_role: Option<ScopeRole>,
	pub department_role: Option<ScopeRole>,
	pub organization_role: Option<ScopeRole>,
}

impl TeamRoleInfo {
	/// Builder: direct team membership with the given role.
	pub fn team_member(role: ScopeRole) -> Self {
		Self {
			association_level: AssociationLevel::Team,
			team_role: Some(role),
			..Default::default()
		}
	}

	/// Builder: set the department role.
	pub fn with_department_role(mut self, role: ScopeRole) -> Self {
		self.department_role = Some(role);
		self
	}

	/// Builder: set the organization role.
	pub fn with_organization_role(mut self, role: ScopeRole) -> Self {
		self.organization_role = Some(role);
		self
	}
}

/// Direct project membership. Projects are checked flat: ancestor roles are
/// not consulted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct ProjectMembership {
	pub is_member: bool,
	pub role: Option<ScopeRole>,
}

impl ProjectMembership {
	pub fn member(role: ScopeRole) -> Self {
		Self {
			is_member: true,
			role: Some(role),
		}
	}
}

// =============================================================================
// Effective Role
// =============================================================================

/// The single value each scope's role facts reduce to.
///
/// Ordered: `None < Member < Admin < GlobalAdmin`. Guards compare against a
/// threshold instead of re-evaluating role facts.
#[derive(
	Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "SCREAMING_SNAKE_CASE")]
pub enum EffectiveRole {
	#[default]
	None,
	Member,
	Admin,
	GlobalAdmin,
}

impl EffectiveRole {
	/// Returns true if this role meets the given threshold.
	pub fn satisfies(&self, required: EffectiveRole) -> bool {
		*self >= required
	}
}

impl fmt::Display for EffectiveRole {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		match self {
			EffectiveRole::None => write!(f, "none"),
			EffectiveRole::Member => write!(f, "member"),
			EffectiveRole::Admin => write!(f, "admin"),
			EffectiveRole::GlobalAdmin => write!(f, "global_admin"),
		}
	}
}
