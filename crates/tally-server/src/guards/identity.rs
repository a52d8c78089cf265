// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Guards about who the caller is, rather than where they belong.

use async_trait::async_trait;
use tally_server_auth::precedence::{entity_user, registered_user, subscribed_user, verified_user};
use tally_server_auth::{AuthorizationContext, AuthzError, Entity, ErrorCode, UserId, UserRecord};

use super::{params, Guard, GuardRequest};
use crate::state::AuthzState;

/// Resolves the principal and starts the request's authorization context.
#[derive(Debug, Clone, Copy, Default)]
pub struct UserOnly;

#[async_trait]
impl Guard for UserOnly {
	const NAME: &'static str = "user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let principal = state.resolver.resolve(req.headers()).await?;
		req.set_context(AuthorizationContext::new(principal));
		Ok(())
	}
}

/// `{userId}` must be the caller, or the caller a global admin.
#[derive(Debug, Clone, Copy, Default)]
pub struct EntityUserOnly;

#[async_trait]
impl Guard for EntityUserOnly {
	const NAME: &'static str = "entity_user_only";

	async fn check(&self, _state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let target: UserId = req.param(params::USER_ID, ErrorCode::InvalidUserId)?;
		entity_user(req.principal()?, &target)
	}
}

/// Denies guests.
#[derive(Debug, Clone, Copy, Default)]
pub struct RegisteredUserOnly;

#[async_trait]
impl Guard for RegisteredUserOnly {
	const NAME: &'static str = "registered_user_only";

	async fn check(&self, _state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		registered_user(req.principal()?)
	}
}

/// Entity ownership, plus the target's verified flag when verification is
/// required.
#[derive(Debug, Clone, Copy, Default)]
pub struct VerifiedUserOnly;

#[async_trait]
impl Guard for VerifiedUserOnly {
	const NAME: &'static str = "verified_user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let target: UserId = req.param(params::USER_ID, ErrorCode::InvalidUserId)?;
		let principal = req.principal()?;
		entity_user(principal, &target)?;
		if !state.settings.require_verified_email {
			return Ok(());
		}

		let record = fetch_user(state, &target, ErrorCode::RequiresVerifiedUser).await?;
		verified_user(principal, &record, true)
	}
}

/// The caller must hold an active subscription.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribedUserOnly;

#[async_trait]
impl Guard for SubscribedUserOnly {
	const NAME: &'static str = "subscribed_user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let principal = req.principal()?;
		if !state.settings.subscriptions_enabled || principal.is_admin() {
			return Ok(());
		}

		let record = fetch_user(state, &principal.id, ErrorCode::RequiresSubscribedUser).await?;
		subscribed_user(principal, &record, true)
	}
}

/// Entity ownership, plus an active subscription for the `{userId}` user.
#[derive(Debug, Clone, Copy, Default)]
pub struct SubscribedEntityUserOnly;

#[async_trait]
impl Guard for SubscribedEntityUserOnly {
	const NAME: &'static str = "subscribed_entity_user_only";

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError> {
		let target: UserId = req.param(params::USER_ID, ErrorCode::InvalidUserId)?;
		let principal = req.principal()?;
		entity_user(principal, &target)?;
		if !state.settings.subscriptions_enabled || principal.is_admin() {
			return Ok(());
		}

		let record = fetch_user(state, &target, ErrorCode::RequiresSubscribedUser).await?;
		subscribed_user(principal, &record, true)
	}
}

async fn fetch_user(
	state: &AuthzState,
	user_id: &UserId,
	denied: ErrorCode,
) -> Result<UserRecord, AuthzError> {
	state
		.principals
		.user_by_id(user_id)
		.await
		.map_err(|err| {
			AuthzError::from_existence_lookup(err, Entity::User, ErrorCode::UserNotFound, denied)
		})
}
