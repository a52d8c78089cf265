// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Tower layers enforcing authorization on a route.
//!
//! Each guard is a [`Guard`] wrapped in a [`GuardLayer`]. A guard either lets the
//! request through (possibly after recording facts in the request's
//! [`AuthorizationContext`]) or stops it with the failure envelope.
//!
//! Guards compose with [`guards!`](crate::guards!), which runs them in the order
//! listed:
//!
//! ```ignore
//! get(handler).route_layer(guards!(state; UserOnly, TeamUserOnly, TeamAdminOnly))
//! ```
//!
//! [`UserOnly`] must come first. Every other guard reads the context it writes
//! and answers 401 when it is missing. Admin guards read the facts recorded by
//! the matching membership guard and deny when those are missing.

mod identity;
mod scope;
mod subscription;

pub use identity::{
	EntityUserOnly, RegisteredUserOnly, SubscribedEntityUserOnly, SubscribedUserOnly, UserOnly,
	VerifiedUserOnly,
};
pub use scope::{
	DeptAdminOnly, DeptUserOnly, OrgAdminOnly, OrgUserOnly, ProjectAdminOnly, ProjectUserOnly,
	TeamAdminOnly, TeamUserOnly,
};
pub use subscription::{SubscribedOrgOnly, SubscribedProjectOnly, SubscribedTeamOnly};
pub use tower::ServiceBuilder;

use std::collections::HashMap;
use std::str::FromStr;
use std::sync::Arc;
use std::task::{Context, Poll};

use async_trait::async_trait;
use axum::{
	body::Body,
	extract::{FromRequestParts, Path},
	http::{request::Parts, HeaderMap, Request},
	response::{IntoResponse, Response},
};
use futures::future::BoxFuture;
use tally_server_auth::{AuthorizationContext, AuthzError, ErrorCode, Principal};
use tower::{Layer, Service};

use crate::api_response::AuthzRejection;
use crate::state::AuthzState;

/// Path parameter names shared by routes and guards.
pub mod params {
	pub const ORGANIZATION_ID: &str = "orgId";
	pub const DEPARTMENT_ID: &str = "departmentId";
	pub const TEAM_ID: &str = "teamId";
	pub const PROJECT_ID: &str = "projectId";
	pub const USER_ID: &str = "userId";
}

/// One authorization check.
#[async_trait]
pub trait Guard: Send + Sync + 'static {
	/// Name used in logs.
	const NAME: &'static str;

	async fn check(&self, state: &AuthzState, req: &mut GuardRequest) -> Result<(), AuthzError>;
}

/// The request as seen by a guard: head only, with path parameters decoded.
pub struct GuardRequest {
	parts: Parts,
	params: HashMap<String, String>,
}

impl GuardRequest {
	pub async fn from_parts(mut parts: Parts) -> Self {
		let params = Path::<HashMap<String, String>>::from_request_parts(&mut parts, &())
			.await
			.map(|Path(params)| params)
			.unwrap_or_default();
		Self { parts, params }
	}

	pub fn into_parts(self) -> Parts {
		self.parts
	}

	pub fn headers(&self) -> &HeaderMap {
		&self.parts.headers
	}

	pub fn route(&self) -> &str {
		self.parts.uri.path()
	}

	/// Parse a path parameter. Missing or malformed values are a 400 with
	/// `invalid`.
	pub fn param<T: FromStr>(&self, name: &str, invalid: ErrorCode) -> Result<T, AuthzError> {
		self
			.params
			.get(name)
			.and_then(|value| value.parse().ok())
			.ok_or(AuthzError::Invalid(invalid))
	}

	pub fn context(&self) -> Result<&AuthorizationContext, AuthzError> {
		self
			.parts
			.extensions
			.get::<AuthorizationContext>()
			.ok_or(AuthzError::Unauthenticated(ErrorCode::InvalidUser))
	}

	pub fn context_mut(&mut self) -> Result<&mut AuthorizationContext, AuthzError> {
		self
			.parts
			.extensions
			.get_mut::<AuthorizationContext>()
			.ok_or(AuthzError::Unauthenticated(ErrorCode::InvalidUser))
	}

	pub fn principal(&self) -> Result<&Principal, AuthzError> {
		self.context().map(AuthorizationContext::principal)
	}

	fn set_context(&mut self, context: AuthorizationContext) {
		self.parts.extensions.insert(context);
	}

	fn log_rejection(&self, guard: &'static str, err: &AuthzError) {
		let user_id = self.principal().ok().map(|p| p.id.to_string());
		match err {
			AuthzError::Internal { message } => tracing::error!(
				guard,
				user_id = ?user_id,
				route = %self.route(),
				scope_ids = ?self.params,
				error = %message,
				"authorization lookup failed"
			),
			AuthzError::Forbidden(code) => tracing::info!(
				guard,
				user_id = ?user_id,
				route = %self.route(),
				scope_ids = ?self.params,
				code = %code,
				"authorization denied"
			),
			other => tracing::debug!(
				guard,
				user_id = ?user_id,
				route = %self.route(),
				code = %other.code(),
				"authorization rejected"
			),
		}
	}
}

/// Layer that runs guard `G` in front of a route.
pub struct GuardLayer<G> {
	guard: Arc<G>,
	state: AuthzState,
}

impl<G> GuardLayer<G> {
	pub fn new(state: &AuthzState, guard: G) -> Self {
		Self {
			guard: Arc::new(guard),
			state: state.clone(),
		}
	}
}

impl<G> Clone for GuardLayer<G> {
	fn clone(&self) -> Self {
		Self {
			guard: Arc::clone(&self.guard),
			state: self.state.clone(),
		}
	}
}

impl<S, G> Layer<S> for GuardLayer<G> {
	type Service = GuardService<S, G>;

	fn layer(&self, inner: S) -> Self::Service {
		GuardService {
			inner,
			guard: Arc::clone(&self.guard),
			state: self.state.clone(),
		}
	}
}

pub struct GuardService<S, G> {
	inner: S,
	guard: Arc<G>,
	state: AuthzState,
}

impl<S: Clone, G> Clone for GuardService<S, G> {
	fn clone(&self) -> Self {
		Self {
			inner: self.inner.clone(),
			guard: Arc::clone(&self.guard),
			state: self.state.clone(),
		}
	}
}

impl<S, G> Service<Request<Body>> for GuardService<S, G>
where
	S: Service<Request<Body>, Response = Response> + Clone + Send + 'static,
	S::Future: Send + 'static,
	S::Error: 'static,
	G: Guard,
{
	type Response = Response;
	type Error = S::Error;
	type Future = BoxFuture<'static, Result<Response, S::Error>>;

	fn poll_ready(&mut self, cx: &mut Context<'_>) -> Poll<Result<(), Self::Error>> {
		self.inner.poll_ready(cx)
	}

	fn call(&mut self, req: Request<Body>) -> Self::Future {
		// The clone may not be ready; keep the one that is.
		let clone = self.inner.clone();
		let mut inner = std::mem::replace(&mut self.inner, clone);
		let guard = Arc::clone(&self.guard);
		let state = self.state.clone();

		Box::pin(async move {
			let (parts, body) = req.into_parts();
			let mut guarded = GuardRequest::from_parts(parts).await;

			match guard.check(&state, &mut guarded).await {
				Ok(()) => {
					tracing::debug!(guard = G::NAME, route = %guarded.route(), "authorization granted");
					inner
						.call(Request::from_parts(guarded.into_parts(), body))
						.await
				}
				Err(err) => {
					guarded.log_rejection(G::NAME, &err);
					Ok(AuthzRejection(err).into_response())
				}
			}
		})
	}
}

/// Compose guards into one layer. Guards run in the order listed.
#[macro_export]
macro_rules! guards {
	($state:expr; $($guard:expr),+ $(,)?) => {
		$crate::guards::ServiceBuilder::new()
			$(.layer($crate::guards::GuardLayer::new(&$state, $guard)))+
	};
}
