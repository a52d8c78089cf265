// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! SQLite implementations of the authorization data-layer contracts.
//!
//! - [`PrincipalRepository`] implements [`tally_server_auth::PrincipalStore`]
//! - [`ScopeRepository`] implements [`tally_server_auth::ScopeRoleStore`]
//! - [`SubscriptionRepository`] implements [`tally_server_auth::SubscriptionStore`]
//!
//! Missing rows surface as `StoreError::NotFound`; every other failure surfaces
//! as `StoreError::Backend`.

pub mod error;
pub mod pool;
pub mod principal;
mod row;
pub mod schema;
pub mod scope;
pub mod subscription;
#[cfg(test)]
mod testing;

pub use error::{DbError, Result};
pub use pool::create_pool;
pub use principal::{hash_token, PrincipalRepository};
pub use schema::run_migrations;
pub use scope::{ScopeParents, ScopeRepository};
pub use subscription::SubscriptionRepository;
