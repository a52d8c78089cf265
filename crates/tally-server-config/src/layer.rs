// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

//! Partial configuration as read from a single source.

use serde::Deserialize;

use crate::sections::{
	AuthConfigLayer, DatabaseConfigLayer, HttpConfigLayer, LoggingConfigLayer,
	SubscriptionsConfigLayer,
};

/// One source's view of the configuration. Every field is optional so sources
/// can be stacked; later layers win field by field.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ServerConfigLayer {
	#[serde(default)]
	pub http: Option<HttpConfigLayer>,
	#[serde(default)]
	pub database: Option<DatabaseConfigLayer>,
	#[serde(default)]
	pub auth: Option<AuthConfigLayer>,
	#[serde(default)]
	pub subscriptions: Option<SubscriptionsConfigLayer>,
	#[serde(default)]
	pub logging: Option<LoggingConfigLayer>,
}

macro_rules! merge_section {
	($self:ident, $other:ident, $field:ident) => {
		match ($self.$field.as_mut(), $other.$field) {
			(Some(existing), Some(incoming)) => existing.merge(incoming),
			(None, Some(incoming)) => $self.$field = Some(incoming),
			(_, None) => {}
		}
	};
}

impl ServerConfigLayer {
	pub fn merge(&mut self, other: ServerConfigLayer) {
		merge_section!(self, other, http);
		merge_section!(self, other, database);
		merge_section!(self, other, auth);
		merge_section!(self, other, subscriptions);
		merge_section!(self, other, logging);
	}
}
