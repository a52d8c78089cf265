// Copyright (c) 2025 Geoffrey Huntley <ghuntley@ghuntley.com>. All rights reserved.
// SPDX-License-Identifier: Proprietary

use serde::Deserialize;

/// Subscription gating. When disabled every subscription guard allows.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SubscriptionsConfig {
	pub enabled: bool,
}

#[derive(Debug, Clone, Default, Deserialize)]
pub struct SubscriptionsConfigLayer {
	#[serde(default)]
	pub enabled: Option<bool>,
}

impl SubscriptionsConfigLayer {
	pub fn merge(&mut self, other: SubscriptionsConfigLayer) {
		if other.enabled.is_some() {
			self.enabled = other.enabled;
		}
	}

	pub fn finalize(self) -> SubscriptionsConfig {
		SubscriptionsConfig {
			enabled: self.enabled.unwrap_or(false),
		}
	}
}
