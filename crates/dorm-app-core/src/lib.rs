// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Shared application services for dormitory tools (config, prefs,
//! confirmations, notices). Keeps screen adapters thin and framework-agnostic.

pub mod config;
pub mod confirm;
pub mod notice;
pub mod prefs;
