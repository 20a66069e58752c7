// SPDX-License-Identifier: MPL-2.0
//! Localization of user-visible status strings via Fluent.

pub mod fluent;

pub use fluent::I18n;
