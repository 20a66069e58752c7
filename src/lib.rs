// SPDX-License-Identifier: MPL-2.0
//! `glance` is a minimal image viewer built with the Iced GUI framework.
//!
//! It displays images on a pannable, zoomable canvas and can relocate its
//! window to the connected display whose work area best matches the current
//! image's aspect ratio and resolution.

pub mod app;
pub mod config;
pub mod display;
pub mod error;
pub mod i18n;
pub mod media;
pub mod viewer;
