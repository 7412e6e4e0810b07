//! Runtime for the Suscri landing page: image paths, navigation buttons,
//! scroll reveal and an optional parallax effect, plus a small API for the
//! other scripts on the page.

pub mod api;
pub mod bootstrap;
pub mod config;
pub mod dom;
pub mod error;
pub mod images;
pub mod navigation;
pub mod notify;
pub mod parallax;
pub mod reveal;
pub mod validate;

#[cfg(target_arch = "wasm32")]
pub mod web;

#[cfg(test)]
mod fake;
