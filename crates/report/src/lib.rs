//! `analytics-report` library crate.
//!
//! Renders the project report HTML to a PDF by driving a headless
//! Chromium-family browser as a subprocess.

pub mod config;
pub mod page;
pub mod render;
