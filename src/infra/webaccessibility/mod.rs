//! Accessibility percentages from webaccessibility.com result pages.

mod client;

pub use client::{DEFAULT_BASE_URL, WebAccessibilityClient};
