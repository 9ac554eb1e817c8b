//! Bloom - Gamified Learning Web Client
//!
//! The browser-facing client for Bloom: authentication, course browsing,
//! lesson consumption, the premium subscription flow, and the profile /
//! progress dashboard.
//!
//! All data lives behind the remote Bloom API; this crate renders views,
//! manages client-side session state, and derives display metrics (level
//! progress, streak calendar, energy countdown) from fetched snapshots.

pub mod app;
