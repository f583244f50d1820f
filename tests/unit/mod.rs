//! Library-level resolution scenarios
//!
//! These tests drive [`cps_config::find_package`] against package
//! descriptions written into temporary prefixes. They exercise the passes
//! together: search, loading, graph building, propagation and aggregation.
//!
//! # Running Unit Tests
//!
//! ```bash
//! cargo test --test unit
//! ```
//!
//! Package names are unique per test; the default prefixes (`/usr`,
//! `/usr/local`) are searched as well and must not shadow test packages.

mod pkgconfig;
mod resolution;
