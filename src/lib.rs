// SPDX-FileCopyrightText: 2025 Hyperpolymath
// SPDX-License-Identifier: PMPL-1.0-or-later

//! Deploy Smoke
//!
//! Pre-deployment smoke tests for the items/likes backend. Checks are run
//! in a fixed order against a live instance:
//!
//! - Health and API info endpoints
//! - Authentication code request
//! - Code request rate limit (3 per email)
//! - Brute-force lockout on code verification (5 wrong codes)
//! - Public item listing and item structure
//! - Like counter and like rate limit (15 per window)
//! - Manual confirmation of email delivery

pub mod checks;
pub mod client;
pub mod config;
pub mod error;
pub mod models;
pub mod policy;
pub mod report;
pub mod runner;
pub mod suite;

pub use config::Config;
pub use error::CheckError;
pub use runner::{Summary, Tally};
pub use suite::Suite;
