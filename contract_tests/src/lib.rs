//! # Timer Contract Tests
//!
//! This crate provides "golden" tests for the timer contract to ensure
//! drivers and wire formats don't drift accidentally over time.
//!
//! ## Philosophy
//!
//! - **One contract, every driver**: the same checks run against the
//!   simulated driver and each KL46Z driver
//! - **Testability first**: contract tests fail when behaviour changes
//! - **Formats are contracts**: serialized shapes are pinned as golden JSON
//!
//! ## Structure
//!
//! - [`harness`]: driver-independent checks of the timer contract
//! - [`sim`] and [`kl46z`]: counter controls and the runs per driver
//! - [`formats`]: JSON and display formats of the shared types

pub mod formats;
pub mod harness;
pub mod kl46z;
pub mod sim;
