//! Performance & Leave Ledger
//!
//! This crate tracks employees, attendance, leave, performance evaluations,
//! division KPI and the monthly compensation derived from them, for an
//! organization of individual contributors, supervisors and managers.
//!
//! The [`services::Ledger`] facade is the entry point; [`api`] exposes it
//! over HTTP.

#![warn(missing_docs)]

pub mod api;
pub mod calculation;
pub mod clock;
pub mod config;
pub mod error;
pub mod models;
pub mod services;
pub mod store;
