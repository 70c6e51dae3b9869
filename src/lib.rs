//! HealthMate: a single-profile personal health manager.
//!
//! Appointments, prescriptions, health reminders and document metadata live in
//! in-memory entity stores behind an HTTP API. A background scheduler surfaces
//! reminders as they fall due.

pub mod assistant;
pub mod auth;
pub mod error;
pub mod form;
pub mod models;
pub mod schedule;
pub mod scheduler;
pub mod search;
pub mod server;
pub mod store;
pub mod upload;
pub mod web_api;
