//! Job Board - REST backend for job seekers and company HR.
//!
//! # Modules
//!
//! - [`auth`] - Bearer tokens, role policy, password hashing
//! - [`otp`] - One-time codes for password reset
//! - [`mail`] - Outbound email
//! - [`store`] - Persistence (PostgreSQL or in-memory)
//! - [`users`], [`companies`], [`jobs`] - Services and HTTP handlers
//! - [`gateway`] - Router, shared state, OpenAPI
//! - [`config`], [`logging`] - Startup plumbing

pub mod auth;
pub mod config;
pub mod error;
pub mod gateway;
pub mod logging;
pub mod mail;
pub mod otp;
pub mod store;

pub mod companies;
pub mod jobs;
pub mod users;

pub use error::{AppError, AppResult};
pub use gateway::state::AppState;
