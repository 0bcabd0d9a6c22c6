//! # timeclock
//!
//! Backend for a crew time-clock form. An employee enters a PIN, picks an open
//! job, records hours, and optionally logs a material purchase against the job.
//!
//! - [`jobs`]: open job listing (read path)
//! - [`clock_in`]: submission validation and inserts (write path)
//! - [`store`]: the persistence seam, with [`db`] (sqlx) and [`rest`]
//!   (Supabase PostgREST) backends
//! - [`server`]: axum HTTP surface
//! - [`config`]: backend selection from the environment

pub mod clock_in;
pub mod config;
pub mod db;
pub mod jobs;
pub mod prom_metrics;
pub mod rest;
pub mod server;
pub mod store;

#[cfg(test)]
pub(crate) mod testing;
