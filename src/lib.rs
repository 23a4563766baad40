//! Poll service: polls ("enquetes") own options, options own votes, and
//! results are the per-option vote counts of a poll.
//!
//! Routes live under `/api`; see [`routes::create_routes`].

pub mod config;
pub mod db;
pub mod error;
pub mod handlers;
pub mod models;
pub mod poll;
pub mod routes;
