//! Reading-discovery recommendation service.
//!
//! Learns a per-user taste profile from onboarding choices and swipe
//! reactions, and ranks books fetched from a book source against it.

pub mod api;
pub mod config;
pub mod db;
pub mod error;
pub mod middleware;
pub mod models;
pub mod services;
