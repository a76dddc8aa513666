#![deny(clippy::pedantic, unsafe_code)]
#![allow(clippy::module_name_repetitions)]

//! Network operations for shaproof
//!
//! This crate owns every HTTP interaction: a pooled reqwest client with
//! retry and rate-limit handling, and the GitHub adapter that turns API
//! responses into typed lookup results.

mod client;
mod github;

pub use client::{NetClient, NetConfig};
pub use github::GitHubClient;
