//! Match service: matchmaking, turn handling and the computer opponent behind
//! an HTTP API.

pub mod auth;
pub mod config;
pub mod db;
pub mod error;
pub mod matchmaking;
pub mod memory;
pub mod repo;
pub mod routes;
pub mod service;
