//! Job Tracker
//!
//! Internal shipment job registry: staff sign in, record jobs against a
//! shipment reference and importer, assign them to colleagues and move
//! them through free-form statuses.

pub mod app_state;
pub mod config;
pub mod db;
pub mod error;
pub mod models;
pub mod routes;
pub mod services;
