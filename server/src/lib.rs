//! Backend for the Mario Service website: public quote and contact forms,
//! and the admin API behind the quote triage dashboard.

pub mod auth;
pub mod client;
pub mod config;
pub mod contact;
pub mod db;
pub mod http;
pub mod utils;
pub mod validation;
