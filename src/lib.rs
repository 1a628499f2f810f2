pub mod analyses;
pub mod api;
pub mod auth;
pub mod cli;
pub mod config;
pub mod controller;
pub mod error;
pub mod filter;
pub mod pagination;
