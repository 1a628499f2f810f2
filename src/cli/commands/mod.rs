pub mod analyses;
pub mod auth;
