//! HTTP layer: the geo redirect middleware and the admin REST API.
//!
//! # Modules
//!
//! - [`dto`] - Data Transfer Objects for request/response serialization
//! - [`handlers`] - HTTP request handlers
//! - [`middleware`] - Redirect, authentication and request processing middleware
//! - [`routes`] - Admin route configuration

pub mod dto;
pub mod handlers;
pub mod middleware;
pub mod routes;
