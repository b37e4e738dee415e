//! Shared types, errors, and configuration for Kaizen.
//!
//! This crate provides common types used across all other crates:
//! - Typed keys for companies (UEN) and employees (work permit number)
//! - Application-wide error types
//! - Configuration management
//! - Token verification for the identity provider's JWTs

pub mod auth;
pub mod config;
pub mod error;
pub mod jwt;
pub mod types;

pub use auth::{Claims, Principal, UserRole};
pub use config::AppConfig;
pub use error::{AppError, AppResult};
pub use jwt::{JwtConfig, JwtError, JwtService, TokenVerifier};
