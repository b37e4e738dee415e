//! Core business logic for Kaizen.
//!
//! This crate contains pure business logic with ZERO web or database dependencies.
//! Persistence and third-party services are reached through the ports defined here.
//!
//! # Modules
//!
//! - `transaction` - Worker-loan transaction consistency engine
//! - `art` - ART (antigen rapid test) validity rules
//! - `skill` - Employee skill profiles and availability across companies
//! - `project` - Project staffing
//! - `storage` - Blob storage port and OpenDAL adapter for employee images
//! - `payment` - Payment gateway port and Stripe adapter
//! - `feed` - News/updates feed fetching and refresh

pub mod art;
pub mod feed;
pub mod payment;
pub mod project;
pub mod skill;
pub mod storage;
pub mod transaction;
