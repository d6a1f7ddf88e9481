//! # Taskflow API Server Library
//!
//! HTTP surface of the Taskflow project tracker.
//!
//! ## Modules
//!
//! - `app`: application state and router builder
//! - `config`: environment configuration
//! - `error`: error to envelope mapping
//! - `extract`: JSON body and path id extractors
//! - `middleware`: session resolution
//! - `response`: success envelope
//! - `routes`: route handlers

pub mod app;
pub mod config;
pub mod error;
pub mod extract;
pub mod middleware;
pub mod response;
pub mod routes;
