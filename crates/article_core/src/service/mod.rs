//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate validation and Record Store calls into use-case level APIs.
//! - Keep CLI/embedding layers decoupled from storage details.

pub mod article_service;
