//! Core use-case services.
//!
//! # Responsibility
//! - Orchestrate repository calls into use-case level APIs.
//! - Keep FFI/CLI callers decoupled from storage details.

pub mod contact_book;
pub mod note_service;
