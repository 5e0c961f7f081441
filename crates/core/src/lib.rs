//! `learnhub-core`: shared building blocks for the LearnHub crates.
//!
//! This crate contains **pure** primitives (no document-store or auth SDK concerns).

pub mod entity;
pub mod error;
pub mod id;

pub use entity::{Entity, find_by_id};
pub use error::{DomainError, DomainResult};
pub use id::{CertificateId, CourseId, EnrollmentId, UserId};
