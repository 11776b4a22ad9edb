//! Course enrollment service.
//!
//! A student's enrollment request resolves to `registered` while the course has
//! fewer registered students than its capacity, and to `waitlisted` otherwise.
//! Records then move freely between `registered`, `waitlisted` and `dropped`;
//! nothing is ever deleted and nobody is promoted off the waitlist automatically.
//!
//! Seat decisions for a course are serialized by a per-course lock, so
//! concurrent requests for the last seat cannot both be admitted.

pub mod adapters;
pub mod config;
pub mod core;
pub mod domain;
pub mod http;
pub mod utils;

#[cfg(feature = "cli")]
pub use config::CliConfig;

pub use config::{PolicyConfig, RegistrarConfig};
pub use crate::core::enrollment::EnrollmentManager;
pub use domain::model::{Actor, Course, Enrollment, EnrollmentStatus, Role};
pub use http::App;
pub use utils::error::{RegistrarError, Result};
