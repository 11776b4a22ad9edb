pub mod enrollment;
pub mod locks;

pub use crate::domain::model::{Course, Enrollment, EnrollmentStatus};
pub use crate::domain::ports::{CourseLookup, EnrollmentStore, PolicyProvider};
pub use crate::utils::error::Result;
