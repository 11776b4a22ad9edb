use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

use crate::utils::error::RegistrarError;

pub type CourseId = u64;
pub type EnrollmentId = u64;
pub type UserId = u64;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EnrollmentStatus {
    Registered,
    Waitlisted,
    Dropped,
}

impl EnrollmentStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Registered => "registered",
            Self::Waitlisted => "waitlisted",
            Self::Dropped => "dropped",
        }
    }
}

impl fmt::Display for EnrollmentStatus {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for EnrollmentStatus {
    type Err = RegistrarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "registered" => Ok(Self::Registered),
            "waitlisted" => Ok(Self::Waitlisted),
            "dropped" => Ok(Self::Dropped),
            other => Err(RegistrarError::validation(
                "status",
                format!(
                    "'{}' is not one of registered, waitlisted, dropped",
                    other
                ),
            )),
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Course {
    pub id: CourseId,
    #[serde(default)]
    pub title: String,
    pub capacity: u32,
    #[serde(default)]
    pub instructor_id: Option<UserId>,
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Enrollment {
    pub id: EnrollmentId,
    pub student_id: UserId,
    pub course_id: CourseId,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

/// Fields of an enrollment that the store has not yet assigned an id to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NewEnrollment {
    pub student_id: UserId,
    pub course_id: CourseId,
    pub status: EnrollmentStatus,
    pub created_at: DateTime<Utc>,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
    Student,
    Faculty,
    Admin,
}

impl FromStr for Role {
    type Err = RegistrarError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "student" => Ok(Self::Student),
            "faculty" => Ok(Self::Faculty),
            "admin" => Ok(Self::Admin),
            other => Err(RegistrarError::validation(
                "role",
                format!("unknown role '{}'", other),
            )),
        }
    }
}

/// The authenticated caller of an operation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Actor {
    pub id: UserId,
    pub role: Role,
}

impl Actor {
    pub fn student(id: UserId) -> Self {
        Self {
            id,
            role: Role::Student,
        }
    }

    pub fn faculty(id: UserId) -> Self {
        Self {
            id,
            role: Role::Faculty,
        }
    }

    pub fn admin(id: UserId) -> Self {
        Self {
            id,
            role: Role::Admin,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EnrollmentFilter {
    pub student_id: Option<UserId>,
    pub course_id: Option<CourseId>,
    pub status: Option<EnrollmentStatus>,
}

impl EnrollmentFilter {
    pub fn matches(&self, enrollment: &Enrollment) -> bool {
        self.student_id.is_none_or(|id| id == enrollment.student_id)
            && self.course_id.is_none_or(|id| id == enrollment.course_id)
            && self.status.is_none_or(|s| s == enrollment.status)
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct SeatSummary {
    pub course_id: CourseId,
    pub capacity: u32,
    pub registered: u32,
    pub waitlisted: u32,
    pub dropped: u32,
    pub remaining: u32,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_status_literals() {
        assert_eq!(
            "registered".parse::<EnrollmentStatus>().unwrap(),
            EnrollmentStatus::Registered
        );
        assert_eq!(
            "dropped".parse::<EnrollmentStatus>().unwrap(),
            EnrollmentStatus::Dropped
        );
        assert!("Registered".parse::<EnrollmentStatus>().is_err());
        assert!("pending".parse::<EnrollmentStatus>().is_err());
    }

    #[test]
    fn test_enrollment_serializes_camel_case() {
        let now = Utc::now();
        let enrollment = Enrollment {
            id: 1,
            student_id: 10,
            course_id: 20,
            status: EnrollmentStatus::Waitlisted,
            created_at: now,
            updated_at: now,
        };

        let json = serde_json::to_value(&enrollment).unwrap();
        assert_eq!(json["studentId"], 10);
        assert_eq!(json["courseId"], 20);
        assert_eq!(json["status"], "waitlisted");
    }

    #[test]
    fn test_filter_matches() {
        let now = Utc::now();
        let enrollment = Enrollment {
            id: 1,
            student_id: 10,
            course_id: 20,
            status: EnrollmentStatus::Registered,
            created_at: now,
            updated_at: now,
        };

        assert!(EnrollmentFilter::default().matches(&enrollment));
        assert!(EnrollmentFilter {
            course_id: Some(20),
            status: Some(EnrollmentStatus::Registered),
            ..Default::default()
        }
        .matches(&enrollment));
        assert!(!EnrollmentFilter {
            student_id: Some(11),
            ..Default::default()
        }
        .matches(&enrollment));
    }
}
