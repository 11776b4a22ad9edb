use crate::domain::model::{
    Course, CourseId, Enrollment, EnrollmentFilter, EnrollmentId, EnrollmentStatus, NewEnrollment,
    UserId,
};
use crate::utils::error::Result;
use async_trait::async_trait;

/// Read-only access to the course catalog.
#[async_trait]
pub trait CourseLookup: Send + Sync {
    async fn find_course(&self, id: CourseId) -> Result<Option<Course>>;
}

/// Persistence for enrollment records. Records are never deleted.
#[async_trait]
pub trait EnrollmentStore: Send + Sync {
    /// Every enrollment for the pair, whatever its status, oldest first.
    async fn find_for_student(
        &self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>>;

    async fn count_by_status(&self, course_id: CourseId, status: EnrollmentStatus) -> Result<u32>;

    async fn insert(&self, enrollment: NewEnrollment) -> Result<Enrollment>;

    async fn get(&self, id: EnrollmentId) -> Result<Option<Enrollment>>;

    /// Overwrites the status. Returns `None` if no record has this id.
    async fn set_status(
        &self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>>;

    async fn list(&self, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>>;
}

pub trait PolicyProvider: Send + Sync {
    fn allow_reenroll_after_drop(&self) -> bool;
    fn authorization(&self) -> AuthorizationPolicy;
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, serde::Serialize, serde::Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AuthorizationPolicy {
    /// Any authenticated actor may change any enrollment.
    Open,
    /// Only the owning student, the course instructor, or an admin.
    #[default]
    Scoped,
}

impl std::str::FromStr for AuthorizationPolicy {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s {
            "open" => Ok(Self::Open),
            "scoped" => Ok(Self::Scoped),
            other => Err(format!("unknown authorization policy '{}'", other)),
        }
    }
}

/// Raw byte storage used to persist store snapshots.
pub trait Storage: Send + Sync {
    fn read_file(
        &self,
        path: &str,
    ) -> impl std::future::Future<Output = Result<Option<Vec<u8>>>> + Send;
    fn write_file(
        &self,
        path: &str,
        data: &[u8],
    ) -> impl std::future::Future<Output = Result<()>> + Send;
}
