use crate::domain::model::{
    Course, CourseId, Enrollment, EnrollmentFilter, EnrollmentId, EnrollmentStatus, NewEnrollment,
    UserId,
};
use crate::domain::ports::{CourseLookup, EnrollmentStore};
use crate::utils::error::{RegistrarError, Result};
use async_trait::async_trait;
use chrono::Utc;
use serde::{Deserialize, Serialize};
use std::collections::{BTreeMap, HashMap};
use std::sync::{RwLock, RwLockReadGuard, RwLockWriteGuard};

#[derive(Debug, Default, Clone, Serialize, Deserialize)]
pub struct Tables {
    pub courses: HashMap<CourseId, Course>,
    pub enrollments: BTreeMap<EnrollmentId, Enrollment>,
    pub next_id: EnrollmentId,
}

/// Process-local store backing both the course catalog and enrollments.
#[derive(Debug)]
pub struct InMemoryStore {
    tables: RwLock<Tables>,
}

impl Default for InMemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl InMemoryStore {
    pub fn new() -> Self {
        Self::from_tables(Tables::default())
    }

    pub fn with_courses(courses: impl IntoIterator<Item = Course>) -> Self {
        Self::from_tables(Tables {
            courses: courses.into_iter().map(|c| (c.id, c)).collect(),
            ..Tables::default()
        })
    }

    pub fn from_tables(mut tables: Tables) -> Self {
        let floor = tables.enrollments.keys().next_back().map_or(1, |id| id + 1);
        tables.next_id = tables.next_id.max(floor);
        Self {
            tables: RwLock::new(tables),
        }
    }

    /// Copy of the current tables, for persisting.
    pub fn snapshot(&self) -> Result<Tables> {
        Ok(self.read()?.clone())
    }

    /// Adds or replaces catalog entries. Existing enrollments are kept.
    pub fn upsert_courses(&self, courses: impl IntoIterator<Item = Course>) -> Result<()> {
        let mut tables = self.write()?;
        for course in courses {
            tables.courses.insert(course.id, course);
        }
        Ok(())
    }

    fn read(&self) -> Result<RwLockReadGuard<'_, Tables>> {
        self.tables
            .read()
            .map_err(|_| RegistrarError::storage("enrollment tables poisoned"))
    }

    fn write(&self) -> Result<RwLockWriteGuard<'_, Tables>> {
        self.tables
            .write()
            .map_err(|_| RegistrarError::storage("enrollment tables poisoned"))
    }
}

#[async_trait]
impl CourseLookup for InMemoryStore {
    async fn find_course(&self, id: CourseId) -> Result<Option<Course>> {
        Ok(self.read()?.courses.get(&id).cloned())
    }
}

#[async_trait]
impl EnrollmentStore for InMemoryStore {
    async fn find_for_student(
        &self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Vec<Enrollment>> {
        Ok(self
            .read()?
            .enrollments
            .values()
            .filter(|e| e.student_id == student_id && e.course_id == course_id)
            .cloned()
            .collect())
    }

    async fn count_by_status(&self, course_id: CourseId, status: EnrollmentStatus) -> Result<u32> {
        let count = self
            .read()?
            .enrollments
            .values()
            .filter(|e| e.course_id == course_id && e.status == status)
            .count();
        u32::try_from(count).map_err(|_| RegistrarError::storage("enrollment count overflow"))
    }

    async fn insert(&self, enrollment: NewEnrollment) -> Result<Enrollment> {
        let mut tables = self.write()?;
        let id = tables.next_id;
        tables.next_id += 1;

        let record = Enrollment {
            id,
            student_id: enrollment.student_id,
            course_id: enrollment.course_id,
            status: enrollment.status,
            created_at: enrollment.created_at,
            updated_at: enrollment.created_at,
        };
        tables.enrollments.insert(id, record.clone());
        Ok(record)
    }

    async fn get(&self, id: EnrollmentId) -> Result<Option<Enrollment>> {
        Ok(self.read()?.enrollments.get(&id).cloned())
    }

    async fn set_status(
        &self,
        id: EnrollmentId,
        status: EnrollmentStatus,
    ) -> Result<Option<Enrollment>> {
        let mut tables = self.write()?;
        Ok(tables.enrollments.get_mut(&id).map(|record| {
            record.status = status;
            record.updated_at = Utc::now();
            record.clone()
        }))
    }

    async fn list(&self, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>> {
        Ok(self
            .read()?
            .enrollments
            .values()
            .filter(|e| filter.matches(e))
            .cloned()
            .collect())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn new_enrollment(student_id: UserId, course_id: CourseId) -> NewEnrollment {
        NewEnrollment {
            student_id,
            course_id,
            status: EnrollmentStatus::Registered,
            created_at: Utc::now(),
        }
    }

    #[tokio::test]
    async fn test_ids_are_sequential() {
        let store = InMemoryStore::with_courses(vec![]);
        let a = store.insert(new_enrollment(1, 1)).await.unwrap();
        let b = store.insert(new_enrollment(2, 1)).await.unwrap();
        assert_eq!(a.id, 1);
        assert_eq!(b.id, 2);
    }

    #[tokio::test]
    async fn test_set_status_missing_returns_none() {
        let store = InMemoryStore::new();
        let result = store
            .set_status(7, EnrollmentStatus::Dropped)
            .await
            .unwrap();
        assert!(result.is_none());
    }

    #[tokio::test]
    async fn test_restored_tables_continue_numbering() {
        let store = InMemoryStore::with_courses(vec![]);
        store.insert(new_enrollment(1, 1)).await.unwrap();
        store.insert(new_enrollment(2, 1)).await.unwrap();

        let mut tables = store.snapshot().unwrap();
        tables.next_id = 0;
        let restored = InMemoryStore::from_tables(tables);

        let next = restored.insert(new_enrollment(3, 1)).await.unwrap();
        assert_eq!(next.id, 3);
        assert_eq!(
            restored
                .count_by_status(1, EnrollmentStatus::Registered)
                .await
                .unwrap(),
            3
        );
    }
}
