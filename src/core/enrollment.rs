use crate::core::locks::CourseLocks;
use crate::domain::model::{
    Actor, CourseId, Enrollment, EnrollmentFilter, EnrollmentId, EnrollmentStatus, NewEnrollment,
    Role, SeatSummary, UserId,
};
use crate::domain::ports::{AuthorizationPolicy, CourseLookup, EnrollmentStore, PolicyProvider};
use crate::utils::error::{RegistrarError, Result};
use chrono::Utc;
use std::sync::Arc;

/// Admits students to courses and applies status changes.
///
/// The duplicate check, registered-seat count and insert for a course all run
/// while that course's lock is held, so the seat count a decision is based on
/// cannot change before the new record lands.
pub struct EnrollmentManager<L: CourseLookup, S: EnrollmentStore, P: PolicyProvider> {
    courses: Arc<L>,
    store: Arc<S>,
    policy: P,
    locks: CourseLocks,
}

impl<L: CourseLookup, S: EnrollmentStore, P: PolicyProvider> EnrollmentManager<L, S, P> {
    pub fn new(courses: Arc<L>, store: Arc<S>, policy: P) -> Self {
        Self {
            courses,
            store,
            policy,
            locks: CourseLocks::new(),
        }
    }

    pub fn policy(&self) -> &P {
        &self.policy
    }

    pub async fn request_enrollment(
        &self,
        student_id: UserId,
        course_id: CourseId,
    ) -> Result<Enrollment> {
        let guard = self.locks.acquire(course_id).await?;
        let result = self.admit(student_id, course_id).await;
        drop(guard);

        // Lock entries only outlive the request for courses in the catalog.
        if let Err(RegistrarError::NotFound {
            entity: "Course", ..
        }) = &result
        {
            self.locks.forget(course_id);
        }
        result
    }

    /// Duplicate check, seat count and insert. Caller holds the course lock.
    async fn admit(&self, student_id: UserId, course_id: CourseId) -> Result<Enrollment> {
        let existing = self.store.find_for_student(student_id, course_id).await?;
        let blocking = if self.policy.allow_reenroll_after_drop() {
            existing
                .iter()
                .any(|e| e.status != EnrollmentStatus::Dropped)
        } else {
            !existing.is_empty()
        };
        if blocking {
            tracing::debug!(student_id, course_id, "rejecting duplicate enrollment");
            return Err(RegistrarError::DuplicateEnrollment {
                student_id,
                course_id,
            });
        }

        let course = self
            .courses
            .find_course(course_id)
            .await?
            .ok_or(RegistrarError::NotFound {
                entity: "Course",
                id: course_id,
            })?;

        let registered = self
            .store
            .count_by_status(course_id, EnrollmentStatus::Registered)
            .await?;
        let status = if registered >= course.capacity {
            EnrollmentStatus::Waitlisted
        } else {
            EnrollmentStatus::Registered
        };

        let enrollment = self
            .store
            .insert(NewEnrollment {
                student_id,
                course_id,
                status,
                created_at: Utc::now(),
            })
            .await?;

        tracing::info!(
            enrollment_id = enrollment.id,
            student_id,
            course_id,
            registered,
            capacity = course.capacity,
            status = %enrollment.status,
            "enrollment created"
        );
        Ok(enrollment)
    }

    /// Overwrites an enrollment's status. `status` is parsed before any store
    /// access; no other record is touched and capacity is not rechecked.
    pub async fn update_status(
        &self,
        actor: &Actor,
        enrollment_id: EnrollmentId,
        status: &str,
    ) -> Result<Enrollment> {
        let status: EnrollmentStatus = status.parse()?;

        let current = self.get_enrollment(enrollment_id).await?;
        self.authorize(actor, &current).await?;

        let _guard = self.locks.acquire(current.course_id).await?;
        let previous = self.get_enrollment(enrollment_id).await?;
        let updated = self
            .store
            .set_status(enrollment_id, status)
            .await?
            .ok_or(RegistrarError::NotFound {
                entity: "Enrollment",
                id: enrollment_id,
            })?;

        tracing::info!(
            enrollment_id,
            actor_id = actor.id,
            from = %previous.status,
            to = %updated.status,
            "enrollment status updated"
        );
        Ok(updated)
    }

    pub async fn get_enrollment(&self, enrollment_id: EnrollmentId) -> Result<Enrollment> {
        self.store
            .get(enrollment_id)
            .await?
            .ok_or(RegistrarError::NotFound {
                entity: "Enrollment",
                id: enrollment_id,
            })
    }

    pub async fn list_enrollments(&self, filter: &EnrollmentFilter) -> Result<Vec<Enrollment>> {
        self.store.list(filter).await
    }

    pub async fn seat_summary(&self, course_id: CourseId) -> Result<SeatSummary> {
        let course = self
            .courses
            .find_course(course_id)
            .await?
            .ok_or(RegistrarError::NotFound {
                entity: "Course",
                id: course_id,
            })?;

        let registered = self
            .store
            .count_by_status(course_id, EnrollmentStatus::Registered)
            .await?;
        let waitlisted = self
            .store
            .count_by_status(course_id, EnrollmentStatus::Waitlisted)
            .await?;
        let dropped = self
            .store
            .count_by_status(course_id, EnrollmentStatus::Dropped)
            .await?;

        Ok(SeatSummary {
            course_id,
            capacity: course.capacity,
            registered,
            waitlisted,
            dropped,
            remaining: course.capacity.saturating_sub(registered),
        })
    }

    async fn authorize(&self, actor: &Actor, enrollment: &Enrollment) -> Result<()> {
        if self.policy.authorization() == AuthorizationPolicy::Open {
            return Ok(());
        }

        let allowed = match actor.role {
            Role::Admin => true,
            Role::Student => actor.id == enrollment.student_id,
            Role::Faculty => self
                .courses
                .find_course(enrollment.course_id)
                .await?
                .and_then(|course| course.instructor_id)
                .is_some_and(|instructor| instructor == actor.id),
        };

        if allowed {
            Ok(())
        } else {
            tracing::warn!(
                actor_id = actor.id,
                enrollment_id = enrollment.id,
                "status change denied"
            );
            Err(RegistrarError::Forbidden {
                actor_id: actor.id,
                enrollment_id: enrollment.id,
            })
        }
    }
}
