use crate::domain::model::CourseId;
use crate::utils::error::{RegistrarError, Result};
use std::collections::HashMap;
use std::sync::{Arc, Mutex};
use tokio::sync::{Mutex as AsyncMutex, OwnedMutexGuard};

/// One async mutex per course. Holding a course's guard serializes every
/// seat decision for that course; different courses never contend.
#[derive(Debug, Default)]
pub struct CourseLocks {
    locks: Mutex<HashMap<CourseId, Arc<AsyncMutex<()>>>>,
}

impl CourseLocks {
    pub fn new() -> Self {
        Self::default()
    }

    pub async fn acquire(&self, course_id: CourseId) -> Result<OwnedMutexGuard<()>> {
        let lock = {
            let mut locks = self
                .locks
                .lock()
                .map_err(|_| RegistrarError::storage("course lock registry poisoned"))?;
            locks
                .entry(course_id)
                .or_insert_with(|| Arc::new(AsyncMutex::new(())))
                .clone()
        };

        Ok(lock.lock_owned().await)
    }

    /// Drops the registry entry for a course unless another task holds or
    /// awaits its lock. Call after releasing the guard.
    pub fn forget(&self, course_id: CourseId) {
        if let Ok(mut locks) = self.locks.lock() {
            if locks
                .get(&course_id)
                .is_some_and(|lock| Arc::strong_count(lock) == 1)
            {
                locks.remove(&course_id);
            }
        }
    }

    #[cfg(test)]
    pub(crate) fn len(&self) -> usize {
        self.locks.lock().map(|locks| locks.len()).unwrap_or(0)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::time::Duration;

    #[tokio::test]
    async fn test_same_course_is_exclusive() {
        let locks = Arc::new(CourseLocks::new());
        let guard = locks.acquire(1).await.unwrap();

        let contender = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire(1).await.map(|_| ()) })
        };

        tokio::time::sleep(Duration::from_millis(20)).await;
        assert!(!contender.is_finished());

        drop(guard);
        contender.await.unwrap().unwrap();
    }

    #[tokio::test]
    async fn test_different_courses_do_not_contend() {
        let locks = CourseLocks::new();
        let _first = locks.acquire(1).await.unwrap();
        let second = tokio::time::timeout(Duration::from_millis(100), locks.acquire(2)).await;

        assert!(second.is_ok());
        assert_eq!(locks.len(), 2);
    }

    #[tokio::test]
    async fn test_forget_removes_idle_entry_only() {
        let locks = Arc::new(CourseLocks::new());

        let guard = locks.acquire(1).await.unwrap();
        let waiter = {
            let locks = locks.clone();
            tokio::spawn(async move { locks.acquire(1).await.map(|_| ()) })
        };
        tokio::time::sleep(Duration::from_millis(20)).await;

        drop(guard);
        locks.forget(1);
        assert_eq!(locks.len(), 1);
        waiter.await.unwrap().unwrap();

        locks.forget(1);
        assert_eq!(locks.len(), 0);
    }
}
