use crate::adapters::memory::{InMemoryStore, Tables};
use crate::domain::ports::Storage;
use crate::utils::error::Result;

/// Persists the in-memory tables as a single JSON document.
pub struct SnapshotFile<S: Storage> {
    storage: S,
    file_name: String,
}

impl<S: Storage> SnapshotFile<S> {
    pub fn new(storage: S, file_name: impl Into<String>) -> Self {
        Self {
            storage,
            file_name: file_name.into(),
        }
    }

    pub async fn load(&self) -> Result<Option<Tables>> {
        match self.storage.read_file(&self.file_name).await? {
            Some(bytes) => {
                let tables: Tables = serde_json::from_slice(&bytes)?;
                tracing::info!(
                    file = %self.file_name,
                    enrollments = tables.enrollments.len(),
                    "loaded snapshot"
                );
                Ok(Some(tables))
            }
            None => Ok(None),
        }
    }

    pub async fn save(&self, store: &InMemoryStore) -> Result<()> {
        let tables = store.snapshot()?;
        let bytes = serde_json::to_vec_pretty(&tables)?;
        self.storage.write_file(&self.file_name, &bytes).await?;
        tracing::info!(
            file = %self.file_name,
            enrollments = tables.enrollments.len(),
            "saved snapshot"
        );
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::adapters::local::LocalStorage;
    use crate::domain::model::{Course, EnrollmentStatus, NewEnrollment};
    use crate::domain::ports::EnrollmentStore;
    use chrono::Utc;
    use tempfile::TempDir;

    #[tokio::test]
    async fn test_snapshot_survives_restart() {
        let dir = TempDir::new().unwrap();
        let snapshot = SnapshotFile::new(LocalStorage::new(dir.path()), "registrar.json");
        assert!(snapshot.load().await.unwrap().is_none());

        let store = InMemoryStore::with_courses(vec![Course {
            id: 5,
            title: "Compilers".to_string(),
            capacity: 30,
            instructor_id: None,
        }]);
        store
            .insert(NewEnrollment {
                student_id: 1,
                course_id: 5,
                status: EnrollmentStatus::Waitlisted,
                created_at: Utc::now(),
            })
            .await
            .unwrap();
        snapshot.save(&store).await.unwrap();

        let tables = snapshot.load().await.unwrap().unwrap();
        assert_eq!(tables.courses[&5].title, "Compilers");
        assert_eq!(tables.enrollments[&1].status, EnrollmentStatus::Waitlisted);
        assert_eq!(tables.next_id, 2);
    }
}
