use crate::domain::model::{Course, CourseId, UserId};
use crate::domain::ports::{AuthorizationPolicy, PolicyProvider};
use crate::utils::error::{RegistrarError, Result};
use crate::utils::validation::{self, Validate};
use regex::{Captures, Regex};
use serde::{Deserialize, Serialize};
use std::path::Path;
use std::sync::OnceLock;

pub const DEFAULT_BIND: &str = "0.0.0.0:8080";

#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct RegistrarConfig {
    #[serde(default)]
    pub server: ServerConfig,
    #[serde(default)]
    pub policy: PolicyConfig,
    pub storage: Option<StorageConfig>,
    #[serde(default)]
    pub courses: Vec<CourseEntry>,
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServerConfig {
    #[serde(default = "default_bind")]
    pub bind: String,
    #[serde(default = "default_cors_max_age")]
    pub cors_max_age_seconds: u64,
}

impl Default for ServerConfig {
    fn default() -> Self {
        Self {
            bind: default_bind(),
            cors_max_age_seconds: default_cors_max_age(),
        }
    }
}

fn default_bind() -> String {
    DEFAULT_BIND.to_string()
}

fn default_cors_max_age() -> u64 {
    60 * 60
}

/// Enrollment policy switches.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize)]
pub struct PolicyConfig {
    /// Let a student whose only records for a course are dropped enroll again.
    #[serde(default)]
    pub allow_reenroll_after_drop: bool,
    #[serde(default)]
    pub authorization: AuthorizationPolicy,
}

impl PolicyProvider for PolicyConfig {
    fn allow_reenroll_after_drop(&self) -> bool {
        self.allow_reenroll_after_drop
    }

    fn authorization(&self) -> AuthorizationPolicy {
        self.authorization
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct StorageConfig {
    pub data_dir: String,
    #[serde(default = "default_snapshot_file")]
    pub snapshot_file: String,
}

pub(crate) fn default_snapshot_file() -> String {
    "registrar.json".to_string()
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CourseEntry {
    pub id: CourseId,
    #[serde(default)]
    pub title: String,
    pub capacity: u32,
    pub instructor_id: Option<UserId>,
}

impl From<&CourseEntry> for Course {
    fn from(entry: &CourseEntry) -> Self {
        Course {
            id: entry.id,
            title: entry.title.clone(),
            capacity: entry.capacity,
            instructor_id: entry.instructor_id,
        }
    }
}

impl RegistrarConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self> {
        let content = std::fs::read_to_string(&path)?;
        Self::from_toml_str(&content)
    }

    pub fn from_toml_str(content: &str) -> Result<Self> {
        let processed_content = Self::substitute_env_vars(content);

        toml::from_str(&processed_content).map_err(|e| RegistrarError::ConfigError {
            message: format!("TOML parsing error: {}", e),
        })
    }

    /// Replaces `${VAR}` with the environment value. Unset variables are left as-is.
    fn substitute_env_vars(content: &str) -> String {
        static PATTERN: OnceLock<Regex> = OnceLock::new();
        let re = PATTERN.get_or_init(|| {
            Regex::new(r"\$\{([A-Za-z_][A-Za-z0-9_]*)\}").expect("static pattern compiles")
        });

        re.replace_all(content, |caps: &Captures| {
            let var_name = &caps[1];
            std::env::var(var_name).unwrap_or_else(|_| caps[0].to_string())
        })
        .into_owned()
    }

    pub fn catalog(&self) -> Vec<Course> {
        self.courses.iter().map(Course::from).collect()
    }
}

impl Validate for RegistrarConfig {
    fn validate(&self) -> Result<()> {
        validation::validate_bind_address("server.bind", &self.server.bind)?;

        if let Some(storage) = &self.storage {
            validation::validate_non_empty_string("storage.data_dir", &storage.data_dir)?;
            validation::validate_non_empty_string("storage.snapshot_file", &storage.snapshot_file)?;
        }

        validation::validate_unique_ids("courses.id", self.courses.iter().map(|c| c.id))?;
        for course in &self.courses {
            validation::validate_positive_number("courses.id", course.id, 1)?;
        }

        Ok(())
    }
}
