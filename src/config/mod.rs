pub mod toml_config;

pub use toml_config::{PolicyConfig, RegistrarConfig};

#[cfg(feature = "cli")]
use crate::domain::ports::AuthorizationPolicy;
#[cfg(feature = "cli")]
use crate::utils::error::Result;
#[cfg(feature = "cli")]
use clap::Parser;

#[cfg(feature = "cli")]
#[derive(Debug, Clone, Parser)]
#[command(name = "course-registrar")]
#[command(about = "Course enrollment service with capacity and waitlist handling")]
pub struct CliConfig {
    /// Path to a TOML configuration file
    #[arg(short, long)]
    pub config: Option<String>,

    /// Address to listen on, overrides `server.bind`
    #[arg(long)]
    pub bind: Option<String>,

    /// Directory for store snapshots, overrides `storage.data_dir`
    #[arg(long)]
    pub data_dir: Option<String>,

    /// Let students re-enroll in a course they dropped
    #[arg(long)]
    pub allow_reenroll_after_drop: bool,

    /// Who may change an enrollment's status: `open` or `scoped`
    #[arg(long)]
    pub authorization: Option<AuthorizationPolicy>,

    #[arg(short, long, help = "Enable verbose output")]
    pub verbose: bool,

    #[arg(long, help = "Emit logs as JSON lines")]
    pub json_logs: bool,
}

#[cfg(feature = "cli")]
impl CliConfig {
    /// Loads the file config (or defaults) and applies command-line overrides.
    pub fn resolve(&self) -> Result<RegistrarConfig> {
        let mut config = match &self.config {
            Some(path) => RegistrarConfig::from_file(path)?,
            None => RegistrarConfig::default(),
        };

        if let Some(bind) = &self.bind {
            config.server.bind = bind.clone();
        }
        if let Some(data_dir) = &self.data_dir {
            match config.storage.as_mut() {
                Some(storage) => storage.data_dir = data_dir.clone(),
                None => {
                    config.storage = Some(toml_config::StorageConfig {
                        data_dir: data_dir.clone(),
                        snapshot_file: toml_config::default_snapshot_file(),
                    })
                }
            }
        }
        if self.allow_reenroll_after_drop {
            config.policy.allow_reenroll_after_drop = true;
        }
        if let Some(authorization) = self.authorization {
            config.policy.authorization = authorization;
        }

        Ok(config)
    }
}
