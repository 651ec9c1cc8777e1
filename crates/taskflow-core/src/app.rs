use anyhow::{Context, Result};
use std::path::Path;
use std::sync::Arc;

use crate::{AppError, Config};

/// Main application state and lifecycle manager
pub struct App {
    config: Arc<Config>,
}

impl App {
    /// Create a new application instance from the configuration at
    /// `config_path`, or the default location when `None`
    ///
    /// # Errors
    /// Returns `AppError::Config` if the configuration can't be loaded or is invalid.
    pub fn new(config_path: Option<&Path>) -> Result<Self, AppError> {
        let (config, _) = Config::load_validated(config_path)?;
        Ok(Self::with_config(config))
    }

    /// Create an application instance around an already loaded configuration
    pub fn with_config(config: Config) -> Self {
        Self {
            config: Arc::new(config),
        }
    }

    /// Prepare the data directory
    pub fn initialize(&mut self) -> Result<()> {
        std::fs::create_dir_all(&self.config.data_dir).with_context(|| {
            format!(
                "Failed to create data directory {}",
                self.config.data_dir.display()
            )
        })?;

        tracing::info!(
            data_dir = %self.config.data_dir.display(),
            "Application initialized successfully"
        );
        Ok(())
    }

    /// Shutdown the application
    pub fn shutdown(&mut self) -> Result<()> {
        tracing::info!("Shutting down application");
        Ok(())
    }

    /// Get reference to application config
    pub fn config(&self) -> &Config {
        &self.config
    }
}
