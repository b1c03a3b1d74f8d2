//! Configuration for a pipeline run.
use config::Config;
use config::ConfigError;
use config::Environment;
use config::File;
use serde::Deserialize;
use std::path::Path;
use std::path::PathBuf;

use crate::error::Result;

/// Trait for validating configuration values.
trait Validatable {
    /// Validate the configuration values.
    fn validate(&self, cfg: &Settings) -> std::result::Result<(), ConfigError>;
}

/// Top-level configuration.
#[derive(Deserialize, Clone, Debug)]
pub struct Settings {
    /// Input and output locations.
    pub files: FilesConfig,
}

/// Paths read and written by the pipeline.
#[derive(Deserialize, Clone, Debug)]
pub struct FilesConfig {
    /// Changelog of `INSERT`/`PATCH`/`DELETE` lines.
    pub changelog: PathBuf,
    /// `SEARCH` query lines.
    pub searches: PathBuf,
    /// Materialized live records, one JSON object per line.
    pub output: PathBuf,
    /// Search hits followed by the comparison counters.
    pub report: PathBuf,
}

impl Validatable for FilesConfig {
    fn validate(&self, _: &Settings) -> std::result::Result<(), ConfigError> {
        let paths = [
            ("files.changelog", &self.changelog),
            ("files.searches", &self.searches),
            ("files.output", &self.output),
            ("files.report", &self.report),
        ];
        for (key, path) in paths {
            if path.as_os_str().is_empty() {
                return Err(ConfigError::Message(format!("`{key}` must not be empty")));
            }
        }
        if self.output == self.report {
            return Err(ConfigError::Message(
                "`files.output` and `files.report` must differ".to_string(),
            ));
        }
        if self.output == self.changelog || self.report == self.changelog {
            return Err(ConfigError::Message(
                "the changelog must not be overwritten by an output".to_string(),
            ));
        }
        Ok(())
    }
}

impl Settings {
    /// Load settings from defaults, an optional file, then the environment.
    ///
    /// Environment keys look like `INVENTORY_CODEC_FILES__OUTPUT`:
    ///
    /// ```text
    /// INVENTORY_CODEC_FILES__OUTPUT
    ///    │           │    └ separator("__")
    ///    │           └ prefix_separator("_")
    ///    └ with_prefix("INVENTORY_CODEC")
    /// ```
    ///
    /// # Errors
    /// `Config` when a source cannot be read or a value fails validation.
    pub fn new(config_path: Option<impl AsRef<Path>>) -> Result<Self> {
        let env = Environment::with_prefix("INVENTORY_CODEC")
            .prefix_separator("_")
            .separator("__");

        let mut cfg_builder = Config::builder();
        cfg_builder = cfg_builder.set_default("files.changelog", "Ejemplo_lab01_books.csv")?;
        cfg_builder = cfg_builder.set_default("files.searches", "Ejemplo_lab01_search.csv")?;
        cfg_builder = cfg_builder.set_default("files.output", "output.txt")?;
        cfg_builder = cfg_builder.set_default("files.report", "final.txt")?;

        if let Some(path) = config_path {
            cfg_builder = cfg_builder.add_source(File::from(path.as_ref()));
        }
        cfg_builder = cfg_builder.add_source(env);

        let cfg = cfg_builder.build()?;

        let settings: Settings = cfg.try_deserialize()?;

        settings.validate()?;

        Ok(settings)
    }

    /// Perform validation on the configuration.
    fn validate(&self) -> std::result::Result<(), ConfigError> {
        self.files.validate(self)?;
        Ok(())
    }
}
