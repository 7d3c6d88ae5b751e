//! Driver configuration loaded from TOML.
//!
//! ```toml
//! [database]
//! driver = "sqlite"
//! path = "data/blog.sqlite3"
//! log_sql = true
//! ```

use serde::Deserialize;
use std::path::{Path, PathBuf};

use crate::driver::{Driver, SqliteDriver};
use crate::error::{OrmError, OrmResult};

/// Path that selects a private in-memory SQLite database.
pub const IN_MEMORY: &str = ":memory:";

#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum DriverKind {
    Sqlite,
}

#[derive(Debug, Clone, Deserialize)]
struct ConfigFile {
    database: DatabaseConfig,
}

#[derive(Debug, Clone, Deserialize)]
pub struct DatabaseConfig {
    pub driver: DriverKind,
    pub path: Option<String>,
    /// Wrap the driver in [`TracingDriver`](crate::TracingDriver).
    #[serde(default)]
    pub log_sql: bool,
    /// Directory relative paths are resolved against (the config file's).
    #[serde(skip)]
    pub base_dir: Option<PathBuf>,
}

impl DatabaseConfig {
    /// Parse the `[database]` table of a TOML document.
    pub fn from_toml_str(raw: &str) -> OrmResult<Self> {
        let file: ConfigFile = toml::from_str(raw)
            .map_err(|e| OrmError::config(format!("failed to parse config: {e}")))?;
        Ok(file.database)
    }

    /// Read and parse a config file. Relative database paths are taken
    /// relative to the file's directory.
    pub fn load(config_path: impl AsRef<Path>) -> OrmResult<Self> {
        let config_path = config_path.as_ref();
        let raw = std::fs::read_to_string(config_path).map_err(|e| {
            OrmError::config(format!(
                "failed to read config file {}: {e}",
                config_path.display()
            ))
        })?;
        let mut config = Self::from_toml_str(&raw)?;
        config.base_dir = Some(
            config_path
                .parent()
                .unwrap_or_else(|| Path::new("."))
                .to_path_buf(),
        );
        Ok(config)
    }

    /// Database location, resolved against `base_dir` when relative.
    pub fn resolved_path(&self) -> OrmResult<PathBuf> {
        let path = self
            .path
            .as_deref()
            .filter(|p| !p.trim().is_empty())
            .ok_or_else(|| OrmError::config("sqlite driver requires a `path`"))?;
        let path = Path::new(path);
        Ok(match &self.base_dir {
            Some(dir) if path.is_relative() && path != Path::new(IN_MEMORY) => dir.join(path),
            _ => path.to_path_buf(),
        })
    }
}

/// Open the driver described by `config`.
pub fn connect(config: &DatabaseConfig) -> OrmResult<Box<dyn Driver>> {
    let driver = match config.driver {
        DriverKind::Sqlite => {
            let path = config.resolved_path()?;
            if path == Path::new(IN_MEMORY) {
                SqliteDriver::open_in_memory()?
            } else {
                SqliteDriver::open(&path)?
            }
        }
    };

    #[cfg(feature = "tracing")]
    let driver: Box<dyn Driver> = if config.log_sql {
        Box::new(crate::driver::TracingDriver::new(driver))
    } else {
        Box::new(driver)
    };
    #[cfg(not(feature = "tracing"))]
    let driver: Box<dyn Driver> = Box::new(driver);

    Ok(driver)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::Query;

    #[test]
    fn parses_database_table() {
        let config = DatabaseConfig::from_toml_str(
            r#"
            [database]
            driver = "sqlite"
            path = ":memory:"
            log_sql = true
            "#,
        )
        .unwrap();
        assert_eq!(config.driver, DriverKind::Sqlite);
        assert_eq!(config.path.as_deref(), Some(IN_MEMORY));
        assert!(config.log_sql);
    }

    #[test]
    fn unknown_driver_is_rejected() {
        let err = DatabaseConfig::from_toml_str(
            r#"
            [database]
            driver = "oracle"
            path = "x"
            "#,
        )
        .unwrap_err();
        assert!(matches!(err, OrmError::Config(_)));
    }

    #[test]
    fn missing_path_is_a_config_error() {
        let config = DatabaseConfig::from_toml_str("[database]\ndriver = \"sqlite\"\n").unwrap();
        assert!(!config.log_sql);
        let err = connect(&config).err().unwrap();
        assert!(matches!(err, OrmError::Config(_)));
    }

    #[test]
    fn relative_paths_follow_the_config_file() {
        let mut config =
            DatabaseConfig::from_toml_str("[database]\ndriver = \"sqlite\"\npath = \"db.sqlite3\"\n")
                .unwrap();
        config.base_dir = Some(PathBuf::from("/srv/app"));
        assert_eq!(
            config.resolved_path().unwrap(),
            PathBuf::from("/srv/app/db.sqlite3")
        );
    }

    #[test]
    fn connect_in_memory() {
        let config = DatabaseConfig::from_toml_str(
            "[database]\ndriver = \"sqlite\"\npath = \":memory:\"\nlog_sql = true\n",
        )
        .unwrap();
        let driver = connect(&config).unwrap();
        driver
            .execute("CREATE TABLE t (id INTEGER PRIMARY KEY)", &Default::default())
            .unwrap();
        let mut q = Query::new();
        q.insert_into("t").unwrap().values(vec![("id", 7)]).unwrap();
        assert_eq!(q.execute(&driver).unwrap(), 1);
        assert_eq!(driver.last_insert_id().unwrap(), 7);
    }
}
