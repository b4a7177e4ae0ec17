//! Connection settings
//!
//! Stored next to the `migrations/` directory as `settings.json`:
//! ```text
//! /* THIS FILE GENERATED AUTOMATICALLY. ... */
//! {
//!     "host": "localhost",
//!     "user": "root",
//!     "password": "secret",
//!     "schema": "app"
//! }
//! ```

use std::fmt;
use std::path::{Path, PathBuf};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::domain::result::{Error, Result};

pub const SETTINGS_FILENAME: &str = "settings.json";

/// First line of every generated settings file
pub const SETTINGS_HEADER: &str =
    "/* THIS FILE GENERATED AUTOMATICALLY. USER DEFINED CHANGED MAY NOT BE SAVED AFTER REGENERATION! */";

/// Fields every settings file must carry, in the order they are checked
const REQUIRED_FIELDS: [&str; 4] = ["host", "user", "password", "schema"];

/// Database driver used to open a session
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Driver {
    #[default]
    Mysql,
    /// Embedded DuckDB; `schema` names the database file
    Duckdb,
}

impl Driver {
    fn is_default(&self) -> bool {
        *self == Driver::default()
    }
}

impl fmt::Display for Driver {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Driver::Mysql => f.write_str("mysql"),
            Driver::Duckdb => f.write_str("duckdb"),
        }
    }
}

impl FromStr for Driver {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "mysql" => Ok(Driver::Mysql),
            "duckdb" => Ok(Driver::Duckdb),
            other => Err(Error::config(format!(
                "Unknown driver \"{}\". Available: mysql, duckdb",
                other
            ))),
        }
    }
}

/// Database connection settings
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Settings {
    pub host: String,
    pub user: String,
    pub password: String,
    pub schema: String,
    #[serde(default, skip_serializing_if = "Driver::is_default")]
    pub driver: Driver,
}

impl Settings {
    pub fn new(
        host: impl Into<String>,
        user: impl Into<String>,
        password: impl Into<String>,
        schema: impl Into<String>,
    ) -> Self {
        Self {
            host: host.into(),
            user: user.into(),
            password: password.into(),
            schema: schema.into(),
            driver: Driver::default(),
        }
    }

    pub fn with_driver(mut self, driver: Driver) -> Self {
        self.driver = driver;
        self
    }

    /// Location of the settings file inside a project directory
    pub fn path(project_dir: &Path) -> PathBuf {
        project_dir.join(SETTINGS_FILENAME)
    }

    /// Load settings from the project directory
    pub fn load(project_dir: &Path) -> Result<Self> {
        let settings_path = Self::path(project_dir);
        if !settings_path.exists() {
            return Err(Error::ConfigMissing(PathBuf::from(SETTINGS_FILENAME)));
        }

        let content = std::fs::read_to_string(&settings_path)?;
        Self::parse(&content)
    }

    /// Parse settings file content, tolerating leading comments
    pub fn parse(content: &str) -> Result<Self> {
        let json: serde_json::Value = serde_json::from_str(strip_leading_comments(content))
            .map_err(|_| Error::config(format!("Invalid file format \"{}\"", SETTINGS_FILENAME)))?;

        let object = json.as_object().ok_or_else(|| {
            Error::config(format!("Invalid file format \"{}\"", SETTINGS_FILENAME))
        })?;

        for field in REQUIRED_FIELDS {
            match object.get(field) {
                None => {
                    return Err(Error::config(format!(
                        "\"{}\" doesn't contain \"{}\" field",
                        SETTINGS_FILENAME, field
                    )))
                }
                Some(value) if !value.is_string() => {
                    return Err(Error::config(format!(
                        "\"{}\" field \"{}\" must be a string",
                        SETTINGS_FILENAME, field
                    )))
                }
                Some(_) => {}
            }
        }

        serde_json::from_value(json).map_err(|e| Error::config(e.to_string()))
    }

    /// Write settings to the project directory, replacing any existing file
    pub fn save(&self, project_dir: &Path) -> Result<PathBuf> {
        let settings_path = Self::path(project_dir);
        std::fs::write(&settings_path, self.render()?)?;
        Ok(settings_path)
    }

    /// Header line followed by the settings pretty-printed with 4-space indentation
    fn render(&self) -> Result<Vec<u8>> {
        let mut content = format!("{}\n", SETTINGS_HEADER).into_bytes();
        let formatter = serde_json::ser::PrettyFormatter::with_indent(b"    ");
        let mut serializer = serde_json::Serializer::with_formatter(&mut content, formatter);
        self.serialize(&mut serializer)?;
        content.push(b'\n');
        Ok(content)
    }

    /// Database file for the DuckDB driver; relative paths resolve against
    /// the project directory
    pub fn duckdb_path(&self, project_dir: &Path) -> PathBuf {
        let path = Path::new(&self.schema);
        if path.is_absolute() {
            path.to_path_buf()
        } else {
            project_dir.join(path)
        }
    }
}

/// Skip whitespace, `/* */` blocks and `//` lines preceding the JSON document
fn strip_leading_comments(content: &str) -> &str {
    let mut rest = content.trim_start();
    loop {
        if let Some(after) = rest.strip_prefix("/*") {
            match after.find("*/") {
                Some(end) => rest = after[end + 2..].trim_start(),
                None => return "",
            }
        } else if let Some(after) = rest.strip_prefix("//") {
            match after.find('\n') {
                Some(end) => rest = after[end + 1..].trim_start(),
                None => return "",
            }
        } else {
            return rest;
        }
    }
}
