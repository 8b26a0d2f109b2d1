//! Project configuration: the raw, user-authored `kit.config.json` and the
//! validated form consumed by tsconfig generation.

use std::{
    error::Error,
    fmt::Display,
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::{debug, trace};
use serde::Deserialize;

use crate::{
    error::Error as KitError,
    io::{read_json_from_file, FromFileError},
    path::resolve,
};

/// Conventional name of the project configuration file.
pub const CONFIG_FILE: &str = "kit.config.json";

const DEFAULT_OUT_DIR: &str = ".svelte-kit";
const DEFAULT_ROUTES: &str = "src/routes";
const DEFAULT_LIB: &str = "src/lib";

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase", default)]
pub struct KitConfig {
    pub out_dir: String,
    pub files: FilesConfig,
    pub alias: IndexMap<String, String>,
}

impl Default for KitConfig {
    fn default() -> Self {
        Self {
            out_dir: DEFAULT_OUT_DIR.to_owned(),
            files: FilesConfig::default(),
            alias: IndexMap::new(),
        }
    }
}

#[derive(Clone, Debug, Deserialize, PartialEq, Eq)]
#[serde(default)]
pub struct FilesConfig {
    pub routes: String,
    pub lib: String,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            routes: DEFAULT_ROUTES.to_owned(),
            lib: DEFAULT_LIB.to_owned(),
        }
    }
}

#[derive(Debug)]
#[non_exhaustive]
pub struct ValidationError {
    kind: ValidationErrorKind,
}

impl ValidationError {
    pub fn kind(&self) -> &ValidationErrorKind {
        &self.kind
    }
}

impl Display for ValidationError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match &self.kind {
            ValidationErrorKind::EmptyPath { option } => {
                write!(f, "config.{} must not be empty", option)
            }
            ValidationErrorKind::EmptyAliasKey => write!(f, "config.alias keys must not be empty"),
            ValidationErrorKind::AliasKeyTrailingSlash { key } => write!(
                f,
                "config.alias key {:?} must not end in \"/\" or \"/*\", the wildcard form is generated automatically",
                key
            ),
            ValidationErrorKind::EmptyAliasValue { key } => {
                write!(f, "config.alias[{:?}] must not be empty", key)
            }
        }
    }
}

impl Error for ValidationError {}

#[derive(Debug, PartialEq, Eq)]
pub enum ValidationErrorKind {
    #[non_exhaustive]
    EmptyPath { option: &'static str },
    EmptyAliasKey,
    #[non_exhaustive]
    AliasKeyTrailingSlash { key: String },
    #[non_exhaustive]
    EmptyAliasValue { key: String },
}

impl From<ValidationErrorKind> for ValidationError {
    fn from(kind: ValidationErrorKind) -> Self {
        Self { kind }
    }
}

impl KitConfig {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, FromFileError> {
        read_json_from_file(path)
    }

    /// Check option values and resolve every directory against the project
    /// root `cwd`.
    pub fn validate(self, cwd: &Path) -> Result<ValidatedConfig, ValidationError> {
        let directory = |option: &'static str, value: &str| -> Result<PathBuf, ValidationError> {
            if value.trim().is_empty() {
                return Err(ValidationErrorKind::EmptyPath { option }.into());
            }
            Ok(resolve(cwd, Path::new(value)))
        };

        let out_dir = directory("outDir", &self.out_dir)?;
        let routes = directory("files.routes", &self.files.routes)?;
        let lib = directory("files.lib", &self.files.lib)?;

        for (key, value) in &self.alias {
            if key.is_empty() {
                return Err(ValidationErrorKind::EmptyAliasKey.into());
            }
            if key.ends_with('/') || key.ends_with("/*") {
                return Err(ValidationErrorKind::AliasKeyTrailingSlash {
                    key: key.to_owned(),
                }
                .into());
            }
            if value.trim().is_empty() {
                return Err(ValidationErrorKind::EmptyAliasValue {
                    key: key.to_owned(),
                }
                .into());
            }
        }

        let config = ValidatedConfig {
            out_dir,
            files: Files { routes, lib },
            alias: self.alias,
        };
        debug!("validated config: {:?}", config);
        Ok(config)
    }
}

/// Configuration with every directory resolved to an absolute path.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct ValidatedConfig {
    pub out_dir: PathBuf,
    pub files: Files,
    /// Alias values exactly as written, resolved against the project root
    /// when the tsconfig is generated.
    pub alias: IndexMap<String, String>,
}

#[derive(Clone, Debug, PartialEq, Eq)]
pub struct Files {
    pub routes: PathBuf,
    pub lib: PathBuf,
}

impl ValidatedConfig {
    pub fn new(out_dir: PathBuf, routes: PathBuf, lib: PathBuf) -> Self {
        Self {
            out_dir,
            files: Files { routes, lib },
            alias: IndexMap::new(),
        }
    }

    pub fn with_alias<K, V>(mut self, key: K, value: V) -> Self
    where
        K: Into<String>,
        V: Into<String>,
    {
        self.alias.insert(key.into(), value.into());
        self
    }

    /// Read `config_file` and validate it against the project root `cwd`.
    pub fn load<P: AsRef<Path>>(config_file: P, cwd: &Path) -> Result<Self, KitError> {
        let config = KitConfig::from_file(config_file)?.validate(cwd)?;
        Ok(config)
    }

    /// Determine the project root and its configuration, starting from the
    /// absolute directory `cwd`.
    ///
    /// - an explicit `config_file` (relative to `cwd`) is loaded and `cwd`
    ///   stays the project root
    /// - otherwise the nearest [`CONFIG_FILE`] in `cwd` or one of its
    ///   ancestors is loaded, and its directory becomes the project root
    /// - with no config file anywhere, defaults apply with `cwd` as the root
    pub fn discover(cwd: &Path, config_file: Option<&Path>) -> Result<(PathBuf, Self), KitError> {
        if let Some(config_file) = config_file {
            let config_file = resolve(cwd, config_file);
            let config = Self::load(&config_file, cwd)?;
            return Ok((cwd.to_owned(), config));
        }

        match find_config_file(cwd) {
            Some(config_file) => {
                let project_root = config_file
                    .parent()
                    .map(ToOwned::to_owned)
                    .unwrap_or_else(|| cwd.to_owned());
                debug!("using {:?}, project root {:?}", config_file, project_root);
                let config = Self::load(&config_file, &project_root)?;
                Ok((project_root, config))
            }
            None => {
                debug!("no {} above {:?}, using defaults", CONFIG_FILE, cwd);
                let config = KitConfig::default().validate(cwd)?;
                Ok((cwd.to_owned(), config))
            }
        }
    }
}

fn find_config_file(starting_from: &Path) -> Option<PathBuf> {
    starting_from
        .ancestors()
        .map(|directory| directory.join(CONFIG_FILE))
        .inspect(|candidate| trace!("looking for {:?}", candidate))
        .find(|candidate| candidate.is_file())
}
