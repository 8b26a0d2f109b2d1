//! Best-effort checks that the user's own tsconfig.json or jsconfig.json
//! builds on the generated configuration.

use std::{
    fmt::Display,
    io::{self, Write},
    path::{Path, PathBuf},
};

use indexmap::IndexMap;
use log::trace;
use serde::Deserialize;

use crate::{
    config::ValidatedConfig,
    error::Error,
    io::read_json5_from_file,
    path::{posixify, relative, resolve},
};

/// Candidate user config files, in order of preference.
const USER_CONFIG_FILES: [&str; 2] = ["tsconfig.json", "jsconfig.json"];

#[derive(Debug, Deserialize)]
#[serde(untagged)]
enum Extends {
    One(String),
    Many(Vec<String>),
}

impl Extends {
    fn iter(&self) -> impl Iterator<Item = &str> {
        let slice: &[String] = match self {
            Extends::One(extend) => std::slice::from_ref(extend),
            Extends::Many(extends) => extends,
        };
        slice.iter().map(String::as_str)
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserCompilerOptions {
    #[serde(default)]
    paths: Option<IndexMap<String, Vec<String>>>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct UserConfig {
    #[serde(default)]
    extends: Option<Extends>,
    #[serde(default)]
    compiler_options: Option<UserCompilerOptions>,
}

/// A misconfiguration found in the user's config file. Warnings are
/// advisory: they are reported, never fatal.
#[derive(Clone, Debug, PartialEq, Eq)]
pub enum Warning {
    /// The user file does not extend the generated tsconfig.json.
    ShouldExtend {
        /// File name of the user config, `tsconfig.json` or `jsconfig.json`
        kind: String,
        /// Project-relative path the user file should extend
        extends: String,
    },
    /// The user file overrides `compilerOptions.paths` without re-declaring
    /// the `$lib` aliases.
    MissingLibPaths {
        kind: String,
        /// Project-relative path of the lib directory
        lib: String,
    },
}

impl Warning {
    pub fn headline(&self) -> String {
        match self {
            Warning::ShouldExtend { kind, .. } => format!(
                "Your {} should extend the configuration generated by SvelteKit:",
                kind
            ),
            Warning::MissingLibPaths { kind, .. } => format!(
                "Your compilerOptions.paths in {} should include the following:",
                kind
            ),
        }
    }

    /// The JSON snippet that fixes the problem.
    pub fn suggestion(&self) -> String {
        match self {
            Warning::ShouldExtend { extends, .. } => {
                format!("{{\n  \"extends\": \"{}\"\n}}", extends)
            }
            Warning::MissingLibPaths { lib, .. } => format!(
                "{{\n  \"$lib\":[\"{lib}\"],\n  \"$lib/*\":[\"{lib}/*\"]\n}}",
                lib = lib
            ),
        }
    }
}

impl Display for Warning {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "{}", self.headline())?;
        write!(f, "{}", self.suggestion())
    }
}

/// Print every warning to `writer`, separated by blank lines.
pub fn write_warnings<W: Write>(mut writer: W, warnings: &[Warning]) -> io::Result<()> {
    for (index, warning) in warnings.iter().enumerate() {
        if index > 0 {
            writeln!(writer)?;
        }
        writeln!(writer, "{}", warning)?;
    }
    Ok(())
}

/// Locate the user's config file in the project root, preferring
/// tsconfig.json over jsconfig.json.
pub fn find_user_config(cwd: &Path) -> Option<PathBuf> {
    USER_CONFIG_FILES
        .iter()
        .map(|name| cwd.join(name))
        .find(|path| path.is_file())
}

/// Inspect `user_file` and report how it deviates from what the generated
/// tsconfig at `out` expects.
///
/// - `cwd` is the project root, relative `extends` and `paths` entries are
///   resolved against it
/// - `out` is the absolute path of the generated tsconfig.json
pub fn validate(
    config: &ValidatedConfig,
    cwd: &Path,
    out: &Path,
    user_file: &Path,
) -> Result<Vec<Warning>, Error> {
    let user_config: UserConfig = read_json5_from_file(user_file)?;
    let out = resolve(cwd, out);
    trace!("{:?}: {:?}", user_file, user_config);

    let kind = user_file
        .file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| posixify(user_file));

    let extends_generated_config = user_config.extends.as_ref().map_or(false, |extends| {
        extends
            .iter()
            .any(|extend| resolve(cwd, Path::new(extend)) == out)
    });

    let mut warnings = Vec::new();

    if !extends_generated_config {
        let mut extends = posixify(&relative(cwd, &out));
        if !extends.starts_with("./") {
            extends.insert_str(0, "./");
        }
        warnings.push(Warning::ShouldExtend { kind, extends });
        return Ok(warnings);
    }

    let user_paths = user_config
        .compiler_options
        .and_then(|compiler_options| compiler_options.paths);

    if let Some(user_paths) = user_paths {
        if config.files.lib.exists() && is_missing_lib_paths(&user_paths, cwd, &config.files.lib) {
            warnings.push(Warning::MissingLibPaths {
                kind,
                lib: posixify(&relative(cwd, &config.files.lib)),
            });
        }
    }

    Ok(warnings)
}

fn is_missing_lib_paths(user_paths: &IndexMap<String, Vec<String>>, cwd: &Path, lib: &Path) -> bool {
    let maps_to = |key: &str, target: &Path| -> bool {
        user_paths.get(key).map_or(false, |entries| {
            entries
                .iter()
                .any(|entry| resolve(cwd, Path::new(entry)) == target)
        })
    };

    !maps_to("$lib", lib) || !maps_to("$lib/*", &lib.join("*"))
}
