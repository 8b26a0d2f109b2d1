use std::path::{Path, PathBuf};

use indexmap::{IndexMap, IndexSet};
use log::{debug, trace};
use serde::Serialize;

use crate::{
    config::ValidatedConfig,
    error::Error,
    io::write_if_changed,
    path::{posixify, relative, resolve},
    validate::{find_user_config, validate, Warning},
};

/// File name of the generated configuration inside `outDir`.
pub const TSCONFIG_FILE: &str = "tsconfig.json";

const INCLUDE_EXTENSIONS: [&str; 3] = ["js", "ts", "svelte"];

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct CompilerOptions {
    // generated options
    base_url: String,
    paths: IndexMap<String, Vec<String>>,
    root_dirs: Vec<String>,

    // required by the component preprocessor and per-module compilation
    imports_not_used_as_values: &'static str,
    isolated_modules: bool,
    /// Requires TypeScript 4.5 or later
    preserve_value_imports: bool,

    // defaults the user may override
    lib: [&'static str; 2],
    module_resolution: &'static str,
    module: &'static str,
    target: &'static str,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
struct GeneratedTsconfig {
    compiler_options: CompilerOptions,
    include: Vec<String>,
    exclude: Vec<String>,
}

/// The result of one generation pass.
#[derive(Debug)]
pub struct Outcome {
    /// Absolute path of the generated tsconfig.json
    pub path: PathBuf,
    /// Whether the file on disk was (re)written
    pub written: bool,
    /// Problems found in the user's tsconfig.json or jsconfig.json
    pub warnings: Vec<Warning>,
}

/// Paths relative to the project root and to the output directory, rendered
/// with forward slashes.
struct Relativize<'a> {
    cwd: &'a Path,
    out_dir: &'a Path,
}

impl<'a> Relativize<'a> {
    fn new(config: &'a ValidatedConfig, cwd: &'a Path) -> Self {
        Self {
            cwd,
            out_dir: &config.out_dir,
        }
    }

    fn project(&self, path: &Path) -> String {
        posixify(&relative(self.cwd, &resolve(self.cwd, path)))
    }

    fn config(&self, path: &Path) -> String {
        posixify(&relative(self.out_dir, &resolve(self.cwd, path)))
    }
}

/// The path to the generated tsconfig.json.
pub fn output_path(config: &ValidatedConfig) -> PathBuf {
    config.out_dir.join(TSCONFIG_FILE)
}

/// Include globs, relative to `outDir`, covering JavaScript, TypeScript and
/// Svelte sources in the parent directories of the routes and lib folders.
pub fn include_globs(config: &ValidatedConfig, cwd: &Path) -> Vec<String> {
    let relativize = Relativize::new(config, cwd);

    let dirs: IndexSet<String> = [&config.files.routes, &config.files.lib]
        .into_iter()
        .map(|dir| relativize.project(dir.parent().unwrap_or(dir.as_path())))
        .collect();
    trace!("source directories: {:?}", dirs);

    let relativize = &relativize;
    dirs.iter()
        .flat_map(|dir| {
            INCLUDE_EXTENSIONS.iter().map(move |extension| {
                relativize.config(&Path::new(dir).join("**").join(format!("*.{}", extension)))
            })
        })
        .collect()
}

/// `compilerOptions.paths` for `$lib` and every configured alias whose
/// target exists on disk. Each alias maps both the bare prefix and its
/// `/*` wildcard form.
pub fn alias_paths(config: &ValidatedConfig, cwd: &Path) -> IndexMap<String, Vec<String>> {
    let relativize = Relativize::new(config, cwd);

    let mut aliases: IndexMap<&str, String> = IndexMap::new();
    aliases.insert("$lib", relativize.project(&config.files.lib));
    for (key, value) in &config.alias {
        aliases.insert(key.as_str(), value.clone());
    }

    let mut paths = IndexMap::new();
    for (key, value) in aliases {
        let target = resolve(cwd, Path::new(&value));
        if !target.exists() {
            debug!("skipping alias {:?}, {:?} does not exist", key, target);
            continue;
        }
        let target = relativize.project(&target);
        paths.insert(key.to_owned(), vec![target.clone()]);
        paths.insert(format!("{}/*", key), vec![format!("{}/*", target)]);
    }
    paths
}

/// Render the generated tsconfig.json, tab-indented.
pub fn render(config: &ValidatedConfig, cwd: &Path) -> Result<String, serde_json::Error> {
    let relativize = Relativize::new(config, cwd);
    let project_root = relativize.config(cwd);

    let tsconfig = GeneratedTsconfig {
        compiler_options: CompilerOptions {
            base_url: project_root.clone(),
            paths: alias_paths(config, cwd),
            root_dirs: vec![project_root, String::from("./types")],
            imports_not_used_as_values: "error",
            isolated_modules: true,
            preserve_value_imports: true,
            lib: ["esnext", "DOM"],
            module_resolution: "node",
            module: "esnext",
            target: "esnext",
        },
        include: include_globs(config, cwd),
        exclude: vec![
            relativize.config(&cwd.join("node_modules").join("**")),
            String::from("./**"),
        ],
    };

    let mut buffer = Vec::new();
    let formatter = serde_json::ser::PrettyFormatter::with_indent(b"\t");
    let mut serializer = serde_json::Serializer::with_formatter(&mut buffer, formatter);
    tsconfig.serialize(&mut serializer)?;
    // serde_json only emits UTF-8
    Ok(String::from_utf8_lossy(&buffer).into_owned())
}

/// Check the user's tsconfig.json or jsconfig.json, if the project has one,
/// without writing anything. Reporting the warnings is up to the caller.
pub fn check(config: &ValidatedConfig, cwd: &Path) -> Result<Vec<Warning>, Error> {
    let warnings = match find_user_config(cwd) {
        Some(user_file) => {
            debug!("validating {:?}", user_file);
            validate(config, cwd, &output_path(config), &user_file)?
        }
        None => {
            debug!("no tsconfig.json or jsconfig.json in {:?}", cwd);
            Vec::new()
        }
    };
    for warning in &warnings {
        debug!("{}", warning);
    }
    Ok(warnings)
}

/// Write the tsconfig.json that the user's own config extends into
/// `config.out_dir`, first checking the user's config for mistakes.
///
/// - `cwd` is the absolute path of the project root
///
/// The file is left untouched when its contents would not change.
pub fn write_tsconfig(config: &ValidatedConfig, cwd: &Path) -> Result<Outcome, Error> {
    let warnings = check(config, cwd)?;

    let path = output_path(config);
    let written = write_if_changed(&path, &render(config, cwd)?)?;

    Ok(Outcome {
        path,
        written,
        warnings,
    })
}
