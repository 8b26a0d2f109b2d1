use std::fs;
use std::path::Path;

use kit_tsconfig::tsconfig::{alias_paths, include_globs, render};
use kit_tsconfig::{write_tsconfig, KitConfig, ValidatedConfig};
use tempfile::TempDir;

fn project(directories: &[&str]) -> TempDir {
    let root = tempfile::tempdir().unwrap();
    for directory in directories {
        fs::create_dir_all(root.path().join(directory)).unwrap();
    }
    root
}

fn default_config(cwd: &Path) -> ValidatedConfig {
    KitConfig::default().validate(cwd).unwrap()
}

fn check_paths(config: &ValidatedConfig, cwd: &Path, expected: &[(&str, &str)]) {
    let actual: Vec<(String, Vec<String>)> = alias_paths(config, cwd).into_iter().collect();
    let expected: Vec<(String, Vec<String>)> = expected
        .iter()
        .map(|(key, value)| (key.to_string(), vec![value.to_string()]))
        .collect();
    assert_eq!(actual, expected);
}

#[test]
fn include_shared_source_directory_once() {
    let root = project(&["src/routes", "src/lib"]);
    let config = default_config(root.path());

    assert_eq!(
        include_globs(&config, root.path()),
        vec![
            "../src/**/*.js",
            "../src/**/*.ts",
            "../src/**/*.svelte",
        ]
    );
}

#[test]
fn include_each_distinct_source_directory() {
    let root = project(&[]);
    let config = KitConfig {
        files: kit_tsconfig::config::FilesConfig {
            routes: String::from("app/routes"),
            lib: String::from("src/lib"),
        },
        ..KitConfig::default()
    }
    .validate(root.path())
    .unwrap();

    assert_eq!(
        include_globs(&config, root.path()),
        vec![
            "../app/**/*.js",
            "../app/**/*.ts",
            "../app/**/*.svelte",
            "../src/**/*.js",
            "../src/**/*.ts",
            "../src/**/*.svelte",
        ]
    );
}

#[test]
fn include_relative_to_nested_out_dir() {
    let root = project(&[]);
    let config = KitConfig {
        out_dir: String::from("build/.kit"),
        ..KitConfig::default()
    }
    .validate(root.path())
    .unwrap();

    assert_eq!(
        include_globs(&config, root.path()),
        vec![
            "../../src/**/*.js",
            "../../src/**/*.ts",
            "../../src/**/*.svelte",
        ]
    );
}

#[test]
fn paths_include_existing_lib() {
    let root = project(&["src/lib"]);
    let config = default_config(root.path());

    check_paths(
        &config,
        root.path(),
        &[("$lib", "src/lib"), ("$lib/*", "src/lib/*")],
    );
}

#[test]
fn paths_skip_missing_lib() {
    let root = project(&[]);
    let config = default_config(root.path());

    check_paths(&config, root.path(), &[]);
}

#[test]
fn paths_skip_missing_alias_targets() {
    let root = project(&["src/lib", "src/components"]);
    let config = default_config(root.path())
        .with_alias("$components", "src/components")
        .with_alias("$missing", "src/missing");

    check_paths(
        &config,
        root.path(),
        &[
            ("$lib", "src/lib"),
            ("$lib/*", "src/lib/*"),
            ("$components", "src/components"),
            ("$components/*", "src/components/*"),
        ],
    );
}

#[test]
fn paths_let_configured_lib_alias_replace_default() {
    let root = project(&["src/lib", "shared/lib"]);
    let config = default_config(root.path())
        .with_alias("$utils", "./shared/lib")
        .with_alias("$lib", "shared/lib");

    check_paths(
        &config,
        root.path(),
        &[
            ("$lib", "shared/lib"),
            ("$lib/*", "shared/lib/*"),
            ("$utils", "shared/lib"),
            ("$utils/*", "shared/lib/*"),
        ],
    );
}

#[test]
fn render_default_project() {
    let root = project(&["src/routes", "src/lib"]);
    let config = default_config(root.path());

    let expected = r#"{
	"compilerOptions": {
		"baseUrl": "..",
		"paths": {
			"$lib": [
				"src/lib"
			],
			"$lib/*": [
				"src/lib/*"
			]
		},
		"rootDirs": [
			"..",
			"./types"
		],
		"importsNotUsedAsValues": "error",
		"isolatedModules": true,
		"preserveValueImports": true,
		"lib": [
			"esnext",
			"DOM"
		],
		"moduleResolution": "node",
		"module": "esnext",
		"target": "esnext"
	},
	"include": [
		"../src/**/*.js",
		"../src/**/*.ts",
		"../src/**/*.svelte"
	],
	"exclude": [
		"../node_modules/**",
		"./**"
	]
}"#;

    assert_eq!(render(&config, root.path()).unwrap(), expected);
}

#[test]
fn render_empty_paths() {
    let root = project(&[]);
    let config = default_config(root.path());

    let rendered = render(&config, root.path()).unwrap();
    assert!(rendered.contains("\t\t\"paths\": {},\n"), "{}", rendered);
}

#[test]
fn write_creates_out_dir() {
    let root = project(&["src/lib"]);
    let config = default_config(root.path());

    let outcome = write_tsconfig(&config, root.path()).unwrap();

    assert_eq!(outcome.path, root.path().join(".svelte-kit/tsconfig.json"));
    assert!(outcome.written);
    assert!(outcome.warnings.is_empty());
    assert_eq!(
        fs::read_to_string(&outcome.path).unwrap(),
        render(&config, root.path()).unwrap()
    );
}

#[test]
fn write_is_noop_when_unchanged() {
    let root = project(&["src/lib"]);
    let config = default_config(root.path());

    assert!(write_tsconfig(&config, root.path()).unwrap().written);
    let first = fs::metadata(root.path().join(".svelte-kit/tsconfig.json"))
        .unwrap()
        .modified()
        .unwrap();

    let outcome = write_tsconfig(&config, root.path()).unwrap();
    assert!(!outcome.written);
    let second = fs::metadata(&outcome.path).unwrap().modified().unwrap();
    assert_eq!(first, second);
}

#[test]
fn write_again_after_config_change() {
    let root = project(&["src/lib", "src/components"]);
    let config = default_config(root.path());
    assert!(write_tsconfig(&config, root.path()).unwrap().written);

    let config = config.with_alias("$components", "src/components");
    let outcome = write_tsconfig(&config, root.path()).unwrap();

    assert!(outcome.written);
    assert!(fs::read_to_string(&outcome.path)
        .unwrap()
        .contains("\"$components/*\""));
}

#[test]
fn write_reports_user_config_warnings() {
    let root = project(&["src/lib"]);
    fs::write(root.path().join("tsconfig.json"), "{}").unwrap();
    let config = default_config(root.path());

    let outcome = write_tsconfig(&config, root.path()).unwrap();

    assert!(outcome.written);
    assert_eq!(outcome.warnings.len(), 1);
}
