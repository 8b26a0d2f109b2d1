use std::path::{Component, Path, PathBuf, MAIN_SEPARATOR};

/// Join `path` onto `base` (unless `path` is already absolute) and lexically
/// normalize the result. The filesystem is never consulted, so symlinks are
/// not followed.
pub fn resolve(base: &Path, path: &Path) -> PathBuf {
    normalize(&base.join(path))
}

fn normalize(path: &Path) -> PathBuf {
    let mut normalized = PathBuf::new();
    for component in path.components() {
        match component {
            Component::Prefix(_) | Component::RootDir => normalized.push(component),
            Component::CurDir => {}
            Component::ParentDir => match normalized.components().next_back() {
                Some(Component::Normal(_)) => {
                    normalized.pop();
                }
                // `/..` is `/`
                Some(Component::RootDir) | Some(Component::Prefix(_)) => {}
                _ => normalized.push(".."),
            },
            Component::Normal(name) => normalized.push(name),
        }
    }
    normalized
}

/// Calculate the path to `to` relative to the directory `from`.
///
/// Both paths are normalized first. When they share no common root (say,
/// two Windows drives) `to` is returned unchanged. Identical paths produce
/// an empty path.
pub fn relative(from: &Path, to: &Path) -> PathBuf {
    let from = normalize(from);
    let to = normalize(to);

    let mut from_components = from.components().peekable();
    let mut to_components = to.components().peekable();

    if from.has_root() != to.has_root() {
        return to;
    }

    // Skip the shared ancestors
    while let (Some(a), Some(b)) = (from_components.peek(), to_components.peek()) {
        if a != b {
            break;
        }
        from_components.next();
        to_components.next();
    }

    if matches!(to_components.peek(), Some(Component::Prefix(_)))
        || matches!(from_components.peek(), Some(Component::Prefix(_)))
    {
        return to;
    }

    let mut relative_path = PathBuf::new();
    for _ in from_components {
        relative_path.push("..");
    }
    for component in to_components {
        relative_path.push(component);
    }
    relative_path
}

/// Render `path` with forward slashes, the separator TypeScript expects
/// inside tsconfig.json.
pub fn posixify(path: &Path) -> String {
    let path = path.to_string_lossy();
    if MAIN_SEPARATOR == '\\' {
        path.replace('\\', "/")
    } else {
        path.into_owned()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn resolve_joins_relative_paths() {
        assert_eq!(
            resolve(Path::new("/project"), Path::new("src/lib")),
            PathBuf::from("/project/src/lib")
        );
    }

    #[test]
    fn resolve_keeps_absolute_paths() {
        assert_eq!(
            resolve(Path::new("/project"), Path::new("/elsewhere/lib")),
            PathBuf::from("/elsewhere/lib")
        );
    }

    #[test]
    fn resolve_collapses_dots() {
        assert_eq!(
            resolve(Path::new("/project"), Path::new("./.svelte-kit/../src/./lib")),
            PathBuf::from("/project/src/lib")
        );
        assert_eq!(
            resolve(Path::new("/"), Path::new("../../lib")),
            PathBuf::from("/lib")
        );
    }

    #[test]
    fn relative_to_child() {
        assert_eq!(
            relative(Path::new("/project"), Path::new("/project/src/lib")),
            PathBuf::from("src/lib")
        );
    }

    #[test]
    fn relative_to_sibling() {
        assert_eq!(
            relative(
                Path::new("/project/.svelte-kit"),
                Path::new("/project/src/**/*.ts")
            ),
            PathBuf::from("../src/**/*.ts")
        );
    }

    #[test]
    fn relative_to_ancestor() {
        assert_eq!(
            relative(Path::new("/project/.svelte-kit"), Path::new("/project")),
            PathBuf::from("..")
        );
    }

    #[test]
    fn relative_to_self_is_empty() {
        assert_eq!(
            relative(Path::new("/project"), Path::new("/project/.")),
            PathBuf::new()
        );
    }

    #[test]
    fn posixify_unix_path() {
        assert_eq!(posixify(Path::new("src/lib")), "src/lib");
    }
}
