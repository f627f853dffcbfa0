use std::{
    env,
    path::{Component, Path, PathBuf},
};

use tracing::debug;

/// Environment variable naming a directory searched before relative imports.
pub const PACKAGES_ENV: &str = "ETCH_PACKAGES";
pub const SOURCE_EXTENSION: &str = "etch";

/// Resolves an import path written in a file that lives in `working_dir`.
pub fn resolve(working_dir: &Path, import: &str) -> PathBuf {
    let packages = env::var_os(PACKAGES_ENV).map(PathBuf::from);
    resolve_with_packages(working_dir, import, packages.as_deref())
}

/// Resolution with an explicit package root.
///
/// The package root wins when it holds a matching file; otherwise the path is
/// taken relative to `working_dir`. In both places a directory `foo` means
/// `foo/foo.etch`, and a missing extensionless path gets `.etch` appended.
pub fn resolve_with_packages(working_dir: &Path, import: &str, packages: Option<&Path>) -> PathBuf {
    if let Some(root) = packages.filter(|root| root.is_dir()) {
        let candidate = locate(root.join(import));
        if candidate.is_file() {
            debug!(import, resolved = %candidate.display(), "resolved from package root");
            return normalize(&candidate);
        }
    }

    let resolved = normalize(&locate(working_dir.join(import)));
    debug!(import, resolved = %resolved.display(), "resolved relative import");
    resolved
}

fn locate(path: PathBuf) -> PathBuf {
    if path.is_dir() {
        let base = path
            .file_name()
            .map(|name| name.to_string_lossy().into_owned())
            .unwrap_or_default();
        return path.join(format!("{}.{}", base, SOURCE_EXTENSION));
    }

    if !path.exists() && path.extension().is_none() {
        return path.with_extension(SOURCE_EXTENSION);
    }

    path
}

/// Canonicalizes existing paths and cleans `.`/`..` out of the rest.
pub fn normalize(path: &Path) -> PathBuf {
    if let Ok(canonical) = path.canonicalize() {
        return canonical;
    }

    let mut cleaned = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                if !cleaned.pop() {
                    cleaned.push("..");
                }
            }
            other => cleaned.push(other.as_os_str()),
        }
    }
    cleaned
}
