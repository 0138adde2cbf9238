use super::*;
use std::path::Component;

// Project-root containment for every file the rewriter touches.

/// Canonicalize when the file exists; otherwise resolve through the parent so a
/// deleted file still maps to its real location. Falls back to a lexical
/// normalization when neither exists.
pub(crate) fn canonicalize_best_effort(path: &Path) -> PathBuf {
    if let Ok(canon) = std::fs::canonicalize(path) {
        return canon;
    }
    match (path.parent(), path.file_name()) {
        (Some(parent), Some(name)) => std::fs::canonicalize(parent)
            .map(|p| p.join(name))
            .unwrap_or_else(|_| normalize_lexically(path)),
        _ => normalize_lexically(path),
    }
}

fn normalize_lexically(path: &Path) -> PathBuf {
    let mut out = PathBuf::new();
    for component in path.components() {
        match component {
            Component::CurDir => {}
            Component::ParentDir => {
                out.pop();
            }
            other => out.push(other.as_os_str()),
        }
    }
    out
}

/// Resolve a discovery path: relative paths hang off the project root.
pub(crate) fn resolve_spec_path(
    id: &ParamId,
    path: &Path,
    root: Option<&Path>,
) -> Result<PathBuf, SpecError> {
    let absolute = if path.is_absolute() {
        path.to_path_buf()
    } else {
        match root {
            Some(root) => root.join(path),
            None => {
                return Err(SpecError::RelativePath {
                    id: id.clone(),
                    path: path.to_path_buf(),
                })
            }
        }
    };
    Ok(canonicalize_best_effort(&absolute))
}

/// Canonical path of `path`, or `OutsideProjectRoot` when a root is configured
/// and the path escapes it. `root` must already be canonical.
pub(crate) fn ensure_within_root(path: &Path, root: Option<&Path>) -> Result<PathBuf, RewriteError> {
    let canon = canonicalize_best_effort(path);
    match root {
        Some(root) if !canon.starts_with(root) => Err(RewriteError::OutsideProjectRoot {
            path: canon,
            root: root.to_path_buf(),
        }),
        _ => Ok(canon),
    }
}
