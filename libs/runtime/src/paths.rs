use std::env;
use std::path::{Path, PathBuf};

use thiserror::Error;

#[derive(Debug, Error)]
pub enum HomeDirError {
    #[error("cannot determine the user's home directory")]
    NoUserHome,
    #[error("failed to determine current directory: {0}")]
    CurrentDir(#[source] std::io::Error),
    #[error("failed to create home directory '{path}': {source}")]
    Create {
        path: String,
        #[source]
        source: std::io::Error,
    },
}

fn user_home() -> Result<PathBuf, HomeDirError> {
    dirs::home_dir().ok_or(HomeDirError::NoUserHome)
}

/// Resolve the server home directory into an absolute path.
///
/// - `None` falls back to `<user home>/<default_subdir>`.
/// - `~` is expanded, relative paths are joined with the current directory.
/// - When `create` is set the directory is created if missing.
pub fn resolve_home_dir(
    configured: Option<String>,
    default_subdir: &str,
    create: bool,
) -> Result<PathBuf, HomeDirError> {
    let mut path = match configured {
        Some(raw) => PathBuf::from(shellexpand::tilde(raw.trim()).as_ref()),
        None => user_home()?.join(default_subdir),
    };

    if path.is_relative() {
        path = env::current_dir()
            .map_err(HomeDirError::CurrentDir)?
            .join(path);
    }

    if create {
        std::fs::create_dir_all(&path).map_err(|source| HomeDirError::Create {
            path: path.to_string_lossy().to_string(),
            source,
        })?;
    }

    Ok(path)
}

/// Resolve `file` against `base_dir` unless it is already absolute.
pub fn resolve_under(file: &str, base_dir: &Path) -> PathBuf {
    let p = Path::new(file);
    if p.is_absolute() {
        p.to_path_buf()
    } else {
        base_dir.join(p)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    #[test]
    fn absolute_path_is_kept_and_created() {
        let tmp = tempdir().unwrap();
        let target = tmp.path().join("nested/home");

        let resolved =
            resolve_home_dir(Some(target.to_string_lossy().to_string()), ".diet", true).unwrap();

        assert_eq!(resolved, target);
        assert!(target.exists());
    }

    #[test]
    fn relative_path_is_anchored_to_cwd() {
        let resolved = resolve_home_dir(Some("some/rel".to_string()), ".diet", false).unwrap();
        assert!(resolved.is_absolute());
        assert!(resolved.ends_with("some/rel"));
    }

    #[test]
    fn tilde_expands_to_user_home() {
        let Some(home) = dirs::home_dir() else {
            return;
        };
        let resolved = resolve_home_dir(Some("~/.diet-test".to_string()), ".diet", false).unwrap();
        assert_eq!(resolved, home.join(".diet-test"));

        let default = resolve_home_dir(None, ".diet", false).unwrap();
        assert_eq!(default, home.join(".diet"));
    }

    #[test]
    fn resolve_under_keeps_absolute_paths() {
        let tmp = tempdir().unwrap();
        let abs = tmp.path().join("x.log");
        let out = resolve_under(&abs.to_string_lossy(), Path::new("/ignored"));
        assert_eq!(out, abs);

        let rel = resolve_under("logs/x.log", tmp.path());
        assert!(rel.starts_with(tmp.path()));
    }
}
