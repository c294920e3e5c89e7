//! Sandboxed file access inside a project working directory
//!
//! Tool callers address files by paths relative to the active project's
//! directory. Every path is normalized lexically, then symlinks are
//! resolved, and anything landing outside that directory is rejected.

use std::path::{Component, Path, PathBuf};

use thiserror::Error;

/// Errors raised by workspace file operations
#[derive(Error, Debug)]
pub enum WorkspaceError {
    /// The path would resolve outside the project directory
    #[error("path '{0}' escapes the project directory")]
    PathEscape(String),

    /// The file does not exist
    #[error("file not found: {0}")]
    NotFound(String),

    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
}

pub type WorkspaceResult<T> = Result<T, WorkspaceError>;

/// Resolve a caller-supplied relative path against the project root.
///
/// Normalization is purely lexical: `.` components are dropped and `..`
/// pops the previous component. Popping past the root, absolute paths,
/// and null bytes are all rejected.
pub fn resolve_rel_path(root: &Path, rel: &str) -> WorkspaceResult<PathBuf> {
    if rel.contains('\0') {
        return Err(WorkspaceError::PathEscape(rel.to_string()));
    }

    let candidate = Path::new(rel);
    if candidate.is_absolute() {
        return Err(WorkspaceError::PathEscape(rel.to_string()));
    }

    let mut normalized = PathBuf::new();
    for component in candidate.components() {
        match component {
            Component::Normal(part) => normalized.push(part),
            Component::CurDir => {}
            Component::ParentDir => {
                if !normalized.pop() {
                    return Err(WorkspaceError::PathEscape(rel.to_string()));
                }
            }
            // Prefix/RootDir only appear in absolute paths, caught above,
            // but a Windows prefix like C: can slip through is_absolute
            Component::Prefix(_) | Component::RootDir => {
                return Err(WorkspaceError::PathEscape(rel.to_string()));
            }
        }
    }

    if normalized.as_os_str().is_empty() {
        return Err(WorkspaceError::PathEscape(rel.to_string()));
    }

    Ok(root.join(normalized))
}

/// Resolve symlinks under `path` and require the result to stay inside
/// `root`.
///
/// Missing suffix components are checked via the nearest existing
/// ancestor, so paths about to be created validate too. A dangling
/// symlink leaf is rejected outright since a write through it would land
/// at the link's target.
fn ensure_within_root(root: &Path, path: &Path, rel: &str) -> WorkspaceResult<()> {
    let canonical_root = root.canonicalize()?;

    let mut cursor = path;
    let resolved = loop {
        match cursor.canonicalize() {
            Ok(resolved) => break resolved,
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                let dangling_link = cursor
                    .symlink_metadata()
                    .map(|m| m.file_type().is_symlink())
                    .unwrap_or(false);
                if dangling_link {
                    return Err(WorkspaceError::PathEscape(rel.to_string()));
                }
                cursor = cursor
                    .parent()
                    .ok_or_else(|| WorkspaceError::PathEscape(rel.to_string()))?;
            }
            Err(e) => return Err(e.into()),
        }
    };

    if resolved.starts_with(&canonical_root) {
        Ok(())
    } else {
        Err(WorkspaceError::PathEscape(rel.to_string()))
    }
}

/// Write a UTF-8 file inside the project, creating parent directories as
/// needed. Returns the resolved path and the number of bytes written.
pub async fn write_file(root: &Path, rel: &str, content: &str) -> WorkspaceResult<(PathBuf, usize)> {
    let path = resolve_rel_path(root, rel)?;

    // The project directory itself may have been removed out of band
    tokio::fs::create_dir_all(root).await?;
    ensure_within_root(root, &path, rel)?;

    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent).await?;
    }
    tokio::fs::write(&path, content).await?;

    Ok((path, content.len()))
}

/// Read a UTF-8 file inside the project
pub async fn read_file(root: &Path, rel: &str) -> WorkspaceResult<(PathBuf, String)> {
    let path = resolve_rel_path(root, rel)?;

    if let Err(e) = ensure_within_root(root, &path, rel) {
        // A missing project directory reads the same as a missing file
        return Err(match e {
            WorkspaceError::Io(io) if io.kind() == std::io::ErrorKind::NotFound => {
                WorkspaceError::NotFound(rel.to_string())
            }
            other => other,
        });
    }

    match tokio::fs::read_to_string(&path).await {
        Ok(content) => Ok((path, content)),
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
            Err(WorkspaceError::NotFound(rel.to_string()))
        }
        Err(e) => Err(e.into()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_resolve_simple_path() {
        let root = Path::new("/srv/projects/demo");
        let path = resolve_rel_path(root, "src/main.rs").unwrap();
        assert_eq!(path, PathBuf::from("/srv/projects/demo/src/main.rs"));
    }

    #[test]
    fn test_resolve_curdir_components() {
        let root = Path::new("/srv/projects/demo");
        let path = resolve_rel_path(root, "./src/./lib.rs").unwrap();
        assert_eq!(path, PathBuf::from("/srv/projects/demo/src/lib.rs"));
    }

    #[test]
    fn test_resolve_parent_within_root() {
        let root = Path::new("/srv/projects/demo");
        let path = resolve_rel_path(root, "src/../README.md").unwrap();
        assert_eq!(path, PathBuf::from("/srv/projects/demo/README.md"));
    }

    #[test]
    fn test_reject_traversal_above_root() {
        let root = Path::new("/srv/projects/demo");
        assert!(matches!(
            resolve_rel_path(root, "../../etc/passwd"),
            Err(WorkspaceError::PathEscape(_))
        ));
        assert!(matches!(
            resolve_rel_path(root, "src/../../other"),
            Err(WorkspaceError::PathEscape(_))
        ));
    }

    #[test]
    fn test_reject_absolute_path() {
        let root = Path::new("/srv/projects/demo");
        assert!(matches!(
            resolve_rel_path(root, "/etc/passwd"),
            Err(WorkspaceError::PathEscape(_))
        ));
    }

    #[test]
    fn test_reject_null_byte() {
        let root = Path::new("/srv/projects/demo");
        assert!(matches!(
            resolve_rel_path(root, "a\0b"),
            Err(WorkspaceError::PathEscape(_))
        ));
    }

    #[test]
    fn test_reject_empty_path() {
        let root = Path::new("/srv/projects/demo");
        assert!(resolve_rel_path(root, "").is_err());
        assert!(resolve_rel_path(root, ".").is_err());
    }

    #[tokio::test]
    async fn test_write_and_read_round_trip() {
        let dir = tempfile::tempdir().unwrap();
        let (path, bytes) = write_file(dir.path(), "notes/todo.md", "hello world")
            .await
            .unwrap();
        assert!(path.starts_with(dir.path()));
        assert_eq!(bytes, 11);

        let (_, content) = read_file(dir.path(), "notes/todo.md").await.unwrap();
        assert_eq!(content, "hello world");
    }

    #[tokio::test]
    async fn test_write_overwrites_existing_file() {
        let dir = tempfile::tempdir().unwrap();
        write_file(dir.path(), "a.txt", "first").await.unwrap();
        write_file(dir.path(), "a.txt", "second").await.unwrap();

        let (_, content) = read_file(dir.path(), "a.txt").await.unwrap();
        assert_eq!(content, "second");
    }

    #[tokio::test]
    async fn test_read_missing_file_is_not_found() {
        let dir = tempfile::tempdir().unwrap();
        assert!(matches!(
            read_file(dir.path(), "missing.txt").await,
            Err(WorkspaceError::NotFound(_))
        ));
    }

    #[tokio::test]
    async fn test_escaping_write_creates_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let result = write_file(dir.path(), "../outside.txt", "nope").await;
        assert!(matches!(result, Err(WorkspaceError::PathEscape(_))));

        let outside = dir.path().parent().unwrap().join("outside.txt");
        assert!(!outside.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_dir_cannot_redirect_writes() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let root = dir.path().join("demo");
        std::fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(outside.path(), root.join("link")).unwrap();

        let result = write_file(&root, "link/escape.txt", "nope").await;
        assert!(matches!(result, Err(WorkspaceError::PathEscape(_))));
        assert!(!outside.path().join("escape.txt").exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlinked_file_cannot_redirect_reads() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let secret = outside.path().join("secret.txt");
        std::fs::write(&secret, "private").unwrap();
        let root = dir.path().join("demo");
        std::fs::create_dir(&root).unwrap();
        std::os::unix::fs::symlink(&secret, root.join("leak.txt")).unwrap();

        let result = read_file(&root, "leak.txt").await;
        assert!(matches!(result, Err(WorkspaceError::PathEscape(_))));
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_dangling_symlink_cannot_redirect_writes() {
        let dir = tempfile::tempdir().unwrap();
        let outside = tempfile::tempdir().unwrap();
        let root = dir.path().join("demo");
        std::fs::create_dir(&root).unwrap();
        let target = outside.path().join("ghost.txt");
        std::os::unix::fs::symlink(&target, root.join("link.txt")).unwrap();

        let result = write_file(&root, "link.txt", "nope").await;
        assert!(matches!(result, Err(WorkspaceError::PathEscape(_))));
        assert!(!target.exists());
    }

    #[cfg(unix)]
    #[tokio::test]
    async fn test_symlink_within_project_is_allowed() {
        let dir = tempfile::tempdir().unwrap();
        let root = dir.path().join("demo");
        std::fs::create_dir(&root).unwrap();
        std::fs::write(root.join("real.txt"), "contents").unwrap();
        std::os::unix::fs::symlink(root.join("real.txt"), root.join("alias.txt")).unwrap();

        let (_, content) = read_file(&root, "alias.txt").await.unwrap();
        assert_eq!(content, "contents");
    }
}
