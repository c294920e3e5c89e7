//! Active project context
//!
//! Repository tools operate on one active project at a time. The context is
//! held in a [`ProjectRegistry`] owned by the server and passed to handlers,
//! so embedding several servers in one process keeps them isolated.

use std::path::PathBuf;
use std::sync::{Arc, RwLock};

use serde::Serialize;
use thiserror::Error;

/// Errors raised by project context operations
#[derive(Error, Debug)]
pub enum ContextError {
    /// No project has been selected yet
    #[error("no active project - call set_project_name or setup_existing_repository first")]
    NotSet,

    /// Project name cannot be used as a directory name
    #[error("invalid project name '{0}': must be a single path component")]
    InvalidName(String),
}

/// The active project and what is known about its repository so far.
///
/// Remote fields are populated lazily: set_project_name knows only the name,
/// create/clone/setup fill in URLs as they learn them from the API.
#[derive(Debug, Clone, Serialize)]
pub struct ProjectContext {
    /// Project and repository name
    pub name: String,
    /// Local working directory for this project
    pub local_path: PathBuf,
    /// HTTPS clone URL of the remote repository, if known
    pub clone_url: Option<String>,
    /// Web URL of the remote repository, if known
    pub html_url: Option<String>,
    /// Default branch reported by the hosting API, if known
    pub default_branch: Option<String>,
}

impl ProjectContext {
    /// Context for a project that has no known remote yet
    pub fn new(name: impl Into<String>, local_path: PathBuf) -> Self {
        Self {
            name: name.into(),
            local_path,
            clone_url: None,
            html_url: None,
            default_branch: None,
        }
    }
}

/// Holds the active [`ProjectContext`] for one server instance.
///
/// Cloning a registry yields a handle to the same underlying slot.
#[derive(Clone, Default)]
pub struct ProjectRegistry {
    inner: Arc<RwLock<Option<ProjectContext>>>,
}

impl ProjectRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace the active project. Selecting a new project overwrites any
    /// previous one entirely.
    pub fn set(&self, ctx: ProjectContext) {
        let mut slot = self.inner.write().expect("project registry lock poisoned");
        *slot = Some(ctx);
    }

    /// The active project, or [`ContextError::NotSet`]
    pub fn current(&self) -> Result<ProjectContext, ContextError> {
        self.inner
            .read()
            .expect("project registry lock poisoned")
            .clone()
            .ok_or(ContextError::NotSet)
    }

    /// Mutate the active project in place, returning the updated context
    pub fn update<F>(&self, f: F) -> Result<ProjectContext, ContextError>
    where
        F: FnOnce(&mut ProjectContext),
    {
        let mut slot = self.inner.write().expect("project registry lock poisoned");
        let ctx = slot.as_mut().ok_or(ContextError::NotSet)?;
        f(ctx);
        Ok(ctx.clone())
    }

    pub fn is_set(&self) -> bool {
        self.inner
            .read()
            .expect("project registry lock poisoned")
            .is_some()
    }
}

/// Validate that a project name is safe to use as a directory name under the
/// projects root. Names containing separators or traversal components would
/// let the working directory land outside the root.
pub fn validate_project_name(name: &str) -> Result<(), ContextError> {
    if name.is_empty()
        || name == "."
        || name == ".."
        || name.contains('/')
        || name.contains('\\')
        || name.contains('\0')
    {
        return Err(ContextError::InvalidName(name.to_string()));
    }
    Ok(())
}
