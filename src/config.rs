//! Configuration loading for github-repo-mcp
//!
//! Configuration is loaded from:
//! 1. Environment variable GITHUB_MCP_CONFIG_PATH (explicit file)
//! 2. ./github-repo-mcp.toml (local override)
//! 3. $XDG_CONFIG_HOME/github-repo-mcp/config.toml
//! 4. Default values
//!
//! Environment variables override file values:
//! GITHUB_TOKEN, GITHUB_API_URL, PROJECTS_ROOT, TEMPLATE_REPO_URL, GIT_TIMEOUT_SECS

use std::path::PathBuf;

use serde::Deserialize;

/// Main configuration structure
#[derive(Clone, Deserialize)]
pub struct Config {
    /// GitHub API configuration
    #[serde(default)]
    pub github: GitHubConfig,
    /// Local project workspace configuration
    #[serde(default)]
    pub projects: ProjectsConfig,
    /// Template repository configuration
    #[serde(default)]
    pub template: TemplateConfig,
    /// Git subprocess configuration
    #[serde(default)]
    pub git: GitConfig,
    /// API token, taken from the GITHUB_TOKEN environment variable only.
    /// Never read from the config file so it cannot end up committed.
    #[serde(skip)]
    pub token: Option<String>,
}

/// GitHub API configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GitHubConfig {
    /// Base URL of the GitHub REST API
    #[serde(default = "default_api_url")]
    pub api_url: String,
}

/// Local project workspace configuration
#[derive(Debug, Clone, Deserialize)]
pub struct ProjectsConfig {
    /// Directory under which per-project working directories are created
    #[serde(default = "default_projects_root")]
    pub root: PathBuf,
}

/// Template repository configuration
#[derive(Debug, Clone, Deserialize)]
pub struct TemplateConfig {
    /// Repository URL used by merge_template_repository when none is given
    #[serde(default = "default_template_url")]
    pub url: String,
}

/// Git subprocess configuration
#[derive(Debug, Clone, Deserialize)]
pub struct GitConfig {
    /// Timeout applied to every git subprocess invocation
    #[serde(default = "default_git_timeout")]
    pub timeout_secs: u64,
    /// Branch cloned and pushed when the remote's default branch is unknown
    #[serde(default = "default_branch")]
    pub branch: String,
}

// Default value functions
fn default_api_url() -> String {
    "https://api.github.com".to_string()
}

fn default_projects_root() -> PathBuf {
    PathBuf::from("projects")
}

fn default_template_url() -> String {
    "https://github.com/Jeetanshu18/react-vite".to_string()
}

fn default_git_timeout() -> u64 {
    60
}

fn default_branch() -> String {
    "main".to_string()
}

impl Default for Config {
    fn default() -> Self {
        Self {
            github: GitHubConfig::default(),
            projects: ProjectsConfig::default(),
            template: TemplateConfig::default(),
            git: GitConfig::default(),
            token: None,
        }
    }
}

impl Default for GitHubConfig {
    fn default() -> Self {
        Self {
            api_url: default_api_url(),
        }
    }
}

impl Default for ProjectsConfig {
    fn default() -> Self {
        Self {
            root: default_projects_root(),
        }
    }
}

impl Default for TemplateConfig {
    fn default() -> Self {
        Self {
            url: default_template_url(),
        }
    }
}

impl Default for GitConfig {
    fn default() -> Self {
        Self {
            timeout_secs: default_git_timeout(),
            branch: default_branch(),
        }
    }
}

// Token is deliberately absent from Debug output
impl std::fmt::Debug for Config {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("Config")
            .field("github", &self.github)
            .field("projects", &self.projects)
            .field("template", &self.template)
            .field("git", &self.git)
            .field("token", &self.token.as_ref().map(|_| "<redacted>"))
            .finish()
    }
}

impl Config {
    /// Load configuration from standard locations, then apply env overrides.
    ///
    /// A missing or unparseable config file falls back to defaults with a
    /// warning rather than failing startup.
    pub fn load() -> Self {
        let mut config = Self::load_file().unwrap_or_default();
        config.apply_env();
        config
    }

    fn load_file() -> Option<Self> {
        for path in Self::config_paths() {
            if !path.exists() {
                continue;
            }
            match std::fs::read_to_string(&path) {
                Ok(content) => match toml::from_str::<Self>(&content) {
                    Ok(config) => {
                        tracing::info!("Loaded config from {}", path.display());
                        return Some(config);
                    }
                    Err(e) => {
                        tracing::warn!("Failed to parse config {}: {}", path.display(), e);
                    }
                },
                Err(e) => {
                    tracing::warn!("Failed to read config {}: {}", path.display(), e);
                }
            }
        }

        tracing::info!("No config file found, using defaults");
        None
    }

    /// Candidate config file locations, highest priority first
    fn config_paths() -> Vec<PathBuf> {
        let mut paths = Vec::new();

        // 1. Explicit path from environment
        if let Ok(env_path) = std::env::var("GITHUB_MCP_CONFIG_PATH") {
            paths.push(PathBuf::from(env_path));
        }

        // 2. ./github-repo-mcp.toml (local override)
        paths.push(PathBuf::from("github-repo-mcp.toml"));

        // 3. $XDG_CONFIG_HOME/github-repo-mcp/config.toml
        if let Some(config_dir) = dirs::config_dir() {
            paths.push(config_dir.join("github-repo-mcp").join("config.toml"));
        }

        paths
    }

    /// Apply environment variable overrides on top of file values
    fn apply_env(&mut self) {
        if let Ok(token) = std::env::var("GITHUB_TOKEN") {
            if !token.is_empty() {
                self.token = Some(token);
            }
        }
        if let Ok(url) = std::env::var("GITHUB_API_URL") {
            self.github.api_url = url;
        }
        if let Ok(root) = std::env::var("PROJECTS_ROOT") {
            self.projects.root = PathBuf::from(root);
        }
        if let Ok(url) = std::env::var("TEMPLATE_REPO_URL") {
            self.template.url = url;
        }
        if let Ok(secs) = std::env::var("GIT_TIMEOUT_SECS") {
            match secs.parse::<u64>() {
                Ok(parsed) => self.git.timeout_secs = parsed,
                Err(_) => tracing::warn!("Ignoring invalid GIT_TIMEOUT_SECS: {}", secs),
            }
        }
    }
}
