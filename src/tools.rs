//! Tool names and the alias table
//!
//! Aliases exist for callers that learned older tool names; each one routes
//! to the same handler as its canonical tool and never diverges from it.

/// The eight canonical tools, in the order they appear in the server
pub const CANONICAL_TOOLS: &[&str] = &[
    "set_project_name",
    "setup_existing_repository",
    "create_repository",
    "clone_repository",
    "merge_template_repository",
    "create_file",
    "read_file_content",
    "commit_and_push",
];

/// Alias name paired with the canonical tool it routes to
pub const ALIASES: &[(&str, &str)] = &[
    ("get_project_name", "set_project_name"),
    ("make_repo", "create_repository"),
    ("check_file", "read_file_content"),
    ("push_code", "commit_and_push"),
];

/// Resolve a tool name to its canonical form; unknown names pass through
pub fn canonical_tool(name: &str) -> &str {
    ALIASES
        .iter()
        .find(|(alias, _)| *alias == name)
        .map(|(_, canonical)| *canonical)
        .unwrap_or(name)
}
