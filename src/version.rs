//! Version information with embedded git metadata.

/// Package version from Cargo.toml.
pub const PKG_VERSION: &str = env!("CARGO_PKG_VERSION");

/// Git branch at build time, or "unknown" if unavailable.
pub const GIT_BRANCH: &str = match option_env!("VERGEN_GIT_BRANCH") {
    Some(branch) => branch,
    None => "unknown",
};

/// Git commit SHA at build time, or "unknown" if unavailable.
pub const GIT_SHA: &str = match option_env!("VERGEN_GIT_SHA") {
    Some(sha) => sha,
    None => "unknown",
};

/// Whether the working tree was dirty at build time.
pub fn git_dirty() -> bool {
    option_env!("VERGEN_GIT_DIRTY") == Some("true")
}

/// Build identifier reported next to the app version: `{branch}.{sha}`,
/// with a `.dirty` suffix for dirty trees.
///
/// Examples:
/// - `main.abc1234`
/// - `feature/ab-test.abc1234.dirty`
pub fn build_id() -> String {
    let dirty_suffix = if git_dirty() { ".dirty" } else { "" };
    format!("{GIT_BRANCH}.{}{dirty_suffix}", short_sha())
}

/// Full version string: `{version}+{build_id}`.
pub fn version_string() -> String {
    format!("{PKG_VERSION}+{}", build_id())
}

fn short_sha() -> &'static str {
    GIT_SHA.get(..7).unwrap_or(GIT_SHA)
}
