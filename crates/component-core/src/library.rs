//! Library configuration trait for CLI binaries
//!
//! Each binary implements this trait to point the scaffolding workflow at its
//! own component library.

/// Configuration trait for a component library
///
/// Implementors define:
/// - Product identity (name, display name)
/// - The default remote repository, branch and host
/// - Environment variables that override those defaults
pub trait LibraryConfig: Clone + Send + Sync + 'static {
    /// Internal product name (used for the CLI command and user agent)
    fn name(&self) -> &'static str;

    /// Human-readable display name
    fn display_name(&self) -> &'static str;

    /// Default repository, as `owner/repo`
    fn default_repository(&self) -> &'static str;

    /// Default branch whose archive is fetched
    fn default_branch(&self) -> &'static str {
        "main"
    }

    /// Default host serving branch archives
    fn default_host(&self) -> &'static str {
        "https://github.com"
    }

    /// Environment variable overriding the repository
    fn repository_env(&self) -> &'static str;

    /// Environment variable overriding the branch
    fn branch_env(&self) -> &'static str;

    /// Environment variable overriding the host
    fn host_env(&self) -> &'static str;

    /// CLI description shown in help text
    fn cli_description(&self) -> &'static str;

    /// User agent string for HTTP requests
    fn user_agent(&self) -> &'static str {
        self.name()
    }
}
