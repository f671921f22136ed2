//! System package manager seam.
//!
//! `PackageManager` abstracts the three package-manager invocations so the
//! installer can be driven by a mock in tests. `CommandPackageManager` runs
//! the real executable (Homebrew by default).

use async_trait::async_trait;

use crate::utils::command::CommandSpec;

/// The package-manager calls the installer consumes. Only exit status matters.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait PackageManager: Send + Sync {
    /// Human-readable name ("Homebrew").
    fn display_name(&self) -> String;

    /// Whether the manager itself is available (`<manager> --version`).
    async fn is_present(&self) -> bool;

    /// Whether `package` is installed (`<manager> list <package>`).
    async fn is_installed(&self, package: &str) -> bool;

    /// Install `package` (`<manager> install <package>`). True on exit code 0.
    async fn install(&self, package: &str) -> bool;
}

/// Package manager backed by an executable with `--version`, `list` and
/// `install` subcommands.
#[derive(Debug, Clone)]
pub struct CommandPackageManager {
    program: String,
}

impl CommandPackageManager {
    pub fn new(program: &str) -> Self {
        Self {
            program: program.to_string(),
        }
    }

    pub fn version_command(&self) -> CommandSpec {
        CommandSpec::new(&self.program, &["--version"])
    }

    pub fn list_command(&self, package: &str) -> CommandSpec {
        CommandSpec::new(&self.program, &["list", package])
    }

    pub fn install_command(&self, package: &str) -> CommandSpec {
        CommandSpec::new(&self.program, &["install", package])
    }
}

#[async_trait]
impl PackageManager for CommandPackageManager {
    fn display_name(&self) -> String {
        match self.program.as_str() {
            "brew" => "Homebrew".to_string(),
            other => other.to_string(),
        }
    }

    async fn is_present(&self) -> bool {
        self.version_command().succeeds(true).await
    }

    async fn is_installed(&self, package: &str) -> bool {
        self.list_command(package).succeeds(true).await
    }

    async fn install(&self, package: &str) -> bool {
        // Inherit output so installer progress stays visible.
        self.install_command(package).succeeds(false).await
    }
}
