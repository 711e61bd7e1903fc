//! Completion command
//!
//! Generate shell completion scripts

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::{Shell, generate};
use std::io;

/// Generate shell completion scripts
///
/// Outputs completion script for the specified shell to stdout.
///
/// # Examples
///
/// ```bash
/// # Bash
/// cmext completion bash > /usr/local/share/bash-completion/completions/cmext
///
/// # Zsh
/// cmext completion zsh > /usr/local/share/zsh/site-functions/_cmext
///
/// # Fish
/// cmext completion fish > ~/.config/fish/completions/cmext.fish
/// ```
#[allow(
    clippy::unnecessary_wraps,
    reason = "Result type maintained for consistency with command signature pattern"
)]
pub(crate) fn run(shell: Shell) -> Result<()> {
    let mut cmd = crate::Cli::command();

    generate(shell, &mut cmd, "cmext", &mut io::stdout());

    Ok(())
}
