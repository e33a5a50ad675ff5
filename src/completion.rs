//! # Shell Completion Module
//!
//! Generation of completion scripts through clap's completion system.
//!
//! ```bash
//! # Generate bash completions
//! favshuffle completion bash > ~/.local/share/bash-completion/completions/favshuffle
//!
//! # Generate zsh completions
//! favshuffle completion zsh > ~/.config/zsh/completions/_favshuffle
//! ```

use crate::cli::Shell;
use clap::Command;
use clap_complete::{generate, Generator, Shell as CompletionShell};
use std::io::Write;

/// Write completions for `cmd` to `out`.
pub fn generate_completions<G: Generator>(gen: G, cmd: &mut Command, out: &mut dyn Write) {
    let name = cmd.get_name().to_string();
    generate(gen, cmd, name, out);
}

/// Map the CLI's shell enum onto clap_complete's.
#[must_use]
pub fn shell_to_completion_shell(shell: Shell) -> CompletionShell {
    match shell {
        Shell::Bash => CompletionShell::Bash,
        Shell::Zsh => CompletionShell::Zsh,
        Shell::Fish => CompletionShell::Fish,
        Shell::PowerShell => CompletionShell::PowerShell,
        Shell::Elvish => CompletionShell::Elvish,
    }
}
