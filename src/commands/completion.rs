//! The `completion` subcommand: emit shell completion scripts.

use clap::{Args, CommandFactory, ValueEnum};
use clap_complete::{generate, shells};

use crate::cli::Cli;

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum CompletionShell {
    Bash,
    Zsh,
    Fish,
    Powershell,
}

#[derive(Debug, Args)]
pub struct CompletionOptions {
    /// Shell to generate the completion script for
    #[arg(value_enum)]
    pub shell: CompletionShell,
}

pub fn run(options: &CompletionOptions) {
    let mut cmd = Cli::command();
    let bin = cmd.get_name().to_string();
    let mut stdout = std::io::stdout();

    match options.shell {
        CompletionShell::Bash => generate(shells::Bash, &mut cmd, bin, &mut stdout),
        CompletionShell::Zsh => generate(shells::Zsh, &mut cmd, bin, &mut stdout),
        CompletionShell::Fish => generate(shells::Fish, &mut cmd, bin, &mut stdout),
        CompletionShell::Powershell => generate(shells::PowerShell, &mut cmd, bin, &mut stdout),
    }
}
