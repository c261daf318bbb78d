use std::io::stdout;

use anyhow::Context;
use clap::CommandFactory;
use clap_complete::generate;
use clap_complete_nushell::Nushell;

use crate::{
    cli::{Cli, CompletionsOptions, GlobalOptions, Shell},
    commands::Command,
};

impl Command for CompletionsOptions {
    async fn execute(self, _global_options: &GlobalOptions) -> anyhow::Result<()> {
        let shell = match self.shell {
            Some(shell) => shell,
            None => detect_shell().context("unable to detect your shell, pass it explicitly")?,
        };

        let mut cmd = Cli::command();
        let bin_name = cmd.get_name().to_string();
        let mut out = stdout();
        match shell {
            Shell::Bash => generate(clap_complete::Shell::Bash, &mut cmd, bin_name, &mut out),
            Shell::PowerShell => {
                generate(clap_complete::Shell::PowerShell, &mut cmd, bin_name, &mut out);
            }
            Shell::Zsh => generate(clap_complete::Shell::Zsh, &mut cmd, bin_name, &mut out),
            Shell::Elvish => generate(clap_complete::Shell::Elvish, &mut cmd, bin_name, &mut out),
            Shell::Fish => generate(clap_complete::Shell::Fish, &mut cmd, bin_name, &mut out),
            Shell::Nushell => generate(Nushell, &mut cmd, bin_name, &mut out),
        }

        Ok(())
    }
}

/// Picks the shell named by the environment, if it's a supported one.
fn detect_shell() -> Option<Shell> {
    let shell = match clap_complete::Shell::from_env()? {
        clap_complete::Shell::Bash => Shell::Bash,
        clap_complete::Shell::PowerShell => Shell::PowerShell,
        clap_complete::Shell::Zsh => Shell::Zsh,
        clap_complete::Shell::Elvish => Shell::Elvish,
        clap_complete::Shell::Fish => Shell::Fish,
        _ => return None,
    };
    Some(shell)
}
