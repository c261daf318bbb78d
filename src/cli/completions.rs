use clap::{Args, ValueEnum};

/// Options for generating shell completions.
#[derive(Clone, Debug, Args)]
#[command(hide = true)] // Only needed while installing
pub struct CompletionsOptions {
    /// The shell to generate completions for.
    ///
    /// If not provided, the shell is detected from the `SHELL` environment
    /// variable.
    #[arg(value_enum)]
    pub shell: Option<Shell>,
}

/// A shell that completions can be generated for.
#[derive(Clone, Copy, PartialEq, Eq, Debug, Hash, ValueEnum)]
pub enum Shell {
    #[value(name = "bash")]
    Bash,

    #[value(name = "pwsh", alias = "powershell")]
    PowerShell,

    #[value(name = "zsh")]
    Zsh,

    #[value(name = "elvish")]
    Elvish,

    #[value(name = "fish")]
    Fish,

    #[value(name = "nushell", alias = "nu")]
    Nushell,
}
