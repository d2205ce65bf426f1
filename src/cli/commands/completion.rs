//! completion command - Generate shell completion scripts

use std::io::{self, Write};

use anyhow::Result;
use clap::CommandFactory;
use clap_complete::generate;

use crate::cli::args::{Cli, Shell};

/// Print the completion script for `shell` to stdout.
pub fn completion(shell: Shell) -> Result<()> {
    let stdout = io::stdout();
    write_completion(shell, &mut stdout.lock());
    Ok(())
}

fn write_completion(shell: Shell, out: &mut dyn Write) {
    let generator = match shell {
        Shell::Bash => clap_complete::Shell::Bash,
        Shell::Zsh => clap_complete::Shell::Zsh,
        Shell::Fish => clap_complete::Shell::Fish,
        Shell::PowerShell => clap_complete::Shell::PowerShell,
    };

    let mut cmd = Cli::command();
    let name = cmd.get_name().to_string();
    generate(generator, &mut cmd, name, out);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn scripts_mention_subcommands() {
        for shell in [Shell::Bash, Shell::Zsh, Shell::Fish, Shell::PowerShell] {
            let mut buf = Vec::new();
            write_completion(shell, &mut buf);

            let script = String::from_utf8(buf).unwrap();
            assert!(script.contains("rangelog"), "{:?}", shell);
            assert!(script.contains("cherry"), "{:?}", shell);
        }
    }
}
