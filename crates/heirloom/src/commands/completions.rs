//! `heirloom completions SHELL`: print a completion script to stdout.
//!
//! The script covers every subcommand and flag, including `--asset-type`,
//! `--verify-only` and the `signing-env` options.
//!
//! ```bash
//! eval "$(heirloom completions bash)"
//! heirloom completions fish > ~/.config/fish/completions/heirloom.fish
//! ```

use std::io::{self, Write};

use anyhow::Result;
use clap::{Args as ClapArgs, CommandFactory};
use clap_complete::{Shell, generate};

use crate::Cli;

const BIN_NAME: &str = "heirloom";

#[derive(ClapArgs, Clone)]
pub struct Args {
    /// Shell to generate completions for
    #[arg(value_enum)]
    pub shell: Shell,
}

pub fn execute(args: &Args) -> Result<()> {
    let mut stdout = io::stdout().lock();
    write_completions(args.shell, &mut stdout);
    stdout.flush()?;
    Ok(())
}

fn write_completions(shell: Shell, out: &mut dyn Write) {
    generate(shell, &mut Cli::command(), BIN_NAME, out);
}
