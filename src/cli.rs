use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(
    name = "keycalc",
    version,
    about = "Keypad calculator with exact decimal arithmetic"
)]
pub struct Cli {
    #[arg(
        long,
        global = true,
        help = "Config file (defaults to $XDG_CONFIG_HOME/keycalc/config.toml)"
    )]
    pub config: Option<PathBuf>,
    #[arg(long, global = true, help = "Output machine-readable JSON")]
    pub json: bool,
    #[arg(
        long,
        global = true,
        value_parser = clap::value_parser!(u64).range(1..),
        help = "Significant digits kept when a division does not terminate"
    )]
    pub precision: Option<u64>,
    #[command(subcommand)]
    pub command: Option<Commands>,
}

#[derive(Subcommand, Debug, PartialEq, Eq)]
pub enum Commands {
    /// Read keys from stdin, one line at a time (the default)
    Repl {
        #[arg(long, help = "Do not print the keypad on startup")]
        no_keypad: bool,
    },
    /// Press the given keys once and print the final display
    Eval {
        #[arg(required = true, allow_hyphen_values = true)]
        keys: Vec<String>,
    },
    /// Print the keypad layout
    Keys,
}
