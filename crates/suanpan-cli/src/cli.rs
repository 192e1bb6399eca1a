use std::path::PathBuf;

use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(name = "suanpan", bin_name = "suanpan")]
#[command(about = "Inspect and run compiled arithmetic expression containers")]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand)]
pub enum Command {
    /// Disassemble a compiled container
    #[command(after_help = r#"EXAMPLES:
  suanpan dump expr.abc"#)]
    Dump {
        /// Compiled container file
        file: PathBuf,
    },

    /// Run a compiled container
    #[command(after_help = r#"EXAMPLES:
  suanpan run expr.abc
  suanpan run half.abc 5
  suanpan run poly.abc 2.5 3/4"#)]
    Run {
        /// Compiled container file
        file: PathBuf,

        /// Numeric arguments, bound to the program's variables in
        /// first-occurrence order
        args: Vec<String>,
    },
}
