use clap::{Parser, Subcommand};

#[derive(Parser)]
#[command(
    name = "smcwrap",
    version,
    about = "Apple System Management Controller (SMC) tool"
)]
pub struct CliArgs {
    /// Log filter such as `debug` or `smcwrap_lib=trace`; `RUST_LOG` overrides it
    #[arg(long, global = true, default_value = "warn")]
    pub log_level: String,

    #[command(subcommand)]
    pub command: Commands,
}

#[derive(Subcommand)]
pub enum Commands {
    /// List all SMC keys and their values
    List,
    /// Read a single SMC key and display its value
    Read {
        #[arg(help = "Four-character SMC key name (e.g. TB0T, TC0P)")]
        key: String,
        /// Print only the decoded number
        #[arg(long)]
        number: bool,
    },

    /// Write raw bytes to a SMC key
    Write {
        #[arg(help = "Four-character SMC key name (e.g. F0Mn, F0Md)")]
        key: String,
        #[arg(
            help = "Hexadecimal value to write (without `0x` prefix), for 0x031000, write 031000"
        )]
        value: String,
    },

    /// Encode a value with the key's data type and write it
    Set {
        #[arg(help = "Four-character SMC key name (e.g. F0Mn, F0Md)")]
        key: String,
        #[arg(help = "Number (or text, for ch8* keys) to write, e.g. 1800")]
        value: String,
    },

    /// Print every decodable key with its type and value
    Dump {
        /// Print the value and type maps as JSON
        #[arg(long)]
        json: bool,
    },

    /// Print the key count, SMC version and power limits
    Info,
}
