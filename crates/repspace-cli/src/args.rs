use clap::{Parser, Subcommand};

#[derive(Parser, Debug, Clone)]
#[command(name = "repspace", version, about = "repspace reputation-space admin CLI")]
pub struct Cli {
    /// Emit JSON output on stdout.
    #[arg(long, global = true)]
    pub json: bool,

    /// RPC endpoint.
    #[arg(long, global = true, default_value = "https://api.devnet.solana.com")]
    pub url: String,

    /// Program id (defaults to the development placeholder).
    #[arg(long, global = true)]
    pub program_id: Option<String>,

    /// Privileged admin identity allowed to repair stale records.
    #[arg(long, global = true)]
    pub admin: Option<String>,

    /// Path to the signing keypair file. Without it, commands only plan
    /// and print; nothing is submitted.
    #[arg(long, global = true)]
    pub keypair: Option<String>,

    /// Acting identity (pubkey) for planning without a keypair. Ignored
    /// when --keypair is given.
    #[arg(long = "as", global = true, value_name = "PUBKEY")]
    pub as_identity: Option<String>,

    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug, Clone)]
pub enum Command {
    /// Create the config account for a DAO.
    Init {
        /// DAO identifier (pubkey).
        #[arg(long)]
        dao: String,
        /// Reputation mint address.
        #[arg(long)]
        rep_mint: String,
        /// Initial season, 1..=65535.
        #[arg(long, default_value_t = 1)]
        season: u16,
    },

    /// Show one DAO's config, or scan the program for all configs.
    Show {
        #[arg(long)]
        dao: Option<String>,
    },

    /// Update a config field.
    Set {
        #[arg(long)]
        dao: String,
        #[command(subcommand)]
        field: SetField,
    },

    /// Create or overwrite the project metadata URI for a DAO.
    Metadata {
        #[arg(long)]
        dao: String,
        /// Metadata URI, at most 200 UTF-8 bytes.
        #[arg(long)]
        uri: String,
    },

    /// Bulk-credit reputation from a `wallet,amount` file.
    Bulk {
        #[arg(long)]
        dao: String,
        /// Season to credit into.
        #[arg(long)]
        season: u16,
        /// Input file, one `wallet,amount` row per line.
        #[arg(long)]
        file: String,
        /// Zero existing healthy records before crediting.
        #[arg(long)]
        reset_first: bool,
        /// Operations per transaction.
        #[arg(long, default_value_t = repspace_solana_client::constants::DEFAULT_CHUNK_SIZE)]
        chunk_size: usize,
    },
}

#[derive(Subcommand, Debug, Clone)]
pub enum SetField {
    /// Advance the current season.
    Season { value: u16 },
    /// Set the decay rate in basis points (0..=10000).
    Decay { value: u16 },
    /// Replace the reputation mint.
    Mint { value: String },
    /// Hand the space over to a new authority.
    Authority { value: String },
}
