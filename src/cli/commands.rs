use clap::{Parser, Subcommand};
use std::path::PathBuf;

#[derive(Debug, Parser)]
#[command(name = "delegate-bridge", version)]
pub struct Opt {
    #[arg(
        long = "network",
        global = true,
        help = "Network profile (mainnet, testnet, localnet)"
    )]
    pub network: Option<String>,
    #[arg(long = "config", global = true, help = "Path to a TOML configuration file")]
    pub config: Option<PathBuf>,
    #[command(subcommand)]
    pub command: Command,
}

#[derive(Subcommand, Debug)]
pub enum Command {
    #[command(name = "call", about = "Dispatch a raw JSON command and print the response")]
    Call {
        #[arg(help = "The command JSON, or '-' to read it from stdin")]
        json: String,
    },
    #[command(name = "createaccount", about = "Generate a new keypair and address")]
    CreateAccount,
    #[command(name = "hash", about = "Print the SHA3-256 digest of a message")]
    Hash {
        #[arg(help = "The message to hash")]
        msg: String,
    },
    #[command(name = "sign", about = "Sign a message with a hex private key")]
    Sign {
        #[arg(help = "Hex-encoded private key")]
        private: String,
        #[arg(help = "The message to sign")]
        msg: String,
    },
    #[command(name = "verify", about = "Verify a message signature")]
    Verify {
        #[arg(help = "Hex-encoded public key")]
        public: String,
        #[arg(help = "The signed message")]
        msg: String,
        #[arg(help = "Hex-encoded signature")]
        signature: String,
    },
    #[command(name = "address", about = "Derive the public key and address of a private key")]
    Address {
        #[arg(help = "Hex-encoded private key")]
        private: String,
    },
    #[command(name = "validateaddress", about = "Check an address's format and checksum")]
    ValidateAddress {
        #[arg(help = "The address to check")]
        address: String,
    },
    #[command(name = "profiles", about = "List network profiles and their delegates")]
    Profiles,
}
