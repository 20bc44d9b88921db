// Command-line host for the bridge: one-shot JSON dispatch plus the key and
// hashing helpers as plain subcommands.
use clap::Parser;
use delegate_bridge::{
    address_from_public_key, bridge, sha3_256_digest, validate_address, verify_signature, Account,
    BridgeConfig, Command, NetworkProfile, Opt,
};
use log::{error, LevelFilter};
use std::io::Read;
use std::process;

fn main() {
    env_logger::builder().filter_level(LevelFilter::Info).init();

    let opt = Opt::parse();

    if let Err(e) = run_command(opt) {
        error!("Error: {e}");
        process::exit(1);
    }
}

fn load_config(opt: &Opt) -> Result<BridgeConfig, Box<dyn std::error::Error>> {
    let mut config = match &opt.config {
        Some(path) => BridgeConfig::from_file(path)?,
        None => BridgeConfig::from_env()?,
    };
    if let Some(network) = &opt.network {
        config = config.with_profile(network.parse::<NetworkProfile>()?);
    }
    Ok(config)
}

fn run_command(opt: Opt) -> Result<(), Box<dyn std::error::Error>> {
    match &opt.command {
        Command::Call { json } => {
            let json = if json == "-" {
                let mut buf = String::new();
                std::io::stdin().read_to_string(&mut buf)?;
                buf
            } else {
                json.clone()
            };
            bridge::init(load_config(&opt)?)?;
            println!("{}", bridge::call(&json));
        }
        Command::CreateAccount => {
            let account = Account::generate()?;
            println!("Private key: {}", account.private_hex());
            println!("Address: {}", account.get_address());
        }
        Command::Hash { msg } => {
            println!("{}", hex::encode(sha3_256_digest(msg.as_bytes())));
        }
        Command::Sign { private, msg } => {
            let account = Account::from_private_hex(private)?;
            println!("{}", hex::encode(account.sign(msg.as_bytes())?));
        }
        Command::Verify {
            public,
            msg,
            signature,
        } => {
            let public = hex::decode(public)?;
            let signature = hex::decode(signature)?;
            if verify_signature(&public, msg.as_bytes(), &signature) {
                println!("Signature is valid");
            } else {
                return Err("Signature is invalid".into());
            }
        }
        Command::Address { private } => {
            let account = Account::from_private_hex(private)?;
            println!("Public key: {}", hex::encode(account.get_public_key()));
            println!(
                "Address: {}",
                address_from_public_key(account.get_public_key())
            );
        }
        Command::ValidateAddress { address } => {
            if validate_address(address) {
                println!("{address} is valid");
            } else {
                return Err(format!("Invalid address: {address}").into());
            }
        }
        Command::Profiles => {
            let config = load_config(&opt)?;
            println!(
                "Active: {} (policy={}, timeout={:?})",
                config.get_profile(),
                config.get_broadcast_policy(),
                config.get_request_timeout()
            );
            for endpoint in config.get_delegates().iter() {
                println!("  {endpoint}");
            }
            for profile in NetworkProfile::all() {
                println!("{profile}:");
                for endpoint in profile.delegate_nodes() {
                    println!("  {endpoint}");
                }
            }
        }
    }
    Ok(())
}
