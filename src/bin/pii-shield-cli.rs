use std::io::Read;
use std::path::PathBuf;

use clap::{Parser, Subcommand};
use serde_json::Value;

use pii_shield::config::{load_config, ShieldConfig};
use pii_shield::crypto::{generate_encryption_key, mask_account_number, mask_ssn, FieldCodec};
use pii_shield::observability::logging::init_logging;
use pii_shield::sanitize::{deep_sanitize_text, RedactionPolicy};

#[derive(Parser)]
#[command(name = "pii-shield-cli")]
#[command(about = "Operator CLI for field encryption, masking and redaction", long_about = None)]
struct Cli {
    /// Optional TOML configuration file.
    #[arg(short, long)]
    config: Option<PathBuf>,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Generate a new 256-bit encryption key (hex)
    Keygen,
    /// Encrypt a value with the configured key
    Encrypt { plaintext: String },
    /// Decrypt an iv:tag:ciphertext envelope
    Decrypt { envelope: String },
    /// Mask an SSN for display
    MaskSsn { value: String },
    /// Mask an account number for display
    MaskAccount { value: String },
    /// Redact sensitive keys from JSON read on stdin
    Redact,
    /// Strip HTML tags from every string in JSON read on stdin
    Sanitize,
    /// Load and validate a configuration file
    CheckConfig { path: PathBuf },
}

fn main() -> Result<(), Box<dyn std::error::Error>> {
    let cli = Cli::parse();

    let config = match &cli.config {
        Some(path) => load_config(path)?,
        None => ShieldConfig::default(),
    };
    init_logging(&config.observability.log_level);

    match cli.command {
        Commands::Keygen => {
            println!("{}", generate_encryption_key());
        }
        Commands::Encrypt { plaintext } => {
            let codec = FieldCodec::from_env_var(&config.crypto.key_env)?;
            println!("{}", codec.encrypt(&plaintext)?);
        }
        Commands::Decrypt { envelope } => {
            let codec = FieldCodec::from_env_var(&config.crypto.key_env)?;
            println!("{}", codec.decrypt(&envelope)?);
        }
        Commands::MaskSsn { value } => {
            println!("{}", mask_ssn(&value));
        }
        Commands::MaskAccount { value } => {
            println!("{}", mask_account_number(&value));
        }
        Commands::Redact => {
            let policy = RedactionPolicy::from_config(&config.redaction);
            let input = read_stdin_json()?;
            println!("{}", serde_json::to_string_pretty(&policy.redact(&input))?);
        }
        Commands::Sanitize => {
            let input = read_stdin_json()?;
            println!("{}", serde_json::to_string_pretty(&deep_sanitize_text(&input))?);
        }
        Commands::CheckConfig { path } => {
            let checked = load_config(&path)?;
            println!("Configuration OK");
            println!("{}", toml::to_string_pretty(&checked)?);
        }
    }

    Ok(())
}

fn read_stdin_json() -> Result<Value, Box<dyn std::error::Error>> {
    let mut buf = String::new();
    std::io::stdin().read_to_string(&mut buf)?;
    Ok(serde_json::from_str(&buf)?)
}
