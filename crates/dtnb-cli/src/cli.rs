//! CLI command definitions and argument parsing

use std::path::PathBuf;

use anyhow::Context;
use clap::{Parser, Subcommand};
use dtnb_crypto::{
    generate_mnemonic, read_signed_message, validate_mnemonic, verify_signature, Nonce, PublicKey,
    Wallet,
};
use tracing::info;

use crate::config::{CliOverrides, Config};
use crate::output::{CommandOutput, OutputFormat, OutputFormatter};
use crate::ExitCode;

/// dtnb - account keys, signatures and peer encryption
#[derive(Parser, Debug)]
#[command(name = "dtnb")]
#[command(version, about = "Account keys, signatures and peer encryption")]
pub struct Cli {
    /// Command to execute
    #[command(subcommand)]
    pub command: Commands,

    /// Output format: text or json (overrides config)
    #[arg(long, global = true)]
    pub output: Option<OutputFormat>,

    /// Verbose output
    #[arg(short, long, global = true)]
    pub verbose: bool,

    /// Debug logging
    #[arg(long, global = true)]
    pub debug: bool,

    /// Config file path
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,
}

impl Cli {
    /// Config values set on the command line.
    pub fn overrides(&self) -> CliOverrides {
        let word_count = match &self.command {
            Commands::Mnemonic {
                action: MnemonicAction::Generate { words },
            } => *words,
            _ => None,
        };
        CliOverrides {
            output_format: self.output.map(|format| format.to_string()),
            verbose: self.verbose.then_some(true),
            debug: self.debug.then_some(true),
            word_count,
        }
    }

    /// Run the command and print its result.
    pub fn execute_with_config(self, config: Config) -> anyhow::Result<ExitCode> {
        let format = config.output.format.parse().unwrap_or_default();
        let formatter = OutputFormatter::new(format, config.output.verbose);
        let name = self.command.name();

        formatter.progress(&format!("running {name}"));
        let output = self.command.run(&config)?;

        let rendered = formatter.format_output(&output, name);
        if !rendered.is_empty() {
            println!("{rendered}");
        }
        if let CommandOutput::Message { message: None } = output {
            formatter.warning("the signed message did not verify against this public key");
        }
        Ok(output.exit_code())
    }
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Create a key pair from a hex seed, or a random one
    New {
        /// 32-byte seed as hex; random when omitted
        #[arg(long, env = "DTNB_SECRET_KEY", hide_env_values = true)]
        secret_key: Option<String>,
    },
    /// Recover the account key pair of a mnemonic phrase
    FromMnemonic {
        /// BIP-39 phrase (English word list)
        #[arg(long, env = "DTNB_MNEMONIC", hide_env_values = true)]
        mnemonic: String,

        /// Optional BIP-39 password
        #[arg(long, env = "DTNB_PASSWORD", hide_env_values = true)]
        password: Option<String>,
    },
    /// Generate or check mnemonic phrases
    Mnemonic {
        #[command(subcommand)]
        action: MnemonicAction,
    },
    /// Check that a public key belongs to a secret key
    CheckPair {
        #[arg(long, env = "DTNB_SECRET_KEY", hide_env_values = true)]
        secret_key: String,

        #[arg(long)]
        public_key: String,
    },
    /// Sign a message; prints signature followed by the message, as hex
    Sign {
        message: String,

        #[arg(long, env = "DTNB_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },
    /// Create a detached signature of a message
    Signature {
        message: String,

        #[arg(long, env = "DTNB_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },
    /// Verify a detached signature (a signed message is accepted too)
    Verify {
        signature: String,

        message: String,

        #[arg(long)]
        public_key: String,
    },
    /// Open a signed message and print the text it carries
    Read {
        signed_message: String,

        #[arg(long)]
        public_key: String,
    },
    /// Encrypt a message for a peer
    Encrypt {
        message: String,

        /// Public key of the peer, as hex
        #[arg(long)]
        peer: String,

        /// 24-byte nonce as hex; random when omitted
        #[arg(long)]
        nonce: Option<String>,

        #[arg(long, env = "DTNB_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },
    /// Decrypt a message exchanged with a peer
    Decrypt {
        /// Encrypted payload, with or without the leading '#'
        encrypted_message: String,

        /// Public key of the peer, as hex
        #[arg(long)]
        peer: String,

        /// Nonce the message was encrypted with, as hex
        #[arg(long)]
        nonce: String,

        #[arg(long, env = "DTNB_SECRET_KEY", hide_env_values = true)]
        secret_key: String,
    },
    /// Create or inspect the configuration file
    Config {
        #[command(subcommand)]
        action: ConfigAction,
    },
}

#[derive(Subcommand, Debug)]
pub enum MnemonicAction {
    /// Generate a new phrase
    Generate {
        /// Number of words: 12, 15, 18, 21 or 24 (overrides config)
        #[arg(long)]
        words: Option<usize>,
    },
    /// Check a phrase against the English word list and its checksum
    Validate {
        #[arg(env = "DTNB_MNEMONIC", hide_env_values = true)]
        phrase: String,
    },
}

#[derive(Subcommand, Debug)]
pub enum ConfigAction {
    /// Write a commented sample configuration file
    Init {
        /// Target file; the platform config location when omitted
        #[arg(long)]
        path: Option<PathBuf>,

        /// Replace an existing file
        #[arg(long)]
        force: bool,
    },
    /// Print the effective configuration
    Show,
}

fn wallet(secret_key: &str) -> anyhow::Result<Wallet> {
    Wallet::new(Some(secret_key)).context("invalid secret key")
}

fn peer_key(hex: &str) -> anyhow::Result<PublicKey> {
    PublicKey::from_hex(hex).context("invalid peer public key")
}

fn key_pair_output(wallet: &Wallet) -> CommandOutput {
    CommandOutput::KeyPair {
        public_key: wallet.public_key_hex(),
        secret_key: wallet.secret_key_hex(),
    }
}

impl Commands {
    pub fn name(&self) -> &'static str {
        match self {
            Commands::New { .. } => "new",
            Commands::FromMnemonic { .. } => "from-mnemonic",
            Commands::Mnemonic {
                action: MnemonicAction::Generate { .. },
            } => "mnemonic generate",
            Commands::Mnemonic {
                action: MnemonicAction::Validate { .. },
            } => "mnemonic validate",
            Commands::CheckPair { .. } => "check-pair",
            Commands::Sign { .. } => "sign",
            Commands::Signature { .. } => "signature",
            Commands::Verify { .. } => "verify",
            Commands::Read { .. } => "read",
            Commands::Encrypt { .. } => "encrypt",
            Commands::Decrypt { .. } => "decrypt",
            Commands::Config {
                action: ConfigAction::Init { .. },
            } => "config init",
            Commands::Config {
                action: ConfigAction::Show,
            } => "config show",
        }
    }

    /// Run the command against `config`.
    pub fn run(self, config: &Config) -> anyhow::Result<CommandOutput> {
        match self {
            Commands::New { secret_key } => {
                let wallet = match secret_key {
                    Some(secret_key) => wallet(&secret_key)?,
                    None => Wallet::generate()?,
                };
                Ok(key_pair_output(&wallet))
            }
            Commands::FromMnemonic { mnemonic, password } => {
                let wallet = Wallet::from_mnemonic(&mnemonic, password.as_deref())
                    .context("could not recover wallet from mnemonic")?;
                info!(public_key = %wallet.public_key(), "recovered wallet");
                Ok(key_pair_output(&wallet))
            }
            Commands::Mnemonic { action } => action.run(config),
            Commands::CheckPair {
                secret_key,
                public_key,
            } => Ok(CommandOutput::Validity {
                valid: Wallet::is_valid_pair(&secret_key, &public_key),
            }),
            Commands::Sign {
                message,
                secret_key,
            } => Ok(CommandOutput::SignedMessage {
                signed_message: wallet(&secret_key)?.sign_message(&message),
            }),
            Commands::Signature {
                message,
                secret_key,
            } => Ok(CommandOutput::Signature {
                signature: wallet(&secret_key)?.sign(&message),
            }),
            Commands::Verify {
                signature,
                message,
                public_key,
            } => Ok(CommandOutput::Validity {
                valid: verify_signature(&signature, &message, &public_key),
            }),
            Commands::Read {
                signed_message,
                public_key,
            } => Ok(CommandOutput::Message {
                message: read_signed_message(&signed_message, &public_key),
            }),
            Commands::Encrypt {
                message,
                peer,
                nonce,
                secret_key,
            } => {
                let wallet = wallet(&secret_key)?;
                let peer = peer_key(&peer)?;
                let nonce = nonce
                    .as_deref()
                    .map(Nonce::from_hex)
                    .transpose()
                    .context("invalid nonce")?;
                let envelope = wallet
                    .encrypt(&peer, &message, nonce)
                    .context("encryption failed")?;
                Ok(CommandOutput::Encrypted(envelope))
            }
            Commands::Decrypt {
                encrypted_message,
                peer,
                nonce,
                secret_key,
            } => {
                let wallet = wallet(&secret_key)?;
                let peer = peer_key(&peer)?;
                let nonce = Nonce::from_hex(&nonce).context("invalid nonce")?;
                let message = wallet
                    .decrypt(&peer, &encrypted_message, &nonce)
                    .context("could not decrypt message")?;
                Ok(CommandOutput::Message {
                    message: Some(message),
                })
            }
            Commands::Config { action } => action.run(config),
        }
    }
}

impl MnemonicAction {
    fn run(self, config: &Config) -> anyhow::Result<CommandOutput> {
        match self {
            // --words reaches the config through Cli::overrides
            MnemonicAction::Generate { .. } => {
                let word_count = config.mnemonic.word_count()?;
                Ok(CommandOutput::Mnemonic {
                    mnemonic: generate_mnemonic(word_count)?,
                    word_count: word_count.words(),
                })
            }
            MnemonicAction::Validate { phrase } => Ok(CommandOutput::Validity {
                valid: validate_mnemonic(&phrase),
            }),
        }
    }
}

impl ConfigAction {
    fn run(self, config: &Config) -> anyhow::Result<CommandOutput> {
        match self {
            ConfigAction::Init { path, force } => {
                let path = path
                    .or_else(Config::default_path)
                    .context("no configuration directory on this platform")?;
                Config::init(&path, force)?;
                info!(path = %path.display(), "wrote configuration file");
                Ok(CommandOutput::ConfigFile {
                    path: path.display().to_string(),
                })
            }
            ConfigAction::Show => Ok(CommandOutput::Config(config.clone())),
        }
    }
}
