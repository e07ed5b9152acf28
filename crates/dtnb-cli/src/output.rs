//! Output formatting for CLI results
//!
//! Two formats are supported:
//! - Text: the bare value, one field per line (default)
//! - JSON: a [`JsonResponse`] envelope for scripting

use std::str::FromStr;

use dtnb_crypto::EncryptedMessage;
use serde::Serialize;

use crate::config::Config;
use crate::ExitCode;

/// Output format options
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum OutputFormat {
    /// Plain text, suitable for piping (default)
    #[default]
    Text,
    /// JSON format for scripting
    Json,
}

impl FromStr for OutputFormat {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_lowercase().as_str() {
            "text" => Ok(Self::Text),
            "json" => Ok(Self::Json),
            _ => Err(format!("Unknown output format: {s}")),
        }
    }
}

impl std::fmt::Display for OutputFormat {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Self::Text => write!(f, "text"),
            Self::Json => write!(f, "json"),
        }
    }
}

/// Standard JSON response wrapper for consistent schema
#[derive(Serialize)]
pub struct JsonResponse<T: Serialize> {
    /// Whether the operation was successful
    pub success: bool,
    /// The response data (present on success)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub data: Option<T>,
    /// Error message (present on failure)
    #[serde(skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// ISO 8601 timestamp
    pub timestamp: String,
    /// Command that was executed
    #[serde(skip_serializing_if = "Option::is_none")]
    pub command: Option<String>,
    /// Process exit code
    pub exit_code: i32,
}

impl<T: Serialize> JsonResponse<T> {
    pub fn success_with_command(data: T, command: &str, code: ExitCode) -> Self {
        Self {
            success: code == ExitCode::Success,
            data: Some(data),
            error: None,
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: Some(command.to_string()),
            exit_code: code.into(),
        }
    }
}

impl JsonResponse<()> {
    pub fn error(message: &str, code: ExitCode) -> JsonResponse<()> {
        JsonResponse {
            success: false,
            data: None,
            error: Some(message.to_string()),
            timestamp: chrono::Utc::now().to_rfc3339(),
            command: None,
            exit_code: code.into(),
        }
    }
}

/// Result of a single command.
///
/// Serializes to the bare data object, e.g. `{"publicKey": "..", "secretKey": ".."}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(untagged, rename_all_fields = "camelCase")]
pub enum CommandOutput {
    KeyPair { public_key: String, secret_key: String },
    Mnemonic { mnemonic: String, word_count: usize },
    Validity { valid: bool },
    Signature { signature: String },
    SignedMessage { signed_message: String },
    /// `None` when the signed message did not authenticate.
    Message { message: Option<String> },
    Encrypted(EncryptedMessage),
    /// Effective configuration after overrides.
    Config(Config),
    /// Configuration file written by `config init`.
    ConfigFile { path: String },
}

impl CommandOutput {
    /// Exit code the command finishes with.
    ///
    /// A negative answer (`valid: false`, no authenticated message) is a
    /// verification failure even though the command itself ran fine.
    pub fn exit_code(&self) -> ExitCode {
        match self {
            CommandOutput::Validity { valid: false } | CommandOutput::Message { message: None } => {
                ExitCode::VerificationFailed
            }
            _ => ExitCode::Success,
        }
    }

    fn to_text(&self) -> String {
        match self {
            CommandOutput::KeyPair {
                public_key,
                secret_key,
            } => format!("public_key: {public_key}\nsecret_key: {secret_key}"),
            CommandOutput::Mnemonic { mnemonic, .. } => mnemonic.clone(),
            CommandOutput::Validity { valid } => valid.to_string(),
            CommandOutput::Signature { signature } => signature.clone(),
            CommandOutput::SignedMessage { signed_message } => signed_message.clone(),
            CommandOutput::Message { message } => message.clone().unwrap_or_default(),
            CommandOutput::Encrypted(envelope) => format!(
                "nonce: {}\nencrypted_message: {}",
                envelope.nonce, envelope.encrypted_message
            ),
            CommandOutput::Config(config) => config
                .to_toml()
                .unwrap_or_else(|e| format!("# {e}")),
            CommandOutput::ConfigFile { path } => format!("wrote {path}"),
        }
    }
}

/// Formats output for different modes
pub struct OutputFormatter {
    format: OutputFormat,
    verbose: bool,
}

impl OutputFormatter {
    pub fn new(format: OutputFormat, verbose: bool) -> Self {
        Self { format, verbose }
    }

    /// Format the result of `command`
    pub fn format_output(&self, output: &CommandOutput, command: &str) -> String {
        match self.format {
            OutputFormat::Text => output.to_text(),
            OutputFormat::Json => {
                self.to_json_response(output, command, output.exit_code())
            }
        }
    }

    /// Format error with exit code context
    pub fn format_error_with_code(&self, error: &anyhow::Error, code: ExitCode) -> String {
        match self.format {
            OutputFormat::Text if self.verbose => format!(
                "Error: {error:#}\n{} (exit code {}): {}",
                code.name(),
                i32::from(code),
                code.description()
            ),
            OutputFormat::Text => format!("Error: {error:#}"),
            OutputFormat::Json => {
                let response = JsonResponse::<()>::error(&format!("{error:#}"), code);
                self.to_json(&response)
            }
        }
    }

    /// Progress message on stderr, only shown in verbose text mode
    pub fn progress(&self, message: &str) {
        if self.verbose && self.format == OutputFormat::Text {
            eprintln!("... {message}");
        }
    }

    /// Warning on stderr, text mode only
    pub fn warning(&self, message: &str) {
        if self.format == OutputFormat::Text {
            eprintln!("warning: {message}");
        }
    }

    fn to_json<T: Serialize>(&self, value: &T) -> String {
        serde_json::to_string_pretty(value).unwrap_or_else(|e| format!("{{\"error\": \"{e}\"}}"))
    }

    fn to_json_response<T: Serialize>(&self, value: &T, command: &str, code: ExitCode) -> String {
        let response = JsonResponse::success_with_command(value, command, code);
        serde_json::to_string_pretty(&response).unwrap_or_else(|e| {
            self.to_json(&JsonResponse::<()>::error(
                &format!("Serialization error: {e}"),
                ExitCode::GeneralError,
            ))
        })
    }
}
