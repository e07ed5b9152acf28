//! Property-based tests for the dtnb CLI

use proptest::prelude::*;

use crate::cli::Cli;
use crate::config::{CliOverrides, Config};
use crate::output::{CommandOutput, OutputFormat, OutputFormatter};
use crate::ExitCode;
use clap::Parser;

fn output_format_strategy() -> impl Strategy<Value = String> {
    prop_oneof![Just("text".to_string()), Just("json".to_string())]
}

fn log_level_strategy() -> impl Strategy<Value = String> {
    prop_oneof![
        Just("error".to_string()),
        Just("warn".to_string()),
        Just("info".to_string()),
        Just("debug".to_string()),
        Just("trace".to_string()),
    ]
}

fn word_count_strategy() -> impl Strategy<Value = usize> {
    prop_oneof![Just(12usize), Just(15), Just(18), Just(21), Just(24)]
}

fn hex_strategy(bytes: usize) -> impl Strategy<Value = String> {
    prop::collection::vec(any::<u8>(), bytes).prop_map(|b| {
        b.iter().map(|byte| format!("{byte:02x}")).collect()
    })
}

fn command_output_strategy() -> impl Strategy<Value = CommandOutput> {
    prop_oneof![
        (hex_strategy(32), hex_strategy(32)).prop_map(|(public_key, secret_key)| {
            CommandOutput::KeyPair { public_key, secret_key }
        }),
        any::<bool>().prop_map(|valid| CommandOutput::Validity { valid }),
        hex_strategy(64).prop_map(|signature| CommandOutput::Signature { signature }),
        proptest::option::of(".*").prop_map(|message| CommandOutput::Message { message }),
    ]
}

proptest! {
    #![proptest_config(ProptestConfig::with_cases(100))]

    /// CLI output format takes precedence over the config file
    #[test]
    fn test_config_override_output_format(
        config_format in output_format_strategy(),
        cli_format in output_format_strategy()
    ) {
        let mut config = Config::default();
        config.output.format = config_format;

        let overrides = CliOverrides {
            output_format: Some(cli_format.clone()),
            ..Default::default()
        };

        let result = config.with_overrides(&overrides);
        prop_assert_eq!(&result.output.format, &cli_format);
    }

    /// Without overrides the config file values are kept
    #[test]
    fn test_config_preserved_without_overrides(
        format in output_format_strategy(),
        level in log_level_strategy(),
        words in word_count_strategy(),
        verbose in any::<bool>()
    ) {
        let mut config = Config::default();
        config.output.format = format.clone();
        config.output.verbose = verbose;
        config.logging.level = level.clone();
        config.mnemonic.word_count = words;

        let result = config.with_overrides(&CliOverrides::default());
        prop_assert_eq!(&result.output.format, &format);
        prop_assert_eq!(result.output.verbose, verbose);
        prop_assert_eq!(&result.logging.level, &level);
        prop_assert_eq!(result.mnemonic.word_count, words);
        prop_assert!(result.validate().is_ok());
    }

    /// Only the documented word counts validate
    #[test]
    fn test_word_count_validation(words in 0usize..40) {
        let mut config = Config::default();
        config.mnemonic.word_count = words;
        let valid = matches!(words, 12 | 15 | 18 | 21 | 24);
        prop_assert_eq!(config.validate().is_ok(), valid);
    }

    /// JSON output is always valid JSON following the response schema
    #[test]
    fn test_json_output_is_valid(output in command_output_strategy()) {
        let formatter = OutputFormatter::new(OutputFormat::Json, false);
        let rendered = formatter.format_output(&output, "test");

        let json: serde_json::Value = serde_json::from_str(&rendered).unwrap();
        prop_assert_eq!(json["success"].as_bool(), Some(output.exit_code() == ExitCode::Success));
        prop_assert_eq!(json["exit_code"].as_i64(), Some(i32::from(output.exit_code()) as i64));
        prop_assert_eq!(json["command"].as_str(), Some("test"));
        prop_assert!(json.get("data").is_some());

        let ts = json["timestamp"].as_str().unwrap();
        prop_assert!(chrono::DateTime::parse_from_rfc3339(ts).is_ok());
    }

    /// Signing and verifying through the command layer agree for any message
    #[test]
    fn test_sign_then_verify_commands(seed in hex_strategy(32), message in "[a-zA-Z0-9 ,.!?]{0,64}") {
        let config = Config::default();
        let run = |args: Vec<&str>| {
            Cli::try_parse_from(std::iter::once("dtnb").chain(args))
                .unwrap()
                .command
                .run(&config)
                .unwrap()
        };

        let CommandOutput::KeyPair { public_key, .. } = run(vec!["new", "--secret-key", seed.as_str()]) else {
            panic!("expected a key pair");
        };
        let CommandOutput::Signature { signature } =
            run(vec!["signature", message.as_str(), "--secret-key", seed.as_str()])
        else {
            panic!("expected a signature");
        };

        let verified = run(vec![
            "verify",
            signature.as_str(),
            message.as_str(),
            "--public-key",
            public_key.as_str(),
        ]);
        prop_assert_eq!(verified, CommandOutput::Validity { valid: true });
    }
}
