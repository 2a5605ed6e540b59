//! Client configuration.
//!
//! Every setting is a global command-line flag with an environment variable
//! fallback. Variables may also come from a `.env` file in the working
//! directory or one of its parents.

use crate::logging::{LogFormat, Logging};
use clap::Args;
use lodestar::prelude::{RenderOptions, ToolFormat};
use std::path::PathBuf;

/// Settings shared by every subcommand.
#[derive(Debug, Clone, Args)]
pub struct ClientConfig {
    /// Log filter directives, e.g. `lodestar_tools=debug`
    #[arg(long = "log", env = "LODESTAR_LOG", default_value = "warn", global = true)]
    pub log_filter: String,

    /// Log output format
    #[arg(
        long,
        env = "LODESTAR_LOG_FORMAT",
        value_enum,
        default_value = "compact",
        global = true
    )]
    pub log_format: LogFormat,

    /// Default tool definition format (function, chat_completions, anthropic)
    #[arg(
        long,
        env = "LODESTAR_SCHEMA_FORMAT",
        default_value = "function",
        global = true
    )]
    pub schema_format: ToolFormat,
}

impl ClientConfig {
    /// Loads variables from a `.env` file, if one is found.
    ///
    /// Call before parsing so the file can supply flag fallbacks. Variables
    /// already set in the environment take precedence.
    pub fn load_env_file() -> Option<PathBuf> {
        dotenvy::dotenv().ok()
    }

    /// Returns the subscriber configuration for these settings.
    #[must_use]
    pub fn logging(&self) -> Logging {
        Logging::new()
            .with_format(self.log_format)
            .with_env_filter(&self.log_filter)
    }

    /// Returns strict render options in the configured format.
    #[must_use]
    pub fn render_options(&self) -> RenderOptions {
        RenderOptions::default().with_format(self.schema_format)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::Parser;

    #[derive(Debug, Parser)]
    struct TestCli {
        #[command(flatten)]
        config: ClientConfig,
    }

    #[test]
    fn flags_override_defaults() {
        let cli = TestCli::parse_from([
            "demo",
            "--log",
            "lodestar_tools=trace",
            "--log-format",
            "json",
            "--schema-format",
            "anthropic",
        ]);
        assert_eq!(cli.config.log_filter, "lodestar_tools=trace");
        assert_eq!(cli.config.log_format, LogFormat::Json);
        assert_eq!(cli.config.logging().format(), LogFormat::Json);

        let options = cli.config.render_options();
        assert!(options.strict);
        assert_eq!(options.format, ToolFormat::Anthropic);
    }

    #[test]
    fn schema_format_accepts_aliases() {
        let cli = TestCli::parse_from(["demo", "--schema-format", "chat"]);
        assert_eq!(cli.config.schema_format, ToolFormat::ChatCompletions);
    }

    #[test]
    fn unknown_schema_format_is_rejected() {
        assert!(TestCli::try_parse_from(["demo", "--schema-format", "xml"]).is_err());
    }
}
