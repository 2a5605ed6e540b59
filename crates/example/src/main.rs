//! Lodestar demo CLI.
//!
//! Prints tool definitions and dispatches tool calls against the demo tools.
//!
//! # Usage
//!
//! ```bash
//! lodestar-demo schema --format anthropic --allow forecast,greet
//! lodestar-demo call add '{"a": 2, "b": 3}'
//! echo '{"id": "1", "name": "greet", "arguments": "{}"}' | lodestar-demo replay
//! ```

use clap::{Args, Parser, Subcommand};
use lodestar::prelude::ToolFormat;
use lodestar_example::config::ClientConfig;
use lodestar_example::{Demo, DemoError};
use std::io::Write;
use std::process::ExitCode;
use tokio::io::{AsyncBufReadExt, BufReader};

/// Lodestar demo client
#[derive(Debug, Parser)]
#[command(name = "lodestar-demo", version, about = "Inspect and call the Lodestar demo tools")]
struct Cli {
    #[command(flatten)]
    config: ClientConfig,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print tool definitions as JSON
    Schema(SchemaArgs),
    /// Dispatch a single tool call
    Call(CallArgs),
    /// Dispatch one JSON tool call per line of stdin
    Replay,
}

#[derive(Debug, Args)]
struct SchemaArgs {
    /// Mark optional parameters as not required
    #[arg(long)]
    loose: bool,

    /// Output format, overriding the configured default
    #[arg(long)]
    format: Option<ToolFormat>,

    /// Only include these tools (comma separated)
    #[arg(long, value_delimiter = ',')]
    allow: Vec<String>,
}

#[derive(Debug, Args)]
struct CallArgs {
    /// Tool name
    name: String,

    /// Arguments as a JSON object
    arguments: Option<String>,
}

#[tokio::main]
async fn main() -> ExitCode {
    let env_file = ClientConfig::load_env_file();
    let cli = Cli::parse();
    cli.config.logging().init();
    if let Some(path) = env_file {
        tracing::debug!(path = %path.display(), "loaded environment file");
    }

    match run(cli).await {
        Ok(()) => ExitCode::SUCCESS,
        Err(err) => {
            tracing::error!(error = %err, "command failed");
            writeln!(std::io::stderr(), "error: {err}").ok();
            ExitCode::FAILURE
        }
    }
}

async fn run(cli: Cli) -> Result<(), DemoError> {
    let demo = Demo::new()?;

    match cli.command {
        Command::Schema(args) => {
            let mut options = cli.config.render_options().with_strict(!args.loose);
            if let Some(format) = args.format {
                options = options.with_format(format);
            }
            let schema = demo.schema(&options, &args.allow);
            writeln!(std::io::stdout(), "{}", serde_json::to_string_pretty(&schema)?)?;
        }
        Command::Call(args) => {
            let arguments = args.arguments.as_deref().unwrap_or_default();
            let output = demo.call(&args.name, arguments).await?;
            writeln!(
                std::io::stdout(),
                "{}",
                serde_json::to_string_pretty(&output.into_value())?
            )?;
        }
        Command::Replay => {
            let mut lines = BufReader::new(tokio::io::stdin()).lines();
            let mut replayed = 0usize;
            while let Some(line) = lines.next_line().await? {
                if line.trim().is_empty() {
                    continue;
                }
                let reply = demo.replay_line(&line).await;
                writeln!(std::io::stdout(), "{reply}")?;
                replayed += 1;
            }
            tracing::info!(
                calls = replayed,
                forecasts = demo.weather().requests(),
                "replay finished"
            );
        }
    }

    Ok(())
}
