use anyhow::{bail, Result};
use clap::{Args, Parser, Subcommand};
use log::info;
use std::path::PathBuf;
use std::time::Duration;

use crate::output::{Hint, OutputChannel};

#[derive(Parser)]
#[command(name = "outchan")]
#[command(author, version, about = "Print status output the way a CLI would", long_about = None)]
pub struct Cli {
    #[command(subcommand)]
    command: Commands,

    /// Emit timestamped debug traces instead of spinners
    #[arg(short, long, global = true, env = "OUTCHAN_DEBUG")]
    pub debug: bool,

    /// Configuration file (defaults to ./outchan.{toml,json,yaml,yml})
    #[arg(short, long, global = true)]
    pub config: Option<PathBuf>,
}

#[derive(Args)]
struct HintArgs {
    /// Documentation slug, expanded through the configured URL template
    #[arg(short, long)]
    slug: Option<String>,

    /// Raw link, used when no slug is given
    #[arg(short, long)]
    link: Option<String>,

    /// Label in front of the link
    #[arg(short, long)]
    action: Option<String>,
}

impl From<HintArgs> for Hint {
    fn from(args: HintArgs) -> Self {
        Self {
            slug: args.slug,
            link: args.link,
            action: args.action,
        }
    }
}

#[derive(Subcommand)]
enum Commands {
    /// Print a status line
    Log { text: String },

    /// Print a muted line
    Dim { text: String },

    /// Print a note
    Note { text: String },

    /// Print a boxed warning
    Warn {
        text: String,

        #[command(flatten)]
        hint: HintArgs,
    },

    /// Print an error
    Error {
        text: String,

        #[command(flatten)]
        hint: HintArgs,
    },

    /// Print a ready banner
    Ready { text: String },

    /// Print a success banner
    Success { text: String },

    /// Show a spinner for a while, then report success
    Spin {
        message: String,

        #[arg(short, long, default_value_t = 2.0)]
        seconds: f64,

        /// Milliseconds before the spinner shows up
        #[arg(long)]
        delay_ms: Option<u64>,
    },
}

impl Cli {
    async fn execute_spin(
        output: &OutputChannel,
        message: &str,
        seconds: f64,
        delay_ms: Option<u64>,
    ) -> Result<()> {
        if !seconds.is_finite() || seconds < 0.0 {
            bail!("--seconds must be a non-negative number, got {seconds}");
        }

        info!("Spinning for {seconds}s");
        let Ok(duration) = Duration::try_from_secs_f64(seconds) else {
            bail!("--seconds is too large, got {seconds}");
        };

        output
            .time(format!("Spinning: {message}"), async {
                match delay_ms {
                    Some(delay_ms) => {
                        output.set_spinner_with_delay(message, Duration::from_millis(delay_ms));
                    }
                    None => output.set_spinner(message),
                }
                tokio::time::sleep(duration).await;
                Ok::<_, anyhow::Error>(())
            })
            .await?;

        output.success(format!("{message} [{seconds}s]"));
        Ok(())
    }

    pub async fn execute(self, output: &OutputChannel) -> Result<()> {
        match self.command {
            Commands::Log { text } => output.log(text),
            Commands::Dim { text } => output.dim(text),
            Commands::Note { text } => output.note(text),
            Commands::Warn { text, hint } => output.warn(text, &hint.into()),
            Commands::Error { text, hint } => output.error(text, &hint.into()),
            Commands::Ready { text } => output.ready(text),
            Commands::Success { text } => output.success(text),
            Commands::Spin {
                message,
                seconds,
                delay_ms,
            } => Self::execute_spin(output, &message, seconds, delay_ms).await?,
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use clap::CommandFactory;

    #[test]
    fn test_cli_definition_is_valid() {
        Cli::command().debug_assert();
    }

    #[test]
    fn test_parse_warn_with_hint() {
        let cli = Cli::try_parse_from([
            "outchan", "warn", "careful", "--slug", "my-slug", "--action", "Docs",
        ])
        .unwrap();

        match cli.command {
            Commands::Warn { text, hint } => {
                assert_eq!(text, "careful");
                let hint = Hint::from(hint);
                assert_eq!(hint.slug.as_deref(), Some("my-slug"));
                assert_eq!(hint.action_label(), "Docs");
                assert!(hint.link.is_none());
            }
            _ => panic!("expected warn command"),
        }
    }

    #[test]
    fn test_parse_global_flags_after_subcommand() {
        let cli = Cli::try_parse_from([
            "outchan",
            "spin",
            "Deploying",
            "--seconds",
            "0.5",
            "--debug",
            "--config",
            "custom.toml",
        ])
        .unwrap();

        assert!(cli.debug);
        assert_eq!(cli.config, Some(PathBuf::from("custom.toml")));
        assert!(matches!(
            cli.command,
            Commands::Spin { seconds, delay_ms: None, .. } if (seconds - 0.5).abs() < f64::EPSILON
        ));
    }

    #[tokio::test]
    async fn test_spin_rejects_negative_seconds() {
        let output = OutputChannel::new(&crate::config::Config::default()).unwrap();
        let result = Cli::execute_spin(&output, "nope", -1.0, None).await;
        assert!(result.unwrap_err().to_string().contains("non-negative"));
    }

    #[tokio::test]
    async fn test_spin_rejects_oversized_seconds() {
        let output = OutputChannel::new(&crate::config::Config::default()).unwrap();
        let result = Cli::execute_spin(&output, "forever", 1e20, None).await;
        assert!(result.unwrap_err().to_string().contains("too large"));
    }
}
