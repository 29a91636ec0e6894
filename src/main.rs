use std::sync::Arc;

use anyhow::Context;
use tokio::io::{AsyncBufReadExt, BufReader};
use tracing::{error, info, warn};
use tracing_subscriber::EnvFilter;

use farm_connect::messaging::ConsoleMessenger;
use farm_connect::oracle::GeminiOracle;
use farm_connect::seed::seed_sample_data;
use farm_connect::store::{JsonFileStore, Store};
use farm_connect::{Bot, Config, MatchingEngine};

const FALLBACK_REPLY: &str =
    "Sorry, something went wrong. Please try again or type 'menu' for main menu.";

/// One line typed at the console
#[derive(Debug, PartialEq)]
enum Input<'a> {
    /// Switch the simulated sender
    As(&'a str),
    /// Turn carrying an attachment reference
    Attach { reference: &'a str, text: &'a str },
    Seed,
    Quit,
    Turn(&'a str),
}

fn parse_input(line: &str) -> Input<'_> {
    let line = line.trim();
    let (command, rest) = line.split_once(' ').unwrap_or((line, ""));
    let rest = rest.trim();

    match command {
        "/quit" | "/exit" => Input::Quit,
        "/seed" => Input::Seed,
        "/as" if !rest.is_empty() => Input::As(rest),
        "/attach" if !rest.is_empty() => {
            let (reference, text) = rest.split_once(' ').unwrap_or((rest, ""));
            Input::Attach {
                reference,
                text: text.trim(),
            }
        }
        _ => Input::Turn(line),
    }
}

fn build_engine(config: &Config) -> MatchingEngine {
    let Some(params) = config.oracle.clone() else {
        info!("Using rule-based matching");
        return MatchingEngine::rule_based();
    };

    let timeout = params.timeout;
    match GeminiOracle::new(params) {
        Ok(oracle) => {
            info!(timeout_secs = timeout.as_secs(), "🤖 AI matching enabled");
            MatchingEngine::with_oracle(Arc::new(oracle), timeout)
        }
        Err(e) => {
            warn!(error = %e, "Could not set up the scoring oracle; using rule-based matching");
            MatchingEngine::rule_based()
        }
    }
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .init();

    info!("🌾 FarmConnect console");
    info!("======================");

    let config = Config::from_env().context("Failed to load configuration")?;
    let store: Arc<dyn Store> = Arc::new(
        JsonFileStore::open(&config.data_dir)
            .await
            .context("Failed to open data store")?,
    );
    let bot = Bot::new(
        store.clone(),
        Arc::new(ConsoleMessenger::new()),
        build_engine(&config),
    );

    let mut sender = config.default_sender.clone();
    info!(%sender, "Type a message, '/as <id>' to switch sender, '/attach <ref> [text]', '/seed' or '/quit'");

    let mut lines = BufReader::new(tokio::io::stdin()).lines();
    while let Some(line) = lines.next_line().await.context("Failed to read stdin")? {
        let (text, attachment) = match parse_input(&line) {
            Input::Quit => break,
            Input::As(id) => {
                sender = id.to_string();
                info!(%sender, "Switched sender");
                continue;
            }
            Input::Seed => {
                match seed_sample_data(store.as_ref()).await {
                    Ok(ids) => info!("Created {} sample jobs", ids.len()),
                    Err(e) => error!(error = %e, "Seeding failed"),
                }
                continue;
            }
            Input::Attach { reference, text } => (text, Some(reference)),
            Input::Turn(text) => (text, None),
        };

        let reply = match bot.handle_turn(&sender, text, attachment).await {
            Ok(reply) => reply,
            Err(e) => {
                error!(%sender, "Turn failed: {:#}", e);
                FALLBACK_REPLY.to_string()
            }
        };
        println!("\n🤖 [to {}]\n{}\n", sender, reply);
    }

    info!("👋 Bye");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn console_commands() {
        assert_eq!(parse_input("/as whatsapp:+1"), Input::As("whatsapp:+1"));
        assert_eq!(
            parse_input("/attach img://1 here you go"),
            Input::Attach {
                reference: "img://1",
                text: "here you go"
            }
        );
        assert_eq!(
            parse_input("/attach img://1"),
            Input::Attach {
                reference: "img://1",
                text: ""
            }
        );
        assert_eq!(parse_input(" /quit "), Input::Quit);
        assert_eq!(parse_input("/as"), Input::Turn("/as"));
        assert_eq!(parse_input("Hi"), Input::Turn("Hi"));
    }
}
