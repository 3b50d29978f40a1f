use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use chrono::NaiveDate;
use clap::{Parser, Subcommand};
use wayfare_assistant::VoiceAssistant;
use wayfare_core::{
    format_currency, format_happy_paisa, inr_to_happy_paisa, synthesize_response, IntentExtractor,
    IntentKind, SearchResultSet, Vocabulary, BASE_CURRENCY,
};
use wayfare_observability::{init_tracing, AppMetrics};
use wayfare_search::FixtureSearch;

#[derive(Debug, Parser)]
#[command(name = "wayfare")]
#[command(about = "Voice command interpreter for travel search")]
struct Cli {
    /// JSON vocabulary replacing the built-in city and keyword tables.
    #[arg(long, env = "WAYFARE_VOCABULARY", global = true)]
    vocabulary: Option<PathBuf>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Debug, Subcommand)]
enum Command {
    /// Print the intent extracted from an utterance as JSON.
    Classify {
        utterance: String,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
    /// Phrase a saved search response as a spoken sentence.
    Respond {
        #[arg(long)]
        results: PathBuf,
        #[arg(long, default_value = "flights")]
        kind: String,
    },
    Format {
        amount: f64,
        #[arg(long, default_value = BASE_CURRENCY)]
        currency: String,
    },
    Chat {
        #[arg(long, env = "WAYFARE_FIXTURES")]
        fixtures: Option<PathBuf>,
        #[arg(long)]
        today: Option<NaiveDate>,
    },
}

#[tokio::main]
async fn main() -> Result<()> {
    init_tracing("wayfare_cli");
    let cli = Cli::parse();

    let vocabulary = load_vocabulary(cli.vocabulary.as_deref())?;
    let extractor = IntentExtractor::new(vocabulary);

    match cli.command {
        Command::Classify { utterance, today } => {
            let intent = match today {
                Some(today) => extractor.classify(&utterance, today),
                None => extractor.classify_now(&utterance),
            };
            println!("{}", serde_json::to_string_pretty(&intent)?);
        }
        Command::Respond { results, kind } => {
            let kind = IntentKind::parse(&kind).context("invalid --kind value")?;
            let raw = fs::read_to_string(&results)
                .with_context(|| format!("failed reading results from {}", results.display()))?;
            let parsed: SearchResultSet =
                serde_json::from_str(&raw).context("results file is not a search response")?;
            println!("{}", synthesize_response(Some(&parsed), kind));
        }
        Command::Format { amount, currency } => {
            let formatted = format_currency(amount, &currency);
            if currency.eq_ignore_ascii_case(BASE_CURRENCY) {
                println!(
                    "{} ({})",
                    formatted,
                    format_happy_paisa(inr_to_happy_paisa(amount))
                );
            } else {
                println!("{formatted}");
            }
        }
        Command::Chat { fixtures, today } => {
            let search = match fixtures {
                Some(path) => FixtureSearch::from_json_file(&path)
                    .with_context(|| format!("failed loading fixtures from {}", path.display()))?,
                None => FixtureSearch::demo(),
            };
            let metrics = AppMetrics::shared();
            let assistant = VoiceAssistant::new(extractor, Arc::new(search), metrics.clone());
            run_chat(assistant, today).await?;
            println!("{}", serde_json::to_string_pretty(&metrics.snapshot())?);
        }
    }

    Ok(())
}

async fn run_chat(
    assistant: VoiceAssistant<FixtureSearch>,
    today: Option<NaiveDate>,
) -> Result<()> {
    println!("Wayfare voice console. type 'exit' to quit.");

    loop {
        print!("> ");
        io::stdout().flush()?;

        let mut line = String::new();
        if io::stdin().read_line(&mut line)? == 0 {
            break;
        }

        let utterance = line.trim();
        if utterance.eq_ignore_ascii_case("exit") || utterance.eq_ignore_ascii_case("quit") {
            break;
        }

        if utterance.is_empty() {
            continue;
        }

        let reply = assistant.handle_utterance(utterance, today).await?;
        println!("\n{}\n", reply.reply_text);
    }

    Ok(())
}

fn load_vocabulary(path: Option<&Path>) -> Result<Arc<Vocabulary>> {
    match path {
        Some(path) => {
            let vocabulary = Vocabulary::from_json_file(path)
                .with_context(|| format!("failed loading vocabulary from {}", path.display()))?;
            Ok(Arc::new(vocabulary))
        }
        None => Ok(Vocabulary::builtin()),
    }
}
