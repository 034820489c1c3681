//! Guessr - Command line client for the Akinator guessing game.
//!
//! # Usage
//!
//! Check which servers of the configured game are up:
//!
//! ```bash
//! guessr --config config.yaml servers
//! ```
//!
//! Play a scripted game, `b` undoing the last answer:
//!
//! ```bash
//! guessr --language french play --answers y,n,dk,b,p,pn
//! ```
//!
//! # Configuration
//!
//! See [`guessr::config`] for the YAML format. Any value can be overridden with a
//! `GUESSR_` environment variable, such as `GUESSR_GAME__LANGUAGE=german`.
//!
//! # Environment Variables
//!
//! - `RUST_LOG` - Controls logging level (default: `info`)

use std::sync::Arc;

use anyhow::{Context, anyhow};
use clap::{Parser, Subcommand};
use env_logger::Env;
use log::{info, warn};

use guessr::{
    Error,
    api::{ApiRequester, Requester},
    builder::ClientBuilder,
    commands::{Move, parse_script},
    config::Config,
    credentials::{CredentialProvider, ScrapedCredential, StaticCredential},
    servers::{Catalog, Category, Language, Prober},
    session::{DEFAULT_GUESS_THRESHOLD, Session},
};

/// Command-line arguments.
#[derive(Parser, Debug)]
#[command(version, about, long_about = None)]
struct Args {
    /// Path to the YAML configuration file.
    #[arg(short, long)]
    config: Option<String>,

    /// Language of the game, overriding the configuration.
    #[arg(short, long)]
    language: Option<Language>,

    /// Category of the game, overriding the configuration.
    #[arg(long)]
    category: Option<Category>,

    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Probe every server of the game and print whether it is up
    Servers,
    /// Play a scripted game and print the guesses
    Play {
        /// Comma separated answers: y, n, dk, p, pn, or b to undo
        #[arg(short, long, default_value = "")]
        answers: String,

        /// Probability above which a guess is suggested
        #[arg(short, long, default_value_t = DEFAULT_GUESS_THRESHOLD)]
        threshold: f64,
    },
}

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    // Put logger at info level by default
    let env = Env::default().filter_or("RUST_LOG", "info");
    env_logger::init_from_env(env);

    info!("Starting guessr {}...", env!("CARGO_PKG_VERSION"));

    let args = Args::parse();

    let mut config = Config::load(args.config.as_deref())
        .map_err(|e| anyhow!("failed to load configuration: {}", e))?;
    if let Some(language) = args.language {
        config.game.language = language;
    }
    if let Some(category) = args.category {
        config.game.category = category;
    }

    let client = reqwest::Client::builder()
        .user_agent(&config.http.user_agent)
        .connect_timeout(config.http.connect_timeout())
        .build()
        .context("failed to build the HTTP client")?;

    match config.credential.as_deref() {
        Some(credential) => {
            let requester = ApiRequester::with_client(client, StaticCredential::new(credential));
            run(args.command, &config, requester).await
        }
        None => {
            let credentials = ScrapedCredential::new(client.clone(), &config.http.front_url);
            run(args.command, &config, ApiRequester::with_client(client, credentials)).await
        }
    }
}

async fn run<C: CredentialProvider>(
    command: Command,
    config: &Config,
    requester: ApiRequester<C>,
) -> anyhow::Result<()> {
    let requester = Arc::new(requester);
    let catalog = Arc::new(config.catalog());

    match command {
        Command::Servers => servers(requester, &catalog, config).await,
        Command::Play { answers, threshold } => {
            play(requester, catalog, config, &answers, threshold).await
        }
    }
}

/// Prints whether each server of the configured game is up.
async fn servers<R: Requester>(
    requester: Arc<R>,
    catalog: &Catalog,
    config: &Config,
) -> anyhow::Result<()> {
    let group = catalog.lookup(config.game.language, config.game.category)?;
    let prober = Prober::new(requester);

    println!("{}/{}:", group.language(), group.category());
    for endpoint in group.cursor() {
        let state = if prober.probe(endpoint).await? {
            "up"
        } else {
            "down"
        };
        println!("  {} {}", endpoint.base_url(), state);
    }

    Ok(())
}

/// Plays `script` and prints the questions and the final guesses.
async fn play<R: Requester>(
    requester: Arc<R>,
    catalog: Arc<Catalog>,
    config: &Config,
    script: &str,
    threshold: f64,
) -> anyhow::Result<()> {
    // Fail on a mistyped script before creating a session
    let moves = parse_script(script)?;

    let mut builder = ClientBuilder::new(requester, catalog)
        .language(config.game.language)
        .category(config.game.category)
        .filter_profanity(config.game.filter_profanity)
        .player_name(&config.game.player_name);
    if let Some(endpoint) = config.endpoint() {
        builder = builder.endpoint(endpoint);
    }

    let mut session = builder.build().await?;
    println!("Playing on {}", session.endpoint());
    print_question(&session);

    for next in moves {
        let outcome = match next {
            Move::Answer(answer) => {
                println!("> {}", answer);
                session.answer(answer).await
            }
            Move::Undo => {
                println!("> back");
                session.undo_answer().await
            }
        };

        match outcome {
            Ok(Some(_)) => print_question(&session),
            Ok(None) => {
                println!("No question left");
                break;
            }
            Err(Error::NothingToUndo) => {
                warn!("nothing to undo on the first question");
                continue;
            }
            Err(e) => return Err(e.into()),
        }

        if let Some(guess) = session.suggest_guess(threshold).await? {
            println!("Suggested guess: {}", guess);
            break;
        }
    }

    let guesses = session.list_guesses().await?;
    if guesses.is_empty() {
        println!("No guess yet");
    }
    for (rank, guess) in guesses.iter().enumerate() {
        println!("{}. {}", rank + 1, guess);
    }

    Ok(())
}

fn print_question<R: Requester>(session: &Session<R>) {
    if let Some(question) = session.question() {
        println!("{} [{:.1}%]", question, question.progression);
    }
}
