//! Forkful CLI - Terminal front end for the restaurant backend.
//!
//! # Usage
//!
//! ```bash
//! # Sign in (prints a URL), then finish with the code from the callback
//! forkful login
//! forkful login --code <CODE> --verifier <VERIFIER>
//!
//! # Profile
//! forkful user show
//! forkful user update --name Ana --city Metropolis
//!
//! # Restaurant
//! forkful restaurant show
//! forkful restaurant create --draft luigi.json --image luigi.png
//! forkful restaurant update --image new.png
//!
//! # Search
//! forkful search Metropolis --page 2
//! ```
//!
//! Configuration comes from the environment (or `.env`); see
//! `forkful_client::config`. Logs go to stderr, filtered by `RUST_LOG`.

#![cfg_attr(not(test), forbid(unsafe_code))]

use std::path::PathBuf;

use clap::{Parser, Subcommand};
use forkful_client::ClientConfig;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

mod commands;
mod effects;
mod render;
mod session;

use commands::CliError;
use commands::user::ProfileArgs;
use render::Format;
use session::Session;

#[derive(Parser)]
#[command(name = "forkful")]
#[command(author, version, about = "Forkful restaurant client")]
struct Cli {
    /// Print records as JSON
    #[arg(long, global = true)]
    json: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Sign in with Auth0
    Login {
        /// Authorization code from the callback URL
        #[arg(long, requires = "verifier")]
        code: Option<String>,

        /// PKCE verifier printed when the login started
        #[arg(long, requires = "code")]
        verifier: Option<String>,
    },
    /// Resolve the signed-in identity and provision the backend user
    Callback,
    /// Manage your profile
    User {
        #[command(subcommand)]
        action: UserAction,
    },
    /// Manage your restaurant
    Restaurant {
        #[command(subcommand)]
        action: RestaurantAction,
    },
    /// Search restaurants by city
    Search {
        /// City to search in
        city: String,

        /// Result page, starting at 1
        #[arg(short, long, default_value_t = 1)]
        page: u32,
    },
}

#[derive(Subcommand)]
enum UserAction {
    /// Show your profile
    Show,
    /// Update profile fields
    Update(ProfileArgs),
}

#[derive(Subcommand)]
enum RestaurantAction {
    /// Show your restaurant
    Show,
    /// Create your restaurant
    Create {
        /// JSON draft file
        #[arg(long)]
        draft: PathBuf,

        /// Restaurant image
        #[arg(long)]
        image: PathBuf,
    },
    /// Update your restaurant
    Update {
        /// JSON draft file (defaults to the stored restaurant)
        #[arg(long)]
        draft: Option<PathBuf>,

        /// New restaurant image
        #[arg(long)]
        image: Option<PathBuf>,
    },
}

#[tokio::main]
async fn main() {
    // Load .env before the filter reads RUST_LOG
    dotenvy::dotenv().ok();

    let env_filter = tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "forkful_client=info,forkful_cli=info".into());

    tracing_subscriber::registry()
        .with(env_filter)
        .with(tracing_subscriber::fmt::layer().with_writer(std::io::stderr))
        .init();

    let cli = Cli::parse();

    if let Err(e) = run(cli).await {
        if !e.already_reported() {
            tracing::error!("Command failed: {e}");
        }
        std::process::exit(1);
    }
}

async fn run(cli: Cli) -> Result<(), CliError> {
    let format = if cli.json { Format::Json } else { Format::Text };
    let config = ClientConfig::from_env()?;

    match cli.command {
        Commands::Login {
            code: Some(code),
            verifier: Some(verifier),
        } => commands::login::finish(config, &code, verifier, format).await,
        Commands::Login { .. } => commands::login::start(&config),
        command => {
            let session = Session::from_config(config, format)?;
            dispatch(&session, command).await
        }
    }
}

async fn dispatch(session: &Session, command: Commands) -> Result<(), CliError> {
    match command {
        Commands::Login { .. } => commands::login::start(&session.config),
        Commands::Callback => commands::login::callback(session).await,
        Commands::User { action } => match action {
            UserAction::Show => commands::user::show(session).await,
            UserAction::Update(args) => commands::user::update(session, args).await,
        },
        Commands::Restaurant { action } => match action {
            RestaurantAction::Show => commands::restaurant::show(session).await,
            RestaurantAction::Create { draft, image } => {
                commands::restaurant::create(session, &draft, &image).await
            }
            RestaurantAction::Update { draft, image } => {
                commands::restaurant::update(session, draft.as_deref(), image.as_deref()).await
            }
        },
        Commands::Search { city, page } => commands::search::run(session, &city, page).await,
    }
}
