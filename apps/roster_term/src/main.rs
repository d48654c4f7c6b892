use std::sync::Arc;

use anyhow::{Context, Result};
use clap::{Parser, Subcommand};
use roster_core::{
    load_settings, AutoConfirm, MutationOutcome, RosterSession, UnregisterConfirmation,
};
use tracing_subscriber::EnvFilter;

mod interactive;
mod prompt;
mod surface;

use prompt::{StdinConfirmation, StdinLines};
use surface::{draw_notice, draw_view};

#[derive(Parser, Debug)]
#[command(about = "Browse activities and manage their participants")]
struct Cli {
    /// Roster service root, overriding roster.toml and the environment.
    #[arg(long, global = true)]
    base_url: Option<String>,
    #[command(subcommand)]
    command: Command,
}

#[derive(Subcommand, Debug)]
enum Command {
    /// Fetch and draw the roster.
    List {
        #[arg(long)]
        json: bool,
    },
    Signup {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
    },
    Unregister {
        #[arg(long)]
        activity: String,
        #[arg(long)]
        email: String,
        /// Skip the confirmation prompt.
        #[arg(long)]
        yes: bool,
    },
    /// Keep a session open and read commands from stdin.
    Interactive,
}

#[tokio::main]
async fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_writer(std::io::stderr)
        .init();
    let cli = Cli::parse();

    let mut settings = load_settings();
    if let Some(base_url) = cli.base_url {
        settings.base_url = base_url;
    }

    let input = StdinLines::new();
    let confirmation: Arc<dyn UnregisterConfirmation> = match &cli.command {
        Command::Unregister { yes: true, .. } => Arc::new(AutoConfirm),
        _ => Arc::new(StdinConfirmation::new(input.clone())),
    };
    let session = RosterSession::connect(&settings, confirmation)
        .with_context(|| format!("failed to set up session for {}", settings.base_url))?;

    match cli.command {
        Command::List { json } => {
            session.refresh().await;
            let view = session.view().await;
            if json {
                println!("{}", serde_json::to_string_pretty(&view)?);
            } else {
                print!("{}", draw_view(&view));
            }
        }
        Command::Signup { activity, email } => {
            session.refresh().await;
            if !session.select_activity(&activity).await {
                tracing::warn!("activity '{activity}' is not in the current roster");
            }
            let outcome = session.signup(&activity, &email).await;
            report(&session, &outcome).await;
        }
        Command::Unregister {
            activity, email, ..
        } => {
            let outcome = session.unregister(&activity, &email).await;
            report(&session, &outcome).await;
        }
        Command::Interactive => interactive::run(Arc::clone(&session), input).await?,
    }

    Ok(())
}

async fn report(session: &RosterSession, outcome: &MutationOutcome) {
    if *outcome == MutationOutcome::Cancelled {
        println!("unregister cancelled");
        return;
    }
    if let Some(notice) = session.notifier().visible().await {
        println!("{}", draw_notice(&notice));
    }
    if outcome.is_applied() {
        print!("{}", draw_view(&session.view().await));
    }
}
