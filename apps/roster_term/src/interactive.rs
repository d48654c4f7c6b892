use std::sync::Arc;

use anyhow::Result;
use roster_core::{RosterSession, SessionEvent};
use tokio::task::JoinHandle;
use tracing::debug;

use crate::{
    prompt::StdinLines,
    surface::{draw_notice, draw_view},
};

const HELP: &str = "\
commands:
  list                          redraw the roster
  refresh                       re-fetch the roster
  select <activity>             choose the activity for signup
  email <address>               fill in the email field
  submit                        sign up with the selected activity and email
  unregister <email> <activity> remove a participant (asks first)
  help                          show this text
  quit                          leave";

#[derive(Debug, PartialEq, Eq)]
pub enum Command {
    List,
    Refresh,
    Select(String),
    Email(String),
    Submit,
    Unregister { email: String, activity: String },
    Help,
    Quit,
    Unknown(String),
}

pub fn parse_command(line: &str) -> Option<Command> {
    let line = line.trim();
    if line.is_empty() {
        return None;
    }

    let (verb, rest) = line
        .split_once(char::is_whitespace)
        .map(|(verb, rest)| (verb, rest.trim()))
        .unwrap_or((line, ""));

    let command = match verb.to_ascii_lowercase().as_str() {
        "list" | "ls" => Command::List,
        "refresh" => Command::Refresh,
        "select" => Command::Select(rest.to_string()),
        "email" => Command::Email(rest.to_string()),
        "submit" => Command::Submit,
        "unregister" => match rest.split_once(char::is_whitespace) {
            Some((email, activity)) if !activity.trim().is_empty() => Command::Unregister {
                email: email.to_string(),
                activity: activity.trim().to_string(),
            },
            _ => Command::Unknown(line.to_string()),
        },
        "help" | "?" => Command::Help,
        "quit" | "exit" => Command::Quit,
        _ => Command::Unknown(line.to_string()),
    };
    Some(command)
}

fn spawn_event_printer(session: &RosterSession) -> JoinHandle<()> {
    let mut events = session.subscribe_events();
    tokio::spawn(async move {
        while let Ok(event) = events.recv().await {
            match event {
                SessionEvent::NoticeShown(notice) => println!("{}", draw_notice(&notice)),
                other => debug!("event: {other:?}"),
            }
        }
    })
}

pub async fn run(session: Arc<RosterSession>, input: StdinLines) -> Result<()> {
    let printer = spawn_event_printer(&session);
    println!("{HELP}\n");

    session.refresh().await;
    print!("{}", draw_view(&session.view().await));

    while let Some(line) = input.read_line("> ").await? {
        let Some(command) = parse_command(&line) else {
            continue;
        };

        match command {
            Command::List => print!("{}", draw_view(&session.view().await)),
            Command::Refresh => {
                session.refresh().await;
                print!("{}", draw_view(&session.view().await));
            }
            Command::Select(activity) => {
                if !session.select_activity(&activity).await {
                    println!("no such activity: {activity}");
                }
            }
            Command::Email(email) => session.set_email(&email).await,
            Command::Submit => {
                if session.submit_signup().await.is_applied() {
                    print!("{}", draw_view(&session.view().await));
                }
            }
            Command::Unregister { email, activity } => {
                if session.unregister(&activity, &email).await.is_applied() {
                    print!("{}", draw_view(&session.view().await));
                }
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => break,
            Command::Unknown(line) => println!("unrecognized command: {line} (try `help`)"),
        }
    }

    printer.abort();
    Ok(())
}
