use std::{io::Write as _, sync::Arc};

use anyhow::Result;
use async_trait::async_trait;
use roster_core::{mutation::confirmation_prompt, UnregisterConfirmation};
use tokio::{
    io::{stdin, AsyncBufReadExt, BufReader, Lines, Stdin},
    sync::Mutex,
};
use tracing::warn;

#[derive(Clone)]
pub struct StdinLines {
    lines: Arc<Mutex<Lines<BufReader<Stdin>>>>,
}

impl StdinLines {
    pub fn new() -> Self {
        Self {
            lines: Arc::new(Mutex::new(BufReader::new(stdin()).lines())),
        }
    }

    /// Prints `prompt` and reads one line; `None` on end of input.
    pub async fn read_line(&self, prompt: &str) -> Result<Option<String>> {
        print!("{prompt}");
        std::io::stdout().flush()?;
        Ok(self.lines.lock().await.next_line().await?)
    }
}

pub struct StdinConfirmation {
    input: StdinLines,
}

impl StdinConfirmation {
    pub fn new(input: StdinLines) -> Self {
        Self { input }
    }
}

pub fn is_yes(answer: &str) -> bool {
    matches!(answer.trim().to_ascii_lowercase().as_str(), "y" | "yes")
}

#[async_trait]
impl UnregisterConfirmation for StdinConfirmation {
    async fn confirm(&self, activity: &str, email: &str) -> bool {
        let prompt = format!("{} [y/N] ", confirmation_prompt(activity, email));
        match self.input.read_line(&prompt).await {
            Ok(Some(answer)) => is_yes(&answer),
            Ok(None) => false,
            Err(err) => {
                warn!("prompt: could not read confirmation: {err}");
                false
            }
        }
    }
}
