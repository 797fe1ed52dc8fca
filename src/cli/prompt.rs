use anyhow::Result;
use async_trait::async_trait;
use tokio::io::{self, AsyncBufReadExt, AsyncWriteExt, BufReader, Lines, Stdin};

/// Source of user answers for the interactive commands.
#[cfg_attr(test, mockall::automock)]
#[async_trait]
pub trait Prompter: Send {
    /// Shows `prompt` and waits for a line of input. [None] means the input has ended.
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>>;
}

pub struct StdinPrompter {
    lines: Lines<BufReader<Stdin>>,
}

impl StdinPrompter {
    pub fn new() -> Self {
        Self {
            lines: BufReader::new(io::stdin()).lines(),
        }
    }
}

impl Default for StdinPrompter {
    fn default() -> Self {
        Self::new()
    }
}

#[async_trait]
impl Prompter for StdinPrompter {
    async fn ask(&mut self, prompt: &str) -> Result<Option<String>> {
        let mut stdout = io::stdout();
        stdout.write_all(prompt.as_bytes()).await?;
        stdout.flush().await?;
        let line = self.lines.next_line().await?;
        if line.is_none() {
            // Keep the shell prompt on its own line after ctrl-d
            stdout.write_all(b"\n").await?;
        }
        Ok(line)
    }
}
