//! Password prompt on the terminal.
//!
//! An empty line (or end of input) cancels the request. Input is echoed; this
//! presenter is meant for development only.

use bb_03_signing_coordinator::{PasswordPrompt, PromptAnswer, PromptPresenter};
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Lines};
use tokio::sync::Mutex;
use tracing::warn;

pub struct TerminalPresenter<R, W> {
    input: Mutex<Lines<R>>,
    output: Mutex<W>,
}

impl TerminalPresenter<BufReader<tokio::io::Stdin>, tokio::io::Stderr> {
    /// Read from stdin, write prompts to stderr.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stderr())
    }
}

impl<R, W> TerminalPresenter<R, W>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    pub fn new(input: R, output: W) -> Self {
        Self {
            input: Mutex::new(input.lines()),
            output: Mutex::new(output),
        }
    }

    async fn render(&self, prompt: &PasswordPrompt) -> std::io::Result<()> {
        let mut text = format!("\n== {} ==\n{}\n", prompt.title, prompt.message);
        if let Some(identity) = &prompt.identity {
            text.push_str(&format!("Identity: {identity}\n"));
        }
        text.push_str(&format!("Messages to sign: {}\n", prompt.message_count));
        if let Some(error) = &prompt.error {
            text.push_str(&format!("! {error}\n"));
        }
        text.push_str(&format!("{} (empty line cancels): ", prompt.placeholder));

        let mut output = self.output.lock().await;
        output.write_all(text.as_bytes()).await?;
        output.flush().await
    }
}

#[async_trait::async_trait]
impl<R, W> PromptPresenter for TerminalPresenter<R, W>
where
    R: AsyncBufRead + Unpin + Send + 'static,
    W: AsyncWrite + Unpin + Send + 'static,
{
    async fn ask_password(&self, prompt: &PasswordPrompt) -> PromptAnswer {
        if let Err(e) = self.render(prompt).await {
            warn!(error = %e, "Failed to render password prompt");
        }

        match self.input.lock().await.next_line().await {
            Ok(Some(line)) => {
                let password = line.trim_end_matches(['\r', '\n']).to_string();
                if password.is_empty() {
                    PromptAnswer::Cancel
                } else {
                    PromptAnswer::Password(password)
                }
            }
            Ok(None) => PromptAnswer::Cancel,
            Err(e) => {
                warn!(error = %e, "Failed to read password");
                PromptAnswer::Cancel
            }
        }
    }
}
