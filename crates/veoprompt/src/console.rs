//! Line-oriented terminal I/O.

use async_trait::async_trait;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, AsyncWrite, AsyncWriteExt, BufReader, Stdin, Stdout};
use tokio::sync::Mutex;
use veoprompt_core::ClarificationRequest;
use veoprompt_error::{ElaborationError, ElaborationErrorKind, VeoResult};
use veoprompt_interface::ClarificationResponder;

/// A reader/writer pair the conversation talks through.
///
/// Clarification questions and chat input share the same reader, so one
/// console serves both the chat loop and the pipeline's
/// [`ClarificationResponder`].
///
/// # Examples
///
/// ```
/// use veoprompt::Console;
///
/// # #[tokio::main(flavor = "current_thread")]
/// # async fn main() -> std::io::Result<()> {
/// let console = Console::new(&b"Bigfoot makes coffee\n"[..], Vec::new());
/// assert_eq!(console.read_line().await?.as_deref(), Some("Bigfoot makes coffee"));
/// assert_eq!(console.read_line().await?, None);
/// # Ok(())
/// # }
/// ```
pub struct Console<R, W> {
    io: Mutex<(R, W)>,
}

impl Console<BufReader<Stdin>, Stdout> {
    /// Console over the process's stdin and stdout.
    pub fn stdio() -> Self {
        Self::new(BufReader::new(tokio::io::stdin()), tokio::io::stdout())
    }
}

impl<R, W> Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    /// Console over an arbitrary reader and writer.
    pub fn new(reader: R, writer: W) -> Self {
        Self {
            io: Mutex::new((reader, writer)),
        }
    }

    /// Next line with the line ending removed, or `None` at end of input.
    pub async fn read_line(&self) -> std::io::Result<Option<String>> {
        let mut io = self.io.lock().await;
        let mut line = String::new();
        let read = io.0.read_line(&mut line).await?;
        if read == 0 {
            return Ok(None);
        }
        Ok(Some(line.trim_end_matches(['\r', '\n']).to_string()))
    }

    /// Writes `text` and flushes.
    pub async fn write(&self, text: &str) -> std::io::Result<()> {
        let mut io = self.io.lock().await;
        io.1.write_all(text.as_bytes()).await?;
        io.1.flush().await
    }

    /// Writes `text` followed by a newline.
    pub async fn say(&self, text: &str) -> std::io::Result<()> {
        self.write(&format!("{}\n", text)).await
    }

    /// Gives back the reader and writer.
    pub fn into_inner(self) -> (R, W) {
        self.io.into_inner()
    }
}

#[async_trait]
impl<R, W> ClarificationResponder for Console<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: AsyncWrite + Unpin + Send,
{
    async fn answer(&self, request: &ClarificationRequest) -> VeoResult<String> {
        let unavailable = |e: std::io::Error| {
            ElaborationError::new(ElaborationErrorKind::ClarificationUnavailable(e.to_string()))
        };
        self.write(&format!("? {}\n> ", request.question()))
            .await
            .map_err(unavailable)?;
        match self.read_line().await.map_err(unavailable)? {
            Some(answer) => Ok(answer),
            None => Err(ElaborationError::new(ElaborationErrorKind::ClarificationUnavailable(
                "input closed".to_string(),
            ))
            .into()),
        }
    }
}
