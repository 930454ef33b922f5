//! Line driver for the CLI.
//!
//! Implements the [`Driver`] trait over a line-oriented input, a plain
//! writer, and a payload channel pair. Input lines become session events
//! through [`Command`]; every message appended to the log is written as one
//! line using [`ChatMessage::display_text`].
//!
//! [`ChatMessage::display_text`]: parley_app::ChatMessage::display_text

use std::{collections::VecDeque, io};

use parley_app::{App, AppEvent, ConnectionStatus, Driver};
use thiserror::Error;
use tokio::io::{AsyncBufRead, AsyncBufReadExt, Lines};

use crate::{
    command::{Command, USAGE},
    server::ServerHandle,
};

/// Line driver errors.
#[derive(Debug, Error)]
pub enum LineError {
    /// I/O error reading input or writing output.
    #[error("I/O error: {0}")]
    Io(#[from] io::Error),

    /// The server side of the channel is gone.
    #[error("channel send error")]
    ChannelSend,
}

/// What woke the driver up.
enum Incoming {
    Line(io::Result<Option<String>>),
    Payload(Option<String>),
}

/// Line driver implementing the [`Driver`] trait.
pub struct LineDriver<R, W> {
    input: Lines<R>,
    output: W,
    server: ServerHandle,
    palette: Vec<String>,
    pending: VecDeque<AppEvent>,
    server_closed: bool,
    printed: usize,
    shown_status: Option<ConnectionStatus>,
    shown_identity: bool,
}

impl<R, W> LineDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: io::Write + Send,
{
    /// Create a driver. The channel counts as open from the start.
    pub fn new(input: R, output: W, server: ServerHandle, palette: Vec<String>) -> Self {
        Self {
            input: input.lines(),
            output,
            server,
            palette,
            pending: VecDeque::from([AppEvent::StatusChanged(ConnectionStatus::Open)]),
            server_closed: false,
            printed: 0,
            shown_status: None,
            shown_identity: false,
        }
    }

    /// Type `name` and join as soon as the channel is open.
    #[must_use]
    pub fn with_auto_join(mut self, name: impl Into<String>) -> Self {
        self.pending.push_back(AppEvent::NameChanged(name.into()));
        self.pending.push_back(AppEvent::JoinSubmitted);
        self
    }

    /// The output writer.
    pub fn output(&self) -> &W {
        &self.output
    }

    fn handle_line(&mut self, line: &str) -> Result<(), LineError> {
        match Command::parse(line).and_then(|cmd| cmd.into_events(&self.palette)) {
            Ok(events) => self.pending.extend(events),
            Err(err) => {
                writeln!(self.output, "! {err}")?;
                writeln!(self.output, "! {USAGE}")?;
            },
        }
        Ok(())
    }
}

impl<R, W> Driver for LineDriver<R, W>
where
    R: AsyncBufRead + Unpin + Send,
    W: io::Write + Send,
{
    type Error = LineError;

    async fn next_event(&mut self) -> Result<Option<AppEvent>, Self::Error> {
        loop {
            if let Some(event) = self.pending.pop_front() {
                return Ok(Some(event));
            }

            // Server traffic first, so queued payloads land before input EOF ends the session
            let incoming = tokio::select! {
                biased;

                payload = self.server.from_server.recv(), if !self.server_closed => {
                    Incoming::Payload(payload)
                },
                line = self.input.next_line() => Incoming::Line(line),
            };

            match incoming {
                Incoming::Line(line) => match line? {
                    Some(line) => self.handle_line(&line)?,
                    None => return Ok(None),
                },
                Incoming::Payload(Some(payload)) => return Ok(Some(AppEvent::PayloadReceived(payload))),
                Incoming::Payload(None) => {
                    tracing::info!("server closed the channel");
                    self.server_closed = true;
                    return Ok(Some(AppEvent::StatusChanged(ConnectionStatus::Closed)));
                },
            }
        }
    }

    async fn send(&mut self, payload: String) -> Result<(), Self::Error> {
        self.server.to_server.send(payload).await.map_err(|_| LineError::ChannelSend)
    }

    fn render(&mut self, app: &App) -> Result<(), Self::Error> {
        if self.shown_status != Some(app.status()) {
            self.shown_status = Some(app.status());
            writeln!(self.output, "* {} ({})", app.status_label(), app.config().server_addr)?;
        }
        if !self.shown_identity
            && let Some(identity) = app.identity()
        {
            self.shown_identity = true;
            writeln!(self.output, "* joined as {identity}")?;
        }
        Ok(())
    }

    fn scroll_to_latest(&mut self, app: &App) -> Result<(), Self::Error> {
        for message in app.log().iter().skip(self.printed) {
            writeln!(self.output, "{}", message.display_text())?;
            self.printed += 1;
        }
        self.output.flush()?;
        Ok(())
    }

    fn stop(&mut self) {
        self.server.stop();
        self.pending.clear();
    }
}

#[cfg(test)]
mod tests {
    use parley_app::{AppConfig, Runtime};
    use tokio::sync::mpsc;

    use super::*;

    /// Driver over a fixed input with a channel pair the test holds.
    fn driver(
        input: &'static str,
    ) -> (LineDriver<&'static [u8], Vec<u8>>, mpsc::Receiver<String>, mpsc::Sender<String>) {
        let (to_server, sent) = mpsc::channel(8);
        let (inbound, from_server) = mpsc::channel(8);
        let server = ServerHandle::from_channels(to_server, from_server);
        let driver =
            LineDriver::new(input.as_bytes(), Vec::new(), server, AppConfig::default().emoji_palette);
        (driver, sent, inbound)
    }

    fn output(runtime: &Runtime<LineDriver<&'static [u8], Vec<u8>>>) -> String {
        String::from_utf8_lossy(runtime.driver().output()).into_owned()
    }

    #[tokio::test]
    async fn transcript_for_reaction_and_text() {
        let (driver, mut sent, _inbound) = driver("/react up\nhello\n/quit\n");
        let mut runtime = Runtime::new(driver.with_auto_join("Ana"), AppConfig::default());

        runtime.run().await.unwrap();

        insta::assert_snapshot!(output(&runtime), @r"
        * Unavailable (ws://localhost:8081)
        * Connected (ws://localhost:8081)
        * joined as Ana
        You reacted with 👍
        ");

        let mut payloads = Vec::new();
        while let Ok(payload) = sent.try_recv() {
            payloads.push(payload);
        }
        assert_eq!(payloads, vec![
            r#"{"type":"join","name":"Ana"}"#.to_owned(),
            r#"{"type":"reaction","name":"Ana","reaction":"👍"}"#.to_owned(),
            r#"{"type":"message","name":"Ana","text":"hello"}"#.to_owned(),
        ]);
    }

    #[tokio::test]
    async fn status_line_shows_configured_server() {
        let (driver, _sent, _inbound) = driver("");
        let mut runtime = Runtime::new(driver, AppConfig::with_server("ws://chat:9000"));

        runtime.run().await.unwrap();

        let out = output(&runtime);
        assert!(out.starts_with("* Unavailable (ws://chat:9000)\n"));
        assert!(out.contains("* Connected (ws://chat:9000)\n"));
    }

    #[tokio::test]
    async fn bad_command_prints_usage_and_continues() {
        let (driver, _sent, _inbound) = driver("/dance\n/emoji 42\n");
        let mut runtime = Runtime::new(driver, AppConfig::default());

        runtime.run().await.unwrap();

        let out = output(&runtime);
        assert!(out.contains("! unknown command: /dance"));
        assert!(out.contains("! no emoji at position 42, palette has 8"));
        assert!(out.contains(USAGE));
    }

    #[tokio::test]
    async fn inbound_payloads_are_printed() {
        let (driver, _sent, inbound) = driver("");
        inbound.send(r#"{"type":"message","name":"Bruno","text":"oi"}"#.to_owned()).await.unwrap();
        inbound.send(r#"{"type":"reaction","name":"Bruno","reaction":"👎"}"#.to_owned()).await.unwrap();
        drop(inbound);
        let mut runtime = Runtime::new(driver, AppConfig::default());

        // Input is at EOF from the start, so pump the channel step by step
        while runtime.app().log().len() < 2 {
            assert!(!runtime.step().await.unwrap());
        }

        let out = output(&runtime);
        assert!(out.contains("oi\n"));
        assert!(out.contains("Bruno reacted with 👎\n"));
    }
}
