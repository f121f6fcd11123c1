//! Interactive navigation loop over the four views

use crate::artifacts::SharedArtifacts;
use crate::config::Config;
use crate::pipeline::classify;
use crate::views::{self, Page};
use std::io::{self, BufRead, Write};

/// Counters for one interactive session
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct SessionSummary {
    pub predictions: usize,
    pub spam: usize,
    pub rejected_inputs: usize,
}

enum Flow {
    Menu,
    Quit,
}

pub struct Session<'a, R, W> {
    artifacts: SharedArtifacts,
    config: &'a Config,
    input: R,
    output: W,
    start: Option<Page>,
    summary: SessionSummary,
}

impl<'a, R: BufRead, W: Write> Session<'a, R, W> {
    pub fn new(artifacts: SharedArtifacts, config: &'a Config, input: R, output: W) -> Self {
        Self {
            artifacts,
            config,
            input,
            output,
            start: None,
            summary: SessionSummary::default(),
        }
    }

    /// Opens `page` before showing the navigation menu
    pub fn starting_at(mut self, page: Page) -> Self {
        self.start = Some(page);
        self
    }

    /// Runs until the user quits or input ends
    pub fn run(mut self) -> io::Result<SessionSummary> {
        if let Some(page) = self.start.take() {
            if let Flow::Quit = self.open(page)? {
                return self.finish();
            }
        }

        loop {
            writeln!(self.output)?;
            views::render_navigation(&mut self.output)?;
            write!(self.output, "> ")?;
            self.output.flush()?;

            let Some(line) = self.read_line()? else {
                break;
            };
            let choice = line.trim();
            if choice.is_empty() {
                continue;
            }
            if is_quit(choice) {
                break;
            }

            match choice.parse::<Page>() {
                Ok(page) => {
                    if let Flow::Quit = self.open(page)? {
                        break;
                    }
                }
                Err(e) => writeln!(self.output, "❌ {e}")?,
            }
        }

        self.finish()
    }

    fn open(&mut self, page: Page) -> io::Result<Flow> {
        log::debug!("Navigating to {page}");
        writeln!(self.output)?;
        views::render_page(&mut self.output, page, self.config)?;
        if page == Page::TryModel {
            self.prediction_loop()
        } else {
            Ok(Flow::Menu)
        }
    }

    fn finish(mut self) -> io::Result<SessionSummary> {
        writeln!(self.output, "👋 Goodbye")?;
        log::info!(
            "Session ended: {} predictions ({} spam), {} empty inputs",
            self.summary.predictions,
            self.summary.spam,
            self.summary.rejected_inputs
        );
        Ok(self.summary)
    }

    fn prediction_loop(&mut self) -> io::Result<Flow> {
        loop {
            writeln!(self.output)?;
            views::render_message_prompt(&mut self.output)?;

            let Some(line) = self.read_line()? else {
                return Ok(Flow::Quit);
            };
            match line.trim().to_lowercase().as_str() {
                "back" | "menu" => return Ok(Flow::Menu),
                "quit" | "exit" => return Ok(Flow::Quit),
                _ => {}
            }

            let outcome = classify(&line, &self.artifacts);
            match &outcome {
                Ok(prediction) => {
                    self.summary.predictions += 1;
                    if prediction.is_spam() {
                        self.summary.spam += 1;
                    }
                }
                Err(_) => self.summary.rejected_inputs += 1,
            }
            views::render_outcome(&mut self.output, &outcome)?;
        }
    }

    /// Next line without its terminator, `None` at end of input
    fn read_line(&mut self) -> io::Result<Option<String>> {
        let mut line = String::new();
        if self.input.read_line(&mut line)? == 0 {
            return Ok(None);
        }
        let trimmed_len = line.trim_end_matches(['\n', '\r']).len();
        line.truncate(trimmed_len);
        Ok(Some(line))
    }
}

/// Goodbye line for an interrupted session.
///
/// Called from the signal handler thread, so `out` must not be a lock the
/// session itself holds while waiting for input.
pub fn write_interrupt_goodbye(out: &mut dyn Write) -> io::Result<()> {
    writeln!(out)?;
    writeln!(out, "👋 Goodbye")?;
    out.flush()
}

fn is_quit(choice: &str) -> bool {
    matches!(choice.to_lowercase().as_str(), "q" | "quit" | "exit")
}
