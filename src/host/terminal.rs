//! Terminal host: renders host primitives as ratatui popups.
//!
//! The terminal session is opened lazily on the first UI call: raw mode plus
//! the alternate screen, drawn on **stderr** so stdout stays free for the
//! tool's result.  Dropping the host restores the terminal.

use std::ffi::OsString;
use std::io::{self, stderr, Stderr};
use std::path::PathBuf;

use crossterm::{
    event::{self, Event, KeyEvent, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use super::{process, Dialog, DialogReply, HostError, HostSurface, Notification, Progress};
use crate::ui::{
    layout::ScreenLayout,
    popup::{DialogPopup, FolderPopup, ListPopup, ProgressPopup},
    prompt::{DialogPrompt, FolderPrompt, ListPrompt, Outcome},
    theme::Theme,
};

type Term = Terminal<CrosstermBackend<Stderr>>;

/// Host that prompts inside the current terminal.
#[derive(Default)]
pub struct TerminalHost {
    terminal: Option<Term>,
    /// Last notification, shown in the status bar.
    status: Option<String>,
    /// Active progress report, drawn behind other popups.
    progress: Option<Progress>,
}

impl TerminalHost {
    pub fn new() -> Self {
        Self::default()
    }

    fn terminal(&mut self) -> Result<&mut Term, HostError> {
        if self.terminal.is_none() {
            enable_raw_mode()?;
            let terminal = undo_on_error(open_screen(), || {
                let _ = disable_raw_mode();
            })?;
            tracing::debug!("terminal session opened");
            self.terminal = Some(terminal);
        }
        self.terminal
            .as_mut()
            .ok_or_else(|| HostError::Terminal(io::Error::other("terminal unavailable")))
    }

    /// Draw the backdrop (and any active progress), then `overlay` on top.
    fn draw(&mut self, overlay: impl FnOnce(&mut Frame<'_>)) -> Result<(), HostError> {
        let status = self.status.clone();
        let progress = self.progress.clone();
        let terminal = self.terminal()?;
        terminal.draw(|frame| {
            draw_backdrop(frame, status.as_deref());
            if let Some(progress) = &progress {
                frame.render_widget(ProgressPopup { progress }, frame.area());
            }
            overlay(frame);
        })?;
        Ok(())
    }

    /// Redraw and feed keys to `step` until it settles.
    fn run_modal<T>(
        &mut self,
        mut draw: impl FnMut(&mut Frame<'_>),
        mut step: impl FnMut(KeyEvent) -> Outcome<T>,
    ) -> Result<Outcome<T>, HostError> {
        loop {
            self.draw(&mut draw)?;
            // Resize and mouse events just trigger a redraw.
            let Event::Key(key) = event::read()? else {
                continue;
            };
            if key.kind != KeyEventKind::Press {
                continue;
            }
            match step(key) {
                Outcome::Pending => {}
                settled => return Ok(settled),
            }
        }
    }
}

/// Enter the alternate screen and build the ratatui terminal on stderr.
/// Leaves the alternate screen again when the terminal cannot be built.
fn open_screen() -> io::Result<Term> {
    execute!(stderr(), EnterAlternateScreen)?;
    undo_on_error(Terminal::new(CrosstermBackend::new(stderr())), || {
        let _ = execute!(stderr(), LeaveAlternateScreen);
    })
}

/// Run `undo` when `result` is an error, then pass `result` through.
fn undo_on_error<T>(result: io::Result<T>, undo: impl FnOnce()) -> io::Result<T> {
    if result.is_err() {
        undo();
    }
    result
}

impl Drop for TerminalHost {
    fn drop(&mut self) {
        if let Some(mut terminal) = self.terminal.take() {
            let _ = disable_raw_mode();
            let _ = execute!(terminal.backend_mut(), LeaveAlternateScreen);
            let _ = terminal.show_cursor();
        }
    }
}

impl HostSurface for TerminalHost {
    fn display_dialog(&mut self, dialog: &Dialog) -> Result<DialogReply, HostError> {
        dialog.validate()?;
        // Two handles on one prompt: one to draw, one to mutate.
        let prompt = std::cell::RefCell::new(DialogPrompt::new(dialog));
        let outcome = self.run_modal(
            |frame| {
                let prompt = prompt.borrow();
                frame.render_widget(
                    DialogPopup {
                        dialog,
                        prompt: &prompt,
                    },
                    frame.area(),
                );
            },
            |key| prompt.borrow_mut().handle_key(key),
        )?;
        match outcome {
            Outcome::Done(reply) => Ok(reply),
            _ => Err(HostError::Cancelled),
        }
    }

    fn choose_from_list(
        &mut self,
        prompt: &str,
        items: &[String],
    ) -> Result<Option<String>, HostError> {
        let state = std::cell::RefCell::new(ListPrompt::new(items.to_vec()));
        let outcome = self.run_modal(
            |frame| {
                let area = frame.area();
                frame.render_stateful_widget(
                    ListPopup {
                        prompt_text: prompt,
                    },
                    area,
                    &mut state.borrow_mut(),
                );
            },
            |key| state.borrow_mut().handle_key(key),
        )?;
        match outcome {
            Outcome::Done(choice) => Ok(choice),
            _ => Ok(None),
        }
    }

    fn choose_folder(&mut self, prompt: &str) -> Result<PathBuf, HostError> {
        let initial = std::env::current_dir()
            .map(|p| p.display().to_string())
            .unwrap_or_default();
        let state = std::cell::RefCell::new(FolderPrompt::new(initial));
        let outcome = self.run_modal(
            |frame| {
                let state = state.borrow();
                frame.render_widget(
                    FolderPopup {
                        prompt_text: prompt,
                        prompt: &state,
                    },
                    frame.area(),
                );
            },
            |key| state.borrow_mut().handle_key(key),
        )?;
        match outcome {
            Outcome::Done(path) => Ok(path),
            _ => Err(HostError::Cancelled),
        }
    }

    fn run_process(&mut self, program: &str, args: &[OsString]) -> Result<String, HostError> {
        process::run(program, args)
    }

    fn display_notification(&mut self, notification: &Notification) -> Result<(), HostError> {
        tracing::info!(title = notification.title.as_deref().unwrap_or(""), "{}", notification.message);
        self.status = Some(notification_line(notification));
        self.draw(|_| {})
    }

    fn report_progress(&mut self, progress: &Progress) -> Result<(), HostError> {
        self.progress = Some(progress.clone());
        self.draw(|_| {})?;
        if progress.total > 0 && progress.completed >= progress.total {
            self.progress = None;
        }
        Ok(())
    }
}

fn draw_backdrop(frame: &mut Frame<'_>, status: Option<&str>) {
    let layout = ScreenLayout::from_area(frame.area());

    let body = Block::default()
        .title(format!(" {} ", env!("CARGO_PKG_NAME")))
        .title_style(Theme::title_style())
        .borders(Borders::ALL)
        .border_style(Theme::border_style());
    frame.render_widget(body, layout.body_area);

    let status = Paragraph::new(status.unwrap_or("Enter: confirm | Esc: cancel | Ctrl+C: abort"))
        .style(Theme::status_bar_style());
    frame.render_widget(status, layout.status_area);
}

fn notification_line(notification: &Notification) -> String {
    let mut line = String::new();
    if let Some(title) = &notification.title {
        line.push_str(title);
        line.push_str(": ");
    }
    if let Some(subtitle) = &notification.subtitle {
        line.push_str(subtitle);
        line.push_str(" - ");
    }
    line.push_str(&notification.message);
    line
}
