use std::collections::VecDeque;
use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::mpsc;
use std::thread;
use std::time::Duration;

use anyhow::Context;
use ingest_core::{update, Effect, FormState, FormViewModel, Msg, Notification};
use ingest_logging::{ingest_debug, ingest_info, ingest_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::ui::commands::{parse_command, Command, HELP};
use super::ui::render::{progress_line, render, render_alert};

const TICK_INTERVAL: Duration = Duration::from_millis(100);

/// Everything the main loop reacts to. All of it is handled on one thread.
pub(crate) enum LoopEvent {
    Msg(Msg),
    Line(String),
    InputClosed,
    Tick,
}

pub fn run_app() -> anyhow::Result<()> {
    let config_path = AppConfig::resolve_path(std::env::args_os().nth(1).map(PathBuf::from));
    let config = AppConfig::load(&config_path)?;
    if let Some(log_file) = ingest_logging::initialize(config.log_destination, config.level_filter()?)
    {
        ingest_info!("Logging to {:?}", log_file);
    }
    ingest_info!("Using file manager at {}", config.base_url);

    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(config.client_settings(), loop_tx.clone())
        .context("failed to start the ingest engine")?;
    spawn_input_reader(loop_tx.clone());
    spawn_ticker(loop_tx);

    // Unlocked handle: the terminal logger writes to stdout from other threads.
    let mut app = FormApp::new(io::stdout());
    app.print_lines(HELP.lines().map(str::to_string))?;
    let effects = app.dispatch(Msg::Mounted);
    app.notify(runner.enqueue(effects))?;
    app.render_if_needed()?;

    let mut closing = false;
    while let Ok(event) = loop_rx.recv() {
        match event {
            LoopEvent::Msg(msg) => {
                let effects = app.dispatch(msg);
                app.notify(runner.enqueue(effects))?;
            }
            LoopEvent::Line(line) => match app.handle_line(&line)? {
                LineOutcome::Msg(msg) => {
                    let effects = app.dispatch(msg);
                    app.notify(runner.enqueue(effects))?;
                    app.render_if_needed()?;
                }
                LineOutcome::Quit => break,
                LineOutcome::Handled => {}
            },
            LoopEvent::InputClosed => {
                ingest_debug!("Input closed; finishing in-flight work");
                closing = true;
            }
            LoopEvent::Tick => app.render_if_needed()?,
        }

        if closing && !app.state().is_submitting() {
            app.render_if_needed()?;
            break;
        }
    }

    ingest_info!("Leaving product ingest form");
    Ok(())
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            match line {
                Ok(line) => {
                    if loop_tx.send(LoopEvent::Line(line)).is_err() {
                        return;
                    }
                }
                Err(err) => {
                    ingest_warn!("Failed to read input: {}", err);
                    break;
                }
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}

// Coalesces progress redraws.
fn spawn_ticker(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        while loop_tx.send(LoopEvent::Tick).is_ok() {
            thread::sleep(TICK_INTERVAL);
        }
    });
}

#[derive(Debug, PartialEq, Eq)]
pub(crate) enum LineOutcome {
    Msg(Msg),
    Quit,
    Handled,
}

/// Form state plus the terminal it is drawn on.
pub(crate) struct FormApp<W: Write> {
    state: FormState,
    out: W,
    alerts: VecDeque<Notification>,
    needs_render: bool,
    last_view: Option<FormViewModel>,
}

impl<W: Write> FormApp<W> {
    pub(crate) fn new(out: W) -> Self {
        Self {
            state: FormState::new(),
            out,
            alerts: VecDeque::new(),
            needs_render: true,
            last_view: None,
        }
    }

    pub(crate) fn state(&self) -> &FormState {
        &self.state
    }

    pub(crate) fn dispatch(&mut self, msg: Msg) -> Vec<Effect> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        if state.consume_dirty() {
            self.needs_render = true;
        }
        self.state = state;
        effects
    }

    /// Queues alerts; the first one is shown right away if none is open.
    pub(crate) fn notify(&mut self, notifications: Vec<Notification>) -> io::Result<()> {
        let was_idle = self.alerts.is_empty();
        self.alerts.extend(notifications);
        if was_idle {
            self.show_front_alert()?;
        }
        Ok(())
    }

    /// While an alert is open any line dismisses it and nothing else happens.
    pub(crate) fn handle_line(&mut self, line: &str) -> io::Result<LineOutcome> {
        if !self.alerts.is_empty() {
            self.alerts.pop_front();
            let effects = self.dispatch(Msg::NotificationDismissed);
            debug_assert!(effects.is_empty());
            self.show_front_alert()?;
            self.needs_render = true;
            self.render_if_needed()?;
            return Ok(LineOutcome::Handled);
        }

        match parse_command(line) {
            Command::Msg(msg) => Ok(LineOutcome::Msg(msg)),
            Command::Quit => Ok(LineOutcome::Quit),
            Command::Show => {
                self.needs_render = true;
                self.last_view = None;
                self.render_if_needed()?;
                Ok(LineOutcome::Handled)
            }
            Command::Help => {
                self.print_lines(HELP.lines().map(str::to_string))?;
                Ok(LineOutcome::Handled)
            }
            Command::Empty => Ok(LineOutcome::Handled),
            Command::Unknown(word) => {
                self.print_lines([format!("Unknown command '{word}'; type 'help'.")])?;
                Ok(LineOutcome::Handled)
            }
        }
    }

    /// Draws the form if it changed; a change of upload percentage alone only redraws the bar.
    pub(crate) fn render_if_needed(&mut self) -> io::Result<()> {
        if !self.needs_render || !self.alerts.is_empty() {
            return Ok(());
        }
        self.needs_render = false;

        let view = self.state.view();
        let only_progress = self.last_view.as_ref().is_some_and(|last| {
            view.show_progress
                && last.show_progress
                && FormViewModel {
                    upload_percent: view.upload_percent,
                    dirty: view.dirty,
                    ..last.clone()
                } == view
        });
        if only_progress {
            self.print_lines([progress_line(&view)])?;
        } else {
            self.print_lines(render(&view))?;
        }
        self.last_view = Some(view);
        Ok(())
    }

    pub(crate) fn print_lines<I>(&mut self, lines: I) -> io::Result<()>
    where
        I: IntoIterator<Item = String>,
    {
        for line in lines {
            writeln!(self.out, "{line}")?;
        }
        self.out.flush()
    }

    fn show_front_alert(&mut self) -> io::Result<()> {
        match self.alerts.front().cloned() {
            Some(notification) => self.print_lines(render_alert(&notification)),
            None => Ok(()),
        }
    }

    #[cfg(test)]
    fn output(&self) -> &W {
        &self.out
    }
}
