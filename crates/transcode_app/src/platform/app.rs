use std::io::{self, BufRead, Write};
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use session_logging::{session_info, session_warn};
use transcode_core::{update, AppState, ListingEntry, Msg, SessionState};
use transcode_engine::EngineHandle;

use super::config::Settings;
use super::effects::EffectRunner;
use super::input::{parse_command, Command, HELP};
use super::ui;

/// Everything the control loop reacts to, in arrival order.
pub enum LoopEvent {
    Core(Msg),
    Input(String),
    InputClosed,
}

pub fn run_app(settings: &Settings) -> anyhow::Result<()> {
    let (loop_tx, loop_rx) = mpsc::channel::<LoopEvent>();
    let (engine, events) = EngineHandle::spawn(settings.engine_settings()?)
        .context("starting network engine")?;
    let runner = EffectRunner::new(engine, events, loop_tx.clone());
    spawn_input_reader(loop_tx);

    let mut console = Console::new(runner, io::stdout());
    console.dispatch(Msg::Started)?;

    while let Ok(event) = loop_rx.recv() {
        match event {
            LoopEvent::Core(msg) => console.dispatch(msg)?,
            LoopEvent::Input(line) => console.handle_input(&line)?,
            LoopEvent::InputClosed => console.dispatch(Msg::Shutdown)?,
        }
        if console.state.session() == SessionState::Closed {
            break;
        }
    }

    session_info!("Session closed");
    Ok(())
}

fn spawn_input_reader(loop_tx: mpsc::Sender<LoopEvent>) {
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            let line = match line {
                Ok(line) => line,
                Err(err) => {
                    session_warn!("Reading console input failed: {}", err);
                    break;
                }
            };
            if loop_tx.send(LoopEvent::Input(line)).is_err() {
                return;
            }
        }
        let _ = loop_tx.send(LoopEvent::InputClosed);
    });
}

struct Console<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
}

impl<W: Write> Console<W> {
    fn new(runner: EffectRunner, out: W) -> Self {
        Self {
            state: AppState::new(),
            runner,
            out,
        }
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.run(effects);
        if self.state.consume_dirty() {
            self.redraw()?;
        }
        Ok(())
    }

    fn handle_input(&mut self, line: &str) -> io::Result<()> {
        match parse_command(line) {
            Command::Send(msg) => self.dispatch(msg),
            Command::Select(rows) => {
                let listing = self.state.listing();
                for row in rows {
                    match listing.get(row) {
                        Some(ListingEntry::File { path, .. }) => {
                            self.dispatch(Msg::FileToggled { path: path.clone() })?
                        }
                        _ => writeln!(self.out, "Row {} is not a file", row + 1)?,
                    }
                }
                Ok(())
            }
            Command::Redraw => self.redraw(),
            Command::Help => writeln!(self.out, "{HELP}"),
            Command::Empty => Ok(()),
            Command::Unknown(text) => {
                writeln!(self.out, "Unknown command {text:?}; type 'help' for a list")
            }
        }
    }

    fn redraw(&mut self) -> io::Result<()> {
        let stamp = chrono::Local::now().format("%H:%M:%S").to_string();
        let screen = ui::render::render(&self.state.view(), &stamp);
        self.out.write_all(screen.as_bytes())?;
        self.out.flush()
    }
}
