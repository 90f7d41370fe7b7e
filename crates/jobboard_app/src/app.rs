use std::io::{self, BufRead, Write};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::Duration;

use anyhow::Context;
use jobboard_core::{update, BoardState, Msg};
use jobboard_engine::{ApiConfig, EngineHandle, BASE_URL_ENV};
use jobboard_logging::{board_debug, board_info};

use crate::commands::{self, Command, ViewMode, HELP};
use crate::effects::EffectRunner;
use crate::render;

const POLL_INTERVAL: Duration = Duration::from_millis(75);
const PROMPT: &str = "> ";

pub fn run() -> anyhow::Result<()> {
    let config = ApiConfig::from_env()
        .with_context(|| format!("set {BASE_URL_ENV} to the job service address"))?;
    board_info!("Using job service at {}", config.base_url);
    let engine = EngineHandle::new(config).context("failed to start request engine")?;

    let (line_tx, line_rx) = mpsc::channel::<String>();
    thread::Builder::new()
        .name("stdin".into())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else { break };
                if line_tx.send(line).is_err() {
                    break;
                }
            }
        })
        .context("failed to spawn input reader")?;

    let mut app = App::new(EffectRunner::new(engine));
    let mut out = io::stdout();
    writeln!(out, "Job board. Type 'help' for commands.")?;
    app.dispatch(Msg::Started);

    loop {
        while let Some(msg) = app.runner.poll() {
            app.dispatch(msg);
        }
        if app.take_render() {
            write!(out, "\n{}{PROMPT}", app.render())?;
            out.flush()?;
        }

        match line_rx.recv_timeout(POLL_INTERVAL) {
            Ok(line) => match app.handle_line(&line) {
                Flow::Continue => {}
                Flow::Print(text) => {
                    write!(out, "{text}\n{PROMPT}")?;
                    out.flush()?;
                }
                Flow::Quit => break,
            },
            Err(RecvTimeoutError::Timeout) => app.dispatch(Msg::Tick),
            Err(RecvTimeoutError::Disconnected) => {
                board_debug!("stdin closed");
                break;
            }
        }
    }

    board_info!("Shutting down");
    Ok(())
}

enum Flow {
    Continue,
    Print(String),
    Quit,
}

struct App {
    state: BoardState,
    runner: EffectRunner,
    mode: ViewMode,
    force_render: bool,
}

impl App {
    fn new(runner: EffectRunner) -> Self {
        Self {
            state: BoardState::new(),
            runner,
            mode: ViewMode::default(),
            force_render: false,
        }
    }

    fn dispatch(&mut self, msg: Msg) {
        let state = std::mem::take(&mut self.state);
        let (state, effects) = update(state, msg);
        self.state = state;
        self.runner.enqueue(effects);
    }

    fn handle_line(&mut self, line: &str) -> Flow {
        let view = self.state.view();
        match commands::parse(line, &view.list) {
            Command::Dispatch(Msg::NoOp) => {
                self.force_render = true;
                Flow::Continue
            }
            Command::Dispatch(msg) => {
                board_debug!("input -> {:?}", msg);
                self.dispatch(msg);
                Flow::Continue
            }
            Command::SetView(mode) => {
                if self.mode != mode {
                    self.mode = mode;
                    self.force_render = true;
                }
                Flow::Continue
            }
            Command::Help => Flow::Print(HELP.to_string()),
            Command::Quit => Flow::Quit,
            Command::Invalid(message) => Flow::Print(message),
        }
    }

    /// Whether the screen is out of date. Clears the pending flags.
    fn take_render(&mut self) -> bool {
        let dirty = self.state.consume_dirty();
        std::mem::take(&mut self.force_render) || dirty
    }

    fn render(&self) -> String {
        render::render(&self.state.view(), self.mode)
    }
}
