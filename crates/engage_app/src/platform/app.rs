use std::io::{self, BufRead, Write};
use std::path::{Path, PathBuf};
use std::sync::mpsc;
use std::thread;

use anyhow::{bail, Context};
use engage_core::{update, AppState, AppViewModel, Msg};
use engage_engine::ClientSettings;
use engage_logging::engage_info;

use super::effects::EffectRunner;
use super::ui;

/// Everything the main loop reacts to: core messages from input or the
/// engine, plus front-end-only commands.
#[derive(Debug, PartialEq)]
pub enum UiEvent {
    Core(Msg),
    Help,
    Quit,
    Invalid(String),
}

pub fn run_app(settings: ClientSettings, file: Option<PathBuf>) -> anyhow::Result<()> {
    engage_info!("Using analysis server {}", settings.base_url);
    let (ui_tx, ui_rx) = mpsc::channel::<UiEvent>();
    let runner =
        EffectRunner::new(settings, ui_tx.clone()).context("failed to start request engine")?;
    let mut controller = Controller::new(runner);

    match file {
        Some(path) => run_once(&mut controller, &ui_rx, &path),
        None => run_interactive(&mut controller, ui_tx, &ui_rx),
    }
}

/// Analyzes a single file and prints the final screen.
fn run_once(
    controller: &mut Controller,
    ui_rx: &mpsc::Receiver<UiEvent>,
    path: &Path,
) -> anyhow::Result<()> {
    let file = ui::input::load_file(path)
        .with_context(|| format!("cannot read {}", path.display()))?;
    controller.dispatch(Msg::FilesPicked(vec![file]));
    let mut view = controller.dispatch(Msg::SubmitClicked);

    while controller.is_busy() {
        match ui_rx.recv() {
            Ok(UiEvent::Core(msg)) => {
                if let Some(next) = controller.dispatch(msg) {
                    view = Some(next);
                }
            }
            Ok(_) => {}
            Err(_) => bail!("request engine stopped before the analysis finished"),
        }
    }

    let view = view.unwrap_or_else(|| controller.view());
    println!("{}", controller.render(&view));
    Ok(())
}

fn run_interactive(
    controller: &mut Controller,
    ui_tx: mpsc::Sender<UiEvent>,
    ui_rx: &mpsc::Receiver<UiEvent>,
) -> anyhow::Result<()> {
    spawn_input_reader(ui_tx);

    let mut out = io::stdout();
    writeln!(out, "{}", ui::constants::HELP_TEXT)?;
    writeln!(out)?;
    show(&mut out, &controller.render(&controller.view()))?;

    for event in ui_rx {
        match event {
            UiEvent::Core(msg) => {
                if let Some(view) = controller.dispatch(msg) {
                    show(&mut out, &controller.render(&view))?;
                }
            }
            UiEvent::Help => show(&mut out, ui::constants::HELP_TEXT)?,
            UiEvent::Invalid(text) => show(&mut out, &text)?,
            UiEvent::Quit => break,
        }
    }
    engage_info!("Leaving interactive session");
    Ok(())
}

fn show(out: &mut impl Write, text: &str) -> io::Result<()> {
    writeln!(out, "{text}")?;
    write!(out, "{}", ui::constants::PROMPT)?;
    out.flush()
}

fn spawn_input_reader(ui_tx: mpsc::Sender<UiEvent>) {
    thread::spawn(move || {
        let stdin = io::stdin();
        for line in stdin.lock().lines() {
            let Ok(line) = line else { break };
            for event in ui::input::parse_line(&line) {
                if ui_tx.send(event).is_err() {
                    return;
                }
            }
        }
        // End of input quits.
        let _ = ui_tx.send(UiEvent::Quit);
    });
}

/// Owns the state and runs every message through `update`, handing the
/// resulting effects to the runner.
pub(crate) struct Controller {
    state: AppState,
    runner: EffectRunner,
}

impl Controller {
    pub(crate) fn new(runner: EffectRunner) -> Self {
        Self {
            state: AppState::new(),
            runner,
        }
    }

    /// Returns the new view if the message changed anything visible.
    pub(crate) fn dispatch(&mut self, msg: Msg) -> Option<AppViewModel> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        self.runner.enqueue(effects);
        let view = state.view();
        let was_dirty = state.consume_dirty();
        self.state = state;
        was_dirty.then_some(view)
    }

    pub(crate) fn is_busy(&self) -> bool {
        self.state.is_busy()
    }

    pub(crate) fn view(&self) -> AppViewModel {
        self.state.view()
    }

    pub(crate) fn render(&self, view: &AppViewModel) -> String {
        let location = view
            .preview
            .handle
            .and_then(|handle| self.runner.preview_location(handle));
        ui::render::render(view, location)
    }
}
