use std::io::{self, BufRead, Write};
use std::path::Path;
use std::sync::mpsc;
use std::thread;

use anyhow::Context;
use catalog_core::{update, AppState, AppViewModel, Msg};
use catalog_logging::{catalog_info, catalog_warn, parse_level, DEFAULT_LOG_FILE};

use super::config::{ConfigOverrides, ConsoleConfig};
use super::effects::EffectRunner;
use super::ui;
use super::ui::input::Command;

/// Everything the message loop reacts to.
pub(crate) enum LoopEvent {
    Input(Command),
    Engine(Msg),
    InputClosed,
}

pub fn run_app(config_path: &Path, overrides: ConfigOverrides) -> anyhow::Result<()> {
    let loaded = ConsoleConfig::load(config_path);
    let config = match &loaded {
        Ok(Some(config)) => config.clone(),
        Ok(None) | Err(_) => ConsoleConfig::default(),
    }
    .with_overrides(overrides);

    catalog_logging::initialize(
        config.log_destination,
        parse_level(&config.log_level),
        Path::new(DEFAULT_LOG_FILE),
    );
    match &loaded {
        Ok(Some(_)) => catalog_info!("Loaded configuration from {:?}", config_path),
        Ok(None) => {
            catalog_info!("No configuration at {:?}; using built-in defaults", config_path)
        }
        Err(err) => catalog_warn!("{}; using built-in defaults", err),
    }
    catalog_info!("Catalog console starting against {}", config.base_url);

    let (event_tx, event_rx) = mpsc::channel::<LoopEvent>();
    let runner = EffectRunner::new(&config.api_settings(), event_tx.clone())
        .context("failed to start the request engine")?;
    spawn_input_reader(event_tx).context("failed to start the input reader")?;

    let mut console = Console {
        state: AppState::with_settings(config.core_settings()),
        last_view: None,
        runner,
    };
    console.print([ui::constants::BANNER.to_string()])?;
    console.dispatch(Msg::ShowAllProducts)?;
    console.dispatch(Msg::LoadWebhooks)?;

    let mut input_closed = false;
    while let Ok(event) = event_rx.recv() {
        match event {
            LoopEvent::Engine(msg) => console.dispatch(msg)?,
            LoopEvent::Input(Command::Dispatch(msgs)) => {
                for msg in msgs {
                    console.dispatch(msg)?;
                }
            }
            LoopEvent::Input(Command::Help) => {
                console.print([ui::constants::HELP_TEXT.to_string()])?;
            }
            LoopEvent::Input(Command::Invalid(reason)) => console.print([reason])?,
            LoopEvent::Input(Command::Blank) => {}
            LoopEvent::Input(Command::Quit) => break,
            LoopEvent::InputClosed => {
                catalog_info!("Input closed; finishing requests in flight");
                input_closed = true;
            }
        }
        if input_closed && !console.state.has_work_in_flight() {
            break;
        }
    }

    catalog_info!("Catalog console closed");
    Ok(())
}

struct Console {
    state: AppState,
    last_view: Option<AppViewModel>,
    runner: EffectRunner,
}

impl Console {
    fn dispatch(&mut self, msg: Msg) -> anyhow::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let alerts = self.runner.enqueue(effects);
        let was_dirty = state.consume_dirty();
        self.state = state;

        let mut lines: Vec<String> = alerts.iter().map(|text| ui::render::alert(text)).collect();
        if was_dirty || self.last_view.is_none() {
            let view = self.state.view();
            lines.extend(ui::render::render(self.last_view.as_ref(), &view));
            self.last_view = Some(view);
        }
        self.print(lines)
    }

    fn print(&self, lines: impl IntoIterator<Item = String>) -> anyhow::Result<()> {
        let mut out = io::stdout().lock();
        for line in lines {
            writeln!(out, "{line}").context("failed to write to the console")?;
        }
        out.flush().context("failed to write to the console")
    }
}

fn spawn_input_reader(event_tx: mpsc::Sender<LoopEvent>) -> io::Result<()> {
    thread::Builder::new()
        .name("catalog-console-input".to_string())
        .spawn(move || {
            for line in io::stdin().lock().lines() {
                let Ok(line) = line else {
                    break;
                };
                if event_tx
                    .send(LoopEvent::Input(ui::input::parse_line(&line)))
                    .is_err()
                {
                    return;
                }
            }
            let _ = event_tx.send(LoopEvent::InputClosed);
        })?;
    Ok(())
}
