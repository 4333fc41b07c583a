use std::io::{self, BufRead, Write};
use std::path::PathBuf;
use std::sync::{mpsc, Arc};
use std::thread;
use std::time::{Duration, Instant};

use anyhow::Context;
use predict_core::{update, AppState, Effect, Msg, PredictionView};
use predict_engine::EngineHandle;
use predict_logging::{predict_info, predict_warn};

use super::config::AppConfig;
use super::effects::EffectRunner;
use super::logging;
use super::ui::commands::{self, Command, HELP};
use super::ui::render;

const TICK: Duration = Duration::from_millis(75);
const DRAIN_TIMEOUT: Duration = Duration::from_secs(30);

pub fn run_app() -> anyhow::Result<()> {
    let config_path = std::env::args_os().nth(1).map(PathBuf::from);
    let config = AppConfig::load(config_path.as_deref())
        .context("loading configuration")?
        .with_env_overrides();
    logging::initialize(config.log_destination);
    predict_info!("predict_app starting, backend {}", config.backend_url);

    let engine = EngineHandle::new(config.fetch_settings()).context("starting fetch engine")?;
    let state = AppState::new(Arc::new(config.catalog()));
    let mut app = App::new(state, EffectRunner::new(engine), io::stdout());

    let lines = spawn_stdin_reader();
    app.start(config.bearer_token)?;

    loop {
        while let Some(msg) = app.runner.try_recv() {
            app.dispatch(msg)?;
        }
        match lines.recv_timeout(TICK) {
            Ok(line) => {
                if !app.handle_line(&line)? {
                    break;
                }
            }
            Err(mpsc::RecvTimeoutError::Timeout) => app.dispatch(Msg::Tick)?,
            Err(mpsc::RecvTimeoutError::Disconnected) => break,
        }
    }

    app.settle(DRAIN_TIMEOUT)?;
    predict_info!("predict_app exiting");
    Ok(())
}

fn spawn_stdin_reader() -> mpsc::Receiver<String> {
    let (line_tx, line_rx) = mpsc::channel();
    thread::spawn(move || {
        for line in io::stdin().lock().lines() {
            match line {
                Ok(line) => {
                    if line_tx.send(line).is_err() {
                        break;
                    }
                }
                Err(err) => {
                    predict_warn!("stdin read failed: {}", err);
                    break;
                }
            }
        }
    });
    line_rx
}

/// Terminal display surface: owns the state, prints what changed.
struct App<W: Write> {
    state: AppState,
    runner: EffectRunner,
    out: W,
    shown: Option<PredictionView>,
}

impl<W: Write> App<W> {
    fn new(state: AppState, runner: EffectRunner, out: W) -> Self {
        Self {
            state,
            runner,
            out,
            shown: None,
        }
    }

    fn start(&mut self, bearer_token: Option<String>) -> io::Result<()> {
        writeln!(self.out, "{HELP}\n")?;
        let catalog = render::render_catalog(&self.state.view());
        writeln!(self.out, "{catalog}")?;
        self.dispatch(Msg::AuthTokenChanged(bearer_token))
    }

    /// Returns false once the user asked to quit.
    fn handle_line(&mut self, line: &str) -> io::Result<bool> {
        let command = match commands::parse(line) {
            Ok(Some(command)) => command,
            Ok(None) => return Ok(true),
            Err(err) => {
                writeln!(self.out, "! {err}")?;
                return Ok(true);
            }
        };

        match command {
            Command::Quit => return Ok(false),
            Command::Help => writeln!(self.out, "{HELP}")?,
            Command::List => {
                let catalog = render::render_catalog(&self.state.view());
                write!(self.out, "{catalog}")?;
            }
            Command::Show => {
                self.shown = None;
                self.render()?;
            }
            command => {
                let view = self.state.view();
                if let Some(msg) = command.into_msg(&view.domains, &view.queries) {
                    self.dispatch(msg)?;
                }
            }
        }
        Ok(true)
    }

    fn dispatch(&mut self, msg: Msg) -> io::Result<()> {
        let state = std::mem::take(&mut self.state);
        let (mut state, effects) = update(state, msg);
        let was_dirty = state.consume_dirty();
        self.state = state;

        for effect in effects {
            if let Effect::SelectionChanged { selection, queries } = &effect {
                let listing =
                    render::render_queries(&selection.domain, queries, Some(&selection.query));
                write!(self.out, "{listing}")?;
            }
            self.runner.run(effect);
        }

        if was_dirty {
            self.render()?;
        }
        Ok(())
    }

    fn render(&mut self) -> io::Result<()> {
        let view = self.state.view();
        if view.result != self.shown {
            if let Some(result) = &view.result {
                let settled_at = chrono::Local::now().format("%H:%M:%S").to_string();
                write!(self.out, "{}", render::render_result(result, &settled_at))?;
            }
            self.shown = view.result.clone();
        }
        writeln!(self.out, "{}", render::render_status(&view))?;
        self.out.flush()
    }

    /// Waits for outstanding fetches and image loads, up to `timeout`.
    fn settle(&mut self, timeout: Duration) -> io::Result<()> {
        let deadline = Instant::now() + timeout;
        while self.state.view().pending() > 0 {
            let remaining = deadline.saturating_duration_since(Instant::now());
            if remaining.is_zero() {
                predict_warn!("giving up on {} pending operations", self.state.view().pending());
                break;
            }
            match self.runner.recv_timeout(remaining) {
                Some(msg) => self.dispatch(msg)?,
                None => break,
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use predict_core::{PredictionResponse, JOB_MARKET, REAL_ESTATE};
    use predict_engine::{FailureKind, FetchError, PredictionFetcher, PredictionRequest};

    use super::*;

    struct ScriptedBackend;

    #[async_trait::async_trait]
    impl PredictionFetcher for ScriptedBackend {
        async fn fetch_prediction(
            &self,
            request: &PredictionRequest,
        ) -> Result<PredictionResponse, FetchError> {
            if request.domain == REAL_ESTATE {
                return Ok(PredictionResponse {
                    prediction_info: Some("Prices in Philadelphia hold steady.".to_string()),
                    image_path: Some("/static/Assets/MachineLearning/re.png".to_string()),
                    ..PredictionResponse::default()
                });
            }
            Err(FetchError {
                kind: FailureKind::HttpStatus(500),
                message: "Internal Server Error".to_string(),
            })
        }

        async fn check_image(&self, _path: &str) -> Result<(), FetchError> {
            Err(FetchError {
                kind: FailureKind::HttpStatus(404),
                message: String::new(),
            })
        }
    }

    fn app() -> App<Vec<u8>> {
        let engine = EngineHandle::with_fetcher(Arc::new(ScriptedBackend)).unwrap();
        App::new(AppState::default(), EffectRunner::new(engine), Vec::new())
    }

    fn output(app: &App<Vec<u8>>) -> String {
        String::from_utf8(app.out.clone()).unwrap()
    }

    #[test]
    fn session_prints_result_then_replaces_failed_image() {
        let mut app = app();
        app.start(None).unwrap();
        assert!(app.handle_line(&format!("domain {REAL_ESTATE}")).unwrap());
        assert!(app.handle_line("submit").unwrap());
        app.settle(Duration::from_secs(5)).unwrap();

        let out = output(&app);
        assert!(out.contains("Queries for RealEstate:"), "{out}");
        assert!(out.contains("Prices in Philadelphia hold steady."), "{out}");
        assert!(out.contains("[image] Prediction image for Real Estate Query 1 Philadelphia"));
        assert!(out.contains("error: Error loading prediction image."), "{out}");
        assert_eq!(app.state.view().pending(), 0);
    }

    #[test]
    fn backend_failure_is_shown_as_error_note() {
        let mut app = app();
        app.start(None).unwrap();
        app.handle_line(&format!("domain {JOB_MARKET}")).unwrap();
        app.handle_line("go").unwrap();
        app.settle(Duration::from_secs(5)).unwrap();

        let out = output(&app);
        let expected = "error: Error fetching prediction: http status 500: Internal Server Error";
        assert!(out.contains(expected), "{out}");
    }

    #[test]
    fn quit_and_bad_commands() {
        let mut app = app();
        assert!(app.handle_line("bogus").unwrap());
        assert!(output(&app).contains("unknown command"));
        assert!(!app.handle_line("quit").unwrap());
    }
}
