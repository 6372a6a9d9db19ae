use crate::command::{Command, ExportFormat, HELP};
use anyhow::{Context, Result};
use rand::rngs::StdRng;
use std::io::BufRead;
use std::path::PathBuf;
use std::sync::mpsc::{self, Receiver, Sender};
use std::thread;
use std::time::Duration;
use switchex_core::RoomId;
use switchex_experiment::{ActionOutcome, ExperimentConfig, Session, TrialState};
use switchex_timing::{SystemClock, Ticker};
use tracing::{debug, info, warn};

/// Everything the console loop reacts to. Stdin lines and timer ticks share
/// one channel so they are handled strictly one at a time.
#[derive(Debug)]
pub enum AppEvent {
    Line(String),
    Tick,
    InputClosed,
}

pub struct App {
    session: Session<SystemClock, StdRng>,
    output_dir: PathBuf,
    tick_interval: Duration,
    events_tx: Sender<AppEvent>,
    events_rx: Option<Receiver<AppEvent>>,
    ticker: Option<Ticker>,
    exported: usize,

    should_exit: bool,
}

impl App {
    pub fn new(config: ExperimentConfig, rng: StdRng, output_dir: PathBuf) -> Self {
        let tick_interval = Duration::from_millis(config.tick_interval_ms);
        let (events_tx, events_rx) = mpsc::channel();
        Self {
            session: Session::new(config, SystemClock, rng),
            output_dir,
            tick_interval,
            events_tx,
            events_rx: Some(events_rx),
            ticker: None,
            exported: 0,
            should_exit: false,
        }
    }

    pub fn session_mut(&mut self) -> &mut Session<SystemClock, StdRng> {
        &mut self.session
    }

    pub fn run(mut self) -> Result<()> {
        let events = self
            .events_rx
            .take()
            .context("console loop already ran")?;

        println!("=== LIGHT SWITCH STUDY ===");
        println!("Type `help` for commands.\n");
        self.print_status();

        let input_tx = self.events_tx.clone();
        thread::Builder::new()
            .name("stdin".into())
            .spawn(move || {
                for line in std::io::stdin().lock().lines() {
                    let Ok(line) = line else { break };
                    if input_tx.send(AppEvent::Line(line)).is_err() {
                        return;
                    }
                }
                let _ = input_tx.send(AppEvent::InputClosed);
            })
            .context("failed to spawn input thread")?;

        for event in events.iter() {
            match event {
                AppEvent::Line(line) => {
                    if line.trim().is_empty() {
                        continue;
                    }
                    if let Err(e) = self.handle_line(&line) {
                        debug!(line = %line, error = %e, "command refused");
                        println!("! {e:#}");
                    }
                }
                AppEvent::Tick => {
                    if self.session.tick() {
                        debug!(elapsed = self.session.engine().elapsed_secs(), "tick");
                    }
                }
                AppEvent::InputClosed => self.should_exit = true,
            }
            if self.should_exit {
                break;
            }
        }

        self.cleanup();
        Ok(())
    }

    fn handle_line(&mut self, line: &str) -> Result<()> {
        let command: Command = line.parse()?;
        match command {
            Command::Participant(id) => {
                self.session.set_participant(&id)?;
                let participant = self.session.participant();
                println!("Participant {} (group {})", participant.id, participant.group);
                for (i, condition) in self.session.conditions().iter().enumerate() {
                    println!("  {}. {}", i + 1, condition.label());
                }
                self.print_preview();
            }
            Command::Group(group) => {
                self.session.set_group(&group)?;
                let participant = self.session.participant();
                println!("Participant {} (group {})", participant.id, participant.group);
            }
            Command::Start => {
                let trial = self.session.start_trial()?;
                println!("Trial started: {}", trial.condition.label());
                print_targets(trial);
                self.start_ticker();
            }
            Command::Press(room) => {
                let room = self.resolve_room(room);
                match self.session.press(&room)? {
                    ActionOutcome::Recorded(event) => {
                        let mark = if event.is_error { "ERROR" } else { "ok" };
                        println!(
                            "{} {} at {:.2}s [{mark}]",
                            room.display_name(),
                            event.action,
                            event.relative_seconds
                        );
                    }
                    ActionOutcome::Debounced => println!("(ignored, pressed too quickly)"),
                    ActionOutcome::Replayed => println!("(toggled, duplicate event not logged)"),
                }
            }
            Command::Success => self.finish(true)?,
            Command::Fail => self.finish(false)?,
            Command::Survey(scores) => {
                let trial_id = self.session.submit_survey(scores)?;
                println!(
                    "Survey saved for trial {trial_id}: workload {:.2}, confidence {}",
                    scores.nasa_tlx, scores.confidence
                );
            }
            Command::Next => {
                let condition = self.session.next_condition()?;
                println!("Next condition: {}", condition.label());
                self.print_preview();
            }
            Command::Reset => {
                self.session.reset_for_next()?;
                self.stop_ticker();
                println!("Trial cleared.");
            }
            Command::Orient(degrees) => {
                self.session.set_floor_plan_orientation(degrees);
                println!(
                    "Floor plan rotated to {} degrees",
                    self.session.floor_plan_orientation()
                );
            }
            Command::Status => self.print_status(),
            Command::Export(format) => {
                let path = self.export(format)?;
                println!("Saved {}", path.display());
            }
            Command::Help => println!("{HELP}"),
            Command::Quit => self.should_exit = true,
        }
        Ok(())
    }

    fn finish(&mut self, success: bool) -> Result<()> {
        let trial_id = self.session.mark_result(success)?;
        self.stop_ticker();
        if let Some(record) = self.session.recorder().find(trial_id) {
            println!(
                "Trial {trial_id} recorded: {} in {:.2}s with {} error(s)",
                if record.success { "success" } else { "failure" },
                record.completion_time_secs,
                record.errors
            );
        }
        println!("Enter the questionnaire with `survey`, then `next`.");
        Ok(())
    }

    /// Console input is case-insensitive; the engine wants the layout's id
    fn resolve_room(&self, room: RoomId) -> RoomId {
        self.session
            .engine()
            .current()
            .and_then(|trial| {
                trial
                    .layout
                    .room_ids()
                    .find(|id| id.as_str().eq_ignore_ascii_case(room.as_str()))
                    .cloned()
            })
            .unwrap_or(room)
    }

    fn start_ticker(&mut self) {
        self.stop_ticker();
        let tx = self.events_tx.clone();
        self.ticker = Some(Ticker::spawn(self.tick_interval, move || {
            tx.send(AppEvent::Tick).is_ok()
        }));
    }

    fn stop_ticker(&mut self) {
        if let Some(mut ticker) = self.ticker.take() {
            ticker.stop();
        }
    }

    fn export(&mut self, format: ExportFormat) -> Result<PathBuf> {
        std::fs::create_dir_all(&self.output_dir).with_context(|| {
            format!("failed to create output directory {}", self.output_dir.display())
        })?;
        let mut path = self.output_dir.join(self.session.export_file_name());
        let contents = match format {
            ExportFormat::Csv => self.session.export_csv(),
            ExportFormat::Json => {
                path.set_extension("json");
                self.session
                    .recorder()
                    .export_json()
                    .context("failed to serialize records")?
            }
        };
        std::fs::write(&path, contents)
            .with_context(|| format!("failed to write {}", path.display()))?;
        self.exported = self.session.recorder().len();
        info!(path = %path.display(), records = self.exported, "records exported");
        Ok(path)
    }

    fn print_preview(&self) {
        if let Some(trial) = self.session.engine().current() {
            print_targets(trial);
        }
    }

    fn print_status(&self) {
        let session = &self.session;
        let engine = session.engine();
        let participant = session.participant();
        let id = if participant.id.is_empty() { "-" } else { participant.id.as_str() };
        let group = if participant.group.is_empty() {
            "-"
        } else {
            participant.group.as_str()
        };

        println!("Participant: {id}  Group: {group}");
        println!(
            "Condition {}/{}: {}",
            session.condition_index() + 1,
            session.conditions().len(),
            session.current_condition().label()
        );
        println!(
            "Phase: {:?}  Elapsed: {}s  Errors: {}",
            engine.phase(),
            engine.elapsed_secs(),
            engine.error_count()
        );
        if let Some(trial) = engine.current() {
            let lit: Vec<String> = trial.lit_rooms().iter().map(|r| r.display_name()).collect();
            println!(
                "Layout {} rooms, variation {}  Lit: {}",
                trial.layout.room_count,
                trial.layout.variation_index + 1,
                if lit.is_empty() { "none".to_string() } else { lit.join(", ") }
            );
            if engine.is_active() && trial.goal_reached() {
                println!("All targets are in their goal state.");
            }
        }
        println!(
            "Floor plan: {} degrees  Records: {}",
            session.floor_plan_orientation(),
            session.recorder().len()
        );
    }

    fn cleanup(&mut self) {
        self.stop_ticker();
        let unsaved = self.session.recorder().len() - self.exported;
        if unsaved > 0 {
            warn!(records = unsaved, "exiting with unexported records");
        }
        println!("\nSession ended.");
    }
}

fn print_targets(trial: &TrialState) {
    let rooms: Vec<String> = trial.layout.room_ids().map(RoomId::display_name).collect();
    println!("  Rooms: {}", rooms.join(", "));
    let on: Vec<String> = trial.targets_to_turn_on.iter().map(RoomId::display_name).collect();
    println!("  Turn ON: {}", on.join(", "));
    if !trial.targets_to_turn_off.is_empty() {
        let off: Vec<String> = trial
            .targets_to_turn_off
            .iter()
            .map(RoomId::display_name)
            .collect();
        println!("  Turn OFF: {}", off.join(", "));
    }
}

impl Drop for App {
    fn drop(&mut self) {
        self.stop_ticker();
    }
}
