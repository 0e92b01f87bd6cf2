use serde::{Deserialize, Serialize};
use std::collections::HashMap;
use std::time::Instant;

/// Action phase - whether the action is starting or finishing
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum ActionPhase {
    Start,
    Finish,
}

/// User actions that change the grid or launch a search
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub enum Action {
    /// Turn a cell into a barricade (x, y)
    SetBarricade { x: i32, y: i32 },
    /// Remove a barricade (x, y)
    ClearBarricade { x: i32, y: i32 },
    /// Remove all barricades
    Clear,
    /// Forget search state
    Reset,
    SetStart { x: i32, y: i32 },
    SetDestination { x: i32, y: i32 },
    /// Search from start to destination; Start when launched, Finish when reaped
    Run { from_x: i32, from_y: i32, to_x: i32, to_y: i32 },
}

/// Logged action with timestamp and phase
#[derive(Clone, Debug, Serialize, Deserialize)]
pub struct LoggedAction {
    /// Milliseconds since start
    pub timestamp_ms: u64,
    /// The action
    pub action: Action,
    /// Whether this is the start or finish of the action
    pub phase: ActionPhase,
}

/// Action logger
pub struct ActionLog {
    start_time: Instant,
    actions: Vec<LoggedAction>,
}

impl Default for ActionLog {
    fn default() -> Self {
        Self::new()
    }
}

impl ActionLog {
    pub fn new() -> Self {
        ActionLog {
            start_time: Instant::now(),
            actions: Vec::new(),
        }
    }

    /// Log an action with current timestamp and phase
    pub fn log(&mut self, action: Action, phase: ActionPhase) {
        let timestamp_ms = self.start_time.elapsed().as_millis() as u64;

        self.actions.push(LoggedAction {
            timestamp_ms,
            action,
            phase,
        });
    }

    pub fn log_start(&mut self, action: Action) {
        self.log(action, ActionPhase::Start);
    }

    pub fn log_finish(&mut self, action: Action) {
        self.log(action, ActionPhase::Finish);
    }

    /// Log an action that completes immediately
    pub fn record(&mut self, action: Action) {
        self.log_start(action.clone());
        self.log_finish(action);
    }

    pub fn actions(&self) -> &[LoggedAction] {
        &self.actions
    }

    /// Save log to JSON file
    pub fn save_to_file(&self, path: &str) -> Result<(), Box<dyn std::error::Error>> {
        let json = serde_json::to_string_pretty(&self.actions)?;
        std::fs::write(path, json)?;
        Ok(())
    }

    /// Render the log with durations between matching start/finish pairs
    pub fn format_with_durations(&self) -> String {
        let mut out = String::from("=== Action Log with Durations ===\n");
        let mut start_times: HashMap<String, u64> = HashMap::new();

        for (i, logged) in self.actions.iter().enumerate() {
            let action_key = format!("{:?}", logged.action);

            match logged.phase {
                ActionPhase::Start => {
                    start_times.insert(action_key, logged.timestamp_ms);
                    out.push_str(&format!(
                        "[{:6}ms] #{:3} START  {:?}\n",
                        logged.timestamp_ms,
                        i + 1,
                        logged.action
                    ));
                }
                ActionPhase::Finish => match start_times.remove(&action_key) {
                    Some(start_ms) => out.push_str(&format!(
                        "[{:6}ms] #{:3} FINISH {:?} [duration: {}ms]\n",
                        logged.timestamp_ms,
                        i + 1,
                        logged.action,
                        logged.timestamp_ms - start_ms
                    )),
                    None => out.push_str(&format!(
                        "[{:6}ms] #{:3} FINISH {:?} [no matching start]\n",
                        logged.timestamp_ms,
                        i + 1,
                        logged.action
                    )),
                },
            }
        }
        out.push_str("=== End of Log ===\n");
        out
    }

    /// Get summary statistics
    pub fn summary(&self) -> String {
        let mut barricades = 0;
        let mut cleared = 0;
        let mut wipes = 0;
        let mut resets = 0;
        let mut markers = 0;
        let mut runs = 0;

        // Only count finish events to get actual completed action counts
        for logged in &self.actions {
            if logged.phase == ActionPhase::Finish {
                match &logged.action {
                    Action::SetBarricade { .. } => barricades += 1,
                    Action::ClearBarricade { .. } => cleared += 1,
                    Action::Clear => wipes += 1,
                    Action::Reset => resets += 1,
                    Action::SetStart { .. } | Action::SetDestination { .. } => markers += 1,
                    Action::Run { .. } => runs += 1,
                }
            }
        }

        let duration = self.actions.last().map(|last| last.timestamp_ms).unwrap_or(0);

        format!(
            "Session Duration: {}ms\n\
             Total Events: {}\n\
             Grid Modifications: {} barricaded, {} cleared, {} clears, {} resets\n\
             Markers placed: {}, Searches completed: {}",
            duration,
            self.actions.len(),
            barricades,
            cleared,
            wipes,
            resets,
            markers,
            runs
        )
    }
}
