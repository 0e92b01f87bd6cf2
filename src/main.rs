use arboard::Clipboard;
use gridpath::config::{Config, CONFIG_PATH};
use gridpath::console::Console;
use gridpath::input::{InputHandler, PointerSample, TickOutcome};
use gridpath::{CellKind, ConfigError, Grid, GridSnapshot, SearchOutcome, Session};
use macroquad::prelude::*;
use std::io;
use std::sync::Arc;
use std::thread;

/// Window state owned by the render loop
struct VisState {
    session: Arc<Session>,
    input: InputHandler,
    cell_width: f32,
    cell_height: f32,
    background: Color,
    show_info: bool,
    status: String,
}

impl VisState {
    fn new(session: Arc<Session>, config: &Config) -> Self {
        VisState {
            session,
            input: InputHandler::new(config.cell_width(), config.cell_height()),
            cell_width: config.cell_width(),
            cell_height: config.cell_height(),
            background: Color::from_rgba(
                config.visual.background_r,
                config.visual.background_g,
                config.visual.background_b,
                255,
            ),
            show_info: config.visual.show_info,
            status: "Type 'help' in the console".to_string(),
        }
    }

    fn handle_input(&mut self) {
        let (x, y) = mouse_position();
        let sample = PointerSample {
            x,
            y,
            fill: is_mouse_button_down(MouseButton::Left),
            clear: is_mouse_button_down(MouseButton::Right),
        };
        if let TickOutcome::Rejected(e) = self.input.tick(&self.session, sample) {
            log::trace!("Pointer edit ignored: {}", e);
        }
    }

    fn reap_search(&mut self) {
        if let Some(outcome) = self.session.poll_finished() {
            self.status = report(&outcome);
            println!("{}", self.status);
        }
    }

    fn copy_to_clipboard(&self) {
        let grid_string = self.session.snapshot().to_ascii();
        match Clipboard::new() {
            Ok(mut clipboard) => {
                if let Err(e) = clipboard.set_text(&grid_string) {
                    log::warn!("Failed to copy to clipboard: {}", e);
                } else {
                    log::info!("Grid layout copied to clipboard");
                    // Keep clipboard alive for a moment so clipboard managers can capture it
                    thread::sleep(std::time::Duration::from_millis(100));
                }
            }
            Err(e) => log::warn!("Failed to access clipboard: {}", e),
        }
    }

    fn draw(&self, snapshot: &GridSnapshot) {
        clear_background(self.background);

        for y in 0..snapshot.rows {
            for x in 0..snapshot.cols {
                let Some(kind) = snapshot.kind_at(x, y) else {
                    continue;
                };
                let px = x as f32 * self.cell_width;
                let py = y as f32 * self.cell_height;
                draw_rectangle(
                    px,
                    py,
                    self.cell_width - 1.0,
                    self.cell_height - 1.0,
                    cell_color(kind),
                );
            }
        }

        if self.show_info {
            let state = if self.session.is_running() { "running" } else { "idle" };
            let info = format!(
                "{}x{} | {} | {}\nLeft drag: barricade  Right drag: erase  C: copy  Esc: quit",
                snapshot.cols, snapshot.rows, state, self.status
            );
            for (i, line) in info.lines().enumerate() {
                draw_text(line, 10.0, 20.0 + i as f32 * 20.0, 20.0, BLACK);
            }
        }
    }
}

fn cell_color(kind: CellKind) -> Color {
    match kind {
        CellKind::Free => Color::from_rgba(235, 235, 235, 255),
        CellKind::Barricade => DARKGRAY,
        CellKind::Visited => SKYBLUE,
        CellKind::Path => GOLD,
        CellKind::Start => GREEN,
        CellKind::Destination => RED,
    }
}

fn report(outcome: &SearchOutcome) -> String {
    match outcome {
        SearchOutcome::Found { path, expanded } => format!(
            "found! path of {} steps ({} nodes expanded)",
            path.len().saturating_sub(1),
            expanded
        ),
        SearchOutcome::NotFound { expanded } => {
            format!("No path found ({} nodes expanded)", expanded)
        }
    }
}

fn window_conf() -> Conf {
    let (config, _) = Config::load();
    Conf {
        window_title: config.visual.window_title.clone(),
        window_width: config.canvas.width as i32,
        window_height: config.canvas.height as i32,
        window_resizable: false,
        ..Default::default()
    }
}

#[macroquad::main(window_conf)]
async fn main() {
    let (config, load_error) = Config::load();
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or(&config.logging.level))
        .init();

    match load_error {
        None => log::info!("Loaded configuration from {}", CONFIG_PATH),
        Some(ConfigError::Io(_)) => log::info!("No {} found, using default configuration", CONFIG_PATH),
        Some(e) => log::warn!("{}; using default configuration", e),
    }

    if let Err(e) = config.validate() {
        log::error!("{}", e);
        std::process::exit(1);
    }
    let grid = match Grid::new(config.grid.cols, config.grid.rows) {
        Ok(grid) => grid,
        Err(e) => {
            log::error!("{}", e);
            std::process::exit(1);
        }
    };

    let session = Arc::new(Session::new(grid, config.step_delay()));
    log::info!(
        "Grid {}x{}, step delay {:?}",
        config.grid.cols,
        config.grid.rows,
        config.step_delay()
    );

    let console = Console::new(Arc::clone(&session));
    let console_thread = thread::Builder::new()
        .name("console".to_string())
        .spawn(move || {
            if let Err(e) = console.run(io::stdin().lock(), io::stdout()) {
                log::error!("Console stopped: {}", e);
            }
        });
    let console_thread = match console_thread {
        Ok(handle) => Some(handle),
        Err(e) => {
            log::error!("Failed to start console: {}", e);
            None
        }
    };

    let mut state = VisState::new(Arc::clone(&session), &config);

    loop {
        state.reap_search();
        state.handle_input();

        // Copy grid to clipboard on C key
        if is_key_pressed(KeyCode::C) {
            state.copy_to_clipboard();
        }

        if is_key_pressed(KeyCode::Escape) {
            break;
        }

        let snapshot = session.snapshot();
        state.draw(&snapshot);

        next_frame().await
    }

    if session.is_running() {
        log::info!("Waiting for the running search to finish");
    }
    if let Some(outcome) = session.wait() {
        println!("{}", report(&outcome));
    }

    if config.logging.enable_action_log {
        match session.save_action_log(&config.logging.action_log_path) {
            Ok(()) => log::info!("Action log saved to {}", config.logging.action_log_path),
            Err(e) => log::warn!("Failed to save action log: {}", e),
        }
    }
    log::info!("{}", session.action_summary());

    match console_thread {
        Some(handle) if handle.is_finished() => {
            let _ = handle.join();
        }
        Some(_) => log::debug!("Console thread still waiting on stdin; exiting without join"),
        None => {}
    }
}
