mod common;

use gridpath::console::{Console, BUSY_MESSAGE, NOT_READY_MESSAGE, OUT_OF_RANGE_MESSAGE};
use gridpath::{Grid, Position, Session};
use std::io::Cursor;
use std::sync::Arc;
use std::time::Duration;

fn console(cols: i32, rows: i32, delay: Duration) -> (Console, Arc<Session>) {
    let session = Arc::new(Session::new(Grid::new(cols, rows).unwrap(), delay));
    (Console::new(Arc::clone(&session)), session)
}

/// Feed a script through the console and collect its output
fn run_script(console: &Console, script: &str) -> String {
    let mut output = Vec::new();
    console.run(Cursor::new(script), &mut output).unwrap();
    String::from_utf8(output).unwrap()
}

#[test]
fn test_marker_commands_report_failures() {
    let (console, session) = console(5, 5, Duration::ZERO);
    session.set_barricade(2, 2).unwrap();

    assert_eq!(console.execute("setstart 9 0").as_deref(), Some(OUT_OF_RANGE_MESSAGE));
    assert_eq!(
        console.execute("setstart 2 2").as_deref(),
        Some("You can't create a starting point in a wall!")
    );
    assert_eq!(console.execute("setdest -1 3").as_deref(), Some(OUT_OF_RANGE_MESSAGE));
    assert_eq!(
        console.execute("setdest 2 2").as_deref(),
        Some("You can't create a dest point in a wall!")
    );
    assert_eq!(console.execute("setstart 1 1"), None);
    assert_eq!(session.read(|g| g.start()), Some(Position::new(1, 1)));
    assert_eq!(session.read(|g| g.destination()), None);
}

#[test]
fn test_usage_and_unknown_commands() {
    let (console, _) = console(3, 3, Duration::ZERO);

    assert_eq!(
        console.execute("setstart 1").as_deref(),
        Some("Wrong parameters! [help]: setstart [x] [y]")
    );
    assert_eq!(
        console.execute("setdest a b").as_deref(),
        Some("Wrong parameters! [help]: setdest [x] [y]")
    );
    assert_eq!(
        console.execute("clear everything").as_deref(),
        Some("Wrong parameters! [help]: clear")
    );
    assert_eq!(console.execute("fly").as_deref(), Some("Unknown command: fly"));
    assert_eq!(console.execute(""), None);
}

#[test]
fn test_run_requires_both_markers() {
    let (console, session) = console(3, 3, Duration::ZERO);
    assert_eq!(console.execute("run").as_deref(), Some(NOT_READY_MESSAGE));
    console.execute("setdest 2 2");
    assert_eq!(console.execute("run").as_deref(), Some(NOT_READY_MESSAGE));
    assert!(!session.is_running());
}

#[test]
fn test_scripted_session() {
    let (console, session) = console(4, 3, Duration::ZERO);
    let output = run_script(&console, "setstart 0 0\nsetdest 3 2\nrun\n");
    assert_eq!(output, "Searching from (0,0) to (3,2)...\n");

    let outcome = session.wait().unwrap();
    assert_eq!(outcome.path().map(|p| p.len() - 1), Some(5));

    let output = run_script(&console, "path\nshow\n");
    assert!(output.starts_with("(0,0) -> (1,0)"), "{}", output);
    assert!(output.contains("(5 steps)"));
    assert!(output.contains("s***\n"), "{}", output);
}

#[test]
fn test_clear_and_reset_commands() {
    let (console, session) = console(3, 3, Duration::ZERO);
    session.set_barricade(1, 1).unwrap();
    run_script(&console, "setstart 0 0\nsetdest 2 2\nrun\n");
    session.wait().unwrap();

    assert_eq!(console.execute("reset"), None);
    assert_eq!(session.read(|g| g.visited_count()), 0);
    assert_eq!(session.read(|g| g.is_walkable(1, 1)), Ok(false));
    assert_eq!(console.execute("path").as_deref(), Some("No path"));

    assert_eq!(console.execute("clear"), None);
    assert_eq!(session.read(|g| g.is_walkable(1, 1)), Ok(true));
}

#[test]
fn test_everything_rejected_while_running() {
    let (console, session) = console(30, 30, Duration::from_millis(1));
    run_script(&console, "setstart 0 0\nsetdest 29 29\nrun\n");
    assert!(session.is_running());

    for line in ["run", "clear", "reset", "setstart 1 1", "help", "bogus"] {
        assert_eq!(console.execute(line).as_deref(), Some(BUSY_MESSAGE), "{}", line);
    }
    assert_eq!(session.read(|g| g.start()), Some(Position::new(0, 0)));

    session.wait().unwrap();
    assert_ne!(console.execute("help").as_deref(), Some(BUSY_MESSAGE));
}

#[test]
fn test_log_command_lists_actions() {
    let (console, _) = console(3, 3, Duration::ZERO);
    console.execute("setstart 0 0");
    console.execute("setdest 1 1");
    let output = console.execute("log").unwrap();
    assert!(output.contains("SetStart"), "{}", output);
    assert!(output.contains("Markers placed: 2"), "{}", output);
}
