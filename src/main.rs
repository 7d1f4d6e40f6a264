//! Aldon UI - Entry Point
//!
//! Sets up the terminal, wires the demo engine to the dialog host, and runs
//! the event loop. The deferred queue is pumped after every event, once the
//! engine calls made for that event have returned.

use std::cell::RefCell;
use std::fs::OpenOptions;
use std::io;
use std::rc::Rc;
use std::time::Duration;

use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEventKind},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::Line,
    widgets::{Block, Borders, Paragraph},
    Frame, Terminal,
};

use aldon_ui::engine::demo::PLAYER;
use aldon_ui::items::TradeKind;
use aldon_ui::save::{self, FileBackend, SaveStore};
use aldon_ui::{DeferredQueue, DemoEngine, DialogHost, EngineHandle, MenuCommand, Session};

const POLL_INTERVAL: Duration = Duration::from_millis(100);

const WORLD_HELP: &[&str] = &[
    "[i] Inventory  [b] Buy  [s] Sell  [c] Chest  [m] Spellbook  [1-4] Set button  [t] Talk",
    "[n] New  [k] Quicksave  [v] Save  [l] Load  [x] Delete  [e] Export",
    "[a] Stats  [j] Quests  [p] Preferences  [q] Quit",
];

fn main() -> Result<()> {
    let prefs_path = save::preferences_path();
    let preferences = save::load_preferences(&prefs_path);

    // Initialize logging to file (to avoid interfering with TUI)
    let log_file = OpenOptions::new()
        .create(true)
        .write(true)
        .truncate(true)
        .open("aldon-ui.log")?;

    env_logger::Builder::from_env(
        env_logger::Env::default().default_filter_or(preferences.log_filter.as_str())
    )
    .target(env_logger::Target::Pipe(Box::new(log_file)))
    .init();

    log::info!("Starting Aldon UI v{}", env!("CARGO_PKG_VERSION"));

    let queue = DeferredQueue::new();
    let demo = Rc::new(RefCell::new(DemoEngine::new(queue.poster())));
    let engine: EngineHandle = demo.clone();

    let store_path = preferences.save_store_path();
    log::info!("Save store at {:?}", store_path);
    let session = Session::new(engine, SaveStore::new(FileBackend::new(store_path)))
        .with_preferences(preferences, Some(prefs_path));
    let mut host = DialogHost::new(session, queue, PLAYER)
        .with_export_dir(std::env::current_dir()?);

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let result = run_loop(&mut terminal, &mut host, &demo);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(ref e) = result {
        log::error!("Exited with error: {}", e);
        eprintln!("Error: {}", e);
    }

    log::info!("Aldon UI shut down cleanly");
    result
}

fn run_loop(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    host: &mut DialogHost<FileBackend>,
    demo: &Rc<RefCell<DemoEngine>>,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, host, demo))?;

        if !event::poll(POLL_INTERVAL)? {
            continue;
        }
        let Event::Key(key) = event::read()? else {
            continue;
        };
        // Only handle key press events, not releases
        if key.kind != KeyEventKind::Press {
            continue;
        }

        if !host.handle_key(key.code) && !world_key(key.code, host, demo) {
            break;
        }

        // Every engine call for this event has returned
        host.pump();
    }
    Ok(())
}

/// Keys while no dialog is open. Returns false to quit.
fn world_key(
    code: KeyCode,
    host: &mut DialogHost<FileBackend>,
    demo: &Rc<RefCell<DemoEngine>>,
) -> bool {
    match code {
        KeyCode::Char('q') | KeyCode::Esc => return false,
        KeyCode::Char('i') => demo.borrow().open_inventory(),
        KeyCode::Char('b') => demo.borrow().open_shop(TradeKind::Buy),
        KeyCode::Char('s') => demo.borrow().open_shop(TradeKind::Sell),
        KeyCode::Char('c') => demo.borrow_mut().open_chest(),
        KeyCode::Char('m') => demo.borrow().open_spellbook(),
        KeyCode::Char(c @ '1'..='4') => {
            let index = c as usize - '1' as usize;
            demo.borrow().pick_button(index);
        }
        KeyCode::Char('t') => demo.borrow().talk(),
        KeyCode::Char('n') => host.open_menu(MenuCommand::NewCharacter),
        KeyCode::Char('k') => host.open_menu(MenuCommand::QuickSave),
        KeyCode::Char('v') => host.open_menu(MenuCommand::Save),
        KeyCode::Char('l') => host.open_menu(MenuCommand::Load),
        KeyCode::Char('x') => host.open_menu(MenuCommand::Delete),
        KeyCode::Char('e') => host.open_menu(MenuCommand::Export),
        KeyCode::Char('a') => host.open_menu(MenuCommand::Stats),
        KeyCode::Char('j') => host.open_menu(MenuCommand::Quests),
        KeyCode::Char('p') => host.open_menu(MenuCommand::Preferences),
        _ => {}
    }
    true
}

fn render(frame: &mut Frame, host: &DialogHost<FileBackend>, demo: &Rc<RefCell<DemoEngine>>) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Min(3), Constraint::Length(WORLD_HELP.len() as u16 + 2)])
        .split(frame.area());

    let engine = demo.borrow();
    let title = format!(" Aldon's Crossing  Gold: {} ", engine.gold());
    let log_block = Block::default()
        .title(title)
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Rgb(44, 0, 139)));
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let messages = engine.messages();
    let lines: Vec<Line> = messages[messages.len().saturating_sub(visible)..]
        .iter()
        .map(|m| Line::from(m.as_str()))
        .collect();
    frame.render_widget(Paragraph::new(lines).block(log_block), chunks[0]);

    let help: Vec<Line> = WORLD_HELP
        .iter()
        .map(|h| Line::styled(*h, Style::default().fg(Color::DarkGray)))
        .collect();
    frame.render_widget(
        Paragraph::new(help).block(Block::default().borders(Borders::ALL)),
        chunks[1],
    );
    drop(engine);

    host.render(frame);
}
