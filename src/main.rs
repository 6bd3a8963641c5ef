mod app;
mod ui;

use std::fs::File;
use std::sync::Mutex;
use std::time::{Duration, Instant};

use anyhow::{Context, Result};
use app::App;
use clap::Parser;
use conflict_atlas::config::Config;
use conflict_atlas::data;
use crossterm::event::{
    self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEvent, KeyEventKind,
    MouseButton, MouseEvent, MouseEventKind,
};
use crossterm::execute;
use ratatui::DefaultTerminal;
use tracing::{info, warn};
use tracing_subscriber::EnvFilter;

fn main() -> Result<()> {
    let config = Config::parse();
    init_logging(&config)?;

    // Initialize terminal
    let mut terminal = ratatui::init();
    terminal.clear()?;

    // Enable mouse capture
    execute!(std::io::stdout(), EnableMouseCapture)?;

    // Run the app
    let result = run(&mut terminal, &config);

    // Disable mouse capture and restore terminal
    let _ = execute!(std::io::stdout(), DisableMouseCapture);
    ratatui::restore();

    result
}

/// Log to a file; the terminal belongs to the UI
fn init_logging(config: &Config) -> Result<()> {
    let file = File::create(&config.log_file)
        .with_context(|| format!("creating log file {}", config.log_file.display()))?;
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")))
        .with_writer(Mutex::new(file))
        .with_ansi(false)
        .init();
    Ok(())
}

/// Handle mouse events for panning, zooming, hover and selection
fn handle_mouse(app: &mut App, mouse: MouseEvent) {
    // Always track mouse position for cursor marker and hover
    app.set_mouse_pos(mouse.column, mouse.row);

    match mouse.kind {
        // Scroll wheel for zooming towards mouse position
        MouseEventKind::ScrollUp => app.zoom_in_at(mouse.column, mouse.row),
        MouseEventKind::ScrollDown => app.zoom_out_at(mouse.column, mouse.row),
        // Horizontal scroll for panning (trackpad two-finger swipe)
        MouseEventKind::ScrollLeft => app.pan_left(),
        MouseEventKind::ScrollRight => app.pan_right(),
        // Click selects, click and drag pans
        MouseEventKind::Down(MouseButton::Left) => {
            app.last_mouse = Some((mouse.column, mouse.row));
            app.select_at(mouse.column, mouse.row);
        }
        MouseEventKind::Drag(MouseButton::Left) => {
            app.handle_drag(mouse.column, mouse.row);
        }
        MouseEventKind::Up(MouseButton::Left) => {
            app.end_drag();
        }
        _ => {}
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    // Only handle key press events (not release)
    if key.kind != KeyEventKind::Press {
        return;
    }
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.quit(),

        // Pan with hjkl or arrow keys
        KeyCode::Left | KeyCode::Char('h') => app.pan_left(),
        KeyCode::Right | KeyCode::Char('l') => app.pan_right(),
        KeyCode::Up | KeyCode::Char('k') => app.pan_up(),
        KeyCode::Down | KeyCode::Char('j') => app.pan_down(),

        // Zoom
        KeyCode::Char('+') | KeyCode::Char('=') => app.zoom_in(),
        KeyCode::Char('-') | KeyCode::Char('_') => app.zoom_out(),

        // Layer toggles
        KeyCode::Char('m') | KeyCode::Char('M') => app.toggle_mode(),
        KeyCode::Char('e') | KeyCode::Char('E') => app.toggle_edges(),
        KeyCode::Char('a') | KeyCode::Char('A') => app.toggle_all_categories(),
        KeyCode::Char('L') => app.toggle_labels(),
        KeyCode::Char('?') => app.toggle_legend(),
        KeyCode::Char(c @ '1'..='5') => {
            if let Some(n) = c.to_digit(10) {
                app.toggle_category(n as usize);
            }
        }

        // Reset view
        KeyCode::Char('r') | KeyCode::Char('0') => app.reset_view(),

        _ => {}
    }
}

fn handle_event(app: &mut App, event: Event) {
    match event {
        Event::Key(key) => handle_key(app, key),
        Event::Mouse(mouse) => handle_mouse(app, mouse),
        Event::Resize(width, height) => app.resize(width as usize, height as usize),
        _ => {}
    }
}

fn run(terminal: &mut DefaultTerminal, config: &Config) -> Result<()> {
    let timeout = config.load_timeout();
    let dataset = data::load_dataset(&config.data_dir, config.assets.as_deref(), timeout);

    let size = terminal.size()?;
    let mut app = App::new(size.width as usize, size.height as usize, dataset, config.frame_interval());
    app.apply_intel(data::builtin_intel());

    if let Some(path) = config.intel.clone() {
        let source = path.display().to_string();
        match data::load_with_timeout("intel", timeout, move || data::load_intel(&path)) {
            Ok(feed) => {
                info!(path = %source, "intel feed loaded");
                app.apply_intel(feed);
            }
            Err(e) => {
                warn!(path = %source, error = %e, "intel feed unavailable, keeping built-in intel");
                app.notice = Some(format!("intel: {e}"));
            }
        }
    }

    if config.heatmap {
        app.toggle_mode();
    }

    // Main loop
    loop {
        app.tick(Instant::now());

        // Draw every pass so edge animations keep moving
        terminal.draw(|frame| ui::render(frame, &app))?;

        // Drain every queued event before the next scene update
        if event::poll(app.gate.timeout(Instant::now()))? {
            loop {
                handle_event(&mut app, event::read()?);
                if !event::poll(Duration::ZERO)? {
                    break;
                }
            }
        }

        if app.should_quit {
            break;
        }
    }

    Ok(())
}
