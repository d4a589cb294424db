use anyhow::Result;
use crossterm::{
    event::{self, Event, KeyCode, KeyEvent, KeyEventKind, KeyModifiers},
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Frame, Terminal,
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout},
    style::{Color, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph},
};
use std::{
    env,
    fs::OpenOptions,
    io::{Stdout, stdout},
    path::{Path, PathBuf},
    process,
};
use tabgrid_config::Config;
use tabgrid_engine::{
    Action, DisplayLine, LayoutError, LayoutParameters, Outcome, Session, io, parse_layout_value,
};

/// Amount the line width changes per keypress
const LINE_WIDTH_STEP: i64 = 4;

const USAGE: &str = "[--print] [--spacing N] [--width N] [state-file]";

/// Command-line options
#[derive(Debug, Default, PartialEq, Eq)]
struct Options {
    print_only: bool,
    column_spacing: Option<i64>,
    line_width: Option<i64>,
    state_path: Option<PathBuf>,
}

#[derive(Debug, thiserror::Error, PartialEq, Eq)]
enum ArgsError {
    #[error("{0} needs a value")]
    MissingValue(String),
    #[error("Unexpected argument {0:?}")]
    Unexpected(String),
    #[error(transparent)]
    Layout(#[from] LayoutError),
}

fn parse_args<I: IntoIterator<Item = String>>(args: I) -> Result<Options, ArgsError> {
    let mut options = Options::default();
    let mut args = args.into_iter();
    while let Some(arg) = args.next() {
        match arg.as_str() {
            "--print" => options.print_only = true,
            "--spacing" | "--width" => {
                let value = args
                    .next()
                    .ok_or_else(|| ArgsError::MissingValue(arg.clone()))?;
                let value = parse_layout_value(&value)?;
                if arg == "--spacing" {
                    options.column_spacing = Some(value);
                } else {
                    options.line_width = Some(value);
                }
            }
            _ if options.state_path.is_none() && !arg.starts_with("--") => {
                options.state_path = Some(PathBuf::from(arg));
            }
            _ => return Err(ArgsError::Unexpected(arg)),
        }
    }
    Ok(options)
}

/// What a keypress asks the app to do
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Command {
    Edit(Action),
    Copy,
    Quit,
}

struct App {
    session: Session,
    state_path: PathBuf,
    export_path: PathBuf,
    status: String,
}

impl App {
    fn new(session: Session, state_path: PathBuf, export_path: PathBuf) -> Self {
        Self {
            session,
            state_path,
            export_path,
            status: String::new(),
        }
    }

    /// Run one command; returns false when the app should exit
    fn handle(&mut self, command: Command) -> bool {
        match command {
            Command::Quit => return false,
            Command::Copy => self.copy_to_export(),
            Command::Edit(action) => match self.session.apply(action) {
                Outcome::Changed => {
                    self.status.clear();
                    self.save();
                }
                Outcome::Unchanged => {}
                Outcome::Rejected(e) => self.status = e.to_string(),
            },
        }
        true
    }

    fn save(&mut self) {
        if let Err(e) = io::save_session(&self.state_path, &self.session) {
            log::error!("Failed to save state to {}: {e}", self.state_path.display());
            self.status = format!("Save failed: {e}");
        }
    }

    fn copy_to_export(&mut self) {
        let text = self.session.formatted_text();
        match io::export_text(&self.export_path, &text) {
            Ok(()) => {
                log::info!("Exported tab to {}", self.export_path.display());
                self.status = format!("Copied to {}", self.export_path.display());
            }
            Err(e) => {
                log::error!("Export failed: {e}");
                self.status = format!("Copy failed: {e}");
            }
        }
    }
}

/// Map a key to a command; keys with Ctrl/Alt held are left alone
fn command_for_key(key: KeyEvent, params: &LayoutParameters) -> Option<Command> {
    if key.modifiers.intersects(KeyModifiers::CONTROL | KeyModifiers::ALT) {
        return None;
    }

    let spacing = params.column_spacing() as i64;
    let width = params.line_width() as i64;

    let command = match key.code {
        KeyCode::Right => Command::Edit(Action::MoveRight),
        KeyCode::Left => Command::Edit(Action::MoveLeft),
        KeyCode::Up => Command::Edit(Action::MoveUp),
        KeyCode::Down => Command::Edit(Action::MoveDown),
        KeyCode::Char(' ') => Command::Edit(Action::Space),
        KeyCode::Backspace => Command::Edit(Action::DeleteNote),
        KeyCode::Char(c) if c.is_ascii_digit() => Command::Edit(Action::digit(c)?),
        KeyCode::Char('C') => Command::Edit(Action::ClearAll),
        KeyCode::Char('[') => Command::Edit(Action::SetColumnSpacing(spacing - 1)),
        KeyCode::Char(']') => Command::Edit(Action::SetColumnSpacing(spacing + 1)),
        KeyCode::Char('-') => Command::Edit(Action::SetLineWidth(width - LINE_WIDTH_STEP)),
        KeyCode::Char('=') => Command::Edit(Action::SetLineWidth(width + LINE_WIDTH_STEP)),
        KeyCode::Char('y') => Command::Copy,
        KeyCode::Char('q') | KeyCode::Esc => Command::Quit,
        _ => return None,
    };
    Some(command)
}

fn main() -> Result<()> {
    let mut args = env::args();
    let program = args.next().unwrap_or_else(|| "tabgrid-cli".to_string());
    let options = match parse_args(args) {
        Ok(options) => options,
        Err(e) => {
            eprintln!("Error: {e}");
            eprintln!("Usage: {program} {USAGE}");
            process::exit(1);
        }
    };

    let config = match Config::load_or_default() {
        Ok(config) => config,
        Err(e) => {
            eprintln!("Error: Failed to load config file: {e}");
            eprintln!("Fix or remove {}", Config::config_path().display());
            process::exit(1);
        }
    };

    let state_path = options
        .state_path
        .clone()
        .unwrap_or_else(|| config.state_path.clone());

    // The TUI owns the terminal, so interactive runs log to a file
    if options.print_only {
        init_logging(None);
    } else {
        init_logging(Some(&state_path.with_extension("log")));
    }
    log::info!("tabgrid starting with state file {}", state_path.display());

    let defaults = LayoutParameters::new(config.column_spacing, config.line_width)
        .unwrap_or_else(|e| {
            log::warn!("Ignoring layout settings from config: {e}");
            LayoutParameters::default()
        });
    let mut session = io::load_session(&state_path, defaults);

    if let Err(e) = apply_overrides(&mut session, &options) {
        eprintln!("Error: {e}");
        process::exit(1);
    }

    if options.print_only {
        println!("{}", session.formatted_text());
        return Ok(());
    }

    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let mut app = App::new(session, state_path, config.export_path);

    // Main loop
    let res = run_app(&mut terminal, &mut app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("{err:?}");
    }

    Ok(())
}

/// Apply `--spacing`/`--width` on top of the restored session
fn apply_overrides(session: &mut Session, options: &Options) -> Result<(), LayoutError> {
    let actions = [
        options.column_spacing.map(Action::SetColumnSpacing),
        options.line_width.map(Action::SetLineWidth),
    ];
    for action in actions.into_iter().flatten() {
        if let Outcome::Rejected(e) = session.apply(action) {
            return Err(e);
        }
    }
    Ok(())
}

fn init_logging(log_path: Option<&Path>) {
    let mut builder =
        env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("warn"));

    if let Some(path) = log_path {
        if let Some(parent) = path.parent() {
            let _ = std::fs::create_dir_all(parent);
        }
        match OpenOptions::new().create(true).append(true).open(path) {
            Ok(file) => {
                builder.target(env_logger::Target::Pipe(Box::new(file)));
            }
            Err(e) => eprintln!("Warning: cannot open log file {}: {e}", path.display()),
        }
    }

    builder.init();
}

fn run_app(terminal: &mut Terminal<CrosstermBackend<Stdout>>, app: &mut App) -> Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()?
            && key.kind == KeyEventKind::Press
            && let Some(command) = command_for_key(key, app.session.params())
            && !app.handle(command)
        {
            return Ok(());
        }
    }
}

fn tab_line(line: &DisplayLine) -> Line<'static> {
    let (before, cursor, after) = line.split();
    if cursor.is_empty() {
        return Line::from(before.to_string());
    }
    Line::from(vec![
        Span::raw(before.to_string()),
        Span::styled(
            cursor.to_string(),
            Style::default().bg(Color::Yellow).fg(Color::Black),
        ),
        Span::raw(after.to_string()),
    ])
}

fn ui(f: &mut Frame, app: &App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .margin(1)
        .constraints([
            Constraint::Min(8),
            Constraint::Length(1),
            Constraint::Length(1),
        ])
        .split(f.area());

    let lines = app.session.render();
    let highlight_line = app.session.highlight().map(|h| h.line_index).unwrap_or(0);

    // Keep the cursor line in view, leaving room for the block borders
    let visible = chunks[0].height.saturating_sub(2) as usize;
    let scroll = (highlight_line + 1).saturating_sub(visible);

    let params = app.session.params();
    let title = format!(
        "Tab (spacing {}, width {})",
        params.column_spacing(),
        params.line_width()
    );
    let tab = Paragraph::new(lines.iter().map(tab_line).collect::<Vec<_>>())
        .block(Block::default().borders(Borders::ALL).title(title))
        .scroll((u16::try_from(scroll).unwrap_or(u16::MAX), 0));
    f.render_widget(tab, chunks[0]);

    let cursor = app.session.cursor();
    let status = Line::from(vec![
        Span::raw(format!(
            "Column {} / String {} ",
            cursor.column + 1,
            cursor.string + 1
        )),
        Span::styled(app.status.clone(), Style::default().fg(Color::Yellow)),
    ]);
    f.render_widget(Paragraph::new(status), chunks[1]);

    let help_text = Line::from(vec![
        Span::raw("q: Quit | "),
        Span::raw("←↑↓→: Move | "),
        Span::raw("0-9: Fret | "),
        Span::raw("Space: Next string | "),
        Span::raw("Bksp: Delete | "),
        Span::raw("[ ]: Spacing | "),
        Span::raw("- =: Width | "),
        Span::raw("y: Copy | "),
        Span::raw("C: Clear"),
    ]);
    f.render_widget(Paragraph::new(help_text), chunks[2]);
}
