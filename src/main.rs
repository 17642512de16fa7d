mod app;
mod config;
mod event;
mod session;
mod source;
mod store;
mod text;
mod ui;

use std::io;
use std::time::Duration;

use anyhow::Result;
use clap::Parser;
use crossterm::event::{KeyCode, KeyEvent, KeyEventKind, KeyModifiers};
use crossterm::execute;
use crossterm::terminal::{
    EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode,
};
use ratatui::Frame;
use ratatui::Terminal;
use ratatui::backend::CrosstermBackend;
use ratatui::style::Style;
use ratatui::text::{Line, Span};
use ratatui::widgets::{Block, Paragraph};

use app::{App, AppScreen};
use config::Config;
use event::{AppEvent, EventHandler};
use session::Phase;
use source::github::GitHubSource;
use store::best::{JsonRecordStore, MemoryRecordStore, RecordStore};
use ui::components::file_picker::FilePicker;
use ui::components::progress_bar::ProgressBar;
use ui::components::result_panel::ResultPanel;
use ui::components::stats_sidebar::StatsSidebar;
use ui::components::typing_area::TypingArea;
use ui::format_countdown;
use ui::layout::AppLayout;

#[derive(Parser)]
#[command(
    name = "labtype",
    version,
    about = "Terminal typing trainer fed by source files from a GitHub repository"
)]
struct Cli {
    #[arg(short, long, help = "Repository owner")]
    owner: Option<String>,

    #[arg(short, long, help = "Repository name")]
    repo: Option<String>,

    #[arg(short, long, help = "Branch to read from")]
    branch: Option<String>,

    #[arg(short, long, help = "File extension to practice, e.g. .cpp")]
    extension: Option<String>,

    #[arg(short, long, help = "Countdown duration in seconds")]
    duration: Option<u32>,

    #[arg(short, long, help = "Theme name")]
    theme: Option<String>,

    #[arg(long, help = "Keep // comments in fetched files")]
    keep_comments: bool,
}

fn main() -> Result<()> {
    let cli = Cli::parse();

    let mut config = Config::load().unwrap_or_default();
    if let Some(owner) = cli.owner {
        config.repo_owner = owner;
    }
    if let Some(repo) = cli.repo {
        config.repo_name = repo;
    }
    if let Some(branch) = cli.branch {
        config.repo_branch = branch;
    }
    if let Some(extension) = cli.extension {
        config.file_extension = extension;
    }
    if let Some(duration) = cli.duration {
        config.countdown_secs = duration;
    }
    if let Some(theme) = cli.theme {
        config.theme = theme;
    }
    if cli.keep_comments {
        config.strip_comments = false;
    }
    config.validate();

    let source = Box::new(GitHubSource::new(
        &config.repo_owner,
        &config.repo_name,
        &config.repo_branch,
        &config.file_extension,
        config.strip_comments,
    ));
    let store: Box<dyn RecordStore> = match JsonRecordStore::new() {
        Ok(store) => Box::new(store),
        // No usable data dir: records live for this run only.
        Err(_) => Box::new(MemoryRecordStore::new()),
    };

    let mut app = App::new(config, source, store);

    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;

    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(Duration::from_millis(100));

    let result = run_app(&mut terminal, &mut app, &events);

    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = result {
        eprintln!("Error: {err:?}");
    }

    Ok(())
}

fn run_app(
    terminal: &mut Terminal<CrosstermBackend<io::Stdout>>,
    app: &mut App,
    events: &EventHandler,
) -> Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            AppEvent::Key(key) => handle_key(app, key),
            AppEvent::Tick => app.tick(),
        }

        if app.should_quit {
            return Ok(());
        }
    }
}

fn handle_key(app: &mut App, key: KeyEvent) {
    if key.kind != KeyEventKind::Press {
        return;
    }

    if key.modifiers.contains(KeyModifiers::CONTROL) && key.code == KeyCode::Char('c') {
        app.should_quit = true;
        return;
    }

    match app.screen {
        AppScreen::Picker => handle_picker_key(app, key),
        AppScreen::Typing => handle_typing_key(app, key),
        AppScreen::Result => handle_result_key(app, key),
    }
}

fn handle_picker_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('q') | KeyCode::Esc => app.should_quit = true,
        KeyCode::Up | KeyCode::Char('k') => app.picker_up(),
        KeyCode::Down | KeyCode::Char('j') => app.picker_down(),
        KeyCode::Enter => app.select_current(),
        KeyCode::Char('r') => app.select_random(),
        KeyCode::Char('g') => app.refresh_candidates(),
        KeyCode::Char('t') => app.cycle_countdown(),
        _ => {}
    }
}

fn handle_typing_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Esc => {
            // Esc ends a running attempt; from a fresh session it abandons
            // the file instead.
            if app.session.phase() == Phase::Running {
                app.finish();
            } else {
                app.back_to_picker();
            }
        }
        KeyCode::Backspace => app.backspace(),
        KeyCode::Enter => app.type_char('\n'),
        KeyCode::Tab => app.type_tab(),
        KeyCode::Char(ch) => app.type_char(ch),
        _ => {}
    }
}

fn handle_result_key(app: &mut App, key: KeyEvent) {
    match key.code {
        KeyCode::Char('r') => app.retry(),
        KeyCode::Char('q') | KeyCode::Esc => app.back_to_picker(),
        _ => {}
    }
}

fn render(frame: &mut Frame, app: &App) {
    let layout = AppLayout::new(frame.area());
    render_header(frame, app, &layout);

    match app.screen {
        AppScreen::Picker => {
            let picker = FilePicker::new(
                &app.candidates,
                app.picker_selected,
                app.picker_error.as_deref(),
                app.theme,
            );
            frame.render_widget(picker, layout.main);
            if let Some(sidebar) = layout.sidebar {
                render_picker_help(frame, app, sidebar);
            }
            render_footer_hints(
                frame,
                app,
                layout.footer,
                "\u{2191}\u{2193} select   Enter load   r random   g reload   t timer   q quit",
            );
        }
        AppScreen::Typing => {
            let projection = app.session.projection();
            let typing = TypingArea::new(&projection, "(Pick a file to begin)", app.theme);
            frame.render_widget(typing, layout.main);

            if let Some(sidebar) = layout.sidebar {
                let stats = app.session.stats();
                let widget = StatsSidebar::new(
                    &stats,
                    app.session.elapsed_secs(),
                    app.session.remaining_secs(),
                    app.theme,
                );
                frame.render_widget(widget, sidebar);
            }

            let stats = app.session.stats();
            frame.render_widget(ProgressBar::new(&stats, app.theme), layout.footer);
        }
        AppScreen::Result => {
            if let Some(ref outcome) = app.outcome {
                frame.render_widget(ResultPanel::new(outcome, app.theme), layout.main);
            }
            render_footer_hints(frame, app, layout.footer, "r retry   Esc back   q quit");
        }
    }
}

fn render_header(frame: &mut Frame, app: &App, layout: &AppLayout) {
    let colors = &app.theme.colors;

    let left = match app.session.identifier() {
        Some(id) => format!(
            " {id}  ({} chars, {} lines)",
            app.session.reference().len(),
            app.session.line_count()
        ),
        None => format!(
            " labtype  {}/{} @ {}",
            app.config.repo_owner, app.config.repo_name, app.config.repo_branch
        ),
    };

    let right = format!(
        "{} {} ",
        format_countdown(app.session.remaining_secs()),
        if app.session.phase() == Phase::Running {
            "\u{23f5}"
        } else {
            "\u{23f8}"
        }
    );

    let width = layout.header.width as usize;
    let pad = width.saturating_sub(left.chars().count() + right.chars().count());
    let line = Line::from(vec![
        Span::styled(left, Style::default().fg(colors.header_fg())),
        Span::raw(" ".repeat(pad)),
        Span::styled(right, Style::default().fg(colors.accent())),
    ]);

    let block = Block::bordered().border_style(Style::default().fg(colors.border()));
    frame.render_widget(
        Paragraph::new(line)
            .block(block)
            .style(Style::default().bg(colors.header_bg())),
        layout.header,
    );
}

fn render_picker_help(frame: &mut Frame, app: &App, area: ratatui::layout::Rect) {
    let colors = &app.theme.colors;
    let lines = vec![
        Line::from(Span::styled(
            format!("Countdown: {}", format_countdown(app.config.countdown_secs as f64)),
            Style::default().fg(colors.accent()),
        )),
        Line::from(""),
        Line::from(Span::styled(
            "Typing starts the clock.",
            Style::default().fg(colors.fg()),
        )),
        Line::from(Span::styled(
            "Esc ends a running attempt.",
            Style::default().fg(colors.fg()),
        )),
    ];
    let block = Block::bordered()
        .title(" Session ")
        .border_style(Style::default().fg(colors.border()));
    frame.render_widget(Paragraph::new(lines).block(block), area);
}

fn render_footer_hints(frame: &mut Frame, app: &App, area: ratatui::layout::Rect, hints: &str) {
    let colors = &app.theme.colors;
    let block = Block::bordered().border_style(Style::default().fg(colors.border()));
    frame.render_widget(
        Paragraph::new(Line::from(Span::styled(
            format!("  {hints}"),
            Style::default().fg(colors.text_pending()),
        )))
        .block(block),
        area,
    );
}
