use anyhow::Result;
use chrono::Utc;
use crossterm::{
    event::{self, Event, KeyCode, KeyModifiers},
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use jarstack::format::{format_money, format_percent, short_date, to_fixed};
use jarstack::report::{export_full_report, export_jar_report, ReportSummary};
use jarstack::Jar;
use ratatui::{
    backend::CrosstermBackend,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Cell, Gauge, Paragraph, Row, Table, TableState},
    Frame, Terminal,
};
use std::io;
use std::path::PathBuf;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Page {
    Jars,
    Summary,
}

impl Page {
    pub fn next(&self) -> Self {
        match self {
            Page::Jars => Page::Summary,
            Page::Summary => Page::Jars,
        }
    }

    pub fn title(&self) -> &str {
        match self {
            Page::Jars => "Jars",
            Page::Summary => "Summary",
        }
    }
}

pub struct App {
    pub jars: Vec<Jar>,
    pub state: TableState,
    pub current_page: Page,
    pub show_detail: bool,
    pub output_dir: PathBuf,
    /// Last export result or error, shown in the status bar
    pub status: Option<String>,
}

impl App {
    pub fn new(jars: Vec<Jar>, output_dir: PathBuf) -> Self {
        let mut state = TableState::default();
        if !jars.is_empty() {
            state.select(Some(0));
        }

        Self {
            jars,
            state,
            current_page: Page::Jars,
            show_detail: false,
            output_dir,
            status: None,
        }
    }

    pub fn toggle_detail(&mut self) {
        self.show_detail = !self.show_detail;
    }

    pub fn selected_jar(&self) -> Option<&Jar> {
        self.state.selected().and_then(|i| self.jars.get(i))
    }

    pub fn next(&mut self) {
        if self.jars.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(i) if i + 1 < self.jars.len() => i + 1,
            Some(_) => 0,
            None => 0,
        };
        self.state.select(Some(i));
    }

    pub fn previous(&mut self) {
        if self.jars.is_empty() {
            return;
        }
        let i = match self.state.selected() {
            Some(0) | None => self.jars.len() - 1,
            Some(i) => i - 1,
        };
        self.state.select(Some(i));
    }

    /// Export the selected jar's report into the output directory.
    pub fn export_selected(&mut self) {
        let Some(jar) = self.selected_jar().cloned() else {
            self.status = Some("No jar selected".to_string());
            return;
        };

        self.status = Some(
            match export_jar_report(&jar, &Utc::now()).and_then(|r| r.save_to(&self.output_dir)) {
                Ok(path) => format!("Saved {}", path.display()),
                Err(e) => format!("Export failed: {}", e),
            },
        );
    }

    pub fn export_all(&mut self) {
        self.status = Some(
            match export_full_report(&self.jars, &Utc::now()).and_then(|r| r.save_to(&self.output_dir)) {
                Ok(path) => format!("Saved {}", path.display()),
                Err(e) => format!("Export failed: {}", e),
            },
        );
    }
}

pub fn run_ui(app: &mut App) -> Result<()> {
    // Setup terminal
    enable_raw_mode()?;
    let mut stdout = io::stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    // Run the app
    let res = run_app(&mut terminal, app);

    // Restore terminal
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    if let Err(err) = res {
        println!("Error: {:?}", err);
    }

    Ok(())
}

fn run_app<B: ratatui::backend::Backend>(
    terminal: &mut Terminal<B>,
    app: &mut App,
) -> io::Result<()> {
    loop {
        terminal.draw(|f| ui(f, app))?;

        if let Event::Key(key) = event::read()? {
            match key.code {
                KeyCode::Char('q') | KeyCode::Esc => return Ok(()),
                KeyCode::Enter => app.toggle_detail(),
                KeyCode::Tab => app.current_page = app.current_page.next(),
                KeyCode::Char('E') => app.export_all(),
                KeyCode::Char('e') if key.modifiers.contains(KeyModifiers::SHIFT) => app.export_all(),
                KeyCode::Char('e') => app.export_selected(),
                KeyCode::Down | KeyCode::Char('j') => app.next(),
                KeyCode::Up | KeyCode::Char('k') => app.previous(),
                KeyCode::Home => {
                    if !app.jars.is_empty() {
                        app.state.select(Some(0));
                    }
                }
                KeyCode::End => {
                    if !app.jars.is_empty() {
                        app.state.select(Some(app.jars.len() - 1));
                    }
                }
                _ => {}
            }
        }
    }
}

fn ui(f: &mut Frame, app: &mut App) {
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(3), // Header
            Constraint::Min(0),    // Content area
            Constraint::Length(3), // Status bar
        ])
        .split(f.size());

    render_header(f, chunks[0], app);

    match app.current_page {
        Page::Jars if app.show_detail => {
            let content_chunks = Layout::default()
                .direction(Direction::Horizontal)
                .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
                .split(chunks[1]);

            render_table(f, content_chunks[0], app);
            render_detail_panel(f, content_chunks[1], app);
        }
        Page::Jars => render_table(f, chunks[1], app),
        Page::Summary => render_summary(f, chunks[1], app),
    }

    render_status_bar(f, chunks[2], app);
}

fn render_header(f: &mut Frame, area: Rect, app: &App) {
    let mut spans = vec![];
    for (i, page) in [Page::Jars, Page::Summary].iter().enumerate() {
        if i > 0 {
            spans.push(Span::raw(" │ "));
        }
        let style = if *page == app.current_page {
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::UNDERLINED)
        } else {
            Style::default().fg(Color::DarkGray)
        };
        spans.push(Span::styled(page.title().to_string(), style));
    }

    let summary = ReportSummary::from_jars(&app.jars);
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Jars: {}", summary.jar_count),
        Style::default().fg(Color::White),
    ));
    spans.push(Span::raw("  |  "));
    spans.push(Span::styled(
        format!("Overall: {}%", summary.progress_text()),
        Style::default().fg(Color::Green),
    ));

    let header = Paragraph::new(vec![Line::from(spans)])
        .block(Block::default().borders(Borders::ALL).border_style(Style::default().fg(Color::Cyan)));

    f.render_widget(header, area);
}

fn render_table(f: &mut Frame, area: Rect, app: &mut App) {
    let header_cells = ["Name", "Progress", "Saved", "Target", "Withdrawn", "Streak"]
        .iter()
        .map(|h| {
            Cell::from(*h).style(
                Style::default()
                    .fg(Color::Yellow)
                    .add_modifier(Modifier::BOLD),
            )
        });

    let header = Row::new(header_cells)
        .style(Style::default().bg(Color::DarkGray))
        .height(1);

    let rows = app.jars.iter().map(|jar| {
        let currency = jar.currency_symbol();
        let color = if jar.is_complete() { Color::Green } else { Color::White };

        let cells = vec![
            Cell::from(truncate(&jar.name, 28)),
            Cell::from(format!("{}%", format_percent(jar.progress_percent()))).style(Style::default().fg(color)),
            Cell::from(format_money(currency, jar.saved)),
            Cell::from(format_money(currency, jar.target)),
            Cell::from(format_money(currency, jar.withdrawn)).style(Style::default().fg(Color::Red)),
            Cell::from(jar.streak.to_string()),
        ];

        Row::new(cells).height(1)
    });

    let table = Table::new(
        rows,
        [
            Constraint::Length(30),
            Constraint::Length(10),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(14),
            Constraint::Length(8),
        ],
    )
    .header(header)
    .block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Jars "),
    )
    .highlight_style(
        Style::default()
            .bg(Color::DarkGray)
            .add_modifier(Modifier::BOLD),
    )
    .highlight_symbol("→ ");

    f.render_stateful_widget(table, area, &mut app.state);
}

fn render_detail_panel(f: &mut Frame, area: Rect, app: &App) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::Yellow))
        .title(" Jar Details ");

    let Some(jar) = app.selected_jar() else {
        f.render_widget(Paragraph::new("No jar selected").block(block), area);
        return;
    };

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Length(3), Constraint::Min(0)])
        .split(area);

    let progress = jar.progress_percent();
    let ratio = if progress.is_finite() { (progress / 100.0).clamp(0.0, 1.0) } else { 0.0 };
    let gauge = Gauge::default()
        .block(Block::default().borders(Borders::ALL).title(format!(" {} ", jar.name)))
        .gauge_style(Style::default().fg(Color::Green))
        .ratio(ratio)
        .label(format!("{}%", format_percent(progress)));
    f.render_widget(gauge, chunks[0]);

    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let heading = Style::default()
        .fg(Color::Yellow)
        .add_modifier(Modifier::BOLD | Modifier::UNDERLINED);
    let currency = jar.currency_symbol();
    let plan = jar.contribution_plan();

    let mut content = vec![
        Line::from(""),
        Line::from(Span::styled("  INVESTMENT PLAN", heading)),
        Line::from(vec![
            Span::styled("  Daily: ", label),
            Span::raw(format!("{}{}", currency, to_fixed(plan.daily, 2))),
        ]),
        Line::from(vec![
            Span::styled("  Weekly: ", label),
            Span::raw(format!("{}{}", currency, to_fixed(plan.weekly, 2))),
        ]),
        Line::from(vec![
            Span::styled("  Monthly: ", label),
            Span::raw(format!("{}{}", currency, to_fixed(plan.monthly, 2))),
        ]),
        Line::from(""),
    ];

    if !jar.notes().is_empty() {
        content.push(Line::from(Span::styled("  NOTES", heading)));
        for note in jar.notes() {
            content.push(Line::from(format!("  • {}", note.text)));
        }
        content.push(Line::from(""));
    }

    if !jar.records().is_empty() {
        content.push(Line::from(Span::styled("  RECORDS", heading)));
        for record in jar.records() {
            let color = match record.kind {
                jarstack::RecordKind::Saved => Color::Green,
                jarstack::RecordKind::Withdrawn => Color::Red,
            };
            content.push(Line::from(vec![
                Span::raw(format!("  {}  ", short_date(&record.date))),
                Span::styled(
                    format!("{}{}", record.kind.sign(), format_money(currency, record.amount)),
                    Style::default().fg(color),
                ),
            ]));
        }
    }

    f.render_widget(Paragraph::new(content).block(block), chunks[1]);
}

fn render_summary(f: &mut Frame, area: Rect, app: &App) {
    let summary = ReportSummary::from_jars(&app.jars);
    let label = Style::default().fg(Color::Cyan).add_modifier(Modifier::BOLD);
    let completed = app.jars.iter().filter(|jar| jar.is_complete()).count();
    let best_streak = app.jars.iter().map(|jar| jar.streak).max().unwrap_or(0);

    let content = vec![
        Line::from(""),
        Line::from(vec![Span::styled("  Total Jars: ", label), Span::raw(summary.jar_count.to_string())]),
        Line::from(vec![
            Span::styled("  Total Saved: ", label),
            Span::raw(format_money("$", summary.total_saved)),
        ]),
        Line::from(vec![
            Span::styled("  Total Target: ", label),
            Span::raw(format_money("$", summary.total_target)),
        ]),
        Line::from(vec![
            Span::styled("  Overall Progress: ", label),
            Span::raw(format!("{}%", summary.progress_text())),
        ]),
        Line::from(vec![Span::styled("  Completed: ", label), Span::raw(completed.to_string())]),
        Line::from(vec![Span::styled("  Best Streak: ", label), Span::raw(best_streak.to_string())]),
    ];

    let paragraph = Paragraph::new(content).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White))
            .title(" Summary "),
    );

    f.render_widget(paragraph, area);
}

fn render_status_bar(f: &mut Frame, area: Rect, app: &App) {
    let selected = app.state.selected().map(|i| i + 1).unwrap_or(0);

    let mut spans = vec![Span::styled(
        format!(" Jar: {}/{} ", selected, app.jars.len()),
        Style::default().fg(Color::Cyan),
    )];

    if let Some(status) = &app.status {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(status.clone(), Style::default().fg(Color::Green)));
    }

    for (key, action) in [("Enter", "Details"), ("Tab", "Page"), ("e", "Export jar"), ("E", "Export all")] {
        spans.push(Span::raw(" | "));
        spans.push(Span::styled(key, Style::default().fg(Color::Yellow)));
        spans.push(Span::raw(format!(" {}", action)));
    }
    spans.push(Span::raw(" | "));
    spans.push(Span::styled("q", Style::default().fg(Color::Red)));
    spans.push(Span::raw(" Quit"));

    let status_bar = Paragraph::new(vec![Line::from(spans)]).block(
        Block::default()
            .borders(Borders::ALL)
            .border_style(Style::default().fg(Color::White)),
    );

    f.render_widget(status_bar, area);
}

fn truncate(s: &str, max_len: usize) -> String {
    if s.chars().count() <= max_len {
        s.to_string()
    } else {
        let head: String = s.chars().take(max_len - 3).collect();
        format!("{}...", head)
    }
}
