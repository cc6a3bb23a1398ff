//! Terminal setup, main loop and rendering of the preflight screen.

use super::app::PreflightApp;
use super::events::{handle_key_event, Event, EventHandler};
use super::theme::{colors, footer_hints, render_footer_hints, set_theme, Styles, Theme};
use crate::config::TuiConfig;
use crate::model::{PreflightCheck, PreflightMode};
use crossterm::{
    execute,
    terminal::{disable_raw_mode, enable_raw_mode, EnterAlternateScreen, LeaveAlternateScreen},
};
use ratatui::{
    prelude::*,
    widgets::{Block, Borders, Paragraph, Wrap},
};
use std::io::{self, stdout};

/// Run the TUI application
pub fn run_tui(app: &mut PreflightApp, config: &TuiConfig) -> io::Result<()> {
    set_theme(Theme::from_name(&config.theme));

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let events = EventHandler::new(config.tick_rate_ms);
    let result = event_loop(&mut terminal, app, &events);

    // Restore the terminal even when the loop failed
    disable_raw_mode()?;
    execute!(terminal.backend_mut(), LeaveAlternateScreen)?;
    terminal.show_cursor()?;

    result
}

fn event_loop<B: Backend>(
    terminal: &mut Terminal<B>,
    app: &mut PreflightApp,
    events: &EventHandler,
) -> io::Result<()> {
    loop {
        terminal.draw(|frame| render(frame, app))?;

        match events.next()? {
            Event::Key(key) => handle_key_event(app, key),
            Event::Resize(_, _) => {}
            Event::Tick => app.on_tick(),
        }

        if app.should_quit() {
            return Ok(());
        }
    }
}

/// Main render function
pub fn render(frame: &mut Frame, app: &PreflightApp) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Length(2), // Header
            Constraint::Min(6),    // Content
            Constraint::Length(1), // Status bar
            Constraint::Length(1), // Footer
        ])
        .split(area);

    render_header(frame, chunks[0], app);

    let content = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(50), Constraint::Percentage(50)])
        .split(chunks[1]);
    render_checks(frame, content[0], app);
    render_instance(frame, content[1], app);

    render_status_bar(frame, chunks[2], app);
    render_footer(frame, chunks[3]);

    if app.show_tooltip {
        let tooltip = app.checks_tooltip();
        let anchor = tooltip.anchored_area(chunks[1]);
        frame.render_widget(&tooltip, anchor);
    }
}

fn render_header(frame: &mut Frame, area: Rect, app: &PreflightApp) {
    let controller = app.controller();
    let mode = controller
        .preflight_mode()
        .map_or("not selected", PreflightMode::label);
    let lines = vec![
        Line::from(vec![
            Span::styled("Preflight check", Styles::header_title()),
            Span::styled(format!("  {}", controller.route()), Styles::text_muted()),
        ]),
        Line::from(vec![
            Span::styled("Mode: ", Styles::label()),
            Span::styled(mode, Styles::highlight()),
        ]),
    ];
    frame.render_widget(Paragraph::new(lines), area);
}

fn check_line(check: &PreflightCheck) -> Line<'static> {
    let (symbol, style) = if check.passed {
        ("✓", Styles::success())
    } else {
        ("✗", Styles::error())
    };
    let mut spans = vec![
        Span::styled(format!("{symbol} "), style),
        Span::styled(check.label, Styles::text()),
    ];
    if let Some(caption) = &check.caption {
        spans.push(Span::styled(format!("  {caption}"), Styles::text_muted()));
    }
    Line::from(spans)
}

fn render_checks(frame: &mut Frame, area: Rect, app: &PreflightApp) {
    let checks = app.controller().checks();
    let lines: Vec<Line> = if checks.is_empty() {
        vec![Line::styled("Waiting for preflight status…", Styles::text_muted())]
    } else {
        checks.iter().map(check_line).collect()
    };

    let panel = Paragraph::new(lines).block(
        Block::default()
            .title(" Services ")
            .borders(Borders::ALL)
            .border_style(Styles::border()),
    );
    frame.render_widget(panel, area);
}

fn flag_line(label: &str, ok: bool, detail: &str) -> Line<'static> {
    let style = if ok { Styles::success() } else { Styles::warning() };
    Line::from(vec![
        Span::styled(format!("{label}: "), Styles::label()),
        Span::styled(detail.to_string(), style),
    ])
}

fn render_instance(frame: &mut Frame, area: Rect, app: &PreflightApp) {
    let controller = app.controller();
    let mut lines = Vec::new();

    if let Some(realm) = controller.realm() {
        lines.push(Line::from(vec![
            Span::styled("Realm: ", Styles::label()),
            Span::styled(realm.to_string(), Styles::value()),
        ]));
    }
    for option in controller.config_options() {
        lines.push(Line::from(vec![
            Span::styled(format!("{}: ", option.metric), Styles::label()),
            Span::styled(option.value.to_string(), Styles::value()),
        ]));
    }
    if controller.preflight().is_some() {
        let misconfigured = controller.site_url_misconfigured();
        lines.push(flag_line(
            "Site URL",
            !misconfigured,
            if misconfigured {
                "does not match this origin"
            } else {
                "matches this origin"
            },
        ));
        lines.push(flag_line(
            "Social login",
            controller.social_auth_available(),
            if controller.social_auth_available() {
                "available"
            } else {
                "not configured"
            },
        ));
        lines.push(flag_line(
            "New organizations",
            controller.organization_creation_allowed(),
            if controller.organization_creation_allowed() {
                "allowed"
            } else {
                "locked on this instance"
            },
        ));
    }

    let panel = Paragraph::new(lines)
        .wrap(Wrap { trim: true })
        .block(
            Block::default()
                .title(" Instance ")
                .borders(Borders::ALL)
                .border_style(Styles::border()),
        );
    frame.render_widget(panel, area);
}

fn render_status_bar(frame: &mut Frame, area: Rect, app: &PreflightApp) {
    let line = match app.status.peek() {
        Some((message, super::status::StatusLevel::Error)) => {
            Line::styled(message.to_string(), Styles::error())
        }
        Some((message, super::status::StatusLevel::Info)) => {
            Line::styled(message.to_string(), Styles::text())
        }
        None => app.controller().loaded_at().map_or_else(
            || Line::styled("Not loaded", Styles::text_muted()),
            |at| {
                Line::styled(
                    format!("Loaded {}", at.format("%H:%M:%S")),
                    Styles::text_muted(),
                )
            },
        ),
    };
    frame.render_widget(Paragraph::new(line).style(Styles::status_bar()), area);
}

fn render_footer(frame: &mut Frame, area: Rect) {
    let spans = render_footer_hints(&footer_hints());
    frame.render_widget(
        Paragraph::new(Line::from(spans)).style(Style::default().fg(colors().text_muted)),
        area,
    );
}
