use std::io::stdout;
use std::time::{Duration, Instant};

use anyhow::Result;
use crossterm::{
    event::{
        self, DisableMouseCapture, EnableMouseCapture, Event, KeyCode, KeyEventKind, MouseEventKind,
    },
    execute,
    terminal::{EnterAlternateScreen, LeaveAlternateScreen, disable_raw_mode, enable_raw_mode},
};
use ratatui::{
    Terminal,
    backend::CrosstermBackend,
    buffer::Buffer,
    layout::Rect,
    style::{Color, Style},
    text::Line,
    widgets::{Block, Paragraph},
};
use tracing::{debug, info};
use vaulta_core::sections::{MeasuredPage, PageLayout, PinnedTimeline};
use vaulta_core::snap::{Refresh, SnapController, SnapMode};
use vaulta_core::views::scroll_track::render_scroll_track;
use vaulta_protocol::{RenderCommand, SnapCommand, SnapConfig, TextAlign, ThemeToken, Viewport};

use crate::scroll::SimulatedScroll;

/// Simulated browser viewport heights, toggled with `r`.
const VIEWPORT_HEIGHTS: [f64; 2] = [900.0, 600.0];
const LINE_STEP: f64 = 40.0;
const SETTLE_AFTER: Duration = Duration::from_millis(150);
const TRACK_ROWS: u16 = 3;

fn theme_to_color(token: &ThemeToken) -> Color {
    match token {
        ThemeToken::TrackBackground => Color::Black,
        ThemeToken::TrackBorder => Color::DarkGray,
        ThemeToken::PinnedRange => Color::Rgb(20, 110, 110),
        ThemeToken::SnapBuffer => Color::Rgb(20, 45, 45),
        ThemeToken::RangeCenter => Color::Cyan,
        ThemeToken::PositionMarker => Color::LightYellow,
        ThemeToken::TargetMarker => Color::LightMagenta,
        ThemeToken::TextPrimary => Color::White,
        ThemeToken::TextMuted => Color::DarkGray,
    }
}

/// Rasterize overlay commands into `area`, one viewport unit per cell.
fn draw_commands(buf: &mut Buffer, area: Rect, cmds: &[RenderCommand]) {
    let in_area = |x: i64, y: i64| {
        x >= 0 && y >= 0 && x < i64::from(area.width) && y < i64::from(area.height)
    };
    for cmd in cmds {
        match cmd {
            RenderCommand::DrawRect {
                rect, color, label, ..
            } => {
                let bg = theme_to_color(color);
                let x0 = rect.x.floor() as i64;
                let x1 = ((rect.x + rect.w).ceil() as i64).max(x0 + 1);
                let y0 = rect.y.floor() as i64;
                let y1 = (rect.y + rect.h).ceil() as i64;
                for y in y0..y1 {
                    for x in x0..x1 {
                        if in_area(x, y) {
                            buf[(area.x + x as u16, area.y + y as u16)]
                                .set_char(' ')
                                .set_bg(bg);
                        }
                    }
                }
                if let Some(label) = label {
                    let span = (x1 - x0 - 1).max(0) as usize;
                    for (i, ch) in label.chars().take(span).enumerate() {
                        let x = x0 + 1 + i as i64;
                        if in_area(x, y0) {
                            buf[(area.x + x as u16, area.y + y0 as u16)]
                                .set_char(ch)
                                .set_fg(Color::White);
                        }
                    }
                }
            }
            RenderCommand::DrawLine {
                from, to, color, ..
            } => {
                let x = (from.x.round() as i64).min(i64::from(area.width) - 1);
                for y in from.y.floor() as i64..to.y.ceil() as i64 {
                    if in_area(x, y) {
                        buf[(area.x + x as u16, area.y + y as u16)]
                            .set_char('│')
                            .set_fg(theme_to_color(color));
                    }
                }
            }
            RenderCommand::DrawText {
                position,
                text,
                color,
                align,
                ..
            } => {
                let len = text.chars().count() as i64;
                let start = match align {
                    TextAlign::Left => position.x.round() as i64,
                    TextAlign::Center => position.x.round() as i64 - len / 2,
                    TextAlign::Right => position.x.round() as i64 - len + 1,
                };
                let y = position.y.round() as i64;
                for (i, ch) in text.chars().enumerate() {
                    let x = start + i as i64;
                    if in_area(x, y) {
                        buf[(area.x + x as u16, area.y + y as u16)]
                            .set_char(ch)
                            .set_fg(theme_to_color(color));
                    }
                }
            }
            RenderCommand::BeginGroup { .. } | RenderCommand::EndGroup => {}
        }
    }
}

fn status_line(
    controller: &SnapController<SimulatedScroll, MeasuredPage>,
    scroll: &SimulatedScroll,
    timeline: &PinnedTimeline,
) -> String {
    let offset = scroll.offset();
    let position = scroll.position();
    let section = controller
        .registry()
        .section_at(offset)
        .map_or("-", |s| s.id.as_str());

    let mode = match controller.ranges() {
        None => "unarmed".to_owned(),
        Some(ranges) => match ranges.classify(position, controller.config().buffer) {
            SnapMode::Flowing => "flowing".to_owned(),
            SnapMode::Pinned { index } => {
                let id = ranges.section_id(index).unwrap_or("?");
                match ranges.enclosing(position) {
                    Some(i) => {
                        let phase = timeline.phase_at(position, &ranges.ranges()[i]);
                        format!("pinned → {id} ({})", phase.label())
                    }
                    None => format!("pinned → {id} (buffer)"),
                }
            }
        },
    };

    format!(
        " {offset:>7.0}px  {:>5.1}%  section: {section:<10} mode: {mode}  gen {}",
        position * 100.0,
        controller.generation()
    )
}

fn describe(command: Option<&SnapCommand>) -> String {
    match command {
        Some(c) => format!(
            " last snap → {:.1}% over {:.0}ms ({})",
            c.target * 100.0,
            c.duration * 1000.0,
            c.ease.name()
        ),
        None => " last snap: none".to_owned(),
    }
}

pub fn run(layout: &PageLayout, config: SnapConfig) -> Result<()> {
    let mut viewport_index = 0;
    let page = layout.measure(VIEWPORT_HEIGHTS[viewport_index])?;
    let scroll = SimulatedScroll::new(page.max_scroll());
    let mut controller = SnapController::new(scroll.clone(), page, config);
    let refresh = controller.refresh();
    info!(?refresh, "snap controller started");

    enable_raw_mode()?;
    let mut stdout = stdout();
    execute!(stdout, EnterAlternateScreen, EnableMouseCapture)?;
    let backend = CrosstermBackend::new(stdout);
    let mut terminal = Terminal::new(backend)?;

    let timeline = PinnedTimeline::default();
    let mut last_input: Option<Instant> = None;
    let mut last_snap: Option<SnapCommand> = None;

    loop {
        let now = Instant::now();
        scroll.tick(now);
        if let Some(at) = last_input
            && now.duration_since(at) >= SETTLE_AFTER
        {
            last_input = None;
            if let Some(cmd) = scroll.settle(now) {
                debug!(target = cmd.target, duration = cmd.duration, "snap");
                last_snap = Some(cmd);
            }
        }

        terminal.draw(|frame| {
            let area = frame.area();

            let header = Block::default()
                .title(format!(
                    " vaulta-snap | viewport {:.0}px | ↑↓ scroll | PgUp/PgDn | r resize | q quit ",
                    VIEWPORT_HEIGHTS[viewport_index]
                ))
                .style(Style::default().fg(Color::White).bg(Color::DarkGray));
            frame.render_widget(header, Rect::new(0, 0, area.width, 1));

            let track_area = Rect::new(0, 2, area.width, TRACK_ROWS + 1).intersection(area);
            let viewport = Viewport {
                x: 0.0,
                y: 0.0,
                width: f64::from(track_area.width),
                height: f64::from(TRACK_ROWS),
                dpr: 1.0,
            };
            if let Some(ranges) = controller.ranges() {
                let target = ranges.resolve(scroll.position(), controller.config().buffer);
                let cmds = render_scroll_track(
                    &ranges,
                    &viewport,
                    scroll.position(),
                    Some(target),
                    controller.config().buffer,
                );
                draw_commands(frame.buffer_mut(), track_area, &cmds);
            }

            let status = Paragraph::new(vec![
                Line::from(status_line(&controller, &scroll, &timeline)),
                Line::from(describe(last_snap.as_ref())),
            ])
            .style(Style::default().fg(Color::Gray));
            let status_area = Rect::new(0, 3 + TRACK_ROWS, area.width, 2).intersection(area);
            frame.render_widget(status, status_area);
        })?;

        if !event::poll(Duration::from_millis(16))? {
            continue;
        }
        let page_step = VIEWPORT_HEIGHTS[viewport_index] * 0.5;
        let delta = match event::read()? {
            Event::Key(key) if key.kind == KeyEventKind::Press => match key.code {
                KeyCode::Char('q') | KeyCode::Esc => break,
                KeyCode::Down | KeyCode::Char('j') => Some(LINE_STEP),
                KeyCode::Up | KeyCode::Char('k') => Some(-LINE_STEP),
                KeyCode::PageDown | KeyCode::Char(' ') => Some(page_step),
                KeyCode::PageUp => Some(-page_step),
                KeyCode::Home => Some(-scroll.offset()),
                KeyCode::End => Some(f64::MAX),
                KeyCode::Char('r') => {
                    viewport_index = (viewport_index + 1) % VIEWPORT_HEIGHTS.len();
                    let position = scroll.position();
                    let page = layout.measure(VIEWPORT_HEIGHTS[viewport_index])?;
                    scroll.set_max_scroll(page.max_scroll());
                    scroll.scroll_to(position * page.max_scroll());
                    *controller.registry_mut() = page;
                    let refresh = controller.refresh();
                    info!(?refresh, "viewport resized");
                    if let Refresh::Idle | Refresh::Deferred = refresh {
                        last_snap = None;
                    }
                    None
                }
                _ => None,
            },
            Event::Mouse(mouse) => match mouse.kind {
                MouseEventKind::ScrollDown => Some(LINE_STEP),
                MouseEventKind::ScrollUp => Some(-LINE_STEP),
                _ => None,
            },
            _ => None,
        };
        if let Some(delta) = delta {
            scroll.scroll_by(delta);
            last_input = Some(Instant::now());
        }
    }

    disable_raw_mode()?;
    execute!(
        terminal.backend_mut(),
        LeaveAlternateScreen,
        DisableMouseCapture
    )?;
    terminal.show_cursor()?;

    Ok(())
}
