use crate::app::{App, View};
use crate::braille::BrailleCanvas;
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Paragraph, Widget, Wrap},
    Frame,
};

/// Render the UI: map on the left, dashboard and headlines stacked on the
/// right, status bar along the bottom.
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Body
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    let body = Layout::default()
        .direction(Direction::Horizontal)
        .constraints([Constraint::Percentage(58), Constraint::Percentage(42)])
        .split(chunks[0]);

    let side = Layout::default()
        .direction(Direction::Vertical)
        .constraints([Constraint::Percentage(55), Constraint::Percentage(45)])
        .split(body[1]);

    render_map(frame, app, body[0]);
    render_dashboard(frame, app, side[0]);
    render_news(frame, app, side[1]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let title = match app.view {
        View::National => " United States ",
        View::Regional => " California ▸ Alameda County ",
    };
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            title,
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);
    if inner.width == 0 || inner.height == 0 {
        return;
    }

    let mut canvas = BrailleCanvas::new(inner.width as usize, inner.height as usize);
    app.active_outline().render(&mut canvas);

    let widget = MapWidget {
        rows: canvas.rows().collect(),
        highlight: (app.view == View::National).then(|| hitbox_cells(app, inner)).flatten(),
        hovering: app.hovering_hitbox(),
        tag: "California",
        hint: match app.view {
            View::National => "Hover California • Click to drill into Alameda",
            View::Regional => "Click anywhere on the map to go back to USA",
        },
    };
    frame.render_widget(widget, inner);
}

/// Clamp the frame-space hitbox into the map panel as a cell rectangle
fn hitbox_cells(app: &App, inner: Rect) -> Option<Rect> {
    let x0 = app.hitbox.x.floor().max(inner.x as f64) as u16;
    let y0 = app.hitbox.y.floor().max(inner.y as f64) as u16;
    let x1 = ((app.hitbox.x + app.hitbox.w).ceil() as u16).min(inner.x + inner.width);
    let y1 = ((app.hitbox.y + app.hitbox.h).ceil() as u16).min(inner.y + inner.height);

    if x1 > x0 && y1 > y0 {
        Some(Rect::new(x0, y0, x1 - x0, y1 - y0))
    } else {
        None
    }
}

/// Braille map layer with the drill-down highlight and a hint line overlaid
struct MapWidget {
    rows: Vec<String>,
    highlight: Option<Rect>,
    hovering: bool,
    tag: &'static str,
    hint: &'static str,
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        // Outline layer
        for (row_idx, row_str) in self.rows.iter().enumerate() {
            if row_idx >= area.height as usize {
                break;
            }
            let y = area.y + row_idx as u16;

            for (col_idx, ch) in row_str.chars().enumerate() {
                if col_idx >= area.width as usize {
                    break;
                }
                // Skip empty braille characters (U+2800)
                if ch == '\u{2800}' {
                    continue;
                }
                let x = area.x + col_idx as u16;
                buf[(x, y)].set_char(ch).set_fg(Color::Cyan);
            }
        }

        // Drill-down highlight: filled box, brighter while hovered
        if let Some(hit) = self.highlight {
            let bg = if self.hovering {
                Color::LightBlue
            } else {
                Color::Blue
            };
            for y in hit.y..hit.y + hit.height {
                for x in hit.x..hit.x + hit.width {
                    if x < area.x + area.width && y < area.y + area.height {
                        buf[(x, y)].set_bg(bg);
                    }
                }
            }

            // Tag label to the right of the box
            let tag_x = hit.x + hit.width + 1;
            let tag_y = hit.y + hit.height / 3;
            if tag_y < area.y + area.height {
                for (i, ch) in self.tag.chars().enumerate() {
                    let x = tag_x + i as u16;
                    if x < area.x + area.width {
                        buf[(x, tag_y)].set_char(ch).set_fg(Color::White);
                    }
                }
            }
        }

        // Hint chip along the bottom edge
        if area.height > 0 {
            let y = area.y + area.height - 1;
            for (i, ch) in self.hint.chars().enumerate() {
                let x = area.x + 1 + i as u16;
                if x < area.x + area.width {
                    buf[(x, y)].set_char(ch).set_fg(Color::DarkGray);
                }
            }
        }
    }
}

fn render_dashboard(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Dashboard ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let content = &app.dashboard;
    let mut lines = vec![
        Line::from(Span::styled(
            content.breadcrumb.clone(),
            Style::default()
                .fg(Color::White)
                .add_modifier(Modifier::BOLD),
        )),
        Line::from(Span::styled(
            content.status.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
        Line::from(Span::styled(
            content.snapshot_label.clone(),
            Style::default().fg(Color::Cyan),
        )),
    ];

    let total_text = match content.total_offenses {
        Some(total) => format_count(total),
        None => "—".to_string(),
    };
    lines.push(Line::from(vec![
        Span::styled("Total offenses  ", Style::default().fg(Color::DarkGray)),
        Span::styled(total_text, Style::default().fg(Color::Yellow)),
    ]));

    if let Some(share) = content.share_of_parent {
        lines.push(Line::from(vec![
            Span::styled("Alameda share of CA  ", Style::default().fg(Color::DarkGray)),
            Span::styled(format!("{share:.2}%"), Style::default().fg(Color::Yellow)),
        ]));
    }

    lines.push(Line::from(""));
    lines.push(Line::from(Span::styled(
        "Top offenses by count",
        Style::default().fg(Color::Gray),
    )));

    // Bars scale against the maximum over ALL rows of the active stats, so
    // the tallest visible bar only fills the width when it is the true max
    let max = app.active_stats().map(|s| s.max_value()).unwrap_or(1.0);
    let label_w: usize = 16;
    let value_w: usize = 10;
    let avail = (inner.width as usize).saturating_sub(label_w + value_w + 2);

    for row in &content.breakdown_rows {
        let label: String = row.name.chars().take(label_w).collect();
        let filled = bar_width(row.value, max, avail);
        let bar: String = "█".repeat(filled);
        let pad = " ".repeat(avail.saturating_sub(filled));

        lines.push(Line::from(vec![
            Span::styled(format!("{label:<label_w$} "), Style::default().fg(Color::White)),
            Span::styled(bar, Style::default().fg(Color::Cyan)),
            Span::raw(pad),
            Span::styled(
                format!(" {:>9}", format_count(row.value)),
                Style::default().fg(Color::DarkGray),
            ),
        ]));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn render_news(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Crime Headlines ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ));
    let inner = block.inner(area);
    frame.render_widget(block, area);

    let mut lines = vec![
        Line::from(Span::styled(
            app.news.status.clone(),
            Style::default().fg(Color::DarkGray),
        )),
        Line::from(""),
    ];

    for headline in &app.news.headlines {
        lines.push(Line::from(Span::styled(
            format!("• {}", headline.title),
            Style::default().fg(Color::White),
        )));
        lines.push(Line::from(Span::styled(
            format!("  {} · {}", headline.published_at, headline.source_name),
            Style::default().fg(Color::DarkGray),
        )));
    }

    let paragraph = Paragraph::new(lines).wrap(Wrap { trim: false });
    frame.render_widget(paragraph, inner);
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let status = Line::from(vec![
        Span::styled(" View: ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            app.dashboard.breadcrumb.clone(),
            Style::default().fg(Color::Yellow),
        ),
        Span::styled(" | ", Style::default().fg(Color::DarkGray)),
        Span::styled(
            match app.view {
                View::National => "click California: drill in",
                View::Regional => "click: back to USA",
            },
            Style::default().fg(Color::Cyan),
        ),
        Span::styled(" | q:quit", Style::default().fg(Color::DarkGray)),
    ]);

    let paragraph = Paragraph::new(status);
    frame.render_widget(paragraph, area);
}

/// Bar length in cells: proportional to value, with the max-value row
/// filling the full available width
fn bar_width(value: f64, max: f64, avail: usize) -> usize {
    if max <= 0.0 {
        return 0;
    }
    ((value / max) * avail as f64).round() as usize
}

/// Thousands-separated count for display
fn format_count(value: f64) -> String {
    let digits = (value.round().max(0.0) as u64).to_string();
    let mut out = String::with_capacity(digits.len() + digits.len() / 3);
    for (i, ch) in digits.chars().enumerate() {
        if i > 0 && (digits.len() - i) % 3 == 0 {
            out.push(',');
        }
        out.push(ch);
    }
    out
}
