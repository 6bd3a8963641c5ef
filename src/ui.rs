use crate::app::App;
use conflict_atlas::map::{known_categories, legend, style_for, RenderedMap, TooltipBox};
use ratatui::{
    buffer::Buffer,
    layout::{Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{Block, Borders, Clear, Paragraph, Widget},
    Frame,
};

const BLANK_BRAILLE: char = '\u{2800}';

/// Render the UI
pub fn render(frame: &mut Frame, app: &App) {
    let area = frame.area();

    // Split into map area and status bar
    let chunks = Layout::default()
        .direction(Direction::Vertical)
        .constraints([
            Constraint::Min(3),    // Map
            Constraint::Length(1), // Status bar
        ])
        .split(area);

    render_map(frame, app, chunks[0]);
    render_status_bar(frame, app, chunks[1]);
}

fn render_map(frame: &mut Frame, app: &App, area: Rect) {
    let block = Block::default()
        .borders(Borders::ALL)
        .border_style(Style::default().fg(Color::DarkGray))
        .title(Span::styled(
            " Conflict Atlas ",
            Style::default()
                .fg(Color::Cyan)
                .add_modifier(Modifier::BOLD),
        ))
        .title(Span::styled(
            format!(" {} ", app.composer.mode().label()),
            Style::default().fg(Color::Magenta),
        ));

    let inner = block.inner(area);
    frame.render_widget(block, area);

    let rendered = app.map_renderer.render(
        app.composer.scene(),
        app.camera.transform(),
        inner.width as usize,
        inner.height as usize,
        app.animation_time(),
    );

    frame.render_widget(
        MapWidget {
            rendered,
            cursor_pos: app.mouse_cell(),
        },
        inner,
    );

    if app.show_legend {
        render_legend(frame, app, inner);
    }
}

/// Map symbology box in the top-right corner of the map
fn render_legend(frame: &mut Frame, app: &App, area: Rect) {
    let mut lines = Vec::new();
    for section in legend(app.composer.mode()) {
        lines.push(Line::from(Span::styled(
            section.title,
            Style::default().fg(Color::Gray).add_modifier(Modifier::BOLD),
        )));
        for entry in section.entries {
            lines.push(Line::from(vec![
                Span::styled(format!(" {:<2} ", entry.symbol), Style::default().fg(entry.color.into())),
                Span::styled(entry.label, Style::default().fg(Color::White)),
            ]));
        }
    }

    let text_width = lines.iter().map(Line::width).max().unwrap_or(0);
    let width = (text_width as u16 + 2).min(area.width);
    let height = (lines.len() as u16 + 2).min(area.height);
    let rect = Rect::new(area.x + area.width - width, area.y, width, height);

    frame.render_widget(Clear, rect);
    frame.render_widget(
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::DarkGray))
                    .title(" Map Symbology "),
            )
            .style(Style::default().bg(Color::Black)),
        rect,
    );
}

/// Braille map with per-cell colors, labels and the tooltip overlaid
struct MapWidget {
    rendered: RenderedMap,
    cursor_pos: Option<(u16, u16)>,
}

impl MapWidget {
    fn render_canvas(&self, area: Rect, buf: &mut Buffer) {
        let canvas = &self.rendered.canvas;
        let rows = canvas.height().min(area.height as usize);
        let cols = canvas.width().min(area.width as usize);

        for cy in 0..rows {
            for cx in 0..cols {
                let cell = &mut buf[(area.x + cx as u16, area.y + cy as u16)];
                if let Some(paper) = canvas.paper(cx, cy) {
                    cell.set_bg(paper.into());
                }
                let ch = canvas.glyph(cx, cy);
                if ch == BLANK_BRAILLE {
                    continue;
                }
                cell.set_char(ch);
                if let Some(ink) = canvas.ink(cx, cy) {
                    cell.set_fg(ink.into());
                }
            }
        }
    }

    fn render_labels(&self, area: Rect, buf: &mut Buffer) {
        for label in &self.rendered.labels {
            if label.row >= area.height || label.col >= area.width {
                continue;
            }
            let mut style = Style::default().fg(label.color.into());
            if label.bold {
                style = style.add_modifier(Modifier::BOLD);
            }

            let max_len = area.width.saturating_sub(label.col) as usize;
            let y = area.y + label.row;
            for (i, ch) in label.text.chars().take(max_len).enumerate() {
                buf[(area.x + label.col + i as u16, y)].set_char(ch).set_style(style);
            }
        }
    }

    fn render_tooltip(tooltip: &TooltipBox, area: Rect, buf: &mut Buffer) {
        let text_width = tooltip
            .lines
            .iter()
            .map(|l| l.chars().count())
            .max()
            .unwrap_or(0);
        let width = (text_width as u16 + 2).min(area.width);
        let height = (tooltip.lines.len() as u16 + 2).min(area.height);

        // Keep the box on screen
        let col = tooltip.col.min(area.width.saturating_sub(width));
        let row = tooltip.row.min(area.height.saturating_sub(height));
        let rect = Rect::new(area.x + col, area.y + row, width, height);

        let lines: Vec<Line> = tooltip
            .lines
            .iter()
            .enumerate()
            .map(|(i, text)| {
                let style = if i == 0 {
                    Style::default().fg(Color::White).add_modifier(Modifier::BOLD)
                } else {
                    Style::default().fg(Color::Gray)
                };
                Line::from(Span::styled(text.clone(), style))
            })
            .collect();

        Clear.render(rect, buf);
        Paragraph::new(lines)
            .block(
                Block::default()
                    .borders(Borders::ALL)
                    .border_style(Style::default().fg(Color::Cyan)),
            )
            .style(Style::default().bg(Color::Black))
            .render(rect, buf);
    }
}

impl Widget for MapWidget {
    fn render(self, area: Rect, buf: &mut Buffer) {
        self.render_canvas(area, buf);
        self.render_labels(area, buf);

        if let Some(tooltip) = &self.rendered.tooltip {
            Self::render_tooltip(tooltip, area, buf);
        }

        // Render cursor marker
        if let Some((cx, cy)) = self.cursor_pos {
            let x = area.x + cx;
            let y = area.y + cy;
            if x < area.x + area.width && y < area.y + area.height {
                buf[(x, y)].set_char('╋').set_fg(Color::Red);
            }
        }
    }
}

fn render_status_bar(frame: &mut Frame, app: &App, area: Rect) {
    let dim = Style::default().fg(Color::DarkGray);

    let mut spans = vec![
        Span::styled(" Zoom: ", dim),
        Span::styled(app.zoom_level(), Style::default().fg(Color::Yellow)),
        Span::styled(" (", dim),
        Span::styled(app.resolution(), Style::default().fg(Color::Cyan)),
        Span::styled(") ", dim),
        Span::styled(app.detail_level(), Style::default().fg(Color::Green)),
        Span::styled(" | ", dim),
    ];

    // Category toggles, numbered as on the keyboard
    let filter = app.composer.filter();
    let edges_on = app.composer.show_edges();
    for (i, category) in known_categories().enumerate() {
        let color = if edges_on && filter.contains(category) {
            style_for(category).color.into()
        } else {
            Color::DarkGray
        };
        spans.push(Span::styled(format!("{}:{} ", i + 1, short_name(category)), Style::default().fg(color)));
    }

    spans.push(Span::styled("| ", dim));
    spans.push(Span::styled(
        format!("{} active ", app.active_conflicts()),
        Style::default().fg(Color::LightRed),
    ));
    spans.push(Span::styled(
        format!("{} critical ", app.critical_regions()),
        Style::default().fg(Color::Red).add_modifier(Modifier::BOLD),
    ));

    if let Some(text) = app.hover_label().or_else(|| app.notice.clone()) {
        spans.push(Span::styled("| ", dim));
        spans.push(Span::styled(text, Style::default().fg(Color::White)));
    }

    spans.push(Span::styled(
        " | hjkl:pan +/-:zoom m:mode e:edges 1-5/a:filter ?:legend r:reset q:quit",
        dim,
    ));

    frame.render_widget(Paragraph::new(Line::from(spans)), area);
}

fn short_name(category: &str) -> &str {
    match category {
        "PROXY_WAR" => "proxy",
        "ARMS_FLOW" => "arms",
        "ALLIANCE" => "ally",
        "CYBER" => "cyber",
        "SPILLOVER" => "spill",
        other => other,
    }
}
