pub mod screen;

use ratatui::{
    buffer::Buffer,
    layout::{Alignment, Constraint, Direction, Layout, Rect},
    style::{Color, Modifier, Style},
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Context, Points},
        Block, Borders, Clear, Paragraph, Widget, Wrap,
    },
};
use spinwheel::{
    color::Rgb,
    controller::WheelPhase,
    render::{angle_in_sweep, draw_wheel, point_in_polygon, Point, Surface, WheelGeometry},
};
use time_humanize::{Accuracy, HumanTime, Tense};
use unicode_width::{UnicodeWidthChar, UnicodeWidthStr};

use crate::{App, AppState};

const HORIZONTAL_MARGIN: u16 = 2;
const MAX_LABEL_WIDTH: usize = 14;

/// Braille dots per terminal cell.
const DOTS_X: f64 = 2.0;
const DOTS_Y: f64 = 4.0;

fn to_color(rgb: Rgb) -> Color {
    Color::Rgb(rgb.r, rgb.g, rgb.b)
}

/// Shortens `text` to at most `max` display columns, marking the cut with an ellipsis.
pub fn truncate_label(text: &str, max: usize) -> String {
    if text.width() <= max {
        return text.to_string();
    }
    let mut out = String::new();
    let mut used = 0;
    for c in text.chars() {
        let w = c.width().unwrap_or(0);
        if used + w + 1 > max {
            break;
        }
        out.push(c);
        used += w;
    }
    out.push('…');
    out
}

/// [`Surface`] over a ratatui braille canvas.
///
/// Works in dot coordinates (two per cell across, four per cell down) so the
/// wheel stays round; the canvas y axis points up, so y is flipped on output.
pub struct CanvasSurface<'a, 'b> {
    ctx: &'a mut Context<'b>,
    height: f64,
}

impl<'a, 'b> CanvasSurface<'a, 'b> {
    pub fn new(ctx: &'a mut Context<'b>, height: f64) -> Self {
        Self { ctx, height }
    }

    fn plot(&mut self, dots: Vec<(f64, f64)>, color: Rgb) {
        let coords: Vec<(f64, f64)> = dots
            .into_iter()
            .map(|(x, y)| (x, self.height - y))
            .collect();
        self.ctx.draw(&Points {
            coords: &coords,
            color: to_color(color),
        });
    }
}

impl Surface for CanvasSurface<'_, '_> {
    // A canvas starts blank every frame.
    fn clear(&mut self) {}

    fn fill_wedge(&mut self, center: Point, radius: f64, start: f64, end: f64, color: Rgb) {
        let mut dots = Vec::new();
        let r2 = radius * radius;
        let (x0, x1) = ((center.x - radius).floor(), (center.x + radius).ceil());
        let (y0, y1) = ((center.y - radius).floor(), (center.y + radius).ceil());
        let mut y = y0;
        while y <= y1 {
            let mut x = x0;
            while x <= x1 {
                let (dx, dy) = (x + 0.5 - center.x, y + 0.5 - center.y);
                if dx * dx + dy * dy <= r2 && angle_in_sweep(dy.atan2(dx), start, end) {
                    dots.push((x + 0.5, y + 0.5));
                }
                x += 1.0;
            }
            y += 1.0;
        }
        self.plot(dots, color);
    }

    fn draw_text(&mut self, origin: Point, _rotation: f64, text: &str, color: Rgb) {
        let label = truncate_label(text, MAX_LABEL_WIDTH);
        // one column is two dots wide; center the label on its origin
        let x = origin.x - label.width() as f64;
        let style = Style::default()
            .fg(to_color(color))
            .add_modifier(Modifier::BOLD);
        self.ctx.layer();
        self.ctx
            .print(x, self.height - origin.y, Span::styled(label, style));
    }

    fn fill_path(&mut self, path: &[Point], color: Rgb) {
        if path.is_empty() {
            return;
        }
        let min_x = path.iter().map(|p| p.x).fold(f64::INFINITY, f64::min).floor();
        let max_x = path.iter().map(|p| p.x).fold(f64::NEG_INFINITY, f64::max).ceil();
        let min_y = path.iter().map(|p| p.y).fold(f64::INFINITY, f64::min).floor();
        let max_y = path.iter().map(|p| p.y).fold(f64::NEG_INFINITY, f64::max).ceil();
        let mut dots = Vec::new();
        let mut y = min_y;
        while y <= max_y {
            let mut x = min_x;
            while x <= max_x {
                if point_in_polygon(Point::new(x + 0.5, y + 0.5), path) {
                    dots.push((x + 0.5, y + 0.5));
                }
                x += 1.0;
            }
            y += 1.0;
        }
        self.ctx.layer();
        self.plot(dots, color);
    }
}

fn saved_ago(app: &App) -> Option<String> {
    let saved_at = app.wheel.saved_at()?;
    let age_ms = chrono::Utc::now().timestamp_millis() - saved_at;
    let age = std::time::Duration::from_millis(age_ms.max(0) as u64);
    Some(HumanTime::from(age).to_text_en(Accuracy::Rough, Tense::Past))
}

fn status_line(app: &App) -> Line<'static> {
    let controller = app.wheel.controller();
    let phase = controller.phase();
    let phase_color = match phase {
        WheelPhase::Idle => Color::DarkGray,
        WheelPhase::Drifting => Color::Cyan,
        WheelPhase::Spinning | WheelPhase::Resolving => Color::Yellow,
    };
    let mut spans = vec![Span::styled(
        phase.to_string(),
        Style::default().fg(phase_color).add_modifier(Modifier::BOLD),
    )];
    if let Some(progress) = controller.spin_progress() {
        spans.push(Span::raw(format!(" {:>3.0}%", progress * 100.0)));
    }
    spans.push(Span::raw(format!(
        "  ·  {} entries",
        controller.wheel().len()
    )));
    if let Some(ago) = saved_ago(app) {
        spans.push(Span::styled(
            format!("  ·  saved {ago}"),
            Style::default().add_modifier(Modifier::DIM),
        ));
    }
    Line::from(spans)
}

fn help_line(state: &AppState) -> Line<'static> {
    let text = match state {
        AppState::Wheel => "(space) spin   (e) edit entries   (esc) quit",
        AppState::Edit => "type one entry per line   (enter) new line   (tab/esc) apply",
    };
    Line::from(Span::styled(
        text,
        Style::default().add_modifier(Modifier::ITALIC | Modifier::DIM),
    ))
}

fn render_wheel(app: &App, area: Rect, buf: &mut Buffer) {
    if area.is_empty() {
        return;
    }
    let wheel = app.wheel.controller().wheel();
    if wheel.is_empty() {
        Paragraph::new(Span::styled(
            "No entries yet - press (e) to add some names",
            Style::default()
                .fg(Color::Yellow)
                .add_modifier(Modifier::BOLD | Modifier::ITALIC),
        ))
        .alignment(Alignment::Center)
        .wrap(Wrap { trim: true })
        .render(centered_rect(area, area.width, 1), buf);
        return;
    }

    let width = area.width as f64 * DOTS_X;
    let height = area.height as f64 * DOTS_Y;
    let mut geometry = WheelGeometry::centered(width, height);
    geometry.pointer_color = Rgb::WHITE;

    Canvas::default()
        .x_bounds([0.0, width])
        .y_bounds([0.0, height])
        .marker(ratatui::symbols::Marker::Braille)
        .paint(|ctx| {
            let mut surface = CanvasSurface::new(ctx, height);
            draw_wheel(&mut surface, wheel, &geometry);
        })
        .render(area, buf);
}

fn render_editor(app: &App, area: Rect, buf: &mut Buffer) {
    let mut lines: Vec<Line> = app.editor.split('\n').map(Line::from).collect();
    if let Some(last) = lines.last_mut() {
        last.push_span(Span::styled(
            " ",
            Style::default().add_modifier(Modifier::REVERSED),
        ));
    }
    Paragraph::new(lines)
        .block(
            Block::default()
                .borders(Borders::ALL)
                .title(" Entries "),
        )
        .render(area, buf);
}

fn render_overlay(title: &str, message: &str, color: Color, area: Rect, buf: &mut Buffer) {
    let wanted = u16::try_from(message.width())
        .unwrap_or(u16::MAX)
        .saturating_add(6);
    // at least 20 columns, unless the terminal itself is narrower
    let width = wanted.max(20).min(area.width);
    let rect = centered_rect(area, width, 5);
    Clear.render(rect, buf);
    Paragraph::new(vec![
        Line::from(""),
        Line::from(Span::styled(
            message.to_string(),
            Style::default().fg(color).add_modifier(Modifier::BOLD),
        )),
    ])
    .alignment(Alignment::Center)
    .wrap(Wrap { trim: true })
    .block(
        Block::default()
            .borders(Borders::ALL)
            .title(format!(" {title} ")),
    )
    .render(rect, buf);
}

fn render_sparks(app: &App, area: Rect, buf: &mut Buffer) {
    let palette = [
        Color::Red,
        Color::Yellow,
        Color::Green,
        Color::Cyan,
        Color::Blue,
        Color::Magenta,
        Color::White,
    ];
    for spark in &app.celebration.sparks {
        if spark.x < 0.0 || spark.y < 0.0 {
            continue;
        }
        let (x, y) = (area.x + spark.x as u16, area.y + spark.y as u16);
        if x < area.right() && y < area.bottom() {
            buf[(x, y)]
                .set_char(spark.symbol)
                .set_fg(palette[spark.color_index % palette.len()]);
        }
    }
}

pub fn centered_rect(area: Rect, width: u16, height: u16) -> Rect {
    let width = width.min(area.width);
    let height = height.min(area.height);
    Rect::new(
        area.x + (area.width - width) / 2,
        area.y + (area.height - height) / 2,
        width,
        height,
    )
}

impl Widget for &App {
    fn render(self, area: Rect, buf: &mut Buffer) {
        let chunks = Layout::default()
            .direction(Direction::Vertical)
            .horizontal_margin(HORIZONTAL_MARGIN)
            .constraints([
                Constraint::Min(3),    // wheel or editor
                Constraint::Length(1), // status
                Constraint::Length(1), // help
            ])
            .split(area);

        match self.state {
            AppState::Wheel => render_wheel(self, chunks[0], buf),
            AppState::Edit => render_editor(self, chunks[0], buf),
        }

        Paragraph::new(status_line(self))
            .alignment(Alignment::Center)
            .render(chunks[1], buf);
        Paragraph::new(help_line(&self.state))
            .alignment(Alignment::Center)
            .render(chunks[2], buf);

        if let Some(notice) = &self.notice {
            render_overlay("Notice", notice, Color::Yellow, area, buf);
        } else if self.celebration.is_active() {
            render_sparks(self, area, buf);
            render_overlay(
                "Winner",
                &self.celebration.message,
                Color::Green,
                area,
                buf,
            );
        }
    }
}
