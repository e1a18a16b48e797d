use crate::map::MarkerKind;
use crate::model::{DrawnShape, Recommendation, RegionSummary};
use crate::ui::app::{App, DrawTool, FocusPanel};
use crate::workflow::AnalysisState;
use ratatui::{
    layout::{Constraint, Layout, Rect},
    style::{Color, Modifier, Style},
    symbols,
    text::{Line, Span},
    widgets::{
        canvas::{Canvas, Line as CanvasLine, Points, Rectangle as CanvasRect},
        Axis, Bar, BarChart, BarGroup, Block, Borders, Chart, Dataset, GraphType, List, ListItem,
        Paragraph,
    },
    Frame,
};

// Dashboard palette
const SOLAR_YELLOW: Color = Color::Rgb(0xF1, 0xC4, 0x0F); // #f1c40f
const CARBON_GREEN: Color = Color::Rgb(0x2E, 0xCC, 0x71); // #2ecc71
const GRID_BLUE: Color = Color::Rgb(0x34, 0x98, 0xDB); // #3498db
const ALERT_RED: Color = Color::Rgb(0xE7, 0x4C, 0x3C); // #e74c3c
const MUTED: Color = Color::DarkGray;

const HEADER_STYLE: Style = Style::new().fg(Color::White).add_modifier(Modifier::BOLD);

const SPINNER_FRAMES: [&str; 10] = ["⠋", "⠙", "⠹", "⠸", "⠼", "⠴", "⠦", "⠧", "⠇", "⠏"];

/// Color for one grid point. Total over the classification: any value the
/// server invents beyond SOLAR/TREE falls through to blue.
#[must_use]
pub fn recommendation_color(rec: Recommendation) -> Color {
    match rec {
        Recommendation::Solar => SOLAR_YELLOW,
        Recommendation::Tree => CARBON_GREEN,
        Recommendation::Other => GRID_BLUE,
    }
}

/// The four labeled sub-fields of the summary panel.
#[must_use]
pub fn summary_fields(summary: &RegionSummary) -> [(&'static str, String); 4] {
    [
        ("Suggestion", summary.main_rec.clone()),
        ("Avg solar", summary.avg_solar.to_string()),
        ("Trees", summary.tree_count.to_string()),
        ("Build score", summary.build_score.to_string()),
    ]
}

pub fn draw_dashboard(frame: &mut Frame, app: &App) {
    let chunks = Layout::vertical([
        Constraint::Length(3), // Header
        Constraint::Min(12),   // Main content
        Constraint::Length(3), // Footer
    ])
    .split(frame.area());

    draw_header(frame, chunks[0], app);
    draw_main_content(frame, chunks[1], app);
    draw_footer(frame, chunks[2], app);
}

fn draw_header(frame: &mut Frame, area: Rect, app: &App) {
    let title = format!(
        " ecoscope | {} buildings | {} markers | cursor {:.5}, {:.5} ",
        app.charts
            .energy
            .as_ref()
            .map_or(0, |s| s.labels.len()),
        app.map.markers().len(),
        app.map.cursor.lat,
        app.map.cursor.lon,
    );

    let header = Paragraph::new(title)
        .style(HEADER_STYLE)
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(header, area);
}

fn draw_main_content(frame: &mut Frame, area: Rect, app: &App) {
    let chunks = Layout::horizontal([
        Constraint::Percentage(38), // Charts + recommendations
        Constraint::Percentage(62), // Map + analysis panel
    ])
    .split(area);

    let left = Layout::vertical([
        Constraint::Percentage(34),
        Constraint::Percentage(33),
        Constraint::Min(5),
    ])
    .split(chunks[0]);

    draw_energy_chart(frame, left[0], app);
    draw_carbon_chart(frame, left[1], app);
    draw_recommendations(frame, left[2], app);

    let right = Layout::vertical([Constraint::Min(8), Constraint::Length(7)]).split(chunks[1]);
    draw_map(frame, right[0], app);
    draw_analysis_panel(frame, right[1], app);
}

fn draw_energy_chart(frame: &mut Frame, area: Rect, app: &App) {
    let series = match &app.charts.energy {
        Some(series) => series,
        None => return draw_chart_placeholder(frame, area, " Solar Potential (kWh) "),
    };

    let bar_width = 8u16;
    let bars: Vec<Bar> = series
        .labels
        .iter()
        .zip(&series.values)
        .map(|(label, value)| {
            let short: String = label.chars().take(bar_width as usize).collect();
            let bar = Bar::default().label(Line::from(short));
            match value {
                Some(v) => bar
                    .value(v.max(0.0).round() as u64)
                    .text_value(format!("{v:.0}"))
                    .style(Style::default().fg(SOLAR_YELLOW)),
                // Gap: label kept, nothing drawn
                None => bar.value(0).text_value("-".to_string()),
            }
        })
        .collect();

    let chart = BarChart::default()
        .block(
            Block::default()
                .title(format!(" {} ", series.title))
                .borders(Borders::ALL),
        )
        .bar_width(bar_width)
        .bar_gap(1)
        .value_style(
            Style::default()
                .fg(Color::Black)
                .bg(SOLAR_YELLOW)
                .add_modifier(Modifier::BOLD),
        )
        .data(BarGroup::default().bars(&bars));

    frame.render_widget(chart, area);
}

fn draw_carbon_chart(frame: &mut Frame, area: Rect, app: &App) {
    let series = match &app.charts.carbon {
        Some(series) => series,
        None => return draw_chart_placeholder(frame, area, " Carbon Saved (kg) "),
    };

    let points: Vec<(f64, f64)> = series
        .values
        .iter()
        .enumerate()
        .filter_map(|(i, v)| v.map(|v| (i as f64, v)))
        .collect();

    let x_max = (series.values.len().saturating_sub(1)).max(1) as f64;
    let y_max = (series.max_value() * 1.1).max(1.0);

    let dataset = Dataset::default()
        .name(series.title.clone())
        .marker(symbols::Marker::Braille)
        .graph_type(GraphType::Line)
        .style(Style::default().fg(CARBON_GREEN))
        .data(&points);

    let chart = Chart::new(vec![dataset])
        .block(
            Block::default()
                .title(format!(" {} ", series.title))
                .borders(Borders::ALL),
        )
        .x_axis(Axis::default().bounds([0.0, x_max]))
        .y_axis(
            Axis::default()
                .bounds([0.0, y_max])
                .labels(vec![
                    Span::styled("0", Style::default().fg(MUTED)),
                    Span::styled(format!("{y_max:.0}"), Style::default().fg(MUTED)),
                ]),
        );

    frame.render_widget(chart, area);
}

fn draw_chart_placeholder(frame: &mut Frame, area: Rect, title: &str) {
    let placeholder = Paragraph::new("no data")
        .style(Style::default().fg(MUTED))
        .block(Block::default().title(title.to_string()).borders(Borders::ALL));
    frame.render_widget(placeholder, area);
}

fn draw_recommendations(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == FocusPanel::Recommendations;

    let visible = (area.height as usize).saturating_sub(2);
    let items: Vec<ListItem> = app
        .recommendations
        .iter()
        .skip(app.rec_scroll)
        .take(visible)
        // Plain text only: backend strings are untrusted
        .map(|item| ListItem::new(item.as_str()))
        .collect();

    let border_style = if is_focused {
        Style::default().fg(SOLAR_YELLOW)
    } else {
        Style::default()
    };

    let title = format!(" Recommendations ({}) ", app.recommendations.len());
    let list = List::new(items).block(
        Block::default()
            .title(title)
            .borders(Borders::ALL)
            .border_style(border_style),
    );

    frame.render_widget(list, area);
}

fn draw_map(frame: &mut Frame, area: Rect, app: &App) {
    let is_focused = app.focus == FocusPanel::Map;
    let border_style = if is_focused {
        Style::default().fg(SOLAR_YELLOW)
    } else {
        Style::default()
    };

    let block = Block::default()
        .title(format!(" Map (zoom {}) ", app.map.zoom))
        .borders(Borders::ALL)
        .border_style(border_style);
    let inner = block.inner(area);

    // Terminal cells are roughly twice as tall as wide
    let aspect = if inner.height == 0 {
        1.0
    } else {
        f64::from(inner.width) / (f64::from(inner.height) * 2.0)
    };
    let (x_bounds, y_bounds) = app.map.bounds(aspect);

    let canvas = Canvas::default()
        .block(block)
        .marker(symbols::Marker::Braille)
        .x_bounds(x_bounds)
        .y_bounds(y_bounds)
        .paint(|ctx| {
            paint_markers(ctx, app);
            paint_grid(ctx, app);
            paint_shape(ctx, app);
            paint_pending(ctx, app);
            // Cursor on top
            ctx.print(
                app.map.cursor.lon,
                app.map.cursor.lat,
                Line::from(Span::styled("+", Style::default().fg(SOLAR_YELLOW))),
            );
        });

    frame.render_widget(canvas, area);
}

fn paint_markers(ctx: &mut ratatui::widgets::canvas::Context, app: &App) {
    let buildings: Vec<(f64, f64)> = app
        .map
        .markers()
        .iter()
        .filter(|m| m.kind == MarkerKind::Building)
        .map(|m| (m.position.lon, m.position.lat))
        .collect();
    let zones: Vec<(f64, f64)> = app
        .map
        .markers()
        .iter()
        .filter(|m| m.kind == MarkerKind::GreenZone)
        .map(|m| (m.position.lon, m.position.lat))
        .collect();

    ctx.draw(&Points {
        coords: &buildings,
        color: Color::White,
    });
    ctx.draw(&Points {
        coords: &zones,
        color: CARBON_GREEN,
    });
}

fn paint_grid(ctx: &mut ratatui::widgets::canvas::Context, app: &App) {
    for rec in [
        Recommendation::Solar,
        Recommendation::Tree,
        Recommendation::Other,
    ] {
        let coords: Vec<(f64, f64)> = app
            .map
            .grid()
            .iter()
            .filter(|p| p.recommendation == rec)
            .map(|p| (p.lon, p.lat))
            .collect();
        if !coords.is_empty() {
            ctx.draw(&Points {
                coords: &coords,
                color: recommendation_color(rec),
            });
        }
    }
}

fn paint_shape(ctx: &mut ratatui::widgets::canvas::Context, app: &App) {
    match app.map.drawn_shape() {
        Some(DrawnShape::Rectangle { sw, ne }) => {
            ctx.draw(&CanvasRect {
                x: sw.lon,
                y: sw.lat,
                width: ne.lon - sw.lon,
                height: ne.lat - sw.lat,
                color: Color::Cyan,
            });
        }
        Some(DrawnShape::Polygon(vertices)) => {
            for (a, b) in polygon_edges(vertices) {
                ctx.draw(&CanvasLine {
                    x1: a.0,
                    y1: a.1,
                    x2: b.0,
                    y2: b.1,
                    color: Color::Cyan,
                });
            }
        }
        None => {}
    }
}

fn paint_pending(ctx: &mut ratatui::widgets::canvas::Context, app: &App) {
    match &app.draw_tool {
        DrawTool::None => {}
        DrawTool::Rectangle { anchor } => {
            let preview = DrawnShape::rectangle(*anchor, app.map.cursor);
            if let DrawnShape::Rectangle { sw, ne } = preview {
                ctx.draw(&CanvasRect {
                    x: sw.lon,
                    y: sw.lat,
                    width: ne.lon - sw.lon,
                    height: ne.lat - sw.lat,
                    color: MUTED,
                });
            }
        }
        DrawTool::Polygon { vertices } => {
            let coords: Vec<(f64, f64)> = vertices.iter().map(|v| (v.lon, v.lat)).collect();
            ctx.draw(&Points {
                coords: &coords,
                color: MUTED,
            });
            for pair in coords.windows(2) {
                ctx.draw(&CanvasLine {
                    x1: pair[0].0,
                    y1: pair[0].1,
                    x2: pair[1].0,
                    y2: pair[1].1,
                    color: MUTED,
                });
            }
        }
    }
}

fn polygon_edges(vertices: &[crate::model::LatLon]) -> Vec<((f64, f64), (f64, f64))> {
    let coords: Vec<(f64, f64)> = vertices.iter().map(|v| (v.lon, v.lat)).collect();
    let mut edges: Vec<_> = coords.windows(2).map(|p| (p[0], p[1])).collect();
    if let (Some(first), Some(last)) = (coords.first(), coords.last()) {
        if coords.len() > 2 {
            edges.push((*last, *first));
        }
    }
    edges
}

fn draw_analysis_panel(frame: &mut Frame, area: Rect, app: &App) {
    let block = Block::default().title(" Region Analysis ").borders(Borders::ALL);

    let content: Vec<Line> = match app.workflow.state() {
        AnalysisState::Idle => vec![Line::from(Span::styled(
            "Draw a region to analyze: r rectangle, p polygon vertex, Enter send",
            Style::default().fg(MUTED),
        ))],
        AnalysisState::Loading => {
            let spinner = SPINNER_FRAMES[(app.tick as usize) % SPINNER_FRAMES.len()];
            vec![Line::from(Span::styled(
                format!("{spinner} Analyzing region..."),
                Style::default().fg(SOLAR_YELLOW),
            ))]
        }
        AnalysisState::Rendered(summary) => summary_fields(summary)
            .into_iter()
            .map(|(label, value)| {
                Line::from(vec![
                    Span::styled(format!("{label}: "), Style::default().fg(MUTED)),
                    Span::styled(value, Style::default().add_modifier(Modifier::BOLD)),
                ])
            })
            .collect(),
        AnalysisState::Failed(message) => vec![
            Line::from(Span::styled(
                format!("Analysis failed: {message}"),
                Style::default().fg(ALERT_RED).add_modifier(Modifier::BOLD),
            )),
            Line::from(Span::styled(
                "Press x to clear and draw again",
                Style::default().fg(MUTED),
            )),
        ],
    };

    frame.render_widget(Paragraph::new(content).block(block), area);
}

fn draw_footer(frame: &mut Frame, area: Rect, app: &App) {
    let help = match app.focus {
        FocusPanel::Map => {
            " ←↑↓→ Move | +/- Zoom | r Rect | p Polygon | Enter Analyze | x Clear | Tab Focus | q Quit "
        }
        FocusPanel::Recommendations => " ↑↓ Scroll | Tab Focus | q Quit ",
    };
    let footer = Paragraph::new(help)
        .style(Style::default().fg(MUTED))
        .block(Block::default().borders(Borders::ALL));

    frame.render_widget(footer, area);
}
