use color_eyre::Result;
use crossterm::event::{self, Event, KeyCode, KeyEventKind};
use ratatui::{DefaultTerminal, Frame};
use std::sync::mpsc::{self, Receiver, Sender};
use std::time::Duration;
use tracing::warn;

use crate::api::ApiClient;
use crate::chart::Charts;
use crate::fetch::{self, FetchEvent};
use crate::map::{MapState, MarkerKind};
use crate::model::{BuildingMetric, DrawnShape, GreenZone, LatLon};
use crate::workflow::AnalysisWorkflow;

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FocusPanel {
    Map,
    Recommendations,
}

/// In-progress drawing, previewed on the canvas until committed with Enter.
#[derive(Debug, Clone, PartialEq)]
pub enum DrawTool {
    None,
    Rectangle { anchor: LatLon },
    Polygon { vertices: Vec<LatLon> },
}

pub struct App {
    api: ApiClient,
    tx: Sender<FetchEvent>,
    rx: Receiver<FetchEvent>,
    pub charts: Charts,
    pub map: MapState,
    pub workflow: AnalysisWorkflow,
    pub recommendations: Vec<String>,
    pub focus: FocusPanel,
    pub rec_scroll: usize,
    pub draw_tool: DrawTool,
    pub tick: u64,
    pub should_quit: bool,
}

impl App {
    /// Create the app and kick off the four initial fetches. They complete
    /// in any order; each renders to its own panel.
    #[must_use]
    pub fn new(api: ApiClient) -> Self {
        let (tx, rx) = mpsc::channel();
        fetch::spawn_initial_fetches(&api, &tx);
        Self {
            api,
            tx,
            rx,
            charts: Charts::default(),
            map: MapState::default(),
            workflow: AnalysisWorkflow::default(),
            recommendations: Vec::new(),
            focus: FocusPanel::Map,
            rec_scroll: 0,
            draw_tool: DrawTool::None,
            tick: 0,
            should_quit: false,
        }
    }

    pub fn run(mut self, mut terminal: DefaultTerminal) -> Result<()> {
        while !self.should_quit {
            self.drain_fetch_events();
            terminal.draw(|frame| self.draw(frame))?;
            self.handle_input()?;
            self.tick = self.tick.wrapping_add(1);
        }
        Ok(())
    }

    fn draw(&self, frame: &mut Frame) {
        super::dashboard::draw_dashboard(frame, self);
    }

    /// Apply every completed fetch. All state mutation stays on this thread.
    fn drain_fetch_events(&mut self) {
        while let Ok(event) = self.rx.try_recv() {
            self.apply_fetch_event(event);
        }
    }

    pub fn apply_fetch_event(&mut self, event: FetchEvent) {
        match event {
            FetchEvent::Solar(Ok(records)) => self.apply_solar(&records),
            FetchEvent::Carbon(Ok(records)) => self.charts.update_carbon(&records),
            FetchEvent::Recommendations(Ok(items)) => {
                // Wholesale replace, no diffing.
                self.recommendations = items;
                self.rec_scroll = 0;
            }
            FetchEvent::GreenZones(Ok(zones)) => self.apply_green_zones(&zones),
            // Page-load fetch failures stay on the diagnostic channel only;
            // their panels simply keep their placeholder.
            FetchEvent::Solar(Err(err)) => warn!(error = %err, "solar fetch failed"),
            FetchEvent::Carbon(Err(err)) => warn!(error = %err, "carbon fetch failed"),
            FetchEvent::Recommendations(Err(err)) => {
                warn!(error = %err, "recommendations fetch failed");
            }
            FetchEvent::GreenZones(Err(err)) => warn!(error = %err, "green-zones fetch failed"),
            FetchEvent::Analysis { seq, result } => {
                if let Some(points) = self.workflow.complete(seq, result) {
                    self.map.set_grid(points);
                }
            }
        }
    }

    fn apply_solar(&mut self, records: &[BuildingMetric]) {
        for record in records {
            if let (Some(lat), Some(lon)) = (record.lat, record.lon) {
                self.map
                    .add_marker(lat, lon, &record.building, MarkerKind::Building);
            }
        }
        self.charts.update_energy(records);
    }

    fn apply_green_zones(&mut self, zones: &[GreenZone]) {
        for zone in zones {
            self.map.add_marker(
                zone.latitude,
                zone.longitude,
                "Green zone",
                MarkerKind::GreenZone,
            );
        }
    }

    fn handle_input(&mut self) -> Result<()> {
        // Short poll so fetch completions and the spinner stay live while
        // the user is idle.
        if !event::poll(Duration::from_millis(100))? {
            return Ok(());
        }
        if let Event::Key(key) = event::read()? {
            if key.kind != KeyEventKind::Press {
                return Ok(());
            }
            self.handle_key(key.code);
        }
        Ok(())
    }

    pub fn handle_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Char('q') => self.should_quit = true,
            KeyCode::Esc => {
                if self.draw_tool == DrawTool::None {
                    self.should_quit = true;
                } else {
                    self.draw_tool = DrawTool::None;
                }
            }
            KeyCode::Tab => {
                self.focus = match self.focus {
                    FocusPanel::Map => FocusPanel::Recommendations,
                    FocusPanel::Recommendations => FocusPanel::Map,
                };
            }
            _ => match self.focus {
                FocusPanel::Map => self.handle_map_key(code),
                FocusPanel::Recommendations => self.handle_recommendations_key(code),
            },
        }
    }

    fn handle_map_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => self.map.move_cursor(1, 0),
            KeyCode::Down | KeyCode::Char('j') => self.map.move_cursor(-1, 0),
            KeyCode::Left | KeyCode::Char('h') => self.map.move_cursor(0, -1),
            KeyCode::Right | KeyCode::Char('l') => self.map.move_cursor(0, 1),
            KeyCode::Char('+' | '=') => self.map.zoom_in(),
            KeyCode::Char('-') => self.map.zoom_out(),
            KeyCode::Char('r') => {
                self.draw_tool = DrawTool::Rectangle {
                    anchor: self.map.cursor,
                };
            }
            KeyCode::Char('p') => self.add_polygon_vertex(),
            KeyCode::Enter => self.complete_shape(),
            KeyCode::Char('x') | KeyCode::Delete => self.delete_shape(),
            _ => {}
        }
    }

    fn handle_recommendations_key(&mut self, code: KeyCode) {
        match code {
            KeyCode::Up | KeyCode::Char('k') => {
                self.rec_scroll = self.rec_scroll.saturating_sub(1);
            }
            KeyCode::Down | KeyCode::Char('j') => {
                let max = self.recommendations.len().saturating_sub(1);
                if self.rec_scroll < max {
                    self.rec_scroll += 1;
                }
            }
            _ => {}
        }
    }

    fn add_polygon_vertex(&mut self) {
        let cursor = self.map.cursor;
        match &mut self.draw_tool {
            DrawTool::Polygon { vertices } => vertices.push(cursor),
            _ => {
                self.draw_tool = DrawTool::Polygon {
                    vertices: vec![cursor],
                };
            }
        }
    }

    /// Finish the pending draw: replace the drawn shape, derive its bounding
    /// box and start a region-analysis request under a fresh sequence token.
    fn complete_shape(&mut self) {
        let shape = match std::mem::replace(&mut self.draw_tool, DrawTool::None) {
            DrawTool::None => return,
            DrawTool::Rectangle { anchor } => DrawnShape::rectangle(anchor, self.map.cursor),
            DrawTool::Polygon { vertices } => match DrawnShape::polygon(vertices) {
                Some(shape) => shape,
                None => return, // fewer than 3 vertices, nothing to analyze
            },
        };

        let bbox = shape.bounding_box();
        self.map.set_shape(shape);
        let seq = self.workflow.begin();
        fetch::spawn_analysis(&self.api, &self.tx, seq, bbox);
    }

    /// Explicit reset: clears the drawn shape and grid layers and returns the
    /// workflow to idle (hides the summary panel).
    fn delete_shape(&mut self) {
        self.draw_tool = DrawTool::None;
        self.map.clear_shape();
        self.workflow.reset();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{AnalysisResponse, GridPoint, Recommendation, RegionSummary};
    use crate::workflow::AnalysisState;
    use pretty_assertions::assert_eq;

    fn app() -> App {
        App::new(ApiClient::new("http://127.0.0.1:5000").unwrap())
    }

    fn metric(building: &str, energy: f64, coords: Option<(f64, f64)>) -> BuildingMetric {
        BuildingMetric {
            building: building.to_string(),
            predicted_energy_kwh: Some(energy),
            carbon_saved_kg: None,
            lat: coords.map(|c| c.0),
            lon: coords.map(|c| c.1),
        }
    }

    fn analysis_response() -> AnalysisResponse {
        AnalysisResponse {
            grid_points: vec![GridPoint {
                lat: 23.075,
                lon: 72.505,
                recommendation: Recommendation::Solar,
            }],
            summary: RegionSummary {
                main_rec: "Add solar panels".to_string(),
                avg_solar: 120.5,
                tree_count: 3,
                build_score: 7.2,
            },
        }
    }

    #[test]
    fn solar_records_with_coordinates_become_markers() {
        let mut app = app();
        app.apply_fetch_event(FetchEvent::Solar(Ok(vec![
            metric("Main Block", 120.5, Some((23.078, 72.501))),
            metric("Annex", 60.0, None),
        ])));
        assert_eq!(app.map.markers().len(), 1);
        assert_eq!(app.map.markers()[0].label, "Main Block");
        assert_eq!(app.charts.energy.as_ref().unwrap().labels.len(), 2);
    }

    #[test]
    fn failed_initial_fetch_leaves_panels_untouched() {
        let mut app = app();
        app.apply_fetch_event(FetchEvent::Solar(Err(crate::error::ApiError::Server {
            url: "http://127.0.0.1:5000/solar".to_string(),
            status: 500,
        })));
        assert!(app.charts.energy.is_none());
        assert!(app.map.markers().is_empty());
    }

    #[test]
    fn recommendations_replace_wholesale() {
        let mut app = app();
        app.apply_fetch_event(FetchEvent::Recommendations(Ok(vec![
            "old item".to_string(),
        ])));
        app.rec_scroll = 1;
        app.apply_fetch_event(FetchEvent::Recommendations(Ok(vec![
            "Plant 50 Neem trees".to_string(),
            "Optimize solar tilt".to_string(),
        ])));
        assert_eq!(app.recommendations.len(), 2);
        assert_eq!(app.rec_scroll, 0);
    }

    #[test]
    fn rectangle_draw_starts_analysis_and_replaces_shape() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Enter);

        assert!(app.map.drawn_shape().is_some());
        assert!(app.workflow.is_loading());
        assert_eq!(app.draw_tool, DrawTool::None);

        // Drawing again still leaves exactly one shape.
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Down);
        app.handle_key(KeyCode::Enter);
        assert!(app.map.drawn_shape().is_some());
    }

    #[test]
    fn degenerate_polygon_is_not_committed() {
        let mut app = app();
        app.handle_key(KeyCode::Char('p'));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('p'));
        app.handle_key(KeyCode::Enter);

        assert!(app.map.drawn_shape().is_none());
        assert_eq!(*app.workflow.state(), AnalysisState::Idle);
    }

    #[test]
    fn polygon_draw_commits_with_three_vertices() {
        let mut app = app();
        app.handle_key(KeyCode::Char('p'));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Char('p'));
        app.handle_key(KeyCode::Up);
        app.handle_key(KeyCode::Char('p'));
        app.handle_key(KeyCode::Enter);

        assert!(matches!(app.map.drawn_shape(), Some(DrawnShape::Polygon(v)) if v.len() == 3));
        assert!(app.workflow.is_loading());
    }

    #[test]
    fn analysis_response_renders_grid_and_summary() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Enter);

        // Only one analysis request was issued, so its token is the latest.
        app.apply_fetch_event(FetchEvent::Analysis {
            seq: 1,
            result: Ok(analysis_response()),
        });

        assert_eq!(app.map.grid().len(), 1);
        assert_eq!(app.map.grid()[0].lat, 23.075);
        assert!(matches!(app.workflow.state(), AnalysisState::Rendered(_)));
    }

    #[test]
    fn stale_analysis_response_does_not_render() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Enter); // seq 1
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Enter); // seq 2

        app.apply_fetch_event(FetchEvent::Analysis {
            seq: 1,
            result: Ok(analysis_response()),
        });
        assert!(app.map.grid().is_empty());
        assert!(app.workflow.is_loading());
    }

    #[test]
    fn delete_clears_shape_grid_and_summary() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Right);
        app.handle_key(KeyCode::Enter);
        app.apply_fetch_event(FetchEvent::Analysis {
            seq: 1,
            result: Ok(analysis_response()),
        });

        app.handle_key(KeyCode::Char('x'));
        assert!(app.map.drawn_shape().is_none());
        assert!(app.map.grid().is_empty());
        assert_eq!(*app.workflow.state(), AnalysisState::Idle);
    }

    #[test]
    fn late_response_after_delete_cannot_repopulate_grid() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Enter); // seq 1
        app.handle_key(KeyCode::Char('x'));

        app.apply_fetch_event(FetchEvent::Analysis {
            seq: 1,
            result: Ok(analysis_response()),
        });
        assert!(app.map.grid().is_empty());
        assert_eq!(*app.workflow.state(), AnalysisState::Idle);
    }

    #[test]
    fn esc_cancels_pending_draw_before_quitting() {
        let mut app = app();
        app.handle_key(KeyCode::Char('r'));
        app.handle_key(KeyCode::Esc);
        assert_eq!(app.draw_tool, DrawTool::None);
        assert!(!app.should_quit);

        app.handle_key(KeyCode::Esc);
        assert!(app.should_quit);
    }
}
