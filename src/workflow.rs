//! Region-analysis workflow state machine.
//!
//! Draw -> request -> render -> reset, with monotonically increasing sequence
//! tokens so a response from a superseded request can never overwrite a newer
//! one (or repopulate a map the user already cleared). A failed request lands
//! in an explicit `Failed` state instead of leaving the loading indicator
//! stuck.

use tracing::{debug, warn};

use crate::error::ApiError;
use crate::model::{AnalysisResponse, GridPoint, RegionSummary};

/// Observable workflow state, rendered directly by the analysis panel.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisState {
    /// No analysis requested; panel shows a drawing hint.
    Idle,
    /// Request in flight; loading indicator visible.
    Loading,
    /// Latest request succeeded; summary panel visible.
    Rendered(RegionSummary),
    /// Latest request failed; error banner visible, indicator cleared.
    Failed(String),
}

/// Owns the state plus the token of the latest request issued.
#[derive(Debug)]
pub struct AnalysisWorkflow {
    state: AnalysisState,
    latest_seq: u64,
}

impl Default for AnalysisWorkflow {
    fn default() -> Self {
        Self {
            state: AnalysisState::Idle,
            latest_seq: 0,
        }
    }
}

impl AnalysisWorkflow {
    #[must_use]
    pub fn state(&self) -> &AnalysisState {
        &self.state
    }

    #[must_use]
    pub fn is_loading(&self) -> bool {
        self.state == AnalysisState::Loading
    }

    /// Enter `Loading` and issue a fresh sequence token for the request about
    /// to be spawned. Any earlier in-flight request becomes stale.
    pub fn begin(&mut self) -> u64 {
        self.latest_seq += 1;
        self.state = AnalysisState::Loading;
        debug!(seq = self.latest_seq, "analysis request issued");
        self.latest_seq
    }

    /// Apply a completed request. Returns the grid points to install in the
    /// map layer, or `None` when the response was stale or failed.
    pub fn complete(
        &mut self,
        seq: u64,
        result: Result<AnalysisResponse, ApiError>,
    ) -> Option<Vec<GridPoint>> {
        if seq != self.latest_seq {
            debug!(seq, latest = self.latest_seq, "dropping stale analysis response");
            return None;
        }
        match result {
            Ok(response) => {
                self.state = AnalysisState::Rendered(response.summary);
                Some(response.grid_points)
            }
            Err(err) => {
                warn!(error = %err, "region analysis failed");
                self.state = AnalysisState::Failed(err.to_string());
                None
            }
        }
    }

    /// Explicit user reset (shape deleted). Returns to `Idle` and invalidates
    /// any in-flight token so its late response is dropped.
    pub fn reset(&mut self) {
        self.latest_seq += 1;
        self.state = AnalysisState::Idle;
    }
}
