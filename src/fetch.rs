//! Background fetch plumbing.
//!
//! All network I/O runs on short-lived spawned threads; completions arrive on
//! an mpsc channel that the UI event loop drains. Only the UI thread ever
//! touches charts, map layers or workflow state.

use std::sync::mpsc::Sender;
use std::thread;

use crate::api::ApiClient;
use crate::error::ApiError;
use crate::model::{AnalysisResponse, BoundingBox, BuildingMetric, GreenZone};

/// A completed backend call, delivered to the UI thread.
#[derive(Debug)]
pub enum FetchEvent {
    Solar(Result<Vec<BuildingMetric>, ApiError>),
    Carbon(Result<Vec<BuildingMetric>, ApiError>),
    Recommendations(Result<Vec<String>, ApiError>),
    GreenZones(Result<Vec<GreenZone>, ApiError>),
    /// Region analysis result, tagged with the sequence token it was issued
    /// under so stale responses can be dropped.
    Analysis {
        seq: u64,
        result: Result<AnalysisResponse, ApiError>,
    },
}

/// Kick off the four independent page-load fetches. No ordering guarantee
/// between their completions and none is needed: they render to disjoint
/// targets.
pub fn spawn_initial_fetches(api: &ApiClient, tx: &Sender<FetchEvent>) {
    spawn(api, tx, |api| FetchEvent::Solar(api.solar()));
    spawn(api, tx, |api| FetchEvent::Carbon(api.carbon()));
    spawn(api, tx, |api| {
        FetchEvent::Recommendations(api.recommendations())
    });
    spawn(api, tx, |api| FetchEvent::GreenZones(api.green_zones()));
}

/// Kick off one region-analysis request under the given sequence token.
pub fn spawn_analysis(api: &ApiClient, tx: &Sender<FetchEvent>, seq: u64, bbox: BoundingBox) {
    spawn(api, tx, move |api| FetchEvent::Analysis {
        seq,
        result: api.analyze_region(&bbox),
    });
}

fn spawn<F>(api: &ApiClient, tx: &Sender<FetchEvent>, call: F)
where
    F: FnOnce(&ApiClient) -> FetchEvent + Send + 'static,
{
    let api = api.clone();
    let tx = tx.clone();
    thread::spawn(move || {
        // The receiver may be gone if the app quit mid-request.
        let _ = tx.send(call(&api));
    });
}
