//! # ecoscope
//!
//! A terminal dashboard for campus sustainability metrics.
//!
//! ## Features
//!
//! - Per-building solar potential and carbon savings charts
//! - Map pane with building and green-zone markers
//! - Draw a rectangle or polygon to request a server-side region analysis
//!   (colored grid of SOLAR/TREE/other scores plus a summary)
//! - Export fetched metrics to CSV and JSON
//!
//! All data comes from an external REST backend; this crate only fetches and
//! renders. Network calls run on short-lived worker threads and report back
//! to the single UI thread over a channel.
//!
//! ## Example
//!
//! ```no_run
//! use ecoscope::api::ApiClient;
//!
//! let api = ApiClient::new("http://127.0.0.1:5000").expect("client");
//! let metrics = api.solar().expect("backend reachable");
//! println!("{} buildings", metrics.len());
//! ```

pub mod api;
pub mod chart;
pub mod error;
pub mod export;
pub mod fetch;
pub mod map;
pub mod model;
pub mod ui;
pub mod workflow;
