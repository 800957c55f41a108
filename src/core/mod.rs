// src/core/mod.rs

// Everything that does not draw on the terminal lives under `core`: the wire
// models, the HTTP client, the submission flow and the pieces of state the UI
// owns (notifications, preferences).

/// Requests, results and wire responses of the analysis service.
pub mod models;

/// The `AnalysisApi` seam and its reqwest implementation.
pub mod api;

/// Turns prompt input into analysis requests.
pub mod input;

/// Runs one submission and classifies its outcome.
pub mod dispatcher;

/// Pure conversion of an analysis result into display sections.
pub mod renderer;

pub mod notification;

/// Startup health and configuration probes.
pub mod health;

pub mod export;
pub mod preferences;
