// src/ui/widgets/mod.rs

pub mod analysis_view; // The rendered analysis result.
pub mod footer;        // Key hints for the current prompt.
pub mod input;         // Text / file prompt and the submission control.
pub mod notification;  // The single transient notification.
pub mod status;        // Service status and last-analysis metadata.
