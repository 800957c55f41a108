// src/lib.rs

//! Terminal client for the EmoLetr emotion-analysis service.
//!
//! Text or a `.txt`/`.pdf` file is submitted to `POST /api/analyze`, the
//! structured result is rendered in a ratatui interface, and transient
//! notifications report every outcome.

rust_i18n::i18n!("locales", fallback = "en");

pub mod app;
pub mod config;
pub mod core;
pub mod event;
pub mod logging;
pub mod ui;
