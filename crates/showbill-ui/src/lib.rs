// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

pub mod card;
pub mod controller;
pub mod grid;
pub mod html;
pub mod modal;

pub use card::Card;
pub use controller::{
    AnalyticsEvent, AnalyticsSink, Controller, DebounceTimer, DetailSource, Effect, InputEvent,
    NoDetail, NoopAnalytics,
};
pub use grid::{render_active_tags, render_grid, render_results_count};
pub use html::{escape_html, safe_image_url, safe_link_url};
pub use modal::{Modal, ModalFact, render_modal};
