// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

use anyhow::Result;
use showbill_app::{FilterState, ModalPhase, Record, apply};
use std::time::{Duration, Instant};

pub const DEBOUNCE_WINDOW: Duration = Duration::from_millis(300);

/// Cancellable trailing-edge timer. Each arm() cancels the pending value
/// and restarts the window; the value only comes out of fire_due() once the
/// window has fully elapsed with no further arms.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct DebounceTimer {
    pending: Option<(Instant, String)>,
}

impl DebounceTimer {
    pub fn arm(&mut self, value: impl Into<String>, now: Instant) {
        self.pending = Some((now, value.into()));
    }

    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }

    pub fn cancel(&mut self) {
        self.pending = None;
    }

    /// Yields the settled value at most once per arm.
    pub fn fire_due(&mut self, now: Instant) -> Option<String> {
        let due = self
            .pending
            .as_ref()
            .is_some_and(|(armed_at, _)| now.duration_since(*armed_at) >= DEBOUNCE_WINDOW);
        if due {
            self.pending.take().map(|(_, value)| value)
        } else {
            None
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum AnalyticsEvent {
    SearchApplied { term: String },
    TagToggled { tag: String, selected: bool },
    FiltersCleared,
    ModalOpened { ident: String },
}

/// Fire-and-forget analytics collaborator. The default no-op sink means
/// filtering and rendering never block on, or fail because of, analytics.
pub trait AnalyticsSink {
    fn track(&self, event: &AnalyticsEvent);
}

pub struct NoopAnalytics;

impl AnalyticsSink for NoopAnalytics {
    fn track(&self, _event: &AnalyticsEvent) {}
}

/// Secondary per-record lookup performed when a modal opens (the pokedex
/// species/flavor-text fetch). Failures are scoped to the modal.
pub trait DetailSource {
    fn fetch_detail(&mut self, ident: &str) -> Result<Option<String>>;
}

/// Records that need no secondary lookup (the shows variant).
pub struct NoDetail;

impl DetailSource for NoDetail {
    fn fetch_detail(&mut self, _ident: &str) -> Result<Option<String>> {
        Ok(None)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InputEvent {
    /// A keystroke in the search box; debounced, trailing edge only.
    SearchInput { value: String, at: Instant },
    /// Clock advance; fires a due debounce window.
    Tick { at: Instant },
    /// Category checkbox change; applied immediately.
    ToggleTag(String),
    DropdownToggle,
    /// Click whose target is outside both the trigger and the panel.
    OutsideClick,
    ClearFilters,
    /// Click delegated from anywhere inside a card.
    CardClick(String),
    BackdropClick,
    /// Click inside the dialog body; never a dismissal.
    DialogClick,
    CloseButton,
    EscapeKey,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Effect {
    /// The filtered view changed; the shell re-renders the grid fragment.
    RenderGrid,
    /// Replace (not push) the `q` query parameter with this term.
    SyncQuery(String),
    OpenModal { ident: String, detail: Option<String> },
    CloseModal,
}

/// Owns the session's record set and all interaction state, and turns
/// input events into render/modal effects.
pub struct Controller<R: Record> {
    records: Vec<R>,
    filter: FilterState,
    debounce: DebounceTimer,
    modal: ModalPhase,
    dropdown_open: bool,
    escape_listeners: usize,
    analytics: Box<dyn AnalyticsSink>,
}

impl<R: Record> Controller<R> {
    pub fn new(records: Vec<R>) -> Self {
        Self::with_analytics(records, Box::new(NoopAnalytics))
    }

    pub fn with_analytics(records: Vec<R>, analytics: Box<dyn AnalyticsSink>) -> Self {
        Self {
            records,
            filter: FilterState::default(),
            debounce: DebounceTimer::default(),
            modal: ModalPhase::default(),
            dropdown_open: false,
            escape_listeners: 0,
            analytics,
        }
    }

    /// Applies the startup `q` parameter before the first render.
    pub fn seed_query(&mut self, query: Option<&str>) {
        self.filter = FilterState::seeded(query);
    }

    pub fn filter(&self) -> &FilterState {
        &self.filter
    }

    pub fn view(&self) -> Vec<&R> {
        apply(&self.records, &self.filter)
    }

    pub fn record_by_ident(&self, ident: &str) -> Option<&R> {
        self.records.iter().find(|record| record.ident() == ident)
    }

    pub fn modal(&self) -> &ModalPhase {
        &self.modal
    }

    pub fn dropdown_open(&self) -> bool {
        self.dropdown_open
    }

    /// Document-level key listeners currently registered by the modal.
    /// Invariant: never more than one, regardless of open/close cycles.
    pub fn escape_listeners(&self) -> usize {
        self.escape_listeners
    }

    pub fn dispatch(&mut self, event: InputEvent, detail: &mut dyn DetailSource) -> Vec<Effect> {
        match event {
            InputEvent::SearchInput { value, at } => {
                self.debounce.arm(value, at);
                Vec::new()
            }
            InputEvent::Tick { at } => match self.debounce.fire_due(at) {
                Some(value) => {
                    self.filter.set_search(&value);
                    let term = self.filter.search().to_owned();
                    self.analytics
                        .track(&AnalyticsEvent::SearchApplied { term: term.clone() });
                    vec![Effect::SyncQuery(term), Effect::RenderGrid]
                }
                None => Vec::new(),
            },
            InputEvent::ToggleTag(tag) => {
                let selected = self.filter.toggle_tag(&tag);
                self.analytics
                    .track(&AnalyticsEvent::TagToggled { tag, selected });
                vec![Effect::RenderGrid]
            }
            InputEvent::DropdownToggle => {
                self.dropdown_open = !self.dropdown_open;
                Vec::new()
            }
            InputEvent::OutsideClick => {
                self.dropdown_open = false;
                Vec::new()
            }
            InputEvent::ClearFilters => {
                self.debounce.cancel();
                self.filter.clear();
                self.analytics.track(&AnalyticsEvent::FiltersCleared);
                vec![Effect::SyncQuery(String::new()), Effect::RenderGrid]
            }
            InputEvent::CardClick(ident) => self.open_modal(ident, detail),
            InputEvent::BackdropClick | InputEvent::CloseButton => self.close_modal(),
            InputEvent::EscapeKey => {
                if self.escape_listeners > 0 {
                    self.close_modal()
                } else {
                    Vec::new()
                }
            }
            InputEvent::DialogClick => Vec::new(),
        }
    }

    fn open_modal(&mut self, ident: String, detail: &mut dyn DetailSource) -> Vec<Effect> {
        if self.record_by_ident(&ident).is_none() {
            // Click landed outside any card; ignore.
            return Vec::new();
        }
        match detail.fetch_detail(&ident) {
            Ok(body) => {
                self.modal.open(ident.clone());
                self.escape_listeners = 1;
                self.analytics
                    .track(&AnalyticsEvent::ModalOpened { ident: ident.clone() });
                vec![Effect::OpenModal {
                    ident,
                    detail: body,
                }]
            }
            Err(_) => {
                // Secondary fetch failure stays scoped to the modal: the
                // grid is untouched and no spinner is left behind.
                self.modal.close();
                self.escape_listeners = 0;
                vec![Effect::CloseModal]
            }
        }
    }

    /// The single close operation shared by the close button, backdrop
    /// clicks, and Escape. Idempotent, and always deregisters the key
    /// listener the open registered.
    fn close_modal(&mut self) -> Vec<Effect> {
        self.escape_listeners = 0;
        if self.modal.close() {
            vec![Effect::CloseModal]
        } else {
            Vec::new()
        }
    }
}
