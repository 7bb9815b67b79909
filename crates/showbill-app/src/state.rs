// Copyright 2026 Phillip Cloud
// Licensed under the Apache License, Version 2.0

/// Fetch lifecycle for the primary record set. Failed is terminal: the
/// caller surfaces one message and does not retry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum FetchPhase {
    #[default]
    Idle,
    Loading,
    Ready {
        from_fallback: bool,
    },
    Failed,
}

impl FetchPhase {
    /// Idle -> Loading. Returns false (and leaves the phase alone) for any
    /// other starting point.
    pub fn start(&mut self) -> bool {
        if *self == Self::Idle {
            *self = Self::Loading;
            true
        } else {
            false
        }
    }

    /// Loading -> Ready. Records whether the data came from the fallback
    /// snapshot rather than the primary source.
    pub fn succeed(&mut self, from_fallback: bool) -> bool {
        if *self == Self::Loading {
            *self = Self::Ready { from_fallback };
            true
        } else {
            false
        }
    }

    /// Loading -> Failed.
    pub fn fail(&mut self) -> bool {
        if *self == Self::Loading {
            *self = Self::Failed;
            true
        } else {
            false
        }
    }

    pub fn is_loading(&self) -> bool {
        *self == Self::Loading
    }

    pub fn is_settled(&self) -> bool {
        matches!(self, Self::Ready { .. } | Self::Failed)
    }

    /// True only once the fetch settled on the fallback snapshot.
    pub fn served_from_fallback(&self) -> bool {
        matches!(
            self,
            Self::Ready {
                from_fallback: true
            }
        )
    }
}

/// Modal lifecycle: Closed -> Open -> Closed. Close is idempotent so the
/// close button, a backdrop click, and Escape can all funnel into it.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum ModalPhase {
    #[default]
    Closed,
    Open {
        ident: String,
    },
}

impl ModalPhase {
    /// Opening replaces any modal already showing.
    pub fn open(&mut self, ident: impl Into<String>) {
        *self = Self::Open {
            ident: ident.into(),
        };
    }

    /// Returns true only on the transition that actually closed something.
    pub fn close(&mut self) -> bool {
        if matches!(self, Self::Open { .. }) {
            *self = Self::Closed;
            true
        } else {
            false
        }
    }

    pub fn open_ident(&self) -> Option<&str> {
        match self {
            Self::Open { ident } => Some(ident),
            Self::Closed => None,
        }
    }
}
