//! Morph transition state machine — a tapped card grows into a full-screen
//! detail surface and shrinks back into the same rect.
//!
//! The machine is driven entirely by lifecycle callbacks from the host
//! (tap, "surface appeared", dismiss gesture, "surface disappeared"); there
//! is no timer.  Every call that does not fit the current phase is rejected
//! with a [`TransitionError`] and leaves the machine untouched.
//!
//! ```text
//!   Idle ──open(r)──▶ Opening(r) ──finish_opening──▶ Expanded(r)
//!    ▲                                                  │
//!    └──finish_collapse── Closing(r) ◀──begin_collapse(r)┘
//! ```

use thiserror::Error;

use super::geometry::{Point, Rect, Size};

// ───────────────────────────────────────── public state ──────

/// What the renderer sees: either the detail surface is pinned to the
/// source rect, or it sits at its natural (full) position.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum TransitionState {
    Collapsed { source_rect: Rect },
    Expanded,
}

/// Size/position overrides applied to the detail surface.
/// `None` means "no override, use the natural layout".
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct DetailGeometry {
    pub size: Option<Size>,
    pub center: Option<Point>,
}

impl DetailGeometry {
    /// Resolve the overrides against the surface's natural rect.
    pub fn resolve(&self, natural: Rect) -> Rect {
        let size = self.size.unwrap_or_else(|| natural.size());
        let center = self.center.unwrap_or_else(|| natural.center());
        Rect::from_center(center, size)
    }
}

impl TransitionState {
    /// Geometry of the detail surface as a pure function of state.
    pub fn geometry(&self) -> DetailGeometry {
        match self {
            TransitionState::Collapsed { source_rect } => DetailGeometry {
                size: Some(source_rect.size()),
                center: Some(source_rect.center()),
            },
            TransitionState::Expanded => DetailGeometry::default(),
        }
    }
}

// ───────────────────────────────────────── internal phase ────

/// Full internal phase.  The two `Collapsed` occurrences are kept apart so
/// `finish_opening` and `finish_collapse` can each be validated, and the
/// tapped rect rides along by value through every non-idle phase.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub enum Phase {
    #[default]
    Idle,
    Opening { source: Rect },
    Expanded { source: Rect },
    Closing { source: Rect },
}

impl Phase {
    fn name(&self) -> &'static str {
        match self {
            Phase::Idle => "idle",
            Phase::Opening { .. } => "opening",
            Phase::Expanded { .. } => "expanded",
            Phase::Closing { .. } => "closing",
        }
    }
}

/// The four lifecycle operations, named for error reporting.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Operation {
    Open,
    FinishOpening,
    BeginCollapse,
    FinishCollapse,
}

impl std::fmt::Display for Operation {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let s = match self {
            Operation::Open => "open",
            Operation::FinishOpening => "finish_opening",
            Operation::BeginCollapse => "begin_collapse",
            Operation::FinishCollapse => "finish_collapse",
        };
        f.write_str(s)
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Error)]
pub enum TransitionError {
    #[error("{op} is not valid while {from}")]
    InvalidTransition { op: Operation, from: &'static str },
    #[error("{op} rejected a degenerate source rect {rect:?}")]
    DegenerateRect { op: Operation, rect: Rect },
}

// ───────────────────────────────────────── capability ────────

/// The write side of a morph transition, as seen by a presentation layer.
pub trait MorphTransition {
    fn open(&mut self, source_rect: Rect) -> Result<(), TransitionError>;
    fn finish_opening(&mut self) -> Result<(), TransitionError>;
    fn begin_collapse(&mut self, source_rect: Rect) -> Result<(), TransitionError>;
    fn finish_collapse(&mut self) -> Result<(), TransitionError>;
}

// ───────────────────────────────────────── controller ────────

#[derive(Debug, Clone, Default)]
pub struct TransitionController {
    phase: Phase,
}

impl TransitionController {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn phase(&self) -> Phase {
        self.phase
    }

    /// Current state, or `None` while idle.
    pub fn state(&self) -> Option<TransitionState> {
        match self.phase {
            Phase::Idle => None,
            Phase::Opening { source } | Phase::Closing { source } => {
                Some(TransitionState::Collapsed {
                    source_rect: source,
                })
            }
            Phase::Expanded { .. } => Some(TransitionState::Expanded),
        }
    }

    pub fn is_idle(&self) -> bool {
        self.phase == Phase::Idle
    }

    /// Whether the host should keep the detail surface mounted.
    pub fn is_presenting(&self) -> bool {
        !self.is_idle()
    }

    /// The rect captured by the last `open`, kept by value until the
    /// machine returns to idle.
    pub fn preserved_source(&self) -> Option<Rect> {
        match self.phase {
            Phase::Idle => None,
            Phase::Opening { source } | Phase::Expanded { source } | Phase::Closing { source } => {
                Some(source)
            }
        }
    }

    /// Geometry overrides for the detail surface, `None` while idle.
    pub fn geometry(&self) -> Option<DetailGeometry> {
        self.state().map(|s| s.geometry())
    }

    /// `begin_collapse` with the rect preserved from `open`.
    pub fn dismiss(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Expanded { source } => self.begin_collapse(source),
            other => Err(self.reject(Operation::BeginCollapse, other)),
        }
    }

    fn reject(&self, op: Operation, from: Phase) -> TransitionError {
        tracing::debug!(%op, from = from.name(), "ignoring invalid transition");
        TransitionError::InvalidTransition {
            op,
            from: from.name(),
        }
    }

    fn check_rect(op: Operation, rect: Rect) -> Result<(), TransitionError> {
        if rect.is_well_formed() && !rect.is_empty() {
            Ok(())
        } else {
            Err(TransitionError::DegenerateRect { op, rect })
        }
    }
}

impl MorphTransition for TransitionController {
    fn open(&mut self, source_rect: Rect) -> Result<(), TransitionError> {
        if self.phase != Phase::Idle {
            return Err(self.reject(Operation::Open, self.phase));
        }
        Self::check_rect(Operation::Open, source_rect)?;
        self.phase = Phase::Opening {
            source: source_rect,
        };
        tracing::debug!(?source_rect, "transition: open");
        Ok(())
    }

    fn finish_opening(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Opening { source } => {
                self.phase = Phase::Expanded { source };
                tracing::debug!("transition: expanded");
                Ok(())
            }
            other => Err(self.reject(Operation::FinishOpening, other)),
        }
    }

    fn begin_collapse(&mut self, source_rect: Rect) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Expanded { .. } => {
                Self::check_rect(Operation::BeginCollapse, source_rect)?;
                self.phase = Phase::Closing {
                    source: source_rect,
                };
                tracing::debug!(?source_rect, "transition: begin collapse");
                Ok(())
            }
            other => Err(self.reject(Operation::BeginCollapse, other)),
        }
    }

    fn finish_collapse(&mut self) -> Result<(), TransitionError> {
        match self.phase {
            Phase::Closing { .. } => {
                self.phase = Phase::Idle;
                tracing::debug!("transition: idle");
                Ok(())
            }
            other => Err(self.reject(Operation::FinishCollapse, other)),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn card() -> Rect {
        Rect::new(0.0, 100.0, 300.0, 350.0)
    }

    #[test]
    fn open_then_finish_opening_expands() {
        let mut c = TransitionController::new();
        assert_eq!(c.state(), None);
        c.open(card()).unwrap();
        assert_eq!(
            c.state(),
            Some(TransitionState::Collapsed {
                source_rect: card()
            })
        );
        c.finish_opening().unwrap();
        assert_eq!(c.state(), Some(TransitionState::Expanded));
        assert!(c.open(Rect::new(1.0, 1.0, 1.0, 1.0)).is_err());
        assert_eq!(c.preserved_source(), Some(card()));
    }

    #[test]
    fn open_is_rejected_until_collapse_finishes() {
        let mut c = TransitionController::new();
        c.open(card()).unwrap();
        assert!(c.open(Rect::new(5.0, 5.0, 5.0, 5.0)).is_err());
        c.finish_opening().unwrap();
        c.dismiss().unwrap();
        assert!(c.open(Rect::new(5.0, 5.0, 5.0, 5.0)).is_err());
        c.finish_collapse().unwrap();
        assert!(c.is_idle());
        c.open(Rect::new(5.0, 5.0, 5.0, 5.0)).unwrap();
    }

    #[test]
    fn collapse_reproduces_opening_geometry() {
        let mut c = TransitionController::new();
        let r = card();
        c.open(r).unwrap();
        let opening = c.geometry().unwrap();
        c.finish_opening().unwrap();
        // The host resizes; the preserved rect is not re-measured.
        let preserved = c.preserved_source().unwrap();
        c.begin_collapse(preserved).unwrap();
        assert_eq!(c.geometry().unwrap(), opening);
        assert_eq!(
            c.state(),
            Some(TransitionState::Collapsed { source_rect: r })
        );
    }

    #[test]
    fn invalid_calls_are_noops() {
        let mut c = TransitionController::new();
        assert!(matches!(
            c.finish_opening(),
            Err(TransitionError::InvalidTransition { op: Operation::FinishOpening, from: "idle" })
        ));
        assert!(c.finish_collapse().is_err());
        assert!(c.dismiss().is_err());
        assert!(c.is_idle());

        c.open(card()).unwrap();
        assert!(c.finish_collapse().is_err());
        assert!(c.begin_collapse(card()).is_err());
        c.finish_opening().unwrap();
        assert!(c.finish_opening().is_err());
        assert_eq!(c.phase(), Phase::Expanded { source: card() });

        c.dismiss().unwrap();
        assert!(c.finish_opening().is_err());
        assert_eq!(c.phase(), Phase::Closing { source: card() });
    }

    #[test]
    fn degenerate_rects_never_enter_the_machine() {
        let mut c = TransitionController::new();
        assert!(matches!(
            c.open(Rect::default()),
            Err(TransitionError::DegenerateRect { .. })
        ));
        assert!(c.is_idle());

        c.open(card()).unwrap();
        c.finish_opening().unwrap();
        assert!(c.begin_collapse(Rect::default()).is_err());
        assert_eq!(c.preserved_source(), Some(card()));
    }

    #[test]
    fn geometry_follows_state() {
        let collapsed = TransitionState::Collapsed {
            source_rect: Rect::new(10.0, 20.0, 100.0, 50.0),
        };
        let g = collapsed.geometry();
        assert_eq!(g.center, Some(Point::new(60.0, 45.0)));
        assert_eq!(g.size, Some(Size::new(100.0, 50.0)));

        let g = TransitionState::Expanded.geometry();
        assert_eq!(g, DetailGeometry::default());
        let natural = Rect::new(0.0, 0.0, 80.0, 24.0);
        assert_eq!(g.resolve(natural), natural);
    }

    #[test]
    fn end_to_end_card_round_trip() {
        let mut c = TransitionController::new();
        let r = card();
        c.open(r).unwrap();
        assert_eq!(c.state(), Some(TransitionState::Collapsed { source_rect: r }));
        c.finish_opening().unwrap();
        assert_eq!(c.state(), Some(TransitionState::Expanded));
        c.begin_collapse(r).unwrap();
        assert_eq!(c.state(), Some(TransitionState::Collapsed { source_rect: r }));
        c.finish_collapse().unwrap();
        assert_eq!(c.state(), None);
        assert!(!c.is_presenting());
    }
}
