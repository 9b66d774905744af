use std::time::Duration;

/// Default pause between section reveals (~1.2 s per section).
pub const DEFAULT_REVEAL_PERIOD: Duration = Duration::from_millis(1200);

/// Lifecycle of the cosmetic section reveal.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealState {
    Idle,
    Revealing { visible: usize },
    Complete,
}

/// Pacing strategy for the reveal.
///
/// `Immediate` shows everything at once; tests use it so assertions on final
/// content never wait on timers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RevealPacing {
    Immediate,
    Paced { period: Duration },
}

impl Default for RevealPacing {
    fn default() -> Self {
        Self::Paced {
            period: DEFAULT_REVEAL_PERIOD,
        }
    }
}

/// Timer-paced disclosure of already-fetched lesson sections.
///
/// The network call finishes before `begin` runs; this presenter only
/// emulates generation latency and carries no correctness contract beyond
/// its state transitions.
#[derive(Debug)]
pub struct RevealPresenter {
    state: RevealState,
    total: usize,
    pacing: RevealPacing,
}

impl RevealPresenter {
    #[must_use]
    pub fn new(pacing: RevealPacing) -> Self {
        Self {
            state: RevealState::Idle,
            total: 0,
            pacing,
        }
    }

    #[must_use]
    pub fn state(&self) -> RevealState {
        self.state
    }

    #[must_use]
    pub fn pacing(&self) -> RevealPacing {
        self.pacing
    }

    #[must_use]
    pub fn total_sections(&self) -> usize {
        self.total
    }

    /// Number of sections currently exposed: `[0, visible)` of the lesson's
    /// ordered section list.
    #[must_use]
    pub fn visible_sections(&self) -> usize {
        match self.state {
            RevealState::Idle => 0,
            RevealState::Revealing { visible } => visible,
            RevealState::Complete => self.total,
        }
    }

    #[must_use]
    pub fn is_revealing(&self) -> bool {
        matches!(self.state, RevealState::Revealing { .. })
    }

    #[must_use]
    pub fn is_complete(&self) -> bool {
        matches!(self.state, RevealState::Complete)
    }

    /// Start revealing `total` sections from zero, cancelling any reveal in
    /// flight for the previous lesson.
    pub fn begin(&mut self, total: usize) {
        self.cancel();
        self.total = total;
        self.state = match self.pacing {
            RevealPacing::Immediate => RevealState::Complete,
            RevealPacing::Paced { .. } if total == 0 => RevealState::Complete,
            RevealPacing::Paced { .. } => RevealState::Revealing { visible: 0 },
        };
    }

    /// Expose one more section. Returns `true` while further ticks are
    /// needed, so a driving timer knows when to stop.
    pub fn tick(&mut self) -> bool {
        if let RevealState::Revealing { visible } = self.state {
            let visible = visible + 1;
            self.state = if visible >= self.total {
                RevealState::Complete
            } else {
                RevealState::Revealing { visible }
            };
        }
        self.is_revealing()
    }

    /// Return to `Idle`, e.g. on unmount or lesson replacement.
    pub fn cancel(&mut self) {
        self.state = RevealState::Idle;
        self.total = 0;
    }

    /// Drive a paced reveal to completion.
    ///
    /// The loop exits as soon as the presenter leaves `Revealing`, so no
    /// timer outlives the reveal; with `Immediate` pacing this returns at
    /// once.
    pub async fn run(&mut self) {
        while let (RevealState::Revealing { .. }, RevealPacing::Paced { period }) =
            (self.state, self.pacing)
        {
            tokio::time::sleep(period).await;
            self.tick();
        }
    }
}

impl Default for RevealPresenter {
    fn default() -> Self {
        Self::new(RevealPacing::default())
    }
}

//
// ─── TESTS ─────────────────────────────────────────────────────────────────────
//
