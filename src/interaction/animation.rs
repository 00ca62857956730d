use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use indexmap::IndexMap;
use serde::{Deserialize, Serialize};
use smallvec::SmallVec;
use tracing::{debug, trace};

/// Length of one rescale transition in host time units.
pub const DEFAULT_ANIMATION_DURATION: f64 = 144.0;

/// Maps linear progress in `[0, 1]` to eased progress in `[0, 1]`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
pub enum Easing {
    /// `f(t) = t * t`.
    #[default]
    QuadIn,
    Linear,
}

impl Easing {
    #[must_use]
    pub fn apply(self, t: f64) -> f64 {
        let t = t.clamp(0.0, 1.0);
        match self {
            Self::QuadIn => t * t,
            Self::Linear => t,
        }
    }
}

/// Shared stop flag for one scheduled animation.
///
/// The animator checks it at the top of every tick, so a superseded or
/// externally cancelled animation never produces another frame.
#[derive(Debug, Clone, Default)]
pub struct CancellationToken {
    cancelled: Arc<AtomicBool>,
}

impl CancellationToken {
    pub fn cancel(&self) {
        self.cancelled.store(true, Ordering::Release);
    }

    #[must_use]
    pub fn is_cancelled(&self) -> bool {
        self.cancelled.load(Ordering::Acquire)
    }
}

/// Timing and endpoints of the active value transition.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationState {
    pub start_time: f64,
    pub duration: f64,
    pub from_value: f64,
    pub to_value: f64,
    pub easing: Easing,
    pub active: bool,
}

impl AnimationState {
    /// Linear progress at `now`, clamped to `[0, 1]`.
    #[must_use]
    pub fn progress(self, now: f64) -> f64 {
        if self.duration <= 0.0 || !self.duration.is_finite() {
            return 1.0;
        }
        let progress = (now - self.start_time) / self.duration;
        if progress.is_nan() {
            return 1.0;
        }
        progress.clamp(0.0, 1.0)
    }

    #[must_use]
    pub fn value_at(self, eased: f64) -> f64 {
        self.from_value + (self.to_value - self.from_value) * eased
    }
}

#[derive(Debug, Clone, PartialEq)]
struct OpacityTransition {
    series_id: String,
    from: f64,
    to: f64,
}

#[derive(Debug, Clone)]
struct RescaleAnimation {
    state: AnimationState,
    fades: SmallVec<[OpacityTransition; 4]>,
    token: CancellationToken,
}

/// Values published for one animation frame.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct AnimationFrame {
    pub progress: f64,
    pub eased_progress: f64,
    pub value: f64,
}

/// Outcome of one [`RescaleAnimator::tick`].
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub enum AnimationTick {
    /// Nothing scheduled.
    Idle,
    /// Intermediate frame; the host should request another one.
    Running(AnimationFrame),
    /// Final frame; the transition reached its targets and was freed.
    Finished(AnimationFrame),
    /// The token was cancelled; state settled on the targets without a frame.
    Cancelled,
}

impl AnimationTick {
    #[must_use]
    pub fn needs_next_frame(self) -> bool {
        matches!(self, Self::Running(_))
    }
}

/// Eased interpolation of the y-axis maximum and per-series opacity.
///
/// At most one transition is live. Starting a new one cancels the previous
/// token and continues from the currently displayed values, so superseding
/// triggers never jump.
#[derive(Debug, Clone)]
pub struct RescaleAnimator {
    duration: f64,
    easing: Easing,
    displayed_value: f64,
    opacities: IndexMap<String, f64>,
    current: Option<RescaleAnimation>,
}

impl RescaleAnimator {
    #[must_use]
    pub fn new(duration: f64, easing: Easing, initial_value: f64) -> Self {
        Self {
            duration,
            easing,
            displayed_value: initial_value,
            opacities: IndexMap::new(),
            current: None,
        }
    }

    #[must_use]
    pub fn duration(&self) -> f64 {
        self.duration
    }

    #[must_use]
    pub fn displayed_value(&self) -> f64 {
        self.displayed_value
    }

    /// Value the animator is heading to, or the displayed value when idle.
    #[must_use]
    pub fn target_value(&self) -> f64 {
        self.current
            .as_ref()
            .map_or(self.displayed_value, |anim| anim.state.to_value)
    }

    /// Displayed opacity of one series; untouched series are fully opaque.
    #[must_use]
    pub fn opacity(&self, series_id: &str) -> f64 {
        self.opacities.get(series_id).copied().unwrap_or(1.0)
    }

    #[must_use]
    pub fn state(&self) -> Option<AnimationState> {
        self.current.as_ref().map(|anim| anim.state)
    }

    #[must_use]
    pub fn is_active(&self) -> bool {
        self.current.is_some()
    }

    /// Sets the displayed value directly, without a transition.
    pub fn jump_to(&mut self, value: f64) {
        self.cancel();
        self.displayed_value = value;
    }

    /// Sets one series opacity directly, without a transition.
    pub fn set_opacity(&mut self, series_id: &str, opacity: f64) {
        self.opacities
            .insert(series_id.to_owned(), opacity.clamp(0.0, 1.0));
    }

    /// Forgets every stored opacity; series read as fully opaque afterwards.
    pub fn reset_opacities(&mut self) {
        self.opacities.clear();
    }

    /// Schedules a transition to `target_value` and the given opacity targets.
    ///
    /// Fades still running from a superseded transition keep heading to their
    /// previous targets unless `fades` names the same series again.
    pub fn start(
        &mut self,
        now: f64,
        target_value: f64,
        fades: &[(&str, f64)],
    ) -> CancellationToken {
        let mut targets: IndexMap<String, f64> = IndexMap::new();
        if let Some(previous) = self.current.take() {
            previous.token.cancel();
            debug!(
                superseded_to = previous.state.to_value,
                displayed = self.displayed_value,
                "rescale animation superseded"
            );
            for fade in previous.fades {
                targets.insert(fade.series_id, fade.to);
            }
        }
        for (series_id, to) in fades {
            targets.insert((*series_id).to_owned(), to.clamp(0.0, 1.0));
        }

        let fades = targets
            .into_iter()
            .map(|(series_id, to)| OpacityTransition {
                from: self.opacity(&series_id),
                series_id,
                to,
            })
            .collect();

        let token = CancellationToken::default();
        let state = AnimationState {
            start_time: now,
            duration: self.duration,
            from_value: self.displayed_value,
            to_value: target_value,
            easing: self.easing,
            active: true,
        };
        debug!(
            from = state.from_value,
            to = state.to_value,
            duration = state.duration,
            "rescale animation started"
        );
        self.current = Some(RescaleAnimation {
            state,
            fades,
            token: token.clone(),
        });
        token
    }

    /// Advances the active transition to `now`.
    pub fn tick(&mut self, now: f64) -> AnimationTick {
        let Some(anim) = self.current.as_ref() else {
            return AnimationTick::Idle;
        };
        if anim.token.is_cancelled() {
            self.settle();
            debug!("rescale animation cancelled");
            return AnimationTick::Cancelled;
        }

        let progress = anim.state.progress(now);
        let eased_progress = anim.state.easing.apply(progress);
        let value = if progress >= 1.0 {
            anim.state.to_value
        } else {
            anim.state.value_at(eased_progress)
        };
        let faded: SmallVec<[(String, f64); 4]> = anim
            .fades
            .iter()
            .map(|fade| {
                let opacity = fade.from + (fade.to - fade.from) * eased_progress;
                (fade.series_id.clone(), opacity)
            })
            .collect();

        self.displayed_value = value;
        for (series_id, opacity) in faded {
            self.opacities.insert(series_id, opacity.clamp(0.0, 1.0));
        }

        let frame = AnimationFrame {
            progress,
            eased_progress,
            value,
        };
        if progress >= 1.0 {
            self.settle();
            debug!(value, "rescale animation finished");
            AnimationTick::Finished(frame)
        } else {
            trace!(progress, value, "rescale animation frame");
            AnimationTick::Running(frame)
        }
    }

    /// Stops the active transition and settles every value on its target.
    pub fn cancel(&mut self) {
        if let Some(anim) = self.current.as_ref() {
            anim.token.cancel();
            self.settle();
        }
    }

    fn settle(&mut self) {
        if let Some(mut anim) = self.current.take() {
            anim.state.active = false;
            self.displayed_value = anim.state.to_value;
            for fade in anim.fades {
                self.opacities.insert(fade.series_id, fade.to);
            }
        }
    }
}
