//! Pointer-driven state machines and frame-driven transitions.

pub mod animation;
pub mod brush;
pub mod tooltip;

pub use animation::{
    AnimationFrame, AnimationState, AnimationTick, CancellationToken, DEFAULT_ANIMATION_DURATION,
    Easing, RescaleAnimator,
};
pub use brush::{BrushConfig, BrushController, BrushState, CursorHint, DragMode};
pub use tooltip::{
    TooltipEntry, TooltipSelection, index_to_pixel_x, locate_tooltip, pointer_to_index,
};
