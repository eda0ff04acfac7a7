//! Shared numeric constants for the canvas crate.

// ── Window ──────────────────────────────────────────────────────

/// Prefetch margin: the window extends this many viewport widths/heights
/// (divided by scale) from the view center in each direction.
pub const WINDOW_MARGIN_FACTOR: f64 = 1.5;

/// Fixed pad in world units absorbing sub-pixel and resize jitter.
pub const WINDOW_PAD: f64 = 15.0;

/// Debounce applied to pan/zoom/resize before resubscribing, in milliseconds.
pub const WINDOW_DEBOUNCE_MS: u64 = 500;

// ── Transitions ─────────────────────────────────────────────────

/// Duration of a remotely-driven slide, in milliseconds.
pub const TRANSITION_MS: u64 = 500;

// ── Gestures ────────────────────────────────────────────────────

/// Drag releases below this displacement (world units, both axes) are taps.
pub const TAP_THRESHOLD: f64 = 0.5;

/// Dragged positions are clamped to `[-WORLD_LIMIT, WORLD_LIMIT]`.
pub const WORLD_LIMIT: f64 = 500_000.0;

/// Render rank given to a locally dropped magnet until the server echo
/// assigns the real one.
pub const LOCAL_Z_PLACEHOLDER: i64 = i32::MAX as i64;
