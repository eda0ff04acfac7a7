//! Viewport synchronization core for the shared magnet board.
//!
//! This crate is pure state: it never touches a socket, a timer, or the
//! screen. The host feeds it decoded server updates, timer expiries, and
//! gesture input, and carries out the [`engine::Action`]s it returns
//! (render callbacks, timers to arm, and messages to send).
//!
//! ## Module layout
//!
//! | Module | Role |
//! |--------|------|
//! | [`engine`] | [`engine::EngineCore`] composing everything below |
//! | [`window`] | The spatial subscription window |
//! | [`camera`] | View center/scale and coordinate conversions |
//! | [`doc`] | In-memory store of tracked magnets |
//! | [`reconcile`] | Applies snapshot/create/move/remove updates |
//! | [`transition`] | Generation-tracked slide bookkeeping |
//! | [`outbound`] | Drag classification and mutation packaging |
//! | [`input`] | The gesture state machine |
//! | [`consts`] | Shared numeric constants (margins, durations, thresholds) |

pub mod camera;
pub mod consts;
pub mod doc;
pub mod engine;
pub mod input;
pub mod outbound;
pub mod reconcile;
pub mod transition;
pub mod window;
