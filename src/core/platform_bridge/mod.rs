//=========================================================================
// Platform Bridge
//=========================================================================
//
// Contract between the window thread and the session thread.
//
// The platform side only sends `PlatformEvent`s; the core side only
// answers with `CoreEvent`s. Neither side touches the other's state.
//
// Components:
// - `interface`: message and error types
// - `event_collector`: core-side draining of platform messages
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub(crate) use event_collector::EventCollector;
pub use interface::PlatformError;
pub(crate) use interface::{CoreEvent, PlatformEvent};
