//! Streaming session vocabulary.
//!
//! - [`event::RelayEvent`]: typed events from the upstream event source
//! - [`throttle::ThrottlePolicy`]: when a content delta may edit the content message
//! - [`phase::SessionPhase`]: lifecycle of one relayed session

pub mod event;
pub mod phase;
pub mod throttle;
