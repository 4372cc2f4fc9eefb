//! Event source adapters
//!
//! Decode the upstream wire format (`{kind, session_id, payload}`) into
//! [`SessionEnvelope`]s for the relay.

mod jsonl;

pub use jsonl::{EventDecodeError, JsonlEventReader, SessionEnvelope, decode_line};
