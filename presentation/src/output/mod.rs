//! Console output: the message sink and the end-of-session summary

pub mod console;
pub mod console_sink;
