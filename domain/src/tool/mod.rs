//! Tool vocabulary used when rendering tool activity.

pub mod category;
