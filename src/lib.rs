//! Terminal front-end for sitescout search sessions

pub mod demo;
pub mod ui;
