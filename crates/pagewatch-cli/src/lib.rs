//! Pagewatch command-line program.
//!
//! Reads the page list, learns each page's noise, then checks every page on a
//! fixed interval and notifies about real changes.

pub mod app;
pub mod cli;
pub mod error;
