//! Pagewatch Core - the change-detection logic shared by every Pagewatch crate.
//!
//! - **diff**: In-process line diff producing replacement hunks
//! - **noise**: Noise extraction and per-page noise profiles
//! - **comparator**: Noise-filtered comparison of two snapshots
//! - **page**: Page identity and URL normalisation
//! - **pages**: Loading the monitored page list from CSV
//! - **duration**: Compound durations (`2h30m`) and alert times (`HH:MM`)
//! - **config**: State directory and configuration file locations

pub mod comparator;
pub mod config;
pub mod diff;
pub mod duration;
pub mod error;
pub mod noise;
pub mod page;
pub mod pages;

pub use comparator::{ChangeReport, FilteredComparator};
pub use diff::{diff, diff_ignoring, Hunk, LineDiff, ReplacementRecord};
pub use duration::{parse_alert_time, parse_compound_duration};
pub use error::{CoreError, Result};
pub use noise::{extract_noise, LearningConfig, NoiseProfile};
pub use page::{format_url, Page, SnapshotSlot};
pub use pages::{create_empty_pages_file, load_pages, parse_pages, PageList, RejectedRow};
