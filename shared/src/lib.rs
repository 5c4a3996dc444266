//! Shared core for TimeLab
//!
//! Wall-clock computation (timezone-aware) and on-disk storage for
//! settings and learner progress.

pub mod store;
pub mod time_engine;

pub use store::{
    load_progress, load_settings, progress_path, save_progress, save_settings, settings_path,
    StoreError,
};
pub use time_engine::{
    all_timezones, compute_time_data, compute_time_data_at, format_clock, parse_timezone,
    search_timezones, spoken_time, system_timezone, HourCycle, Meridiem, TimeData,
};
