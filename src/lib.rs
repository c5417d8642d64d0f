pub mod audio;
pub mod hash;
pub mod plotting;
pub mod profile;
pub mod spectrogram;
pub mod stats;
pub mod timestamp;

use thiserror::Error;

pub use profile::{composer_eq_profile, folder_profile, FolderProfile};
pub use stats::{track_stats, StatsConfig, TrackReport};

/// Returned when the numbers themselves are unusable, as opposed to I/O failures.
#[derive(Error, Debug)]
pub enum DataError {
    #[error("{0} must be positive")]
    InvalidConfig(&'static str),
    #[error("track too short for a single spectrogram frame")]
    EmptyTrack,
    #[error("no frames fell into interval {0}")]
    EmptyBucket(usize),
    #[error("no .wav files found in {0}")]
    EmptyFolder(String),
    #[error("frequency axis of {0} does not match the rest of the folder")]
    MismatchedFrequencyAxis(String),
}
