use crate::spectrogram::{self, Spectrogram};
use crate::timestamp::secs_to_timestamp;
use crate::{audio, hash, DataError};
use serde::{Deserialize, Serialize};
use std::error::Error;
use std::fs::{self, File};
use std::io::Write;
use std::path::Path;

/// Knobs for a single-track analysis.
#[derive(Debug, Clone)]
pub struct StatsConfig {
    /// Length of the time-averaging intervals, in seconds.
    pub interval_len: f32,
    /// Spectrogram frames per second; window = rate/fps, hop = rate/(2*fps).
    pub spec_fps: usize,
    pub print_progress: bool,
}

impl Default for StatsConfig {
    fn default() -> StatsConfig {
        StatsConfig {
            interval_len: 5.,
            spec_fps: 20,
            print_progress: false,
        }
    }
}

/// Everything computed for one track. Written to the CSV report and the
/// binary snapshot, then returned to the caller; never mutated afterward.
#[derive(Serialize, Deserialize, Debug, Clone)]
pub struct TrackReport {
    pub filename: String,
    pub sha256: String,
    /// Track length in seconds.
    pub duration: f32,
    /// Human-readable time range per interval, e.g. `00:00:05-00:00:10`.
    pub interval_labels: Vec<String>,
    /// Element-wise mean spectrogram per interval, one row per interval.
    pub interval_means: Vec<Vec<f32>>,
    pub time_axis: Vec<f32>,
    pub freq_axis: Vec<f32>,
    pub overall_means: Vec<f32>,
    pub overall_std_devs: Vec<f32>,
}

/// Analyze one audio file and emit its CSV report and binary snapshot.
///
/// Writes `<stem>stats.csv` and `<stem>stats.bin` into `out_dir` once all
/// computation has succeeded, and returns the report. A crash mid-write can
/// leave a truncated file; the writes are not atomic.
pub fn track_stats(
    in_file: &Path,
    out_dir: &Path,
    config: &StatsConfig,
) -> Result<TrackReport, Box<dyn Error>> {
    if config.spec_fps == 0 {
        return Err(Box::new(DataError::InvalidConfig("spec_fps")));
    }
    if config.print_progress {
        println!("Decoding {}...", in_file.display());
    }
    let (metadata, waveform) = audio::load_wav_file(in_file)?;
    let duration = waveform.len() as f32 / metadata.sample_rate as f32;
    let sha256 = hash::sha256_file(in_file)?;
    if config.print_progress {
        println!("Transforming...");
    }
    let window = metadata.sample_rate / config.spec_fps;
    let step = metadata.sample_rate / (2 * config.spec_fps);
    let spec = spectrogram::spectrogram(&waveform, metadata.sample_rate, window, step)?;
    if config.print_progress {
        println!("Analysing...");
    }
    let buckets = partition_frames(&spec.time_axis, duration, config.interval_len)?;
    let interval_means: Vec<Vec<f32>> = buckets
        .iter()
        .map(|frames| mean_over(&spec, frames))
        .collect();
    let interval_labels = bucket_labels(buckets.len(), config.interval_len, duration);
    let overall_means = column_means(&spec.frames);
    let overall_std_devs = column_std_devs(&spec.frames, &overall_means);

    let filename = in_file
        .file_name()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| metadata.name.clone());
    let report = TrackReport {
        filename,
        sha256,
        duration,
        interval_labels,
        interval_means,
        time_axis: spec.time_axis,
        freq_axis: spec.freq_axis,
        overall_means,
        overall_std_devs,
    };

    if config.print_progress {
        println!("Writing report...");
    }
    fs::write(
        out_dir.join(format!("{}stats.csv", metadata.name)),
        render_csv(&report),
    )?;
    let encoded = bincode::serialize(&report)?;
    let mut snapshot = File::create(out_dir.join(format!("{}stats.bin", metadata.name)))?;
    snapshot.write_all(&encoded)?;
    Ok(report)
}

/// Assign each frame index to the interval containing its timestamp.
///
/// Produces `ceil(duration / interval_len)` buckets covering every frame
/// exactly once. An interval that ends up with no frames is an error, not a
/// NaN factory.
pub fn partition_frames(
    time_axis: &[f32],
    duration: f32,
    interval_len: f32,
) -> Result<Vec<Vec<usize>>, DataError> {
    if !(interval_len > 0.) {
        return Err(DataError::InvalidConfig("interval_len"));
    }
    let bucket_count = (duration / interval_len).ceil() as usize;
    if bucket_count == 0 || time_axis.is_empty() {
        return Err(DataError::EmptyTrack);
    }
    let mut buckets = vec![Vec::new(); bucket_count];
    for (frame, secs) in time_axis.iter().enumerate() {
        let bucket = ((secs / interval_len) as usize).min(bucket_count - 1);
        buckets[bucket].push(frame);
    }
    for (index, bucket) in buckets.iter().enumerate() {
        if bucket.is_empty() {
            return Err(DataError::EmptyBucket(index));
        }
    }
    Ok(buckets)
}

fn bucket_labels(bucket_count: usize, interval_len: f32, duration: f32) -> Vec<String> {
    (0..bucket_count)
        .map(|i| {
            let start = secs_to_timestamp(i as f32 * interval_len);
            let end = if i + 1 < bucket_count {
                secs_to_timestamp((i + 1) as f32 * interval_len)
            } else {
                secs_to_timestamp(duration)
            };
            format!("{start}-{end}")
        })
        .collect()
}

fn mean_over(spec: &Spectrogram, frames: &[usize]) -> Vec<f32> {
    let mut means = vec![0f32; spec.freq_axis.len()];
    for frame in frames {
        for (bin, value) in spec.frames[*frame].iter().enumerate() {
            means[bin] += value;
        }
    }
    for value in &mut means {
        *value /= frames.len() as f32;
    }
    means
}

fn column_means(frames: &[Vec<f32>]) -> Vec<f32> {
    let mut means = vec![0f32; frames[0].len()];
    for frame in frames {
        for (bin, value) in frame.iter().enumerate() {
            means[bin] += value;
        }
    }
    for value in &mut means {
        *value /= frames.len() as f32;
    }
    means
}

/// Population standard deviation per column.
fn column_std_devs(frames: &[Vec<f32>], means: &[f32]) -> Vec<f32> {
    let mut vars = vec![0f32; means.len()];
    for frame in frames {
        for (bin, value) in frame.iter().enumerate() {
            let diff = value - means[bin];
            vars[bin] += diff * diff;
        }
    }
    vars.iter()
        .map(|v| (v / frames.len() as f32).sqrt())
        .collect()
}

/// Render the human-readable CSV report: file header, per-interval mean
/// table, then the overall statistics table. Frequencies get 4 decimals,
/// everything else 6.
fn render_csv(report: &TrackReport) -> String {
    let mut out = String::new();
    out += &format!("Filename,{}\n", report.filename);
    out += &format!("SHA256 hash,{}\n", report.sha256);
    out += &format!("Length,{}\n", secs_to_timestamp(report.duration));
    out += "\n";

    out += "Average spectrograms over time:\n";
    out += ",Frequency axis:";
    for freq in &report.freq_axis {
        out += &format!(",{freq:.4}");
    }
    out += "\n";
    for (i, (label, means)) in report
        .interval_labels
        .iter()
        .zip(&report.interval_means)
        .enumerate()
    {
        out += &format!("{i},{label}");
        for value in means {
            out += &format!(",{value:.6}");
        }
        out += "\n";
    }
    out += "\n";

    out += "Overall spectrogram statistics:\n";
    out += "Frequency axis";
    for freq in &report.freq_axis {
        out += &format!(",{freq:.4}");
    }
    out += "\n";
    out += "Means";
    for value in &report.overall_means {
        out += &format!(",{value:.6}");
    }
    out += "\n";
    out += "Standard deviations";
    for value in &report.overall_std_devs {
        out += &format!(",{value:.6}");
    }
    out += "\n";
    out
}
