use crate::plotting;
use crate::stats::{track_stats, StatsConfig, TrackReport};
use crate::DataError;
use std::error::Error;
use std::fs;
use std::path::{Path, PathBuf};

const AUDIO_EXTENSION: &str = "wav";

/// Average overall-mean vector across every track in a folder, the
/// "composer's EQ profile". In-memory only; rendered to a plot, not persisted.
#[derive(Debug, Clone)]
pub struct FolderProfile {
    pub freq_axis: Vec<f32>,
    pub mean: Vec<f32>,
}

/// Analyze every `.wav` file in `in_dir` and average their overall means.
///
/// Files are processed in file-name order. Each track must produce the same
/// frequency axis. The average is a simple per-bin mean over tracks,
/// deliberately not weighted by track length. Fails on the first bad track,
/// and with a [`DataError`] when no qualifying file exists.
pub fn folder_profile(
    in_dir: &Path,
    out_dir: &Path,
    config: &StatsConfig,
) -> Result<(FolderProfile, Vec<TrackReport>), Box<dyn Error>> {
    let mut files: Vec<PathBuf> = Vec::new();
    for entry in fs::read_dir(in_dir)? {
        let entry = entry?;
        if !entry.file_type()?.is_file() {
            continue;
        }
        let path = entry.path();
        if path.extension().map_or(false, |ext| ext == AUDIO_EXTENSION) {
            files.push(path);
        }
    }
    files.sort();
    if files.is_empty() {
        return Err(Box::new(DataError::EmptyFolder(
            in_dir.display().to_string(),
        )));
    }

    let mut reports: Vec<TrackReport> = Vec::with_capacity(files.len());
    for file in &files {
        let report = track_stats(file, out_dir, config)?;
        if let Some(first) = reports.first() {
            if first.freq_axis != report.freq_axis {
                return Err(Box::new(DataError::MismatchedFrequencyAxis(
                    report.filename,
                )));
            }
        }
        reports.push(report);
    }

    let mut mean = vec![0f32; reports[0].freq_axis.len()];
    for report in &reports {
        for (bin, value) in report.overall_means.iter().enumerate() {
            mean[bin] += value;
        }
    }
    for value in &mut mean {
        *value /= reports.len() as f32;
    }
    Ok((
        FolderProfile {
            freq_axis: reports[0].freq_axis.clone(),
            mean,
        },
        reports,
    ))
}

/// Run [`folder_profile`] and save the result as a line plot.
///
/// The image lands at `out_dir/<out_image>`, defaulting to the output
/// folder's own name with a `.png` suffix.
pub fn composer_eq_profile(
    in_dir: &Path,
    out_dir: &Path,
    out_image: Option<&str>,
    config: &StatsConfig,
) -> Result<FolderProfile, Box<dyn Error>> {
    let (profile, _) = folder_profile(in_dir, out_dir, config)?;
    let image_name = match out_image {
        Some(name) => name.to_owned(),
        None => format!(
            "{}.png",
            out_dir
                .file_name()
                .map(|s| s.to_string_lossy().into_owned())
                .unwrap_or_else(|| "profile".to_owned())
        ),
    };
    if config.print_progress {
        println!("Drawing average spectrogram...");
    }
    plotting::plot_profile(&profile.freq_axis, &profile.mean, &out_dir.join(image_name));
    Ok(profile)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::f32::consts::PI;

    fn write_tone(path: &Path, freq: f32, secs: f32, sample_rate: usize) {
        let waveform: Vec<i16> = (0..(secs * sample_rate as f32) as usize)
            .map(|i| (10000. * f32::sin(2. * PI * freq * i as f32 / sample_rate as f32)) as i16)
            .collect();
        crate::audio::write_wav_file(path, waveform, sample_rate as u32).unwrap();
    }

    #[test]
    fn single_file_profile_equals_its_means() {
        let in_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        write_tone(&in_dir.path().join("a.wav"), 440., 2., 8000);

        let (profile, reports) =
            folder_profile(in_dir.path(), out_dir.path(), &StatsConfig::default()).unwrap();
        assert_eq!(reports.len(), 1);
        assert_eq!(profile.mean, reports[0].overall_means);
        assert_eq!(profile.freq_axis, reports[0].freq_axis);
    }

    #[test]
    fn averages_across_tracks_unweighted() {
        let in_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        write_tone(&in_dir.path().join("low.wav"), 200., 2., 8000);
        // different length on purpose; each track still counts once
        write_tone(&in_dir.path().join("high.wav"), 1500., 4., 8000);

        let (profile, reports) =
            folder_profile(in_dir.path(), out_dir.path(), &StatsConfig::default()).unwrap();
        assert_eq!(reports.len(), 2);
        // sorted by file name
        assert_eq!(reports[0].filename, "high.wav");
        assert_eq!(reports[1].filename, "low.wav");
        for bin in 0..profile.mean.len() {
            let expected = (reports[0].overall_means[bin] + reports[1].overall_means[bin]) / 2.;
            assert_eq!(profile.mean[bin], expected);
        }
    }

    #[test]
    fn mixed_sample_rates_mismatch_the_axis() {
        let in_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        write_tone(&in_dir.path().join("a.wav"), 440., 2., 8000);
        write_tone(&in_dir.path().join("b.wav"), 440., 2., 16000);
        let err =
            folder_profile(in_dir.path(), out_dir.path(), &StatsConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::MismatchedFrequencyAxis(name)) if name == "b.wav"
        ));
    }

    #[test]
    fn empty_folder_is_a_data_error() {
        let in_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        let err = composer_eq_profile(in_dir.path(), out_dir.path(), None, &StatsConfig::default())
            .unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::EmptyFolder(_))
        ));
        // no image or report files either
        assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }

    #[test]
    fn non_audio_files_do_not_qualify() {
        let in_dir = tempfile::tempdir().unwrap();
        let out_dir = tempfile::tempdir().unwrap();
        fs::write(in_dir.path().join("notes.txt"), "not audio").unwrap();
        let err =
            folder_profile(in_dir.path(), out_dir.path(), &StatsConfig::default()).unwrap_err();
        assert!(matches!(
            err.downcast_ref::<DataError>(),
            Some(DataError::EmptyFolder(_))
        ));
        // nothing should have been written to the output folder
        assert_eq!(fs::read_dir(out_dir.path()).unwrap().count(), 0);
    }
}
