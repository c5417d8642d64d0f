/// Spectrogram statistics for a folder of .wav files, averaged into a
/// "composer's EQ profile" plot.
use clap::Parser;
use eqprofile::{composer_eq_profile, track_stats, StatsConfig};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(author, version, about, long_about = None)]
struct Args {
    /// Folder of .wav files to analyze (not needed with --file)
    #[arg(short, long, required_unless_present = "file")]
    in_folder: Option<PathBuf>,
    /// Folder for the per-track reports and the profile image
    #[arg(short, long)]
    out_folder: PathBuf,
    /// Analyze a single file instead of a folder
    #[arg(short, long)]
    file: Option<PathBuf>,
    /// Name of the profile image (default: "<out_folder>.png")
    #[arg(long)]
    image: Option<String>,
    /// Interval length for time-averaged spectrograms, in seconds
    #[arg(long, default_value_t = 5.)]
    interval_len: f32,
    /// Spectrogram frames per second
    #[arg(long, default_value_t = 20)]
    spec_fps: usize,
    /// Print progress
    #[arg(short, long, default_value_t = false)]
    verbose: bool,
}

fn main() {
    let args = Args::parse();
    let config = StatsConfig {
        interval_len: args.interval_len,
        spec_fps: args.spec_fps,
        print_progress: args.verbose,
    };
    if let Some(file) = args.file {
        let report = track_stats(&file, &args.out_folder, &config).unwrap();
        println!(
            "{}: {} intervals, {} frequency bins",
            report.filename,
            report.interval_means.len(),
            report.freq_axis.len()
        );
    } else {
        let in_folder = args.in_folder.unwrap();
        let profile = composer_eq_profile(
            &in_folder,
            &args.out_folder,
            args.image.as_deref(),
            &config,
        )
        .unwrap();
        println!("Profile averaged over {} frequency bins", profile.mean.len());
    }
}
