use std::error::Error;
use std::fs::File;
use std::path::Path;
use thiserror::Error;
use wav::{BitDepth, Header};

/// Returned when file formats are not supported.
#[derive(Error, Debug)]
pub enum FormatError {
    #[error("file contains no samples")]
    EmptyTrack,
    #[error("unrecognized format not supported")]
    UnsupportedFormat,
}

/// Header facts about a decoded track, kept alongside the samples.
#[derive(Debug, Clone)]
pub struct TrackMetadata {
    pub name: String,
    pub sample_rate: usize,
    pub bit_rate: usize,
}

impl TrackMetadata {
    pub fn new(name: &str, sample_rate: usize, bit_rate: usize) -> TrackMetadata {
        TrackMetadata {
            name: name.to_owned(),
            sample_rate,
            bit_rate,
        }
    }
}

/// Decode a .wav file to mono `f32` samples plus metadata.
///
/// Multi-channel audio is collapsed by averaging the channels of each frame.
pub fn load_wav_file(path: &Path) -> Result<(TrackMetadata, Vec<f32>), Box<dyn Error>> {
    let mut inp_file = File::open(path)?;
    let (header, data) = wav::read(&mut inp_file)?;
    let interleaved: Vec<f32> = match data {
        BitDepth::Eight(d) => d.iter().map(|x| *x as f32).collect(),
        BitDepth::Sixteen(d) => d.iter().map(|x| *x as f32).collect(),
        BitDepth::TwentyFour(d) => d.iter().map(|x| *x as f32).collect(),
        BitDepth::ThirtyTwoFloat(d) => d,
        BitDepth::Empty => return Err(Box::new(FormatError::EmptyTrack)),
    };
    let waveform = stereo_to_mono(&interleaved, header.channel_count as usize)?;
    let name = path
        .file_stem()
        .map(|s| s.to_string_lossy().into_owned())
        .unwrap_or_else(|| "unknown".to_owned());
    let metadata = TrackMetadata::new(
        &name,
        header.sampling_rate as usize,
        header.bits_per_sample as usize,
    );
    Ok((metadata, waveform))
}

/// Average interleaved channels down to one. Mono input passes through.
pub fn stereo_to_mono(interleaved: &[f32], channels: usize) -> Result<Vec<f32>, Box<dyn Error>> {
    if channels == 0 || interleaved.len() % channels != 0 {
        return Err(Box::new(FormatError::UnsupportedFormat));
    }
    if channels == 1 {
        return Ok(interleaved.to_vec());
    }
    Ok(interleaved
        .chunks_exact(channels)
        .map(|frame| frame.iter().sum::<f32>() / channels as f32)
        .collect())
}

pub fn write_wav_file(
    path: &Path,
    waveform: Vec<i16>,
    sample_rate: u32,
) -> Result<(), std::io::Error> {
    let mut out_file = File::create(path)?;
    let header = Header::new(1, 1, sample_rate, 16);
    let track = BitDepth::Sixteen(waveform);
    wav::write(header, &track, &mut out_file)?;
    Ok(())
}
