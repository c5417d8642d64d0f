use crate::DataError;
use num_complex::Complex32;
use rustfft::FftPlanner;

/// Magnitude spectrogram of a mono track.
///
/// `frames` is time-major: one row per windowed transform, one column per
/// frequency bin. `time_axis` holds the start time of each frame in seconds
/// and `freq_axis` the center frequency of each bin in Hz, so
/// `time_axis.len() == frames.len()` and `freq_axis.len() == frames[i].len()`.
#[derive(Debug, Clone)]
pub struct Spectrogram {
    pub frames: Vec<Vec<f32>>,
    pub time_axis: Vec<f32>,
    pub freq_axis: Vec<f32>,
}

/// Compute a short-time magnitude spectrogram.
///
/// The signal is scaled to 16-bit full range, has its DC offset removed and is
/// peak-normalized before transforming. Frames advance by `step` samples while
/// a full `window` still fits; each frame keeps the lower half of its forward
/// FFT, magnitudes divided by the bin count.
pub fn spectrogram(
    samples: &[f32],
    sample_rate: usize,
    window: usize,
    step: usize,
) -> Result<Spectrogram, DataError> {
    if samples.len() < window || window < 2 || step == 0 {
        return Err(DataError::EmptyTrack);
    }
    let scaled: Vec<f32> = samples.iter().map(|x| x / 32768.).collect();
    let dc_offset = scaled.iter().sum::<f32>() / scaled.len() as f32;
    let maximum = scaled.iter().fold(0f32, |acc, x| acc.max(x.abs()));
    let signal: Vec<f32> = scaled
        .iter()
        .map(|x| (x - dc_offset) / (maximum + 1e-10))
        .collect();

    let fft_size = window / 2;
    let mut planner = FftPlanner::<f32>::new();
    let fft = planner.plan_fft_forward(window);

    let mut frames = Vec::new();
    let mut cur = 0;
    while cur + window <= signal.len() {
        let mut buffer: Vec<Complex32> = signal[cur..cur + window]
            .iter()
            .map(|x| Complex32::from(*x))
            .collect();
        fft.process(&mut buffer);
        let magnitudes: Vec<f32> = buffer[..fft_size]
            .iter()
            .map(|x| x.norm() / fft_size as f32)
            .collect();
        frames.push(magnitudes);
        cur += step;
    }

    let time_axis = (0..frames.len())
        .map(|t| (t * step) as f32 / sample_rate as f32)
        .collect();
    let freq_axis = (0..fft_size)
        .map(|k| ((k + 1) * sample_rate) as f32 / (2 * fft_size) as f32)
        .collect();
    Ok(Spectrogram {
        frames,
        time_axis,
        freq_axis,
    })
}
