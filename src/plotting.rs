use plotly::{
    common::{Mode, Title},
    layout::Axis,
    ImageFormat, Layout, Plot, Scatter,
};
use std::path::Path;

/// Save a frequency-vs-magnitude line plot as a PNG image.
pub fn plot_profile(freq_axis: &[f32], means: &[f32], file_path: &Path) {
    let mut plot = Plot::new();
    let trace = Scatter::new(freq_axis.to_vec(), means.to_vec()).mode(Mode::Lines);
    plot.add_trace(trace);
    let layout = Layout::new()
        .title(Title::new("Average Spectrogram"))
        .x_axis(Axis::new().title(Title::from("Frequency")))
        .width(1900)
        .height(800);
    plot.set_layout(layout);
    plot.write_image(file_path, ImageFormat::PNG, 1900, 800, 1.0);
}
