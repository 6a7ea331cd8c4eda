use image::Rgb;
use palette::{FromColor, Hsl, Srgb};

/// `n` outline colours with evenly spaced hues, starting at red.
pub(crate) fn outline_colors(n: usize) -> Vec<Rgb<u8>> {
    (0..n)
        .map(|i| {
            let hue = (i as f32 * 360.0) / n as f32;
            let srgb: Srgb<u8> = Srgb::from_color(Hsl::new(hue, 0.9, 0.5)).into_format();
            Rgb([srgb.red, srgb.green, srgb.blue])
        })
        .collect()
}
