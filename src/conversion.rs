//! Internal pixel-buffer helpers.

use ffmpeg_next::{
    Rational,
    format::Pixel,
    frame::Video as VideoFrame,
    software::scaling::{Context as ScalingContext, Flags as ScalingFlags},
};
use image::RgbImage;

use crate::error::SamplerError;

/// Converts decoded frames of any pixel format to packed RGB images.
///
/// The scaler is built on first use and rebuilt whenever the incoming
/// frame's format or size changes.
pub(crate) struct RgbConverter {
    /// Scaler and the source geometry it was built for.
    scaler: Option<(ScalingContext, (Pixel, u32, u32))>,
    rgb_frame: VideoFrame,
}

impl RgbConverter {
    pub(crate) fn new() -> Self {
        Self {
            scaler: None,
            rgb_frame: VideoFrame::empty(),
        }
    }

    pub(crate) fn convert(&mut self, frame: &VideoFrame) -> Result<RgbImage, SamplerError> {
        let geometry = (frame.format(), frame.width(), frame.height());
        let (format, width, height) = geometry;

        let needs_scaler = self
            .scaler
            .as_ref()
            .is_none_or(|(_, built_for)| *built_for != geometry);
        if needs_scaler {
            log::debug!("Building scaler for {format:?} {width}x{height}");
            let scaler = ScalingContext::get(
                format,
                width,
                height,
                Pixel::RGB24,
                width,
                height,
                ScalingFlags::BILINEAR,
            )?;
            self.scaler = Some((scaler, geometry));
        }

        if let Some((scaler, _)) = self.scaler.as_mut() {
            scaler.run(frame, &mut self.rgb_frame)?;
        }

        let buffer = packed_plane(&self.rgb_frame, width, height, 3);
        RgbImage::from_raw(width, height, buffer).ok_or_else(|| {
            SamplerError::VideoDecodeError(
                "Failed to construct RGB image from decoded frame data".to_string(),
            )
        })
    }
}

/// Copy the first plane of a packed video frame into a tightly-packed buffer.
///
/// FFmpeg pads each row to its alignment, so rows are copied one at a time
/// whenever the stride is wider than `width * bytes_per_pixel`.
pub(crate) fn packed_plane(
    video_frame: &VideoFrame,
    width: u32,
    height: u32,
    bytes_per_pixel: usize,
) -> Vec<u8> {
    let stride = video_frame.stride(0);
    let row_length = (width as usize) * bytes_per_pixel;
    let data = video_frame.data(0);

    if stride == row_length {
        return data[..row_length * (height as usize)].to_vec();
    }

    data.chunks(stride)
        .take(height as usize)
        .flat_map(|row| &row[..row_length])
        .copied()
        .collect()
}

/// Convert an FFmpeg rational to frames per second, `None` when undefined.
pub(crate) fn rational_to_rate(rate: Rational) -> Option<f64> {
    if rate.numerator() > 0 && rate.denominator() > 0 {
        Some(rate.numerator() as f64 / rate.denominator() as f64)
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn yuv_frame(width: u32, height: u32, luma: u8) -> VideoFrame {
        let mut frame = VideoFrame::new(Pixel::YUV420P, width, height);
        frame.data_mut(0).fill(luma);
        frame.data_mut(1).fill(128);
        frame.data_mut(2).fill(128);
        frame
    }

    #[test]
    fn rate_from_ntsc_rational() {
        let rate = rational_to_rate(Rational::new(30000, 1001)).unwrap();
        assert!((rate - 29.97).abs() < 0.01);
    }

    #[test]
    fn undefined_rates() {
        assert_eq!(rational_to_rate(Rational::new(0, 1)), None);
        assert_eq!(rational_to_rate(Rational::new(25, 0)), None);
    }

    #[test]
    fn padded_rows_are_packed() {
        // 34 * 3 = 102 bytes per row, which FFmpeg pads to its alignment.
        let mut frame = VideoFrame::new(Pixel::RGB24, 34, 3);
        let stride = frame.stride(0);
        assert!(stride >= 102);
        for (row, chunk) in frame.data_mut(0).chunks_mut(stride).take(3).enumerate() {
            chunk.fill(0xEE);
            chunk[..102].fill(row as u8 + 1);
        }

        let buffer = packed_plane(&frame, 34, 3, 3);

        assert_eq!(buffer.len(), 34 * 3 * 3);
        assert!(buffer[..102].iter().all(|&byte| byte == 1));
        assert!(buffer[102..204].iter().all(|&byte| byte == 2));
        assert!(buffer[204..].iter().all(|&byte| byte == 3));
    }

    #[test]
    fn converter_follows_geometry_changes() {
        let mut converter = RgbConverter::new();

        let small = converter.convert(&yuv_frame(34, 26, 200)).unwrap();
        assert_eq!(small.dimensions(), (34, 26));

        let large = converter.convert(&yuv_frame(64, 48, 40)).unwrap();
        assert_eq!(large.dimensions(), (64, 48));
        assert!(large.get_pixel(10, 10)[0] < small.get_pixel(10, 10)[0]);

        let again = converter.convert(&yuv_frame(34, 26, 200)).unwrap();
        assert_eq!(again, small);
    }
}
