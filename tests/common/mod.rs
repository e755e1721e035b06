//! Shared helpers for tests that decode real video.

use std::path::Path;

use ffmpeg_next::{
    Packet, Rational,
    codec::{Id, context::Context as CodecContext},
    encoder::video::Encoder as VideoEncoder,
    format::{Pixel, context::Output},
    frame::Video as VideoFrame,
};

/// Frame rate of generated clips.
pub const CLIP_FPS: i32 = 25;

/// Encode `frame_count` flat grey frames of `width`x`height` as MPEG-4 Part 2
/// into an AVI container at `path`. The luma of frame `i` is `(i * 2) % 256`.
pub fn write_clip(path: &Path, frame_count: usize, width: u32, height: u32) {
    ffmpeg_next::init().expect("Failed to initialise FFmpeg");

    let codec = ffmpeg_next::encoder::find(Id::MPEG4).expect("MPEG-4 encoder not available");
    let time_base = Rational::new(1, CLIP_FPS);

    let mut output = ffmpeg_next::format::output(path).expect("Failed to create clip");
    let mut stream = output.add_stream(codec).expect("Failed to add stream");
    let stream_index = stream.index();

    let mut encoder = CodecContext::from_parameters(stream.parameters())
        .and_then(|context| context.encoder().video())
        .expect("Failed to create encoder");
    encoder.set_width(width);
    encoder.set_height(height);
    encoder.set_format(Pixel::YUV420P);
    encoder.set_time_base(time_base);
    encoder.set_frame_rate(Some(Rational::new(CLIP_FPS, 1)));

    let mut encoder = encoder.open_as(codec).expect("Failed to open encoder");
    stream.set_parameters(&encoder);

    output.write_header().expect("Failed to write header");
    let stream_time_base = output
        .stream(stream_index)
        .expect("Stream vanished")
        .time_base();

    for index in 0..frame_count {
        let mut frame = VideoFrame::new(Pixel::YUV420P, width, height);
        frame.data_mut(0).fill(((index * 2) % 256) as u8);
        frame.data_mut(1).fill(128);
        frame.data_mut(2).fill(128);
        frame.set_pts(Some(index as i64));

        encoder.send_frame(&frame).expect("Failed to send frame");
        write_packets(&mut encoder, &mut output, stream_index, time_base, stream_time_base);
    }

    encoder.send_eof().expect("Failed to flush encoder");
    write_packets(&mut encoder, &mut output, stream_index, time_base, stream_time_base);

    output.write_trailer().expect("Failed to write trailer");
}

fn write_packets(
    encoder: &mut VideoEncoder,
    output: &mut Output,
    stream_index: usize,
    encoder_time_base: Rational,
    stream_time_base: Rational,
) {
    let mut packet = Packet::empty();
    while encoder.receive_packet(&mut packet).is_ok() {
        packet.set_stream(stream_index);
        packet.rescale_ts(encoder_time_base, stream_time_base);
        packet
            .write_interleaved(output)
            .expect("Failed to write packet");
    }
}
