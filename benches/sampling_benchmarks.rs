//! Benchmarks for the sampling loop and FFmpeg decoding.
//!
//! Run with: cargo bench
//!
//! The FFmpeg benchmarks need `tests/fixtures/sample_video.mp4` and are
//! skipped without it.

use std::{path::Path, time::Duration};

use criterion::Criterion;
use framesnap::{
    FfmpegLogLevel, FrameSampler, FrameSource, OutputFormat, SamplerOptions, VideoMetadata,
    VideoSource,
};
use image::{Rgb, RgbImage};

const SAMPLE_VIDEO: &str = "tests/fixtures/sample_video.mp4";

struct GradientSource {
    metadata: VideoMetadata,
    remaining: u64,
}

impl GradientSource {
    fn new(frames: u64) -> Self {
        Self {
            metadata: VideoMetadata {
                width: 320,
                height: 180,
                frames_per_second: 30.0,
                frame_count: frames,
                duration: Duration::from_secs_f64(frames as f64 / 30.0),
                codec: "synthetic".to_string(),
            },
            remaining: frames,
        }
    }
}

impl FrameSource for GradientSource {
    fn metadata(&self) -> &VideoMetadata {
        &self.metadata
    }

    fn next_frame(&mut self) -> Option<RgbImage> {
        if self.remaining == 0 {
            return None;
        }
        self.remaining -= 1;
        Some(RgbImage::from_fn(320, 180, |x, y| {
            Rgb([(x % 256) as u8, (y % 256) as u8, 96])
        }))
    }
}

fn benchmark_synthetic_sampling(criterion: &mut Criterion) {
    let output_root = tempfile::tempdir().unwrap();

    for (label, format) in [("jpg", OutputFormat::Jpeg), ("png", OutputFormat::Png)] {
        let sampler = FrameSampler::new(SamplerOptions::new().with_interval(30).with_format(format));
        let id = format!("sample 300 synthetic frames every 30 ({label})");
        criterion.bench_function(&id, |bencher| {
            bencher.iter(|| {
                let mut source = GradientSource::new(300);
                sampler
                    .extract_from(&mut source, label, output_root.path())
                    .unwrap()
            });
        });
    }
}

fn benchmark_decode(criterion: &mut Criterion) {
    framesnap::set_ffmpeg_log_level(FfmpegLogLevel::Error);

    if !Path::new(SAMPLE_VIDEO).exists() {
        eprintln!("Skipping benchmark: fixture not found");
        return;
    }

    criterion.bench_function("decode all frames", |bencher| {
        bencher.iter(|| {
            let mut source = VideoSource::open(SAMPLE_VIDEO).unwrap();
            while source.next_frame().is_some() {}
        });
    });

    let output_root = tempfile::tempdir().unwrap();
    let sampler = FrameSampler::default();
    criterion.bench_function("extract every 30th frame", |bencher| {
        bencher.iter(|| sampler.extract(SAMPLE_VIDEO, output_root.path()).unwrap());
    });
}

criterion::criterion_group!(benches, benchmark_synthetic_sampling, benchmark_decode);
criterion::criterion_main!(benches);
