//! Full-frame pipeline benchmarks.
//! Run: cargo bench -p ac-ascii

use ac_ascii::compositor::render_frame;
use ac_ascii::pipeline::{FrameContext, PixelPipeline};
use ac_core::config::{ColorPalette, EffectParams};
use ac_core::frame::FrameBuffer;
use criterion::{Criterion, black_box, criterion_group, criterion_main};

fn gradient(width: u32, height: u32) -> FrameBuffer {
    let mut fb = FrameBuffer::new(width, height);
    for (i, px) in fb.data.chunks_exact_mut(4).enumerate() {
        let x = (i as u32 % width) * 255 / width;
        let y = (i as u32 / width) * 255 / height;
        px.copy_from_slice(&[x as u8, y as u8, 128, 255]);
    }
    fb
}

fn bench_render_frame(c: &mut Criterion) {
    let (w, h) = (1920, 1080);
    let source = gradient(w, h);
    let mut out = FrameBuffer::new(w, h);
    let ctx = FrameContext {
        time: 1.25,
        ..FrameContext::still(w, h)
    };

    let inert = EffectParams::default();
    let crt = EffectParams {
        curvature: 0.08,
        aberration_strength: 0.002,
        noise_intensity: 0.05,
        jitter_intensity: 0.3,
        glitch_intensity: 0.1,
        glitch_frequency: 2.0,
        scanline_intensity: 0.3,
        vignette_intensity: 0.4,
        color_palette: ColorPalette::Green,
        ..EffectParams::default()
    };

    let mut group = c.benchmark_group("render_frame");
    group.sample_size(20);

    for (name, params) in [("inert_1080p", &inert), ("crt_1080p", &crt)] {
        let Ok(pipeline) = PixelPipeline::new(params, None) else {
            continue;
        };
        group.bench_function(name, |b| {
            b.iter(|| {
                render_frame(&pipeline, black_box(&ctx), &source, &mut out);
                black_box(out.data[0])
            });
        });
    }

    group.finish();
}

criterion_group!(benches, bench_render_frame);
criterion_main!(benches);
