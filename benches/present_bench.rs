// Presentation benchmarks
//
// CPU-side work done once per presented frame: viewport placement, the
// test machine's frame generation, view resolution for screenshots and
// thumbnails, and icon decoding at startup.

use criterion::{criterion_group, criterion_main, Criterion};
use emu_gfx::display::{
    compute_viewport, resolve_view, BorderInsets, ColorSource, Dimension, PaletteTable,
    PixelAspect, PixelFormat, Rect,
};
use emu_gfx::frontend::machine::{TestMachine, FRAMEBUFFER};
use emu_gfx::overlay::{decode_icon, icon::SPEAKER_OFF, FlashFeedback};
use std::hint::black_box;

fn bench_viewport(c: &mut Criterion) {
    let mut group = c.benchmark_group("viewport");

    let border = BorderInsets::new(8, 8, 8, 32);
    let view = Rect::new(8, 8, 256, 240);

    group.bench_function("compute_viewport_pillarbox", |b| {
        b.iter(|| {
            compute_viewport(
                black_box(Dimension::new(1920, 1080)),
                black_box(border),
                black_box(view),
                black_box(PixelAspect::new(8, 7)),
            )
        });
    });

    group.bench_function("compute_viewport_letterbox", |b| {
        b.iter(|| {
            compute_viewport(
                black_box(Dimension::new(600, 1600)),
                black_box(border),
                black_box(view),
                black_box(PixelAspect::SQUARE),
            )
        });
    });

    group.finish();
}

fn bench_machine_frame(c: &mut Criterion) {
    let mut group = c.benchmark_group("machine_frame");

    for format in [PixelFormat::Indexed8, PixelFormat::Rgba8] {
        let mut machine = TestMachine::new(format, 64);
        let mut pixels = vec![0u8; format.frame_len(FRAMEBUFFER)];
        group.bench_function(format!("{:?}", format), |b| {
            b.iter(|| black_box(machine.run_frame(black_box(&mut pixels))));
        });
    }

    group.finish();
}

fn bench_resolve_view(c: &mut Criterion) {
    let mut group = c.benchmark_group("resolve_view");

    let palette = PaletteTable::preset("nes").unwrap();
    let mut machine = TestMachine::new(PixelFormat::Indexed8, palette.len());
    let mut indexed = vec![0u8; PixelFormat::Indexed8.frame_len(FRAMEBUFFER)];
    let info = machine.run_frame(&mut indexed);

    group.bench_function("paletted", |b| {
        b.iter(|| {
            resolve_view(
                black_box(&indexed),
                black_box(&info),
                ColorSource::Paletted(&palette),
            )
        });
    });

    let mut machine = TestMachine::new(PixelFormat::Rgba8, palette.len());
    let mut rgba = vec![0u8; PixelFormat::Rgba8.frame_len(FRAMEBUFFER)];
    let info = machine.run_frame(&mut rgba);

    group.bench_function("direct", |b| {
        b.iter(|| resolve_view(black_box(&rgba), black_box(&info), ColorSource::Direct));
    });

    group.finish();
}

fn bench_overlay(c: &mut Criterion) {
    let mut group = c.benchmark_group("overlay");

    group.bench_function("decode_speaker_icon", |b| {
        b.iter(|| decode_icon(black_box(&SPEAKER_OFF)));
    });

    group.bench_function("flash_countdown", |b| {
        let mut flash = FlashFeedback::new();
        b.iter(|| {
            flash.notify_error();
            flash.notify_success();
            for _ in 0..40 {
                black_box(flash.next_frame());
            }
        });
    });

    group.finish();
}

criterion_group!(
    benches,
    bench_viewport,
    bench_machine_frame,
    bench_resolve_view,
    bench_overlay
);
criterion_main!(benches);
