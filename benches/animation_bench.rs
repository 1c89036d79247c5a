//! Hot-path benchmarks: easing, scroll binding updates, reveal sampling
//! and marquee frames.

use criterion::{black_box, criterion_group, criterion_main, Criterion};
use folio_motion::layer::{LayerHandle, LayerKind, LayerSet};
use folio_motion::marquee::Marquee;
use folio_motion::options::{MarqueeOptions, Options, RevealOptions, SectionId};
use folio_motion::reveal::{RevealContent, RevealSequencer};
use folio_motion::scroll::mapper::ParallaxMapper;
use folio_motion::scroll::{ScrollState, SectionRect};
use folio_motion::transform::Transform;
use folio_motion::util::easing::EasingFunction;
use folio_motion::viewport::ViewportClass;
use web_time::{Duration, Instant};

fn easing_benchmark(c: &mut Criterion) {
    let f = EasingFunction::CubicHermite { c1: 0.33, c2: 1.0 };
    c.bench_function("cubic_hermite_easing", |b| {
        b.iter(|| black_box(f.evaluate(black_box(0.5))))
    });
}

fn scroll_binding_benchmark(c: &mut Criterion) {
    let options = Options::default();
    let row = options
        .sections
        .lookup(SectionId::Discover, ViewportClass::Desktop);
    let layers = LayerSet::new(
        LayerKind::ALL
            .iter()
            .enumerate()
            .map(|(i, kind)| LayerHandle::new(*kind, i)),
    );
    let mut bindings = ParallaxMapper::new(row, 800.0).bindings(&layers);
    let rect = SectionRect {
        top: 1200.0,
        height: 1000.0,
    };
    let mut out = Transform::IDENTITY;
    let mut y = 0.0_f32;

    c.bench_function("section_scroll_update", |b| {
        b.iter(|| {
            y = (y + 7.0) % 2400.0;
            let scroll = ScrollState {
                y,
                viewport_height: 800.0,
            };
            for binding in &mut bindings {
                binding.update(rect, scroll, 0.016, &mut out);
            }
            black_box(out)
        })
    });
}

fn reveal_benchmark(c: &mut Criterion) {
    let mut group = c.benchmark_group("reveal_update");
    let options = RevealOptions::default();
    let rect = SectionRect {
        top: 1000.0,
        height: 900.0,
    };

    for keywords in [2, 8, 32] {
        let mut seq = RevealSequencer::new(
            RevealContent {
                blocks: 4,
                keywords,
            },
            &options,
            ViewportClass::Desktop,
        );
        let mut y = 0.0_f32;
        group.bench_function(format!("{keywords}_keywords"), |b| {
            b.iter(|| {
                y = if y > 0.0 { 0.0 } else { 900.0 };
                seq.update(
                    rect,
                    ScrollState {
                        y,
                        viewport_height: 800.0,
                    },
                    Duration::from_millis(16),
                );
                black_box(seq.values().len())
            })
        });
    }
    group.finish();
}

fn marquee_benchmark(c: &mut Criterion) {
    let mut marquee = Marquee::new(9, MarqueeOptions::default());
    let widths = vec![120.0; marquee.slides().len()];
    marquee.measure(&widths);
    let mut now = Instant::now();

    c.bench_function("marquee_frame", |b| {
        b.iter(|| {
            now += Duration::from_millis(16);
            black_box(marquee.tick(now))
        })
    });
}

criterion_group!(
    benches,
    easing_benchmark,
    scroll_binding_benchmark,
    reveal_benchmark,
    marquee_benchmark
);
criterion_main!(benches);
