//! Headless demo: replays a scroll session through the motion engine and
//! logs every section's transforms.
//!
//! ```text
//! folio-motion [preset.toml] [testimonials.json]
//! ```

use std::path::Path;

use folio_motion::engine::{Event, MotionEngine, Target};
use folio_motion::input::{InputEvent, Key};
use folio_motion::layer::{LayerHandle, LayerKind, LayerSet};
use folio_motion::locale::{Dictionaries, Dictionary, Locale};
use folio_motion::options::{Options, SectionId};
use folio_motion::reveal::{RevealContent, RevealTarget};
use folio_motion::scroll::SectionRect;
use folio_motion::section::{SectionController, TransformSink};
use folio_motion::transform::Transform;
use folio_motion::{MotionError, init};
use web_time::{Duration, Instant};

const FRAME: Duration = Duration::from_millis(16);
const SECTION_HEIGHT: f32 = 1100.0;
const SAMPLE_FEED: &str = r#"[
    {"id": 1, "name": "Mara Lind", "role": "Founder, Northwind", "quote": "They took our scrappy prototype and shipped a product our customers actually love using every day.", "rating": 5, "avatar": "/avatars/mara.jpg"},
    {"id": 2, "name": "Jonas Weber", "role": "CTO, Kettle", "quote": "Fast, thoughtful and honest about trade-offs.", "rating": 4},
    {"name": "Ines Duarte", "role": "PM, Lumen", "quote": "The discovery workshops alone were worth it.", "rating": 9}
]"#;
const STRINGS_EN: &str = r#"{"testimonials": {
    "loading": "Loading testimonials…",
    "empty": "No testimonials yet.",
    "error": "Testimonials are unavailable right now."
}}"#;
const STRINGS_DE: &str = r#"{"testimonials": {
    "loading": "Kundenstimmen werden geladen…",
    "empty": "Noch keine Kundenstimmen.",
    "error": "Kundenstimmen sind gerade nicht verfügbar."
}}"#;

fn dictionaries() -> Dictionaries {
    let mut dictionaries = Dictionaries::new();
    for (locale, json) in [(Locale::En, STRINGS_EN), (Locale::De, STRINGS_DE)] {
        match Dictionary::from_json(json) {
            Ok(dictionary) => dictionaries.insert(locale, dictionary),
            Err(e) => log::warn!("{} strings unusable: {e}", locale.code()),
        }
    }
    dictionaries
}

/// Logs transforms instead of rendering them.
struct LogSink {
    frame: u32,
}

impl TransformSink<String> for LogSink {
    fn apply_layer(&mut self, node: &String, transform: &Transform) {
        log::info!(
            "[{:>4}] {node:<18} {} opacity {:.2}",
            self.frame,
            transform.to_css(),
            transform.opacity
        );
    }

    fn apply_reveal(
        &mut self,
        section: SectionId,
        target: RevealTarget,
        transform: &Transform,
    ) {
        log::debug!(
            "[{:>4}] {}/{target:?} opacity {:.2} bar {:.2} color {:.2}",
            self.frame,
            section.label(),
            transform.opacity,
            transform.scale.x,
            transform.color_mix
        );
    }
}

fn section(id: SectionId, index: usize) -> SectionController<String> {
    let layers = LayerSet::new(LayerKind::ALL.iter().map(|kind| {
        LayerHandle::new(*kind, format!("{}.{kind:?}", id.label()))
    }));
    SectionController::new(
        id,
        layers,
        2,
        SectionRect {
            top: index as f32 * SECTION_HEIGHT,
            height: SECTION_HEIGHT,
        },
        RevealContent {
            blocks: 3,
            keywords: 2,
        },
    )
}

fn load_options(path: Option<&str>) -> Result<Options, MotionError> {
    path.map_or_else(|| Ok(Options::default()), |p| Options::load(Path::new(p)))
}

fn load_feed(path: Option<&str>) -> Result<String, MotionError> {
    path.map_or_else(
        || Ok(SAMPLE_FEED.to_owned()),
        |p| Ok(std::fs::read_to_string(p)?),
    )
}

fn frames(
    engine: &mut MotionEngine<String>,
    sink: &mut LogSink,
    now: &mut Instant,
    count: u32,
) {
    for _ in 0..count {
        *now += FRAME;
        engine.handle_event(Event::Frame, *now);
        sink.frame += 1;
    }
    engine.apply(sink);
}

fn main() {
    env_logger::init();

    let args: Vec<String> = std::env::args().skip(1).collect();
    let options = match load_options(args.first().map(String::as_str)) {
        Ok(options) => options,
        Err(e) => {
            log::error!("{e}");
            std::process::exit(1);
        }
    };
    let feed = load_feed(args.get(1).map(String::as_str));

    let runtime = init();
    let mut engine = MotionEngine::new(&runtime, options, 1280.0, 800.0, false);
    let mut now = Instant::now();
    let mut sink = LogSink { frame: 0 };

    for (i, id) in SectionId::ALL.iter().enumerate() {
        engine.mount_section(section(*id, i));
        for image in 0..2 {
            engine.handle_event(
                Event::ImageSettled {
                    section: *id,
                    index: image,
                    ok: true,
                },
                now,
            );
        }
    }

    engine.mount_carousel();
    let fetched = feed
        .as_deref()
        .map_err(|e| MotionError::DataSource(e.to_string()));
    engine.load_testimonials(fetched, now);
    engine.handle_event(Event::AvatarSettled { index: 0, ok: false }, now);
    let locale = std::env::var("LANG").map_or(Locale::En, |tag| Locale::from_code(&tag));
    let strings = dictionaries();
    if let Some(carousel) = engine.carousel() {
        let status = carousel
            .phase()
            .status_key()
            .map_or("ready", |key| strings.t(locale, key));
        log::info!(
            "carousel ({}): {status}, {} item(s)",
            locale.code(),
            carousel.len()
        );
    }

    engine.mount_marquee(9);
    let widths: Vec<f32> = (0..27).map(|i| 96.0 + (i % 9) as f32 * 8.0).collect();
    engine.handle_event(Event::MarqueeMeasured(widths), now);

    engine.handle_event(Event::PointerMoved { x: 900.0, y: 300.0 }, now);
    for y in (0..=4400).step_by(400) {
        engine.handle_event(Event::Scroll { y: y as f32 }, now);
        frames(&mut engine, &mut sink, &mut now, 20);
    }

    log::info!("resizing to a phone-sized viewport");
    engine.handle_event(
        Event::Resize {
            width: 600.0,
            height: 900.0,
        },
        now,
    );
    frames(&mut engine, &mut sink, &mut now, 20);

    engine.handle_event(
        Event::Input {
            target: Target::Carousel,
            input: InputEvent::Key(Key::ArrowRight),
        },
        now,
    );
    frames(&mut engine, &mut sink, &mut now, 400);
    if let (Some(carousel), Some(marquee)) = (engine.carousel(), engine.marquee()) {
        log::info!(
            "carousel at {} ({:?}), marquee offset {:.1}/{:.1}px",
            carousel.current(),
            carousel.positions(),
            marquee.offset(),
            marquee.loop_width()
        );
    }

    engine.teardown();
    log::info!("torn down; frames still needed: {}", engine.needs_frames());
}
