//! Browser adapters (feature `web`).
//!
//! Reads the viewport from `window`/`matchMedia` and writes transforms to
//! element styles. Event listeners stay with the host page; it forwards
//! them as [`Event`](crate::engine::Event)s.

use rustc_hash::FxHashMap;
use wasm_bindgen::JsValue;
use web_sys::HtmlElement;

use crate::engine::{Runtime, init};
use crate::options::{RevealOptions, SectionId};
use crate::reveal::RevealTarget;
use crate::section::TransformSink;
use crate::transform::{Rgba, Transform};
use crate::viewport::{Breakpoints, MotionPreference, ViewportSnapshot};

/// Media query for the OS reduced-motion setting.
pub const REDUCED_MOTION_QUERY: &str = "(prefers-reduced-motion: reduce)";

/// Install the panic hook and console logger, then run [`init`].
pub fn init_web() -> Runtime {
    console_error_panic_hook::set_once();
    // A second call finds the logger already set; that is fine.
    let _ = console_log::init_with_level(log::Level::Info);
    init()
}

fn px(value: Result<JsValue, JsValue>) -> Option<f32> {
    value.ok().and_then(|v| v.as_f64()).map(|v| v as f32)
}

/// Whether the user asked for reduced motion. `false` if unsupported.
#[must_use]
pub fn prefers_reduced_motion(window: &web_sys::Window) -> bool {
    window
        .match_media(REDUCED_MOTION_QUERY)
        .ok()
        .flatten()
        .is_some_and(|mql| mql.matches())
}

/// Current viewport, or `None` outside a browsing context.
#[must_use]
pub fn read_viewport(breakpoints: &Breakpoints) -> Option<ViewportSnapshot> {
    let window = web_sys::window()?;
    let width = px(window.inner_width())?;
    let height = px(window.inner_height())?;
    Some(ViewportSnapshot {
        width,
        height,
        class: breakpoints.classify(width),
        motion: MotionPreference::from_reduced(prefers_reduced_motion(&window)),
    })
}

fn set_style(element: &HtmlElement, name: &str, value: &str) {
    if let Err(e) = element.style().set_property(name, value) {
        log::debug!("style {name} not written: {e:?}");
    }
}

/// Writes transforms to element inline styles.
#[derive(Debug, Default)]
pub struct DomSink {
    reveal_nodes: FxHashMap<(SectionId, RevealTarget), HtmlElement>,
    text: Option<Rgba>,
    highlight: Option<Rgba>,
}

impl DomSink {
    /// Sink using the reveal colors from `options`.
    #[must_use]
    pub fn new(options: &RevealOptions) -> Self {
        Self {
            reveal_nodes: FxHashMap::default(),
            text: Rgba::from_hex(&options.text_color),
            highlight: Rgba::from_hex(&options.highlight_text_color),
        }
    }

    /// Register the element rendering a reveal target.
    pub fn register_reveal(
        &mut self,
        section: SectionId,
        target: RevealTarget,
        element: HtmlElement,
    ) {
        let _ = self.reveal_nodes.insert((section, target), element);
    }
}

impl TransformSink<HtmlElement> for DomSink {
    fn apply_layer(&mut self, node: &HtmlElement, transform: &Transform) {
        set_style(node, "transform", &transform.to_css());
        set_style(node, "opacity", &format!("{:.3}", transform.opacity));
    }

    fn apply_reveal(
        &mut self,
        section: SectionId,
        target: RevealTarget,
        transform: &Transform,
    ) {
        let Some(node) = self.reveal_nodes.get(&(section, target)) else {
            return;
        };
        match target {
            RevealTarget::Bar(_) => {
                set_style(node, "transform-origin", "left center");
                set_style(
                    node,
                    "transform",
                    &format!("scaleX({:.4})", transform.scale.x),
                );
            }
            RevealTarget::Keyword(_) => {
                if let (Some(from), Some(to)) = (self.text, self.highlight) {
                    let color = from.lerp(&to, transform.color_mix);
                    set_style(node, "color", &color.to_css());
                }
            }
            RevealTarget::Block(_) => {
                set_style(node, "transform", &transform.to_css());
                set_style(node, "opacity", &format!("{:.3}", transform.opacity));
            }
        }
    }
}
