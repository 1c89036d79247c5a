//! Section layers and image-settle gating.
//!
//! Every section owns a small fixed set of layers. A layer whose host node
//! was never rendered is represented by an empty [`LayerHandle`] and is
//! skipped by every binding instead of failing.

use crate::transform::LayerTransform;

/// Visual role of a layer within a section.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum LayerKind {
    /// Far background image.
    Background,
    /// Foreground cutout image.
    Foreground,
    /// Decorative "bucket" element.
    Bucket,
    /// Section title text.
    Title,
}

impl LayerKind {
    /// All layer kinds in back-to-front order.
    pub const ALL: [Self; 4] =
        [Self::Background, Self::Foreground, Self::Bucket, Self::Title];
}

/// Ownership-scoped reference to a host node plus its transform channels.
#[derive(Debug, Clone)]
pub struct LayerHandle<N> {
    kind: LayerKind,
    node: Option<N>,
    transform: LayerTransform,
}

impl<N> LayerHandle<N> {
    /// A layer backed by a rendered node.
    pub fn new(kind: LayerKind, node: N) -> Self {
        Self {
            kind,
            node: Some(node),
            transform: LayerTransform::default(),
        }
    }

    /// A layer whose node is missing.
    pub fn missing(kind: LayerKind) -> Self {
        Self {
            kind,
            node: None,
            transform: LayerTransform::default(),
        }
    }

    /// Layer role.
    pub fn kind(&self) -> LayerKind {
        self.kind
    }

    /// Host node, if rendered.
    pub fn node(&self) -> Option<&N> {
        self.node.as_ref()
    }

    /// Whether bindings can attach to this layer.
    pub fn is_present(&self) -> bool {
        self.node.is_some()
    }

    /// Current transform channels.
    pub fn transform(&self) -> &LayerTransform {
        &self.transform
    }

    /// Mutable transform channels.
    pub fn transform_mut(&mut self) -> &mut LayerTransform {
        &mut self.transform
    }

    /// Reset every channel to identity.
    pub fn reset(&mut self) {
        self.transform = LayerTransform::default();
    }
}

/// The layers of one section, at most one per [`LayerKind`].
#[derive(Debug, Clone)]
pub struct LayerSet<N> {
    layers: Vec<LayerHandle<N>>,
}

impl<N> LayerSet<N> {
    /// Build from handles. Kinds not listed are treated as missing.
    pub fn new(handles: impl IntoIterator<Item = LayerHandle<N>>) -> Self {
        let mut layers: Vec<LayerHandle<N>> = Vec::with_capacity(4);
        for handle in handles {
            if let Some(existing) =
                layers.iter_mut().find(|l| l.kind == handle.kind)
            {
                *existing = handle;
            } else {
                layers.push(handle);
            }
        }
        for kind in LayerKind::ALL {
            if !layers.iter().any(|l| l.kind == kind) {
                layers.push(LayerHandle::missing(kind));
            }
        }
        layers.sort_by_key(|l| l.kind);
        Self { layers }
    }

    /// Handle for a kind.
    pub fn get(&self, kind: LayerKind) -> Option<&LayerHandle<N>> {
        self.layers.iter().find(|l| l.kind == kind)
    }

    /// Mutable handle for a kind, only if its node is present.
    pub fn present_mut(&mut self, kind: LayerKind) -> Option<&mut LayerHandle<N>> {
        self.layers
            .iter_mut()
            .find(|l| l.kind == kind && l.is_present())
    }

    /// Whether the node for a kind is present.
    pub fn is_present(&self, kind: LayerKind) -> bool {
        self.get(kind).is_some_and(LayerHandle::is_present)
    }

    /// Iterate all handles, back to front.
    pub fn iter(&self) -> impl Iterator<Item = &LayerHandle<N>> {
        self.layers.iter()
    }

    /// Reset every layer's channels.
    pub fn reset(&mut self) {
        for layer in &mut self.layers {
            layer.reset();
        }
    }
}

/// Load state of one image.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ImageLoad {
    /// Still loading.
    Pending,
    /// Loaded.
    Loaded,
    /// Failed; counts as settled.
    Failed,
}

/// Tracks a batch of images and reports when all have settled.
///
/// There is no timeout: a stalled image keeps the gate closed.
#[derive(Debug, Clone, Default)]
pub struct ImageGate {
    images: Vec<ImageLoad>,
}

impl ImageGate {
    /// Gate over `count` images, all pending.
    #[must_use]
    pub fn new(count: usize) -> Self {
        Self {
            images: vec![ImageLoad::Pending; count],
        }
    }

    /// Record a load or error. Out-of-range indices are ignored.
    /// Returns true if this call settled the whole batch.
    pub fn settle(&mut self, index: usize, ok: bool) -> bool {
        let was_settled = self.is_settled();
        if let Some(slot) = self.images.get_mut(index) {
            if *slot == ImageLoad::Pending {
                *slot = if ok {
                    ImageLoad::Loaded
                } else {
                    ImageLoad::Failed
                };
            }
        }
        !was_settled && self.is_settled()
    }

    /// Whether every image has loaded or failed. Vacuously true when empty.
    #[must_use]
    pub fn is_settled(&self) -> bool {
        self.images.iter().all(|s| *s != ImageLoad::Pending)
    }

    /// Number of images that failed.
    #[must_use]
    pub fn failed(&self) -> usize {
        self.images
            .iter()
            .filter(|s| **s == ImageLoad::Failed)
            .count()
    }

    /// Number of images tracked.
    #[must_use]
    pub fn len(&self) -> usize {
        self.images.len()
    }

    /// Whether no images are tracked.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.images.is_empty()
    }
}
