//! Hardware state validation
//!
//! Hardware state is split into groups. A group is either absent from the
//! cache (invalid) or holds the value derived from the host state when it was
//! last validated. [`ValidationCache::get_or_derive`] re-derives a group only
//! when it is invalid; invalidation is driven by the host's modification
//! flags.
//!
//! ```text
//!             invalidate(G) / invalidate_all()
//!        ┌──────────────────────────────────────┐
//!        ▼                                      │
//!   ┌─────────┐   get_or_derive(G)         ┌────┴────┐
//!   │ Invalid │ ─────────────────────────► │  Valid  │ ──┐ get_or_derive(G)
//!   └─────────┘   derive + count           └─────────┘ ◄─┘ no work
//! ```

use std::collections::BTreeMap;

use log::{debug, error};

use g2d::blend::translate;
use g2d::format;
use g2d::{BlendFunction, BufferHandle, ImageObject};

use crate::config::BufferBackend;
use crate::state::{CardState, Color, Surface};
use crate::{Error, Result};

/// Unit of validation.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum StateGroup {
    Destination,
    Source,
    Color,
    Blend,
    Clip,
}

impl StateGroup {
    pub const ALL: [StateGroup; 5] = [
        StateGroup::Destination,
        StateGroup::Source,
        StateGroup::Color,
        StateGroup::Blend,
        StateGroup::Clip,
    ];
}

/// Clip rectangle with exclusive right and bottom edges.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct ClipRect {
    pub x1: i32,
    pub y1: i32,
    pub x2: i32,
    pub y2: i32,
}

impl ClipRect {
    pub fn width(&self) -> i32 {
        self.x2 - self.x1
    }

    pub fn height(&self) -> i32 {
        self.y2 - self.y1
    }
}

/// Value derived for one group.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Derived {
    Destination(ImageObject),
    Source(ImageObject),
    Color(Color),
    Blend { src: BlendFunction, dst: BlendFunction },
    Clip(ClipRect),
}

impl Derived {
    pub fn group(&self) -> StateGroup {
        match self {
            Derived::Destination(_) => StateGroup::Destination,
            Derived::Source(_) => StateGroup::Source,
            Derived::Color(_) => StateGroup::Color,
            Derived::Blend { .. } => StateGroup::Blend,
            Derived::Clip(_) => StateGroup::Clip,
        }
    }
}

/// Derived hardware state of one driver instance.
#[derive(Debug)]
pub struct ValidationCache {
    backend: BufferBackend,
    entries: BTreeMap<StateGroup, Derived>,
    derivations: BTreeMap<StateGroup, usize>,
}

impl ValidationCache {
    /// Empty cache; every group starts invalid.
    pub fn new(backend: BufferBackend) -> Self {
        Self {
            backend,
            entries: BTreeMap::new(),
            derivations: BTreeMap::new(),
        }
    }

    pub fn backend(&self) -> BufferBackend {
        self.backend
    }

    pub fn is_valid(&self, group: StateGroup) -> bool {
        self.entries.contains_key(&group)
    }

    pub fn invalidate(&mut self, group: StateGroup) {
        if self.entries.remove(&group).is_some() {
            debug!("G2D: <- {:?}", group);
        }
    }

    pub fn invalidate_all(&mut self) {
        debug!("G2D: <- ALL");
        self.entries.clear();
    }

    /// Cached value of `group`, deriving it from `state` if invalid.
    pub fn get_or_derive(&mut self, group: StateGroup, state: &CardState) -> Result<&Derived> {
        if !self.entries.contains_key(&group) {
            let derived = derive(group, state, self.backend)?;
            *self.derivations.entry(group).or_insert(0) += 1;
            self.entries.insert(group, derived);
        }

        self.get(group)
    }

    /// Cached value of `group`, without deriving.
    pub fn get(&self, group: StateGroup) -> Result<&Derived> {
        self.entries.get(&group).ok_or(Error::NotValidated(group))
    }

    /// How many times `group` has been derived.
    pub fn derivations(&self, group: StateGroup) -> usize {
        self.derivations.get(&group).copied().unwrap_or(0)
    }

    pub fn destination(&self) -> Result<ImageObject> {
        match self.get(StateGroup::Destination)? {
            Derived::Destination(img) => Ok(*img),
            _ => Err(Error::NotValidated(StateGroup::Destination)),
        }
    }

    pub fn source(&self) -> Result<ImageObject> {
        match self.get(StateGroup::Source)? {
            Derived::Source(img) => Ok(*img),
            _ => Err(Error::NotValidated(StateGroup::Source)),
        }
    }

    pub fn color(&self) -> Result<Color> {
        match self.get(StateGroup::Color)? {
            Derived::Color(color) => Ok(*color),
            _ => Err(Error::NotValidated(StateGroup::Color)),
        }
    }

    /// Source and destination blend functions.
    pub fn blend(&self) -> Result<(BlendFunction, BlendFunction)> {
        match self.get(StateGroup::Blend)? {
            Derived::Blend { src, dst } => Ok((*src, *dst)),
            _ => Err(Error::NotValidated(StateGroup::Blend)),
        }
    }

    pub fn clip(&self) -> Result<ClipRect> {
        match self.get(StateGroup::Clip)? {
            Derived::Clip(clip) => Ok(*clip),
            _ => Err(Error::NotValidated(StateGroup::Clip)),
        }
    }
}

fn image(surface: &Surface, backend: BufferBackend, side: &str) -> Result<ImageObject> {
    let entry = format::lookup(surface.format).ok_or_else(|| {
        error!("G2D: unexpected {} pixel format {}", side, surface.format);
        g2d::Error::UnsupportedFormat(surface.format)
    })?;

    let handle = match backend {
        BufferBackend::Gem => BufferHandle::Gem(surface.gem_handle),
        BufferBackend::Physical => BufferHandle::Physical(surface.phys),
    };

    let img = ImageObject::new(handle, surface.pitch, entry);
    debug!(
        "G2D: {} {} ({:?}:{:?}), byte:{}, pitch:{}, handle:{:?}",
        side, surface.format, img.format, img.order, img.bytes_per_pixel, img.pitch, img.handle
    );
    Ok(img)
}

fn derive(group: StateGroup, state: &CardState, backend: BufferBackend) -> Result<Derived> {
    let derived = match group {
        StateGroup::Destination => {
            Derived::Destination(image(&state.destination, backend, "destination")?)
        }
        StateGroup::Source => {
            let source = state.source.as_ref().ok_or(Error::MissingSource)?;
            Derived::Source(image(source, backend, "source")?)
        }
        StateGroup::Color => {
            let color = state.color;
            debug!("G2D: color {:#010x}", color.to_argb());
            Derived::Color(color)
        }
        StateGroup::Blend => {
            let src = translate(state.src_blend);
            let dst = translate(state.dst_blend);
            debug!(
                "G2D: blend src {:?} -> {:?}, dst {:?} -> {:?}",
                state.src_blend, src, state.dst_blend, dst
            );
            Derived::Blend { src, dst }
        }
        StateGroup::Clip => {
            let clip = state.clip;
            let rect = ClipRect {
                x1: clip.x1,
                y1: clip.y1,
                x2: clip.x2.saturating_add(1),
                y2: clip.y2.saturating_add(1),
            };
            debug!(
                "G2D: clip L:{} T:{} W:{} H:{}",
                rect.x1,
                rect.y1,
                rect.width(),
                rect.height()
            );
            Derived::Clip(rect)
        }
    };

    Ok(derived)
}
