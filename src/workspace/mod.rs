//! Timeline compositor.
//!
//! A [`Workspace`] arranges sources in time (start frame, length, source offset) and in depth
//! (z-order). For any frame it yields the active items bottom-to-top and, for video and audio
//! sources, composites them into a single output, making the workspace itself a source.

use crate::foundation::error::{MontageError, MontageResult};
use crate::foundation::math::clamp_i64;
use crate::frame::pool::{FramePool, FramePoolOpts};
use crate::source::{AudioSource, VideoSource};
use parking_lot::Mutex;
use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

pub(crate) mod audio;
pub(crate) mod sweep;
pub(crate) mod video;

use sweep::IntervalSweep;

/// Stable identifier of a workspace item. Ids grow with insertion order.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct ItemId(u64);

impl ItemId {
    /// Raw id value.
    pub fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for ItemId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, serde::Serialize, serde::Deserialize)]
/// Where an item sits on the timeline.
pub struct Placement {
    /// First timeline frame (or sample) the item covers.
    pub x: i64,
    /// Number of frames covered; zero-width items are never active.
    pub width: i64,
    /// Depth; higher values composite on top.
    #[serde(default)]
    pub z: i32,
    /// Source frame shown at `x`.
    #[serde(default)]
    pub offset: i64,
}

impl Placement {
    /// Item covering `x..x + width` at depth 0 with no source offset.
    pub fn new(x: i64, width: i64) -> Self {
        Self {
            x,
            width,
            z: 0,
            offset: 0,
        }
    }

    /// Same placement at depth `z`.
    pub fn with_z(mut self, z: i32) -> Self {
        self.z = z;
        self
    }

    /// Same placement showing source frame `offset` at `x`.
    pub fn with_offset(mut self, offset: i64) -> Self {
        self.offset = offset;
        self
    }

    /// Exclusive end frame.
    pub fn end(&self) -> i64 {
        self.x.saturating_add(self.width)
    }

    /// True when timeline frame `frame` lies in `x..end`.
    pub fn is_active_at(&self, frame: i64) -> bool {
        self.x <= frame && frame < self.end()
    }

    /// Source frame pulled at timeline frame `frame`, saturating at the `i64` range.
    pub fn source_frame(&self, frame: i64) -> i64 {
        clamp_i64(i128::from(frame) - i128::from(self.x) + i128::from(self.offset))
    }

    /// Check width and range.
    pub fn validate(&self) -> MontageResult<()> {
        if self.width < 0 {
            return Err(MontageError::validation(format!(
                "item width must be >= 0, got {}",
                self.width
            )));
        }
        if self.x.checked_add(self.width).is_none() {
            return Err(MontageError::validation("item end overflows the timeline"));
        }
        // Every covered frame must map to a source frame, and back.
        let last = if self.width > 0 {
            self.x + self.width - 1
        } else {
            self.x
        };
        let fits = self.x.checked_sub(self.offset).is_some()
            && self
                .offset
                .checked_sub(self.x)
                .and_then(|shift| last.checked_add(shift))
                .is_some();
        if !fits {
            return Err(MontageError::validation(format!(
                "item offset {} does not fit the timeline at x={}",
                self.offset, self.x
            )));
        }
        Ok(())
    }
}

/// Snapshot of one workspace item.
pub struct WorkspaceItem<S: ?Sized> {
    id: ItemId,
    placement: Placement,
    source: Arc<S>,
    tag: Option<String>,
}

impl<S: ?Sized> WorkspaceItem<S> {
    /// Item id.
    pub fn id(&self) -> ItemId {
        self.id
    }

    /// Timeline placement.
    pub fn placement(&self) -> Placement {
        self.placement
    }

    /// Source pulled while the item is active.
    pub fn source(&self) -> &Arc<S> {
        &self.source
    }

    /// Free-form label.
    pub fn tag(&self) -> Option<&str> {
        self.tag.as_deref()
    }

    fn depth_key(&self) -> (i32, ItemId) {
        (self.placement.z, self.id)
    }
}

impl<S: ?Sized> Clone for WorkspaceItem<S> {
    fn clone(&self) -> Self {
        Self {
            id: self.id,
            placement: self.placement,
            source: Arc::clone(&self.source),
            tag: self.tag.clone(),
        }
    }
}

impl<S: ?Sized> fmt::Debug for WorkspaceItem<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("WorkspaceItem")
            .field("id", &self.id)
            .field("placement", &self.placement)
            .field("tag", &self.tag)
            .finish_non_exhaustive()
    }
}

struct State<S: ?Sized> {
    items: BTreeMap<ItemId, WorkspaceItem<S>>,
    next_id: u64,
    sweep: IntervalSweep<ItemId>,
    dirty: bool,
}

impl<S: ?Sized> State<S> {
    fn item_mut(&mut self, id: ItemId) -> MontageResult<&mut WorkspaceItem<S>> {
        self.items
            .get_mut(&id)
            .ok_or_else(|| MontageError::not_found(format!("workspace item {id}")))
    }
}

/// Timeline of items over sources of type `S`.
///
/// All methods take `&self`; state sits behind a mutex that is never held while a source is
/// pulled, so nested workspaces and concurrent readers do not serialize on rendering.
pub struct Workspace<S: ?Sized> {
    state: Mutex<State<S>>,
    pool: Mutex<FramePool>,
    channels: usize,
}

/// Workspace of video items.
pub type VideoWorkspace = Workspace<dyn VideoSource>;

/// Workspace of audio items; placements are in samples.
pub type AudioWorkspace = Workspace<dyn AudioSource>;

impl<S: ?Sized> Workspace<S> {
    fn with_channels(channels: usize) -> Self {
        Self {
            state: Mutex::new(State {
                items: BTreeMap::new(),
                next_id: 0,
                sweep: IntervalSweep::default(),
                dirty: true,
            }),
            pool: Mutex::new(FramePool::new(FramePoolOpts::default())),
            channels,
        }
    }

    /// Insert an item and return its id.
    pub fn add_item(&self, source: Arc<S>, placement: Placement) -> MontageResult<ItemId> {
        placement.validate()?;
        let mut st = self.state.lock();
        let id = ItemId(st.next_id);
        st.next_id += 1;
        st.items.insert(
            id,
            WorkspaceItem {
                id,
                placement,
                source,
                tag: None,
            },
        );
        st.dirty = true;
        tracing::debug!(%id, x = placement.x, width = placement.width, z = placement.z, "item added");
        Ok(id)
    }

    /// Remove an item, returning its last state.
    pub fn remove_item(&self, id: ItemId) -> MontageResult<WorkspaceItem<S>> {
        let mut st = self.state.lock();
        let item = st
            .items
            .remove(&id)
            .ok_or_else(|| MontageError::not_found(format!("workspace item {id}")))?;
        st.dirty = true;
        Ok(item)
    }

    /// Move, resize, re-layer or re-offset an item.
    pub fn update_item(&self, id: ItemId, placement: Placement) -> MontageResult<()> {
        placement.validate()?;
        let mut st = self.state.lock();
        st.item_mut(id)?.placement = placement;
        st.dirty = true;
        Ok(())
    }

    /// Replace an item's source.
    pub fn set_source(&self, id: ItemId, source: Arc<S>) -> MontageResult<()> {
        self.state.lock().item_mut(id)?.source = source;
        Ok(())
    }

    /// Replace an item's tag.
    pub fn set_tag(&self, id: ItemId, tag: Option<String>) -> MontageResult<()> {
        self.state.lock().item_mut(id)?.tag = tag;
        Ok(())
    }

    /// Snapshot of one item.
    pub fn item(&self, id: ItemId) -> Option<WorkspaceItem<S>> {
        self.state.lock().items.get(&id).cloned()
    }

    /// Snapshot of every item in insertion order.
    pub fn items(&self) -> Vec<WorkspaceItem<S>> {
        self.state.lock().items.values().cloned().collect()
    }

    /// Item count.
    pub fn len(&self) -> usize {
        self.state.lock().items.len()
    }

    /// True when the workspace has no items.
    pub fn is_empty(&self) -> bool {
        self.state.lock().items.is_empty()
    }

    /// Remove every item.
    pub fn clear(&self) {
        let mut st = self.state.lock();
        st.items.clear();
        st.dirty = true;
    }

    /// `(first, end)` frames covered by non-empty items, `end` exclusive.
    pub fn extent(&self) -> Option<(i64, i64)> {
        let st = self.state.lock();
        st.items
            .values()
            .map(|i| i.placement)
            .filter(|p| p.width > 0)
            .fold(None, |acc, p| match acc {
                None => Some((p.x, p.end())),
                Some((lo, hi)) => Some((lo.min(p.x), hi.max(p.end()))),
            })
    }

    /// Items active at `frame`, bottom-to-top by `(z, insertion order)`.
    pub fn composite_list(&self, frame: i64) -> Vec<WorkspaceItem<S>> {
        let mut guard = self.state.lock();
        let st = &mut *guard;
        if st.dirty {
            st.sweep.rebuild(
                st.items
                    .values()
                    .map(|i| (i.id, i.placement.x, i.placement.end())),
            );
            st.dirty = false;
        }
        let mut list: Vec<WorkspaceItem<S>> = st
            .sweep
            .seek(frame)
            .iter()
            .filter_map(|id| st.items.get(id).cloned())
            .collect();
        list.sort_by_key(|i| i.depth_key());
        list
    }

    /// Items overlapping timeline range `lo..=hi`, bottom-to-top.
    pub(crate) fn overlapping(&self, lo: i64, hi: i64) -> Vec<WorkspaceItem<S>> {
        let st = self.state.lock();
        let mut list: Vec<WorkspaceItem<S>> = st
            .items
            .values()
            .filter(|i| i.placement.width > 0 && i.placement.x <= hi && lo < i.placement.end())
            .cloned()
            .collect();
        list.sort_by_key(|i| i.depth_key());
        list
    }
}

impl<S: ?Sized> fmt::Debug for Workspace<S> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Workspace")
            .field("items", &self.len())
            .finish_non_exhaustive()
    }
}

#[cfg(test)]
#[path = "../../tests/unit/workspace/mod.rs"]
mod tests;
