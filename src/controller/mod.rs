//! Thread-safe owner of one primitive and its render cache.
//!
//! Every edit and every render takes the controller's fence, a non-blocking lock
//! around the primitive. A caller that finds the fence held gets
//! [`ControllerError::Contention`] straight away; nothing waits or queues. Successful
//! edits mark the vertex cache dirty, and the next render rebuilds it once.

mod gpu;
mod renderer;

pub use gpu::{GpuHandles, GpuResourceRelease};
pub use renderer::{DrawRequest, Renderer};

use std::sync::atomic::{AtomicBool, AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, OnceLock, PoisonError, RwLock, TryLockError};

use tracing::{debug, warn};

use crate::config::PrimitiveConfig;
use crate::error::{ControllerError, Result};
use crate::math::{Matrix4, Point3};
use crate::operations::modification::{
    AppendSegment, MergeSegments, PrependSegment, SetFill, SetSegmentPoints, SplitSegment,
};
use crate::tessellation::{project_vertices, split_by_kind, TessellationParams, Vertex};
use crate::topology::{Primitive, SegmentData, SegmentId, SegmentKind};

/// Owns a [`Primitive`], keeps its vertex cache in step with it, and holds the GPU
/// handles the cache is drawn from.
pub struct PrimitiveController {
    primitive: Mutex<Primitive>,
    dirty: AtomicBool,
    cache: RwLock<Arc<[Vertex]>>,
    handles: OnceLock<GpuHandles>,
    rebuilds: AtomicU64,
    release: Option<Arc<dyn GpuResourceRelease>>,
    tessellation: TessellationParams,
}

impl Default for PrimitiveController {
    fn default() -> Self {
        Self::new(PrimitiveConfig::default())
    }
}

impl PrimitiveController {
    /// Creates a controller around an empty primitive.
    #[must_use]
    pub fn new(config: PrimitiveConfig) -> Self {
        Self::from_primitive(Primitive::new(config))
    }

    /// Creates a controller that takes over an existing primitive.
    ///
    /// The cache starts empty and dirty, so the first render projects the primitive.
    #[must_use]
    pub fn from_primitive(primitive: Primitive) -> Self {
        let tessellation = primitive.config().tessellation;
        Self {
            primitive: Mutex::new(primitive),
            dirty: AtomicBool::new(true),
            cache: RwLock::new(Arc::from(Vec::new())),
            handles: OnceLock::new(),
            rebuilds: AtomicU64::new(0),
            release: None,
            tessellation,
        }
    }

    /// Installs the hook that frees bound GPU handles when the controller is dropped.
    #[must_use]
    pub fn with_release_hook(mut self, release: Arc<dyn GpuResourceRelease>) -> Self {
        self.release = Some(release);
        self
    }

    fn fence(&self) -> Result<MutexGuard<'_, Primitive>> {
        match self.primitive.try_lock() {
            Ok(guard) => Ok(guard),
            Err(TryLockError::WouldBlock) => {
                warn!("primitive busy; operation rejected");
                Err(ControllerError::Contention.into())
            }
            Err(TryLockError::Poisoned(_)) => Err(ControllerError::Poisoned.into()),
        }
    }

    /// Runs an edit under the fence and marks the cache dirty if it succeeds.
    fn mutate<T>(&self, edit: impl FnOnce(&mut Primitive) -> Result<T>) -> Result<T> {
        let mut primitive = self.fence()?;
        let out = edit(&mut primitive)?;
        self.dirty.store(true, Ordering::Release);
        Ok(out)
    }

    // --- Edits ---

    /// Appends a segment after the tail. See [`AppendSegment`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held or the segment does not meet the tail.
    pub fn append_segment(&self, segment: SegmentData) -> Result<SegmentId> {
        self.mutate(|p| AppendSegment::new(segment).execute(p))
    }

    /// Prepends a segment before the head. See [`PrependSegment`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held or the segment does not meet the head.
    pub fn prepend_segment(&self, segment: SegmentData) -> Result<SegmentId> {
        self.mutate(|p| PrependSegment::new(segment).execute(p))
    }

    /// Splits the segment under `point`. See [`SplitSegment`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held, the point is off the path, or it sits on
    /// a segment boundary.
    pub fn split_segment(&self, point: Point3) -> Result<(SegmentId, SegmentId)> {
        self.mutate(|p| SplitSegment::new(point).execute(p))
    }

    /// Merges `second` into the segment before it. See [`MergeSegments`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held or the segments are not adjacent.
    pub fn merge_segments(&self, first: SegmentId, second: SegmentId) -> Result<SegmentId> {
        self.mutate(|p| MergeSegments::new(first, second).execute(p))
    }

    /// Replaces one segment's points. See [`SetSegmentPoints`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held or the edit would break the chain.
    pub fn set_segment_points(
        &self,
        id: SegmentId,
        start: Point3,
        end: Point3,
        kind: SegmentKind,
        carry_neighbours: bool,
    ) -> Result<()> {
        let mut edit = SetSegmentPoints::new(id, start, end, kind);
        if carry_neighbours {
            edit = edit.carrying_neighbours();
        }
        self.mutate(|p| edit.execute(p))
    }

    /// Turns the fill on or off. See [`SetFill`].
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held, or if filling an open chain without
    /// `force`.
    pub fn set_fill(&self, filled: bool, force: bool) -> Result<Option<SegmentId>> {
        let mut op = SetFill::new(filled);
        if force {
            op = op.forced();
        }
        self.mutate(|p| op.execute(p))
    }

    /// Replaces the curve-to-world transform and refreshes the summary.
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held.
    pub fn change_pose(&self, bezier_to_world: Matrix4) -> Result<()> {
        self.mutate(|p| {
            p.set_bezier_to_world(bezier_to_world);
            p.refresh()
        })
    }

    /// Reads the primitive under the fence.
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held.
    pub fn inspect<R>(&self, read: impl FnOnce(&Primitive) -> R) -> Result<R> {
        let primitive = self.fence()?;
        Ok(read(&primitive))
    }

    // --- GPU handles ---

    /// Binds the GPU handles for this primitive.
    ///
    /// Only the first call has an effect; it returns `true`. Later calls leave the
    /// bound handles alone and return `false`.
    pub fn bind_gpu_buffer_handles(&self, handles: GpuHandles) -> bool {
        let bound = self.handles.set(handles).is_ok();
        if bound {
            debug!(vao = handles.vao, vbo = handles.vbo, ebo = handles.ebo, "gpu handles bound");
        }
        bound
    }

    /// The bound handle triple, if any.
    #[must_use]
    pub fn gpu_handles(&self) -> Option<GpuHandles> {
        self.handles.get().copied()
    }

    #[must_use]
    pub fn vao_handle(&self) -> Option<u32> {
        self.gpu_handles().map(|h| h.vao)
    }

    #[must_use]
    pub fn vbo_handle(&self) -> Option<u32> {
        self.gpu_handles().map(|h| h.vbo)
    }

    #[must_use]
    pub fn ebo_handle(&self) -> Option<u32> {
        self.gpu_handles().map(|h| h.ebo)
    }

    // --- Cache ---

    /// The most recently projected vertices. Never triggers a rebuild.
    ///
    /// Reads do not take the fence, so they succeed while an edit or render is in
    /// flight. They can only wait on the instant a render swaps in a freshly projected
    /// buffer: projection happens before the cache lock is taken, and the lock is held
    /// just long enough to exchange one `Arc`. A snapshot returned here stays valid
    /// after later rebuilds.
    #[must_use]
    pub fn get_vertex_buffer_cache(&self) -> Arc<[Vertex]> {
        Arc::clone(&self.cache.read().unwrap_or_else(PoisonError::into_inner))
    }

    /// Whether the cache is behind the primitive.
    #[must_use]
    pub fn get_buffer_dirty_state(&self) -> bool {
        self.dirty.load(Ordering::Acquire)
    }

    /// How many times the cache has been rebuilt.
    #[must_use]
    pub fn cache_rebuilds(&self) -> u64 {
        self.rebuilds.load(Ordering::Relaxed)
    }

    /// Draws the primitive, rebuilding the cache first if it is dirty.
    ///
    /// On the first render without bound handles, the renderer is asked to allocate
    /// them. The fence is held for the whole call, so edits attempted from inside
    /// [`Renderer::draw`] are rejected.
    ///
    /// # Errors
    ///
    /// Returns an error if the fence is held, projection fails (the cache then stays
    /// dirty), or the renderer fails.
    pub fn render(&self, renderer: &dyn Renderer, model_matrix: &Matrix4) -> Result<()> {
        let primitive = self.fence()?;

        if self.dirty.load(Ordering::Acquire) {
            let vertices = project_vertices(&primitive, &self.tessellation)?;
            let count = vertices.len();
            let fresh: Arc<[Vertex]> = Arc::from(vertices);
            let stale = std::mem::replace(
                &mut *self.cache.write().unwrap_or_else(PoisonError::into_inner),
                fresh,
            );
            // The old buffer may be large; free it after the lock is released.
            drop(stale);
            self.dirty.store(false, Ordering::Release);
            let rebuilds = self.rebuilds.fetch_add(1, Ordering::Relaxed) + 1;
            debug!(vertices = count, rebuilds, "vertex cache rebuilt");
        }

        let handles = match self.gpu_handles() {
            Some(handles) => handles,
            None => {
                let allocated = renderer.allocate_handles()?;
                self.bind_gpu_buffer_handles(allocated);
                self.gpu_handles().unwrap_or(allocated)
            }
        };

        let cache = self.get_vertex_buffer_cache();
        let (stroke, fill) = split_by_kind(&cache);
        let request = DrawRequest {
            handles,
            stroke,
            fill,
            bezier_to_world: primitive.bezier_to_world(),
        };
        renderer.draw(&request, model_matrix)?;
        Ok(())
    }
}

impl Drop for PrimitiveController {
    fn drop(&mut self) {
        if let Some(handles) = self.handles.get() {
            match &self.release {
                Some(release) => {
                    release.release(*handles);
                    debug!(vao = handles.vao, "gpu handles released");
                }
                None => warn!(
                    vao = handles.vao,
                    vbo = handles.vbo,
                    ebo = handles.ebo,
                    "gpu handles bound without a release hook; leaking them"
                ),
            }
        }
        let primitive = self
            .primitive
            .get_mut()
            .unwrap_or_else(PoisonError::into_inner);
        let released = primitive.clean_up_chain();
        debug!(released, "controller dropped");
    }
}
