/// The opaque GPU object identifiers backing one primitive's vertex buffer.
///
/// The values are whatever the graphics backend handed out; this crate never
/// interprets them. An `ebo` of 0 means no element buffer is in use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct GpuHandles {
    /// Vertex array object.
    pub vao: u32,
    /// Vertex buffer object.
    pub vbo: u32,
    /// Element (index) buffer object, or 0.
    pub ebo: u32,
}

impl GpuHandles {
    /// Creates a handle triple.
    #[must_use]
    pub fn new(vao: u32, vbo: u32, ebo: u32) -> Self {
        Self { vao, vbo, ebo }
    }

    /// The element buffer, if one is in use.
    #[must_use]
    pub fn element_buffer(&self) -> Option<u32> {
        (self.ebo != 0).then_some(self.ebo)
    }
}

/// Frees GPU objects on behalf of a controller that is being dropped.
///
/// Called at most once per controller, and only if handles were bound.
pub trait GpuResourceRelease: Send + Sync {
    /// Releases the given handles.
    fn release(&self, handles: GpuHandles);
}
