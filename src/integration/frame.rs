use std::sync::Arc;

/// One raw image buffer delivered by a frame source.
///
/// The pixel data is reference counted so a frame can be handed to a detector
/// and kept by the source without copying.
#[derive(Debug, Clone, Default)]
pub struct Frame {
    /// Sequence number assigned by the source, starting at 0
    pub index: u64,
    /// Image width in pixels
    pub width: u32,
    /// Image height in pixels
    pub height: u32,
    /// Raw image bytes (layout is up to the source/detector pair)
    pub data: Arc<[u8]>,
}

impl Frame {
    pub fn new(index: u64, width: u32, height: u32, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            index,
            width,
            height,
            data: data.into(),
        }
    }

    /// A frame carrying no pixel data, for sources whose detector does not
    /// need the image (replays, synthetic input).
    pub fn empty(index: u64) -> Self {
        Self {
            index,
            ..Self::default()
        }
    }
}
