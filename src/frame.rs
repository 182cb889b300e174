use crate::annotate::Canvas;

/// A captured image that annotations are drawn onto in place.
pub trait Frame: Canvas {
    /// (width, height) in pixels.
    fn dimensions(&self) -> (u32, u32);

    #[inline]
    fn is_empty(&self) -> bool {
        let (w, h) = self.dimensions();
        w == 0 || h == 0
    }
}
