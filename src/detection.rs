use crate::bbox::{BBox, Ltrb};

/// One model result: box corners in frame pixels, confidence and class id.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Detection {
    pub x_min: f32,
    pub y_min: f32,
    pub x_max: f32,
    pub y_max: f32,
    pub confidence: f32,
    pub class: i32,
}

impl Detection {
    pub fn new(bbox: BBox<Ltrb>, confidence: f32, class: i32) -> Self {
        Self {
            x_min: bbox.left(),
            y_min: bbox.top(),
            x_max: bbox.right(),
            y_max: bbox.bottom(),
            confidence,
            class,
        }
    }

    #[inline(always)]
    pub fn bbox(&self) -> BBox<Ltrb> {
        BBox::ltrb(self.x_min, self.y_min, self.x_max, self.y_max)
    }

    #[inline]
    pub fn area(&self) -> f32 {
        self.bbox().area()
    }

    #[inline]
    pub fn iou(&self, other: &Detection) -> f32 {
        self.bbox().iou(&other.bbox())
    }
}
