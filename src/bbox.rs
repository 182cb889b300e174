use std::marker::PhantomData;

pub trait BBoxFormat: std::fmt::Debug {}

/// Left-top-right-bottom format, contains left top and right bottom corners
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Ltrb;
impl BBoxFormat for Ltrb {}

/// X-y-width-height format, contains coordinates of the center of bbox and width-height
#[derive(Debug, Copy, Clone, PartialEq)]
pub struct Xywh;
impl BBoxFormat for Xywh {}

#[derive(Debug, Clone, Copy, PartialEq)]
pub struct BBox<F: BBoxFormat>([f32; 4], PhantomData<F>);

impl<F: BBoxFormat> From<BBox<F>> for [f32; 4] {
    fn from(bbox: BBox<F>) -> Self {
        bbox.0
    }
}

impl<F: BBoxFormat> BBox<F> {
    #[inline]
    pub fn as_slice(&self) -> &[f32; 4] {
        &self.0
    }

    /// Moves the box by `dx` along the x axis and `dy` along the y axis.
    #[inline]
    pub fn shifted(&self, dx: f32, dy: f32) -> Self {
        BBox(
            [self.0[0] + dx, self.0[1] + dy, self.0[2] + dx, self.0[3] + dy],
            Default::default(),
        )
    }

    /// Scales every coordinate, `sx` along the x axis and `sy` along the y axis.
    #[inline]
    pub fn scaled(&self, sx: f32, sy: f32) -> Self {
        BBox(
            [self.0[0] * sx, self.0[1] * sy, self.0[2] * sx, self.0[3] * sy],
            Default::default(),
        )
    }
}

impl BBox<Ltrb> {
    #[inline]
    pub fn ltrb(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], Default::default())
    }

    #[inline(always)]
    pub fn left(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn top(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn right(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn bottom(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn area(&self) -> f32 {
        (self.right() - self.left()) * (self.bottom() - self.top())
    }

    /// Intersection over union. Zero when the union is degenerate.
    pub fn iou(&self, other: &BBox<Ltrb>) -> f32 {
        let i_left = self.left().max(other.left());
        let i_top = self.top().max(other.top());
        let i_right = self.right().min(other.right());
        let i_bottom = self.bottom().min(other.bottom());
        let i_area = (i_right - i_left).max(0.) * (i_bottom - i_top).max(0.);

        let union = self.area() + other.area() - i_area;
        if union <= 0. {
            return 0.;
        }

        i_area / union
    }

    /// Top-left and bottom-right corners truncated to pixel coordinates,
    /// whatever order the box was given in.
    #[inline]
    pub fn corners(&self) -> ((i32, i32), (i32, i32)) {
        let (l, r) = (self.left().min(self.right()), self.left().max(self.right()));
        let (t, b) = (self.top().min(self.bottom()), self.top().max(self.bottom()));

        ((l as i32, t as i32), (r as i32, b as i32))
    }
}

impl BBox<Xywh> {
    #[inline]
    pub fn xywh(x1: f32, x2: f32, x3: f32, x4: f32) -> Self {
        BBox([x1, x2, x3, x4], Default::default())
    }

    #[inline(always)]
    pub fn cx(&self) -> f32 {
        self.0[0]
    }

    #[inline(always)]
    pub fn cy(&self) -> f32 {
        self.0[1]
    }

    #[inline(always)]
    pub fn width(&self) -> f32 {
        self.0[2]
    }

    #[inline(always)]
    pub fn height(&self) -> f32 {
        self.0[3]
    }

    #[inline]
    pub fn as_ltrb(&self) -> BBox<Ltrb> {
        self.into()
    }
}

impl<'a> From<&'a BBox<Xywh>> for BBox<Ltrb> {
    #[inline]
    fn from(v: &'a BBox<Xywh>) -> Self {
        let w2 = v.0[2] / 2.;
        let h2 = v.0[3] / 2.;

        Self(
            [v.0[0] - w2, v.0[1] - h2, v.0[0] + w2, v.0[1] + h2],
            Default::default(),
        )
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn center_box_to_corners() {
        let b = BBox::xywh(20., 30., 10., 4.).as_ltrb();
        assert_eq!(b.as_slice(), &[15., 28., 25., 32.]);
        assert_eq!(b.area(), 40.);
    }

    #[test]
    fn iou_of_identical_and_disjoint_boxes() {
        let a = BBox::ltrb(0., 0., 10., 10.);
        let b = BBox::ltrb(20., 20., 30., 30.);

        assert!((a.iou(&a) - 1.0).abs() < 1e-6);
        assert_eq!(a.iou(&b), 0.0);
    }

    #[test]
    fn iou_of_half_overlap() {
        let a = BBox::ltrb(0., 0., 10., 10.);
        let b = BBox::ltrb(5., 0., 15., 10.);

        // 50 / (100 + 100 - 50)
        assert!((a.iou(&b) - 1.0 / 3.0).abs() < 1e-6);
    }

    #[test]
    fn degenerate_box_has_zero_iou() {
        let a = BBox::ltrb(5., 5., 5., 5.);
        assert_eq!(a.iou(&a), 0.0);
    }

    #[test]
    fn corners_truncate_towards_zero() {
        let b = BBox::ltrb(10.9, 10.2, 25.7, 25.5);
        assert_eq!(b.corners(), ((10, 10), (25, 25)));
    }

    #[test]
    fn corners_of_inverted_box_are_ordered() {
        let b = BBox::ltrb(25., 30., 10., 12.);
        assert_eq!(b.corners(), ((10, 12), (25, 30)));
    }

    #[test]
    fn shifted_moves_both_corners() {
        let b = BBox::ltrb(10., 10., 20., 20.).shifted(-5., 3.);
        assert_eq!(b.as_slice(), &[5., 13., 15., 23.]);
    }

    #[test]
    fn scaled_applies_per_axis() {
        let b = BBox::ltrb(10., 10., 20., 20.).scaled(2.0, 0.5);
        assert_eq!(b.as_slice(), &[20., 5., 40., 10.]);
    }
}
