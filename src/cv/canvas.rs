use opencv::{
    core::{self, Mat},
    imgproc,
    prelude::*,
};

use crate::annotate::Canvas;
use crate::error::Error;
use crate::frame::Frame;
use crate::palette::Color;

pub const LABEL_FONT_SCALE: f64 = 0.7;

#[inline]
pub fn to_scalar(color: Color) -> core::Scalar {
    core::Scalar::new(color.b as f64, color.g as f64, color.r as f64, 0.0)
}

impl Canvas for Mat {
    fn draw_box(
        &mut self,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Color,
        thickness: i32,
    ) -> Result<(), Error> {
        let (l, r) = (top_left.0.min(bottom_right.0), top_left.0.max(bottom_right.0));
        let (t, b) = (top_left.1.min(bottom_right.1), top_left.1.max(bottom_right.1));

        // OpenCV stops a rect one pixel short of its size, keep both corners inclusive.
        let rect = core::Rect::new(l, t, r - l + 1, b - t + 1);

        imgproc::rectangle(self, rect, to_scalar(color), thickness, imgproc::LINE_8, 0)?;

        Ok(())
    }

    fn draw_label(&mut self, text: &str, origin: (i32, i32), color: Color) -> Result<(), Error> {
        imgproc::put_text(
            self,
            text,
            core::Point::new(origin.0, origin.1),
            imgproc::FONT_HERSHEY_SIMPLEX,
            LABEL_FONT_SCALE,
            to_scalar(color),
            1,
            imgproc::LINE_8,
            false,
        )?;

        Ok(())
    }
}

impl Frame for Mat {
    #[inline]
    fn dimensions(&self) -> (u32, u32) {
        (self.cols().max(0) as u32, self.rows().max(0) as u32)
    }
}
