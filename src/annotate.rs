use log::warn;

use crate::config::FilterConfig;
use crate::detection::Detection;
use crate::detector::ClassNames;
use crate::error::Error;
use crate::palette::{Color, ColorSource, Palette, RandomColors};

pub const BOX_THICKNESS: i32 = 2;
pub const LABEL_OFFSET: (i32, i32) = (5, -5);

/// Drawing surface for boxes and labels.
pub trait Canvas {
    fn draw_box(
        &mut self,
        top_left: (i32, i32),
        bottom_right: (i32, i32),
        color: Color,
        thickness: i32,
    ) -> Result<(), Error>;

    fn draw_label(&mut self, text: &str, origin: (i32, i32), color: Color) -> Result<(), Error>;
}

/// A box and its label, ready to draw.
#[derive(Debug, Clone, PartialEq)]
pub struct Annotation {
    pub top_left: (i32, i32),
    pub bottom_right: (i32, i32),
    pub label: String,
    pub label_origin: (i32, i32),
    pub color: Color,
}

impl Annotation {
    pub fn draw<C: Canvas + ?Sized>(&self, canvas: &mut C) -> Result<(), Error> {
        canvas.draw_box(self.top_left, self.bottom_right, self.color, BOX_THICKNESS)?;
        canvas.draw_label(&self.label, self.label_origin, self.color)
    }
}

#[inline]
pub fn label(class_name: &str, confidence: f32) -> String {
    format!("{}: {:.2}", class_name, confidence)
}

/// Display-time filter plus the class color mapping.
#[derive(Debug)]
pub struct Annotator<C = RandomColors> {
    filter: FilterConfig,
    palette: Palette<C>,
}

impl<C: ColorSource> Annotator<C> {
    pub fn new(filter: FilterConfig, colors: C) -> Self {
        Self {
            filter,
            palette: Palette::new(colors),
        }
    }

    #[inline]
    pub fn filter(&self) -> &FilterConfig {
        &self.filter
    }

    #[inline]
    pub fn palette(&self) -> &Palette<C> {
        &self.palette
    }

    /// Whether a detection clears the confidence and area thresholds.
    #[inline]
    pub fn accepts(&self, det: &Detection) -> bool {
        det.confidence > self.filter.min_confidence && det.area() > self.filter.min_area
    }

    /// Filters the detections and lays out what should be drawn for them.
    ///
    /// Detections whose class id is missing from `names` are logged and dropped.
    pub fn plan(&mut self, detections: &[Detection], names: &ClassNames) -> Vec<Annotation> {
        let mut out = Vec::with_capacity(detections.len());

        for det in detections {
            if !self.accepts(det) {
                continue;
            }

            let class_name = match names.get(det.class) {
                Some(name) => name,
                None => {
                    warn!("class id {} not found in the model class table", det.class);
                    continue;
                }
            };

            let color = self.palette.color_for(class_name);
            let (top_left, bottom_right) = det.bbox().corners();

            out.push(Annotation {
                top_left,
                bottom_right,
                label: label(class_name, det.confidence),
                label_origin: (top_left.0 + LABEL_OFFSET.0, top_left.1 + LABEL_OFFSET.1),
                color,
            });
        }

        out
    }

    /// Plans and draws onto `canvas`, returning the number of annotations drawn.
    pub fn annotate<F: Canvas + ?Sized>(
        &mut self,
        canvas: &mut F,
        detections: &[Detection],
        names: &ClassNames,
    ) -> Result<usize, Error> {
        let annotations = self.plan(detections, names);

        for annotation in &annotations {
            annotation.draw(canvas)?;
        }

        Ok(annotations.len())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::bbox::BBox;

    fn annotator() -> Annotator<impl FnMut() -> Color> {
        let mut next = 0u8;
        Annotator::new(FilterConfig::default(), move || {
            next += 10;
            Color::bgr(next, next, next)
        })
    }

    fn names() -> ClassNames {
        ClassNames::new(["wheat", "weed", "leaf"])
    }

    fn det(l: f32, t: f32, r: f32, b: f32, confidence: f32, class: i32) -> Detection {
        Detection::new(BBox::ltrb(l, t, r, b), confidence, class)
    }

    #[test]
    fn label_has_two_decimals() {
        assert_eq!(label("leaf", 0.95), "leaf: 0.95");
        assert_eq!(label("weed", 0.6049), "weed: 0.60");
    }

    #[test]
    fn drops_low_confidence() {
        let mut ann = annotator();
        let dets = [det(0., 0., 50., 50., 0.6, 0), det(0., 0., 50., 50., 0.3, 1)];

        assert!(ann.plan(&dets, &names()).is_empty());
        assert!(ann.palette().is_empty());
    }

    #[test]
    fn area_boundary_is_excluded() {
        let mut ann = annotator();
        let dets = [det(10., 10., 20., 20., 0.95, 2)];

        assert!(ann.plan(&dets, &names()).is_empty());
    }

    #[test]
    fn lays_out_box_and_label() {
        let mut ann = annotator();
        let dets = [det(10., 10., 25., 25., 0.95, 2)];

        let plan = ann.plan(&dets, &names());

        assert_eq!(
            plan,
            vec![Annotation {
                top_left: (10, 10),
                bottom_right: (25, 25),
                label: "leaf: 0.95".into(),
                label_origin: (15, 5),
                color: Color::bgr(10, 10, 10),
            }]
        );
    }

    #[test]
    fn inverted_box_is_drawn_normalized() {
        let mut ann = annotator();
        let dets = [det(25., 25., 10., 10., 0.95, 2)];

        let plan = ann.plan(&dets, &names());

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].top_left, (10, 10));
        assert_eq!(plan[0].bottom_right, (25, 25));
        assert_eq!(plan[0].label_origin, (15, 5));
    }

    #[test]
    fn unknown_class_is_skipped_and_others_kept() {
        let mut ann = annotator();
        let dets = [
            det(0., 0., 30., 30., 0.9, 7),
            det(0., 0., 30., 30., 0.9, 1),
        ];

        let plan = ann.plan(&dets, &names());

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].label, "weed: 0.90");
    }

    #[test]
    fn color_is_stable_across_frames() {
        let mut ann = annotator();
        let frame1 = [det(0., 0., 30., 30., 0.9, 2), det(40., 40., 80., 80., 0.8, 1)];
        let frame2 = [det(5., 5., 50., 50., 0.7, 2)];

        let first = ann.plan(&frame1, &names());
        let second = ann.plan(&frame2, &names());

        assert_eq!(first[0].color, second[0].color);
        assert_ne!(first[0].color, first[1].color);
        assert_eq!(ann.palette().len(), 2);
    }

    #[test]
    fn custom_thresholds_apply() {
        let mut ann = Annotator::new(
            FilterConfig {
                min_confidence: 0.9,
                min_area: 0.0,
            },
            || Color::bgr(1, 2, 3),
        );
        let dets = [det(0., 0., 2., 2., 0.95, 0), det(0., 0., 50., 50., 0.85, 0)];

        let plan = ann.plan(&dets, &names());

        assert_eq!(plan.len(), 1);
        assert_eq!(plan[0].bottom_right, (2, 2));
    }
}
