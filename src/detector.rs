use std::collections::BTreeMap;
use std::path::Path;

use ndarray::prelude::*;

use crate::bbox::{BBox, Ltrb};
use crate::config::ModelConfig;
use crate::detection::Detection;
use crate::error::Error;

/// Opaque detection model: image in, boxes out.
pub trait Detector<F: ?Sized> {
    fn detect(&mut self, frame: &F) -> Result<Vec<Detection>, Error>;

    /// Class table the returned class ids refer to.
    fn class_names(&self) -> &ClassNames;
}

#[derive(Debug, Clone, Default, PartialEq)]
pub struct ClassNames(Vec<String>);

impl ClassNames {
    pub fn new<I, S>(names: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self(names.into_iter().map(Into::into).collect())
    }

    /// One name per line; blank lines are ignored.
    pub fn parse(text: &str) -> Self {
        Self::new(
            text.lines()
                .map(str::trim)
                .filter(|line| !line.is_empty()),
        )
    }

    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        Ok(Self::parse(&std::fs::read_to_string(path)?))
    }

    #[inline]
    pub fn get(&self, class: i32) -> Option<&str> {
        usize::try_from(class)
            .ok()
            .and_then(|idx| self.0.get(idx))
            .map(String::as_str)
    }

    #[inline]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

#[derive(Debug, Clone, PartialEq)]
pub struct YoloDecoderConfig {
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub agnostic: bool,
    pub max_detections: usize,
}

impl From<&ModelConfig> for YoloDecoderConfig {
    fn from(cfg: &ModelConfig) -> Self {
        Self {
            confidence_threshold: cfg.confidence_threshold,
            iou_threshold: cfg.iou_threshold,
            agnostic: cfg.agnostic_nms,
            max_detections: cfg.max_detections,
        }
    }
}

/// Aspect-preserving resize of a frame into the model input, padded evenly on both sides.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Letterbox {
    /// Frame-to-input scale, shared by both axes.
    pub ratio: f32,
    /// Left and top padding in model-input pixels.
    pub pad: (f32, f32),
    /// Frame size after scaling, before padding.
    pub resized: (u32, u32),
}

impl Letterbox {
    /// Fits a `frame` of (width, height) into an `input` of (width, height).
    pub fn fit(frame: (u32, u32), input: (u32, u32)) -> Self {
        let (fw, fh) = (frame.0.max(1) as f32, frame.1.max(1) as f32);
        let (iw, ih) = (input.0 as f32, input.1 as f32);

        let ratio = (iw / fw).min(ih / fh);
        let rw = (fw * ratio).round();
        let rh = (fh * ratio).round();

        // Odd padding puts the extra pixel on the right/bottom.
        let pad = (
            ((iw - rw) / 2. - 0.1).round().max(0.),
            ((ih - rh) / 2. - 0.1).round().max(0.),
        );

        Self {
            ratio,
            pad,
            resized: (rw as u32, rh as u32),
        }
    }

    /// No resize and no padding: model-input pixels are frame pixels.
    pub fn identity() -> Self {
        Self {
            ratio: 1.0,
            pad: (0., 0.),
            resized: (0, 0),
        }
    }

    /// Padding as (top, bottom, left, right) for an `input` of (width, height).
    pub fn borders(&self, input: (u32, u32)) -> (i32, i32, i32, i32) {
        let (left, top) = (self.pad.0 as i32, self.pad.1 as i32);
        let right = input.0 as i32 - self.resized.0 as i32 - left;
        let bottom = input.1 as i32 - self.resized.1 as i32 - top;

        (top, bottom.max(0), left, right.max(0))
    }

    /// Maps a box from model-input pixels back onto the frame.
    #[inline]
    pub fn unmap(&self, bbox: BBox<Ltrb>) -> BBox<Ltrb> {
        let inv = 1.0 / self.ratio;

        bbox.shifted(-self.pad.0, -self.pad.1).scaled(inv, inv)
    }
}

/// Turns raw YOLO output rows into filtered, suppressed detections.
///
/// Each row is `[center_x, center_y, width, height, score_0, .., score_n]`
/// in model-input pixels.
#[derive(Debug, Clone)]
pub struct YoloDecoder {
    config: YoloDecoderConfig,
}

impl YoloDecoder {
    pub fn new(config: YoloDecoderConfig) -> Self {
        Self { config }
    }

    #[inline]
    pub fn config(&self) -> &YoloDecoderConfig {
        &self.config
    }

    /// Decodes a `[1, N, 4 + C]` or `[1, 4 + C, N]` output tensor.
    ///
    /// `letterbox` maps model-input pixels back onto frame pixels. Both axes
    /// must hold at least five values: four box coordinates and one class score.
    pub fn decode(
        &self,
        output: ArrayViewD<'_, f32>,
        letterbox: &Letterbox,
    ) -> Result<Vec<Detection>, Error> {
        let shape = output.shape().to_vec();
        if shape.len() != 3 || shape[0] != 1 || shape[1].min(shape[2]) < 5 {
            return Err(Error::OutputShape(shape));
        }

        let (a, b) = (shape[1], shape[2]);
        let view = output.into_shape((a, b))?;

        // YOLOv8 exports put the predictions on the last axis.
        let rows = if a < b { view.reversed_axes() } else { view };

        Ok(self.decode_rows(rows, letterbox))
    }

    pub fn decode_rows(
        &self,
        rows: ArrayView2<'_, f32>,
        letterbox: &Letterbox,
    ) -> Vec<Detection> {
        // The bounding boxes grouped by class index (a single group when agnostic).
        let mut groups: BTreeMap<i32, Vec<Detection>> = BTreeMap::new();

        for row in rows.outer_iter() {
            if row.len() < 5 {
                continue;
            }

            let mut class_index = -1;
            let mut confidence = 0.0;

            for (idx, val) in row.iter().skip(4).copied().enumerate() {
                if val > confidence {
                    class_index = idx as i32;
                    confidence = val;
                }
            }

            if class_index < 0 || confidence <= self.config.confidence_threshold {
                continue;
            }

            let bbox = letterbox.unmap(BBox::xywh(row[0], row[1], row[2], row[3]).as_ltrb());

            let key = if self.config.agnostic { 0 } else { class_index };
            groups
                .entry(key)
                .or_default()
                .push(Detection::new(bbox, confidence, class_index));
        }

        let mut results: Vec<Detection> = groups
            .into_values()
            .flat_map(|dets| self.non_maximum_supression(dets))
            .collect();

        results.sort_by(|a, b| b.confidence.total_cmp(&a.confidence));
        results.truncate(self.config.max_detections);
        results
    }

    fn non_maximum_supression(&self, mut dets: Vec<Detection>) -> Vec<Detection> {
        if dets.len() < 2 {
            return dets;
        }

        dets.sort_unstable_by(|a, b| b.confidence.total_cmp(&a.confidence));

        let mut retain = vec![true; dets.len()];
        for idx in 0..dets.len() - 1 {
            if !retain[idx] {
                continue;
            }

            for other in idx + 1..dets.len() {
                if retain[other] && dets[idx].iou(&dets[other]) > self.config.iou_threshold {
                    retain[other] = false;
                }
            }
        }

        dets.into_iter()
            .zip(retain)
            .filter_map(|(det, keep)| if keep { Some(det) } else { None })
            .collect()
    }
}
