use log::{info, warn};
use ndarray::prelude::*;
use opencv::{
    core::{self, Mat},
    dnn, imgproc,
    prelude::*,
};

use crate::config::ModelConfig;
use crate::detection::Detection;
use crate::detector::{ClassNames, Detector, Letterbox, YoloDecoder, YoloDecoderConfig};
use crate::device::InferenceDevice;
use crate::error::Error;

/// Gray used to pad letterboxed frames.
const PAD_VALUE: f64 = 114.0;

/// YOLO model exported to ONNX, run through OpenCV DNN.
pub struct YoloDetector {
    net: dnn::Net,
    decoder: YoloDecoder,
    names: ClassNames,
    input: core::Size,
}

impl YoloDetector {
    pub fn new(config: &ModelConfig) -> Result<Self, Error> {
        let names = ClassNames::from_file(&config.names)?;
        if names.is_empty() {
            return Err(Error::InvalidConfig(format!(
                "class table {} is empty",
                config.names.display()
            )));
        }

        let mut net = dnn::read_net_from_onnx(&config.path.to_string_lossy())?;

        match config.device {
            InferenceDevice::Cpu => {
                net.set_preferable_backend(dnn::DNN_BACKEND_OPENCV)?;
                net.set_preferable_target(dnn::DNN_TARGET_CPU)?;
            }

            InferenceDevice::Cuda(idx) => {
                if idx != 0 {
                    warn!("OpenCV DNN runs on the current CUDA device, {} is not selected", config.device);
                }

                net.set_preferable_backend(dnn::DNN_BACKEND_CUDA)?;
                net.set_preferable_target(dnn::DNN_TARGET_CUDA)?;
            }
        }

        info!(
            "loaded {} ({} classes) on {}: conf {}, iou {}, agnostic nms {}, max det {}",
            config.path.display(),
            names.len(),
            config.device,
            config.confidence_threshold,
            config.iou_threshold,
            config.agnostic_nms,
            config.max_detections
        );

        Ok(Self {
            net,
            decoder: YoloDecoder::new(YoloDecoderConfig::from(config)),
            names,
            input: core::Size::new(config.input_width as i32, config.input_height as i32),
        })
    }
}

impl Detector<Mat> for YoloDetector {
    fn detect(&mut self, frame: &Mat) -> Result<Vec<Detection>, Error> {
        let fsize = frame.size()?;
        let input = (self.input.width as u32, self.input.height as u32);
        let letterbox = Letterbox::fit((fsize.width as u32, fsize.height as u32), input);

        let mut resized = Mat::default();
        imgproc::resize(
            frame,
            &mut resized,
            core::Size::new(letterbox.resized.0 as i32, letterbox.resized.1 as i32),
            0.,
            0.,
            imgproc::INTER_LINEAR,
        )?;

        let (top, bottom, left, right) = letterbox.borders(input);
        let mut padded = Mat::default();
        core::copy_make_border(
            &resized,
            &mut padded,
            top,
            bottom,
            left,
            right,
            core::BORDER_CONSTANT,
            core::Scalar::all(PAD_VALUE),
        )?;

        let blob = dnn::blob_from_image(
            &padded,
            1.0 / 255.0,
            self.input,
            core::Scalar::new(0., 0., 0., 0.),
            true,
            false,
            core::CV_32F,
        )?;

        self.net.set_input(&blob, "", 1.0, core::Scalar::default())?;
        let output = self.net.forward_single("")?;

        let shape: Vec<usize> = output.mat_size().iter().map(|&d| d as usize).collect();
        let view = ArrayViewD::from_shape(IxDyn(&shape), output.data_typed::<f32>()?)?;

        self.decoder.decode(view, &letterbox)
    }

    #[inline]
    fn class_names(&self) -> &ClassNames {
        &self.names
    }
}
