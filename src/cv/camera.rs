use log::{info, warn};
use opencv::{core::Mat, prelude::*, videoio};

use crate::config::CaptureConfig;
use crate::error::Error;
use crate::session::FrameSource;

pub struct Camera {
    cap: videoio::VideoCapture,
}

impl Camera {
    /// Opens the camera and requests the configured resolution.
    ///
    /// The device is free to pick another resolution; the one it settles on is logged.
    pub fn open(config: &CaptureConfig) -> Result<Self, Error> {
        let mut cap = videoio::VideoCapture::new(config.camera, videoio::CAP_ANY)?;
        let opened = videoio::VideoCapture::is_opened(&cap)?;
        if !opened {
            return Err(Error::CameraUnavailable(config.camera));
        }

        cap.set(videoio::CAP_PROP_FRAME_WIDTH, config.width as f64)?;
        cap.set(videoio::CAP_PROP_FRAME_HEIGHT, config.height as f64)?;

        let width = cap.get(videoio::CAP_PROP_FRAME_WIDTH)?.round() as u32;
        let height = cap.get(videoio::CAP_PROP_FRAME_HEIGHT)?.round() as u32;

        if (width, height) != (config.width, config.height) {
            warn!(
                "camera {} runs at {}x{} instead of the requested {}x{}",
                config.camera, width, height, config.width, config.height
            );
        } else {
            info!("camera {} opened at {}x{}", config.camera, width, height);
        }

        Ok(Self { cap })
    }
}

impl FrameSource for Camera {
    type Frame = Mat;

    fn read(&mut self) -> Result<Option<Mat>, Error> {
        let mut mat = Mat::default();
        if !self.cap.read(&mut mat)? {
            return Ok(None);
        }

        Ok(Some(mat))
    }

    fn release(&mut self) -> Result<(), Error> {
        self.cap.release()?;
        Ok(())
    }
}
