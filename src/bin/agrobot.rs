//! Live crop detection: camera in, annotated window out, `q` to quit.

use std::path::PathBuf;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use clap::Parser;
use log::{info, warn};

use agrobot::config::Config;
use agrobot::cv::{Camera, Window, YoloDetector};
use agrobot::error::Error;
use agrobot::{Annotator, InferenceDevice, RandomColors, Session};

#[derive(Parser, Debug)]
#[command(name = "agrobot", version, about = "Real-time crop detection on a camera feed")]
struct Args {
    /// TOML configuration file; flags below override it
    #[arg(long, env = "AGROBOT_CONFIG")]
    config: Option<PathBuf>,

    /// ONNX model file
    #[arg(long)]
    model: Option<PathBuf>,

    /// Class table, one name per line
    #[arg(long)]
    names: Option<PathBuf>,

    /// cpu, cuda or cuda:N
    #[arg(long)]
    device: Option<InferenceDevice>,

    /// Camera index
    #[arg(long)]
    camera: Option<i32>,

    #[arg(long)]
    width: Option<u32>,

    #[arg(long)]
    height: Option<u32>,

    /// Display-time confidence threshold
    #[arg(long)]
    min_confidence: Option<f32>,

    /// Minimum box area in square pixels
    #[arg(long)]
    min_area: Option<f32>,
}

impl Args {
    fn into_config(self) -> Result<Config, Error> {
        let mut config = match &self.config {
            Some(path) => Config::from_file(path)?,
            None => Config::default(),
        };

        if let Some(model) = self.model {
            config.model.path = model;
        }
        if let Some(names) = self.names {
            config.model.names = names;
        }
        if let Some(device) = self.device {
            config.model.device = device;
        }
        if let Some(camera) = self.camera {
            config.capture.camera = camera;
        }
        if let Some(width) = self.width {
            config.capture.width = width;
        }
        if let Some(height) = self.height {
            config.capture.height = height;
        }
        if let Some(min_confidence) = self.min_confidence {
            config.filter.min_confidence = min_confidence;
        }
        if let Some(min_area) = self.min_area {
            config.filter.min_area = min_area;
        }

        config.validate()?;
        Ok(config)
    }
}

fn main() -> Result<(), Error> {
    env_logger::Builder::from_env(env_logger::Env::default().default_filter_or("info")).init();

    let config = Args::parse().into_config()?;

    if config.display_filter_shadowed() {
        info!(
            "display threshold {} is below the model threshold {}, it has no effect",
            config.filter.min_confidence, config.model.confidence_threshold
        );
    }

    let stop = Arc::new(AtomicBool::new(false));
    {
        let stop = stop.clone();
        if let Err(err) = ctrlc::set_handler(move || stop.store(true, Ordering::Relaxed)) {
            warn!("Ctrl-C handler not installed: {}", err);
        }
    }

    let detector = YoloDetector::new(&config.model)?;
    let camera = Camera::open(&config.capture)?;
    let window = Window::open(&config.display)?;
    let annotator = Annotator::new(config.filter.clone(), RandomColors::new());

    Session::new(camera, detector, window, annotator, config.display.quit_key)
        .finish(&stop)
        .map(|_| ())
}
