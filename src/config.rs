use std::path::{Path, PathBuf};

use serde_derive::Deserialize;

use crate::device::InferenceDevice;
use crate::error::Error;

pub const DEFAULT_MODEL_PATH: &str = "agronomic_model_20_march_2024.onnx";
pub const DEFAULT_NAMES_PATH: &str = "agronomic_model_20_march_2024.names";
pub const DEFAULT_WINDOW_TITLE: &str =
    "AgRobot: Crops Detection for Farming Environment by Ansh Ranjan";

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct ModelConfig {
    pub path: PathBuf,
    /// Class table, one name per line.
    pub names: PathBuf,
    pub device: InferenceDevice,
    /// Threshold applied inside the model post-processing, before NMS.
    pub confidence_threshold: f32,
    pub iou_threshold: f32,
    pub agnostic_nms: bool,
    pub max_detections: usize,
    pub input_width: u32,
    pub input_height: u32,
}

impl Default for ModelConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(DEFAULT_MODEL_PATH),
            names: PathBuf::from(DEFAULT_NAMES_PATH),
            device: InferenceDevice::default(),
            confidence_threshold: 0.75,
            iou_threshold: 0.75,
            agnostic_nms: false,
            max_detections: 1000,
            input_width: 640,
            input_height: 640,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct CaptureConfig {
    pub camera: i32,
    pub width: u32,
    pub height: u32,
}

impl Default for CaptureConfig {
    fn default() -> Self {
        Self {
            camera: 0,
            width: 1152,
            height: 648,
        }
    }
}

/// Display-time filtering, independent from the model thresholds.
#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct FilterConfig {
    pub min_confidence: f32,
    pub min_area: f32,
}

impl Default for FilterConfig {
    fn default() -> Self {
        Self {
            min_confidence: 0.6,
            min_area: 100.0,
        }
    }
}

#[derive(Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct DisplayConfig {
    pub window_title: String,
    pub quit_key: char,
    pub wait_ms: i32,
}

impl Default for DisplayConfig {
    fn default() -> Self {
        Self {
            window_title: DEFAULT_WINDOW_TITLE.to_string(),
            quit_key: 'q',
            wait_ms: 1,
        }
    }
}

#[derive(Deserialize, Debug, Clone, Default, PartialEq)]
#[serde(default)]
pub struct Config {
    pub model: ModelConfig,
    pub capture: CaptureConfig,
    pub filter: FilterConfig,
    pub display: DisplayConfig,
}

impl Config {
    pub fn from_file<P: AsRef<Path>>(path: P) -> Result<Self, Error> {
        let text = std::fs::read_to_string(path)?;

        text.parse()
    }

    pub fn validate(&self) -> Result<(), Error> {
        check_unit("model.confidence_threshold", self.model.confidence_threshold)?;
        check_unit("model.iou_threshold", self.model.iou_threshold)?;
        check_unit("filter.min_confidence", self.filter.min_confidence)?;

        if self.model.max_detections == 0 {
            return Err(Error::InvalidConfig(
                "model.max_detections must be positive".into(),
            ));
        }

        if self.model.input_width == 0 || self.model.input_height == 0 {
            return Err(Error::InvalidConfig(
                "model input dimensions must be positive".into(),
            ));
        }

        if self.capture.width == 0 || self.capture.height == 0 {
            return Err(Error::InvalidConfig(
                "capture dimensions must be positive".into(),
            ));
        }

        if !self.filter.min_area.is_finite() || self.filter.min_area < 0.0 {
            return Err(Error::InvalidConfig(format!(
                "filter.min_area must be a non-negative number, got {}",
                self.filter.min_area
            )));
        }

        if self.display.window_title.trim().is_empty() {
            return Err(Error::InvalidConfig(
                "display.window_title must not be empty".into(),
            ));
        }

        Ok(())
    }

    /// True when every detection the model emits already clears the display threshold.
    #[inline]
    pub fn display_filter_shadowed(&self) -> bool {
        self.filter.min_confidence < self.model.confidence_threshold
    }
}

impl std::str::FromStr for Config {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let config: Config = toml::from_str(s)?;
        config.validate()?;

        Ok(config)
    }
}

fn check_unit(name: &str, value: f32) -> Result<(), Error> {
    if (0.0..=1.0).contains(&value) {
        Ok(())
    } else {
        Err(Error::InvalidConfig(format!(
            "{} must be within [0, 1], got {}",
            name, value
        )))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;

    #[test]
    fn defaults_match_field_settings() {
        let cfg = Config::default();

        assert_eq!(cfg.model.confidence_threshold, 0.75);
        assert_eq!(cfg.model.iou_threshold, 0.75);
        assert!(!cfg.model.agnostic_nms);
        assert_eq!(cfg.model.max_detections, 1000);
        assert_eq!(cfg.model.device, InferenceDevice::Cuda(0));
        assert_eq!(cfg.filter.min_confidence, 0.6);
        assert_eq!(cfg.filter.min_area, 100.0);
        assert_eq!((cfg.capture.width, cfg.capture.height), (1152, 648));
        assert_eq!(cfg.capture.camera, 0);
        assert_eq!(cfg.display.quit_key, 'q');
        assert_eq!(
            cfg.display.window_title,
            "AgRobot: Crops Detection for Farming Environment by Ansh Ranjan"
        );
        assert!(cfg.validate().is_ok());
        assert!(cfg.display_filter_shadowed());
    }

    #[test]
    fn partial_toml_keeps_defaults() {
        let cfg: Config = r#"
            [model]
            device = "cpu"
            max_detections = 50

            [filter]
            min_confidence = 0.8
        "#
        .parse()
        .unwrap();

        assert_eq!(cfg.model.device, InferenceDevice::Cpu);
        assert_eq!(cfg.model.max_detections, 50);
        assert_eq!(cfg.model.iou_threshold, 0.75);
        assert_eq!(cfg.filter.min_confidence, 0.8);
        assert_eq!(cfg.filter.min_area, 100.0);
        assert_eq!(cfg.capture, CaptureConfig::default());
        assert!(!cfg.display_filter_shadowed());
    }

    #[test]
    fn rejects_out_of_range_threshold() {
        let res = "[filter]\nmin_confidence = 1.5\n".parse::<Config>();
        assert!(matches!(res, Err(Error::InvalidConfig(_))));
    }

    #[test]
    fn rejects_bad_device() {
        let res = "[model]\ndevice = \"tpu:0\"\n".parse::<Config>();
        assert!(matches!(res, Err(Error::ConfigParseError(_))));
    }

    #[test]
    fn rejects_zero_capture_size() {
        let mut cfg = Config::default();
        cfg.capture.height = 0;
        assert!(cfg.validate().is_err());
    }

    #[test]
    fn loads_from_file() {
        let mut file = tempfile::NamedTempFile::new().unwrap();
        writeln!(file, "[capture]\ncamera = 2\nwidth = 640\nheight = 480").unwrap();

        let cfg = Config::from_file(file.path()).unwrap();
        assert_eq!(cfg.capture.camera, 2);
        assert_eq!((cfg.capture.width, cfg.capture.height), (640, 480));
    }

    #[test]
    fn missing_file_is_io_error() {
        let res = Config::from_file("/nonexistent/agrobot.toml");
        assert!(matches!(res, Err(Error::IoError(_))));
    }
}
