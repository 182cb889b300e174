pub mod annotate;
pub mod bbox;
pub mod config;
pub mod detection;
pub mod detector;
pub mod device;
pub mod error;
pub mod frame;
pub mod meter;
pub mod palette;
pub mod session;

#[cfg(feature = "opencv")]
pub mod cv;

mod circular_queue;

pub use annotate::{Annotation, Annotator, Canvas};
pub use config::Config;
pub use detection::Detection;
pub use detector::{ClassNames, Detector, YoloDecoder};
pub use device::InferenceDevice;
pub use frame::Frame;
pub use palette::{Color, ColorSource, Palette, RandomColors};
pub use session::{Display, FrameSource, RunSummary, Session, Step, StopReason};
