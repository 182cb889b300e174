//! OpenCV-backed camera, window, drawing and model inference.

mod camera;
mod canvas;
mod window;
mod yolo;

pub use camera::Camera;
pub use window::Window;
pub use yolo::YoloDetector;
