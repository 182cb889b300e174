use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
    #[error("IO Error: {0}")]
    IoError(#[from] std::io::Error),

    #[error("Config Parse Error: {0}")]
    ConfigParseError(#[from] toml::de::Error),

    #[error("Invalid Config: {0}")]
    InvalidConfig(String),

    #[error("Invalid Inference Device: {0:?}")]
    InvalidDevice(String),

    #[error("Unexpected Model Output Shape: {0:?}")]
    OutputShape(Vec<usize>),

    #[error("Shape Error: {0}")]
    ShapeError(#[from] ndarray::ShapeError),

    #[error("Unable to open camera {0}")]
    CameraUnavailable(i32),

    #[cfg(feature = "opencv")]
    #[error("OpenCV Error: {0}")]
    OpenCvError(#[from] opencv::Error),
}
