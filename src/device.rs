use std::fmt;
use std::str::FromStr;

use serde_derive::Deserialize;

use crate::error::Error;

/// Compute device the model is bound to.
#[derive(Deserialize, Debug, Clone, Copy, PartialEq, Eq)]
#[serde(try_from = "String")]
pub enum InferenceDevice {
    Cpu,
    Cuda(u32),
}

impl Default for InferenceDevice {
    fn default() -> Self {
        InferenceDevice::Cuda(0)
    }
}

impl FromStr for InferenceDevice {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim().to_ascii_lowercase();

        match s.as_str() {
            "cpu" => Ok(InferenceDevice::Cpu),
            "cuda" | "gpu" => Ok(InferenceDevice::Cuda(0)),
            other => other
                .strip_prefix("cuda:")
                .and_then(|idx| idx.parse().ok())
                .map(InferenceDevice::Cuda)
                .ok_or_else(|| Error::InvalidDevice(s.clone())),
        }
    }
}

impl TryFrom<String> for InferenceDevice {
    type Error = Error;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl fmt::Display for InferenceDevice {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            InferenceDevice::Cpu => write!(f, "cpu"),
            InferenceDevice::Cuda(idx) => write!(f, "cuda:{}", idx),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_device_selectors() {
        assert_eq!("cpu".parse::<InferenceDevice>().unwrap(), InferenceDevice::Cpu);
        assert_eq!("CUDA".parse::<InferenceDevice>().unwrap(), InferenceDevice::Cuda(0));
        assert_eq!(
            "cuda:1".parse::<InferenceDevice>().unwrap(),
            InferenceDevice::Cuda(1)
        );
    }

    #[test]
    fn rejects_unknown_selectors() {
        assert!(matches!(
            "tpu".parse::<InferenceDevice>(),
            Err(Error::InvalidDevice(_))
        ));
        assert!("cuda:x".parse::<InferenceDevice>().is_err());
    }

    #[test]
    fn display_round_trips() {
        let dev = InferenceDevice::Cuda(3);
        assert_eq!(dev.to_string().parse::<InferenceDevice>().unwrap(), dev);
    }
}
