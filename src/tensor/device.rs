use std::fmt::{self, Display};
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::errors::TensorError;

/// 张量所在的计算设备。文本形式为`CPU:0`、`GPU:0`这类“种类:序号”。
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub enum Device {
    Cpu(u32),
    Accelerator(u32),
}

impl Device {
    pub const CPU: Device = Device::Cpu(0);
    pub const GPU: Device = Device::Accelerator(0);
}

impl Default for Device {
    fn default() -> Self {
        Self::CPU
    }
}

impl Display for Device {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Device::Cpu(i) => write!(f, "CPU:{i}"),
            Device::Accelerator(i) => write!(f, "GPU:{i}"),
        }
    }
}

impl FromStr for Device {
    type Err = TensorError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let invalid = || TensorError::InvalidDevice(s.to_string());
        let (kind, index) = match s.split_once(':') {
            Some((kind, index)) => (kind, index.parse::<u32>().map_err(|_| invalid())?),
            None => (s, 0),
        };
        match kind.to_ascii_uppercase().as_str() {
            "CPU" => Ok(Device::Cpu(index)),
            "GPU" => Ok(Device::Accelerator(index)),
            _ => Err(invalid()),
        }
    }
}

impl TryFrom<String> for Device {
    type Error = TensorError;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        value.parse()
    }
}

impl From<Device> for String {
    fn from(device: Device) -> Self {
        device.to_string()
    }
}
