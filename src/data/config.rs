//! 加载器配置
//!
//! 可由代码（构建器风格）、JSON 文件或环境变量构造：
//!
//! ```ignore
//! let config = LoaderConfig::default()
//!     .root("./data/mnist")
//!     .download(true)
//!     .image_dtype(DType::I32);
//! ```

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use super::error::DataError;
use crate::tensor::{DType, Device};

/// 数据目录的环境变量
pub const ENV_DATA_DIR: &str = "MNIST_DATA_DIR";
/// 是否自动下载的环境变量（`1`/`true`/`yes` 为真）
pub const ENV_DOWNLOAD: &str = "MNIST_DOWNLOAD";

/// MNIST 下载地址（使用 AWS S3 镜像，原官网 yann.lecun.com 不稳定）
pub const DEFAULT_BASE_URL: &str = "https://ossci-datasets.s3.amazonaws.com/mnist/";

/// 批量迭代器使用的头部校验模式
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ValidationMode {
    /// 固定内容种类与划分的文档样本数
    #[default]
    Strict,
    /// 由 magic number 推断种类，接受任意样本数
    Permissive,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoaderConfig {
    /// 数据目录，None 则使用默认 (~/.cache/mnist_loader/datasets/mnist)
    pub root: Option<PathBuf>,
    /// 文件缺失时是否自动下载
    pub download: bool,
    pub base_url: String,
    /// 下载后是否校验 MD5
    pub verify_checksums: bool,
    pub validation: ValidationMode,
    /// 批量迭代器中图像张量的数值类型（训练通常用`float32`）
    pub image_dtype: DType,
    /// `use_accelerator`为真时使用的设备
    pub accelerator: Device,
}

impl Default for LoaderConfig {
    fn default() -> Self {
        Self {
            root: None,
            download: false,
            base_url: DEFAULT_BASE_URL.to_string(),
            verify_checksums: true,
            validation: ValidationMode::Strict,
            image_dtype: DType::F32,
            accelerator: Device::GPU,
        }
    }
}

impl LoaderConfig {
    /// 从 JSON 文件读取配置，未出现的字段取默认值
    pub fn from_json_file(path: impl AsRef<Path>) -> Result<Self, DataError> {
        let path = path.as_ref();
        let content = std::fs::read_to_string(path).map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataError::FileNotFound(path.to_path_buf()),
            _ => DataError::IoError(e),
        })?;
        serde_json::from_str(&content)
            .map_err(|e| DataError::ConfigError(format!("无法解析配置文件 {path:?}: {e}")))
    }

    /// 用环境变量覆盖`root`与`download`
    pub fn with_env_overrides(mut self) -> Self {
        if let Ok(dir) = std::env::var(ENV_DATA_DIR) {
            if !dir.is_empty() {
                self.root = Some(PathBuf::from(dir));
            }
        }
        if let Ok(flag) = std::env::var(ENV_DOWNLOAD) {
            self.download = matches!(flag.to_ascii_lowercase().as_str(), "1" | "true" | "yes");
        }
        self
    }

    pub fn root(mut self, root: impl Into<PathBuf>) -> Self {
        self.root = Some(root.into());
        self
    }

    pub fn download(mut self, download: bool) -> Self {
        self.download = download;
        self
    }

    pub fn validation(mut self, validation: ValidationMode) -> Self {
        self.validation = validation;
        self
    }

    pub fn image_dtype(mut self, dtype: DType) -> Self {
        self.image_dtype = dtype;
        self
    }

    pub fn accelerator(mut self, device: Device) -> Self {
        self.accelerator = device;
        self
    }
}
