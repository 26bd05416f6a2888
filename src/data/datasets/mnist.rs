//! MNIST 手写数字数据集
//!
//! 支持：
//! - IDX 二进制格式解析（支持 .gz 压缩）
//! - 图像与标签文件并发加载，解码在阻塞线程池上进行
//! - 固定批大小、循环回绕的异步批量迭代（[`MnistLoader::load`]）
//! - 整个划分一次性加载（[`MnistLoader::load_split`]）
//! - 可选自动下载与 MD5 校验

use std::path::PathBuf;
use std::sync::Arc;

use log::info;

use crate::data::config::{LoaderConfig, ValidationMode};
use crate::data::error::DataError;
use crate::data::fetch::{Fetch, FileFetcher};
use crate::data::idx::{IdxKind, Validation, decode_tensor};
use crate::data::iterator::{BatchIterator, Elements};
use crate::data::split::Split;
use crate::tensor::{DType, Device, NdarrayBackend, Tensor, TensorBackend};

/// MNIST 文件信息（`.gz` 文件名, MD5）
pub const MNIST_FILES: [(&str, &str); 4] = [
    (
        "train-images-idx3-ubyte.gz",
        "f68b3c2dcbeaaa9fbdd348bbdeb94873",
    ),
    (
        "train-labels-idx1-ubyte.gz",
        "d53e105ee54ea40749a09fcbcd1e9432",
    ),
    (
        "t10k-images-idx3-ubyte.gz",
        "9fb629c4189551a2d022fa330f9573f3",
    ),
    (
        "t10k-labels-idx1-ubyte.gz",
        "ec29112dd5afa0611ce80d1b7f02629c",
    ),
];

/// 获取默认数据目录
pub fn default_data_dir() -> PathBuf {
    dirs::cache_dir()
        .unwrap_or_else(|| PathBuf::from("."))
        .join("mnist_loader")
        .join("datasets")
}

/// MNIST 加载器：组合配置、字节获取能力与张量后端
#[derive(Clone)]
pub struct MnistLoader {
    config: LoaderConfig,
    fetcher: Arc<dyn Fetch>,
    backend: Arc<dyn TensorBackend>,
}

impl MnistLoader {
    /// 默认配置（叠加环境变量覆盖）、本地文件与`ndarray`后端
    pub fn new() -> Self {
        Self::from_config(LoaderConfig::default().with_env_overrides())
    }

    pub fn from_config(config: LoaderConfig) -> Self {
        let data_dir = config
            .root
            .clone()
            .unwrap_or_else(|| default_data_dir().join("mnist"));
        let mut fetcher = FileFetcher::new(data_dir);
        if config.download {
            fetcher = fetcher.download_from(config.base_url.clone());
            if config.verify_checksums {
                fetcher = fetcher.checksums(MNIST_FILES);
            }
        }
        Self {
            config,
            fetcher: Arc::new(fetcher),
            backend: Arc::new(NdarrayBackend::new()),
        }
    }

    /// 替换字节获取能力（如内存、HTTP 等）
    pub fn fetcher(mut self, fetcher: Arc<dyn Fetch>) -> Self {
        self.fetcher = fetcher;
        self
    }

    /// 替换张量后端
    pub fn backend(mut self, backend: Arc<dyn TensorBackend>) -> Self {
        self.backend = backend;
        self
    }

    pub fn config(&self) -> &LoaderConfig {
        &self.config
    }

    /// 创建批量迭代器，并立即在后台并发加载图像与标签文件。
    ///
    /// # 参数
    /// - `split`: "train" 或 "test"
    /// - `batch_size`: 每批样本数（> 0）
    /// - `use_accelerator`: true=放到配置的加速设备上，false=CPU
    ///
    /// # 错误
    /// 未知的划分名或为 0 的批大小在启动任何异步工作前同步返回`ConfigError`；
    /// 加载和解码的错误由`next_batch`返回。
    pub fn load(
        &self,
        split: &str,
        batch_size: usize,
        use_accelerator: bool,
    ) -> Result<BatchIterator, DataError> {
        let split: Split = split.parse()?;
        let device = if use_accelerator {
            self.config.accelerator
        } else {
            Device::CPU
        };
        let validation = |kind| match self.config.validation {
            ValidationMode::Strict => split.strict(kind),
            ValidationMode::Permissive => Validation::Permissive,
        };
        let images_file = FileSpec {
            location: split.filenames().1,
            kind: IdxKind::Images,
            validation: validation(IdxKind::Images),
            dtype: self.config.image_dtype,
        };
        let labels_file = FileSpec {
            location: split.filenames().0,
            kind: IdxKind::Labels,
            validation: validation(IdxKind::Labels),
            dtype: DType::I32,
        };

        let fetcher = Arc::clone(&self.fetcher);
        let backend = Arc::clone(&self.backend);
        let load = async move {
            let elements =
                load_pair(fetcher.as_ref(), &backend, images_file, labels_file, device).await?;
            info!("MNIST {split} 已加载到 {device}（{} 后端）", backend.name());
            Ok(elements)
        };
        BatchIterator::spawn(load, batch_size, device)
    }

    /// 一次性加载整个划分：宽松校验、`int32`、CPU。
    pub async fn load_split(&self, split: &str) -> Result<Elements, DataError> {
        let split: Split = split.parse()?;
        let (labels, images) = split.filenames();
        let images_file = FileSpec {
            location: images,
            kind: IdxKind::Images,
            validation: Validation::Permissive,
            dtype: DType::I32,
        };
        let labels_file = FileSpec {
            location: labels,
            kind: IdxKind::Labels,
            validation: Validation::Permissive,
            dtype: DType::I32,
        };
        let elements = load_pair(
            self.fetcher.as_ref(),
            &self.backend,
            images_file,
            labels_file,
            Device::CPU,
        )
        .await?;

        let (n_images, n_labels) = (elements.images.shape()[0], elements.labels.shape()[0]);
        if n_images != n_labels {
            return Err(DataError::ShapeMismatch {
                expected: vec![n_images],
                got: vec![n_labels],
            });
        }
        Ok(elements)
    }
}

impl Default for MnistLoader {
    fn default() -> Self {
        Self::new()
    }
}

/// 使用默认加载器创建批量迭代器，见[`MnistLoader::load`]
pub fn load(split: &str, batch_size: usize, use_accelerator: bool) -> Result<BatchIterator, DataError> {
    MnistLoader::new().load(split, batch_size, use_accelerator)
}

/// 使用默认加载器一次性加载整个划分，见[`MnistLoader::load_split`]
pub async fn load_split(split: &str) -> Result<Elements, DataError> {
    MnistLoader::new().load_split(split).await
}

#[derive(Debug, Clone, Copy)]
struct FileSpec {
    location: &'static str,
    kind: IdxKind,
    validation: Validation,
    dtype: DType,
}

/// 并发加载图像与标签；任一失败则整体失败
async fn load_pair(
    fetcher: &dyn Fetch,
    backend: &Arc<dyn TensorBackend>,
    images: FileSpec,
    labels: FileSpec,
    device: Device,
) -> Result<Elements, DataError> {
    let (images, labels) = futures::try_join!(
        load_file(fetcher, Arc::clone(backend), images, device),
        load_file(fetcher, Arc::clone(backend), labels, device),
    )?;
    Ok(Elements { images, labels })
}

async fn load_file(
    fetcher: &dyn Fetch,
    backend: Arc<dyn TensorBackend>,
    file: FileSpec,
    device: Device,
) -> Result<Tensor, DataError> {
    let bytes = fetcher.fetch(file.location).await?;
    let decoded = tokio::task::spawn_blocking(move || {
        decode_tensor(&bytes, file.validation, file.dtype, backend.as_ref(), device)
    })
    .await??;

    if decoded.kind != file.kind {
        return Err(DataError::FormatError(format!(
            "{} 的内容是 {:?}，期望 {:?}",
            file.location, decoded.kind, file.kind
        )));
    }
    Ok(decoded.tensor)
}
