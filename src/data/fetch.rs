//! 字节获取能力
//!
//! 加载器只通过 [`Fetch`] 取得文件的完整字节，不直接接触文件系统或网络。
//! - [`FileFetcher`]: 从本地目录读取，支持 `.gz` 压缩文件与缺失时自动下载
//! - [`InMemoryFetcher`]: 从内存表读取，便于测试与嵌入

use std::collections::HashMap;
use std::io::Read;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use flate2::read::GzDecoder;
use log::{debug, warn};

use super::download::{download_file, verify_md5};
use super::error::DataError;

/// 给定路径（或 URL），异步返回其完整字节
#[async_trait]
pub trait Fetch: Send + Sync {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, DataError>;
}

/// 从本地数据目录读取文件
///
/// 查找顺序：`<root>/<name>` → `<root>/<name>.gz`（配置了校验码时先核对）→ （若启用）从`base_url`下载 `.gz`。
#[derive(Debug, Clone)]
pub struct FileFetcher {
    root: PathBuf,
    base_url: Option<String>,
    checksums: HashMap<String, String>,
}

impl FileFetcher {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            base_url: None,
            checksums: HashMap::new(),
        }
    }

    /// 启用自动下载：缺失的文件从`base_url`下载其 `.gz` 版本
    pub fn download_from(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = Some(base_url.into());
        self
    }

    /// 设置下载文件（按 `.gz` 文件名）的 MD5 校验码
    pub fn checksums<I, K, V>(mut self, checksums: I) -> Self
    where
        I: IntoIterator<Item = (K, V)>,
        K: Into<String>,
        V: Into<String>,
    {
        self.checksums = checksums
            .into_iter()
            .map(|(k, v)| (k.into(), v.into()))
            .collect();
        self
    }

    pub fn root(&self) -> &Path {
        &self.root
    }

    /// 确保文件存在，必要时下载
    async fn ensure_file(&self, name: &str) -> Result<PathBuf, DataError> {
        // 优先检查解压后的文件
        let uncompressed_path = self.root.join(name);
        if tokio::fs::try_exists(&uncompressed_path).await? {
            return Ok(uncompressed_path);
        }

        let gz_name = format!("{name}.gz");
        let gz_path = self.root.join(&gz_name);
        let md5 = self.checksums.get(&gz_name).cloned();
        if tokio::fs::try_exists(&gz_path).await? {
            warn!("未找到 {uncompressed_path:?}，改用压缩文件 {gz_path:?}");
            match self.check_cached(&gz_path, md5.clone()).await {
                Ok(()) => return Ok(gz_path),
                Err(err) if self.base_url.is_none() => return Err(err),
                Err(err) => {
                    warn!("缓存文件 {gz_path:?} 校验失败（{err}），重新下载");
                    tokio::fs::remove_file(&gz_path).await?;
                }
            }
        }

        let Some(base_url) = &self.base_url else {
            return Err(DataError::FileNotFound(uncompressed_path));
        };
        tokio::fs::create_dir_all(&self.root).await?;
        let url = format!("{base_url}{gz_name}");
        let dest = gz_path.clone();
        tokio::task::spawn_blocking(move || download_file(&url, &dest, md5.as_deref()))
            .await??;
        Ok(gz_path)
    }

    /// 配置了校验码时，核对已缓存的 `.gz` 文件
    async fn check_cached(&self, path: &Path, md5: Option<String>) -> Result<(), DataError> {
        let Some(md5) = md5 else {
            return Ok(());
        };
        let bytes = tokio::fs::read(path).await?;
        tokio::task::spawn_blocking(move || verify_md5(&bytes, &md5)).await?
    }
}

#[async_trait]
impl Fetch for FileFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, DataError> {
        let path = self.ensure_file(location).await?;
        let bytes = tokio::fs::read(&path).await.map_err(|e| match e.kind() {
            std::io::ErrorKind::NotFound => DataError::FileNotFound(path.clone()),
            _ => DataError::IoError(e),
        })?;
        debug!("读取 {path:?}: {} 字节", bytes.len());

        if is_gzip(&path) {
            tokio::task::spawn_blocking(move || gunzip(&bytes)).await?
        } else {
            Ok(bytes)
        }
    }
}

fn is_gzip(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == "gz")
}

/// 解压 gzip 字节
pub fn gunzip(bytes: &[u8]) -> Result<Vec<u8>, DataError> {
    let mut out = Vec::new();
    GzDecoder::new(bytes)
        .read_to_end(&mut out)
        .map_err(|e| DataError::DecompressionError(e.to_string()))?;
    Ok(out)
}

/// 从内存表读取字节；记录被请求的次数
#[derive(Debug, Default)]
pub struct InMemoryFetcher {
    files: HashMap<String, Vec<u8>>,
    fetches: AtomicUsize,
}

impl InMemoryFetcher {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn with_file(mut self, location: impl Into<String>, bytes: Vec<u8>) -> Self {
        self.files.insert(location.into(), bytes);
        self
    }

    pub fn insert(&mut self, location: impl Into<String>, bytes: Vec<u8>) {
        self.files.insert(location.into(), bytes);
    }

    /// 至今`fetch`被调用的次数
    pub fn fetch_count(&self) -> usize {
        self.fetches.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Fetch for InMemoryFetcher {
    async fn fetch(&self, location: &str) -> Result<Vec<u8>, DataError> {
        self.fetches.fetch_add(1, Ordering::SeqCst);
        self.files
            .get(location)
            .cloned()
            .ok_or_else(|| DataError::FileNotFound(PathBuf::from(location)))
    }
}
