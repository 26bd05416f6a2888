//! 通用下载工具
//!
//! 提供 HTTP 下载和 MD5 校验功能，供各数据集复用。
//! `ureq`是阻塞式客户端，异步调用方应通过`spawn_blocking`使用这里的函数。

use std::io::Read;
use std::path::{Path, PathBuf};

use log::info;
use md5::{Digest, Md5};

use super::error::DataError;

/// 下载`url`的全部内容
///
/// # 参数
/// - `url`: 下载地址
/// - `expected_md5`: 可选的 MD5 校验码，提供时会验证下载内容
///
/// # 返回
/// - 成功返回响应体字节
/// - HTTP 失败返回 `DataError::DownloadError`，校验失败返回 `DataError::ChecksumMismatch`
pub fn download_bytes(url: &str, expected_md5: Option<&str>) -> Result<Vec<u8>, DataError> {
    info!("正在下载 {url} ...");

    let response = ureq::get(url)
        .call()
        .map_err(|e| DataError::DownloadError(format!("HTTP 请求失败: {e}")))?;

    if response.status() != 200 {
        return Err(DataError::DownloadError(format!(
            "HTTP 状态码: {}",
            response.status()
        )));
    }

    let mut bytes = Vec::new();
    response
        .into_reader()
        .read_to_end(&mut bytes)
        .map_err(|e| DataError::DownloadError(format!("读取响应失败: {e}")))?;

    if let Some(expected) = expected_md5 {
        verify_md5(&bytes, expected)?;
        info!("MD5 校验通过: {expected}");
    }

    Ok(bytes)
}

/// 下载文件并保存到指定路径。
///
/// 先写入同目录下的 `.part` 临时文件再重命名，下载、校验或写入失败时不会留下不完整的目标文件。
pub fn download_file(
    url: &str,
    dest_path: &Path,
    expected_md5: Option<&str>,
) -> Result<(), DataError> {
    let bytes = download_bytes(url, expected_md5)?;
    let mut part = dest_path.as_os_str().to_owned();
    part.push(".part");
    let part_path = PathBuf::from(part);
    std::fs::write(&part_path, &bytes)?;
    std::fs::rename(&part_path, dest_path)?;
    info!("下载完成: {dest_path:?}");
    Ok(())
}

/// 校验数据的 MD5 是否等于`expected`（十六进制，小写）
pub fn verify_md5(data: &[u8], expected: &str) -> Result<(), DataError> {
    let actual = compute_md5(data);
    if actual.eq_ignore_ascii_case(expected) {
        Ok(())
    } else {
        Err(DataError::ChecksumMismatch {
            expected: expected.to_string(),
            got: actual,
        })
    }
}

/// 计算数据的 MD5 校验码
pub fn compute_md5(data: &[u8]) -> String {
    let mut hasher = Md5::new();
    hasher.update(data);
    let result = hasher.finalize();
    format!("{:x}", result)
}
