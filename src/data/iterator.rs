/*
 * @Description  : BatchIterator - 固定批大小、循环回绕的异步批量迭代器
 *
 * 状态机：Loading（后台加载中）→ Ready（每次取批都自循环，游标前进或回绕）
 *                              ↘ Failed（终态，不重试、不重新加载）
 *
 * 单消费者：`next_batch`要求`&mut self`，由借用检查保证游标的修改是串行的。
 */

use std::future::Future;
use std::sync::Arc;

use futures::stream::{self, Stream};
use log::{error, info};
use tokio::task::JoinHandle;

use super::error::DataError;
use crate::tensor::{Device, Tensor};

/// 一对按样本对齐的图像与标签张量
#[derive(Debug, Clone, PartialEq)]
pub struct Elements {
    pub images: Tensor,
    pub labels: Tensor,
}

/// 迭代器对外可见的加载阶段
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LoadPhase {
    Loading,
    Ready,
    Failed,
}

enum LoadState {
    Loading(JoinHandle<Result<Elements, DataError>>),
    Ready(Elements),
    Failed(Arc<DataError>),
}

/// 批量迭代器
///
/// # 示例
/// ```ignore
/// let mut train = mnist_loader::data::load("train", 64, true)?;
/// loop {
///     let Elements { images, labels } = train.next_batch().await?;
///     // images: [64, 28, 28], labels: [64]
/// }
/// ```
pub struct BatchIterator {
    state: LoadState,
    cursor: usize,
    batch_size: usize,
    device: Device,
}

impl BatchIterator {
    /// 在当前 tokio 运行时中立即启动`load`，返回尚在加载中的迭代器。
    ///
    /// # 错误
    /// - `batch_size`为 0：`DataError::ConfigError`
    /// - 不在 tokio 运行时中：`DataError::RuntimeUnavailable`
    pub fn spawn<F>(load: F, batch_size: usize, device: Device) -> Result<Self, DataError>
    where
        F: Future<Output = Result<Elements, DataError>> + Send + 'static,
    {
        check_batch_size(batch_size)?;
        let runtime =
            tokio::runtime::Handle::try_current().map_err(|_| DataError::RuntimeUnavailable)?;
        Ok(Self {
            state: LoadState::Loading(runtime.spawn(load)),
            cursor: 0,
            batch_size,
            device,
        })
    }

    /// 由已加载好的张量直接创建（处于 Ready 状态）
    pub fn from_elements(
        elements: Elements,
        batch_size: usize,
        device: Device,
    ) -> Result<Self, DataError> {
        check_batch_size(batch_size)?;
        let elements = validate(elements, batch_size)?;
        Ok(Self {
            state: LoadState::Ready(elements),
            cursor: 0,
            batch_size,
            device,
        })
    }

    pub fn phase(&self) -> LoadPhase {
        match self.state {
            LoadState::Loading(_) => LoadPhase::Loading,
            LoadState::Ready(_) => LoadPhase::Ready,
            LoadState::Failed(_) => LoadPhase::Failed,
        }
    }

    /// 下一批的起始位置，始终小于样本总数（不足一批时的回绕发生在取批时）
    pub fn cursor(&self) -> usize {
        self.cursor
    }

    pub fn batch_size(&self) -> usize {
        self.batch_size
    }

    pub fn device(&self) -> Device {
        self.device
    }

    /// 样本总数；加载完成前为 None
    pub fn len(&self) -> Option<usize> {
        match &self.state {
            LoadState::Ready(elements) => Some(num_examples(&elements.images)),
            _ => None,
        }
    }

    /// 等待后台加载结束
    pub async fn ready(&mut self) -> Result<(), DataError> {
        self.loaded().await.map(|_| ())
    }

    /// 取下一批（恰好`batch_size`个样本）。
    ///
    /// 若`cursor + batch_size`超出样本总数，游标先回绕到 0：
    /// 不会产生不足一批的短批次，末尾的余数被丢弃。
    pub async fn next_batch(&mut self) -> Result<Elements, DataError> {
        // 即便数据早已就绪，也先让出一次执行权，避免紧密循环独占调度线程
        tokio::task::yield_now().await;

        let batch_size = self.batch_size;
        let device = self.device;
        let cursor = self.cursor;
        let elements = self.loaded().await?;

        let (images, labels) = (&elements.images, &elements.labels);
        if images.device() != device || labels.device() != device {
            error!(
                "设备放置不一致: 期望 {device}, 图像 {}, 标签 {}",
                images.device(),
                labels.device()
            );
            return Err(DataError::DevicePlacementError {
                expected: device,
                images: images.device(),
                labels: labels.device(),
            });
        }

        let len = num_examples(images);
        let start = if cursor + batch_size > len { 0 } else { cursor };
        let end = start + batch_size;
        let batch = Elements {
            images: images.narrow(start..end)?,
            labels: labels.narrow(start..end)?,
        };
        // 游标始终满足 0 <= cursor < len
        self.cursor = if end >= len { 0 } else { end };
        Ok(batch)
    }

    /// 转为无限的批次流
    pub fn into_stream(self) -> impl Stream<Item = Result<Elements, DataError>> {
        stream::unfold(self, |mut iter| async move {
            let batch = iter.next_batch().await;
            Some((batch, iter))
        })
    }

    async fn loaded(&mut self) -> Result<&Elements, DataError> {
        if let LoadState::Loading(handle) = &mut self.state {
            let outcome = handle.await.unwrap_or_else(|e| Err(e.into()));
            self.state = match outcome.and_then(|e| validate(e, self.batch_size)) {
                Ok(elements) => {
                    info!(
                        "数据加载完成: {} 个样本, 设备 {}",
                        num_examples(&elements.images),
                        self.device
                    );
                    LoadState::Ready(elements)
                }
                Err(err) => {
                    error!("数据加载失败: {err}");
                    LoadState::Failed(Arc::new(err))
                }
            };
        }

        match &self.state {
            LoadState::Ready(elements) => Ok(elements),
            LoadState::Failed(err) => Err(DataError::LoadFailed(Arc::clone(err))),
            LoadState::Loading(_) => Err(DataError::TaskFailed("加载尚未完成".to_string())),
        }
    }
}

fn check_batch_size(batch_size: usize) -> Result<(), DataError> {
    if batch_size == 0 {
        return Err(DataError::ConfigError("batch_size 必须大于 0".to_string()));
    }
    Ok(())
}

fn num_examples(tensor: &Tensor) -> usize {
    tensor.shape().first().copied().unwrap_or(0)
}

/// 检查图像与标签的样本数一致，且至少能凑出一整批
fn validate(elements: Elements, batch_size: usize) -> Result<Elements, DataError> {
    let (images, labels) = (&elements.images, &elements.labels);
    if images.dimension() == 0 || labels.dimension() == 0 {
        return Err(DataError::ShapeMismatch {
            expected: vec![num_examples(labels)],
            got: images.shape().to_vec(),
        });
    }
    let len = num_examples(images);
    if len != num_examples(labels) {
        return Err(DataError::ShapeMismatch {
            expected: vec![len],
            got: labels.shape().to_vec(),
        });
    }
    if batch_size > len {
        return Err(DataError::ConfigError(format!(
            "batch_size {batch_size} 超过样本总数 {len}"
        )));
    }
    Ok(elements)
}
