/*
 * @Description  : MNIST 加载器集成测试
 *                 验证：两个划分并发加载互不干扰；严格校验下的批量迭代与回绕
 *                 数据为按文档样本数合成的 IDX 文件，由内存获取能力提供，无需网络
 */

use std::sync::Arc;

use mnist_loader::data::idx::{IMAGE_SIDE, IdxKind, encode};
use mnist_loader::data::{
    DataError, Elements, InMemoryFetcher, LoadPhase, LoaderConfig, MnistLoader, Split, filenames,
};
use mnist_loader::{DType, Device};

/// 为`split`合成文档规定数量的样本：第`i`个样本的像素全为`i % 256`，标签为`i % 10`
fn add_split(fetcher: &mut InMemoryFetcher, split: Split) {
    let n = split.num_examples();
    let pixels: Vec<u8> = (0..n)
        .flat_map(|i| std::iter::repeat((i % 256) as u8).take(IMAGE_SIDE * IMAGE_SIDE))
        .collect();
    let labels: Vec<u8> = (0..n).map(|i| (i % 10) as u8).collect();

    let (labels_file, images_file) = split.filenames();
    fetcher.insert(images_file, encode(IdxKind::Images, n as u32, &pixels));
    fetcher.insert(labels_file, encode(IdxKind::Labels, n as u32, &labels));
}

fn full_loader() -> MnistLoader {
    let mut fetcher = InMemoryFetcher::new();
    add_split(&mut fetcher, Split::Train);
    add_split(&mut fetcher, Split::Test);
    MnistLoader::from_config(LoaderConfig::default()).fetcher(Arc::new(fetcher))
}

#[test]
fn test_unknown_split_is_rejected_synchronously() {
    match filenames("bogus") {
        Err(DataError::ConfigError(msg)) => assert!(msg.contains("Bad split: bogus")),
        other => panic!("期望 ConfigError，实际 {other:?}"),
    }
}

#[tokio::test]
async fn test_load_split_train_and_test_concurrently() {
    let loader = full_loader();
    let (train, test) = tokio::join!(loader.load_split("train"), loader.load_split("test"));
    let Elements { images, labels } = train.expect("加载训练集失败");
    assert_eq!(images.shape(), &[60000, 28, 28]);
    assert_eq!(labels.shape(), &[60000]);
    assert_eq!(images.dtype(), DType::I32);
    assert_eq!(images.device(), Device::CPU);

    let Elements { images, labels } = test.expect("加载测试集失败");
    assert_eq!(images.shape(), &[10000, 28, 28]);
    assert_eq!(labels.shape(), &[10000]);
}

#[tokio::test]
async fn test_strict_iterator_over_test_split() {
    let loader = full_loader();
    let batch_size = 3000;
    let mut test = loader.load("test", batch_size, true).expect("创建迭代器失败");
    assert_eq!(test.phase(), LoadPhase::Loading);

    // 10000 个样本、每批 3000：起点依次为 0, 3000, 6000，第 4 批回绕到 0。
    // 每批首张图像的像素值即为起点 % 256
    let mut first_pixels = Vec::new();
    for _ in 0..4 {
        let batch = test.next_batch().await.expect("取批失败");
        assert_eq!(batch.images.shape(), &[batch_size, 28, 28]);
        assert_eq!(batch.images.dtype(), DType::F32);
        assert_eq!(batch.images.device(), Device::GPU);
        assert_eq!(batch.labels.shape(), &[batch_size]);
        first_pixels.push(batch.images.to_f32_vec()[0]);
    }
    assert_eq!(first_pixels, vec![0.0, 184.0, 112.0, 0.0]);
    assert_eq!(test.cursor(), 3000);
    assert_eq!(test.len(), Some(10000));
}

#[tokio::test]
async fn test_stream_of_batches() {
    use futures::StreamExt;

    let loader = full_loader();
    let stream = loader.load("test", 4000, false).unwrap().into_stream();
    let batches: Vec<_> = stream.take(3).collect().await;
    for batch in batches {
        let batch = batch.expect("取批失败");
        assert_eq!(batch.images.shape()[0], 4000);
        assert_eq!(batch.images.device(), Device::CPU);
    }
}
