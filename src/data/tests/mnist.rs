//! MNIST 加载器单元测试（使用内存中的合成 IDX 文件，无需网络）

use std::sync::Arc;

use super::{fetcher_for, images_bytes, labels_bytes};
use crate::data::config::{LoaderConfig, ValidationMode};
use crate::data::datasets::{MNIST_FILES, MnistLoader, default_data_dir};
use crate::data::error::DataError;
use crate::data::fetch::InMemoryFetcher;
use crate::data::iterator::LoadPhase;
use crate::data::split::Split;
use crate::errors::TensorError;
use crate::tensor::{DType, Device, NdarrayBackend};

fn permissive_loader(fetcher: InMemoryFetcher) -> MnistLoader {
    MnistLoader::from_config(LoaderConfig::default().validation(ValidationMode::Permissive))
        .fetcher(Arc::new(fetcher))
}

#[test]
fn test_default_data_dir() {
    let dir = default_data_dir();
    assert!(dir.to_string_lossy().contains("mnist_loader"));
    assert!(dir.to_string_lossy().contains("datasets"));
}

#[test]
fn test_checksum_table_covers_both_splits() {
    for split in [Split::Train, Split::Test] {
        let (labels, images) = split.filenames();
        for name in [labels, images] {
            let gz = format!("{name}.gz");
            assert!(MNIST_FILES.iter().any(|(file, _)| *file == gz));
        }
    }
}

#[tokio::test]
async fn test_bad_split_fails_before_io() {
    let fetcher = Arc::new(fetcher_for(Split::Train, 4));
    let loader = MnistLoader::from_config(LoaderConfig::default()).fetcher(fetcher.clone());

    assert!(matches!(
        loader.load("bogus", 2, true),
        Err(DataError::ConfigError(_))
    ));
    assert!(matches!(
        loader.load_split("bogus").await,
        Err(DataError::ConfigError(_))
    ));
    assert!(matches!(
        loader.load("train", 0, true),
        Err(DataError::ConfigError(_))
    ));
    assert_eq!(fetcher.fetch_count(), 0);
}

#[tokio::test]
async fn test_load_batches_on_accelerator() {
    let loader = permissive_loader(fetcher_for(Split::Train, 10));
    let mut train = loader.load("train", 4, true).unwrap();
    assert_eq!(train.device(), Device::GPU);

    let batch = train.next_batch().await.unwrap();
    assert_eq!(train.phase(), LoadPhase::Ready);
    assert_eq!(train.len(), Some(10));
    assert_eq!(batch.images.shape(), &[4, 28, 28]);
    assert_eq!(batch.images.dtype(), DType::F32);
    assert_eq!(batch.images.device(), Device::GPU);
    assert_eq!(batch.labels.shape(), &[4]);
    assert_eq!(batch.labels.dtype(), DType::I32);
    assert_eq!(batch.labels.device(), Device::GPU);

    // 第 1 张图像（样本 1）的像素都为 1.0，对应标签为 1
    let pixels = batch.images.to_f32_vec();
    assert_eq!(pixels[784], 1.0);
    assert_eq!(
        batch.labels.as_i32().unwrap().iter().copied().collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );

    train.next_batch().await.unwrap();
    let wrapped = train.next_batch().await.unwrap();
    assert_eq!(
        wrapped.labels.as_i32().unwrap().iter().copied().collect::<Vec<_>>(),
        vec![0, 1, 2, 3]
    );
}

#[tokio::test]
async fn test_load_on_cpu_with_int_images() {
    let config = LoaderConfig::default()
        .validation(ValidationMode::Permissive)
        .image_dtype(DType::I32);
    let loader = MnistLoader::from_config(config).fetcher(Arc::new(fetcher_for(Split::Test, 6)));
    let mut test = loader.load("test", 3, false).unwrap();
    let batch = test.next_batch().await.unwrap();
    assert_eq!(batch.images.dtype(), DType::I32);
    assert_eq!(batch.images.device(), Device::CPU);
}

#[tokio::test]
async fn test_strict_load_rejects_wrong_count() {
    let loader = MnistLoader::from_config(LoaderConfig::default())
        .fetcher(Arc::new(fetcher_for(Split::Train, 10)));
    let mut train = loader.load("train", 4, true).unwrap();
    match train.next_batch().await {
        Err(DataError::LoadFailed(cause)) => {
            assert!(matches!(*cause, DataError::FormatError(_)));
        }
        other => panic!("期望 LoadFailed，实际 {other:?}"),
    }
    assert_eq!(train.phase(), LoadPhase::Failed);
}

#[tokio::test]
async fn test_missing_file_fails_load() {
    let (labels, _) = Split::Test.filenames();
    let fetcher = InMemoryFetcher::new().with_file(labels, labels_bytes(4));
    let mut test = permissive_loader(fetcher).load("test", 2, false).unwrap();
    match test.ready().await {
        Err(DataError::LoadFailed(cause)) => {
            assert!(matches!(*cause, DataError::FileNotFound(_)));
        }
        other => panic!("期望 LoadFailed，实际 {other:?}"),
    }
}

#[tokio::test]
async fn test_unsupported_accelerator() {
    let loader = permissive_loader(fetcher_for(Split::Train, 4))
        .backend(Arc::new(NdarrayBackend::cpu_only()));
    let mut train = loader.load("train", 2, true).unwrap();
    match train.next_batch().await {
        Err(DataError::LoadFailed(cause)) => assert!(matches!(
            &*cause,
            DataError::Tensor(TensorError::UnsupportedDevice(_))
        )),
        other => panic!("期望 LoadFailed，实际 {other:?}"),
    }
}

#[tokio::test]
async fn test_load_split_whole_dataset() {
    let loader = MnistLoader::from_config(LoaderConfig::default())
        .fetcher(Arc::new(fetcher_for(Split::Test, 7)));
    let elements = loader.load_split("test").await.unwrap();
    assert_eq!(elements.images.shape(), &[7, 28, 28]);
    assert_eq!(elements.labels.shape(), &[7]);
    assert_eq!(elements.images.dtype(), DType::I32);
    assert_eq!(elements.labels.dtype(), DType::I32);
    assert_eq!(elements.images.device(), Device::CPU);
}

#[tokio::test]
async fn test_load_split_rejects_swapped_files() {
    let (labels, images) = Split::Train.filenames();
    let fetcher = InMemoryFetcher::new()
        .with_file(images, labels_bytes(3))
        .with_file(labels, images_bytes(3));
    let result = permissive_loader(fetcher).load_split("train").await;
    assert!(matches!(result, Err(DataError::FormatError(_))));
}

#[tokio::test]
async fn test_load_split_rejects_mismatched_counts() {
    let (labels, images) = Split::Train.filenames();
    let fetcher = InMemoryFetcher::new()
        .with_file(images, images_bytes(3))
        .with_file(labels, labels_bytes(4));
    let result = permissive_loader(fetcher).load_split("train").await;
    assert!(matches!(result, Err(DataError::ShapeMismatch { .. })));
}

#[tokio::test]
async fn test_independent_iterators() {
    let mut fetcher = fetcher_for(Split::Train, 8);
    let (labels, images) = Split::Test.filenames();
    fetcher.insert(images, images_bytes(6));
    fetcher.insert(labels, labels_bytes(6));
    let loader = permissive_loader(fetcher);

    let mut train = loader.load("train", 4, true).unwrap();
    let mut test = loader.load("test", 3, false).unwrap();
    train.next_batch().await.unwrap();
    test.next_batch().await.unwrap();
    test.next_batch().await.unwrap();
    assert_eq!(train.cursor(), 4);
    // 恰好取到末尾后游标归零
    assert_eq!(test.cursor(), 0);
    assert_eq!(train.len(), Some(8));
    assert_eq!(test.len(), Some(6));
}
