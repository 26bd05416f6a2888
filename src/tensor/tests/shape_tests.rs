use crate::errors::TensorError;

use super::{arange_f32, arange_i32};

#[test]
fn test_reshape() {
    let tensor = arange_f32(&[6]);
    let reshaped = tensor.reshape(&[2, 3]).unwrap();
    assert_eq!(reshaped.shape(), &[2, 3]);
    assert_eq!(reshaped.to_f32_vec(), tensor.to_f32_vec());
    assert_eq!(reshaped.device(), tensor.device());
    // 原张量不受影响
    assert_eq!(tensor.shape(), &[6]);
}

#[test]
fn test_reshape_keeps_dtype() {
    let reshaped = arange_i32(&[2, 2, 2]).reshape(&[8]).unwrap();
    assert_eq!(
        reshaped.as_i32().unwrap().iter().copied().collect::<Vec<_>>(),
        (0..8).collect::<Vec<_>>()
    );
}

#[test]
fn test_reshape_incompatible() {
    let result = arange_f32(&[6]).reshape(&[4, 2]);
    assert_eq!(
        result.unwrap_err(),
        TensorError::IncompatibleShape {
            from: vec![6],
            to: vec![4, 2]
        }
    );
}
