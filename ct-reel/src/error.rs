//! 运行时错误.

use crate::Idx3d;
use std::path::PathBuf;
use thiserror::Error;

/// 转换流程中的所有致命错误.
///
/// 标注文件缺失和切片范围为空不属于错误, 它们由流程本身跳过.
#[derive(Error, Debug)]
pub enum Error {
    /// 无法列出输入目录.
    #[error("failed to read directory {path}: {source}")]
    ReadDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// 无法创建输出目录.
    #[error("failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// nifti 文件解码失败.
    #[error("failed to decode volume {path}: {source}")]
    Decode {
        path: PathBuf,
        #[source]
        source: nifti::NiftiError,
    },

    /// nifti 文件不是三维数据.
    #[error("volume {path} is not 3-dimensional: {source}")]
    NotVolume {
        path: PathBuf,
        #[source]
        source: ndarray::ShapeError,
    },

    /// 扫描与标注形状不一致.
    #[error("shape mismatch for `{name}`: image {image:?}, label {label:?}")]
    ShapeMismatch {
        name: String,
        image: Idx3d,
        label: Idx3d,
    },

    /// 二值掩码写入失败.
    #[error("failed to write mask {path}: {source}")]
    WriteMask {
        path: PathBuf,
        #[source]
        source: ndarray_npy::WriteNpyError,
    },

    /// 灰度图像写入失败.
    #[error("failed to write image {path}: {source}")]
    WriteImage {
        path: PathBuf,
        #[source]
        source: image::ImageError,
    },
}

/// 本 crate 的 `Result` 别名.
pub type Result<T> = std::result::Result<T, Error>;
