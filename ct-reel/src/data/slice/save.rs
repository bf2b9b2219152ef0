//! 切片的持久化存储.

use crate::{LabelSlice, ScanSlice};
use image::ImageResult;
use ndarray_npy::WriteNpyError;
use std::path::Path;

/// 表明一个可以通过 **可视化友好** 模式持久化存储的图像对象.
///
/// 对于 `ScanSlice`, 图像按切片自身的 min-max 窗口量化为 8-bit 灰度;
/// 对于 `LabelSlice`, 前景映射为白色, 背景映射为黑色.
/// 图像格式由 `path` 的扩展名决定.
pub trait ImgWriteVis {
    /// 按照一定的可视化规则将图片保存到 `path` 路径.
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()>;
}

/// 表明一个可以以 npy 数组持久化存储的二值掩码.
pub trait MaskWriteNpy {
    /// 将二值化后的掩码 (`f64`, 仅含 0 和 1) 保存到 `path` 路径.
    fn save_mask<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteNpyError>;
}

impl ImgWriteVis for ScanSlice<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_gray().save(path)
    }
}

impl ImgWriteVis for LabelSlice<'_> {
    fn save<P: AsRef<Path>>(&self, path: P) -> ImageResult<()> {
        self.to_preview().save(path)
    }
}

impl MaskWriteNpy for LabelSlice<'_> {
    fn save_mask<P: AsRef<Path>>(&self, path: P) -> Result<(), WriteNpyError> {
        ndarray_npy::write_npy(path, &self.binarize())
    }
}
