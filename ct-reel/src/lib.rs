#![warn(missing_docs)]

//! 核心库. 将成对的 3D nifti 医学影像 (扫描 + 分割标注) 转换为按体数据分目录存放的
//! 2D 切片序列: 每层切片输出一张归一化的 8-bit 灰度图像和一个二值掩码.
//!
//! # 流程
//!
//! 1. 发现: 列出扫描目录下的 `*.nii.gz` 文件, 在标注目录中寻找同名文件.
//!   缺少标注的体数据被记录并跳过. 实现位于 `ct-reel/src/dataset`.
//! 2. 加载: 将扫描与标注解码为 `f64` 三维数组, 并以 (z, x, y) 组织,
//!   使 `data[k]` 恰为第 `k` 层切片. 实现位于 `ct-reel/src/data`.
//! 3. 选取切片范围: 统计每层标注中大于零的体素个数, 取严格大于阈值的切片.
//!   阈值非零时区间为 `[min, max)`; 阈值为零时两端再随机外扩 `[5, 10)` 层.
//!   实现位于 `ct-reel/src/range.rs`.
//! 4. 导出: 区间内每层写出 `{序号:05}.npy` (二值掩码, `f64`) 和
//!   `{序号:05}.jpg` (min-max 归一化灰度图). 实现位于 `ct-reel/src/export.rs`.
//!
//! # 注意
//!
//! 1. 阈值非零时, 最后一个达标切片默认 **不** 导出. 这与既有数据集的生成方式保持一致;
//!   若需要导出, 打开 [`Config::inclusive_upper`].
//! 2. 常值切片 (最大值等于最小值) 输出全黑图像, 而不是产生无意义的像素值.
//! 3. 除标注缺失外, 任何错误都会中止整个流程. 已写出的部分文件不会被清理.

/// 二维索引.
pub type Idx2d = (usize, usize);

/// 三维索引.
pub type Idx3d = (usize, usize, usize);

/// 3D nii 文件基础数据结构.
mod data;

pub use data::{
    CtLabel, CtScan, ImgWriteVis, IntensityWindow, LabelSlice, MaskWriteNpy, ScanSlice,
    VolumeAttr, VolumePair,
};

pub mod config;
pub mod consts;
pub mod dataset;
pub mod error;
pub mod export;
pub mod prelude;
pub mod range;

pub use config::Config;
pub use error::{Error, Result};
