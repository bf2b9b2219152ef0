//! 通用常量.

use std::ops::Range;

/// 单通道颜色.
pub mod gray {
    /// 单通道黑色.
    pub const BLACK: u8 = 0b_0000_0000;

    /// 单通道白色.
    pub const WHITE: u8 = 0b_1111_1111;
}

/// 二值掩码取值.
pub mod mask {
    /// 掩码中背景的取值.
    pub const MASK_BACKGROUND: f64 = 0.0;

    /// 掩码中前景的取值.
    pub const MASK_FOREGROUND: f64 = 1.0;

    /// 体素在二值化时是否映射为前景? 任何非零值 (包括 NaN) 都算前景.
    #[inline]
    pub fn is_nonzero(v: f64) -> bool {
        v != 0.0
    }

    /// 体素在统计前景个数时是否计入? 只统计严格大于零的体素.
    #[inline]
    pub fn is_positive(v: f64) -> bool {
        v > 0.0
    }
}

/// 3D 体数据文件的双重后缀.
pub const VOLUME_SUFFIX: &str = ".nii.gz";

/// 需要跳过的隐藏文件前缀 (如 macOS 在非原生文件系统上生成的 `._*` 文件).
pub const HIDDEN_PREFIX: &str = "._";

/// 导出文件序号的位数.
pub const SERIAL_WIDTH: usize = 5;

/// 灰度图像扩展名.
pub const IMAGE_EXT: &str = "jpg";

/// 二值掩码扩展名.
pub const MASK_EXT: &str = "npy";

/// 掩码预览图扩展名.
pub const PREVIEW_EXT: &str = "png";

/// 默认前景体素个数阈值.
pub const DEFAULT_THRESHOLD: i64 = 256;

/// 填充裁剪模式下, 每一侧外扩切片数的取值范围 (左闭右开).
pub const PADDING_RANGE: Range<usize> = 5..10;

/// 将导出序号格式化为定宽文件名主干, 如 `7` -> `00007`.
#[inline]
pub fn serial_name(serial: usize) -> String {
    format!("{serial:0width$}", width = SERIAL_WIDTH)
}
