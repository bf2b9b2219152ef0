//! 运行配置.

use crate::consts::DEFAULT_THRESHOLD;
use crate::dataset::{expand_home, with_threshold_suffix};
use crate::range::RangeSelector;
use rand::rngs::StdRng;
use rand::SeedableRng;
use std::path::PathBuf;

/// 默认扫描目录.
pub const DEFAULT_IMAGE_FOLDER: &str = "~/msd/Task07_Pancreas/imagesTr";

/// 默认标注目录.
pub const DEFAULT_LABEL_FOLDER: &str = "~/msd/Task07_Pancreas/labelsTr";

/// 默认输出目录 (不含阈值后缀).
pub const DEFAULT_OUTPUT_FOLDER: &str = "./videos/Task07_Pancreas";

/// 一次转换所需的全部配置. 以参数形式显式传递给 [`crate::export::run`].
///
/// 三个路径均可以 `~` 开头, 使用时再展开.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct Config {
    /// 扫描目录.
    pub image_folder: PathBuf,

    /// 标注目录.
    pub label_folder: PathBuf,

    /// 输出基础目录. 实际输出到 `{output_folder}_{threshold}`.
    pub output_folder: PathBuf,

    /// 切片前景体素个数需严格大于该值才算达标. 为 0 时使用随机外扩的填充裁剪.
    pub threshold: i64,

    /// 填充裁剪的随机种子. 为 `None` 时每次运行结果不同.
    pub seed: Option<u64>,

    /// 是否同时导出最后一个达标切片.
    pub inclusive_upper: bool,

    /// 是否额外输出掩码的 png 预览图.
    pub label_preview: bool,
}

impl Default for Config {
    fn default() -> Self {
        Self {
            image_folder: DEFAULT_IMAGE_FOLDER.into(),
            label_folder: DEFAULT_LABEL_FOLDER.into(),
            output_folder: DEFAULT_OUTPUT_FOLDER.into(),
            threshold: DEFAULT_THRESHOLD,
            seed: None,
            inclusive_upper: false,
            label_preview: false,
        }
    }
}

impl Config {
    /// 展开后的扫描目录.
    #[inline]
    pub fn image_dir(&self) -> PathBuf {
        expand_home(&self.image_folder)
    }

    /// 展开后的标注目录.
    #[inline]
    pub fn label_dir(&self) -> PathBuf {
        expand_home(&self.label_folder)
    }

    /// 实际输出目录 `{output_folder}_{threshold}`.
    #[inline]
    pub fn output_dir(&self) -> PathBuf {
        with_threshold_suffix(expand_home(&self.output_folder), self.threshold)
    }

    /// 按配置构建切片范围选择器.
    pub fn range_selector(&self) -> RangeSelector<StdRng> {
        let rng = self
            .seed
            .map_or_else(StdRng::from_os_rng, StdRng::seed_from_u64);
        RangeSelector::new(self.threshold, self.inclusive_upper, rng)
    }
}
