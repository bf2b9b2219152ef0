//! 转换流程: 发现 -> 加载 -> 选取切片范围 -> 逐层导出.

use crate::consts::{serial_name, IMAGE_EXT, MASK_EXT, PREVIEW_EXT};
use crate::data::VolumeAttr;
use crate::dataset::{discover, Discovered, VolumeEntry};
use crate::error::{Error, Result};
use crate::range::{RangeSelector, SliceRange};
use crate::{Config, ImgWriteVis, LabelSlice, MaskWriteNpy, ScanSlice, VolumePair};
use log::{debug, info, warn};
use rand::Rng;
use std::fs;
use std::path::Path;

/// 一次运行的统计信息.
#[derive(Copy, Clone, Debug, Default, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct RunSummary {
    /// 成功导出的体数据个数.
    pub exported: usize,

    /// 因缺少标注而跳过的体数据个数.
    pub missing_label: usize,

    /// 因没有达标切片, 或切片范围为空而没有写出任何文件的体数据个数.
    pub empty: usize,

    /// 导出的切片总数.
    pub slices: usize,
}

/// 创建目录 (及其父目录). 目录已存在时不做任何事.
fn create_dir(path: &Path) -> Result<()> {
    fs::create_dir_all(path).map_err(|source| Error::CreateDir {
        path: path.to_owned(),
        source,
    })
}

/// 导出单层切片: `{serial}.npy` 二值掩码和 `{serial}.jpg` 灰度图像,
/// 以及可选的 `{serial}.png` 掩码预览.
///
/// 每写出一张灰度图像, 向标准输出打印一行 `Saved {path}`.
pub fn export_slice(
    dir: &Path,
    serial: usize,
    scan: &ScanSlice,
    label: &LabelSlice,
    label_preview: bool,
) -> Result<()> {
    let name = serial_name(serial);

    let mask_path = dir.join(format!("{name}.{MASK_EXT}"));
    label
        .save_mask(&mask_path)
        .map_err(|source| Error::WriteMask {
            path: mask_path,
            source,
        })?;

    let window = scan.window();
    if window.map_or(true, |w| w.is_degenerate()) {
        debug!("slice {name} in {} is constant, writing a black image", dir.display());
    }
    let image_path = dir.join(format!("{name}.{IMAGE_EXT}"));
    let gray = scan.to_gray_with(window);
    gray.save(&image_path).map_err(|source| Error::WriteImage {
        path: image_path.clone(),
        source,
    })?;
    println!("Saved {}", image_path.display());

    if label_preview {
        let preview_path = dir.join(format!("{name}.{PREVIEW_EXT}"));
        label.save(&preview_path).map_err(|source| Error::WriteImage {
            path: preview_path,
            source,
        })?;
    }
    Ok(())
}

/// 导出 `pair` 在 `range` 内的所有切片到 `dir`, 序号从 0 开始. 返回导出的切片个数.
///
/// 当 `range` 超出体数据范围时 panic.
pub fn export_range(
    pair: &VolumePair,
    range: SliceRange,
    dir: &Path,
    label_preview: bool,
) -> Result<usize> {
    for (serial, z) in range.serials() {
        let (scan, label) = pair.slice_at(z);
        export_slice(dir, serial, &scan, &label, label_preview)?;
    }
    Ok(range.len())
}

/// 为一对体数据选取切片范围并导出到 `dir`.
///
/// 没有达标切片时不写任何文件, 返回 `Ok(None)`.
pub fn export_volume<R: Rng>(
    pair: &VolumePair,
    dir: &Path,
    selector: &mut RangeSelector<R>,
    label_preview: bool,
) -> Result<Option<SliceRange>> {
    let counts = pair.label.foreground_counts();
    let Some(range) = selector.select(&counts) else {
        return Ok(None);
    };
    export_range(pair, range, dir, label_preview)?;
    Ok(Some(range))
}

/// 处理一对已配对的文件: 创建输出子目录, 加载 (含形状检查), 导出.
fn process_entry<R: Rng>(
    entry: &VolumeEntry,
    output_dir: &Path,
    selector: &mut RangeSelector<R>,
    label_preview: bool,
) -> Result<Option<SliceRange>> {
    let dir = output_dir.join(entry.stem());
    create_dir(&dir)?;

    let pair = VolumePair::open(&entry.scan_path, &entry.label_path)?;
    debug!(
        "{}: shape (z, x, y) = {:?}, spacing = {:?} mm",
        entry.name,
        pair.scan.shape(),
        pair.scan.pix_dim()
    );

    let range = export_volume(&pair, &dir, selector, label_preview)?;
    match range {
        Some(r) if r.is_empty() => info!(
            "{}: only slice {} qualifies and the range {}..{} is empty, no files written",
            entry.name,
            r.end(),
            r.start(),
            r.end()
        ),
        Some(r) => info!(
            "{}: exported slices {}..{} of {} ({} files)",
            entry.name,
            r.start(),
            r.end(),
            pair.len_z(),
            r.len()
        ),
        None => debug!(
            "{}: no slice has more than {} foreground voxels, skipped",
            entry.name,
            selector.threshold()
        ),
    }
    Ok(range)
}

/// 按 `config` 执行完整的转换流程.
///
/// 缺少标注的体数据会被记录并跳过; 其余任何错误都会立刻中止整个流程并返回 `Err`,
/// 已写出的部分文件不会被清理.
pub fn run(config: &Config) -> Result<RunSummary> {
    let mut selector = config.range_selector();
    run_with(config, &mut selector)
}

/// 同 [`run`], 但使用调用方提供的切片范围选择器.
pub fn run_with<R: Rng>(config: &Config, selector: &mut RangeSelector<R>) -> Result<RunSummary> {
    let image_dir = config.image_dir();
    let label_dir = config.label_dir();
    let output_dir = config.output_dir();
    info!(
        "converting {} (labels: {}) into {}, threshold = {}",
        image_dir.display(),
        label_dir.display(),
        output_dir.display(),
        selector.threshold()
    );

    let found = discover(&image_dir, &label_dir)?;
    create_dir(&output_dir)?;

    let mut summary = RunSummary::default();
    for item in found {
        match item {
            Discovered::MissingLabel { name, .. } => {
                warn!("Label file for {name} not found in {}", label_dir.display());
                summary.missing_label += 1;
            }
            Discovered::Paired(entry) => {
                match process_entry(&entry, &output_dir, selector, config.label_preview)? {
                    Some(r) if !r.is_empty() => {
                        summary.exported += 1;
                        summary.slices += r.len();
                    }
                    _ => summary.empty += 1,
                }
            }
        }
    }

    info!(
        "done: {} volumes exported ({} slices), {} without label, {} without qualifying slices",
        summary.exported, summary.slices, summary.missing_label, summary.empty
    );
    Ok(summary)
}
