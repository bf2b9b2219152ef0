//! 数据集操作: 扫描目录, 将扫描文件与同名标注文件配对.

use crate::consts::{HIDDEN_PREFIX, VOLUME_SUFFIX};
use crate::error::{Error, Result};
use std::ffi::OsString;
use std::fs;
use std::path::{Path, PathBuf};

/// 展开路径开头的 `~` 为用户主目录.
///
/// 只处理 `~` 与 `~/...` 两种形式; 其他路径, 或无法获取主目录时, 原样返回.
pub fn expand_home<P: AsRef<Path>>(path: P) -> PathBuf {
    let path = path.as_ref();
    let Ok(rest) = path.strip_prefix("~") else {
        return path.to_owned();
    };
    match dirs::home_dir() {
        Some(mut home) => {
            if !rest.as_os_str().is_empty() {
                home.push(rest);
            }
            home
        }
        None => path.to_owned(),
    }
}

/// 在路径末尾追加 `_{threshold}` 后缀, 如 `./videos/Task07` -> `./videos/Task07_256`.
pub fn with_threshold_suffix<P: AsRef<Path>>(base: P, threshold: i64) -> PathBuf {
    let mut s = OsString::from(base.as_ref().as_os_str());
    s.push(format!("_{threshold}"));
    PathBuf::from(s)
}

/// 文件名是否是需要处理的 3D 体数据文件? 必须以 `.nii.gz` 结尾, 且不是 `._` 开头的隐藏文件.
#[inline]
pub fn is_volume_file(name: &str) -> bool {
    name.ends_with(VOLUME_SUFFIX) && !name.starts_with(HIDDEN_PREFIX)
}

/// 去掉文件名末尾的两层扩展名, 如 `case_001.nii.gz` -> `case_001`.
///
/// 以 `.` 开头且无其他 `.` 的部分不视为扩展名, 如 `.nii.gz` -> `.nii`.
pub fn volume_stem(name: &str) -> &str {
    fn strip_one(s: &str) -> &str {
        match s.rfind('.') {
            Some(i) if s[..i].chars().any(|c| c != '.') => &s[..i],
            _ => s,
        }
    }
    strip_one(strip_one(name))
}

/// 一对已配对的扫描/标注文件.
#[derive(Clone, Debug, Eq, PartialEq)]
pub struct VolumeEntry {
    /// 扫描与标注共享的文件名.
    pub name: String,

    /// 扫描文件路径.
    pub scan_path: PathBuf,

    /// 标注文件路径.
    pub label_path: PathBuf,
}

impl VolumeEntry {
    /// 输出子目录名.
    #[inline]
    pub fn stem(&self) -> &str {
        volume_stem(&self.name)
    }
}

/// 目录扫描结果.
#[derive(Clone, Debug, Eq, PartialEq)]
pub enum Discovered {
    /// 找到同名标注.
    Paired(VolumeEntry),

    /// 缺少同名标注文件, 该体数据需要跳过.
    MissingLabel {
        /// 扫描文件名.
        name: String,

        /// 期望的标注文件路径.
        label_path: PathBuf,
    },
}

/// 列出 `scan_dir` 下所有体数据文件, 并在 `label_dir` 中查找同名标注.
///
/// 结果按文件名升序排列. `scan_dir` 无法读取时返回 `Err`.
/// 文件名不是合法 UTF-8 的条目会被忽略.
pub fn discover<P: AsRef<Path>, Q: AsRef<Path>>(scan_dir: P, label_dir: Q) -> Result<Vec<Discovered>> {
    let scan_dir = scan_dir.as_ref();
    let label_dir = label_dir.as_ref();
    let read_err = |source| Error::ReadDir {
        path: scan_dir.to_owned(),
        source,
    };

    let mut names = Vec::new();
    for entry in fs::read_dir(scan_dir).map_err(read_err)? {
        let entry = entry.map_err(read_err)?;
        if let Ok(name) = entry.file_name().into_string() {
            if is_volume_file(&name) {
                names.push(name);
            }
        }
    }
    names.sort_unstable();

    Ok(names
        .into_iter()
        .map(|name| {
            let scan_path = scan_dir.join(&name);
            let label_path = label_dir.join(&name);
            if label_path.exists() {
                Discovered::Paired(VolumeEntry {
                    name,
                    scan_path,
                    label_path,
                })
            } else {
                Discovered::MissingLabel { name, label_path }
            }
        })
        .collect())
}
