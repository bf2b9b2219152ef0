use std::ops::Index;
use std::path::Path;

use ndarray::{Array3, ArrayView3, Axis, Ix3};
use nifti::{IntoNdArray, NiftiHeader, NiftiObject, ReaderOptions};

use crate::error::{Error, Result};
use crate::{Idx2d, Idx3d};

pub mod slice;
pub mod window;

pub use slice::{ImgWriteVis, LabelSlice, MaskWriteNpy, ScanSlice};

pub use window::IntensityWindow;

/// `NiftiHeader` 是栈上大对象, 移动该对象的开销很可观.
/// 因此我们将其分配到堆上.
type BoxedHeader = Box<NiftiHeader>;

/// 读取 nii 文件, 返回 header 和以 (z, x, y) 组织的 `f64` 体数据.
///
/// nifti 的体数据以 \[x, y, z\] 组织. 这里把切片方向换到第一维,
/// 使 `data[k]` 恰为第 `k` 层水平切片, 且切片的行对应 x, 列对应 y.
fn read_volume(path: &Path) -> Result<(BoxedHeader, Array3<f64>)> {
    let decode_err = |source| Error::Decode {
        path: path.to_owned(),
        source,
    };
    let obj = ReaderOptions::new().read_file(path).map_err(decode_err)?;
    let header = Box::new(obj.header().clone());

    let data = obj
        .into_volume()
        .into_ndarray::<f64>()
        .map_err(decode_err)?
        .into_dimensionality::<Ix3>()
        .map_err(|source| Error::NotVolume {
            path: path.to_owned(),
            source,
        })?;

    Ok((header, to_slice_major(data)))
}

/// 将 \[x, y, z\] 数据转换为行优先的 \[z, x, y\] 数据.
fn to_slice_major(data: Array3<f64>) -> Array3<f64> {
    let data = data.permuted_axes([2, 0, 1]);
    let data = if data.is_standard_layout() {
        data
    } else {
        data.as_standard_layout().into_owned()
    };
    debug_assert!(data.is_standard_layout());
    data
}

/// 为手工拼接的体数据构造最小 header.
///
/// nifti-1 header 的每维长度以 `u16` 存储, 任一维超过 `u16::MAX` 时程序 panic.
fn fake_header((x, y, z): Idx3d) -> BoxedHeader {
    let extent = |n: usize| u16::try_from(n).expect("nifti-1 体数据每维长度不能超过 65535");
    let mut header = Box::<NiftiHeader>::default();
    header.dim = [3, extent(x), extent(y), extent(z), 1, 1, 1, 1];
    header.pixdim = [1.0; 8];
    header.intent_name[..4].copy_from_slice(b"fake");
    header
}

/// 3D nii 文件的共用属性和部分通用操作.
pub trait VolumeAttr {
    /// 获取 header 部分.
    fn header(&self) -> &NiftiHeader;

    /// 获取以 (z, x, y) 组织的体数据视图.
    fn data(&self) -> ArrayView3<'_, f64>;

    /// 获取数据形状大小 (z, x, y).
    #[inline]
    fn shape(&self) -> Idx3d {
        self.data().dim()
    }

    /// 获取数据水平切片形状大小 (x, y).
    #[inline]
    fn slice_shape(&self) -> Idx2d {
        let (_, x, y) = self.shape();
        (x, y)
    }

    /// 获取水平切片个数.
    #[inline]
    fn len_z(&self) -> usize {
        self.shape().0
    }

    /// 获取数据体素个数.
    #[inline]
    fn size(&self) -> usize {
        let (z, x, y) = self.shape();
        z * x * y
    }

    /// 获取单个体素分辨率, 以毫米为单位, 顺序为 (z, x, y).
    #[inline]
    fn pix_dim(&self) -> [f64; 3] {
        let [_, x, y, z, ..] = self.header().pixdim;
        [z as f64, x as f64, y as f64]
    }

    /// 判断该结构是否是由 `from_array` 手动拼接的.
    fn is_faked(&self) -> bool {
        self.header().intent_name.starts_with(b"fake")
    }
}

/// 扫描和标注共用的打开、构造与切片访问方法.
macro_rules! impl_volume {
    ($($volume: ident => $slice: ident),+) => {
        $(
            impl VolumeAttr for $volume {
                #[inline]
                fn header(&self) -> &NiftiHeader {
                    &self.header
                }

                #[inline]
                fn data(&self) -> ArrayView3<'_, f64> {
                    self.data.view()
                }
            }

            impl Index<Idx3d> for $volume {
                type Output = f64;

                #[inline]
                fn index(&self, index: Idx3d) -> &Self::Output {
                    &self.data[index]
                }
            }

            impl $volume {
                /// 打开 nii (或 nii.gz) 文件. `path` 为文件的本地路径.
                /// 文件无法解码或不是三维数据时返回 `Err`.
                pub fn open<P: AsRef<Path>>(path: P) -> Result<Self> {
                    let (header, data) = read_volume(path.as_ref())?;
                    Ok(Self { header, data })
                }

                /// 根据裸数据直接创建实体. `data` 按照 nifti 惯用标准以
                /// \[x, y, z\] 格式组织.
                ///
                /// 该方法生成的 header 仅包含形状信息, 因此你应仅将其用于实验或测试目的.
                ///
                /// 任一维长度超过 `u16::MAX` 时程序 panic.
                pub fn from_array(data: Array3<f64>) -> Self {
                    let header = fake_header(data.dim());
                    Self {
                        header,
                        data: to_slice_major(data),
                    }
                }

                /// 获取 z 空间的第 `z_index` 层切片视图.
                ///
                /// 当 `z_index` 越界时 panic.
                #[inline]
                pub fn slice_at(&self, z_index: usize) -> $slice<'_> {
                    $slice::new(self.data.index_axis(Axis(0), z_index))
                }

                /// 获取能按升序迭代水平切片的迭代器.
                #[inline]
                pub fn slice_iter(&self) -> impl ExactSizeIterator<Item = $slice<'_>> {
                    self.data.axis_iter(Axis(0)).map($slice::new)
                }
            }
        )+
    };
}

/// nii 格式 3D 扫描, 包括 header 和强度值. 强度值以 `f64` 保存.
#[derive(Debug, Clone)]
pub struct CtScan {
    header: BoxedHeader,
    data: Array3<f64>,
}

/// nii 格式 3D 标注, 包括 header 和标签值. 标签值同样以 `f64` 保存.
#[derive(Debug, Clone)]
pub struct CtLabel {
    header: BoxedHeader,
    data: Array3<f64>,
}

impl_volume!(CtScan => ScanSlice, CtLabel => LabelSlice);

impl CtLabel {
    /// 逐层统计严格大于零的体素个数. 返回值长度等于水平切片个数.
    pub fn foreground_counts(&self) -> Vec<usize> {
        self.slice_iter().map(|s| s.count_positive()).collect()
    }
}

/// nii 格式的 3D 扫描与对应的标注.
///
/// 该结构完全透明, 仅包含两个公开的 `scan` 和 `label` 子结构,
/// 用户可以直接使用它们来实现相关上层功能.
#[derive(Debug, Clone)]
pub struct VolumePair {
    /// 3D 扫描.
    pub scan: CtScan,

    /// 3D 标注.
    pub label: CtLabel,
}

impl VolumePair {
    /// 分别打开 nii 文件格式的 3D 扫描和对应标注. 任一文件打开失败时返回 `Err`;
    /// 两者形状不一致时返回 [`Error::ShapeMismatch`], 其中 `name` 取扫描文件名.
    pub fn open(scan_path: impl AsRef<Path>, label_path: impl AsRef<Path>) -> Result<Self> {
        let scan_path = scan_path.as_ref();
        let scan = CtScan::open(scan_path)?;
        let label = CtLabel::open(label_path.as_ref())?;
        let name = scan_path
            .file_name()
            .map_or_else(|| scan_path.display().to_string(), |n| n.to_string_lossy().into_owned());
        Self::new(&name, scan, label)
    }

    /// 组合扫描与标注. 两者形状不一致时返回 [`Error::ShapeMismatch`],
    /// `name` 仅用于错误信息.
    pub fn new(name: &str, scan: CtScan, label: CtLabel) -> Result<Self> {
        if scan.shape() != label.shape() {
            return Err(Error::ShapeMismatch {
                name: name.to_owned(),
                image: scan.shape(),
                label: label.shape(),
            });
        }
        Ok(Self { scan, label })
    }

    /// 获取水平切片个数.
    #[inline]
    pub fn len_z(&self) -> usize {
        self.label.len_z()
    }

    /// 依次获取扫描和标注 z 空间的第 `z_index` 层切片.
    ///
    /// 当 `z_index` 越界时 panic.
    #[inline]
    pub fn slice_at(&self, z_index: usize) -> (ScanSlice<'_>, LabelSlice<'_>) {
        (self.scan.slice_at(z_index), self.label.slice_at(z_index))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::Array3;

    /// 构造 \[x, y, z\] = \[4, 3, 6\] 的标注, 第 k 层有 k 个正值体素.
    fn staircase_label() -> CtLabel {
        let mut data = Array3::<f64>::zeros((4, 3, 6));
        for k in 0..6 {
            for n in 0..k {
                data[[n % 4, n / 4, k]] = 1.0;
            }
        }
        CtLabel::from_array(data)
    }

    #[test]
    fn test_slice_major_layout() {
        let data = Array3::from_shape_fn((4, 3, 2), |(x, y, z)| (x * 100 + y * 10 + z) as f64);
        let scan = CtScan::from_array(data);
        assert_eq!(scan.shape(), (2, 4, 3));
        assert_eq!(scan.slice_shape(), (4, 3));
        assert_eq!(scan.len_z(), 2);
        assert_eq!(scan.size(), 24);
        assert_eq!(scan[(1, 3, 2)], 321.0);

        let s = scan.slice_at(1);
        assert_eq!(s.shape(), (4, 3));
        assert_eq!(s.get((2, 1)), Some(&211.0));
        assert!(scan.is_faked());
        assert_eq!(scan.pix_dim(), [1.0, 1.0, 1.0]);
    }

    #[test]
    fn test_foreground_counts() {
        let label = staircase_label();
        assert_eq!(label.foreground_counts(), vec![0, 1, 2, 3, 4, 5]);
    }

    #[test]
    fn test_pair_shape_mismatch() {
        let scan = CtScan::from_array(Array3::zeros((4, 3, 5)));
        let err = VolumePair::new("case", scan, staircase_label()).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                image: (5, 4, 3),
                label: (6, 4, 3),
                ..
            }
        ));

        let scan = CtScan::from_array(Array3::zeros((4, 3, 6)));
        let pair = VolumePair::new("case", scan, staircase_label()).unwrap();
        assert_eq!(pair.len_z(), 6);
        let (s, l) = pair.slice_at(5);
        assert_eq!(s.shape(), l.shape());
    }

    #[test]
    #[should_panic(expected = "65535")]
    fn test_from_array_rejects_oversized_extent() {
        CtScan::from_array(Array3::zeros((1, 1, u16::MAX as usize + 1)));
    }

    #[test]
    fn test_open_rejects_shape_mismatch() {
        use nifti::writer::WriterOptions;

        let dir = tempfile::tempdir().unwrap();
        let scan_path = dir.path().join("case_009.nii.gz");
        let label_path = dir.path().join("label.nii.gz");
        WriterOptions::new(&scan_path)
            .write_nifti(&Array3::<f32>::zeros((4, 4, 3)))
            .unwrap();
        let label = Array3::from_shape_fn((4, 4, 8), |(_, _, z)| if z >= 5 { 1.0f32 } else { 0.0 });
        WriterOptions::new(&label_path).write_nifti(&label).unwrap();

        let err = VolumePair::open(&scan_path, &label_path).unwrap_err();
        assert!(matches!(
            err,
            Error::ShapeMismatch {
                ref name,
                image: (3, 4, 4),
                label: (8, 4, 4),
            } if name == "case_009.nii.gz"
        ));

        WriterOptions::new(&label_path)
            .write_nifti(&Array3::<f32>::zeros((4, 4, 3)))
            .unwrap();
        assert_eq!(VolumePair::open(&scan_path, &label_path).unwrap().len_z(), 3);
    }
}
