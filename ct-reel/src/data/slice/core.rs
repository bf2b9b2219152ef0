use crate::consts::gray::{BLACK, WHITE};
use crate::consts::mask::{is_nonzero, is_positive, MASK_BACKGROUND, MASK_FOREGROUND};
use crate::{Idx2d, IntensityWindow};
use image::{GrayImage, Luma};
use ndarray::iter::{IndexedIter, Iter};
use ndarray::{Array2, ArrayView2, Ix2};

/// 不可变、借用的二维水平扫描切片. 形状为 (x, y).
pub struct ScanSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::CtScan`].
    data: ArrayView2<'a, f64>,
}

/// 不可变、借用的二维水平标注切片. 形状为 (x, y).
pub struct LabelSlice<'a> {
    /// 底层数据的轻量级视图, 借用于 [`crate::CtLabel`].
    data: ArrayView2<'a, f64>,
}

/// 两类切片共享的不可变方法集合.
macro_rules! impl_slice_immut {
    ($($slice: ident),+) => {
        $(
            impl<'a> $slice<'a> {
                /// 直接初始化.
                #[inline]
                pub(crate) fn new(data: ArrayView2<'a, f64>) -> Self {
                    Self { data }
                }

                /// 获得 **底层** 数据的一份不可变 shallow copy.
                #[inline]
                pub fn array_view(&self) -> ArrayView2<f64> {
                    self.data.view()
                }

                /// 获取可以迭代图像像素的迭代器.
                #[inline]
                pub fn iter(&self) -> Iter<'_, f64, Ix2> {
                    self.data.iter()
                }

                /// 获取带 (行, 列) 索引迭代图像像素的迭代器.
                #[inline]
                pub fn indexed_iter(&self) -> IndexedIter<'_, f64, Ix2> {
                    self.data.indexed_iter()
                }

                /// 获取给定位置 (行, 列) 的像素值. 越界时返回 `None`.
                #[inline]
                pub fn get(&self, pos: Idx2d) -> Option<&f64> {
                    self.data.get(pos)
                }

                /// 图像的分辨率 (行, 列).
                #[inline]
                pub fn shape(&self) -> Idx2d {
                    self.data.dim()
                }

                /// 图像的像素个数.
                #[inline]
                pub fn size(&self) -> usize {
                    self.data.len()
                }

                /// 获得图像的高 (行数).
                #[inline]
                pub fn height(&self) -> usize {
                    self.shape().0
                }

                /// 获得图像的宽 (列数).
                #[inline]
                pub fn width(&self) -> usize {
                    self.shape().1
                }
            }
        )+
    };
}

impl_slice_immut!(ScanSlice, LabelSlice);

impl ScanSlice<'_> {
    /// 以切片自身有限值的最小值、最大值构建归一化窗口.
    /// 若切片不含有限值则返回 `None`.
    #[inline]
    pub fn window(&self) -> Option<IntensityWindow> {
        IntensityWindow::from_values(self.iter().copied())
    }

    /// 按 min-max 归一化将切片量化为 8-bit 灰度图像.
    ///
    /// 像素 `(r, c)` 写在图像的第 `r` 行、第 `c` 列. 常值切片 (窗宽为零) 或不含有限值的切片
    /// 得到全黑图像; 非有限值像素同样映射为 0.
    #[inline]
    pub fn to_gray(&self) -> GrayImage {
        self.to_gray_with(self.window())
    }

    /// 同 [`Self::to_gray`], 但使用调用方已求得的窗口 (通常即 `self.window()`),
    /// 避免重复遍历切片. `window` 为 `None` 时得到全黑图像.
    pub fn to_gray_with(&self, window: Option<IntensityWindow>) -> GrayImage {
        let (height, width) = self.shape();
        let mut buf = GrayImage::new(width as u32, height as u32);
        let Some(window) = window else {
            return buf;
        };
        for ((r, c), &v) in self.indexed_iter() {
            let gray = window.eval(v).unwrap_or(BLACK);
            buf.put_pixel(c as u32, r as u32, Luma([gray]));
        }
        buf
    }
}

impl LabelSlice<'_> {
    /// 统计严格大于零的像素个数.
    #[inline]
    pub fn count_positive(&self) -> usize {
        self.iter().filter(|v| is_positive(**v)).count()
    }

    /// 该图是否为全背景图?
    #[inline]
    pub fn is_background(&self) -> bool {
        self.iter().all(|v| !is_nonzero(*v))
    }

    /// 二值化: 非零像素映射为 1.0, 其余为 0.0. 结果保持浮点类型.
    pub fn binarize(&self) -> Array2<f64> {
        self.data.mapv(|v| {
            if is_nonzero(v) {
                MASK_FOREGROUND
            } else {
                MASK_BACKGROUND
            }
        })
    }

    /// 将二值化结果渲染为黑白预览图: 前景为白色, 背景为黑色.
    pub fn to_preview(&self) -> GrayImage {
        let (height, width) = self.shape();
        let mut buf = GrayImage::new(width as u32, height as u32);
        for ((r, c), &v) in self.indexed_iter() {
            let gray = if is_nonzero(v) { WHITE } else { BLACK };
            buf.put_pixel(c as u32, r as u32, Luma([gray]));
        }
        buf
    }
}
