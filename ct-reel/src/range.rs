//! 按前景体素个数选取需要导出的水平切片范围.

use crate::consts::PADDING_RANGE;
use rand::Rng;
use std::ops::Range;

/// 水平切片索引的左闭右开区间 `[start, end)`.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SliceRange {
    start: usize,
    end: usize,
}

impl SliceRange {
    /// 构建区间. 若 `start > end`, 则返回 `None`.
    pub fn new(start: usize, end: usize) -> Option<Self> {
        (start <= end).then_some(Self { start, end })
    }

    /// 区间起点 (包含).
    #[inline]
    pub fn start(&self) -> usize {
        self.start
    }

    /// 区间终点 (不包含).
    #[inline]
    pub fn end(&self) -> usize {
        self.end
    }

    /// 区间长度.
    #[inline]
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// 区间是否为空?
    #[inline]
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }

    /// 区间是否包含 `z_index`?
    #[inline]
    pub fn contains(&self, z_index: usize) -> bool {
        (self.start..self.end).contains(&z_index)
    }

    /// 按升序迭代 (导出序号, 切片索引). 导出序号从 0 开始.
    #[inline]
    pub fn serials(&self) -> impl ExactSizeIterator<Item = (usize, usize)> {
        (self.start..self.end).enumerate()
    }
}

impl From<SliceRange> for Range<usize> {
    #[inline]
    fn from(r: SliceRange) -> Self {
        r.start..r.end
    }
}

/// 裁剪模式.
#[derive(Copy, Clone, Debug, Eq, PartialEq)]
pub enum CropMode {
    /// 阈值非零: 区间恰好由达标切片的最小、最大索引界定.
    Tight,

    /// 阈值为零: 区间两端再分别随机外扩 `[5, 10)` 层.
    Padded,
}

impl CropMode {
    /// 由阈值决定裁剪模式.
    #[inline]
    pub fn from_threshold(threshold: i64) -> Self {
        if threshold == 0 {
            Self::Padded
        } else {
            Self::Tight
        }
    }
}

/// 收集前景个数严格大于 `threshold` 的切片索引, 结果升序.
pub fn qualifying_slices(counts: &[usize], threshold: i64) -> Vec<usize> {
    counts
        .iter()
        .enumerate()
        .filter_map(|(i, &c)| (c as i64 > threshold).then_some(i))
        .collect()
}

/// 切片范围选择器.
///
/// 选择器持有随机数生成器, 仅在 [`CropMode::Padded`] 模式下使用.
/// 每个体数据依次抽取下界、上界两个外扩量.
#[derive(Debug)]
pub struct RangeSelector<R> {
    threshold: i64,
    inclusive_upper: bool,
    rng: R,
}

impl<R: Rng> RangeSelector<R> {
    /// 初始化.
    ///
    /// `inclusive_upper` 为 `false` 时, 最后一个达标切片 **不会** 被导出
    /// (区间终点即为该切片索引); 为 `true` 时区间终点向后多取一层.
    pub fn new(threshold: i64, inclusive_upper: bool, rng: R) -> Self {
        Self {
            threshold,
            inclusive_upper,
            rng,
        }
    }

    /// 前景个数阈值.
    #[inline]
    pub fn threshold(&self) -> i64 {
        self.threshold
    }

    /// 当前裁剪模式.
    #[inline]
    pub fn mode(&self) -> CropMode {
        CropMode::from_threshold(self.threshold)
    }

    /// 由逐层前景个数 `counts` 计算导出区间. `counts.len()` 即为切片个数.
    ///
    /// 若没有任何切片达标, 则返回 `None`.
    pub fn select(&mut self, counts: &[usize]) -> Option<SliceRange> {
        let depth = counts.len();
        let qualifying = qualifying_slices(counts, self.threshold);
        let (&lo, &hi) = (qualifying.first()?, qualifying.last()?);
        let hi = if self.inclusive_upper { hi + 1 } else { hi };

        let (start, end) = match self.mode() {
            CropMode::Tight => (lo, hi.min(depth)),
            CropMode::Padded => {
                let below = self.rng.random_range(PADDING_RANGE);
                let above = self.rng.random_range(PADDING_RANGE);
                (lo.saturating_sub(below), (hi + above).min(depth))
            }
        };
        SliceRange::new(start, end)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rand::rngs::StdRng;
    use rand::SeedableRng;

    fn counts_with(depth: usize, hits: &[(usize, usize)]) -> Vec<usize> {
        let mut v = vec![0; depth];
        for &(i, c) in hits {
            v[i] = c;
        }
        v
    }

    fn tight(threshold: i64) -> RangeSelector<StdRng> {
        RangeSelector::new(threshold, false, StdRng::seed_from_u64(0))
    }

    #[test]
    fn test_qualifying_slices() {
        let counts = counts_with(8, &[(1, 10), (3, 300), (4, 257), (5, 1000), (6, 256)]);
        assert_eq!(qualifying_slices(&counts, 256), vec![3, 4, 5]);
        assert_eq!(qualifying_slices(&counts, 0), vec![1, 3, 4, 5, 6]);
        assert_eq!(qualifying_slices(&counts, -1).len(), 8);
        assert!(qualifying_slices(&counts, 5000).is_empty());
    }

    #[test]
    fn test_tight_excludes_last_qualifying_slice() {
        let counts = counts_with(10, &[(3, 300), (4, 300), (5, 300)]);
        let r = tight(256).select(&counts).unwrap();
        assert_eq!(r, SliceRange::new(3, 5).unwrap());
        assert_eq!(r.serials().collect::<Vec<_>>(), vec![(0, 3), (1, 4)]);
        assert!(!r.contains(5));
    }

    #[test]
    fn test_tight_inclusive_upper() {
        let counts = counts_with(6, &[(3, 300), (5, 300)]);
        let mut s = RangeSelector::new(256, true, StdRng::seed_from_u64(0));
        assert_eq!(s.select(&counts), SliceRange::new(3, 6));
    }

    #[test]
    fn test_tight_single_slice_is_empty() {
        let counts = counts_with(6, &[(2, 300)]);
        let r = tight(256).select(&counts).unwrap();
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
    }

    #[test]
    fn test_nothing_qualifies() {
        assert_eq!(tight(256).select(&counts_with(6, &[(2, 256)])), None);
        assert_eq!(tight(256).select(&[]), None);
    }

    #[test]
    fn test_padded_bounds() {
        let counts = counts_with(40, &[(12, 1), (20, 3)]);
        let mut s = RangeSelector::new(0, false, StdRng::seed_from_u64(7));
        assert_eq!(s.mode(), CropMode::Padded);
        for _ in 0..200 {
            let r = s.select(&counts).unwrap();
            assert!((12 - 9..=12 - 5).contains(&r.start()));
            assert!((20 + 5..=20 + 9).contains(&r.end()));
        }
    }

    #[test]
    fn test_padded_clamped_to_volume() {
        let counts = counts_with(8, &[(1, 1), (6, 1)]);
        let mut s = RangeSelector::new(0, false, StdRng::seed_from_u64(42));
        for _ in 0..200 {
            let r = s.select(&counts).unwrap();
            assert_eq!(r, SliceRange::new(0, 8).unwrap());
        }
    }

    #[test]
    fn test_padded_is_reproducible_with_seed() {
        let counts = counts_with(64, &[(30, 1), (33, 1)]);
        let mut a = RangeSelector::new(0, false, StdRng::seed_from_u64(2024));
        let mut b = RangeSelector::new(0, false, StdRng::seed_from_u64(2024));
        for _ in 0..20 {
            assert_eq!(a.select(&counts), b.select(&counts));
        }
    }

    #[test]
    fn test_padded_superset_of_tight() {
        let counts = counts_with(50, &[(20, 1), (25, 1)]);
        let mut s = RangeSelector::new(0, false, StdRng::seed_from_u64(1));
        for _ in 0..50 {
            let r = s.select(&counts).unwrap();
            assert!(r.start() <= 20 && r.end() >= 25);
        }
    }
}
