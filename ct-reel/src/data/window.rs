use itertools::{Itertools, MinMaxResult};

/// 线性灰度窗口, 包含下限与上限. 用于把任意强度值映射为 8-bit 灰度值.
///
/// 该窗口是只读的. 若要修改窗口参数, 你应该创建新的实例.
#[derive(Copy, Clone, Debug, PartialEq)]
pub struct IntensityWindow {
    lower: f64,
    upper: f64,
}

impl IntensityWindow {
    /// 构建窗口.
    ///
    /// `lower` 和 `upper` 必须有限, 且 `lower <= upper`, 否则返回 `None`.
    pub fn new(lower: f64, upper: f64) -> Option<IntensityWindow> {
        if lower.is_finite() && upper.is_finite() && lower <= upper {
            Some(Self { lower, upper })
        } else {
            None
        }
    }

    /// 以 `it` 中所有有限值的最小值和最大值构建窗口 (min-max 归一化).
    ///
    /// 如果 `it` 不含任何有限值, 则返回 `None`.
    pub fn from_values<I: IntoIterator<Item = f64>>(it: I) -> Option<IntensityWindow> {
        match it.into_iter().filter(|v| v.is_finite()).minmax() {
            MinMaxResult::NoElements => None,
            MinMaxResult::OneElement(v) => Some(Self { lower: v, upper: v }),
            MinMaxResult::MinMax(lower, upper) => Some(Self { lower, upper }),
        }
    }

    /// 窗下限.
    #[inline]
    pub fn lower_bound(&self) -> f64 {
        self.lower
    }

    /// 窗上限.
    #[inline]
    pub fn upper_bound(&self) -> f64 {
        self.upper
    }

    /// 窗宽.
    #[inline]
    pub fn width(&self) -> f64 {
        self.upper - self.lower
    }

    /// 窗宽是否为零? 此时所有值都映射为 0.
    #[inline]
    pub fn is_degenerate(&self) -> bool {
        self.width() == 0.0
    }

    /// 求 `v` 对应的灰度图像素整数值 (0 <= value <= 255). 小数部分直接截断.
    ///
    /// 如果 `v` 无意义 (如 inf, NaN), 则返回 `None`.
    pub fn eval(&self, v: f64) -> Option<u8> {
        self.eval_f64(v).map(|g| g as u8)
    }

    /// 求 `v` 对应的灰度图像素分布点 (0.0 <= value <= 255.0).
    ///
    /// 如果 `v` 无意义 (如 inf, NaN), 则返回 `None`.
    pub fn eval_f64(&self, v: f64) -> Option<f64> {
        if !v.is_finite() {
            return None;
        }
        if self.is_degenerate() || v <= self.lower {
            Some(0.0)
        } else if v >= self.upper {
            Some(255.0)
        } else {
            // 255, not 256.
            Some((v - self.lower) / self.width() * 255.0)
        }
    }
}

#[cfg(test)]
mod tests {
    use super::IntensityWindow;

    fn float_eq(a: f64, b: f64) -> bool {
        (a - b).abs() < 1e-9
    }

    #[test]
    fn test_window_invalid_input() {
        assert!(IntensityWindow::new(1.0, 0.0).is_none());
        assert!(IntensityWindow::new(f64::NAN, 0.0).is_none());
        assert!(IntensityWindow::new(0.0, f64::INFINITY).is_none());
        assert!(IntensityWindow::new(3.0, 3.0).is_some());
    }

    #[test]
    fn test_window_from_values() {
        let w = IntensityWindow::from_values([3.0, -1.0, f64::NAN, 7.0, f64::NEG_INFINITY]).unwrap();
        assert_eq!(w.lower_bound(), -1.0);
        assert_eq!(w.upper_bound(), 7.0);

        assert!(IntensityWindow::from_values(std::iter::empty()).is_none());
        assert!(IntensityWindow::from_values([f64::NAN]).is_none());
        assert!(IntensityWindow::from_values([2.0]).unwrap().is_degenerate());
    }

    #[test]
    fn test_window_generic() {
        // [-100, 300]
        let w = IntensityWindow::new(-100.0, 300.0).unwrap();
        assert_eq!(w.eval(f64::NAN), None);
        assert_eq!(w.eval(f64::INFINITY), None);

        assert_eq!(w.eval(-100.0), Some(0));
        assert_eq!(w.eval(300.0), Some(255));
        assert_eq!(w.eval(-1e9), Some(0));
        assert_eq!(w.eval(1e9), Some(255));

        assert_eq!(w.eval(0.0).unwrap(), (255.0 * 0.25) as u8);
        assert!(float_eq(w.eval_f64(100.0).unwrap(), 255.0 * 0.5));

        // 截断而非四舍五入.
        assert_eq!(w.eval(299.9), Some(254));
        assert!(w.eval_f64(299.9).unwrap() > 254.0);
    }

    #[test]
    fn test_window_degenerate() {
        let w = IntensityWindow::new(5.0, 5.0).unwrap();
        assert_eq!(w.eval(5.0), Some(0));
        assert_eq!(w.eval(6.0), Some(0));
    }
}
