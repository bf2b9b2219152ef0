//! 涵盖了本 crate 一系列常用的功能.

pub use crate::{Idx2d, Idx3d};

pub use crate::data::{
    CtLabel, CtScan, ImgWriteVis, IntensityWindow, LabelSlice, MaskWriteNpy, ScanSlice,
    VolumeAttr, VolumePair,
};

pub use crate::config::Config;
pub use crate::dataset::{discover, expand_home, Discovered, VolumeEntry};
pub use crate::error::{Error, Result};
pub use crate::export::{run, RunSummary};
pub use crate::range::{CropMode, RangeSelector, SliceRange};
