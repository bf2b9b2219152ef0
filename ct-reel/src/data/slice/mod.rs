//! CT scan/label 切片对象的操作.

mod core;
mod save;

pub use self::core::{LabelSlice, ScanSlice};

pub use save::{ImgWriteVis, MaskWriteNpy};
