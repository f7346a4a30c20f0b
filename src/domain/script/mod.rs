pub mod segmenter;
pub mod speaker;

pub use segmenter::{segment, segment_with_diagnostics, Segment, Segmentation};
pub use speaker::Speaker;
