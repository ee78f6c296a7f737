//! Line-level structure shared by the exporters: classification, styled runs and
//! markdown stripping.

pub mod classifier;
pub mod normalize;
pub mod runs;

pub use classifier::{HeadingPolicy, LineClassifier, LineKind};
pub use normalize::strip_markdown;
pub use runs::{parse_runs, RunStyle, StyledRun};
