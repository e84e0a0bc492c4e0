pub mod analysis;
pub mod annotation;
pub mod augment;
pub mod consts;
pub mod error;

// Re-export commonly used types
pub use analysis::bbox::{Bbox, OverlapPolicy};
pub use annotation::{Annotation, LabeledBox};
pub use augment::pipeline::{AugmentConfig, Augmented, augment_image};
pub use error::CpaugError;
