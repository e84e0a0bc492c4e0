pub mod patch;
pub mod pipeline;
pub mod placement;
pub mod visual;
