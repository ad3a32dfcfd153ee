pub mod descriptor;
pub mod image;
pub mod index;
pub mod searcher;

pub use descriptor::ColorDescriptor;
pub use image::Image;
pub use searcher::{Neighbor, Searcher};
