pub mod discovery;
pub mod fonts;
pub mod labeler;
pub mod manifest;
pub mod overlay;
pub mod splitter;

pub use discovery::FileDiscovery;
pub use fonts::{FontResolver, LabelFont};
pub use labeler::PageLabeler;
pub use manifest::SplitManifest;
pub use overlay::{label_text, OverlayBuilder};
pub use splitter::ImageSplitter;
