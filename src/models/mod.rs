//! Source and quality models shared by the proxy resolver and the quality selector

pub mod quality;
pub mod source;

pub use quality::QualityLabel;
pub use source::{Headers, SourceDescriptor, SourceKind, StreamVariant};
