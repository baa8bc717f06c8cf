//! CMS article to Hugo Markdown conversion and the document gate.

pub mod fragment;
pub mod front_matter;
pub mod html;
pub mod slug;
pub mod transformer;
pub mod validator;

pub use front_matter::FrontMatter;
pub use transformer::transform;
pub use validator::{ContentValidator, ValidationResult};
