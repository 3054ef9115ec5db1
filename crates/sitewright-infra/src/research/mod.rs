//! Reference-website research adapters.

pub mod html;

pub use html::HtmlResearcher;
