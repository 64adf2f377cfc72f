//! Markdown processing for the preview
//!
//! - `diagram`: fenced block scanning and diagram container substitution
//! - `convert`: the converter seam and its comrak implementation
//! - `toc`: `[TOC]` marker expansion
//! - `syntax`: syntect theme lookup for highlighted code blocks

pub mod convert;
pub mod diagram;
pub mod syntax;
pub mod toc;

pub use convert::{ComrakConverter, ConversionError, ConvertOptions, MarkdownConverter};
pub use diagram::{extract_diagram_blocks, fenced_blocks, DiagramBlock, DiagramExtraction};
