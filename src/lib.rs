//! codeweave - a static-analysis substrate
//!
//! Source trees are scanned into a hierarchical entity model
//! (project, packages, files, types, methods) held in a [`SourceIndex`],
//! with typed dependency edges between entities in a [`DependencyGraph`].
//! Visitors attach raw measures during the scan and a [`TreeDecorator`]
//! aggregates them bottom-up afterwards.
//!
//! [`AnalysisEngine`] ties the index and graph together; [`Scanner`] drives
//! a parser and visitors over a file list.
//!
//! [`SourceIndex`]: index::SourceIndex
//! [`DependencyGraph`]: graph::DependencyGraph
//! [`TreeDecorator`]: metrics::TreeDecorator
//! [`AnalysisEngine`]: engine::AnalysisEngine
//! [`Scanner`]: scanner::Scanner

pub mod config;
pub mod engine;
pub mod error;
pub mod graph;
pub mod index;
pub mod metrics;
pub mod model;
pub mod parsers;
pub mod recognizer;
pub mod scanner;
pub mod text;
pub mod visitors;

pub use engine::AnalysisEngine;
pub use error::{EngineError, EngineResult, ParseError};
