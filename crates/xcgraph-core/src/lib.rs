//! xcgraph Core - Hexagonal Architecture Implementation
//!
//! This crate provides the domain and application layers for xcgraph, which
//! turns an already-parsed Xcode-style project description into a normalized,
//! strongly-typed project graph.
//!
//! ## Architecture Overview
//!
//! ```text
//! ┌─────────────────────────────────────────┐
//! │           xcgraph-cli (CLI)             │
//! │     (Implements Driving Ports)          │
//! └──────────────────┬──────────────────────┘
//!                    │ calls
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Application Services            │
//! │ (ProjectMapper, TargetMapper,           │
//! │  FileClassifier)                        │
//! └──────────────────┬──────────────────────┘
//!                    │ uses
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │      Application Ports (Traits)         │
//! │        (Driven: DirectoryLister)        │
//! └──────────────────┬──────────────────────┘
//!                    │ implemented by
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │    xcgraph-adapters (Infrastructure)    │
//! │ (LocalDirectoryLister, RawProjectLoader)│
//! └─────────────────────────────────────────┘
//!                    │
//!                    ▼
//! ┌─────────────────────────────────────────┐
//! │         Domain Layer (Pure Logic)       │
//! │ (Target, TargetDependency, Classifier   │
//! │  rules, ResourceSynthesizer)            │
//! └─────────────────────────────────────────┘
//! ```
//!
//! ## Usage
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use xcgraph_core::prelude::*;
//!
//! let classifier = FileClassifier::new(Box::new(lister), ClassificationOptions::default());
//! let mapper = ProjectMapper::new(TargetMapper::new(classifier));
//! let graph = mapper.map(&Arc::new(raw_project))?;
//! ```

pub mod application;
pub mod domain;
pub mod error;

// Public API - what external crates should use
pub mod prelude {
    pub use crate::application::{
        ApplicationError, Classification, ClassificationOptions, ClassifyScope, FileClassifier,
        ProjectHandle, ProjectMapper, TargetMapper,
        ports::{DirEntry, DirectoryLister, EntryKind},
    };
    pub use crate::domain::{
        Headers, InfoPlist, LinkingStatus, ProjectGraph, RawProject, RawTarget,
        ResourceSynthesizer, SourceFile, Target, TargetDependency, UnlistedHeaders,
    };
    pub use crate::error::{XcGraphError, XcGraphResult};
}

// Version info
pub const VERSION: &str = env!("CARGO_PKG_VERSION");
