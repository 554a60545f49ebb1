//! `inject_core` is the core library for the `inject` tool. It rewrites
//! target documents (HTML, templates, stylesheets, JSON) so that the region
//! between a start marker and an end marker lists references to a set of
//! source files, one line per source.
//!
//! ## Processing Pipeline
//!
//! ```text
//! inject.toml
//!   -> Config (validates every [[inject]] section up front)
//!   -> Project (resolves source and target globs, reads content for versioning)
//!   -> Source collector (the full ordered source list is known before any target)
//!   -> Injector (groups sources by tag pair, transforms paths, splices regions)
//! ```
//!
//! ## Modules
//!
//! - [`config`]: Loading `inject.toml` and validating injector options.
//! - [`project`]: Glob resolution, chaining sections per target, check and update.
//! - [`marker`]: Case and whitespace tolerant start/end marker scanning.
//!
//! ## Key Types
//!
//! - [`Injector`]: Injects a complete [`SourceList`] into any number of targets.
//! - [`InjectOptions`]: Marker name, path rewriting, versioning and tag overrides.
//! - [`FormatLine`]: Custom line formatting, with [`default_line`] as the built-in.
//! - [`ProjectContext`]: A project with every injector resolved.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use inject_core::InjectOptions;
//! use inject_core::Injector;
//! use inject_core::SourceDescriptor;
//! use inject_core::SourceList;
//! use inject_core::TargetDocument;
//!
//! let sources: SourceList = ["lib/app.js", "styles/site.css"]
//! 	.into_iter()
//! 	.map(SourceDescriptor::new)
//! 	.collect();
//! let injector = Injector::new(sources, InjectOptions::default());
//!
//! let html = "<head>\n<!-- inject:css -->\n<!-- endinject -->\n</head>\n";
//! let output = injector.inject(TargetDocument::new("index.html", html));
//! println!("{}", output.content);
//! ```

pub use config::*;
pub use engine::*;
pub use error::*;
pub use marker::*;
pub use path::*;
pub use project::*;
pub use source::*;
pub use tags::*;

pub mod config;
mod engine;
#[allow(unused_assignments)]
mod error;
pub mod marker;
mod path;
pub mod project;
mod source;
mod tags;

#[cfg(test)]
mod __fixtures;
