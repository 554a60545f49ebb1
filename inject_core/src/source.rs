use std::path::Path;

use crate::TargetKind;

/// A file whose reference is injected into targets.
///
/// Only the declared path matters to the engine. The content is needed when
/// versioning is enabled, since the hash query parameter is computed over it.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceDescriptor {
	/// The path without any query string.
	pub path: String,
	/// Lowercased extension without the leading dot.
	pub extension: String,
	/// A query string already present in the declared path, without the `?`.
	pub raw_path_query: Option<String>,
	/// The raw file content, if it was read.
	pub content: Option<Vec<u8>>,
}

impl SourceDescriptor {
	/// Create a descriptor from a declared path. A trailing `?query` is split
	/// off and remembered so that hashed file names survive injection.
	pub fn new(path: impl Into<String>) -> Self {
		let path = path.into();
		let (path, raw_path_query) = match path.split_once('?') {
			Some((path, query)) => (path.to_string(), Some(query.to_string())),
			None => (path, None),
		};
		let extension = extension_of(&path);

		Self {
			path,
			extension,
			raw_path_query,
			content: None,
		}
	}

	/// Attach the file content used for versioning.
	#[must_use]
	pub fn with_content(mut self, content: impl Into<Vec<u8>>) -> Self {
		self.content = Some(content.into());
		self
	}
}

/// A document that receives injected references.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TargetDocument {
	pub path: String,
	pub content: String,
	pub extension: String,
}

impl TargetDocument {
	pub fn new(path: impl Into<String>, content: impl Into<String>) -> Self {
		let path = path.into();
		let extension = extension_of(&path);

		Self {
			path,
			content: content.into(),
			extension,
		}
	}

	/// The document type selected by the extension.
	pub fn kind(&self) -> TargetKind {
		TargetKind::from_extension(&self.extension)
	}
}

/// Accumulates sources until the full list is known.
///
/// Injection needs every source before the first target is touched, so the
/// collector only hands out a [`SourceList`] once [`SourceCollector::finish`]
/// is called.
#[derive(Debug, Default)]
pub struct SourceCollector {
	sources: Vec<SourceDescriptor>,
}

impl SourceCollector {
	pub fn new() -> Self {
		Self::default()
	}

	pub fn push(&mut self, source: SourceDescriptor) {
		self.sources.push(source);
	}

	pub fn len(&self) -> usize {
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}

	/// Close the accumulation phase.
	pub fn finish(self) -> SourceList {
		SourceList {
			sources: self.sources,
		}
	}
}

impl Extend<SourceDescriptor> for SourceCollector {
	fn extend<T: IntoIterator<Item = SourceDescriptor>>(&mut self, iter: T) {
		self.sources.extend(iter);
	}
}

/// The complete, ordered set of sources replayed for every target.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SourceList {
	sources: Vec<SourceDescriptor>,
}

impl SourceList {
	pub fn iter(&self) -> std::slice::Iter<'_, SourceDescriptor> {
		self.sources.iter()
	}

	pub fn len(&self) -> usize {
		self.sources.len()
	}

	pub fn is_empty(&self) -> bool {
		self.sources.is_empty()
	}
}

impl FromIterator<SourceDescriptor> for SourceList {
	fn from_iter<T: IntoIterator<Item = SourceDescriptor>>(iter: T) -> Self {
		Self {
			sources: iter.into_iter().collect(),
		}
	}
}

impl<'a> IntoIterator for &'a SourceList {
	type IntoIter = std::slice::Iter<'a, SourceDescriptor>;
	type Item = &'a SourceDescriptor;

	fn into_iter(self) -> Self::IntoIter {
		self.iter()
	}
}

/// Lowercased extension of a path without the leading dot. A query string is
/// ignored.
pub fn extension_of(path: &str) -> String {
	let path = path.split_once('?').map_or(path, |(path, _)| path);
	Path::new(path)
		.extension()
		.and_then(|ext| ext.to_str())
		.unwrap_or("")
		.to_ascii_lowercase()
}
