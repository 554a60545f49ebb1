use crate::SourceDescriptor;
use crate::TargetDocument;

/// Placeholder replaced with the marker name.
pub const NAME_PLACEHOLDER: &str = "{{name}}";
/// Placeholder replaced with the extension of the injected source group.
pub const EXT_PLACEHOLDER: &str = "{{ext}}";

/// Formats one injected line.
///
/// Receives the transformed path, the source it came from, its index within
/// its group, the group length and the target being written. Returning `None`
/// emits nothing for that source.
///
/// The target lets one transform serve several document types, for example
/// by delegating to [`default_line`] with [`TargetDocument::kind`].
pub trait FormatLine: Send + Sync {
	fn format(
		&self,
		path: &str,
		source: &SourceDescriptor,
		index: usize,
		length: usize,
		target: &TargetDocument,
	) -> Option<String>;
}

impl<F> FormatLine for F
where
	F: Fn(&str, &SourceDescriptor, usize, usize, &TargetDocument) -> Option<String> + Send + Sync,
{
	fn format(
		&self,
		path: &str,
		source: &SourceDescriptor,
		index: usize,
		length: usize,
		target: &TargetDocument,
	) -> Option<String> {
		self(path, source, index, length, target)
	}
}

/// The document type of a target, which decides the default marker syntax
/// and the built-in line templates.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TargetKind {
	Html,
	Jsx,
	Jade,
	Slm,
	Haml,
	Less,
	Sass,
	Scss,
	Json,
}

impl TargetKind {
	/// Map a target extension to its kind. Unknown extensions are treated as
	/// html.
	pub fn from_extension(extension: &str) -> Self {
		match extension.to_ascii_lowercase().as_str() {
			"jsx" | "tsx" => Self::Jsx,
			"jade" | "pug" => Self::Jade,
			"slm" => Self::Slm,
			"haml" => Self::Haml,
			"less" => Self::Less,
			"sass" => Self::Sass,
			"scss" => Self::Scss,
			"json" => Self::Json,
			_ => Self::Html,
		}
	}

	pub fn default_start_tag(self) -> &'static str {
		match self {
			Self::Html => "<!-- {{name}}:{{ext}} -->",
			Self::Jsx => "{/* {{name}}:{{ext}} */}",
			Self::Jade => "//- {{name}}:{{ext}}",
			Self::Slm => "/ {{name}}:{{ext}}",
			Self::Haml => "-# {{name}}:{{ext}}",
			Self::Less | Self::Scss => "/* {{name}}:{{ext}} */",
			Self::Sass => "// {{name}}:{{ext}}",
			Self::Json => "\"{{name}}:{{ext}}\": [",
		}
	}

	pub fn default_end_tag(self) -> &'static str {
		match self {
			Self::Html => "<!-- endinject -->",
			Self::Jsx => "{/* endinject */}",
			Self::Jade => "//- endinject",
			Self::Slm => "/ endinject",
			Self::Haml => "-# endinject",
			Self::Less | Self::Scss => "/* endinject */",
			Self::Sass => "// endinject",
			Self::Json => "]",
		}
	}

	/// Wrap a path in this document type's comment syntax. Used for sources
	/// without a dedicated template.
	fn comment(self, path: &str) -> String {
		match self {
			Self::Html => format!("<!-- {path} -->"),
			Self::Jsx => format!("{{/* {path} */}}"),
			Self::Jade => format!("//- {path}"),
			Self::Slm => format!("/ {path}"),
			Self::Haml => format!("-# {path}"),
			Self::Less | Self::Scss => format!("/* {path} */"),
			Self::Sass => format!("// {path}"),
			Self::Json => format!("\"{path}\""),
		}
	}
}

/// The kind of an injected source, derived from its extension.
#[derive(Debug, Clone, PartialEq, Eq, Hash)]
pub enum SourceKind {
	Css,
	Js,
	Jsx,
	Coffee,
	Html,
	Image,
	Less,
	Sass,
	Scss,
	Other(String),
}

impl SourceKind {
	pub fn from_extension(extension: &str) -> Self {
		let extension = extension.to_ascii_lowercase();
		match extension.as_str() {
			"css" => Self::Css,
			"js" | "mjs" | "cjs" => Self::Js,
			"jsx" => Self::Jsx,
			"coffee" => Self::Coffee,
			"html" | "htm" => Self::Html,
			"png" | "jpg" | "jpeg" | "gif" | "svg" | "webp" | "ico" => Self::Image,
			"less" => Self::Less,
			"sass" => Self::Sass,
			"scss" => Self::Scss,
			_ => Self::Other(extension),
		}
	}
}

/// Substitute `{{name}}` and `{{ext}}` in a tag template.
pub fn resolve_tag(template: &str, name: &str, extension: &str) -> String {
	template
		.replace(NAME_PLACEHOLDER, name)
		.replace(EXT_PLACEHOLDER, extension)
}

/// The built-in line for a source in a target of the given kind.
///
/// This is what runs when no transform is configured, and it can be called
/// from a transform that only wants to decorate the path.
pub fn default_line(
	target: TargetKind,
	path: &str,
	source: &SourceDescriptor,
	index: usize,
	length: usize,
	self_closing: bool,
) -> String {
	let kind = SourceKind::from_extension(&source.extension);

	match target {
		TargetKind::Html | TargetKind::Jsx => {
			let end = if self_closing || target == TargetKind::Jsx {
				" />"
			} else {
				">"
			};
			match kind {
				SourceKind::Css => format!("<link rel=\"stylesheet\" href=\"{path}\"{end}"),
				SourceKind::Js => format!("<script src=\"{path}\"></script>"),
				SourceKind::Jsx => format!("<script type=\"text/jsx\" src=\"{path}\"></script>"),
				SourceKind::Coffee => {
					format!("<script type=\"text/coffeescript\" src=\"{path}\"></script>")
				}
				SourceKind::Html => format!("<link rel=\"import\" href=\"{path}\"{end}"),
				SourceKind::Image => format!("<img src=\"{path}\"{end}"),
				_ => target.comment(path),
			}
		}
		TargetKind::Jade => {
			match kind {
				SourceKind::Css => format!("link(rel=\"stylesheet\", href=\"{path}\")"),
				SourceKind::Js => format!("script(src=\"{path}\")"),
				SourceKind::Jsx => format!("script(type=\"text/jsx\", src=\"{path}\")"),
				SourceKind::Coffee => format!("script(type=\"text/coffeescript\", src=\"{path}\")"),
				SourceKind::Html => format!("link(rel=\"import\", href=\"{path}\")"),
				SourceKind::Image => format!("img(src=\"{path}\")"),
				_ => target.comment(path),
			}
		}
		TargetKind::Slm => {
			match kind {
				SourceKind::Css => format!("link rel=\"stylesheet\" href=\"{path}\""),
				SourceKind::Js => format!("script src=\"{path}\""),
				SourceKind::Jsx => format!("script type=\"text/jsx\" src=\"{path}\""),
				SourceKind::Coffee => format!("script type=\"text/coffeescript\" src=\"{path}\""),
				SourceKind::Html => format!("link rel=\"import\" href=\"{path}\""),
				SourceKind::Image => format!("img src=\"{path}\""),
				_ => target.comment(path),
			}
		}
		TargetKind::Haml => {
			match kind {
				SourceKind::Css => format!("%link{{rel:\"stylesheet\", href:\"{path}\"}}"),
				SourceKind::Js => format!("%script{{src:\"{path}\"}}"),
				SourceKind::Jsx => format!("%script{{type:\"text/jsx\", src:\"{path}\"}}"),
				SourceKind::Coffee => {
					format!("%script{{type:\"text/coffeescript\", src:\"{path}\"}}")
				}
				SourceKind::Html => format!("%link{{rel:\"import\", href:\"{path}\"}}"),
				SourceKind::Image => format!("%img{{src:\"{path}\"}}"),
				_ => target.comment(path),
			}
		}
		TargetKind::Less => {
			match kind {
				SourceKind::Css | SourceKind::Less => format!("@import \"{path}\";"),
				_ => target.comment(path),
			}
		}
		TargetKind::Scss => {
			match kind {
				SourceKind::Css | SourceKind::Scss | SourceKind::Sass => {
					format!("@import \"{path}\";")
				}
				_ => target.comment(path),
			}
		}
		TargetKind::Sass => {
			match kind {
				SourceKind::Css | SourceKind::Scss | SourceKind::Sass => {
					format!("@import \"{path}\"")
				}
				_ => target.comment(path),
			}
		}
		TargetKind::Json => {
			let separator = if index + 1 < length { "," } else { "" };
			format!("\"{path}\"{separator}")
		}
	}
}
