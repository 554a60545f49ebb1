use crate::InjectOptions;
use crate::MarkerMatch;
use crate::MarkerScanner;
use crate::SourceDescriptor;
use crate::SourceList;
use crate::TargetDocument;
use crate::TargetKind;
use crate::default_line;
use crate::resolve_tag;
use crate::transform_path;

/// Sources that share one resolved start/end tag pair.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SourceGroup<'a> {
	pub start_tag: String,
	pub end_tag: String,
	pub sources: Vec<&'a SourceDescriptor>,
}

/// The outcome of injecting into one target.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Injection {
	/// The rewritten document content.
	pub content: String,
	/// Number of lines written between markers.
	pub injected: usize,
	/// Resolved start tags that were not found in the document.
	pub missing: Vec<String>,
}

impl Injection {
	pub fn is_changed(&self, original: &str) -> bool {
		self.content != original
	}
}

/// Injects a fixed list of sources into any number of targets.
///
/// The source list is complete before the injector exists, so every target
/// sees the same sources in the same order. Targets are independent of each
/// other.
#[derive(Debug, Clone)]
pub struct Injector {
	sources: SourceList,
	options: InjectOptions,
}

impl Injector {
	pub fn new(sources: SourceList, options: InjectOptions) -> Self {
		Self { sources, options }
	}

	pub fn sources(&self) -> &SourceList {
		&self.sources
	}

	pub fn options(&self) -> &InjectOptions {
		&self.options
	}

	/// Rewrite `target` and log a summary line unless `quiet` is set.
	pub fn inject(&self, mut target: TargetDocument) -> TargetDocument {
		let injection = self.compute(&target);

		if !self.options.quiet {
			for start_tag in &injection.missing {
				tracing::warn!(file = %target.path, start_tag = %start_tag, "marker not found");
			}
			tracing::info!(
				file = %target.path,
				count = injection.injected,
				"{} source(s) injected into {}",
				injection.injected,
				target.path
			);
		}

		target.content = injection.content;
		target
	}

	/// Rewrite every target in arrival order. No target is dropped, targets
	/// without markers pass through unchanged.
	pub fn inject_all<'a, I>(&'a self, targets: I) -> impl Iterator<Item = TargetDocument> + 'a
	where
		I: IntoIterator<Item = TargetDocument>,
		I::IntoIter: 'a,
	{
		targets.into_iter().map(move |target| self.inject(target))
	}

	/// Compute the injection for `target` without logging.
	pub fn compute(&self, target: &TargetDocument) -> Injection {
		let kind = target.kind();
		let mut content = target.content.clone();
		let mut injected = 0;
		let mut missing = Vec::new();

		for group in group_sources(&self.sources, kind, &self.options) {
			let matches: Vec<MarkerMatch> =
				MarkerScanner::new(&content, &group.start_tag, &group.end_tag).collect();

			if matches.is_empty() {
				missing.push(group.start_tag);
				continue;
			}

			if self.options.remove_tags {
				content = remove_regions(&content, &matches);
				continue;
			}

			let lines = compose_lines(&group, target, kind, &self.options);
			injected += lines.len();
			content = splice_regions(&content, &matches, &lines);
		}

		Injection {
			content,
			injected,
			missing,
		}
	}
}

/// Group sources by their resolved tag pair, keeping the order in which
/// groups are first seen and the source order within each group.
///
/// With the default tags this groups by extension. A custom tag without
/// `{{ext}}` puts every source into a single group.
pub fn group_sources<'a>(
	sources: &'a SourceList,
	kind: TargetKind,
	options: &InjectOptions,
) -> Vec<SourceGroup<'a>> {
	let start_template =
		non_blank(options.start_tag.as_deref()).unwrap_or(kind.default_start_tag());
	let end_template = non_blank(options.end_tag.as_deref()).unwrap_or(kind.default_end_tag());
	let mut groups: Vec<SourceGroup<'a>> = Vec::new();

	for source in sources {
		let start_tag = resolve_tag(start_template, &options.name, &source.extension);
		let end_tag = resolve_tag(end_template, &options.name, &source.extension);

		match groups
			.iter_mut()
			.find(|group| group.start_tag == start_tag && group.end_tag == end_tag)
		{
			Some(group) => group.sources.push(source),
			None => {
				groups.push(SourceGroup {
					start_tag,
					end_tag,
					sources: vec![source],
				});
			}
		}
	}

	groups
}

/// Format one line per source in `group`. Sources whose transform returns
/// nothing, or an empty string, are skipped.
pub fn compose_lines(
	group: &SourceGroup<'_>,
	target: &TargetDocument,
	kind: TargetKind,
	options: &InjectOptions,
) -> Vec<String> {
	let length = group.sources.len();

	group
		.sources
		.iter()
		.enumerate()
		.filter_map(|(index, source)| {
			let path = transform_path(source, &target.path, options);
			let line = match &options.transform {
				Some(transform) => transform.format(&path, source, index, length, target),
				None => {
					Some(default_line(
						kind,
						&path,
						source,
						index,
						length,
						options.self_closing_tag,
					))
				}
			};

			match line {
				Some(line) if !line.is_empty() => Some(line),
				_ => {
					tracing::debug!(source = %source.path, "transform produced no line");
					None
				}
			}
		})
		.collect()
}

/// Build the text placed between a start and end marker: every line on its
/// own line at the marker's indentation, followed by a line break before the
/// end marker.
pub fn compose_block(lines: &[String], marker: &MarkerMatch) -> String {
	let separator = format!("{}{}", marker.line_ending, marker.indentation);
	let capacity = lines
		.iter()
		.map(|line| line.len() + separator.len())
		.sum::<usize>();
	let mut block = String::with_capacity(capacity + separator.len());

	for line in lines {
		block.push_str(&separator);
		block.push_str(line);
	}

	block.push_str(&separator);
	block
}

/// Replace the content of a single marker region.
pub fn splice(text: &str, marker: &MarkerMatch, block: &str) -> String {
	let mut result = String::with_capacity(
		text.len() - (marker.content_end - marker.content_start) + block.len(),
	);
	result.push_str(&text[..marker.content_start]);
	result.push_str(block);
	result.push_str(&text[marker.content_end..]);
	result
}

/// Delete a marker region together with both markers.
///
/// When a marker sits alone on its line the whole line goes, including one
/// line break, so no blank line is left behind.
pub fn remove_region(text: &str, marker: &MarkerMatch) -> String {
	let (cut_start, cut_end) = removal_range(text, marker);
	let mut result = String::with_capacity(text.len() - (cut_end - cut_start));
	result.push_str(&text[..cut_start]);
	result.push_str(&text[cut_end..]);
	result
}

/// Fill every region. Regions are rewritten back to front so the offsets of
/// earlier matches stay valid.
fn splice_regions(text: &str, matches: &[MarkerMatch], lines: &[String]) -> String {
	matches.iter().rev().fold(text.to_string(), |text, marker| {
		splice(&text, marker, &compose_block(lines, marker))
	})
}

fn remove_regions(text: &str, matches: &[MarkerMatch]) -> String {
	matches
		.iter()
		.rev()
		.fold(text.to_string(), |text, marker| remove_region(&text, marker))
}

fn removal_range(text: &str, marker: &MarkerMatch) -> (usize, usize) {
	let line_start = text[..marker.start_index].rfind('\n').map_or(0, |index| index + 1);
	let alone_before = text[line_start..marker.start_index]
		.bytes()
		.all(|byte| byte == b' ' || byte == b'\t');

	if !alone_before {
		return (marker.start_index, marker.end_index);
	}

	let rest = &text[marker.end_index..];
	let trailing = rest
		.bytes()
		.take_while(|byte| *byte == b' ' || *byte == b'\t')
		.count();
	let after = &rest[trailing..];

	if let Some(stripped) = after.strip_prefix("\r\n").or_else(|| after.strip_prefix('\n')) {
		let cut_end = text.len() - stripped.len();
		(line_start, cut_end)
	} else if after.is_empty() {
		(line_start, text.len())
	} else {
		(marker.start_index, marker.end_index)
	}
}

fn non_blank(value: Option<&str>) -> Option<&str> {
	value.filter(|value| !value.trim().is_empty())
}
