/// A start or end tag compiled for matching.
///
/// Literal text is compared ASCII case-insensitively and every whitespace run
/// in the tag matches zero or more whitespace characters in the document, so
/// `<!-- inject:js -->` also finds `<!--inject:js-->`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TagPattern {
	parts: Vec<TagPart>,
}

#[derive(Debug, Clone, PartialEq, Eq)]
enum TagPart {
	Literal(Vec<u8>),
	Whitespace,
}

impl TagPattern {
	pub fn new(tag: &str) -> Self {
		let mut parts = Vec::new();
		let mut literal = Vec::new();

		for byte in tag.bytes() {
			if byte.is_ascii_whitespace() {
				if !literal.is_empty() {
					parts.push(TagPart::Literal(std::mem::take(&mut literal)));
				}
				if parts.last() != Some(&TagPart::Whitespace) {
					parts.push(TagPart::Whitespace);
				}
			} else {
				literal.push(byte);
			}
		}

		if !literal.is_empty() {
			parts.push(TagPart::Literal(literal));
		}

		Self { parts }
	}

	/// A pattern without literal text would match everywhere and is never
	/// searched for.
	pub fn is_empty(&self) -> bool {
		!self
			.parts
			.iter()
			.any(|part| matches!(part, TagPart::Literal(_)))
	}

	/// Find the leftmost match at or after `from`. Returns the byte range.
	pub fn find(&self, haystack: &[u8], from: usize) -> Option<(usize, usize)> {
		if self.is_empty() {
			return None;
		}

		(from..haystack.len()).find_map(|at| self.match_at(haystack, at).map(|end| (at, end)))
	}

	fn match_at(&self, haystack: &[u8], at: usize) -> Option<usize> {
		let mut cursor = at;

		for part in &self.parts {
			match part {
				TagPart::Whitespace => {
					while haystack
						.get(cursor)
						.is_some_and(|byte| byte.is_ascii_whitespace())
					{
						cursor += 1;
					}
				}
				TagPart::Literal(literal) => {
					let end = cursor + literal.len();
					let candidate = haystack.get(cursor..end)?;
					if !candidate.eq_ignore_ascii_case(literal) {
						return None;
					}
					cursor = end;
				}
			}
		}

		Some(cursor)
	}
}

/// The location of one start/end marker pair.
///
/// `start_index <= start_line_end <= content_start <= content_end <= end_index`
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct MarkerMatch {
	/// Offset of the first byte of the start marker.
	pub start_index: usize,
	/// Offset just past the start marker.
	pub start_line_end: usize,
	/// Offset where the replaceable content begins.
	pub content_start: usize,
	/// Offset where the replaceable content ends (the end marker begins).
	pub content_end: usize,
	/// Offset just past the end marker.
	pub end_index: usize,
	/// Leading whitespace of the line holding the start marker.
	pub indentation: String,
	/// Line ending used after the start marker, `\n` unless the document uses
	/// `\r\n` there.
	pub line_ending: &'static str,
}

/// States of the marker scanner.
#[derive(Debug)]
enum ScanState {
	SearchingStart {
		from: usize,
	},
	FoundStart {
		start_index: usize,
		start_line_end: usize,
	},
	FoundEnd(MarkerMatch),
	NotFound,
}

/// Finds successive marker pairs in a document.
///
/// Each pair is the leftmost start marker followed by the nearest end marker.
/// Scanning resumes after the end marker, so pairs never overlap and the
/// total work stays proportional to the document length times the tag
/// length.
#[derive(Debug)]
pub struct MarkerScanner<'a> {
	text: &'a str,
	start: TagPattern,
	end: TagPattern,
	cursor: usize,
}

impl<'a> MarkerScanner<'a> {
	pub fn new(text: &'a str, start_tag: &str, end_tag: &str) -> Self {
		Self {
			text,
			start: TagPattern::new(start_tag),
			end: TagPattern::new(end_tag),
			cursor: 0,
		}
	}

	fn build_match(
		&self,
		start_index: usize,
		start_line_end: usize,
		end: (usize, usize),
	) -> MarkerMatch {
		MarkerMatch {
			start_index,
			start_line_end,
			content_start: start_line_end,
			content_end: end.0,
			end_index: end.1,
			indentation: indentation_at(self.text, start_index).to_string(),
			line_ending: line_ending_after(self.text, start_line_end),
		}
	}
}

impl Iterator for MarkerScanner<'_> {
	type Item = MarkerMatch;

	fn next(&mut self) -> Option<Self::Item> {
		let bytes = self.text.as_bytes();
		let mut state = ScanState::SearchingStart { from: self.cursor };

		loop {
			state = match state {
				ScanState::SearchingStart { from } => {
					match self.start.find(bytes, from) {
						Some((start_index, start_line_end)) => {
							ScanState::FoundStart {
								start_index,
								start_line_end,
							}
						}
						None => ScanState::NotFound,
					}
				}
				ScanState::FoundStart {
					start_index,
					start_line_end,
				} => {
					match self.end.find(bytes, start_line_end) {
						Some(end) => {
							ScanState::FoundEnd(self.build_match(start_index, start_line_end, end))
						}
						None => ScanState::NotFound,
					}
				}
				ScanState::FoundEnd(found) => {
					self.cursor = found.end_index;
					return Some(found);
				}
				ScanState::NotFound => {
					self.cursor = bytes.len();
					return None;
				}
			};
		}
	}
}

/// Locate the first marker pair in `text`.
pub fn locate(text: &str, start_tag: &str, end_tag: &str) -> Option<MarkerMatch> {
	MarkerScanner::new(text, start_tag, end_tag).next()
}

/// The spaces and tabs at the beginning of the line containing `offset`.
fn indentation_at(text: &str, offset: usize) -> &str {
	let line_start = text[..offset].rfind('\n').map_or(0, |index| index + 1);
	let line = &text[line_start..offset];
	let indent_len = line
		.bytes()
		.take_while(|byte| *byte == b' ' || *byte == b'\t')
		.count();
	&line[..indent_len]
}

fn line_ending_after(text: &str, offset: usize) -> &'static str {
	match text[offset..].find('\n') {
		Some(index) if text[..offset + index].ends_with('\r') => "\r\n",
		_ => "\n",
	}
}
