use crate::InjectOptions;
use crate::SourceDescriptor;

/// Compute the path that appears in the injected reference for `source`.
///
/// The steps always run in the same order: the remembered query string is
/// split off, `ignore_path` is stripped (or the path is made relative to the
/// target's directory), the prefix is joined, the root slash is normalized,
/// the query and suffix are appended and finally the version hash.
pub fn transform_path(
	source: &SourceDescriptor,
	target_path: &str,
	options: &InjectOptions,
) -> String {
	let source_path = unixify(&source.path);

	let mut path = if options.relative {
		relative_path(parent_dir(&unixify(target_path)), &source_path)
	} else {
		remove_base_path(&options.ignore_path, &source_path)
	};

	if let Some(prefix) = &options.add_prefix {
		path = add_prefix(&path, prefix);
	}

	if !options.relative {
		if options.add_root_slash && !is_url(&path) {
			path = add_root_slash(&path);
		} else if options.add_prefix.is_none() {
			path = path.trim_start_matches('/').to_string();
		}
	}

	if let Some(query) = &source.raw_path_query {
		path.push('?');
		path.push_str(query);
	}

	if let Some(suffix) = &options.add_suffix {
		path.push_str(suffix);
	}

	if let Some(versioning) = &options.versioning {
		match &source.content {
			Some(content) => {
				let separator = if path.contains('?') { '&' } else { '?' };
				path.push(separator);
				path.push_str(&versioning.param_name);
				path.push('=');
				path.push_str(&versioning.hash.digest(content));
			}
			None if !options.quiet => {
				tracing::warn!(
					source = %source.path,
					"versioning requested but the source content was not read"
				);
			}
			None => {}
		}
	}

	path
}

/// Strip the first matching prefix from `path`. A prefix only matches at a
/// path component boundary and leading slashes are ignored on both sides.
/// Paths that match no prefix are returned unchanged.
pub fn remove_base_path(prefixes: &[String], path: &str) -> String {
	let bare = path.trim_start_matches('/');

	for prefix in prefixes {
		let prefix = unixify(prefix);
		let prefix = prefix.trim_matches('/');
		if prefix.is_empty() {
			continue;
		}

		let Some(rest) = bare.strip_prefix(prefix) else {
			continue;
		};

		if rest.is_empty() || rest.starts_with('/') {
			return format!("/{}", rest.trim_start_matches('/'));
		}
	}

	path.to_string()
}

/// Join `prefix` and `path` with exactly one `/` between them.
pub fn add_prefix(path: &str, prefix: &str) -> String {
	format!(
		"{}/{}",
		prefix.trim_end_matches('/'),
		path.trim_start_matches('/')
	)
}

pub fn add_root_slash(path: &str) -> String {
	format!("/{}", path.trim_start_matches('/'))
}

/// Lexical relative path from directory `from` to `to`.
pub fn relative_path(from: &str, to: &str) -> String {
	let from = normalize(from);
	let to = normalize(to);
	let common = from
		.iter()
		.zip(to.iter())
		.take_while(|(a, b)| a == b)
		.count();

	let mut parts: Vec<&str> = Vec::with_capacity(from.len() - common + to.len() - common);
	parts.extend(std::iter::repeat_n("..", from.len() - common));
	parts.extend(to[common..].iter().copied());

	if parts.is_empty() {
		".".to_string()
	} else {
		parts.join("/")
	}
}

/// Split a path into components, dropping `.` and resolving `..` where a
/// previous component exists.
fn normalize(path: &str) -> Vec<&str> {
	let mut parts: Vec<&str> = Vec::new();

	for part in path.split('/') {
		match part {
			"" | "." => {}
			".." => {
				if parts.last().is_some_and(|last| *last != "..") {
					parts.pop();
				} else {
					parts.push(part);
				}
			}
			_ => parts.push(part),
		}
	}

	parts
}

fn parent_dir(path: &str) -> &str {
	path.rfind('/').map_or("", |index| &path[..index])
}

/// A prefix such as `https://cdn.example.com` makes the path a URL, which
/// never gets a root slash.
fn is_url(path: &str) -> bool {
	path.split_once("://")
		.is_some_and(|(scheme, _)| !scheme.is_empty() && !scheme.contains('/'))
		|| path.starts_with("//")
}

fn unixify(path: &str) -> String {
	path.replace('\\', "/")
}
