use std::path::Path;

use crate::InjectOptions;
use crate::Injector;
use crate::SourceDescriptor;
use crate::SourceList;
use crate::TargetDocument;

pub const APP_JS: &str = "console.log(\"app\");\n";
pub const APP_JS_SHA256: &str = "6f4c113f597494422a7a98c570a40307c74039f30cf5d7cb7bcfa1b5ed50c178";

pub fn source_list(paths: &[&str]) -> SourceList {
	paths.iter().copied().map(SourceDescriptor::new).collect()
}

pub fn injector(paths: &[&str], options: InjectOptions) -> Injector {
	Injector::new(source_list(paths), options)
}

/// Inject `paths` into a document at `target_path` and return the content.
pub fn inject_into(target_path: &str, content: &str, paths: &[&str], options: InjectOptions) -> String {
	injector(paths, options)
		.inject(TargetDocument::new(target_path, content))
		.content
}

pub fn inject_html(content: &str, paths: &[&str], options: InjectOptions) -> String {
	inject_into("index.html", content, paths, options)
}

pub fn named(name: &str) -> InjectOptions {
	InjectOptions {
		name: name.to_string(),
		..InjectOptions::default()
	}
}

pub fn quiet() -> InjectOptions {
	InjectOptions {
		quiet: true,
		..InjectOptions::default()
	}
}

pub fn html_page() -> &'static str {
	concat!(
		"<!DOCTYPE html>\n",
		"<html>\n",
		"<head>\n",
		"\t<!-- inject:css -->\n",
		"\t<!-- endinject -->\n",
		"</head>\n",
		"<body>\n",
		"\t<!-- inject:js -->\n",
		"\t<!-- endinject -->\n",
		"</body>\n",
		"</html>\n",
	)
}

pub fn write_file(root: &Path, relative: &str, content: &str) {
	let path = root.join(relative);
	if let Some(parent) = path.parent() {
		std::fs::create_dir_all(parent).unwrap_or_else(|e| panic!("create dir: {e}"));
	}
	std::fs::write(path, content).unwrap_or_else(|e| panic!("write: {e}"));
}

pub fn read_file(root: &Path, relative: &str) -> String {
	std::fs::read_to_string(root.join(relative)).unwrap_or_else(|e| panic!("read: {e}"))
}
