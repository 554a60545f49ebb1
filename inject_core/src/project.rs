use std::collections::BTreeMap;
use std::collections::HashSet;
use std::path::Path;
use std::path::PathBuf;

use globset::GlobBuilder;
use globset::GlobMatcher;
use globset::GlobSet;
use globset::GlobSetBuilder;
use ignore::gitignore::Gitignore;
use ignore::gitignore::GitignoreBuilder;

use crate::InjectConfig;
use crate::InjectError;
use crate::InjectResult;
use crate::InjectTask;
use crate::Injector;
use crate::SourceCollector;
use crate::SourceDescriptor;
use crate::TargetDocument;

/// A validated `[[inject]]` section with its globs resolved to files.
#[derive(Debug, Clone)]
pub struct ResolvedTask {
	/// Target paths relative to the project root, in resolution order.
	pub targets: Vec<String>,
	pub injector: Injector,
}

/// A project with every injector ready to run.
#[derive(Debug)]
pub struct ProjectContext {
	pub root: PathBuf,
	/// Path of the config file the tasks were loaded from.
	pub config_path: Option<PathBuf>,
	pub tasks: Vec<ResolvedTask>,
}

/// A target whose content differs from what injection would produce.
#[derive(Debug)]
pub struct StaleTarget {
	pub file: PathBuf,
	pub current_content: String,
	pub expected_content: String,
}

/// Result of checking a project for stale targets.
#[derive(Debug)]
pub struct CheckResult {
	pub stale: Vec<StaleTarget>,
	/// Number of distinct targets that were checked.
	pub target_count: usize,
}

impl CheckResult {
	/// Returns true if every target is up to date.
	pub fn is_ok(&self) -> bool {
		self.stale.is_empty()
	}
}

/// Result of updating a project.
#[derive(Debug)]
pub struct UpdateResult {
	/// Files that were modified and their new content.
	pub updated_files: BTreeMap<PathBuf, String>,
	/// Number of distinct targets that were processed.
	pub target_count: usize,
}

/// Load `inject.toml` from `root` and resolve every section. A project
/// without a config file has no tasks.
pub fn scan_project(root: &Path) -> InjectResult<ProjectContext> {
	let config_path = InjectConfig::resolve_path(root);
	let config = InjectConfig::load(root)?.unwrap_or_default();
	let mut ctx = scan_project_with_config(root, config)?;
	ctx.config_path = config_path;
	Ok(ctx)
}

/// Resolve every section of an already loaded config. All sections are
/// validated before any file is read.
pub fn scan_project_with_config(root: &Path, config: InjectConfig) -> InjectResult<ProjectContext> {
	let disable_gitignore = config.disable_gitignore;
	let tasks = config.tasks()?;
	let files = collect_files(root, disable_gitignore)?;
	let mut resolved = Vec::with_capacity(tasks.len());

	for task in tasks {
		resolved.push(resolve_task(root, &files, task)?);
	}

	Ok(ProjectContext {
		root: root.to_path_buf(),
		config_path: None,
		tasks: resolved,
	})
}

fn resolve_task(root: &Path, files: &[String], task: InjectTask) -> InjectResult<ResolvedTask> {
	let source_paths = resolve_patterns(root, files, &task.sources)?;
	let targets = resolve_patterns(root, files, &task.targets)?;
	let read_content = task.options.versioning.is_some();

	let mut collector = SourceCollector::new();
	for path in source_paths {
		let mut source = SourceDescriptor::new(path.as_str());
		if read_content {
			let content = std::fs::read(root.join(&source.path)).map_err(|e| {
				InjectError::SourceRead {
					path: source.path.clone(),
					reason: e.to_string(),
				}
			})?;
			source = source.with_content(content);
		}
		collector.push(source);
	}

	tracing::debug!(
		sources = collector.len(),
		targets = targets.len(),
		name = %task.options.name,
		"resolved inject section"
	);

	Ok(ResolvedTask {
		targets,
		injector: Injector::new(collector.finish(), task.options),
	})
}

/// Check whether every target is up to date without writing anything.
pub fn check_project(ctx: &ProjectContext) -> InjectResult<CheckResult> {
	let states = run_tasks(ctx)?;
	let target_count = states.len();
	let stale = states
		.into_iter()
		.filter(|(_, state)| state.original != state.current)
		.map(|(file, state)| {
			StaleTarget {
				file,
				current_content: state.original,
				expected_content: state.current,
			}
		})
		.collect();

	Ok(CheckResult {
		stale,
		target_count,
	})
}

/// Compute the new contents of every target that changes.
pub fn compute_updates(ctx: &ProjectContext) -> InjectResult<UpdateResult> {
	let states = run_tasks(ctx)?;
	let target_count = states.len();
	let updated_files = states
		.into_iter()
		.filter(|(_, state)| state.original != state.current)
		.map(|(file, state)| (file, state.current))
		.collect();

	Ok(UpdateResult {
		updated_files,
		target_count,
	})
}

/// Write the updated contents back to disk.
pub fn write_updates(updates: &UpdateResult) -> InjectResult<()> {
	for (path, content) in &updates.updated_files {
		std::fs::write(path, content)?;
	}
	Ok(())
}

struct TargetState {
	original: String,
	current: String,
}

/// Run the sections in order. A target listed by several sections receives
/// each injection in turn, so sections with different names chain.
fn run_tasks(ctx: &ProjectContext) -> InjectResult<BTreeMap<PathBuf, TargetState>> {
	let mut states: BTreeMap<PathBuf, TargetState> = BTreeMap::new();

	for task in &ctx.tasks {
		for target in &task.targets {
			let file = ctx.root.join(target);
			if !states.contains_key(&file) {
				let original = std::fs::read_to_string(&file)?;
				states.insert(
					file.clone(),
					TargetState {
						current: original.clone(),
						original,
					},
				);
			}

			let Some(state) = states.get_mut(&file) else {
				continue;
			};
			let document = TargetDocument::new(target.as_str(), std::mem::take(&mut state.current));
			state.current = task.injector.inject(document).content;
		}
	}

	Ok(states)
}

/// Resolve glob patterns to root-relative paths.
///
/// Patterns are applied in order and the matches of each pattern are sorted,
/// so the result order follows the config. Patterns starting with `!`
/// exclude. A pattern without glob syntax that names an existing file is
/// used verbatim, which allows paths outside the project root.
pub fn resolve_patterns(root: &Path, files: &[String], patterns: &[String]) -> InjectResult<Vec<String>> {
	let mut exclude_builder = GlobSetBuilder::new();
	let mut includes = Vec::new();

	for pattern in patterns {
		match pattern.strip_prefix('!') {
			Some(negated) => {
				exclude_builder.add(build_glob(negated)?.glob().clone());
			}
			None => includes.push(pattern.as_str()),
		}
	}

	let excludes = exclude_builder.build().map_err(|e| {
		InjectError::InvalidGlob {
			pattern: patterns.join(", "),
			reason: e.to_string(),
		}
	})?;

	let mut seen = HashSet::new();
	let mut resolved = Vec::new();

	for pattern in includes {
		let pattern = pattern.strip_prefix("./").unwrap_or(pattern);

		if !is_glob(pattern) {
			if root.join(pattern).is_file() && !is_excluded(&excludes, pattern) && seen.insert(pattern.to_string()) {
				resolved.push(pattern.to_string());
			}
			continue;
		}

		let matcher = build_glob(pattern)?;
		for file in files {
			if matcher.is_match(file) && !is_excluded(&excludes, file) && seen.insert(file.clone()) {
				resolved.push(file.clone());
			}
		}
	}

	Ok(resolved)
}

fn build_glob(pattern: &str) -> InjectResult<GlobMatcher> {
	GlobBuilder::new(pattern)
		.literal_separator(true)
		.build()
		.map(|glob| glob.compile_matcher())
		.map_err(|e| {
			InjectError::InvalidGlob {
				pattern: pattern.to_string(),
				reason: e.to_string(),
			}
		})
}

fn is_glob(pattern: &str) -> bool {
	pattern.contains(['*', '?', '[', '{'])
}

fn is_excluded(excludes: &GlobSet, path: &str) -> bool {
	!excludes.is_empty() && excludes.is_match(path)
}

/// Collect every file below `root` as a sorted list of root-relative,
/// forward-slash paths. Files matched by the project's `.gitignore` are
/// skipped unless `disable_gitignore` is set.
pub fn collect_files(root: &Path, disable_gitignore: bool) -> InjectResult<Vec<String>> {
	let gitignore = if disable_gitignore {
		Gitignore::empty()
	} else {
		build_gitignore(root)
	};

	let mut files = Vec::new();
	let mut visited_dirs = HashSet::new();
	walk_dir(root, root, &gitignore, &mut visited_dirs, &mut files)?;
	files.sort();
	Ok(files)
}

fn walk_dir(
	root: &Path,
	dir: &Path,
	gitignore: &Gitignore,
	visited_dirs: &mut HashSet<PathBuf>,
	files: &mut Vec<String>,
) -> InjectResult<()> {
	if !dir.is_dir() {
		return Ok(());
	}

	// Symlinked directories are only visited once.
	let canonical = dir.canonicalize().unwrap_or_else(|_| dir.to_path_buf());
	if !visited_dirs.insert(canonical) {
		return Ok(());
	}

	for entry in std::fs::read_dir(dir)? {
		let path = entry?.path();

		if let Some(name) = path.file_name().and_then(|n| n.to_str()) {
			if is_ignored_directory_name(name) {
				continue;
			}
		}

		let is_dir = path.is_dir();
		if gitignore.matched(&path, is_dir).is_ignore() {
			continue;
		}

		if is_dir {
			walk_dir(root, &path, gitignore, visited_dirs, files)?;
		} else if let Ok(relative) = path.strip_prefix(root) {
			files.push(relative.to_string_lossy().replace('\\', "/"));
		}
	}

	Ok(())
}

fn is_ignored_directory_name(name: &str) -> bool {
	matches!(name, ".git" | "node_modules" | "target")
}

/// Build a `Gitignore` matcher from the project's `.gitignore` file (if any).
fn build_gitignore(root: &Path) -> Gitignore {
	let mut builder = GitignoreBuilder::new(root);
	let gitignore_path = root.join(".gitignore");
	if gitignore_path.exists() {
		let _ = builder.add(gitignore_path);
	}
	builder.build().unwrap_or_else(|_| Gitignore::empty())
}
