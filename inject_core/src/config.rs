use std::fmt;
use std::path::Path;
use std::path::PathBuf;
use std::sync::Arc;

use serde::Deserialize;
use sha2::Digest;

use crate::InjectError;
use crate::InjectResult;
use crate::tags::FormatLine;

/// Supported config file locations in discovery order (highest precedence
/// first).
pub const CONFIG_FILE_CANDIDATES: [&str; 3] =
	["inject.toml", ".inject.toml", ".config/inject.toml"];

/// Marker name used when none is configured.
pub const DEFAULT_NAME: &str = "inject";

/// Query parameter used for the content hash when none is configured.
pub const DEFAULT_VERSION_PARAM: &str = "v";

/// Hash algorithm used for the versioning query parameter.
#[derive(Debug, Clone, Copy, Default, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "lowercase")]
pub enum HashAlgorithm {
	Sha224,
	#[default]
	Sha256,
	Sha384,
	Sha512,
}

impl HashAlgorithm {
	/// Lowercase hex digest of `content`.
	pub fn digest(self, content: &[u8]) -> String {
		match self {
			Self::Sha224 => hex::encode(sha2::Sha224::digest(content)),
			Self::Sha256 => hex::encode(sha2::Sha256::digest(content)),
			Self::Sha384 => hex::encode(sha2::Sha384::digest(content)),
			Self::Sha512 => hex::encode(sha2::Sha512::digest(content)),
		}
	}
}

/// Resolved versioning settings.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Versioning {
	pub hash: HashAlgorithm,
	pub param_name: String,
}

impl Default for Versioning {
	fn default() -> Self {
		Self {
			hash: HashAlgorithm::default(),
			param_name: DEFAULT_VERSION_PARAM.to_string(),
		}
	}
}

/// Validated options for one injector.
///
/// Build it from [`InjectOptions::default()`] and override fields, or load it
/// from a config section through [`InjectOptionsConfig::validate`].
#[derive(Clone)]
#[allow(clippy::struct_excessive_bools)]
pub struct InjectOptions {
	/// Value substituted for `{{name}}` in the start and end tags.
	pub name: String,
	/// Prefixes stripped from source paths, tried in order.
	pub ignore_path: Vec<String>,
	/// Render paths relative to the target document's directory.
	pub relative: bool,
	pub add_prefix: Option<String>,
	pub add_suffix: Option<String>,
	/// Ensure paths start with `/`. When `false` a leading slash is removed
	/// unless a prefix was added.
	pub add_root_slash: bool,
	pub versioning: Option<Versioning>,
	/// Close void elements with ` />` instead of `>`.
	pub self_closing_tag: bool,
	/// Delete marker pairs together with everything between them.
	pub remove_tags: bool,
	/// Suppress the per-target summary and missing marker warnings.
	pub quiet: bool,
	/// Start tag template. Defaults depend on the target type.
	pub start_tag: Option<String>,
	/// End tag template. Defaults depend on the target type.
	pub end_tag: Option<String>,
	/// Replaces the built-in line templates entirely.
	pub transform: Option<Arc<dyn FormatLine>>,
}

impl InjectOptions {
	#[must_use]
	pub fn with_transform(mut self, transform: impl FormatLine + 'static) -> Self {
		self.transform = Some(Arc::new(transform));
		self
	}
}

impl Default for InjectOptions {
	fn default() -> Self {
		Self {
			name: DEFAULT_NAME.to_string(),
			ignore_path: Vec::new(),
			relative: false,
			add_prefix: None,
			add_suffix: None,
			add_root_slash: true,
			versioning: None,
			self_closing_tag: false,
			remove_tags: false,
			quiet: false,
			start_tag: None,
			end_tag: None,
			transform: None,
		}
	}
}

impl fmt::Debug for InjectOptions {
	fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
		f.debug_struct("InjectOptions")
			.field("name", &self.name)
			.field("ignore_path", &self.ignore_path)
			.field("relative", &self.relative)
			.field("add_prefix", &self.add_prefix)
			.field("add_suffix", &self.add_suffix)
			.field("add_root_slash", &self.add_root_slash)
			.field("versioning", &self.versioning)
			.field("self_closing_tag", &self.self_closing_tag)
			.field("remove_tags", &self.remove_tags)
			.field("quiet", &self.quiet)
			.field("start_tag", &self.start_tag)
			.field("end_tag", &self.end_tag)
			.field("transform", &self.transform.as_ref().map(|_| "<transform>"))
			.finish()
	}
}

/// `ignore_path` accepts a single prefix or a list of prefixes.
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
pub enum IgnorePath {
	One(String),
	Many(Vec<String>),
}

impl IgnorePath {
	pub fn into_vec(self) -> Vec<String> {
		match self {
			Self::One(path) => vec![path],
			Self::Many(paths) => paths,
		}
	}
}

/// `versioning` accepts `true`/`false` or a table with overrides.
///
/// ```toml
/// versioning = { hash = "sha512", param_name = "rev" }
/// ```
#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
#[serde(untagged)]
#[non_exhaustive]
#[allow(variant_size_differences)]
pub enum VersioningConfig {
	Enabled(bool),
	Custom(VersioningSettings),
}

#[derive(Debug, Clone, Deserialize, PartialEq, Eq)]
pub struct VersioningSettings {
	#[serde(default)]
	pub hash: HashAlgorithm,
	#[serde(default, alias = "paramName")]
	pub param_name: Option<String>,
}

impl VersioningConfig {
	fn resolve(self) -> Option<Versioning> {
		match self {
			Self::Enabled(false) => None,
			Self::Enabled(true) => Some(Versioning::default()),
			Self::Custom(settings) => {
				Some(Versioning {
					hash: settings.hash,
					param_name: settings
						.param_name
						.unwrap_or_else(|| DEFAULT_VERSION_PARAM.to_string()),
				})
			}
		}
	}
}

/// Raw injector options as written in `inject.toml`.
///
/// Keys use `snake_case`; the camelCase spellings are accepted as aliases.
/// Options that were removed are still parsed so that they can be rejected
/// with a useful error instead of being silently ignored.
#[derive(Debug, Clone, Default, Deserialize)]
#[allow(clippy::struct_excessive_bools)]
pub struct InjectOptionsConfig {
	#[serde(default)]
	pub name: Option<String>,
	#[serde(default, alias = "ignorePath")]
	pub ignore_path: Option<IgnorePath>,
	#[serde(default)]
	pub relative: bool,
	#[serde(default, alias = "addPrefix")]
	pub add_prefix: Option<String>,
	#[serde(default, alias = "addSuffix")]
	pub add_suffix: Option<String>,
	#[serde(default, alias = "addRootSlash")]
	pub add_root_slash: Option<bool>,
	#[serde(default)]
	pub versioning: Option<VersioningConfig>,
	#[serde(default, alias = "selfClosingTag")]
	pub self_closing_tag: bool,
	#[serde(default, alias = "removeTags")]
	pub remove_tags: bool,
	#[serde(default)]
	pub quiet: bool,
	#[serde(default, alias = "starttag")]
	pub start_tag: Option<String>,
	#[serde(default, alias = "endtag")]
	pub end_tag: Option<String>,
	#[serde(default)]
	pub sort: Option<toml::Value>,
	#[serde(default, alias = "templateString")]
	pub template_string: Option<toml::Value>,
}

impl InjectOptionsConfig {
	/// Reject removed options and resolve defaults.
	pub fn validate(self) -> InjectResult<InjectOptions> {
		if self.sort.is_some() {
			return Err(InjectError::SortOptionRemoved);
		}

		if self.template_string.is_some() {
			return Err(InjectError::TemplateStringOptionRemoved);
		}

		Ok(InjectOptions {
			name: self
				.name
				.filter(|name| !name.is_empty())
				.unwrap_or_else(|| DEFAULT_NAME.to_string()),
			ignore_path: self.ignore_path.map(IgnorePath::into_vec).unwrap_or_default(),
			relative: self.relative,
			add_prefix: self.add_prefix.filter(|prefix| !prefix.is_empty()),
			add_suffix: self.add_suffix.filter(|suffix| !suffix.is_empty()),
			add_root_slash: self.add_root_slash.unwrap_or(!self.relative),
			versioning: self.versioning.and_then(VersioningConfig::resolve),
			self_closing_tag: self.self_closing_tag,
			remove_tags: self.remove_tags,
			quiet: self.quiet,
			start_tag: self.start_tag,
			end_tag: self.end_tag,
			transform: None,
		})
	}
}

/// One `[[inject]]` section of `inject.toml`.
///
/// ```toml
/// [[inject]]
/// targets = ["src/index.html"]
/// sources = ["src/**/*.js", "src/**/*.css", "!src/vendor/**"]
/// name = "head"
/// ignore_path = "src"
/// ```
///
/// The section keys and the injector options share one table. The section
/// keys are taken out first and whatever remains is read as
/// [`InjectOptionsConfig`], so option aliases behave the same everywhere.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(try_from = "toml::Table")]
pub struct InjectSection {
	/// Glob patterns for the documents that receive injections.
	pub targets: Vec<String>,
	/// Glob patterns for the injected files, in injection order. Patterns
	/// starting with `!` exclude.
	pub sources: Option<Vec<String>>,
	/// Legacy single target path. Always rejected.
	pub target: Option<toml::Value>,
	pub options: InjectOptionsConfig,
}

impl TryFrom<toml::Table> for InjectSection {
	type Error = toml::de::Error;

	fn try_from(mut table: toml::Table) -> Result<Self, Self::Error> {
		let targets = table
			.remove("targets")
			.map(toml::Value::try_into)
			.transpose()?
			.unwrap_or_default();
		let sources = table
			.remove("sources")
			.map(toml::Value::try_into)
			.transpose()?;
		let target = table.remove("target");
		let options = toml::Value::Table(table).try_into()?;

		Ok(Self {
			targets,
			sources,
			target,
			options,
		})
	}
}

/// A validated `[[inject]]` section.
#[derive(Debug, Clone)]
pub struct InjectTask {
	pub targets: Vec<String>,
	pub sources: Vec<String>,
	pub options: InjectOptions,
}

impl InjectSection {
	/// Validate the section. `index` is the 1-based position used in errors.
	pub fn validate(self, index: usize) -> InjectResult<InjectTask> {
		if let Some(target) = self.target {
			let display = target
				.as_str()
				.map_or_else(|| target.to_string(), ToString::to_string);
			return Err(InjectError::LegacyTarget(display));
		}

		let Some(sources) = self.sources else {
			return Err(InjectError::MissingSources);
		};
		let options = self.options.validate()?;

		if self.targets.is_empty() {
			return Err(InjectError::MissingTargets(index));
		}

		Ok(InjectTask {
			targets: self.targets,
			sources,
			options,
		})
	}
}

/// Configuration loaded from an `inject.toml` file.
///
/// ```toml
/// disable_gitignore = false
///
/// [[inject]]
/// targets = ["index.html"]
/// sources = ["lib/**/*.js"]
///
/// [[inject]]
/// targets = ["index.html"]
/// sources = ["styles/*.css"]
/// name = "head"
/// ```
#[derive(Debug, Default, Deserialize)]
pub struct InjectConfig {
	/// Injector sections, applied in order to every matching target.
	#[serde(default, rename = "inject")]
	pub sections: Vec<InjectSection>,
	/// When true, `.gitignore` files are not used to filter globbed paths.
	#[serde(default)]
	pub disable_gitignore: bool,
}

impl InjectConfig {
	/// Resolve the config path from known discovery candidates.
	#[must_use]
	pub fn resolve_path(root: &Path) -> Option<PathBuf> {
		CONFIG_FILE_CANDIDATES
			.iter()
			.map(|candidate| root.join(candidate))
			.find(|path| path.is_file())
	}

	/// Load the config from the first discovered config file at `root`.
	/// Returns `None` if the file does not exist.
	pub fn load(root: &Path) -> InjectResult<Option<InjectConfig>> {
		let Some(config_path) = Self::resolve_path(root) else {
			return Ok(None);
		};

		let content = std::fs::read_to_string(&config_path)?;
		Self::parse(&content).map(Some)
	}

	pub fn parse(content: &str) -> InjectResult<InjectConfig> {
		toml::from_str(content).map_err(|e| InjectError::ConfigParse(e.to_string()))
	}

	/// Validate every section before anything is read or written.
	pub fn tasks(self) -> InjectResult<Vec<InjectTask>> {
		self.sections
			.into_iter()
			.enumerate()
			.map(|(index, section)| section.validate(index + 1))
			.collect()
	}
}
