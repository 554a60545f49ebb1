use miette::Diagnostic;
use thiserror::Error;

#[derive(Debug, Diagnostic, Error)]
#[non_exhaustive]
pub enum InjectError {
	#[error(transparent)]
	#[diagnostic(code(inject::io_error))]
	Io(#[from] std::io::Error),

	#[error("missing sources for injection")]
	#[diagnostic(
		code(inject::missing_sources),
		help("add `sources = [\"src/**/*.js\"]` to every `[[inject]]` section")
	)]
	MissingSources,

	#[error("passing the target as a string is no longer supported: `{0}`")]
	#[diagnostic(
		code(inject::legacy_target),
		help("list target files under `targets = [...]` and the injected files under `sources`")
	)]
	LegacyTarget(String),

	#[error("the `sort` option has been removed")]
	#[diagnostic(
		code(inject::sort_removed),
		help("sources are injected in the order they are listed; reorder the `sources` patterns instead")
	)]
	SortOptionRemoved,

	#[error("the `templateString` option has been removed")]
	#[diagnostic(
		code(inject::template_string_removed),
		help("write the template to a file and list it under `targets`")
	)]
	TemplateStringOptionRemoved,

	#[error("no targets configured for inject section {0}")]
	#[diagnostic(
		code(inject::missing_targets),
		help("add `targets = [\"index.html\"]` to the section")
	)]
	MissingTargets(usize),

	#[error("failed to parse config file: {0}")]
	#[diagnostic(
		code(inject::config_parse),
		help("check that inject.toml is valid TOML with one or more [[inject]] sections")
	)]
	ConfigParse(String),

	#[error("invalid glob pattern `{pattern}`: {reason}")]
	#[diagnostic(code(inject::invalid_glob))]
	InvalidGlob { pattern: String, reason: String },

	#[error("failed to read source file `{path}`: {reason}")]
	#[diagnostic(code(inject::source_read))]
	SourceRead { path: String, reason: String },
}

pub type InjectResult<T> = Result<T, InjectError>;
pub type AnyError = Box<dyn std::error::Error>;
pub type AnyEmptyResult = Result<(), AnyError>;
pub type AnyResult<T> = Result<T, AnyError>;
