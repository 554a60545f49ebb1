use std::path::PathBuf;

use clap::Parser;
use clap::Subcommand;
use clap::ValueEnum;

#[derive(Parser)]
#[command(
	author,
	version,
	about = "Inject script, stylesheet and markup references between marker comments.",
	long_about = "inject rewrites target documents so that the region between a start marker \
	              and an end marker lists references to your source files.\n\nSections in \
	              inject.toml pair target globs with source globs:\n\n  [[inject]]\n  targets = \
	              [\"index.html\"]\n  sources = [\"lib/**/*.js\", \"styles/*.css\"]\n\nQuick \
	              start:\n  inject init    Create a sample inject.toml\n  inject update  Inject \
	              sources into every target\n  inject check   Verify every target is up to date"
)]
#[allow(clippy::struct_excessive_bools)]
pub struct InjectCli {
	#[command(subcommand)]
	pub command: Option<Commands>,

	/// Path to the project root directory.
	#[arg(long, short, global = true)]
	pub path: Option<PathBuf>,

	/// Enable verbose output.
	#[arg(long, short, global = true, default_value_t = false, conflicts_with = "quiet")]
	pub verbose: bool,

	/// Only print errors.
	#[arg(long, short, global = true, default_value_t = false)]
	pub quiet: bool,

	/// Disable colored output.
	#[arg(long, global = true, default_value_t = false)]
	pub no_color: bool,
}

#[derive(Subcommand)]
pub enum Commands {
	/// Create a sample `inject.toml` in the project root.
	///
	/// If a config file already exists this command is a no-op and exits
	/// successfully.
	Init,
	/// Check that every target is up to date.
	///
	/// Runs every `[[inject]]` section without writing and compares the
	/// result with the current content of each target. Exits with a non-zero
	/// status code if any target is stale, which makes it suitable for CI.
	Check {
		/// Show a line diff for each stale target.
		#[arg(long, default_value_t = false)]
		diff: bool,

		/// Output format for check results. Use `text` for human-readable
		/// output or `json` for programmatic consumption.
		#[arg(long, value_enum, default_value_t = OutputFormat::Text)]
		format: OutputFormat,
	},
	/// Inject sources into every target.
	///
	/// Use `--dry-run` to preview which files would change, or `--watch` to
	/// re-run whenever a file in the project changes.
	Update {
		/// Print the files that would change without writing them.
		#[arg(long, default_value_t = false)]
		dry_run: bool,

		/// Watch for file changes and re-run updates automatically.
		#[arg(long, default_value_t = false)]
		watch: bool,
	},
	/// List the resolved targets and sources of every section.
	List,
}

#[derive(Debug, Clone, Copy, ValueEnum)]
pub enum OutputFormat {
	/// Human-readable text output with colors and formatting.
	Text,
	/// JSON output for programmatic consumption. Each stale entry includes
	/// the file path, current content and expected content.
	Json,
}
