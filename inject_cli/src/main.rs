use std::path::Path;
use std::path::PathBuf;
use std::process;
use std::sync::mpsc;
use std::time::Duration;

use clap::Parser;
use inject_cli::Commands;
use inject_cli::InjectCli;
use inject_cli::OutputFormat;
use inject_core::CONFIG_FILE_CANDIDATES;
use inject_core::InjectConfig;
use inject_core::check_project;
use inject_core::compute_updates;
use inject_core::project::ProjectContext;
use inject_core::project::scan_project;
use inject_core::write_updates;
use owo_colors::OwoColorize;
use similar::ChangeTag;
use similar::TextDiff;
use tracing_subscriber::EnvFilter;

static USE_COLOR: std::sync::atomic::AtomicBool = std::sync::atomic::AtomicBool::new(true);

fn color_enabled() -> bool {
	USE_COLOR.load(std::sync::atomic::Ordering::Relaxed)
}

/// Apply ANSI color codes only when color is enabled.
macro_rules! colored {
	($text:expr,red) => {
		if color_enabled() {
			format!("{}", $text.red())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,green) => {
		if color_enabled() {
			format!("{}", $text.green())
		} else {
			format!("{}", $text)
		}
	};
	($text:expr,bold) => {
		if color_enabled() {
			format!("{}", $text.bold())
		} else {
			format!("{}", $text)
		}
	};
}

const SAMPLE_CONFIG: &str = r#"# inject configuration
#
# Every [[inject]] section injects its sources into its targets. Sections run
# in order, so several sections with different names can share a target.

[[inject]]
targets = ["index.html"]
sources = ["lib/**/*.js", "styles/**/*.css"]

# Marker name: <!-- inject:js --> ... <!-- endinject -->
# name = "inject"

# Strip a leading directory from injected paths.
# ignore_path = "public"

# Append a content hash, e.g. /lib/app.js?v=<sha256>.
# versioning = true
"#;

fn main() {
	let args = InjectCli::parse();

	// Respect NO_COLOR env var and --no-color flag.
	let use_color = !args.no_color && std::env::var_os("NO_COLOR").is_none();
	if !use_color {
		USE_COLOR.store(false, std::sync::atomic::Ordering::Relaxed);
	}

	init_tracing(&args, use_color);

	// Install miette's fancy handler for rich error diagnostics.
	miette::set_hook(Box::new(move |_| {
		Box::new(
			miette::MietteHandlerOpts::new()
				.color(use_color)
				.unicode(use_color)
				.build(),
		)
	}))
	.ok();

	let result = match args.command {
		Some(Commands::Init) => run_init(&args),
		Some(Commands::Check { diff, format }) => run_check(&args, diff, format),
		Some(Commands::Update { dry_run, watch }) => run_update(&args, dry_run, watch),
		Some(Commands::List) => run_list(&args),
		None => {
			eprintln!("No subcommand specified. Run `inject --help` for usage.");
			process::exit(1);
		}
	};

	if let Err(e) = result {
		// Try to render through miette for rich diagnostics with help text
		// and error codes.
		match e.downcast::<inject_core::InjectError>() {
			Ok(inject_err) => {
				let report: miette::Report = (*inject_err).into();
				eprintln!("{report:?}");
			}
			Err(e) => {
				eprintln!("{} {e}", colored!("error:", red));
			}
		}
		process::exit(2);
	}
}

/// Log to stderr so that stdout only carries command output.
fn init_tracing(args: &InjectCli, use_color: bool) {
	let level = if args.quiet {
		"error"
	} else if args.verbose {
		"debug"
	} else {
		"info"
	};

	tracing_subscriber::fmt()
		.with_env_filter(EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level)))
		.with_writer(std::io::stderr)
		.with_ansi(use_color)
		.with_target(false)
		.without_time()
		.init();
}

fn resolve_root(args: &InjectCli) -> PathBuf {
	args.path
		.clone()
		.unwrap_or_else(|| std::env::current_dir().unwrap_or_else(|_| PathBuf::from(".")))
}

fn run_init(args: &InjectCli) -> Result<(), Box<dyn std::error::Error>> {
	let root = resolve_root(args);

	if let Some(existing) = InjectConfig::resolve_path(&root) {
		println!("Config file already exists: {}", existing.display());
		return Ok(());
	}

	let config_path = root.join(CONFIG_FILE_CANDIDATES[0]);
	std::fs::write(&config_path, SAMPLE_CONFIG)?;
	println!("Created {}", config_path.display());
	println!();
	println!("Next steps:");
	println!("  1. Add marker comments to your targets:");
	println!("     <!-- inject:js -->");
	println!("     <!-- endinject -->");
	println!("  2. Adjust `targets` and `sources` in inject.toml");
	println!("  3. Run `inject update` to inject the sources");

	Ok(())
}

/// Scan the project and fail when there is nothing to do.
fn load_project(args: &InjectCli) -> Result<ProjectContext, Box<dyn std::error::Error>> {
	let root = resolve_root(args);
	let ctx = scan_project(&root)?;

	if ctx.config_path.is_none() {
		return Err(format!(
			"no config file found in {} (run `inject init` to create one)",
			root.display()
		)
		.into());
	}

	Ok(ctx)
}

fn run_check(
	args: &InjectCli,
	show_diff: bool,
	format: OutputFormat,
) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_project(args)?;
	let root = resolve_root(args);
	let result = check_project(&ctx)?;

	if result.is_ok() {
		match format {
			OutputFormat::Json => {
				println!("{{\"ok\":true,\"stale\":[]}}");
			}
			OutputFormat::Text => {
				println!(
					"Check passed: all {} target(s) are up to date.",
					result.target_count
				);
			}
		}
		return Ok(());
	}

	match format {
		OutputFormat::Json => {
			let stale_entries: Vec<serde_json::Value> = result
				.stale
				.iter()
				.map(|entry| {
					serde_json::json!({
						"file": make_relative(&entry.file, &root),
						"current": entry.current_content,
						"expected": entry.expected_content,
					})
				})
				.collect();
			let output = serde_json::json!({
				"ok": false,
				"stale": stale_entries,
			});
			println!("{output}");
		}
		OutputFormat::Text => {
			eprintln!("Check failed.");
			eprintln!();
			eprintln!("Stale targets:");
			for entry in &result.stale {
				eprintln!("  {}", make_relative(&entry.file, &root));

				if show_diff {
					print_diff(&entry.current_content, &entry.expected_content);
				}
			}

			eprintln!();
			eprintln!(
				"{} target(s) are out of date. Run `inject update` to fix.",
				result.stale.len()
			);
		}
	}

	process::exit(1);
}

fn run_update(args: &InjectCli, dry_run: bool, watch: bool) -> Result<(), Box<dyn std::error::Error>> {
	// Run the initial update.
	run_update_once(args, dry_run)?;

	if !watch || dry_run {
		return Ok(());
	}

	// Watch mode
	println!("\nWatching for file changes... (press Ctrl+C to stop)");

	let root = resolve_root(args);
	let (tx, rx) = mpsc::channel();

	let mut watcher =
		notify::recommended_watcher(move |res: Result<notify::Event, notify::Error>| {
			if let Ok(event) = res {
				if matches!(
					event.kind,
					notify::EventKind::Modify(_) | notify::EventKind::Create(_)
				) {
					let _ = tx.send(());
				}
			}
		})?;

	use notify::Watcher;
	watcher.watch(&root, notify::RecursiveMode::Recursive)?;

	loop {
		rx.recv()?;
		// Debounce: drain additional events within 200ms. Writing the
		// targets triggers one more round, which finds nothing to change.
		while rx.recv_timeout(Duration::from_millis(200)).is_ok() {}

		println!("\nFile change detected, updating...");
		if let Err(e) = run_update_once(args, false) {
			eprintln!("{} {e}", colored!("error:", red));
		}
	}
}

fn run_update_once(args: &InjectCli, dry_run: bool) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_project(args)?;
	let root = resolve_root(args);
	let updates = compute_updates(&ctx)?;

	if updates.updated_files.is_empty() {
		println!("All targets are already up to date.");
		return Ok(());
	}

	if dry_run {
		println!(
			"Dry run: would update {} of {} target(s):",
			updates.updated_files.len(),
			updates.target_count
		);
		for path in updates.updated_files.keys() {
			println!("  {}", make_relative(path, &root));
		}
	} else {
		write_updates(&updates)?;
		println!("Updated {} file(s).", updates.updated_files.len());

		if args.verbose {
			for path in updates.updated_files.keys() {
				println!("  {}", make_relative(path, &root));
			}
		}
	}

	Ok(())
}

fn run_list(args: &InjectCli) -> Result<(), Box<dyn std::error::Error>> {
	let ctx = load_project(args)?;

	if ctx.tasks.is_empty() {
		println!("No [[inject]] sections configured.");
		return Ok(());
	}

	for (index, task) in ctx.tasks.iter().enumerate() {
		let options = task.injector.options();
		let title = format!("[{}] {}", index + 1, options.name);
		println!("{}", colored!(title, bold));

		println!("  targets ({}):", task.targets.len());
		for target in &task.targets {
			println!("    {target}");
		}

		println!("  sources ({}):", task.injector.sources().len());
		for source in task.injector.sources() {
			println!("    {}", source.path);
		}

		if index + 1 < ctx.tasks.len() {
			println!();
		}
	}

	Ok(())
}

/// Print a unified diff between two strings, colorized.
fn print_diff(current: &str, expected: &str) {
	let diff = TextDiff::from_lines(current, expected);
	for change in diff.iter_all_changes() {
		match change.tag() {
			ChangeTag::Delete => {
				eprint!("  {}", colored!(format!("-{change}"), red));
			}
			ChangeTag::Insert => {
				eprint!("  {}", colored!(format!("+{change}"), green));
			}
			ChangeTag::Equal => {
				eprint!("   {change}");
			}
		}
	}
}

/// Make a path relative to root for display purposes.
fn make_relative(path: &Path, root: &Path) -> String {
	path.strip_prefix(root)
		.unwrap_or(path)
		.display()
		.to_string()
}
