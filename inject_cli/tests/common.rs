use std::path::Path;

use assert_cmd::Command;
use insta_cmd::get_cargo_bin;

pub fn inject_cmd() -> Command {
	let mut cmd = Command::new(get_cargo_bin("inject"));
	cmd.env("NO_COLOR", "1");
	cmd.env_remove("RUST_LOG");
	cmd
}

pub const PAGE: &str = "<html>\n<head>\n\t<!-- inject:css -->\n\t<!-- endinject -->\n</head>\n<body>\n\t<!-- \
                        inject:js -->\n\t<!-- endinject -->\n</body>\n</html>\n";

pub const CONFIG: &str = "[[inject]]\ntargets = [\"index.html\"]\nsources = [\"lib/*.js\", \"styles/*.css\"]\n";

/// Write a small project with one target and three sources.
pub fn write_project(root: &Path) -> std::io::Result<()> {
	std::fs::create_dir_all(root.join("lib"))?;
	std::fs::create_dir_all(root.join("styles"))?;
	std::fs::write(root.join("inject.toml"), CONFIG)?;
	std::fs::write(root.join("index.html"), PAGE)?;
	std::fs::write(root.join("lib/app.js"), "app();\n")?;
	std::fs::write(root.join("lib/util.js"), "util();\n")?;
	std::fs::write(root.join("styles/site.css"), "body {}\n")?;
	Ok(())
}
