mod common;

use inject_core::AnyEmptyResult;

#[test]
fn list_prints_resolved_targets_and_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("inject.toml"),
		format!(
			"{}\n[[inject]]\ntargets = [\"index.html\"]\nsources = [\"styles/*.css\"]\nname = \"head\"\n",
			common::CONFIG
		),
	)?;

	common::inject_cmd()
		.arg("list")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("[1] inject"))
		.stdout(predicates::str::contains("[2] head"))
		.stdout(predicates::str::contains("sources (3):"))
		.stdout(predicates::str::contains("    lib/app.js\n    lib/util.js\n    styles/site.css\n"));

	Ok(())
}
