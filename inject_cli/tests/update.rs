mod common;

use inject_core::AnyEmptyResult;
use predicates::prelude::PredicateBooleanExt;

#[test]
fn update_injects_sources() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::inject_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Updated 1 file(s)."))
		.stderr(predicates::str::contains("3 source(s) injected into index.html"));

	let content = std::fs::read_to_string(tmp.path().join("index.html"))?;
	assert_eq!(
		content,
		"<html>\n<head>\n\t<!-- inject:css -->\n\t<link rel=\"stylesheet\" href=\"/styles/site.css\">\n\t<!-- \
		 endinject -->\n</head>\n<body>\n\t<!-- inject:js -->\n\t<script src=\"/lib/app.js\"></script>\n\t<script \
		 src=\"/lib/util.js\"></script>\n\t<!-- endinject -->\n</body>\n</html>\n"
	);

	Ok(())
}

#[test]
fn update_twice_reports_up_to_date() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::inject_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();
	let first = std::fs::read_to_string(tmp.path().join("index.html"))?;

	common::inject_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already up to date"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("index.html"))?, first);

	Ok(())
}

#[test]
fn update_dry_run_does_not_write() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::inject_cmd()
		.arg("update")
		.arg("--dry-run")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Dry run: would update 1 of 1 target(s)"))
		.stdout(predicates::str::contains("index.html"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("index.html"))?, common::PAGE);

	Ok(())
}

#[test]
fn update_quiet_hides_summary_logs() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::inject_cmd()
		.arg("update")
		.arg("--quiet")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stderr(predicates::str::contains("injected into").not());

	Ok(())
}

#[test]
fn update_rejects_removed_sort_option() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("inject.toml"),
		format!("{}sort = \"name\"\n", common::CONFIG),
	)?;

	common::inject_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("inject::sort_removed"));

	assert_eq!(std::fs::read_to_string(tmp.path().join("index.html"))?, common::PAGE);

	Ok(())
}

#[test]
fn update_rejects_legacy_target_string() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;
	std::fs::write(
		tmp.path().join("inject.toml"),
		"[[inject]]\ntarget = \"index.html\"\nsources = [\"lib/*.js\"]\n",
	)?;

	common::inject_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("inject::legacy_target"));

	Ok(())
}

#[test]
fn update_without_config_fails() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::inject_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(2)
		.stderr(predicates::str::contains("no config file found"));

	Ok(())
}

#[test]
fn missing_subcommand_prints_usage_hint() {
	common::inject_cmd()
		.assert()
		.code(1)
		.stderr(predicates::str::contains("inject --help"));
}
