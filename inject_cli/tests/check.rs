mod common;

use inject_core::AnyEmptyResult;
use serde_json::Value;

#[test]
fn check_fails_when_stale() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::inject_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("index.html"))
		.stderr(predicates::str::contains("1 target(s) are out of date"));

	Ok(())
}

#[test]
fn check_passes_after_update() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::inject_cmd()
		.arg("update")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success();

	common::inject_cmd()
		.arg("check")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("all 1 target(s) are up to date"));

	Ok(())
}

#[test]
fn check_diff_shows_inserted_lines() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	common::inject_cmd()
		.arg("check")
		.arg("--diff")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.code(1)
		.stderr(predicates::str::contains("+\t<script src=\"/lib/app.js\"></script>"));

	Ok(())
}

#[test]
fn check_json_lists_stale_targets() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	common::write_project(tmp.path())?;

	let output = common::inject_cmd()
		.arg("check")
		.arg("--format")
		.arg("json")
		.arg("--path")
		.arg(tmp.path())
		.output()?;
	assert_eq!(output.status.code(), Some(1));

	let json: Value = serde_json::from_slice(&output.stdout)?;
	assert_eq!(json["ok"], Value::Bool(false));
	assert_eq!(json["stale"][0]["file"], Value::String("index.html".to_string()));
	assert_eq!(json["stale"][0]["current"], Value::String(common::PAGE.to_string()));

	let expected = json["stale"][0]["expected"].as_str().unwrap_or_default();
	assert!(expected.contains("<link rel=\"stylesheet\" href=\"/styles/site.css\">"));

	Ok(())
}
