mod common;

use inject_core::AnyEmptyResult;

#[test]
fn can_init() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;

	common::inject_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("Created"))
		.stdout(predicates::str::contains("<!-- inject:js -->"));

	let content = std::fs::read_to_string(tmp.path().join("inject.toml"))?;
	assert!(content.contains("[[inject]]"));
	assert!(content.contains("targets = [\"index.html\"]"));

	let config = inject_core::InjectConfig::parse(&content)?;
	assert_eq!(config.tasks()?.len(), 1);

	Ok(())
}

#[test]
fn init_does_not_overwrite() -> AnyEmptyResult {
	let tmp = tempfile::tempdir()?;
	std::fs::create_dir_all(tmp.path().join(".config"))?;
	let config_path = tmp.path().join(".config/inject.toml");
	std::fs::write(&config_path, "# existing config\n")?;

	common::inject_cmd()
		.arg("init")
		.arg("--path")
		.arg(tmp.path())
		.assert()
		.success()
		.stdout(predicates::str::contains("already exists"));

	assert_eq!(std::fs::read_to_string(&config_path)?, "# existing config\n");
	assert!(!tmp.path().join("inject.toml").exists());

	Ok(())
}
