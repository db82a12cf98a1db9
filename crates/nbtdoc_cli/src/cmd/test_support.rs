use std::path::PathBuf;
use std::process::{Command, Output};
use std::sync::OnceLock;

static NBTDOC_BIN: OnceLock<PathBuf> = OnceLock::new();

pub(crate) fn run_nbtdoc(args: &[&str]) -> Output {
	Command::new(nbtdoc_bin()).args(args).output().expect("nbtdoc command executes")
}

pub(crate) fn run_nbtdoc_json(args: &[&str]) -> serde_json::Value {
	let output = run_nbtdoc(args);
	assert!(
		output.status.success(),
		"nbtdoc command failed with status={}: {}",
		output.status,
		String::from_utf8_lossy(&output.stderr)
	);
	serde_json::from_slice(&output.stdout).expect("stdout should be valid json")
}

fn nbtdoc_bin() -> &'static PathBuf {
	NBTDOC_BIN.get_or_init(resolve_nbtdoc_bin)
}

fn resolve_nbtdoc_bin() -> PathBuf {
	if let Ok(path) = std::env::var("CARGO_BIN_EXE_nbtdoc") {
		return PathBuf::from(path);
	}

	let workspace = nbtdoc_testkit::workspace_root();
	let mut bin = nbtdoc_testkit::target_dir().join("debug");
	bin.push(if cfg!(windows) { "nbtdoc.exe" } else { "nbtdoc" });

	let status = Command::new("cargo")
		.current_dir(&workspace)
		.args(["build", "--quiet", "-p", "nbtdoc_cli", "--bin", "nbtdoc"])
		.status()
		.expect("cargo build executes");
	assert!(status.success(), "failed to build nbtdoc binary at {}", bin.display());

	bin
}
