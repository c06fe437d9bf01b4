use assert_cmd::cargo::cargo_bin_cmd;
use tempfile::TempDir;

fn run_help(home: &TempDir, args: &[&str]) {
    let mut cmd = cargo_bin_cmd!("formdiff");
    cmd.env("HOME", home.path())
        .args(args)
        .arg("--help")
        .assert()
        .success();
}

#[test]
fn every_cli_command_has_help_path() {
    let home = TempDir::new().expect("temp home");

    // top-level
    run_help(&home, &[]);

    run_help(&home, &["compare"]);
    run_help(&home, &["run"]);
    run_help(&home, &["show"]);
}
