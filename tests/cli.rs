use std::{fs, process::Command};

fn stencil() -> Command {
    let mut command = Command::new(env!("CARGO_BIN_EXE_stencil"));
    command.env_remove("STENCIL_PATH").env_remove("RUST_LOG");
    command
}

#[test]
fn successful_render_prints_output_without_newline() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("main.tmpl");
    fs::write(&entry, "fn render() { 1; \"x\" }").unwrap();

    let output = stencil().arg(&entry).output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "1x");
}

#[test]
fn raising_render_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("main.tmpl");
    fs::write(&entry, "fn render() {\n  assert(false, \"nope\")\n}").unwrap();

    let output = stencil().arg(&entry).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(output.stdout.is_empty());
    assert!(stderr.contains("Traceback (most recent call last):"), "{stderr}");
    assert!(stderr.contains("Assertion failed: nope"), "{stderr}");
}

#[test]
fn missing_render_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("main.tmpl");
    fs::write(&entry, "x = 1").unwrap();

    let output = stencil().arg(&entry).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("no template render function defined"));
}

#[test]
fn include_flag_and_environment_extend_the_search_path() {
    let entry_dir = tempfile::tempdir().unwrap();
    let flag_dir = tempfile::tempdir().unwrap();
    let env_dir = tempfile::tempdir().unwrap();
    let entry = entry_dir.path().join("main.tmpl");
    fs::write(&entry, "import a\nimport b\nfn render() { \"{{a}}{{b}}\" }").unwrap();
    fs::write(flag_dir.path().join("a.tmpl"), "a = \"A\"").unwrap();
    fs::write(env_dir.path().join("b.tmpl"), "b = \"B\"").unwrap();

    let output = stencil().arg("-I")
                          .arg(flag_dir.path())
                          .arg(&entry)
                          .env("STENCIL_PATH", env_dir.path())
                          .output()
                          .unwrap();

    assert!(output.status.success(), "{}", String::from_utf8_lossy(&output.stderr));
    assert_eq!(String::from_utf8_lossy(&output.stdout), "AB");
}

#[test]
fn discarded_gather_warning_goes_to_stderr() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("main.tmpl");
    fs::write(&entry, "fn render() {\n  \"lost\"\n  return \"kept\"\n}").unwrap();

    let output = stencil().arg(&entry).output().unwrap();

    assert!(output.status.success());
    assert_eq!(String::from_utf8_lossy(&output.stdout), "kept");
    assert!(String::from_utf8_lossy(&output.stderr).contains("discarding gathered value"));
}

#[test]
fn usage_errors_exit_with_two() {
    let output = stencil().output().unwrap();

    assert_eq!(output.status.code(), Some(2));
}

#[test]
fn missing_file_exits_with_failure() {
    let output = stencil().arg("/no/such/template.tmpl").output().unwrap();

    assert_eq!(output.status.code(), Some(1));
}

#[cfg(target_os = "linux")]
#[test]
fn failing_stdout_exits_with_failure() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("main.tmpl");
    fs::write(&entry, "fn render() { \"text\" }").unwrap();
    let full = fs::OpenOptions::new().write(true).open("/dev/full").unwrap();

    let output = stencil().arg(&entry).stdout(full).output().unwrap();

    assert_eq!(output.status.code(), Some(1));
    assert!(String::from_utf8_lossy(&output.stderr).contains("Failed to write the rendered output"));
}

#[test]
fn runaway_recursion_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let entry = dir.path().join("main.tmpl");
    fs::write(&entry, "fn f(n) { return f(n + 1) }\nfn render() { return f(0) }").unwrap();

    let output = stencil().arg(&entry).output().unwrap();
    let stderr = String::from_utf8_lossy(&output.stderr);

    assert_eq!(output.status.code(), Some(1));
    assert!(stderr.contains("Maximum call depth of 100 exceeded"), "{stderr}");
    assert!(stderr.contains("in f"), "{stderr}");
}
