use std::{fs, path::PathBuf};

use stencil::{RenderOptions, Rendered, error::Error, render_file};
use tempfile::TempDir;

fn write_units(units: &[(&str, &str)]) -> TempDir {
    let dir = tempfile::tempdir().unwrap();
    for (name, source) in units {
        let path = dir.path().join(name);
        if let Some(parent) = path.parent() {
            fs::create_dir_all(parent).unwrap();
        }
        fs::write(path, source).unwrap();
    }
    dir
}

fn render_entry(dir: &TempDir, entry: &str) -> Result<Rendered, Error> {
    render_file(&dir.path().join(entry), &RenderOptions::default())
}

#[test]
fn child_definitions_are_visible_to_the_entry() {
    let dir = write_units(&[("main.tmpl",
                             "import template.child\nfn render() { \"{{greet('world')}}!\" }"),
                            ("child.tmpl", "fn greet(name) { \"hello {{name}}\" }")]);

    assert_eq!(render_entry(&dir, "main.tmpl").unwrap().output, "hello world!");
}

#[test]
fn units_run_once_in_a_diamond() {
    let dir = write_units(&[("main.tmpl",
                             "count = 0\nimport left\nimport right\nfn render() { \"{{count}}\" }"),
                            ("left.tmpl", "import template.base"),
                            ("right.tmpl", "import template.base"),
                            ("base.tmpl", "count += 1")]);

    assert_eq!(render_entry(&dir, "main.tmpl").unwrap().output, "1");
}

#[test]
fn later_units_win_on_collision() {
    let dir = write_units(&[("main.tmpl",
                             "name = \"main\"\nimport first\nimport second\nfn render() { \"{{name}} {{seen}}\" }"),
                            ("first.tmpl", "seen = name\nname = \"first\""),
                            ("second.tmpl", "name = \"second\"")]);

    assert_eq!(render_entry(&dir, "main.tmpl").unwrap().output, "second main");
}

#[test]
fn importing_the_entry_does_not_rerun_it() {
    let dir = write_units(&[("main.tmpl",
                             "runs = 0\nruns += 1\nimport helper\nfn render() { \"{{runs}}\" }"),
                            ("helper.tmpl", "import template.main")]);

    assert_eq!(render_entry(&dir, "main.tmpl").unwrap().output, "1");
}

#[test]
fn include_directories_are_searched_after_the_entry_directory() {
    let entry = write_units(&[("main.tmpl", "import lib\nimport shared\nfn render() { \"{{lib}} {{shared}}\" }"),
                              ("lib.tmpl", "lib = \"local\"")]);
    let include = write_units(&[("lib.tmpl", "lib = \"included\""),
                                ("shared.tmpl", "shared = \"included\"")]);
    let options = RenderOptions { include_dirs: vec![include.path().to_path_buf()] };

    let rendered = render_file(&entry.path().join("main.tmpl"), &options).unwrap();
    assert_eq!(rendered.output, "local included");
}

#[test]
fn load_builtin_accepts_any_name() {
    let dir = write_units(&[("main.tmpl", "load(\"my-part\")\nfn render() { part }"),
                            ("my-part.tmpl", "part = \"loaded\"")]);

    assert_eq!(render_entry(&dir, "main.tmpl").unwrap().output, "loaded");
}

#[test]
fn missing_unit_names_the_unit() {
    let dir = write_units(&[("main.tmpl", "import template.absent\nfn render() { 1 }")]);

    let error = render_entry(&dir, "main.tmpl").unwrap_err();
    let message = error.to_string();

    assert!(message.contains("import template, file not found: absent.tmpl"), "{message}");
    assert!(message.contains("unit 'template.absent'"), "{message}");
}

#[test]
fn compile_error_in_an_imported_unit_is_reported_with_its_file() {
    let dir = write_units(&[("main.tmpl", "import bad\nfn render() { 1 }"),
                            ("bad.tmpl", "x = 1\ny = \"oops }} here\"")]);

    let message = render_entry(&dir, "main.tmpl").unwrap_err().to_string();
    let bad_file = dir.path().join("bad.tmpl").display().to_string();

    assert!(message.contains(&format!("File \"{bad_file}\", line 2, in string")), "{message}");
    assert!(message.contains("SyntaxError: unbalanced interpolation braces"), "{message}");
}

#[test]
fn host_syntax_error_reports_file_and_line() {
    let dir = write_units(&[("main.tmpl", "fn render() {\n  x = (1 +\n}")]);

    let error = render_entry(&dir, "main.tmpl").unwrap_err();

    assert!(matches!(error, Error::Parse { .. }));
    assert!(error.to_string().contains("SyntaxError:"));
}

#[test]
fn render_failure_carries_a_traceback() {
    let dir = write_units(&[("main.tmpl", "import helpers\nfn render() {\n  \"start\"\n  explode()\n}"),
                            ("helpers.tmpl", "fn explode() {\n  return 1 / 0\n}")]);

    let message = render_entry(&dir, "main.tmpl").unwrap_err().to_string();
    let main = dir.path().join("main.tmpl").display().to_string();
    let helpers = dir.path().join("helpers.tmpl").display().to_string();

    let expected = format!("Traceback (most recent call last):\n  File \"{main}\", line 4, in render\n  File \"{helpers}\", line 2, in explode\nError on line 2: Division by zero.");
    assert_eq!(message, expected);
}

#[test]
fn runtime_error_while_loading_aborts() {
    let dir = write_units(&[("main.tmpl", "import broken\nfn render() { 1 }"),
                            ("broken.tmpl", "x = missing_name")]);

    let error = render_entry(&dir, "main.tmpl").unwrap_err();

    assert!(matches!(error, Error::Runtime { .. }));
    assert!(error.to_string().contains("Unknown variable 'missing_name'"));
}

#[test]
fn load_failure_traceback_lists_unit_frames() {
    let dir = write_units(&[("main.tmpl", "x = 1\nimport broken\nfn render() { 1 }"),
                            ("broken.tmpl", "y = 2\nz = missing_name")]);

    let message = render_entry(&dir, "main.tmpl").unwrap_err().to_string();
    let main = dir.path().join("main.tmpl").display().to_string();
    let broken = dir.path().join("broken.tmpl").display().to_string();

    let expected = format!("Traceback (most recent call last):\n  File \"{main}\", line 2, in <unit>\n  File \"{broken}\", line 2, in <unit>\nError on line 2: Importing 'broken' failed:\nError on line 2: Unknown variable 'missing_name'.");
    assert_eq!(message, expected);
}

#[test]
fn discarded_gathers_are_collected_as_warnings() {
    let dir = write_units(&[("main.tmpl", "fn pick() {\n  \"noise\"\n  return \"value\"\n}\nfn render() { pick() }")]);

    let rendered = render_entry(&dir, "main.tmpl").unwrap();

    assert_eq!(rendered.output, "value");
    assert_eq!(rendered.warnings.len(), 1);
    assert!(rendered.warnings[0].contains("from function pick"));
}

#[test]
fn missing_entry_file_is_an_error() {
    let error = render_file(&PathBuf::from("/definitely/not/here.tmpl"),
                            &RenderOptions::default()).unwrap_err();

    assert!(matches!(error, Error::Load(_)));
}
