use std::fs;

use stencil::{RenderOptions, render_file};
use walkdir::WalkDir;

#[test]
fn demo_templates_render_as_expected() {
    let mut count = 0;

    for entry in
        WalkDir::new("demos").into_iter()
                             .filter_map(Result::ok)
                             .filter(|e| e.path().extension().is_some_and(|ext| ext == "tmpl"))
    {
        let path = entry.path();
        let expected_path = path.with_extension("expected");
        if !expected_path.is_file() {
            // imported by another demo
            continue;
        }

        count += 1;
        let expected = fs::read_to_string(&expected_path).unwrap_or_else(|e| {
                                                             panic!("Failed to read {expected_path:?}: {e}")
                                                         });
        match render_file(path, &RenderOptions::default()) {
            Ok(rendered) => assert_eq!(rendered.output, expected, "demo {path:?} rendered differently"),
            Err(e) => panic!("Demo {path:?} failed:\n{e}"),
        }
    }

    assert!(count > 0, "No demo templates found in demos/");
}
