use std::path::{Path, PathBuf};

use tracing::{debug, info};

use crate::{
    error::Error,
    interpreter::{
        evaluator::{core::Context, utils::SOURCE_FILE},
        value::core::Value,
    },
    template::loader::{self, Loader},
};

/// Name of the function a template must define to be rendered.
pub const RENDER_FUNCTION: &str = "render";

/// Settings of one render.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RenderOptions {
    /// Directories searched for imported units after the entry's own
    /// directory, in order.
    pub include_dirs: Vec<PathBuf>,
}

/// The result of a successful render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Rendered {
    /// The stringified result of `render()`.
    pub output:   String,
    /// Gathered values that were discarded along the way.
    pub warnings: Vec<String>,
}

impl RenderOptions {
    fn context(&self) -> Context {
        Context::new(Loader::new(self.include_dirs.clone()))
    }
}

/// Renders a template file.
///
/// Executes the file as the entry unit, then calls its `render` function
/// with no arguments and returns the stringified result.
///
/// # Errors
/// Any compile, load or runtime failure, or `Error::MissingRender` when
/// the entry does not define a callable `render`. Runtime errors carry the
/// traceback of template frames they unwound through.
pub fn render_file(path: &Path, options: &RenderOptions) -> Result<Rendered, Error> {
    let mut ctx = options.context();
    info!(entry = %path.display(), "rendering template");

    let file = path.display().to_string();
    run(&mut ctx, &file, |ctx| loader::load_entry(ctx, path).map(drop))
}

/// Renders template source held in memory.
///
/// Imports are resolved against the include directories only.
///
/// # Example
/// ```
/// use stencil::{RenderOptions, render_source};
///
/// let source = "a = \"A\"\nfn render() { 1; \" Render a={{a}}.\" }";
/// let rendered = render_source(source, &RenderOptions::default()).unwrap();
///
/// assert_eq!(rendered.output, "1 Render a=A.");
/// ```
pub fn render_source(source: &str, options: &RenderOptions) -> Result<Rendered, Error> {
    let mut ctx = options.context();
    run(&mut ctx, SOURCE_FILE, |ctx| loader::load_source(ctx, SOURCE_FILE, source).map(drop))
}

fn run(ctx: &mut Context,
       file: &str,
       load: impl FnOnce(&mut Context) -> Result<(), Error>)
       -> Result<Rendered, Error> {
    ctx.trace.reset();
    let output = load(ctx).and_then(|()| call_render(ctx, file))
                          .map_err(|error| attach_traceback(ctx, error))?;

    Ok(Rendered { output,
                  warnings: ctx.warnings.iter().map(ToString::to_string).collect() })
}

/// Calls the entry's `render` function and stringifies its result.
///
/// # Errors
/// `Error::MissingRender` when `render` is unbound or not callable, or the
/// runtime error raised by `render`.
pub fn call_render(ctx: &mut Context, file: &str) -> Result<String, Error> {
    let Some(Value::Callable(render)) = ctx.namespace.get(RENDER_FUNCTION).cloned() else {
        return Err(Error::MissingRender { file: file.to_string() });
    };

    debug!(file, "calling render");
    let result = ctx.call(&render, Vec::new(), 0)?;
    Ok(result.to_string())
}

fn attach_traceback(ctx: &mut Context, error: Error) -> Error {
    match error {
        Error::Runtime { error, traceback } if traceback.is_empty() => {
            Error::Runtime { error,
                             traceback: ctx.trace.take() }
        },
        other => other,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn render(source: &str) -> Result<Rendered, Error> {
        render_source(source, &RenderOptions::default())
    }

    #[test]
    fn render_result_is_stringified() {
        assert_eq!(render("fn render() { return 42 }").unwrap().output, "42");
    }

    #[test]
    fn missing_render_is_reported() {
        let error = render("x = 1").unwrap_err();

        assert!(matches!(error, Error::MissingRender { .. }));
        assert_eq!(error.to_string(), "no template render function defined");
    }

    #[test]
    fn non_callable_render_is_reported() {
        assert!(matches!(render("render = 3").unwrap_err(), Error::MissingRender { .. }));
    }

    #[test]
    fn traceback_lists_template_frames_only() {
        let source = "fn helper(x) {\n  assert(x, \"bad\")\n}\nfn render() {\n  helper(false)\n}";
        let error = render(source).unwrap_err();

        let Error::Runtime { traceback, .. } = &error else {
            panic!("expected a runtime error, got {error:?}");
        };
        let frames = traceback.frames()
                              .iter()
                              .map(|frame| (frame.function.as_str(), frame.line))
                              .collect::<Vec<_>>();

        assert_eq!(frames, vec![("render", 5), ("helper", 2)]);
        assert!(error.to_string()
                     .ends_with("Error on line 2: Assertion failed: bad"));
    }

    #[test]
    fn discarded_gathers_become_warnings() {
        let rendered = render("fn render() {\n  \"lost\"\n  return \"kept\"\n}").unwrap();

        assert_eq!(rendered.output, "kept");
        assert_eq!(rendered.warnings,
                   vec!["template warning: discarding gathered value \"lost\" from function render".to_string()]);
    }
}
