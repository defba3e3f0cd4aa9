use std::{
    cell::Cell,
    collections::HashMap,
    fs,
    path::{Path, PathBuf},
    rc::Rc,
};

use tracing::debug;

use crate::{
    error::{Error, LoadError},
    interpreter::evaluator::core::Context,
    template::compile,
};

/// File extension of template units.
pub const EXTENSION: &str = "tmpl";

/// Lifecycle of a cached unit.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum UnitState {
    /// Registered and executing its top level.
    Compiling,
    /// Its top level ran to completion.
    Executed,
}

/// A loaded template unit.
#[derive(Debug)]
pub struct Unit {
    /// The cache key the unit is registered under.
    pub name: String,
    /// The file the unit was read from.
    pub path: PathBuf,
    state:    Cell<UnitState>,
}

impl Unit {
    /// Where the unit is in its lifecycle.
    #[must_use]
    pub fn state(&self) -> UnitState {
        self.state.get()
    }
}

/// Resolves unit names to files and caches loaded units.
///
/// The cache lives as long as the loader, so every unit executes at most
/// once per render no matter how many units import it.
#[derive(Debug, Default)]
pub struct Loader {
    search_dirs: Vec<PathBuf>,
    cache:       HashMap<String, Rc<Unit>>,
}

/// Strips the namespace prefix from a dotted unit name.
///
/// # Example
/// ```
/// use stencil::template::loader::normalize_name;
///
/// assert_eq!(normalize_name("template.child"), "child");
/// assert_eq!(normalize_name("template.x.y"), "x.y");
/// assert_eq!(normalize_name("child"), "child");
/// ```
#[must_use]
pub fn normalize_name(name: &str) -> &str {
    name.split_once('.').map_or(name, |(_, rest)| rest)
}

impl Loader {
    /// Creates a loader searching the given directories in order.
    #[must_use]
    pub fn new(search_dirs: Vec<PathBuf>) -> Self {
        Self { search_dirs,
               cache: HashMap::new() }
    }

    /// Makes `dir` the first directory searched.
    pub fn prepend_dir(&mut self, dir: PathBuf) {
        self.search_dirs.insert(0, dir);
    }

    /// The directories searched, in order.
    #[must_use]
    pub fn search_dirs(&self) -> &[PathBuf] {
        &self.search_dirs
    }

    /// Finds the file of a unit.
    ///
    /// The first search directory holding `<key>.tmpl` wins.
    ///
    /// # Errors
    /// `LoadError::NotFound` listing every directory searched.
    pub fn resolve(&self, name: &str) -> Result<PathBuf, LoadError> {
        let file = format!("{}.{EXTENSION}", normalize_name(name));

        self.search_dirs
            .iter()
            .map(|dir| dir.join(&file))
            .find(|candidate| candidate.is_file())
            .ok_or_else(|| LoadError::NotFound { name: name.to_string(),
                                                 file,
                                                 searched: self.search_dirs.clone() })
    }

    /// Returns the cached unit registered under `key`.
    #[must_use]
    pub fn cached(&self, key: &str) -> Option<Rc<Unit>> {
        self.cache.get(key).cloned()
    }

    /// Number of cached units.
    #[must_use]
    pub fn len(&self) -> usize {
        self.cache.len()
    }

    /// Returns `true` if nothing was loaded.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.cache.is_empty()
    }
}

/// Loads a unit by name into the context's shared namespace.
///
/// A cached unit is returned as is, without running anything. Otherwise the
/// unit is resolved, compiled and executed, and the same `Rc` is returned
/// by every later load of that name.
///
/// # Errors
/// Resolution, read, compile and execution failures. A failed unit is not
/// cached.
pub fn load(ctx: &mut Context, name: &str) -> Result<Rc<Unit>, Error> {
    let key = normalize_name(name);
    if let Some(unit) = ctx.loader.cached(key) {
        debug!(unit = key, state = ?unit.state(), "unit already loaded");
        return Ok(unit);
    }

    let path = ctx.loader.resolve(name)?;
    let source = read_source(&path)?;
    run_unit(ctx, key, path, &source)
}

/// Loads the entry template of a render.
///
/// The entry's directory becomes the first search directory and the unit is
/// registered under its file stem, so units importing it see the cached
/// entry.
///
/// # Errors
/// Read, compile and execution failures.
pub fn load_entry(ctx: &mut Context, path: &Path) -> Result<Rc<Unit>, Error> {
    let dir = match path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent.to_path_buf(),
        _ => PathBuf::from("."),
    };
    ctx.loader.prepend_dir(dir);

    let key = path.file_stem()
                  .map(|stem| stem.to_string_lossy().into_owned())
                  .unwrap_or_default();
    let source = read_source(path)?;
    run_unit(ctx, &key, path.to_path_buf(), &source)
}

/// Runs template source that does not come from a file.
///
/// # Errors
/// Compile and execution failures.
pub fn load_source(ctx: &mut Context, key: &str, source: &str) -> Result<Rc<Unit>, Error> {
    run_unit(ctx, key, PathBuf::from(key), source)
}

fn read_source(path: &Path) -> Result<String, LoadError> {
    fs::read_to_string(path).map_err(|source| LoadError::Io { path: path.to_path_buf(),
                                                              source })
}

fn run_unit(ctx: &mut Context, key: &str, path: PathBuf, source: &str) -> Result<Rc<Unit>, Error> {
    let file = path.display().to_string();
    debug!(unit = key, file = %file, "compiling unit");
    let statements = compile(source, &file)?;

    let unit = Rc::new(Unit { name: key.to_string(),
                              path,
                              state: Cell::new(UnitState::Compiling) });
    ctx.loader.cache.insert(key.to_string(), Rc::clone(&unit));

    if let Err(error) = ctx.exec_unit(&statements, &file) {
        debug!(unit = key, "unit failed, removing it from the cache");
        ctx.loader.cache.remove(key);
        return Err(error.into());
    }

    unit.state.set(UnitState::Executed);
    debug!(unit = key, "unit executed");
    Ok(unit)
}

#[cfg(test)]
mod tests {
    use std::fs;

    use tempfile::TempDir;

    use super::*;
    use crate::interpreter::value::core::Value;

    fn write_units(units: &[(&str, &str)]) -> TempDir {
        let dir = tempfile::tempdir().unwrap();
        for (name, source) in units {
            fs::write(dir.path().join(format!("{name}.{EXTENSION}")), source).unwrap();
        }
        dir
    }

    fn context_for(dir: &TempDir) -> Context {
        Context::new(Loader::new(vec![dir.path().to_path_buf()]))
    }

    #[test]
    fn resolve_prefers_earlier_directories() {
        let first = write_units(&[("a", "x = 1")]);
        let second = write_units(&[("a", "x = 2"), ("b", "y = 1")]);
        let loader = Loader::new(vec![first.path().to_path_buf(), second.path().to_path_buf()]);

        assert_eq!(loader.resolve("a").unwrap(), first.path().join("a.tmpl"));
        assert_eq!(loader.resolve("template.b").unwrap(), second.path().join("b.tmpl"));
    }

    #[test]
    fn missing_unit_lists_searched_directories() {
        let dir = write_units(&[]);
        let loader = Loader::new(vec![dir.path().to_path_buf()]);

        let Err(LoadError::NotFound { name, file, searched }) = loader.resolve("template.nope")
        else {
            panic!("expected NotFound");
        };
        assert_eq!(name, "template.nope");
        assert_eq!(file, "nope.tmpl");
        assert_eq!(searched, vec![dir.path().to_path_buf()]);
    }

    #[test]
    fn loading_twice_returns_the_same_unit() {
        let dir = write_units(&[("counter", "count = 1")]);
        let mut ctx = context_for(&dir);

        let first = load(&mut ctx, "template.counter").unwrap();
        ctx.namespace.insert("count", Value::Integer(5));
        let second = load(&mut ctx, "counter").unwrap();

        assert!(Rc::ptr_eq(&first, &second));
        assert_eq!(first.state(), UnitState::Executed);
        assert_eq!(ctx.namespace.get("count"), Some(&Value::Integer(5)));
        assert_eq!(ctx.loader.len(), 1);
    }

    #[test]
    fn compile_errors_cache_nothing() {
        let dir = write_units(&[("broken", "x = \"{{\"")]);
        let mut ctx = context_for(&dir);

        assert!(matches!(load(&mut ctx, "broken"), Err(Error::Template(_))));
        assert!(ctx.loader.is_empty());
    }

    #[test]
    fn failing_units_are_removed_from_the_cache() {
        let dir = write_units(&[("fails", "x = 1\nassert(false)")]);
        let mut ctx = context_for(&dir);

        assert!(matches!(load(&mut ctx, "fails"), Err(Error::Runtime { .. })));
        assert!(ctx.loader.cached("fails").is_none());
        assert_eq!(ctx.namespace.get("x"), Some(&Value::Integer(1)));
    }

    #[test]
    fn entry_is_registered_under_its_stem() {
        let dir = write_units(&[("main", "import template.helper\nx = 1"),
                                ("helper", "import main\ny = 2")]);
        let mut ctx = Context::default();

        let entry = load_entry(&mut ctx, &dir.path().join("main.tmpl")).unwrap();

        assert_eq!(entry.name, "main");
        assert_eq!(ctx.loader.search_dirs()[0], dir.path());
        assert_eq!(ctx.loader.len(), 2);
        assert_eq!(ctx.namespace.get("y"), Some(&Value::Integer(2)));
    }
}
