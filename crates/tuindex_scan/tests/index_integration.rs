//! Integration tests driving a [`SourceIndex`] with the include scanner over
//! an on-disk project and its `compile_commands.json`.

use std::cell::RefCell;
use std::fs;
use std::path::{Path, PathBuf};
use std::rc::Rc;
use std::time::{Duration, SystemTime};

use tempfile::TempDir;
use tuindex_common::Verbosity;
use tuindex_index::{CompileCommands, SourceIndex, UnsavedFiles};
use tuindex_scan::IncludeScanner;

// ---------------------------------------------------------------------------
// Helper: a small project on disk
// ---------------------------------------------------------------------------

struct Project {
    dir: TempDir,
}

impl Project {
    /// Lays out `b.cpp` (no includes), `a.cpp` (includes `util.h`), and
    /// `include/util.h`, with a database listing `b.cpp` before `a.cpp`.
    fn new() -> Self {
        let project = Self {
            dir: tempfile::tempdir().unwrap(),
        };
        project.write("src/b.cpp", "int b() { return 0; }\n");
        project.write("src/a.cpp", "#include <util.h>\nint a() { return util(); }\n");
        project.write("include/util.h", "#pragma once\nint util();\n");
        project.write("include/extra.h", "int extra();\n");

        let root = project.root().display().to_string();
        let db = format!(
            r#"[
  {{"directory": "{root}", "file": "src/b.cpp", "arguments": ["c++", "-Iinclude", "-c", "src/b.cpp"]}},
  {{"directory": "{root}", "file": "src/a.cpp", "arguments": ["c++", "-Iinclude", "-c", "src/a.cpp"]}}
]"#
        );
        project.write("compile_commands.json", &db);
        project
    }

    fn root(&self) -> &Path {
        self.dir.path()
    }

    fn path(&self, rel: &str) -> PathBuf {
        self.root().join(rel)
    }

    fn write(&self, rel: &str, text: &str) {
        let path = self.path(rel);
        fs::create_dir_all(path.parent().unwrap()).unwrap();
        fs::write(path, text).unwrap();
    }

    /// Pushes the file's modification time forward so the change is visible
    /// regardless of timestamp granularity.
    fn bump_mtime(&self, rel: &str) {
        let file = fs::File::options().write(true).open(self.path(rel)).unwrap();
        file.set_modified(SystemTime::now() + Duration::from_secs(60))
            .unwrap();
    }

    fn database(&self) -> CompileCommands {
        CompileCommands::load(&self.path("compile_commands.json")).unwrap()
    }

    fn index(&self) -> SourceIndex<IncludeScanner> {
        SourceIndex::initialize(IncludeScanner::new(), self.database(), Verbosity::QUIET)
    }
}

// ---------------------------------------------------------------------------
// Source files
// ---------------------------------------------------------------------------

#[test]
fn source_unit_sees_include_path_from_database() {
    let project = Project::new();
    let mut index = project.index();

    let tu = index
        .translation_unit(&project.path("src/a.cpp"))
        .unwrap()
        .expect("a.cpp parses");
    assert!(tu.includes_file(&project.path("include/util.h")));
    assert!(!tu.includes_file(&project.path("include/extra.h")));
    assert_eq!(index.len(), 1);
}

#[test]
fn unchanged_source_is_reused() {
    let project = Project::new();
    let mut index = project.index();
    let a = project.path("src/a.cpp");

    let first = index.translation_unit(&a).unwrap().unwrap().unit().id();
    let second = index.translation_unit(&a).unwrap().unwrap().unit().id();
    assert_eq!(first, second);
}

#[test]
fn modified_source_is_reparsed_in_place() {
    let project = Project::new();
    let mut index = project.index();
    let a = project.path("src/a.cpp");

    let id = index.translation_unit(&a).unwrap().unwrap().unit().id();

    project.write(
        "src/a.cpp",
        "#include <util.h>\n#include <extra.h>\nint a() { return util(); }\n",
    );
    project.bump_mtime("src/a.cpp");

    let tu = index.translation_unit(&a).unwrap().unwrap();
    assert_eq!(tu.unit().id(), id);
    assert!(tu.includes_file(&project.path("include/extra.h")));
}

#[test]
fn changed_arguments_rebuild_the_unit() {
    let project = Project::new();
    let a = project.path("src/a.cpp");
    let db = Rc::new(RefCell::new(project.database()));
    let mut index =
        SourceIndex::initialize(IncludeScanner::new(), Rc::clone(&db), Verbosity::QUIET);

    let id = index.translation_unit(&a).unwrap().unwrap().unit().id();

    let root = project.root().display();
    project.write(
        "compile_commands.json",
        &format!(
            r#"[{{"directory": "{root}", "file": "src/a.cpp", "arguments": ["c++", "-Iinclude", "-DNEW", "-c", "src/a.cpp"]}}]"#
        ),
    );
    db.borrow_mut().reload().unwrap();

    let tu = index.translation_unit(&a).unwrap().unwrap();
    assert_ne!(tu.unit().id(), id);
    assert!(tu.unit().args().contains(&"-DNEW".to_string()));
}

#[test]
fn missing_source_yields_no_unit() {
    let project = Project::new();
    let mut index = project.index();
    assert!(index
        .translation_unit(&project.path("src/gone.cpp"))
        .unwrap()
        .is_none());
    assert!(index.is_empty());
}

// ---------------------------------------------------------------------------
// Headers
// ---------------------------------------------------------------------------

#[test]
fn cold_header_lookup_keeps_only_the_includer() {
    let project = Project::new();
    let mut index = project.index();
    let header = project.path("include/util.h");

    let tu = index.translation_unit(&header).unwrap().unwrap();
    assert_eq!(tu.path(), project.path("src/a.cpp"));

    assert!(index.contains(&project.path("src/a.cpp")));
    assert!(!index.contains(&project.path("src/b.cpp")));
    assert_eq!(index.len(), 1);
}

#[test]
fn warm_header_lookup_uses_the_cache() {
    let project = Project::new();
    let mut index = project.index();
    let a = project.path("src/a.cpp");
    let b = project.path("src/b.cpp");

    let id = index.translation_unit(&a).unwrap().unwrap().unit().id();
    index.prime(&b).unwrap();

    let tu = index
        .translation_unit(&project.path("include/util.h"))
        .unwrap()
        .unwrap();
    assert_eq!(tu.unit().id(), id);
    assert_eq!(index.len(), 2);
}

#[test]
fn header_nobody_includes_yields_no_unit() {
    let project = Project::new();
    let mut index = project.index();
    index.prime(&project.path("src/b.cpp")).unwrap();

    assert!(index
        .translation_unit(&project.path("include/extra.h"))
        .unwrap()
        .is_none());
    // Entries cached before the search survive it.
    assert!(index.contains(&project.path("src/b.cpp")));
    assert!(!index.contains(&project.path("src/a.cpp")));
}

#[test]
fn build_relative_database_and_dotted_queries_agree() {
    let project = Project::new();
    let root = project.root().display().to_string();
    project.write(
        "build/compile_commands.json",
        &format!(
            r#"[{{"directory": "{root}/build", "file": "../src/a.cpp", "arguments": ["c++", "-I../include", "-c", "../src/a.cpp"]}}]"#
        ),
    );
    let db = CompileCommands::load(&project.path("build/compile_commands.json")).unwrap();
    let mut index = SourceIndex::initialize(IncludeScanner::new(), db, Verbosity::QUIET);

    let a = project.path("src/a.cpp");
    let tu = index
        .translation_unit(&project.path("src/../include/util.h"))
        .unwrap()
        .expect("dotted header spelling resolves");
    assert_eq!(tu.path(), a);
    assert!(tu.unit().args().contains(&format!("-I{root}/include")));

    let id = index.translation_unit(&a).unwrap().unwrap().unit().id();
    let dotted = index
        .translation_unit(&project.path("build/../src/a.cpp"))
        .unwrap()
        .unwrap()
        .unit()
        .id();
    assert_eq!(id, dotted);
    assert_eq!(index.len(), 1);
}

// ---------------------------------------------------------------------------
// Unsaved buffers
// ---------------------------------------------------------------------------

#[test]
fn unsaved_buffer_adds_an_include() {
    let project = Project::new();
    let b = project.path("src/b.cpp");
    let unsaved = Rc::new(RefCell::new(UnsavedFiles::new()));
    let mut index = project.index().with_overlays(Rc::clone(&unsaved));

    assert!(!index
        .translation_unit(&b)
        .unwrap()
        .unwrap()
        .includes_file(&project.path("include/extra.h")));

    unsaved
        .borrow_mut()
        .update(b.clone(), "#include <extra.h>\nint b() { return extra(); }\n");
    project.bump_mtime("src/b.cpp");

    let tu = index.translation_unit(&b).unwrap().unwrap();
    assert!(tu.includes_file(&project.path("include/extra.h")));
}

#[test]
fn provider_in_use_is_reported() {
    let project = Project::new();
    let unsaved = Rc::new(RefCell::new(UnsavedFiles::new()));
    let mut index = project.index().with_overlays(Rc::clone(&unsaved));

    let _guard = unsaved.borrow_mut();
    let err = index
        .translation_unit(&project.path("src/a.cpp"))
        .unwrap_err();
    assert!(err.to_string().contains("unsaved file provider unavailable"));
}

// ---------------------------------------------------------------------------
// Lifecycle
// ---------------------------------------------------------------------------

#[test]
fn shutdown_releases_everything() {
    let project = Project::new();
    let mut index = project.index();
    index.prime(&project.path("src/a.cpp")).unwrap();
    index.prime(&project.path("src/b.cpp")).unwrap();

    assert!(index.shutdown().is_empty());
    assert!(index.is_empty());
    assert!(index
        .translation_unit(&project.path("src/a.cpp"))
        .unwrap()
        .is_none());
}
