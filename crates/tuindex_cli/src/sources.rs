//! `tuindex sources`: list known source files and their compile arguments.

use std::path::PathBuf;

use serde::Serialize;
use tuindex_index::CompilationDatabase;

use crate::pipeline::Session;
use crate::{GlobalArgs, ReportFormat, SourcesArgs};

/// A source file and the arguments it is parsed with.
#[derive(Debug, Serialize)]
pub struct SourceEntry {
    /// Absolute path of the source file.
    pub file: PathBuf,
    /// Normalized compile arguments.
    pub arguments: Vec<String>,
}

/// Runs the `tuindex sources` command.
pub fn run(args: &SourcesArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let session = Session::resolve(global)?;
    let db = session.database(global)?;
    let entries = collect(&db)?;

    match args.format {
        ReportFormat::Text => print!("{}", render_text(&entries)?),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&entries)?),
    }
    Ok(0)
}

/// Lists every source file in provider order.
pub fn collect(db: &dyn CompilationDatabase) -> Result<Vec<SourceEntry>, Box<dyn std::error::Error>> {
    let mut entries = Vec::new();
    for file in db.source_files()? {
        let arguments = db.compile_args(&file)?;
        entries.push(SourceEntry { file, arguments });
    }
    Ok(entries)
}

/// One line per file: the path followed by its shell-quoted arguments.
pub fn render_text(entries: &[SourceEntry]) -> Result<String, Box<dyn std::error::Error>> {
    let mut out = String::new();
    for entry in entries {
        let args = shlex::try_join(entry.arguments.iter().map(String::as_str))?;
        if args.is_empty() {
            out.push_str(&format!("{}\n", entry.file.display()));
        } else {
            out.push_str(&format!("{} {args}\n", entry.file.display()));
        }
    }
    Ok(out)
}

#[cfg(test)]
mod tests {
    use super::*;
    use tuindex_index::CompileCommands;

    const DB: &str = r#"[
        {"directory": "/p", "file": "a.cpp", "arguments": ["c++", "-DNAME=\"x y\"", "-c", "a.cpp"]},
        {"directory": "/p", "file": "gen.h", "arguments": ["c++", "gen.h"]},
        {"directory": "/p", "file": "b.c", "command": "cc -c b.c"}
    ]"#;

    #[test]
    fn collects_sources_only() {
        let db = CompileCommands::from_json(DB).unwrap();
        let entries = collect(&db).unwrap();
        let files: Vec<_> = entries.iter().map(|e| e.file.clone()).collect();
        assert_eq!(files, [PathBuf::from("/p/a.cpp"), PathBuf::from("/p/b.c")]);
        assert_eq!(entries[0].arguments, ["-DNAME=\"x y\""]);
        assert!(entries[1].arguments.is_empty());
    }

    #[test]
    fn text_quotes_arguments() {
        let db = CompileCommands::from_json(DB).unwrap();
        let text = render_text(&collect(&db).unwrap()).unwrap();
        let lines: Vec<_> = text.lines().collect();
        assert_eq!(lines.len(), 2);
        assert_eq!(
            shlex::split(lines[0]).unwrap(),
            ["/p/a.cpp", "-DNAME=\"x y\""]
        );
        assert_eq!(lines[1], "/p/b.c");
    }
}
