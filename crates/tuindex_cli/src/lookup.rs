//! `tuindex lookup`: resolve files to the translation units that serve them.

use std::path::{Path, PathBuf};

use serde::Serialize;
use tuindex_index::SourceIndex;
use tuindex_scan::IncludeScanner;

use crate::pipeline::Session;
use crate::{GlobalArgs, LookupArgs, ReportFormat};

/// How one requested path was resolved.
#[derive(Debug, Serialize)]
pub struct Resolution {
    /// The path as requested.
    pub path: PathBuf,
    /// The source file whose translation unit serves `path`, if any.
    pub translation_unit: Option<PathBuf>,
    /// Files included by that translation unit.
    pub includes: Vec<PathBuf>,
}

/// Runs the `tuindex lookup` command.
///
/// Returns exit code 1 if any path has no translation unit.
pub fn run(args: &LookupArgs, global: &GlobalArgs) -> Result<i32, Box<dyn std::error::Error>> {
    let session = Session::resolve(global)?;
    let mut index = session.index(global)?;

    let resolutions = resolve_all(&mut index, &args.paths)?;
    match args.format {
        ReportFormat::Text => print!("{}", render_text(&resolutions)),
        ReportFormat::Json => println!("{}", serde_json::to_string_pretty(&resolutions)?),
    }

    let missing = resolutions
        .iter()
        .filter(|r| r.translation_unit.is_none())
        .count();
    if missing > 0 {
        if !global.quiet {
            eprintln!("error: {missing} file(s) have no translation unit");
        }
        return Ok(1);
    }
    Ok(0)
}

/// Resolves each path in turn, sharing one cache across requests.
pub fn resolve_all(
    index: &mut SourceIndex<IncludeScanner>,
    paths: &[PathBuf],
) -> Result<Vec<Resolution>, Box<dyn std::error::Error>> {
    let mut out = Vec::with_capacity(paths.len());
    for path in paths {
        let resolution = match index.translation_unit(path)? {
            Some(tu) => Resolution {
                path: path.clone(),
                translation_unit: Some(tu.path().to_path_buf()),
                includes: tu.unit().includes().map(Path::to_path_buf).collect(),
            },
            None => Resolution {
                path: path.clone(),
                translation_unit: None,
                includes: Vec::new(),
            },
        };
        out.push(resolution);
    }
    Ok(out)
}

/// Renders resolutions for a terminal.
pub fn render_text(resolutions: &[Resolution]) -> String {
    let mut out = String::new();
    for r in resolutions {
        match r.translation_unit {
            Some(ref tu) => {
                out.push_str(&format!("{} -> {}\n", r.path.display(), tu.display()));
                for include in &r.includes {
                    out.push_str(&format!("    {}\n", include.display()));
                }
            }
            None => out.push_str(&format!("{}: no translation unit\n", r.path.display())),
        }
    }
    out
}
