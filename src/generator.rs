//! Project fixture generator.
//!
//! Writes a batch of `mixed_file_<NN>.txt` files filled with deterministic
//! mixed-language-looking lines. Test harnesses point parser tooling at the
//! generated tree; determinism keeps fixture runs byte-stable.

use std::fs;
use std::io::{self, Write};
use std::path::{Path, PathBuf};
use tracing::debug;

/// Line templates cycled through when filling a file.
const LINE_TEMPLATES: &[&str] = &[
    "procedure Step_{n} is",
    "begin",
    "   Value_{n} := Value_{n} + 1;",
    "end Step_{n};",
    "-- mixed fixture line {n}",
    "def helper_{n}():",
    "    return {n}",
    "int field_{n} = {n};",
];

/// Generate `num_files` fixture files in `out_dir`.
///
/// Each file holds exactly `lines_per_file` non-empty lines. Returns the
/// created paths in order. The output directory must already exist.
pub fn generate(
    out_dir: &Path,
    num_files: usize,
    lines_per_file: usize,
) -> io::Result<Vec<PathBuf>> {
    let mut created = Vec::with_capacity(num_files);

    for index in 0..num_files {
        let path = out_dir.join(format!("mixed_file_{:02}.txt", index));
        let mut file = fs::File::create(&path)?;

        for line_no in 0..lines_per_file {
            let template = LINE_TEMPLATES[(index + line_no) % LINE_TEMPLATES.len()];
            let line = template.replace("{n}", &(index * lines_per_file + line_no).to_string());
            writeln!(file, "{}", line)?;
        }

        debug!(path = %path.display(), lines = lines_per_file, "Fixture written");
        created.push(path);
    }

    Ok(created)
}
