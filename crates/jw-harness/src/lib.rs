#![forbid(unsafe_code)]

//! Text snapshots of rendered frames.
//!
//! A frame is flattened to one line per row and compared with
//! `tests/snapshots/<name>.snap` under the calling crate. Trailing blanks
//! on each line and trailing empty lines are ignored, so snapshot files
//! stay readable. Styling is lost in the text; [`reversed_cells`] recovers
//! where the caret and focus highlight were drawn.
//!
//! `BLESS=1 cargo test` rewrites the snapshot files from the current
//! output.

use std::fmt::Write as _;
use std::fs;
use std::io;
use std::path::PathBuf;

use jw_render::buffer::Buffer;
use jw_render::cell::StyleFlags;

/// Rows of `buf` joined by `\n`, empty cells as spaces and wide
/// characters at their display width.
pub fn buffer_to_text(buf: &Buffer) -> String {
    (0..buf.height())
        .map(|y| row_string(buf, y))
        .collect::<Vec<_>>()
        .join("\n")
}

fn row_string(buf: &Buffer, y: u16) -> String {
    buf.row_cells(y)
        .iter()
        .filter(|cell| !cell.is_continuation())
        .map(|cell| cell.content.as_char().unwrap_or(' '))
        .collect()
}

/// Row `y` without trailing blanks; empty past the last row.
pub fn row_text(buf: &Buffer, y: u16) -> String {
    if y >= buf.height() {
        return String::new();
    }
    row_string(buf, y).trim_end().to_owned()
}

/// Every `(x, y)` drawn in reverse video, row by row.
pub fn reversed_cells(buf: &Buffer) -> Vec<(u16, u16)> {
    (0..buf.height())
        .flat_map(move |y| {
            buf.row_cells(y)
                .iter()
                .zip(0u16..)
                .filter(|(cell, _)| cell.attrs.contains(StyleFlags::REVERSE))
                .map(move |(_, x)| (x, y))
        })
        .collect()
}

fn canonical(text: &str) -> String {
    let mut lines: Vec<&str> = text.lines().map(str::trim_end).collect();
    while lines.last().is_some_and(|line| line.is_empty()) {
        lines.pop();
    }
    lines.join("\n")
}

/// Numbered listing of the lines that differ, or `None` when equal.
pub fn describe_mismatch(expected: &str, actual: &str) -> Option<String> {
    let expected: Vec<&str> = expected.lines().collect();
    let actual: Vec<&str> = actual.lines().collect();
    let mut report = String::new();
    for row in 0..expected.len().max(actual.len()) {
        let (want, got) = (expected.get(row), actual.get(row));
        if want != got {
            let _ = writeln!(report, "row {row:>3}  want |{}|", want.unwrap_or(&""));
            let _ = writeln!(report, "          got |{}|", got.unwrap_or(&""));
        }
    }
    (!report.is_empty()).then_some(report)
}

fn blessing() -> bool {
    std::env::var("BLESS").is_ok_and(|v| v == "1" || v.eq_ignore_ascii_case("true"))
}

/// Compare `buf` with the snapshot `name` stored under `manifest_dir`.
///
/// # Panics
///
/// Panics when the snapshot is missing or differs, unless blessing.
pub fn check_snapshot(name: &str, buf: &Buffer, manifest_dir: &str) {
    let path: PathBuf = [manifest_dir, "tests", "snapshots", format!("{name}.snap").as_str()]
        .iter()
        .collect();
    let actual = canonical(&buffer_to_text(buf));

    if blessing() {
        if let Some(dir) = path.parent() {
            fs::create_dir_all(dir).expect("create snapshot directory");
        }
        fs::write(&path, format!("{actual}\n")).expect("write snapshot");
        return;
    }

    let stored = match fs::read_to_string(&path) {
        Ok(text) => text,
        Err(e) if e.kind() == io::ErrorKind::NotFound => panic!(
            "snapshot '{name}' missing at {}; rerun with BLESS=1\n{actual}",
            path.display()
        ),
        Err(e) => panic!("reading snapshot {}: {e}", path.display()),
    };
    if let Some(report) = describe_mismatch(&canonical(&stored), &actual) {
        panic!(
            "snapshot '{name}' differs ({}x{}), BLESS=1 to accept\n{report}",
            buf.width(),
            buf.height()
        );
    }
}

/// `assert_snapshot!("name", &frame.buffer)` checks against
/// `tests/snapshots/name.snap` in the invoking crate.
#[macro_export]
macro_rules! assert_snapshot {
    ($name:expr, $buf:expr) => {
        $crate::check_snapshot($name, $buf, env!("CARGO_MANIFEST_DIR"))
    };
}
