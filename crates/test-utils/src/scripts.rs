//! Fake `openscad` executables as shell scripts (unix only).

#![cfg(unix)]

use std::fs;
use std::os::unix::fs::PermissionsExt;
use std::path::{Path, PathBuf};

/// Write an executable `sh` script named `name` into `dir`.
pub fn write_script(dir: &Path, name: &str, body: &str) -> PathBuf {
    let path = dir.join(name);
    fs::write(&path, format!("#!/bin/sh\n{body}\n")).unwrap();
    fs::set_permissions(&path, fs::Permissions::from_mode(0o755)).unwrap();
    path
}

/// A stand-in for openscad: `$0 -o <out> <in>` copies a fake mesh to `<out>`
/// and exits 0.
pub fn fake_openscad(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "fake-openscad",
        r#"[ "$1" = "-o" ] || { echo "usage: $0 -o OUT IN" >&2; exit 2; }
[ -f "$3" ] || { echo "missing input $3" >&2; exit 3; }
printf 'solid fake\nendsolid fake\n' > "$2"
echo "rendered $3" >&2"#,
    )
}

/// A stand-in for openscad that rejects every input like a syntax error.
pub fn failing_openscad(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "failing-openscad",
        r#"echo "ERROR: Parser error in file $3, line 1: syntax error" >&2
exit 1"#,
    )
}

/// Like [`fake_openscad`], but writes a sibling file with default permissions
/// and renames it over `<out>`, the way atomic-save tools do.
pub fn renaming_openscad(dir: &Path) -> PathBuf {
    write_script(
        dir,
        "renaming-openscad",
        r#"umask 022
printf 'solid fake\nendsolid fake\n' > "$2.part"
mv "$2.part" "$2""#,
    )
}
