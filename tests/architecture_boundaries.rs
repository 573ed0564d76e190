use std::fs;
use std::path::{Path, PathBuf};

fn rs_files(root: &Path) -> Vec<PathBuf> {
    let mut out = Vec::new();
    let mut stack = vec![root.to_path_buf()];
    while let Some(dir) = stack.pop() {
        let entries = match fs::read_dir(&dir) {
            Ok(entries) => entries,
            Err(_) => continue,
        };
        for entry in entries.flatten() {
            let path = entry.path();
            if path.is_dir() {
                stack.push(path);
            } else if path.extension().and_then(|s| s.to_str()) == Some("rs") {
                out.push(path);
            }
        }
    }
    out.sort();
    out
}

fn rel(path: &Path) -> String {
    let root = Path::new(env!("CARGO_MANIFEST_DIR"));
    let rel = path
        .strip_prefix(root)
        .unwrap_or(path)
        .to_string_lossy()
        .to_string();
    rel.replace('\\', "/")
}

fn violations_in(dir: &str, check: impl Fn(&str, &str) -> Option<String>) -> Vec<String> {
    let root = Path::new(env!("CARGO_MANIFEST_DIR")).join(dir);
    rs_files(&root)
        .iter()
        .filter_map(|file| {
            let content = fs::read_to_string(file).unwrap_or_default();
            check(&rel(file), &content)
        })
        .collect()
}

#[test]
fn reporting_does_not_import_platform_extensions_directly() {
    let mut violations = Vec::new();
    for file in ["src/check.rs", "src/format.rs", "src/status.rs"] {
        let path = Path::new(env!("CARGO_MANIFEST_DIR")).join(file);
        let content = fs::read_to_string(&path).unwrap_or_default();
        if content.contains("crate::system::platform") {
            violations.push(format!("{file} imports `crate::system::platform` directly"));
        }
    }

    assert!(
        violations.is_empty(),
        "Reporting/platform boundary violations:\n{}",
        violations.join("\n")
    );
}

#[test]
fn sysinfo_is_scoped_to_system() {
    let violations = violations_in("src", |rel_path, content| {
        let uses_sysinfo = content.contains("sysinfo::") || content.contains("use sysinfo");
        (uses_sysinfo && !rel_path.starts_with("src/system/"))
            .then(|| format!("{rel_path} uses sysinfo outside src/system/"))
    });

    assert!(
        violations.is_empty(),
        "Unexpected sysinfo usage:\n{}",
        violations.join("\n")
    );
}

#[test]
fn target_os_cfg_is_scoped_to_system_platform() {
    let violations = violations_in("src", |rel_path, content| {
        (content.contains("target_os") && !rel_path.starts_with("src/system/platform/")).then(
            || format!("{rel_path} contains `target_os` cfg but is outside allowed boundary"),
        )
    });

    assert!(
        violations.is_empty(),
        "Unexpected target_os cfg usage:\n{}",
        violations.join("\n")
    );
}
