//! Keep the private key file and local state out of version control.

use std::fs;
use std::path::Path;

/// Add each of `paths` to `<project_dir>/.gitignore` unless an equal
/// line is already there. Returns the entries that were added.
///
/// Best effort: an unreadable or unwritable `.gitignore` adds nothing.
pub fn ignore_paths(project_dir: &Path, paths: &[&str]) -> Vec<String> {
    let gitignore = project_dir.join(".gitignore");
    let mut content = match fs::read_to_string(&gitignore) {
        Ok(text) => text,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => String::new(),
        Err(_) => return Vec::new(),
    };

    let missing: Vec<String> = paths
        .iter()
        .map(|p| p.trim().replace('\\', "/"))
        .filter(|p| !p.is_empty())
        .filter(|p| !content.lines().any(|line| line.trim() == p.as_str()))
        .fold(Vec::new(), |mut acc, p| {
            if !acc.contains(&p) {
                acc.push(p);
            }
            acc
        });
    if missing.is_empty() {
        return missing;
    }

    if !content.is_empty() && !content.ends_with('\n') {
        content.push('\n');
    }
    for entry in &missing {
        content.push_str(entry);
        content.push('\n');
    }

    match fs::write(&gitignore, content) {
        Ok(()) => missing,
        Err(_) => Vec::new(),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    fn read(dir: &TempDir) -> String {
        fs::read_to_string(dir.path().join(".gitignore")).unwrap()
    }

    #[test]
    fn creates_gitignore_with_all_entries() {
        let dir = TempDir::new().unwrap();
        let added = ignore_paths(dir.path(), &["key.pem", ".cryptovault/"]);

        assert_eq!(added, vec!["key.pem", ".cryptovault/"]);
        assert_eq!(read(&dir), "key.pem\n.cryptovault/\n");
    }

    #[test]
    fn skips_entries_already_listed() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "target/\n  key.pem  \n").unwrap();

        let added = ignore_paths(dir.path(), &["key.pem", "key.pem", ".cryptovault/"]);
        assert_eq!(added, vec![".cryptovault/"]);
        assert_eq!(read(&dir).matches("key.pem").count(), 1);
    }

    #[test]
    fn terminates_last_line_before_appending() {
        let dir = TempDir::new().unwrap();
        fs::write(dir.path().join(".gitignore"), "node_modules/").unwrap();

        ignore_paths(dir.path(), &["secrets\\key.pem"]);
        assert_eq!(read(&dir), "node_modules/\nsecrets/key.pem\n");
    }
}
