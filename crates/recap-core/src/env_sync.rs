//! Keeps a live `.env` in step with `.env.example` without touching values
//! the operator already set. Run at gateway boot so new configuration keys
//! (SMTP credentials, model endpoint) show up after an upgrade.

use std::collections::HashSet;
use std::fs;
use std::io::Write;
use std::path::Path;

/// The env key from a line: trimmed part before the first `=`. `None` for
/// comments and blank lines.
fn key_from_line(line: &str) -> Option<String> {
    let trimmed = line.trim();
    if trimmed.is_empty() || trimmed.starts_with('#') {
        return None;
    }
    let key = trimmed.split('=').next()?.trim();
    if key.is_empty() {
        return None;
    }
    Some(key.to_string())
}

fn keys_in_file(path: &Path) -> std::io::Result<HashSet<String>> {
    let content = fs::read_to_string(path)?;
    Ok(content.lines().filter_map(key_from_line).collect())
}

/// Appends any keys present in the template but missing from the live file.
/// Creates the live file from the template when it does not exist. Existing
/// keys are never overwritten or removed. Returns the number of keys added.
pub fn sync_env_template(template_path: &str, live_path: &str) -> std::io::Result<u32> {
    let template_path = Path::new(template_path);
    let live_path = Path::new(live_path);

    if !template_path.exists() {
        return Err(std::io::Error::new(
            std::io::ErrorKind::NotFound,
            format!("template file not found: {}", template_path.display()),
        ));
    }

    if !live_path.exists() {
        fs::copy(template_path, live_path)?;
        let n = keys_in_file(live_path).map(|s| s.len()).unwrap_or(0);
        tracing::info!(
            target: "recap::env_sync",
            ".env did not exist; created from template ({} keys)",
            n
        );
        return Ok(n as u32);
    }

    let live_keys = keys_in_file(live_path)?;
    let template_content = fs::read_to_string(template_path)?;
    let to_append: Vec<&str> = template_content
        .lines()
        .filter(|line| {
            key_from_line(line)
                .map(|k| !live_keys.contains(&k))
                .unwrap_or(false)
        })
        .collect();

    if to_append.is_empty() {
        return Ok(0);
    }

    let mut f = fs::OpenOptions::new().append(true).open(live_path)?;
    for line in &to_append {
        writeln!(f, "{}", line)?;
    }
    f.sync_all()?;
    Ok(to_append.len() as u32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_from_line_parses_key() {
        assert_eq!(key_from_line("FOO=bar"), Some("FOO".to_string()));
        assert_eq!(key_from_line("  RECAP_X = y  "), Some("RECAP_X".to_string()));
        assert_eq!(key_from_line("# FOO=bar"), None);
        assert_eq!(key_from_line("   "), None);
    }

    #[test]
    fn creates_live_file_from_template() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("env.example");
        let live = dir.path().join("env.live");
        fs::write(&template, "A=1\nB=2\n").unwrap();
        let added =
            sync_env_template(template.to_str().unwrap(), live.to_str().unwrap()).unwrap();
        assert_eq!(added, 2);
        let content = fs::read_to_string(&live).unwrap();
        assert!(content.contains("A=1"));
        assert!(content.contains("B=2"));
    }

    #[test]
    fn never_overwrites_existing_values() {
        let dir = tempfile::tempdir().unwrap();
        let template = dir.path().join("env.example");
        let live = dir.path().join("env.live");
        fs::write(&template, "A=1\nB=from_template\n").unwrap();
        fs::write(&live, "B=operator_value\n").unwrap();
        let added =
            sync_env_template(template.to_str().unwrap(), live.to_str().unwrap()).unwrap();
        assert_eq!(added, 1);
        let content = fs::read_to_string(&live).unwrap();
        assert!(content.contains("B=operator_value"));
        assert!(!content.contains("B=from_template"));
        assert!(content.contains("A=1"));
    }
}
