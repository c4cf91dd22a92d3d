use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};

pub const DEFAULT_LINES_PER_PAGE: usize = 40;
pub const DEFAULT_ACCEPT: [&str; 3] = ["pdf", "txt", "text"];

/// Flags shared by the command line and the rc files.
///
/// Every field is optional so layers can be merged: global file, then local
/// `.pagewiserc`, then the command line, later values winning.
#[derive(Debug, Default, Clone, PartialEq)]
pub struct ConfigFlags {
    /// Initial zoom factor
    pub zoom: Option<f32>,
    pub lines_per_page: Option<usize>,
    /// Visible share of a page that makes it current
    pub threshold: Option<f32>,
    pub suggest_url: Option<String>,
    pub answer_url: Option<String>,
    /// Markup file searched locally
    pub markup: Option<PathBuf>,
    /// Keyword file, one keyword per line
    pub keywords: Option<PathBuf>,
    /// Accepted upload extensions
    pub accept: Option<Vec<String>>,
    pub perf: bool,
    pub render_debug_log: Option<PathBuf>,
    pub log_file: Option<PathBuf>,
}

impl ConfigFlags {
    pub fn union(&self, other: &Self) -> Self {
        Self {
            zoom: other.zoom.or(self.zoom),
            lines_per_page: other.lines_per_page.or(self.lines_per_page),
            threshold: other.threshold.or(self.threshold),
            suggest_url: other
                .suggest_url
                .clone()
                .or_else(|| self.suggest_url.clone()),
            answer_url: other.answer_url.clone().or_else(|| self.answer_url.clone()),
            markup: other.markup.clone().or_else(|| self.markup.clone()),
            keywords: other.keywords.clone().or_else(|| self.keywords.clone()),
            accept: other.accept.clone().or_else(|| self.accept.clone()),
            perf: self.perf || other.perf,
            render_debug_log: other
                .render_debug_log
                .clone()
                .or_else(|| self.render_debug_log.clone()),
            log_file: other.log_file.clone().or_else(|| self.log_file.clone()),
        }
    }

    pub fn lines_per_page(&self) -> usize {
        self.lines_per_page.unwrap_or(DEFAULT_LINES_PER_PAGE)
    }

    pub fn accept(&self) -> Vec<String> {
        self.accept.clone().unwrap_or_else(|| {
            DEFAULT_ACCEPT
                .iter()
                .map(|ext| (*ext).to_string())
                .collect()
        })
    }
}

pub fn global_config_path() -> PathBuf {
    #[cfg(target_os = "windows")]
    {
        if let Some(appdata) = std::env::var_os("APPDATA") {
            return PathBuf::from(appdata).join("pagewise").join("config");
        }
    }

    #[cfg(target_os = "macos")]
    {
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join("Library")
                .join("Application Support")
                .join("pagewise")
                .join("config");
        }
    }

    #[cfg(not(any(target_os = "windows", target_os = "macos")))]
    {
        if let Some(xdg) = std::env::var_os("XDG_CONFIG_HOME") {
            return PathBuf::from(xdg).join("pagewise").join("config");
        }
        if let Some(home) = std::env::var_os("HOME") {
            return PathBuf::from(home)
                .join(".config")
                .join("pagewise")
                .join("config");
        }
    }

    PathBuf::from(".pagewiserc")
}

pub fn local_override_path() -> PathBuf {
    PathBuf::from(".pagewiserc")
}

/// # Errors
///
/// Returns an error if the file exists but cannot be read.
pub fn load_config_flags(path: &Path) -> Result<ConfigFlags> {
    if !path.exists() {
        return Ok(ConfigFlags::default());
    }
    let content = fs::read_to_string(path)
        .with_context(|| format!("Failed to read config {}", path.display()))?;
    let tokens = content
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .flat_map(|line| line.split_whitespace().map(ToOwned::to_owned))
        .collect::<Vec<_>>();
    Ok(parse_flag_tokens(&tokens))
}

/// # Errors
///
/// Returns an error if the config directory or file cannot be written.
pub fn save_config_flags(path: &Path, flags: &ConfigFlags) -> Result<()> {
    let mut lines = Vec::new();
    lines.push("# pagewise defaults (saved with --save)".to_string());
    if let Some(zoom) = flags.zoom {
        lines.push(format!("--zoom {zoom}"));
    }
    if let Some(lines_per_page) = flags.lines_per_page {
        lines.push(format!("--lines-per-page {lines_per_page}"));
    }
    if let Some(threshold) = flags.threshold {
        lines.push(format!("--threshold {threshold}"));
    }
    if let Some(url) = &flags.suggest_url {
        lines.push(format!("--suggest-url {url}"));
    }
    if let Some(url) = &flags.answer_url {
        lines.push(format!("--answer-url {url}"));
    }
    if let Some(path) = &flags.markup {
        lines.push(format!("--markup {}", path.display()));
    }
    if let Some(path) = &flags.keywords {
        lines.push(format!("--keywords {}", path.display()));
    }
    if let Some(accept) = &flags.accept {
        lines.push(format!("--accept {}", accept.join(",")));
    }
    if flags.perf {
        lines.push("--perf".to_string());
    }
    if let Some(path) = &flags.render_debug_log {
        lines.push(format!("--render-debug-log {}", path.display()));
    }
    if let Some(path) = &flags.log_file {
        lines.push(format!("--log-file {}", path.display()));
    }
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent)
            .with_context(|| format!("Failed to create config dir {}", parent.display()))?;
    }
    fs::write(path, format!("{}\n", lines.join("\n")))
        .with_context(|| format!("Failed to write config {}", path.display()))
}

/// # Errors
///
/// Returns an error if the file exists but cannot be removed.
pub fn clear_config_flags(path: &Path) -> Result<()> {
    if path.exists() {
        fs::remove_file(path).with_context(|| format!("Failed to remove {}", path.display()))?;
    }
    Ok(())
}

/// Extract known flags from `tokens`, ignoring everything else.
///
/// Values may follow the flag or be attached with `=`. Unparseable numbers
/// are dropped so the default applies.
pub fn parse_flag_tokens(tokens: &[String]) -> ConfigFlags {
    let mut flags = ConfigFlags::default();
    let mut i = 0;
    while i < tokens.len() {
        let token = tokens[i].as_str();
        if token == "--perf" {
            flags.perf = true;
            i += 1;
            continue;
        }
        let (name, value) = match token.split_once('=') {
            Some((name, value)) => (name, Some(value.to_string())),
            None if takes_value(token) => {
                let value = tokens.get(i + 1).cloned();
                if value.is_some() {
                    i += 1;
                }
                (token, value)
            }
            None => (token, None),
        };
        if let Some(value) = value {
            apply_value(&mut flags, name, value);
        }
        i += 1;
    }
    flags
}

fn takes_value(flag: &str) -> bool {
    matches!(
        flag,
        "--zoom"
            | "--lines-per-page"
            | "--threshold"
            | "--suggest-url"
            | "--answer-url"
            | "--markup"
            | "--keywords"
            | "--accept"
            | "--render-debug-log"
            | "--log-file"
    )
}

fn apply_value(flags: &mut ConfigFlags, name: &str, value: String) {
    match name {
        "--zoom" => flags.zoom = parse_number(&value).or(flags.zoom),
        "--threshold" => flags.threshold = parse_number(&value).or(flags.threshold),
        "--lines-per-page" => {
            flags.lines_per_page = value
                .trim()
                .parse()
                .ok()
                .filter(|n| *n > 0)
                .or(flags.lines_per_page);
        }
        "--suggest-url" => flags.suggest_url = Some(value),
        "--answer-url" => flags.answer_url = Some(value),
        "--markup" => flags.markup = Some(PathBuf::from(value)),
        "--keywords" => flags.keywords = Some(PathBuf::from(value)),
        "--accept" => {
            let accept: Vec<String> = value
                .split(',')
                .map(str::trim)
                .filter(|ext| !ext.is_empty())
                .map(ToOwned::to_owned)
                .collect();
            if !accept.is_empty() {
                flags.accept = Some(accept);
            }
        }
        "--render-debug-log" => flags.render_debug_log = Some(PathBuf::from(value)),
        "--log-file" => flags.log_file = Some(PathBuf::from(value)),
        _ => {}
    }
}

fn parse_number(value: &str) -> Option<f32> {
    value.trim().parse::<f32>().ok().filter(|v| v.is_finite())
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::tempdir;

    fn args(tokens: &[&str]) -> Vec<String> {
        tokens.iter().map(|t| (*t).to_string()).collect()
    }

    #[test]
    fn test_parse_flag_tokens_extracts_known_flags() {
        let flags = parse_flag_tokens(&args(&[
            "pagewise",
            "--zoom",
            "1.2",
            "--threshold=0.5",
            "--answer-url",
            "http://localhost:8000/search",
            "--accept",
            "pdf, txt",
            "--perf",
            "--render-debug-log=render.log",
            "invoice.txt",
        ]));
        assert_eq!(flags.zoom, Some(1.2));
        assert_eq!(flags.threshold, Some(0.5));
        assert_eq!(
            flags.answer_url.as_deref(),
            Some("http://localhost:8000/search")
        );
        assert_eq!(flags.accept, Some(vec!["pdf".to_string(), "txt".to_string()]));
        assert!(flags.perf);
        assert_eq!(flags.render_debug_log, Some(PathBuf::from("render.log")));
        assert_eq!(flags.markup, None);
    }

    #[test]
    fn test_invalid_numbers_are_ignored() {
        let flags = parse_flag_tokens(&args(&[
            "--zoom",
            "big",
            "--lines-per-page",
            "0",
            "--threshold=NaN",
        ]));
        assert_eq!(flags.zoom, None);
        assert_eq!(flags.lines_per_page, None);
        assert_eq!(flags.threshold, None);
        assert_eq!(flags.lines_per_page(), DEFAULT_LINES_PER_PAGE);
    }

    #[test]
    fn test_defaults_for_unset_values() {
        let flags = ConfigFlags::default();
        assert_eq!(flags.accept(), ["pdf", "txt", "text"]);
        assert_eq!(flags.lines_per_page(), 40);
    }

    #[test]
    fn test_config_union_merges_cli_over_file_for_options() {
        let file = ConfigFlags {
            perf: true,
            zoom: Some(0.8),
            suggest_url: Some("http://a/suggest".to_string()),
            ..ConfigFlags::default()
        };
        let cli = ConfigFlags {
            zoom: Some(1.5),
            ..ConfigFlags::default()
        };
        let merged = file.union(&cli);
        assert!(merged.perf);
        assert_eq!(merged.zoom, Some(1.5));
        assert_eq!(merged.suggest_url.as_deref(), Some("http://a/suggest"));
    }

    #[test]
    fn test_save_load_and_clear_config() {
        let dir = tempdir().unwrap();
        let path = dir.path().join("nested").join(".pagewiserc");
        let flags = ConfigFlags {
            zoom: Some(1.1),
            lines_per_page: Some(55),
            threshold: Some(0.75),
            suggest_url: Some("http://localhost:8000/suggest".to_string()),
            answer_url: Some("http://localhost:8000/search".to_string()),
            markup: Some(PathBuf::from("answer.html")),
            keywords: Some(PathBuf::from("keywords.txt")),
            accept: Some(vec!["pdf".to_string()]),
            perf: true,
            render_debug_log: Some(PathBuf::from("render.log")),
            log_file: Some(PathBuf::from("pagewise.log")),
        };

        save_config_flags(&path, &flags).unwrap();
        let loaded = load_config_flags(&path).unwrap();
        assert_eq!(loaded, flags);

        clear_config_flags(&path).unwrap();
        assert!(!path.exists());
        assert_eq!(load_config_flags(&path).unwrap(), ConfigFlags::default());
    }
}
