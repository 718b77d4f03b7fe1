//! Command implementations.

use anyhow::{Context, bail};
use camino::{Utf8Path, Utf8PathBuf};
use castweave_core::config::Config;
use castweave_core::{LexiconScorer, markdown};

pub mod analyze;
pub mod info;
pub mod passages;
#[cfg(feature = "mcp")]
pub mod serve;

/// Read a file and validate its size against the configured limit.
pub fn read_input_file(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    // Preflight: check file size via metadata before reading into memory.
    let metadata =
        std::fs::metadata(path.as_std_path()).with_context(|| format!("failed to read {path}"))?;
    if let Some(max) = max_bytes {
        let size = metadata.len() as usize;
        if size > max {
            bail!("input too large: {path} is {size} bytes (limit: {max} bytes)");
        }
    }

    let content = std::fs::read_to_string(path.as_std_path())
        .with_context(|| format!("failed to read {path}"))?;
    Ok(content)
}

/// Read a story file, reducing markdown (`.md`) to prose.
pub fn read_story(path: &Utf8Path, max_bytes: Option<usize>) -> anyhow::Result<String> {
    let content = read_input_file(path, max_bytes)?;
    if path.extension() == Some("md") {
        Ok(markdown::to_prose(&content))
    } else {
        Ok(content)
    }
}

/// The roster from the command line, else from config.
pub fn resolve_roster(given: Option<Vec<String>>, config: &Config) -> anyhow::Result<Vec<String>> {
    let roster: Vec<String> = given
        .unwrap_or_else(|| config.characters.clone())
        .into_iter()
        .map(|name| name.trim().to_string())
        .collect();
    if roster.is_empty() {
        bail!("no characters given; pass --characters or set `characters` in castweave.toml");
    }
    Ok(roster)
}

/// The sentiment scorer, with a lexicon from the command line taking
/// precedence over the configured one.
pub fn resolve_scorer(
    lexicon: Option<Utf8PathBuf>,
    config: &Config,
    base_dir: &Utf8Path,
) -> anyhow::Result<LexiconScorer> {
    match lexicon {
        Some(path) => LexiconScorer::new()
            .with_lexicon_file(&path)
            .with_context(|| format!("failed to load lexicon {path}")),
        None => config
            .scorer(base_dir)
            .context("failed to load configured lexicon"),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use tempfile::TempDir;

    fn utf8_dir(tmp: &TempDir) -> Utf8PathBuf {
        Utf8PathBuf::try_from(tmp.path().to_path_buf()).unwrap()
    }

    #[test]
    fn oversized_input_is_rejected() {
        let tmp = TempDir::new().unwrap();
        let path = utf8_dir(&tmp).join("story.txt");
        fs::write(&path, "Aang ".repeat(100)).unwrap();
        let err = read_input_file(&path, Some(10)).unwrap_err();
        assert!(err.to_string().contains("input too large"));
        assert!(read_input_file(&path, None).is_ok());
    }

    #[test]
    fn markdown_story_is_reduced_to_prose() {
        let tmp = TempDir::new().unwrap();
        let path = utf8_dir(&tmp).join("chapter.md");
        fs::write(&path, "# Chapter 1\n\nToph *smirked*.").unwrap();
        assert_eq!(read_story(&path, None).unwrap(), "Toph smirked.");
    }

    #[test]
    fn roster_falls_back_to_config() {
        let config = Config {
            characters: vec!["Zuko".into(), "Iroh".into()],
            ..Config::default()
        };
        assert_eq!(resolve_roster(None, &config).unwrap(), ["Zuko", "Iroh"]);
        assert_eq!(
            resolve_roster(Some(vec![" Aang ".into()]), &config).unwrap(),
            ["Aang"]
        );
        assert!(resolve_roster(None, &Config::default()).is_err());
    }

    #[test]
    fn missing_lexicon_is_reported() {
        let tmp = TempDir::new().unwrap();
        let base = utf8_dir(&tmp);
        let err = resolve_scorer(Some(base.join("nope.json")), &Config::default(), &base)
            .unwrap_err();
        assert!(err.to_string().contains("failed to load lexicon"));
        assert!(resolve_scorer(None, &Config::default(), &base).is_ok());
    }
}
