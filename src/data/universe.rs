use std::fs;
use std::path::Path;

use anyhow::{Context, Result};

/// Load the ticker universe from a newline-delimited file.
/// Blank lines and `#` comments are ignored; symbols are uppercased,
/// sorted and deduplicated so scans are order-independent.
pub fn load_universe(path: &Path) -> Result<Vec<String>> {
    let raw = fs::read_to_string(path)
        .with_context(|| format!("reading universe file {}", path.display()))?;

    let mut symbols: Vec<String> = raw
        .lines()
        .map(str::trim)
        .filter(|line| !line.is_empty() && !line.starts_with('#'))
        .map(str::to_uppercase)
        .collect();

    symbols.sort();
    symbols.dedup();
    Ok(symbols)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn parses_cleans_and_sorts() {
        let dir = std::env::temp_dir();
        let path = dir.join("breakout_sniper_universe_test.txt");
        fs::write(&path, "# demo universe\nmsft\nAAPL\n\n  nvda  \nAAPL\n").unwrap();

        let symbols = load_universe(&path).unwrap();
        assert_eq!(symbols, vec!["AAPL", "MSFT", "NVDA"]);

        let _ = fs::remove_file(&path);
    }

    #[test]
    fn missing_file_is_an_error() {
        let path = Path::new("definitely_not_here_universe.txt");
        assert!(load_universe(path).is_err());
    }
}
