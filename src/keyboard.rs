//! Keyboard adjacency tables for the key-sequence finder.
//!
//! A layout is a list of rows. Each row has a horizontal offset in quarter-key
//! units and one key per unshifted character (optionally paired with its
//! shifted character). Two keys are neighbors when they sit side by side in a
//! row, or in adjacent rows less than one key width apart.

use std::collections::HashMap;
use std::path::{Path, PathBuf};
use thiserror::Error;

#[derive(Error, Debug)]
pub enum LayoutError {
    #[error("Unknown keyboard layout: {0}")]
    UnknownLayout(String),
    #[error("Keyboard layout file not found: {0}")]
    FileNotFound(PathBuf),
    #[error("Failed to read keyboard layout file: {0}")]
    ReadError(#[from] std::io::Error),
    #[error("Keyboard layout file is empty")]
    EmptyFile,
    #[error("Malformed keyboard layout line {line}: {reason}")]
    MalformedLine { line: usize, reason: String },
}

/// Quarter-key units per key width.
const KEY_WIDTH: i32 = 4;

type Row<'a> = (i32, &'a str, &'a str);

const QWERTY: &[Row] = &[
    (0, "`1234567890-=", "~!@#$%^&*()_+"),
    (6, "qwertyuiop[]\\", "QWERTYUIOP{}|"),
    (7, "asdfghjkl;'", "ASDFGHJKL:\""),
    (9, "zxcvbnm,./", "ZXCVBNM<>?"),
];

const QWERTZ: &[Row] = &[
    (0, "^1234567890ß´", "°!\"§$%&/()=?`"),
    (6, "qwertzuiopü+", "QWERTZUIOPÜ*"),
    (7, "asdfghjklöä#", "ASDFGHJKLÖÄ'"),
    (5, "<yxcvbnm,.-", ">YXCVBNM;:_"),
];

const AZERTY: &[Row] = &[
    (0, "²&é\"'(-è_çà)=", "²1234567890°+"),
    (6, "azertyuiop^$", "AZERTYUIOP¨£"),
    (7, "qsdfghjklmù*", "QSDFGHJKLM%µ"),
    (5, "<wxcvbn,;:!", ">WXCVBN?./§"),
];

struct Key {
    row: i32,
    x: i32,
    chars: Vec<char>,
}

/// Read-only neighbor table for one named keyboard layout.
#[derive(Debug, Clone, PartialEq)]
pub struct KeyboardLayout {
    name: String,
    neighbors: HashMap<char, Vec<char>>,
    average_degree: f64,
}

impl KeyboardLayout {
    /// Returns a built-in layout: `qwerty`, `qwertz` or `azerty`.
    ///
    /// # Errors
    ///
    /// Returns `LayoutError::UnknownLayout` for any other name.
    pub fn named(name: &str) -> Result<Self, LayoutError> {
        let name = name.to_ascii_lowercase();
        let rows = match name.as_str() {
            "qwerty" => QWERTY,
            "qwertz" => QWERTZ,
            "azerty" => AZERTY,
            _ => return Err(LayoutError::UnknownLayout(name)),
        };
        Ok(Self::builtin(name, rows))
    }

    /// US QWERTY.
    pub fn qwerty() -> Self {
        Self::builtin("qwerty", QWERTY)
    }

    fn builtin(name: impl Into<String>, rows: &[Row]) -> Self {
        let rows: Vec<(i32, String, String)> = rows
            .iter()
            .map(|(offset, plain, shifted)| (*offset, plain.to_string(), shifted.to_string()))
            .collect();
        Self::from_rows(name, &rows)
    }

    /// Loads a layout file. Each non-empty line is
    /// `offset unshifted [shifted]`, top row first.
    ///
    /// # Errors
    ///
    /// Returns error if the file is missing, unreadable, empty, or a line has a
    /// bad offset or a shifted row of different length.
    pub fn from_path<P: AsRef<Path>>(path: P) -> Result<Self, LayoutError> {
        let path = path.as_ref();

        if !path.exists() {
            #[cfg(feature = "tracing")]
            tracing::error!("Keyboard layout loading FAILED: FileNotFound {:?}", path);
            return Err(LayoutError::FileNotFound(path.to_path_buf()));
        }

        let content = std::fs::read_to_string(path)?;
        if content.trim().is_empty() {
            return Err(LayoutError::EmptyFile);
        }

        let mut rows = Vec::new();
        for (idx, line) in content.lines().enumerate() {
            if line.trim().is_empty() {
                continue;
            }
            rows.push(parse_row(idx + 1, line)?);
        }

        let name = path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_else(|| "custom".to_string());
        let layout = Self::from_rows(name, &rows);

        #[cfg(feature = "tracing")]
        tracing::info!(
            "Keyboard layout '{}' loaded: {} keys from {:?}",
            layout.name,
            layout.neighbors.len(),
            path
        );

        Ok(layout)
    }

    fn from_rows(name: impl Into<String>, rows: &[(i32, String, String)]) -> Self {
        let mut keys = Vec::new();
        for (row, (offset, plain, shifted)) in rows.iter().enumerate() {
            let mut shifted = shifted.chars();
            for (i, c) in plain.chars().enumerate() {
                let mut chars = vec![c];
                chars.extend(shifted.next().filter(|&s| s != c));
                keys.push(Key {
                    row: row as i32,
                    x: offset + KEY_WIDTH * i as i32,
                    chars,
                });
            }
        }

        let mut neighbors: HashMap<char, Vec<char>> = HashMap::new();
        for key in &keys {
            let mut adjacent: Vec<char> = keys
                .iter()
                .filter(|other| are_adjacent(key, other))
                .flat_map(|other| other.chars.iter().copied())
                .filter(|c| !key.chars.contains(c))
                .collect();
            adjacent.sort_unstable();
            adjacent.dedup();
            for &c in &key.chars {
                neighbors.entry(c).or_insert_with(|| adjacent.clone());
            }
        }

        let average_degree = if neighbors.is_empty() {
            0.0
        } else {
            neighbors.values().map(|n| n.len() as f64).sum::<f64>() / neighbors.len() as f64
        };

        Self {
            name: name.into(),
            neighbors,
            average_degree,
        }
    }

    pub fn name(&self) -> &str {
        &self.name
    }

    /// Characters on keys adjacent to `c`'s key; empty if `c` is not on the layout.
    pub fn neighbors(&self, c: char) -> &[char] {
        self.neighbors.get(&c).map(Vec::as_slice).unwrap_or(&[])
    }

    pub fn is_adjacent(&self, a: char, b: char) -> bool {
        self.neighbors(a).binary_search(&b).is_ok()
    }

    /// Mean neighbor count over every character on the layout.
    pub fn average_degree(&self) -> f64 {
        self.average_degree
    }
}

fn are_adjacent(a: &Key, b: &Key) -> bool {
    let dx = (a.x - b.x).abs();
    match (a.row - b.row).abs() {
        0 => dx == KEY_WIDTH,
        1 => dx < KEY_WIDTH,
        _ => false,
    }
}

fn parse_row(line: usize, content: &str) -> Result<(i32, String, String), LayoutError> {
    let mut fields = content.split_whitespace();
    let offset = fields
        .next()
        .and_then(|f| f.parse::<i32>().ok())
        .ok_or_else(|| LayoutError::MalformedLine {
            line,
            reason: "expected a numeric offset".to_string(),
        })?;
    let plain = fields.next().ok_or_else(|| LayoutError::MalformedLine {
        line,
        reason: "missing key row".to_string(),
    })?;
    let shifted = fields.next().unwrap_or("");
    if !shifted.is_empty() && shifted.chars().count() != plain.chars().count() {
        return Err(LayoutError::MalformedLine {
            line,
            reason: "shifted row length differs from unshifted row".to_string(),
        });
    }
    Ok((offset, plain.to_string(), shifted.to_string()))
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use tempfile::NamedTempFile;

    #[test]
    fn test_qwerty_row_neighbors() {
        let layout = KeyboardLayout::qwerty();
        assert!(layout.is_adjacent('q', 'w'));
        assert!(layout.is_adjacent('w', 'q'));
        assert!(layout.is_adjacent('g', 'h'));
        assert!(!layout.is_adjacent('q', 'e'));
    }

    #[test]
    fn test_qwerty_column_neighbors() {
        let layout = KeyboardLayout::qwerty();
        for pair in ["1q", "qa", "az", "6y", "yh", "hn"].iter() {
            let mut chars = pair.chars();
            let (a, b) = (chars.next().unwrap(), chars.next().unwrap());
            assert!(layout.is_adjacent(a, b), "{} should neighbor {}", a, b);
        }
        assert!(!layout.is_adjacent('z', '6'));
    }

    #[test]
    fn test_shifted_characters_share_neighbors() {
        let layout = KeyboardLayout::qwerty();
        assert!(layout.is_adjacent('Q', 'w'));
        assert!(layout.is_adjacent('q', '@'));
        assert!(!layout.neighbors('q').contains(&'Q'));
    }

    #[test]
    fn test_average_degree_is_plausible() {
        let layout = KeyboardLayout::qwerty();
        let degree = layout.average_degree();
        assert!(degree > 4.0 && degree < 12.0, "degree = {}", degree);
    }

    #[test]
    fn test_named_layouts() {
        assert!(KeyboardLayout::named("QWERTY").is_ok());
        let qwertz = KeyboardLayout::named("qwertz").unwrap();
        assert!(qwertz.is_adjacent('t', 'z'));
        let azerty = KeyboardLayout::named("azerty").unwrap();
        assert!(azerty.is_adjacent('a', 'z'));
        assert!(matches!(
            KeyboardLayout::named("dvorak"),
            Err(LayoutError::UnknownLayout(_))
        ));
    }

    #[test]
    fn test_unknown_character_has_no_neighbors() {
        let layout = KeyboardLayout::qwerty();
        assert!(layout.neighbors('€').is_empty());
    }

    #[test]
    fn test_from_path_success() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "0 abc ABC").expect("Failed to write");
        writeln!(temp_file, "2 def").expect("Failed to write");

        let layout = KeyboardLayout::from_path(temp_file.path()).expect("Should load");
        assert!(layout.is_adjacent('a', 'b'));
        assert!(layout.is_adjacent('A', 'b'));
        assert!(layout.is_adjacent('a', 'd'));
        assert!(layout.is_adjacent('b', 'd'));
        assert!(!layout.is_adjacent('a', 'e'));
    }

    #[test]
    fn test_from_path_malformed() {
        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "x abc").expect("Failed to write");
        let result = KeyboardLayout::from_path(temp_file.path());
        assert!(matches!(result, Err(LayoutError::MalformedLine { line: 1, .. })));

        let mut temp_file = NamedTempFile::new().expect("Failed to create temp file");
        writeln!(temp_file, "0 abc AB").expect("Failed to write");
        let result = KeyboardLayout::from_path(temp_file.path());
        assert!(matches!(result, Err(LayoutError::MalformedLine { .. })));
    }

    #[test]
    fn test_from_path_missing_file() {
        let result = KeyboardLayout::from_path("/nonexistent/layout.txt");
        assert!(matches!(result, Err(LayoutError::FileNotFound(_))));
    }
}
