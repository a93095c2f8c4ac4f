//! Per-image target sizes for batch conversion.
//!
//! The configuration is a JSON object keyed by file name prefix:
//!
//! ```json
//! { "batt_": { "width": 24, "height": 12 }, "logo": { "width": 128, "height": 64 } }
//! ```

use anyhow::Context;
use serde::Deserialize;
use std::collections::BTreeMap;
use std::fmt;
use std::path::Path;
use std::str::FromStr;

/// Width and height an image is resized to before conversion.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
pub struct TargetSize {
    pub width: u32,
    pub height: u32,
}

impl fmt::Display for TargetSize {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}x{}", self.width, self.height)
    }
}

/// Parses `WxH`, as given to `--size`.
impl FromStr for TargetSize {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (w, h) = s
            .split_once(['x', 'X'])
            .ok_or_else(|| format!("expected WIDTHxHEIGHT, got '{}'", s))?;
        let width: u32 = w.trim().parse().map_err(|_| format!("bad width '{}'", w))?;
        let height: u32 = h.trim().parse().map_err(|_| format!("bad height '{}'", h))?;
        if width == 0 || height == 0 {
            return Err(format!("size must be non-zero, got '{}'", s));
        }
        Ok(TargetSize { width, height })
    }
}

#[derive(Debug, Default, Deserialize)]
#[serde(transparent)]
pub struct SizeConfig {
    entries: BTreeMap<String, TargetSize>,
}

impl SizeConfig {
    pub fn load(path: &Path) -> anyhow::Result<Self> {
        let text = std::fs::read_to_string(path)
            .with_context(|| format!("Failed to read size configuration '{}'", path.display()))?;
        Self::from_json(&text)
            .with_context(|| format!("Invalid size configuration '{}'", path.display()))
    }

    pub fn from_json(text: &str) -> anyhow::Result<Self> {
        let config: SizeConfig = serde_json::from_str(text)?;
        if let Some((prefix, _)) = config
            .entries
            .iter()
            .find(|(_, size)| size.width == 0 || size.height == 0)
        {
            anyhow::bail!("size for '{}' must be non-zero", prefix);
        }
        Ok(config)
    }

    /// Size for `stem`; the longest matching prefix wins.
    pub fn lookup(&self, stem: &str) -> Option<TargetSize> {
        self.entries
            .iter()
            .filter(|(prefix, _)| stem.starts_with(prefix.as_str()))
            .max_by_key(|(prefix, _)| prefix.len())
            .map(|(_, size)| *size)
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
