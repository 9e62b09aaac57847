use crate::record::Level;

/// Per-logger-name minimum-severity gate.
///
/// Resolution picks the longest matching prefix among the configured
/// overrides; the root level applies when nothing matches. Duplicate
/// prefixes resolve to the later-registered entry.
#[derive(Clone, Debug)]
pub(crate) struct LevelMap {
    root: Level,
    overrides: Vec<(String, Level)>,
}

impl LevelMap {
    pub(crate) fn new(root: Level, overrides: Vec<(String, Level)>) -> LevelMap {
        LevelMap { root, overrides }
    }

    /// Effective minimum level for `name`.
    pub(crate) fn resolve(&self, name: &str) -> Level {
        let mut best: Option<(usize, Level)> = None;
        for (prefix, level) in &self.overrides {
            if !name.starts_with(prefix.as_str()) {
                continue;
            }
            // `>=` lets a later entry of equal length replace an earlier one.
            if best.map_or(true, |(len, _)| prefix.len() >= len) {
                best = Some((prefix.len(), *level));
            }
        }
        best.map_or(self.root, |(_, level)| level)
    }

    pub(crate) fn enabled(&self, name: &str, level: Level) -> bool {
        level >= self.resolve(name)
    }

    /// Most verbose level anywhere in the map, used to seed
    /// `log::set_max_level`.
    pub(crate) fn most_verbose(&self) -> Level {
        self.overrides
            .iter()
            .map(|(_, level)| *level)
            .fold(self.root, Level::min)
    }
}

impl Default for LevelMap {
    fn default() -> LevelMap {
        LevelMap::new(Level::Info, Vec::new())
    }
}
