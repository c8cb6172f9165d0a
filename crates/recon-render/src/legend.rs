//! Legend for the active classification mode.

use serde::Serialize;

use crate::classify::{ClassificationMode, ColorSchemeSet};

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct LegendEntry {
    pub color: String,
    pub label: String,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ModeOption {
    pub value: ClassificationMode,
    pub label: &'static str,
    pub selected: bool,
}

/// Everything the legend panel shows: the mode selector and one swatch per band.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct Legend {
    pub mode: ClassificationMode,
    pub title: String,
    pub options: Vec<ModeOption>,
    pub entries: Vec<LegendEntry>,
}

impl Legend {
    pub fn for_mode(mode: ClassificationMode, schemes: &ColorSchemeSet) -> Self {
        Self {
            mode,
            title: format!("{} Legend", mode.title()),
            options: ClassificationMode::ALL
                .into_iter()
                .map(|m| ModeOption {
                    value: m,
                    label: m.option_label(),
                    selected: m == mode,
                })
                .collect(),
            entries: schemes
                .get(mode)
                .bands
                .iter()
                .map(|b| LegendEntry {
                    color: b.color.clone(),
                    label: b.label.clone(),
                })
                .collect(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_pressure_legend() {
        let legend = Legend::for_mode(ClassificationMode::Pressure, &ColorSchemeSet::builtin());
        assert_eq!(legend.title, "Pressure Legend");
        assert_eq!(legend.entries.len(), 7);
        assert_eq!(legend.entries[4].label, "980-995 hPa (Cat 1)");
        let selected: Vec<_> = legend.options.iter().filter(|o| o.selected).collect();
        assert_eq!(selected.len(), 1);
        assert_eq!(selected[0].value, ClassificationMode::Pressure);
    }
}
