//! Storm and mission selection.
//!
//! The orchestrator holds the catalog and the current selection. Selection
//! changes never fetch anything themselves; they return a [`LoadRequest`]
//! describing the load the caller should run.

use serde::Serialize;
use tracing::{debug, info, warn};

use recon_common::{
    format_mission_timestamp, MissionEntry, ReconError, ReconResult, StormCatalog, StormEntry,
    NOT_AVAILABLE,
};
use recon_render::carousel::{Carousel, CarouselView, EdgePolicy};
use recon_render::{ClassificationMode, ColorSchemeSet, ImageRef, Legend, MissionImage, MissionKey};

/// A load the caller should run against the marker layer.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct LoadRequest {
    pub path: String,
    pub mode: ClassificationMode,
    pub first_load: bool,
}

/// Result of a mode change.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ModeChange {
    Reload(LoadRequest),
    /// No mission selected; only the legend changes.
    LegendOnly,
}

/// One entry of the mission dropdown.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionOption {
    pub path: String,
    pub label: String,
}

impl MissionOption {
    fn new(storm: &StormEntry, mission: &MissionEntry) -> Self {
        let number = mission
            .mission_number
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        let count = mission
            .number_of_observations
            .as_ref()
            .map(|n| n.to_string())
            .unwrap_or_else(|| NOT_AVAILABLE.to_string());
        Self {
            path: storm.mission_path(mission),
            label: format!(
                "{} - Mission #{} ({} observations)",
                storm.storm_name, number, count
            ),
        }
    }
}

/// Summary panel for the selected mission.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct MissionHeader {
    pub title: String,
    pub plane: String,
    pub start: String,
    pub end: String,
    pub observations: String,
    pub coordinates: String,
    /// Main mission plot, when the mission is identifiable
    pub image: Option<ImageRef>,
}

impl Default for MissionHeader {
    fn default() -> Self {
        Self::build("", None)
    }
}

impl MissionHeader {
    pub fn build(storm: &str, mission: Option<&MissionEntry>) -> Self {
        let number = mission.and_then(|m| m.mission_number.as_ref());

        let title = match number {
            Some(n) => format!("{} (Mission #{})", storm, n),
            None if storm.is_empty() => "Storm Recon".to_string(),
            None => storm.to_string(),
        };

        let timestamp = |label: &str, value: Option<&String>| match value {
            Some(t) if !t.is_empty() => format!("{}: {}", label, format_mission_timestamp(t)),
            _ => format!("{}: {}", label, NOT_AVAILABLE),
        };

        let coordinates = match mission
            .and_then(|m| m.central_coordinates.as_ref())
            .and_then(|c| c.lat_lon())
        {
            Some((lat, lon)) => format!("Lat: {:.2}N, Lon: -{:.2}W", lat, lon.abs()),
            None => format!("Lat: {0}, Lon: {0}", NOT_AVAILABLE),
        };

        Self {
            title,
            plane: format!(
                "Plane: {}",
                mission
                    .and_then(|m| m.plane_id.as_ref())
                    .map(|p| p.to_string())
                    .unwrap_or_else(|| NOT_AVAILABLE.to_string())
            ),
            start: timestamp("Start", mission.and_then(|m| m.start_time.as_ref())),
            end: timestamp("End", mission.and_then(|m| m.end_time.as_ref())),
            observations: match mission.and_then(MissionEntry::observation_count) {
                Some(n) => format!("{} observations", n),
                None => "0 obs".to_string(),
            },
            coordinates,
            image: mission
                .and_then(|m| MissionKey::new(storm, m))
                .map(|key| MissionImage::Wind3d.reference(&key)),
        }
    }
}

/// Current dropdown state.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Selection {
    pub storm: Option<String>,
    pub mission_path: Option<String>,
    pub mode: ClassificationMode,
}

pub struct Orchestrator {
    catalog: StormCatalog,
    selection: Selection,
    options: Vec<MissionOption>,
    header: MissionHeader,
    initial_load_done: bool,
}

impl Orchestrator {
    pub fn new(catalog: StormCatalog) -> Self {
        Self {
            catalog,
            selection: Selection {
                storm: None,
                mission_path: None,
                mode: ClassificationMode::default(),
            },
            options: Vec::new(),
            header: MissionHeader::default(),
            initial_load_done: false,
        }
    }

    pub fn catalog(&self) -> &StormCatalog {
        &self.catalog
    }

    pub fn selection(&self) -> &Selection {
        &self.selection
    }

    pub fn mission_options(&self) -> &[MissionOption] {
        &self.options
    }

    pub fn header(&self) -> &MissionHeader {
        &self.header
    }

    pub fn legend(&self, schemes: &ColorSchemeSet) -> Legend {
        Legend::for_mode(self.selection.mode, schemes)
    }

    /// Mission dropdown entries for `storm`.
    pub fn missions_for(&self, storm: &str) -> ReconResult<Vec<MissionOption>> {
        let entry = self.storm_entry(storm)?;
        Ok(entry
            .array_of_missions
            .iter()
            .map(|m| MissionOption::new(entry, m))
            .collect())
    }

    /// Select a storm, cascading to its first mission.
    ///
    /// A storm without missions clears the mission and yields no load.
    pub fn select_storm(&mut self, storm: &str) -> ReconResult<Option<LoadRequest>> {
        let entry = self.storm_entry(storm)?.clone();
        info!(storm = %storm, missions = entry.array_of_missions.len(), "Storm selected");

        self.options = entry
            .array_of_missions
            .iter()
            .map(|m| MissionOption::new(&entry, m))
            .collect();
        self.selection.storm = Some(entry.storm_name.clone());

        match entry.array_of_missions.first() {
            Some(first) => {
                let path = entry.mission_path(first);
                debug!(path = %path, "Auto-selecting first mission");
                self.header = MissionHeader::build(&entry.storm_name, Some(first));
                self.selection.mission_path = Some(path.clone());
                Ok(Some(self.request(path)))
            }
            None => {
                self.header = MissionHeader::build(&entry.storm_name, None);
                self.selection.mission_path = None;
                Ok(None)
            }
        }
    }

    /// Select a mission of the current storm by its dropdown path.
    pub fn select_mission(&mut self, path: &str) -> ReconResult<LoadRequest> {
        let storm = self.selection.storm.clone().ok_or(ReconError::NoSelection)?;
        let entry = self.storm_entry(&storm)?;
        let mission = entry
            .mission_by_path(path)
            .ok_or_else(|| ReconError::MissionNotFound(path.to_string()))?;

        self.header = MissionHeader::build(&entry.storm_name, Some(mission));
        self.selection.mission_path = Some(path.to_string());
        info!(path = %path, "Mission selected");
        Ok(self.request(path.to_string()))
    }

    /// Change the classification mode.
    pub fn set_mode(&mut self, mode: ClassificationMode) -> ModeChange {
        self.selection.mode = mode;
        match self.selection.mission_path.clone() {
            Some(path) => ModeChange::Reload(self.request(path)),
            None => {
                warn!(mode = %mode, "No mission selected to reload with new mode");
                ModeChange::LegendOnly
            }
        }
    }

    /// Reload the selected mission.
    pub fn refresh(&mut self) -> ReconResult<LoadRequest> {
        let path = self
            .selection
            .mission_path
            .clone()
            .ok_or(ReconError::NoSelection)?;
        let storm = self.selection.storm.clone().ok_or(ReconError::NoSelection)?;
        if let Some(mission) = self.storm_entry(&storm)?.mission_by_path(&path) {
            self.header = MissionHeader::build(&storm, Some(mission));
        }
        Ok(self.request(path))
    }

    /// Select `storm` at startup when the catalog has it with missions.
    pub fn select_default(&mut self, storm: &str) -> Option<LoadRequest> {
        let has_missions = self
            .catalog
            .storm(storm)
            .map_or(false, |s| !s.array_of_missions.is_empty());
        if !has_missions {
            warn!(storm = %storm, "Default storm not found or has no missions");
            return None;
        }
        self.select_storm(storm).ok().flatten()
    }

    /// Record that the initial popup has been opened; later loads never open one.
    pub fn mark_initial_load(&mut self) {
        self.initial_load_done = true;
    }

    /// The selected mission's plot carousel, positioned at `page`.
    pub fn mission_carousel(&self, page: usize) -> ReconResult<CarouselView<ImageRef>> {
        let storm = self.selection.storm.as_deref().ok_or(ReconError::NoSelection)?;
        let path = self
            .selection
            .mission_path
            .as_deref()
            .ok_or(ReconError::NoSelection)?;
        let mission = self
            .storm_entry(storm)?
            .mission_by_path(path)
            .ok_or_else(|| ReconError::MissionNotFound(path.to_string()))?;

        let images = MissionKey::new(storm, mission)
            .map(|key| MissionImage::all_references(&key))
            .unwrap_or_default();
        let mut carousel = Carousel::new(images.len(), EdgePolicy::Stop);
        carousel.jump(page);
        Ok(carousel.view(&images))
    }

    fn request(&self, path: String) -> LoadRequest {
        LoadRequest {
            path,
            mode: self.selection.mode,
            first_load: !self.initial_load_done,
        }
    }

    fn storm_entry(&self, storm: &str) -> ReconResult<&StormEntry> {
        self.catalog
            .storm(storm)
            .ok_or_else(|| ReconError::StormNotFound(storm.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use test_utils::fixtures::catalog_json;

    fn orchestrator() -> Orchestrator {
        let catalog = StormCatalog::from_json(&catalog_json().to_string()).unwrap();
        Orchestrator::new(catalog)
    }

    #[test]
    fn test_storm_selection_cascades_to_first_mission() {
        let mut o = orchestrator();
        let request = o.select_storm("Alberto").unwrap().unwrap();
        assert_eq!(request.path, "static/json/Alberto/AL012024_01.json");
        assert!(request.first_load);
        assert_eq!(o.mission_options().len(), 2);
        assert_eq!(
            o.mission_options()[0].label,
            "Alberto - Mission #01 (3 observations)"
        );
        assert_eq!(o.header().title, "Alberto (Mission #01)");
    }

    #[test]
    fn test_storm_without_missions() {
        let mut o = orchestrator();
        assert_eq!(o.select_storm("Beryl").unwrap(), None);
        assert_eq!(o.selection().mission_path, None);
        assert_eq!(o.header().title, "Beryl");
        assert_eq!(o.header().plane, "Plane: N/A");
        assert_eq!(o.header().observations, "0 obs");
        assert!(o.header().image.is_none());
    }

    #[test]
    fn test_unknown_storm() {
        let mut o = orchestrator();
        assert!(matches!(
            o.select_storm("Zeta"),
            Err(ReconError::StormNotFound(_))
        ));
    }

    #[test]
    fn test_mode_change_without_mission_is_legend_only() {
        let mut o = orchestrator();
        assert_eq!(o.set_mode(ClassificationMode::Pressure), ModeChange::LegendOnly);
        assert_eq!(o.selection().mode, ClassificationMode::Pressure);
        o.select_storm("Alberto").unwrap();
        match o.set_mode(ClassificationMode::LatentHeatFlux) {
            ModeChange::Reload(r) => assert_eq!(r.mode, ClassificationMode::LatentHeatFlux),
            other => panic!("expected reload, got {:?}", other),
        }
    }

    #[test]
    fn test_refresh_requires_selection() {
        let mut o = orchestrator();
        assert!(matches!(o.refresh(), Err(ReconError::NoSelection)));
    }

    #[test]
    fn test_first_load_only_until_marked() {
        let mut o = orchestrator();
        o.select_storm("Alberto").unwrap();
        o.mark_initial_load();
        let request = o
            .select_mission("static/json/Alberto/AL012024_02.json")
            .unwrap();
        assert!(!request.first_load);
    }

    #[test]
    fn test_mission_header_formatting() {
        let mut o = orchestrator();
        o.select_storm("Alberto").unwrap();
        let header = o.header();
        assert_eq!(header.start, "Start: June 19th, 2024 at 11:30 UTC");
        assert_eq!(header.coordinates, "Lat: 22.50N, Lon: -94.10W");
        assert_eq!(
            header.image.as_ref().unwrap().src,
            "static/images/mission/Alberto2024/01_3dwind_lhf.png"
        );
    }

    #[test]
    fn test_mission_carousel_stops_at_end() {
        let mut o = orchestrator();
        o.select_storm("Alberto").unwrap();
        let view = o.mission_carousel(5).unwrap();
        assert_eq!(view.page, 1);
        assert_eq!(view.page_count, 2);
        assert_eq!(view.items.len(), 1);
        assert!(!view.next_enabled);
        assert!(view.prev_enabled);
    }
}
