//! Whole-track layout: path lanes plus everything placed along them.

use rayon::prelude::*;
use serde::{Deserialize, Serialize};
use trk_core::traits::{BoundingBox, Validate};
use trk_core::{Result, TrackError};
use trk_math::{Bounds3, Point3};
use trk_spline::{sample_zone, CatmullRomCurve, ZoneDescriptor};

use crate::gate::Gate;
use crate::path::{LaneKind, PathData};
use crate::splice;

/// Clip zones are plain zone descriptors.
pub type ClipZoneData = ZoneDescriptor;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum CheckpointKind {
    Start,
    Finish,
    #[default]
    Checkpoint,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct CheckpointData {
    pub kind: CheckpointKind,
    pub distance: f64,
}

/// Stretch of track between two consecutive inner checkpoints.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct SectorData {
    pub distance: f64,
    pub length: f64,
    pub min_speed: f64,
    pub side_change_factor: f64,
}

impl Default for SectorData {
    fn default() -> Self {
        Self {
            distance: 0.0,
            length: 0.0,
            min_speed: 30.0,
            side_change_factor: 1.0,
        }
    }
}

/// Side of the track a rule asks drivers to keep to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
pub enum TargetSide {
    #[default]
    NotActive,
    Left,
    Right,
    StrictLeft,
    StrictRight,
    Depleted,
}

#[derive(Debug, Clone, Copy, PartialEq, Default, Serialize, Deserialize)]
pub struct RuleData {
    pub distance: f64,
    pub target_side: TargetSide,
    /// Minimum speed at the trigger; `None` leaves speed unchecked.
    pub min_speed: Option<f64>,
}

/// The three lane curves of a [`PathData`], built once and queried many
/// times.
#[derive(Debug, Clone)]
pub struct Lanes {
    pub central: CatmullRomCurve,
    pub left: CatmullRomCurve,
    pub right: CatmullRomCurve,
}

impl Lanes {
    pub fn build(path: &PathData) -> Self {
        Self {
            central: path.build_curve(LaneKind::Central),
            left: path.build_curve(LaneKind::Left),
            right: path.build_curve(LaneKind::Right),
        }
    }

    pub fn lane(&self, kind: LaneKind) -> &CatmullRomCurve {
        match kind {
            LaneKind::Left => &self.left,
            LaneKind::Central => &self.central,
            LaneKind::Right => &self.right,
        }
    }

    pub fn gate(&self, distance: f64) -> Gate {
        Gate::at_distance(&self.central, &self.left, &self.right, distance)
    }

    pub fn zone_outline(&self, zone: &ClipZoneData, step: f64) -> Vec<Point3> {
        sample_zone(&self.central, &self.left, &self.right, zone, step)
    }
}

#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TrackLayout {
    pub path: PathData,
    pub checkpoints: Vec<CheckpointData>,
    pub sectors: Vec<SectorData>,
    pub rules: Vec<RuleData>,
    pub clip_zones: Vec<ClipZoneData>,
    /// Extra width added on both sides of checkpoint and rule triggers.
    pub trigger_additional_width: f64,
}

impl TrackLayout {
    pub fn new(path: PathData) -> Self {
        Self {
            path,
            ..Self::default()
        }
    }

    pub fn lanes(&self) -> Lanes {
        Lanes::build(&self.path)
    }

    /// Outline polygon of every clip zone, in zone order.
    pub fn zone_outlines(&self, lanes: &Lanes, step: f64) -> Vec<Vec<Point3>> {
        log::debug!("sampling {} clip zones, step {:.2}", self.clip_zones.len(), step);
        self.clip_zones
            .par_iter()
            .map(|zone| lanes.zone_outline(zone, step))
            .collect()
    }

    /// Trigger gates of all checkpoints, widened by the trigger width.
    pub fn checkpoint_gates(&self, lanes: &Lanes) -> Vec<Gate> {
        self.checkpoints
            .iter()
            .map(|c| lanes.gate(c.distance).extended(self.trigger_additional_width))
            .collect()
    }

    /// Trigger gates of all rules, widened by the trigger width.
    pub fn rule_gates(&self, lanes: &Lanes) -> Vec<Gate> {
        self.rules
            .iter()
            .map(|r| lanes.gate(r.distance).extended(self.trigger_additional_width))
            .collect()
    }

    /// Start and end gate of every sector.
    pub fn sector_gates(&self, lanes: &Lanes) -> Vec<(Gate, Gate)> {
        self.sectors
            .iter()
            .map(|s| (lanes.gate(s.distance), lanes.gate(s.distance + s.length)))
            .collect()
    }

    /// Lay one sector between each pair of consecutive checkpoints, leaving
    /// out the first and last checkpoint.
    ///
    /// Sectors that survive keep their speed settings; new sectors get the
    /// defaults. Returns whether the sector count changed.
    pub fn sync_sectors(&mut self) -> bool {
        let count = self.checkpoints.len() as isize - 2;
        let old_len = self.sectors.len();
        if count.max(0) as usize != old_len {
            self.sectors = splice::resize(&self.sectors, count);
        }
        for (i, sector) in self.sectors.iter_mut().enumerate() {
            let start = self.checkpoints[i + 1].distance;
            sector.distance = start;
            sector.length = self.checkpoints[i + 2].distance - start;
        }
        old_len != self.sectors.len()
    }
}

impl Validate for TrackLayout {
    fn validate(&self) -> Result<()> {
        let path = &self.path;
        if path.left.len() != path.central.len() || path.right.len() != path.central.len() {
            return Err(TrackError::InvalidInput(format!(
                "lane point counts differ: left {}, central {}, right {}",
                path.left.len(),
                path.central.len(),
                path.right.len()
            )));
        }
        if let Some(i) = self.checkpoints.iter().position(|c| !c.distance.is_finite()) {
            return Err(TrackError::InvalidInput(format!("checkpoint {i} has no finite distance")));
        }
        let expected = self.checkpoints.len().saturating_sub(2);
        if self.sectors.len() != expected {
            return Err(TrackError::InvalidOperation(format!(
                "{} sectors for {} checkpoints, expected {}",
                self.sectors.len(),
                self.checkpoints.len(),
                expected
            )));
        }
        Ok(())
    }
}

impl BoundingBox for TrackLayout {
    type Bounds = Bounds3;

    /// Box around every control point of all three lanes.
    fn bounding_box(&self) -> Option<Bounds3> {
        let path = &self.path;
        Bounds3::from_points(
            path.central
                .iter()
                .chain(&path.left)
                .chain(&path.right)
                .copied(),
        )
    }
}
