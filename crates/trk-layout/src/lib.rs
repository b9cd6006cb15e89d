//! Race track layout data built on the curve library: three-lane paths,
//! checkpoint/sector/rule gates and clip zone outlines.

pub mod gate;
pub mod layout;
pub mod path;
pub mod splice;

pub use gate::Gate;
pub use layout::{
    CheckpointData, CheckpointKind, ClipZoneData, Lanes, RuleData, SectorData, TargetSide,
    TrackLayout,
};
pub use path::{LaneKind, PathData};
