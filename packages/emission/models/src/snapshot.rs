//! Point-in-time view of every synchronized series.

use std::sync::Arc;

use crate::{AnalysisBundle, Bounds, LocationDetail, Reading, Registry, StatusMap};

/// The last-known value of each series, `None` until first replaced.
///
/// Series are captured independently, so a snapshot may pair a registry
/// from one poll with a status map from another.
#[derive(Debug, Clone, Default)]
pub struct Snapshot {
    /// Most recent page of readings, in arrival order.
    pub readings: Option<Arc<Vec<Reading>>>,
    /// Current status per station.
    pub status: Option<Arc<StatusMap>>,
    /// Location registry.
    pub registry: Option<Arc<Registry>>,
    /// Geographic bounds of the network.
    pub bounds: Option<Arc<Bounds>>,
    /// One-shot analysis bundle.
    pub analysis: Option<Arc<AnalysisBundle>>,
    /// Detail of the selected station.
    pub detail: Option<Arc<LocationDetail>>,
}

/// Which station, if any, the operator is drilling into.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub enum Selection {
    /// No station selected.
    #[default]
    Unselected,
    /// The station with this identity is selected.
    Selected(String),
}

impl Selection {
    /// Identity of the selected station.
    #[must_use]
    pub fn location_id(&self) -> Option<&str> {
        match self {
            Self::Unselected => None,
            Self::Selected(id) => Some(id),
        }
    }

    /// Whether a station is selected.
    #[must_use]
    pub const fn is_selected(&self) -> bool {
        matches!(self, Self::Selected(_))
    }
}
