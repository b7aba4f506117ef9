//! Plant detail modal state.

use green_cart_core::Plant;

/// Lifecycle of the detail modal.
///
/// `Closed → Loading → Open → Closed`. A fresh open request from any state
/// restarts at `Loading`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ModalState {
    #[default]
    Closed,
    /// Visible with a loading placeholder; nothing to show yet.
    Loading,
    /// Visible with plant details or an error message.
    Open,
}

impl ModalState {
    #[must_use]
    pub const fn is_visible(self) -> bool {
        !matches!(self, Self::Closed)
    }
}

/// What the modal body shows for a plant.
///
/// `Cached` and `Fetched` render identically; the distinction only records
/// which phase produced the data.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PlantDetail {
    /// Taken from the listing cache while the detail fetch is in flight, or
    /// kept after the fetch failed.
    Cached(Plant),
    /// Returned by the detail endpoint.
    Fetched(Plant),
    /// No data from either source.
    Unavailable,
}

impl PlantDetail {
    /// The plant to display, if any.
    #[must_use]
    pub const fn plant(&self) -> Option<&Plant> {
        match self {
            Self::Cached(plant) | Self::Fetched(plant) => Some(plant),
            Self::Unavailable => None,
        }
    }

    /// Combine the optimistic cache hit with the detail fetch result.
    ///
    /// A fetched plant always wins; otherwise the cached plant stands.
    #[must_use]
    pub fn resolve(cached: Option<Plant>, fetched: Option<Plant>) -> Self {
        match (fetched, cached) {
            (Some(plant), _) => Self::Fetched(plant),
            (None, Some(plant)) => Self::Cached(plant),
            (None, None) => Self::Unavailable,
        }
    }
}
