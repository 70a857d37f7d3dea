use thiserror::Error;

/// Boxed source error carried by collaborator failures.
pub type BoxError = Box<dyn std::error::Error + Send + Sync + 'static>;

#[derive(Debug, Error)]
pub enum DiscoveryError {
    /// Search criteria lacked a latitude or longitude.
    #[error("latitude and longitude are both required")]
    MissingCoordinate,

    #[error("venue store failed")]
    Store(#[source] BoxError),

    #[error("geocoder failed")]
    Geocoder(#[source] BoxError),

    #[error("place provider failed")]
    PlaceProvider(#[source] BoxError),
}

impl DiscoveryError {
    pub fn store(err: impl Into<BoxError>) -> Self {
        Self::Store(err.into())
    }

    pub fn geocoder(err: impl Into<BoxError>) -> Self {
        Self::Geocoder(err.into())
    }

    pub fn place_provider(err: impl Into<BoxError>) -> Self {
        Self::PlaceProvider(err.into())
    }

    /// `true` when the caller's input was at fault rather than a collaborator.
    #[must_use]
    pub fn is_validation(&self) -> bool {
        matches!(self, Self::MissingCoordinate)
    }
}
