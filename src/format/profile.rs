/// Text exposition profile.
///
/// This controls how metrics are serialized in text format.
#[derive(Clone, Copy, Debug, Default, Eq, PartialEq)]
#[non_exhaustive]
pub enum TextProfile {
    /// Prometheus text 0.0.4 profile.
    Prometheus004,
    /// OpenMetrics text 1.x profile.
    #[default]
    OpenMetrics1,
}

impl TextProfile {
    /// Returns the HTTP content type for this profile.
    pub const fn content_type(self) -> &'static str {
        match self {
            Self::OpenMetrics1 => "application/openmetrics-text; version=1.0.0; charset=utf-8",
            Self::Prometheus004 => "text/plain; version=0.0.4; charset=utf-8",
        }
    }
}
