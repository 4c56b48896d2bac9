//! Feature, action, and the static feature/action/usage mapping

use serde::{Deserialize, Serialize};

use crate::plan::PlanId;
use crate::usage::UsageField;

/// Gated capabilities known to the engine
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Feature {
    /// Generate a video from a prompt
    VideoGeneration,
    /// Create a recurring video series
    SeriesCreation,
    /// Export a finished video for download
    VideoExport,
}

impl Feature {
    /// Stable feature id string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::VideoGeneration => "video_generation",
            Self::SeriesCreation => "series_creation",
            Self::VideoExport => "video_export",
        }
    }

    /// The metered action this feature performs
    pub const fn action(&self) -> Action {
        match self {
            Self::VideoGeneration => Action::GenerateVideo,
            Self::SeriesCreation => Action::CreateSeries,
            Self::VideoExport => Action::ExportVideo,
        }
    }

    /// The usage counter this feature ultimately charges
    ///
    /// Composition of `feature -> action -> usage field`.
    pub const fn usage_field(&self) -> UsageField {
        self.action().usage_field()
    }

    /// All features
    pub const ALL: [Feature; 3] = [
        Self::VideoGeneration,
        Self::SeriesCreation,
        Self::VideoExport,
    ];
}

impl std::fmt::Display for Feature {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

impl std::str::FromStr for Feature {
    type Err = FeatureParseError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "video_generation" => Ok(Self::VideoGeneration),
            "series_creation" => Ok(Self::SeriesCreation),
            "video_export" => Ok(Self::VideoExport),
            _ => Err(FeatureParseError(s.to_string())),
        }
    }
}

/// Error parsing a feature id string
#[derive(Debug, Clone)]
pub struct FeatureParseError(pub String);

impl std::fmt::Display for FeatureParseError {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "invalid feature id: {}", self.0)
    }
}

impl std::error::Error for FeatureParseError {}

/// Metered actions performed once a feature check passes
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Action {
    /// Render one video
    GenerateVideo,
    /// Create one series
    CreateSeries,
    /// Export one video
    ExportVideo,
}

impl Action {
    /// Stable action id string
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::GenerateVideo => "generate_video",
            Self::CreateSeries => "create_series",
            Self::ExportVideo => "export_video",
        }
    }

    /// The usage counter this action increments
    pub const fn usage_field(&self) -> UsageField {
        match self {
            Self::GenerateVideo => UsageField::VideosGenerated,
            Self::CreateSeries => UsageField::SeriesCreated,
            Self::ExportVideo => UsageField::VideosExported,
        }
    }

    /// All actions
    pub const ALL: [Action; 3] = [Self::GenerateVideo, Self::CreateSeries, Self::ExportVideo];
}

impl std::fmt::Display for Action {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}", self.as_str())
    }
}

/// Feature flag record from the backing store
///
/// Mutated by an external admin process; read-only here apart from cache
/// invalidation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeatureFlag {
    /// The gated feature
    pub feature: Feature,
    /// Minimum plan required; `None` means open to all plans
    pub required_plan: Option<PlanId>,
    /// Whether the feature is currently enabled
    pub is_active: bool,
}
