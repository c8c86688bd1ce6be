// SPDX-License-Identifier: GPL-3.0-only

//! Renderer configuration

use crate::constants::{DepthRangePreset, throttle};
use serde::{Deserialize, Serialize};
use tracing::warn;

/// Configuration for one frame renderer instance
///
/// Set once before frames arrive and read-only thereafter.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct RendererConfig {
    /// Sensor profile name as reported by the capture device
    ///
    /// Matched case-sensitively against the known time-of-flight profiles to
    /// select the reliable depth range.
    pub sensor_profile: String,
    /// Maximum frames awaiting conversion before new frames are dropped
    pub max_frames_scheduled: u32,
    /// Maximum converted images awaiting publication before images are dropped
    pub max_publish_in_flight: usize,
}

impl Default for RendererConfig {
    fn default() -> Self {
        Self {
            sensor_profile: String::new(),
            max_frames_scheduled: throttle::MAX_FRAMES_SCHEDULED,
            max_publish_in_flight: throttle::MAX_PUBLISH_IN_FLIGHT,
        }
    }
}

impl RendererConfig {
    /// Create a configuration for the given sensor profile name
    pub fn for_sensor(sensor_profile: impl Into<String>) -> Self {
        Self {
            sensor_profile: sensor_profile.into(),
            ..Self::default()
        }
    }

    /// Resolve the depth range preset for the configured sensor profile
    ///
    /// Unrecognized profile names fall back to the short-throw range. The
    /// fallback is logged because it usually means the capture device
    /// reported a profile this library has no calibration for.
    pub fn depth_range_preset(&self) -> DepthRangePreset {
        match DepthRangePreset::from_sensor_name(&self.sensor_profile) {
            Some(preset) => preset,
            None => {
                warn!(
                    profile = %self.sensor_profile,
                    "unrecognized sensor profile, falling back to short-throw depth range"
                );
                DepthRangePreset::default()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::constants::sensor_names;

    #[test]
    fn test_known_profiles_resolve() {
        let config = RendererConfig::for_sensor(sensor_names::LONG_THROW);
        assert_eq!(config.depth_range_preset(), DepthRangePreset::LongThrow);

        let config = RendererConfig::for_sensor(sensor_names::SHORT_THROW);
        assert_eq!(config.depth_range_preset(), DepthRangePreset::ShortThrow);
    }

    #[test]
    fn test_unknown_profile_falls_back_to_short_throw() {
        let config = RendererConfig::for_sensor("Passive IR");
        assert_eq!(config.depth_range_preset(), DepthRangePreset::ShortThrow);
    }

    #[test]
    fn test_config_serde_round_trip() {
        let config = RendererConfig::for_sensor(sensor_names::LONG_THROW);
        let json = serde_json::to_string(&config).unwrap();
        let restored: RendererConfig = serde_json::from_str(&json).unwrap();
        assert_eq!(restored, config);
    }
}
