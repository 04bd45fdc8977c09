//! Host configuration

use ballpoint_config::{CanvasConfig, InkSettings};

/// Settings the host builds its pipeline from
#[derive(Debug, Clone, Copy)]
pub struct HostConfig {
    pub settings: InkSettings,
    pub canvas: CanvasConfig,
}

impl HostConfig {
    /// Environment overrides (`BALLPOINT_*`), then command-line overrides
    pub fn new(width: u32, height: u32, sample_rate: Option<u64>) -> Self {
        let mut settings = InkSettings::from_env();
        if let Some(rate) = sample_rate {
            settings = settings.with_sample_rate(rate);
        }
        Self {
            settings,
            canvas: CanvasConfig::new(width, height),
        }
    }
}
