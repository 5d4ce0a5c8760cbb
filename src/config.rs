use std::{fs::File, io::BufReader, path::Path};

use serde::{Deserialize, Serialize};

use crate::{
    animation::behaviors::AnimationConfig,
    customization::state::StoreKeys,
    foundation::{
        core::Canvas,
        error::{AvatarError, AvatarResult},
    },
};

/// Host-level settings for an avatar session.
///
/// Every field has a default, so `{}` is a valid config file.
#[derive(Clone, Debug, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct AvatarConfig {
    /// Seed for animation timing and jitter.
    pub seed: u64,
    pub store_keys: StoreKeys,
    pub animations: AnimationConfig,
    /// Canvas used for offline rendering.
    pub canvas: Canvas,
}

impl Default for AvatarConfig {
    fn default() -> Self {
        Self {
            seed: 1,
            store_keys: StoreKeys::default(),
            animations: AnimationConfig::default(),
            canvas: Canvas::default(),
        }
    }
}

impl AvatarConfig {
    /// Parse a config from a JSON reader and validate it.
    pub fn from_reader<R: std::io::Read>(r: R) -> AvatarResult<Self> {
        let config: Self = serde_json::from_reader(r)
            .map_err(|e| AvatarError::serde(format!("parse avatar config JSON: {e}")))?;
        config.validate()?;
        Ok(config)
    }

    /// Parse a config from a JSON file on disk.
    pub fn from_path(path: impl AsRef<Path>) -> AvatarResult<Self> {
        let path = path.as_ref();
        let f = File::open(path).map_err(|e| {
            AvatarError::validation(format!("open avatar config '{}': {e}", path.display()))
        })?;
        Self::from_reader(BufReader::new(f))
    }

    pub fn validate(&self) -> AvatarResult<()> {
        Canvas::new(self.canvas.width, self.canvas.height)?;
        if self.store_keys.colors.trim().is_empty() || self.store_keys.accessory.trim().is_empty() {
            return Err(AvatarError::validation("store keys must be non-empty"));
        }
        if self.store_keys.colors == self.store_keys.accessory {
            return Err(AvatarError::validation(
                "colors and accessory must use different store keys",
            ));
        }
        Ok(())
    }
}

#[cfg(test)]
#[path = "../tests/unit/config.rs"]
mod tests;
