use serde::{Deserialize, Serialize};

use crate::{
    customization::{
        palette::{Accessory, EyeStyle, NoseStyle, PartKey, PartValue, TailStyle},
        store::KeyValueStore,
    },
    foundation::{
        color::{Rgb, shade},
        error::{AvatarError, AvatarResult},
    },
};

/// How much a belly that collides with the body color is lightened.
pub const BELLY_CONTRAST_SHADE: f64 = 0.2;

/// Store keys the customization is persisted under.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StoreKeys {
    /// JSON-encoded [`CatColors`] record.
    pub colors: String,
    /// Plain accessory tag.
    pub accessory: String,
}

impl Default for StoreKeys {
    fn default() -> Self {
        Self {
            colors: "catColors".to_owned(),
            accessory: "catAccessory".to_owned(),
        }
    }
}

/// Per-part color choices, persisted as one JSON record.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CatColors {
    pub ears: Rgb,
    pub body: Rgb,
    pub belly: Rgb,
    pub muzzle: Rgb,
    pub paws: Rgb,
    pub tail: TailStyle,
    pub tail_tip: Rgb,
    pub eyes: EyeStyle,
    /// Eye shading discs drawn behind each eye.
    pub eye_base: Rgb,
    pub nose: NoseStyle,
}

impl Default for CatColors {
    fn default() -> Self {
        Self {
            ears: Rgb::new(0xff9933),
            body: Rgb::new(0xff9933),
            belly: Rgb::new(0xffe0b3),
            muzzle: Rgb::new(0xfff5e6),
            paws: Rgb::new(0xffffff),
            tail: TailStyle::Solid(Rgb::new(0xff9933)),
            tail_tip: Rgb::new(0x4d2600),
            eyes: EyeStyle::Solid(Rgb::new(0x00ff00)),
            eye_base: Rgb::new(0xffffff),
            nose: NoseStyle::Solid(Rgb::new(0xff8080)),
        }
    }
}

impl CatColors {
    /// Apply `value` to `part`, rejecting patterns the part cannot render.
    pub fn apply(&mut self, part: PartKey, value: PartValue) -> AvatarResult<()> {
        fn plain(part: PartKey, value: PartValue) -> AvatarResult<Rgb> {
            match value {
                PartValue::Color(c) => Ok(c),
                PartValue::Pattern(p) => Err(AvatarError::validation(format!(
                    "part \"{}\" only accepts plain colors, got \"{}\"",
                    part.key(),
                    p.tag()
                ))),
            }
        }

        match part {
            PartKey::Ears => self.ears = plain(part, value)?,
            PartKey::Body => self.body = plain(part, value)?,
            PartKey::Belly => self.belly = plain(part, value)?,
            PartKey::Muzzle => self.muzzle = plain(part, value)?,
            PartKey::Paws => self.paws = plain(part, value)?,
            PartKey::Tail => self.tail = TailStyle::try_from(value)?,
            PartKey::TailTip => self.tail_tip = plain(part, value)?,
            PartKey::Eyes => self.eyes = EyeStyle::try_from(value)?,
            PartKey::EyeBase => self.eye_base = plain(part, value)?,
            PartKey::Nose => self.nose = NoseStyle::try_from(value)?,
        }
        Ok(())
    }

    pub fn get(&self, part: PartKey) -> PartValue {
        match part {
            PartKey::Ears => PartValue::Color(self.ears),
            PartKey::Body => PartValue::Color(self.body),
            PartKey::Belly => PartValue::Color(self.belly),
            PartKey::Muzzle => PartValue::Color(self.muzzle),
            PartKey::Paws => PartValue::Color(self.paws),
            PartKey::Tail => self.tail.into(),
            PartKey::TailTip => PartValue::Color(self.tail_tip),
            PartKey::Eyes => self.eyes.into(),
            PartKey::EyeBase => PartValue::Color(self.eye_base),
            PartKey::Nose => self.nose.into(),
        }
    }

    /// Keep the belly distinguishable from the body.
    ///
    /// This also overrides an explicit `belly = body` choice. A body too light to lighten
    /// (pure white) gets a darkened belly instead.
    pub fn enforce_belly_contrast(&mut self) {
        if self.belly != self.body {
            return;
        }
        let lighter = shade(self.body, BELLY_CONTRAST_SHADE);
        self.belly = if lighter == self.body {
            shade(self.body, -BELLY_CONTRAST_SHADE)
        } else {
            lighter
        };
    }

    /// Shallow field-by-field merge of a persisted record over `self`.
    ///
    /// Unknown keys are ignored; fields that fail to parse or do not fit their part keep the
    /// current value.
    fn merge_record(&mut self, record: &serde_json::Map<String, serde_json::Value>) {
        for part in PartKey::ALL {
            let Some(raw) = record.get(part.key()) else {
                continue;
            };
            let applied = serde_json::from_value::<PartValue>(raw.clone())
                .map_err(|e| AvatarError::serde(e.to_string()))
                .and_then(|value| self.apply(part, value));
            if let Err(err) = applied {
                tracing::debug!(part = part.key(), %err, "ignoring persisted field");
            }
        }
    }
}

/// The live customization: colors plus accessory, persisted on every accepted change.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct CustomizationState {
    colors: CatColors,
    accessory: Accessory,
    keys: StoreKeys,
}

impl Default for CustomizationState {
    fn default() -> Self {
        Self {
            colors: CatColors::default(),
            accessory: Accessory::None,
            keys: StoreKeys::default(),
        }
    }
}

impl CustomizationState {
    /// Load from `store` under the default keys.
    pub fn load(store: &dyn KeyValueStore) -> Self {
        Self::load_with_keys(store, StoreKeys::default())
    }

    /// Merge persisted data over the compiled-in defaults.
    ///
    /// Absent or unparseable data silently falls back to defaults.
    pub fn load_with_keys(store: &dyn KeyValueStore, keys: StoreKeys) -> Self {
        let mut colors = CatColors::default();
        if let Some(text) = store.get(&keys.colors) {
            match serde_json::from_str::<serde_json::Value>(&text) {
                Ok(serde_json::Value::Object(record)) => colors.merge_record(&record),
                Ok(_) => tracing::warn!(key = %keys.colors, "persisted colors are not an object"),
                Err(err) => tracing::warn!(key = %keys.colors, %err, "persisted colors are corrupt"),
            }
        }
        colors.enforce_belly_contrast();

        let accessory = match store.get(&keys.accessory) {
            Some(tag) => tag.parse::<Accessory>().unwrap_or_else(|err| {
                tracing::warn!(key = %keys.accessory, %err, "persisted accessory is invalid");
                Accessory::None
            }),
            None => Accessory::None,
        };

        Self {
            colors,
            accessory,
            keys,
        }
    }

    pub fn colors(&self) -> &CatColors {
        &self.colors
    }

    pub fn accessory(&self) -> Accessory {
        self.accessory
    }

    pub fn keys(&self) -> &StoreKeys {
        &self.keys
    }

    /// Set one part. Returns `false` (state unchanged, nothing persisted) when the value
    /// does not fit the part.
    pub fn set_part(
        &mut self,
        store: &mut dyn KeyValueStore,
        part: PartKey,
        value: PartValue,
    ) -> bool {
        let mut next = self.colors.clone();
        if let Err(err) = next.apply(part, value) {
            tracing::debug!(part = part.key(), %err, "rejected customization value");
            return false;
        }
        next.enforce_belly_contrast();
        self.colors = next;
        self.persist(store);
        true
    }

    /// Set the accessory; always accepted since the type is closed.
    pub fn set_accessory(&mut self, store: &mut dyn KeyValueStore, accessory: Accessory) -> bool {
        self.accessory = accessory;
        self.colors.enforce_belly_contrast();
        self.persist(store);
        true
    }

    /// Text entry point for hosts wiring raw UI values: unknown part names or values are
    /// no-ops.
    pub fn set_part_str(&mut self, store: &mut dyn KeyValueStore, part: &str, value: &str) -> bool {
        match (part.parse::<PartKey>(), value.parse::<PartValue>()) {
            (Ok(part), Ok(value)) => self.set_part(store, part, value),
            (Err(err), _) | (_, Err(err)) => {
                tracing::debug!(part, value, %err, "rejected customization input");
                false
            }
        }
    }

    pub fn set_accessory_str(&mut self, store: &mut dyn KeyValueStore, tag: &str) -> bool {
        match tag.parse::<Accessory>() {
            Ok(accessory) => self.set_accessory(store, accessory),
            Err(err) => {
                tracing::debug!(tag, %err, "rejected accessory input");
                false
            }
        }
    }

    /// Write the full state to `store`. Failures are logged, never surfaced.
    pub fn persist(&self, store: &mut dyn KeyValueStore) {
        match serde_json::to_string(&self.colors) {
            Ok(text) => {
                if let Err(err) = store.set(&self.keys.colors, &text) {
                    tracing::warn!(key = %self.keys.colors, %err, "failed to persist colors");
                }
            }
            Err(err) => tracing::warn!(%err, "failed to encode colors"),
        }
        if let Err(err) = store.set(&self.keys.accessory, self.accessory.tag()) {
            tracing::warn!(key = %self.keys.accessory, %err, "failed to persist accessory");
        }
    }
}

#[cfg(test)]
#[path = "../../tests/unit/customization/state.rs"]
mod tests;
