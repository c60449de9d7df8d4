use std::collections::BTreeMap;

use crate::error::ConfigError;
use crate::surface::{Interpolation, RasterSettings};

use super::{HintKey, HintValue};

/// Validated hint table.
///
/// Each entry remembers the order it was written in so that the two text
/// antialiasing keys, which drive the same rasterizer switch, resolve to
/// whichever was set last.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct HintSet {
    values: BTreeMap<HintKey, (HintValue, u64)>,
    seq: u64,
}

impl HintSet {
    pub fn new() -> Self {
        Self::default()
    }

    /// Hints installed on every freshly built canvas buffer.
    pub fn canvas_defaults() -> Self {
        let mut set = HintSet::new();
        for (key, value) in [
            (HintKey::TextAntialiasMode, HintValue::DefaultSystem),
            (HintKey::Interpolation, HintValue::Nearest),
            (HintKey::Rendering, HintValue::Fast),
            (HintKey::ColorRendering, HintValue::Fast),
            (HintKey::StrokeControl, HintValue::Pure),
            (HintKey::TextAntialias, HintValue::False),
            (HintKey::Antialias, HintValue::False),
            (HintKey::Dithering, HintValue::False),
            (HintKey::FractionalMetrics, HintValue::False),
        ] {
            set.insert(key, value);
        }
        set
    }

    /// Stores `value` under `key` after checking the combination is legal.
    pub fn set(&mut self, key: HintKey, value: HintValue) -> Result<(), ConfigError> {
        if !key.accepts(value) {
            return Err(ConfigError::InvalidHint { key, value });
        }
        self.insert(key, value);
        Ok(())
    }

    /// Parses and stores a hint given by name.
    pub fn set_named(&mut self, key: &str, value: &str) -> Result<(), ConfigError> {
        self.set(key.parse()?, value.parse()?)
    }

    /// Last value written for `key`.
    #[inline]
    pub fn get(&self, key: HintKey) -> Option<HintValue> {
        self.values.get(&key).map(|(v, _)| *v)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.values.is_empty()
    }

    /// Entries in write order.
    pub fn iter(&self) -> impl Iterator<Item = (HintKey, HintValue)> + '_ {
        let mut entries: Vec<_> = self.values.iter().map(|(k, (v, s))| (*s, *k, *v)).collect();
        entries.sort_by_key(|(s, _, _)| *s);
        entries.into_iter().map(|(_, k, v)| (k, v))
    }

    /// Copy of `self` with `overrides` written on top, in their write order.
    pub fn layered(&self, overrides: &HintSet) -> HintSet {
        let mut out = self.clone();
        for (key, value) in overrides.iter() {
            out.insert(key, value);
        }
        out
    }

    /// Translates the table into rasterizer switches.
    ///
    /// `Default` and `DefaultSystem` both resolve to the fast/off choice.
    /// Bicubic requests are sampled bilinearly.
    pub fn resolve(&self) -> RasterSettings {
        use HintValue as V;

        let on = |key| self.get(key) == Some(V::True);
        let fancy = |key| self.get(key) == Some(V::Fancy);

        let interpolation = match self.get(HintKey::Interpolation) {
            // Default stands for bicubic, which is sampled bilinearly.
            Some(V::Bilinear | V::Bicubic | V::Default) => Interpolation::Bilinear,
            _ => Interpolation::Nearest,
        };

        RasterSettings {
            interpolation,
            antialias: on(HintKey::Antialias),
            text_antialias: self.text_antialias(),
            stroke_normalize: self.get(HintKey::StrokeControl) == Some(V::Normalize),
            fractional_metrics: on(HintKey::FractionalMetrics),
            linear_blend: fancy(HintKey::ColorRendering),
            dithering: on(HintKey::Dithering),
            high_quality: fancy(HintKey::Rendering),
            precise_alpha: fancy(HintKey::AlphaInterpolation),
        }
    }

    fn text_antialias(&self) -> bool {
        let flag = self.values.get(&HintKey::TextAntialias);
        let mode = self.values.get(&HintKey::TextAntialiasMode);

        let flag_on = |v: &HintValue| *v == HintValue::True;
        let mode_on = |v: &HintValue| !matches!(v, HintValue::DefaultSystem);

        match (flag, mode) {
            (Some((f, fs)), Some((m, ms))) => {
                if ms > fs { mode_on(m) } else { flag_on(f) }
            }
            (Some((f, _)), None) => flag_on(f),
            (None, Some((m, _))) => mode_on(m),
            (None, None) => false,
        }
    }

    fn insert(&mut self, key: HintKey, value: HintValue) {
        self.seq += 1;
        self.values.insert(key, (value, self.seq));
    }
}
