use std::fmt;
use std::str::FromStr;

use crate::error::ConfigError;

/// Hint category.
#[derive(Debug, Copy, Clone, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum HintKey {
    Interpolation,
    TextAntialiasMode,
    Rendering,
    ColorRendering,
    AlphaInterpolation,
    StrokeControl,
    Antialias,
    Dithering,
    TextAntialias,
    FractionalMetrics,
}

/// Hint setting.
#[derive(Debug, Copy, Clone, PartialEq, Eq, Hash)]
pub enum HintValue {
    True,
    False,
    Fast,
    Fancy,
    Bicubic,
    Bilinear,
    Nearest,
    Gasp,
    Hrgb,
    Hbgr,
    Vrgb,
    Vbgr,
    Pure,
    Normalize,
    /// Engine default for the key.
    Default,
    /// Backend default for the key.
    DefaultSystem,
}

impl HintKey {
    pub const ALL: [HintKey; 10] = [
        HintKey::Interpolation,
        HintKey::TextAntialiasMode,
        HintKey::Rendering,
        HintKey::ColorRendering,
        HintKey::AlphaInterpolation,
        HintKey::StrokeControl,
        HintKey::Antialias,
        HintKey::Dithering,
        HintKey::TextAntialias,
        HintKey::FractionalMetrics,
    ];

    /// Whether `value` is a legal setting for this key.
    pub fn accepts(self, value: HintValue) -> bool {
        use HintValue as V;
        match self {
            HintKey::Interpolation => {
                matches!(value, V::Bicubic | V::Bilinear | V::Nearest | V::Default)
            }
            HintKey::TextAntialiasMode => matches!(
                value,
                V::Gasp | V::Hrgb | V::Hbgr | V::Vrgb | V::Vbgr | V::DefaultSystem
            ),
            HintKey::Rendering | HintKey::ColorRendering | HintKey::AlphaInterpolation => {
                matches!(value, V::Fast | V::Fancy | V::Default | V::DefaultSystem)
            }
            HintKey::StrokeControl => {
                matches!(value, V::Pure | V::Normalize | V::Default | V::DefaultSystem)
            }
            HintKey::Antialias
            | HintKey::Dithering
            | HintKey::TextAntialias
            | HintKey::FractionalMetrics => {
                matches!(value, V::True | V::False | V::Default | V::DefaultSystem)
            }
        }
    }

    pub fn as_str(self) -> &'static str {
        match self {
            HintKey::Interpolation => "interpolation",
            HintKey::TextAntialiasMode => "text-antialias-mode",
            HintKey::Rendering => "rendering",
            HintKey::ColorRendering => "color-rendering",
            HintKey::AlphaInterpolation => "alpha-interpolation",
            HintKey::StrokeControl => "stroke-control",
            HintKey::Antialias => "antialias",
            HintKey::Dithering => "dithering",
            HintKey::TextAntialias => "text-antialias",
            HintKey::FractionalMetrics => "fractional-metrics",
        }
    }
}

impl HintValue {
    pub const ALL: [HintValue; 16] = [
        HintValue::True,
        HintValue::False,
        HintValue::Fast,
        HintValue::Fancy,
        HintValue::Bicubic,
        HintValue::Bilinear,
        HintValue::Nearest,
        HintValue::Gasp,
        HintValue::Hrgb,
        HintValue::Hbgr,
        HintValue::Vrgb,
        HintValue::Vbgr,
        HintValue::Pure,
        HintValue::Normalize,
        HintValue::Default,
        HintValue::DefaultSystem,
    ];

    pub fn as_str(self) -> &'static str {
        match self {
            HintValue::True => "true",
            HintValue::False => "false",
            HintValue::Fast => "fast",
            HintValue::Fancy => "fancy",
            HintValue::Bicubic => "bicubic",
            HintValue::Bilinear => "bilinear",
            HintValue::Nearest => "nearest",
            HintValue::Gasp => "gasp",
            HintValue::Hrgb => "hrgb",
            HintValue::Hbgr => "hbgr",
            HintValue::Vrgb => "vrgb",
            HintValue::Vbgr => "vbgr",
            HintValue::Pure => "pure",
            HintValue::Normalize => "normalize",
            HintValue::Default => "default",
            HintValue::DefaultSystem => "default-system",
        }
    }
}

impl fmt::Display for HintKey {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl fmt::Display for HintValue {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for HintKey {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        HintKey::ALL
            .into_iter()
            .find(|k| k.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownHint(s.to_string()))
    }
}

impl FromStr for HintValue {
    type Err = ConfigError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let s = s.trim();
        HintValue::ALL
            .into_iter()
            .find(|v| v.as_str().eq_ignore_ascii_case(s))
            .ok_or_else(|| ConfigError::UnknownHint(s.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn names_parse_back() {
        for key in HintKey::ALL {
            assert_eq!(key.as_str().parse::<HintKey>().unwrap(), key);
        }
        for value in HintValue::ALL {
            assert_eq!(value.as_str().parse::<HintValue>().unwrap(), value);
        }
    }

    #[test]
    fn parsing_ignores_case_and_whitespace() {
        assert_eq!(" Stroke-Control ".parse::<HintKey>().unwrap(), HintKey::StrokeControl);
        assert_eq!("DEFAULT-SYSTEM".parse::<HintValue>().unwrap(), HintValue::DefaultSystem);
    }

    #[test]
    fn unknown_names_are_rejected() {
        assert_eq!(
            "shininess".parse::<HintKey>().unwrap_err(),
            ConfigError::UnknownHint("shininess".into())
        );
        assert!("sometimes".parse::<HintValue>().is_err());
    }

    #[test]
    fn every_key_accepts_default_or_default_system() {
        for key in HintKey::ALL {
            assert!(key.accepts(HintValue::Default) || key.accepts(HintValue::DefaultSystem));
        }
    }

    #[test]
    fn interpolation_rejects_boolean_values() {
        assert!(!HintKey::Interpolation.accepts(HintValue::True));
        assert!(!HintKey::Interpolation.accepts(HintValue::DefaultSystem));
        assert!(HintKey::Interpolation.accepts(HintValue::Nearest));
    }

    #[test]
    fn text_mode_takes_subpixel_orders() {
        for v in [HintValue::Gasp, HintValue::Hrgb, HintValue::Vbgr] {
            assert!(HintKey::TextAntialiasMode.accepts(v));
        }
        assert!(!HintKey::TextAntialiasMode.accepts(HintValue::Default));
    }
}
