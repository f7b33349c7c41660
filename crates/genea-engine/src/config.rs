//! Engine configuration.
//!
//! An immutable value passed into engine construction; no ambient or global
//! state. Defaults match the reference compensation plan.

use genea_model::TreeShape;

/// Plan parameters consumed by the engines.
#[derive(Debug, Clone, PartialEq)]
pub struct EngineConfig {
    /// Shape assigned to root members that do not specify one.
    pub default_shape: TreeShape,

    /// Matrix slot width per sponsor (`pos_1..pos_W`).
    pub matrix_width: u32,

    /// How many levels below a sponsor the matrix spillover search may
    /// descend before reporting exhaustion.
    pub matrix_depth: u32,

    /// Direct-referral commission, percent, when the sponsor has no
    /// package override.
    pub direct_referral_rate: f64,

    /// Base percentage for level commissions; level L pays base / L.
    pub level_rate: f64,

    /// Total commission depth (level 1 direct + level walk), when the
    /// purchasing member has no package override.
    pub max_commission_levels: u32,
}

impl Default for EngineConfig {
    fn default() -> Self {
        Self {
            default_shape: TreeShape::Binary,
            matrix_width: 3,
            matrix_depth: 9,
            direct_referral_rate: 10.0,
            level_rate: 5.0,
            max_commission_levels: 10,
        }
    }
}

impl EngineConfig {
    /// Create config from environment variables with sensible defaults.
    ///
    /// Unset or unparseable variables fall back to the default value.
    pub fn from_env() -> Self {
        let defaults = Self::default();
        Self {
            default_shape: std::env::var("GENEA_DEFAULT_SHAPE")
                .ok()
                .and_then(|s| TreeShape::parse(&s))
                .unwrap_or(defaults.default_shape),
            matrix_width: env_parse("GENEA_MATRIX_WIDTH", defaults.matrix_width),
            matrix_depth: env_parse("GENEA_MATRIX_DEPTH", defaults.matrix_depth),
            direct_referral_rate: env_parse(
                "GENEA_DIRECT_REFERRAL_RATE",
                defaults.direct_referral_rate,
            ),
            level_rate: env_parse("GENEA_LEVEL_RATE", defaults.level_rate),
            max_commission_levels: env_parse(
                "GENEA_MAX_COMMISSION_LEVELS",
                defaults.max_commission_levels,
            ),
        }
    }
}

fn env_parse<T: std::str::FromStr>(key: &str, default: T) -> T {
    std::env::var(key)
        .ok()
        .and_then(|v| v.parse().ok())
        .unwrap_or(default)
}
