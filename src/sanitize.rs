//! Best-effort clamping of user supplied parameters.
//!
//! Out-of-range values are pulled to the nearest bound and non-finite values
//! are replaced by a fallback. Every adjustment is logged once at warn level.
//! Integer fields read from files accept any JSON number, so `4.0` and `-1`
//! reach the range checks instead of failing the whole file.

use serde::{Deserialize, Deserializer};

pub(crate) fn clamp_f32(field: &str, value: f32, min: f32, max: f32, fallback: f32) -> f32 {
    if !value.is_finite() {
        tracing::warn!(field, value = %value, used = fallback, "non-finite parameter replaced");
        return fallback;
    }
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!(field, value, used = clamped, "parameter out of range, clamped");
    }
    clamped
}

pub(crate) fn clamp_u32(field: &str, value: u32, min: u32, max: u32) -> u32 {
    let clamped = value.clamp(min, max);
    if clamped != value {
        tracing::warn!(field, value, used = clamped, "parameter out of range, clamped");
    }
    clamped
}

/// Rounds `value` and saturates it into `[min, max]`, logging when it changes.
fn saturate(value: f64, min: f64, max: f64) -> f64 {
    let used = value.round().clamp(min, max);
    if used != value {
        tracing::warn!(value, used, "integer parameter rounded");
    }
    used
}

pub(crate) fn lenient_u32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<u32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Ok(saturate(value, 0.0, u32::MAX as f64) as u32)
}

pub(crate) fn lenient_i32<'de, D: Deserializer<'de>>(deserializer: D) -> Result<i32, D::Error> {
    let value = f64::deserialize(deserializer)?;
    Ok(saturate(value, i32::MIN as f64, i32::MAX as f64) as i32)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_clamp_f32() {
        assert_eq!(clamp_f32("x", 0.5, 0.0, 1.0, 0.25), 0.5);
        assert_eq!(clamp_f32("x", -3.0, 0.0, 1.0, 0.25), 0.0);
        assert_eq!(clamp_f32("x", 7.0, 0.0, 1.0, 0.25), 1.0);
        assert_eq!(clamp_f32("x", f32::NAN, 0.0, 1.0, 0.25), 0.25);
        assert_eq!(clamp_f32("x", f32::INFINITY, 0.0, 1.0, 0.25), 0.25);
    }

    #[test]
    fn test_clamp_u32() {
        assert_eq!(clamp_u32("n", 0, 1, 8), 1);
        assert_eq!(clamp_u32("n", 4, 1, 8), 4);
        assert_eq!(clamp_u32("n", 12, 1, 8), 8);
    }

    #[derive(Deserialize)]
    struct Counts {
        #[serde(deserialize_with = "lenient_u32")]
        layers: u32,
        #[serde(deserialize_with = "lenient_i32")]
        seed: i32,
    }

    fn counts(json: &str) -> Counts {
        serde_json::from_str(json).unwrap()
    }

    #[test]
    fn test_lenient_integers() {
        let c = counts(r#"{ "layers": 4.0, "seed": -12 }"#);
        assert_eq!((c.layers, c.seed), (4, -12));

        let c = counts(r#"{ "layers": -1, "seed": 2.6 }"#);
        assert_eq!((c.layers, c.seed), (0, 3));

        let c = counts(r#"{ "layers": 1e12, "seed": -1e12 }"#);
        assert_eq!((c.layers, c.seed), (u32::MAX, i32::MIN));

        assert!(serde_json::from_str::<Counts>(r#"{ "layers": "four", "seed": 0 }"#).is_err());
    }
}
