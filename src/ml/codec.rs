// ============================================================
// Layer 5 — Parameter Codec
// ============================================================
// Compresses a ParameterVector into one byte per parameter via
// an affine map, and inverts it:
//
//   encode:  code = round((v - min) / scale)   clamped to [0, 255]
//   decode:  v'   = code * scale + min
//
// Two schemes:
//
//   Global        one (min, scale) for the whole vector, taken from
//                 its observed range: scale = (max - min) / 255.
//                 Error per parameter <= scale / 2.
//
//   PerParameter  each parameter gets its own window centred on its
//                 value: min_i = v_i - margin, scale_i = 2*margin / 255.
//                 Error per parameter <= margin / 255. The window is
//                 centred at encode time, so nothing is ever clipped.
//
// A constant vector under Global has max == min, hence scale 0.
// Encoding then emits all-zero codes and decoding returns the
// constant (0 * 0 + min), with no division by zero anywhere.
//
// The affine arithmetic runs in f64: the span of two finite f32
// values can exceed f32::MAX even though span / 255 never does.

use serde::{Deserialize, Serialize};

use crate::domain::params::ParameterVector;
use crate::error::{PipelineError, PipelineResult};

/// Highest code value; codes live in [0, CODE_LEVELS].
pub const CODE_LEVELS: f32 = 255.0;

/// Half-width of the per-parameter window.
pub const DEFAULT_MARGIN: f32 = 0.05;

/// Which affine map to use when encoding.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum Scheme {
    Global,
    PerParameter { margin: f32 },
}

impl Scheme {
    pub fn per_parameter() -> Self {
        Self::PerParameter { margin: DEFAULT_MARGIN }
    }

    pub fn kind(&self) -> SchemeKind {
        match self {
            Self::Global => SchemeKind::Global,
            Self::PerParameter { .. } => SchemeKind::PerParameter,
        }
    }

    pub fn name(&self) -> &'static str {
        self.kind().name()
    }
}

/// Artifact layout without encode-time settings; enough to pick
/// which file to read and to check the tag found inside it.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SchemeKind {
    Global,
    PerParameter,
}

impl SchemeKind {
    pub fn name(self) -> &'static str {
        match self {
            Self::Global => "global",
            Self::PerParameter => "per_parameter",
        }
    }
}

/// The persisted quantised artifact: codes plus what is needed to invert them.
/// Serialised with a "scheme" tag so a reader can tell the layouts apart.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "scheme", rename_all = "snake_case")]
pub enum QuantizedParams {
    Global {
        codes: Vec<u8>,
        min:   f32,
        scale: f32,
    },
    PerParameter {
        codes:  Vec<u8>,
        mins:   Vec<f32>,
        scales: Vec<f32>,
    },
}

impl QuantizedParams {
    pub fn codes(&self) -> &[u8] {
        match self {
            Self::Global { codes, .. } | Self::PerParameter { codes, .. } => codes,
        }
    }

    pub fn len(&self) -> usize {
        self.codes().len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes().is_empty()
    }

    pub fn kind(&self) -> SchemeKind {
        match self {
            Self::Global { .. } => SchemeKind::Global,
            Self::PerParameter { .. } => SchemeKind::PerParameter,
        }
    }

    pub fn scheme_name(&self) -> &'static str {
        self.kind().name()
    }

    /// Worst-case reconstruction error of each parameter (half a step).
    pub fn error_bounds(&self) -> Vec<f32> {
        match self {
            Self::Global { codes, scale, .. } => vec![scale / 2.0; codes.len()],
            Self::PerParameter { scales, .. } => scales.iter().map(|s| s / 2.0).collect(),
        }
    }
}

/// Quantise `params` with `scheme`.
pub fn encode(params: &ParameterVector, scheme: Scheme) -> PipelineResult<QuantizedParams> {
    if params.is_empty() {
        return Err(PipelineError::EmptyParameters);
    }
    let values = params.values();
    if let Some(bad) = values.iter().find(|v| !v.is_finite()) {
        return Err(PipelineError::DegenerateScale {
            reason: format!("parameter {bad} is not finite"),
        });
    }

    match scheme {
        Scheme::Global => encode_global(values),
        Scheme::PerParameter { margin } => encode_per_parameter(values, margin),
    }
}

fn encode_global(values: &[f32]) -> PipelineResult<QuantizedParams> {
    let min = values.iter().copied().fold(f32::INFINITY, f32::min);
    let max = values.iter().copied().fold(f32::NEG_INFINITY, f32::max);

    // at most 2 * f32::MAX / 255, so the cast back stays finite
    let scale = ((max as f64 - min as f64) / CODE_LEVELS as f64) as f32;

    let codes = if scale == 0.0 {
        tracing::warn!("constant parameter vector ({min}); global scale is 0");
        vec![0; values.len()]
    } else {
        values
            .iter()
            .map(|&v| to_code((v as f64 - min as f64) / scale as f64))
            .collect()
    };

    Ok(QuantizedParams::Global { codes, min, scale })
}

fn encode_per_parameter(values: &[f32], margin: f32) -> PipelineResult<QuantizedParams> {
    if !(margin.is_finite() && margin > 0.0) {
        return Err(PipelineError::DegenerateScale {
            reason: format!("per-parameter margin must be finite and > 0, got {margin}"),
        });
    }

    let scale = (2.0 * margin as f64 / CODE_LEVELS as f64) as f32;
    if !(scale.is_finite() && scale > 0.0) {
        return Err(PipelineError::DegenerateScale {
            reason: format!("margin {margin} gives step {scale}"),
        });
    }

    let mins: Vec<f32> = values
        .iter()
        .map(|&v| (v as f64 - margin as f64) as f32)
        .collect();
    if let Some(i) = mins.iter().position(|m| !m.is_finite()) {
        return Err(PipelineError::DegenerateScale {
            reason: format!("window of parameter {} leaves the f32 range", values[i]),
        });
    }

    let scales: Vec<f32> = vec![scale; values.len()];
    let codes: Vec<u8>   = values
        .iter()
        .zip(&mins)
        .map(|(&v, &m)| to_code((v as f64 - m as f64) / scale as f64))
        .collect();

    Ok(QuantizedParams::PerParameter { codes, mins, scales })
}

/// Round to the nearest level and clamp into the u8 range.
fn to_code(x: f64) -> u8 {
    x.round().clamp(0.0, CODE_LEVELS as f64) as u8
}

/// Invert `encode`: `code * scale + min` for every parameter.
pub fn decode(q: &QuantizedParams) -> PipelineResult<ParameterVector> {
    if q.is_empty() {
        return Err(PipelineError::EmptyParameters);
    }

    let values: Vec<f32> = match q {
        QuantizedParams::Global { codes, min, scale } => {
            check_affine(*min, *scale)?;
            codes.iter().map(|&c| affine(c, *min, *scale)).collect()
        }
        QuantizedParams::PerParameter { codes, mins, scales } => {
            if mins.len() != codes.len() || scales.len() != codes.len() {
                return Err(PipelineError::SchemaMismatch {
                    expected: format!("{} mins and scales", codes.len()),
                    found:    format!("{} mins and {} scales", mins.len(), scales.len()),
                });
            }
            codes
                .iter()
                .zip(mins.iter().zip(scales))
                .map(|(&c, (&m, &s))| {
                    check_affine(m, s)?;
                    Ok(affine(c, m, s))
                })
                .collect::<PipelineResult<Vec<f32>>>()?
        }
    };

    Ok(ParameterVector::new(values))
}

/// `code * scale + min`, evaluated in f64 and clamped so the top code
/// of a range spanning the whole f32 line cannot round past f32::MAX.
fn affine(code: u8, min: f32, scale: f32) -> f32 {
    (code as f64 * scale as f64 + min as f64).clamp(f32::MIN as f64, f32::MAX as f64) as f32
}

fn check_affine(min: f32, scale: f32) -> PipelineResult<()> {
    if !min.is_finite() || !scale.is_finite() || scale < 0.0 {
        return Err(PipelineError::DegenerateScale {
            reason: format!("cannot invert min={min}, scale={scale}"),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_abs_diff_eq;
    use proptest::prelude::*;

    // f32 arithmetic slack on top of the half-step bound
    const SLACK: f32 = 1e-4;

    fn pv(values: &[f32]) -> ParameterVector {
        ParameterVector::new(values.to_vec())
    }

    #[test]
    fn test_global_extremes_hit_end_codes() {
        let q = encode(&pv(&[-1.0, 0.0, 1.0]), Scheme::Global).unwrap();
        let QuantizedParams::Global { codes, min, scale } = &q else {
            panic!("expected global artifact");
        };
        assert_eq!(codes[0], 0);
        assert_eq!(codes[2], 255);
        assert_eq!(*min, -1.0);
        assert_abs_diff_eq!(*scale, 2.0 / 255.0);
    }

    #[test]
    fn test_per_parameter_layout() {
        let q = encode(&pv(&[0.4, -37.0]), Scheme::per_parameter()).unwrap();
        let QuantizedParams::PerParameter { codes, mins, scales } = &q else {
            panic!("expected per-parameter artifact");
        };
        assert_eq!(codes.len(), 2);
        assert_abs_diff_eq!(mins[0], 0.35, epsilon = 1e-6);
        assert_abs_diff_eq!(mins[1], -37.05, epsilon = 1e-5);
        assert_abs_diff_eq!(scales[0], 0.10 / 255.0);
        // the value sits mid-window
        assert!(codes.iter().all(|&c| c == 127 || c == 128), "{codes:?}");
    }

    #[test]
    fn test_constant_vector_global_decodes_to_constant() {
        let q = encode(&pv(&[2.5, 2.5, 2.5]), Scheme::Global).unwrap();
        assert_eq!(q.codes(), &[0, 0, 0]);
        assert_eq!(q.error_bounds(), vec![0.0; 3]);
        assert_eq!(decode(&q).unwrap().values(), &[2.5, 2.5, 2.5]);
    }

    #[test]
    fn test_empty_and_non_finite_rejected() {
        assert!(matches!(
            encode(&pv(&[]), Scheme::Global),
            Err(PipelineError::EmptyParameters)
        ));
        assert!(matches!(
            encode(&pv(&[1.0, f32::NAN]), Scheme::Global),
            Err(PipelineError::DegenerateScale { .. })
        ));
    }

    #[test]
    fn test_global_range_wider_than_f32_max() {
        let values = [2.0e38, -2.0e38, 1.0e38];
        let q      = encode(&pv(&values), Scheme::Global).unwrap();
        assert_eq!(q.codes(), &[255, 0, 191]);

        let QuantizedParams::Global { scale, .. } = &q else {
            panic!("expected global artifact");
        };
        assert!(scale.is_finite());

        let back = decode(&q).unwrap();
        for (a, b) in values.iter().zip(back.values()) {
            assert!(b.is_finite());
            assert!((*a as f64 - *b as f64).abs() <= *scale as f64, "{a} vs {b}");
        }
    }

    #[test]
    fn test_extreme_values_encode_under_both_schemes() {
        let values = [f32::MAX, -f32::MAX, f32::MIN_POSITIVE];
        for scheme in [Scheme::Global, Scheme::per_parameter()] {
            let back = decode(&encode(&pv(&values), scheme).unwrap()).unwrap();
            assert!(back.values().iter().all(|v| v.is_finite()), "{}", scheme.name());
        }
    }

    #[test]
    fn test_bad_margin_rejected() {
        for margin in [0.0, -0.1, f32::INFINITY] {
            let res = encode(&pv(&[1.0]), Scheme::PerParameter { margin });
            assert!(matches!(res, Err(PipelineError::DegenerateScale { .. })), "{margin}");
        }
    }

    #[test]
    fn test_decode_rejects_ragged_metadata() {
        let q = QuantizedParams::PerParameter {
            codes:  vec![1, 2, 3],
            mins:   vec![0.0, 0.0],
            scales: vec![0.1, 0.1, 0.1],
        };
        assert!(matches!(decode(&q), Err(PipelineError::SchemaMismatch { .. })));
    }

    #[test]
    fn test_decode_rejects_non_finite_scale() {
        let q = QuantizedParams::Global { codes: vec![1], min: 0.0, scale: f32::NAN };
        assert!(matches!(decode(&q), Err(PipelineError::DegenerateScale { .. })));
    }

    #[test]
    fn test_json_carries_scheme_tag() {
        let q    = encode(&pv(&[0.0, 1.0]), Scheme::Global).unwrap();
        let json = serde_json::to_string(&q).unwrap();
        assert!(json.contains("\"scheme\":\"global\""), "{json}");
    }

    #[test]
    fn test_out_of_range_code_fails_to_load() {
        let json = r#"{"scheme":"global","codes":[256],"min":0.0,"scale":1.0}"#;
        assert!(serde_json::from_str::<QuantizedParams>(json).is_err());
    }

    fn non_constant() -> impl Strategy<Value = Vec<f32>> {
        prop::collection::vec(-100.0f32..100.0f32, 2..64).prop_filter("non-constant", |v| {
            v.iter().any(|&x| x != v[0])
        })
    }

    /// Any finite f32, from tiny to near f32::MAX, of either sign.
    fn any_finite() -> impl Strategy<Value = f32> {
        use prop::num::f32::{NEGATIVE, NORMAL, POSITIVE, SUBNORMAL, ZERO};
        prop_oneof![
            -1e6f32..1e6f32,
            POSITIVE | NEGATIVE | NORMAL | SUBNORMAL | ZERO,
        ]
    }

    proptest! {
        #[test]
        fn prop_global_round_trip_within_half_step(values in non_constant()) {
            let params = pv(&values);
            let q      = encode(&params, Scheme::Global).unwrap();
            let back   = decode(&q).unwrap();
            let bound  = q.error_bounds()[0] + SLACK;

            prop_assert_eq!(back.len(), values.len());
            for (a, b) in values.iter().zip(back.values()) {
                prop_assert!((a - b).abs() <= bound, "{} vs {} (bound {})", a, b, bound);
            }
        }

        #[test]
        fn prop_per_parameter_round_trip_within_margin(values in non_constant()) {
            let q     = encode(&pv(&values), Scheme::per_parameter()).unwrap();
            let back  = decode(&q).unwrap();
            let bound = DEFAULT_MARGIN / CODE_LEVELS + SLACK;

            for (a, b) in values.iter().zip(back.values()) {
                prop_assert!((a - b).abs() <= bound, "{} vs {}", a, b);
            }
        }

        #[test]
        fn prop_every_finite_vector_encodes(
            values in prop::collection::vec(any_finite(), 1..64),
            margin in 0.001f32..10.0f32,
        ) {
            for scheme in [Scheme::Global, Scheme::PerParameter { margin }] {
                let q = encode(&pv(&values), scheme).unwrap();
                prop_assert_eq!(q.len(), values.len());
                prop_assert_eq!(q.kind(), scheme.kind());

                let back = decode(&q).unwrap();
                prop_assert!(back.values().iter().all(|v| v.is_finite()));
            }
        }
    }
}
