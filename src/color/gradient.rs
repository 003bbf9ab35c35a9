//! Gradient ramps between two colors

use std::fmt;
use std::str::FromStr;

use palette::white_point::D65;
use palette::{FromColor, Lab, Lch, LinSrgb, Mix, Oklab};
use serde::{Deserialize, Serialize};

use super::Color;
use crate::{ChromalineError, Result};

/// Color space in which gradient ramps are interpolated.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GradientSpace {
    /// CIE L\*a\*b\*, the space distances are measured in.
    Lab,
    /// Cylindrical L\*a\*b\*; hue travels the shorter way round the wheel.
    /// Keeps saturation up between complementary colors.
    #[default]
    Lch,
    /// Oklab, a newer perceptually uniform space with better hue linearity.
    Oklab,
}

impl GradientSpace {
    pub fn name(&self) -> &'static str {
        match self {
            GradientSpace::Lab => "lab",
            GradientSpace::Lch => "lch",
            GradientSpace::Oklab => "oklab",
        }
    }

    /// Generate `count` colors stepping linearly from `start` to `end` in this
    /// space.
    ///
    /// Step `i` sits at `t = i / (count - 1)`, so the first color is `start` and
    /// the last is `end`. A single step is just `start`.
    pub fn steps(&self, start: Color, end: Color, count: usize) -> Result<Vec<Color>> {
        if count == 0 {
            return Err(ChromalineError::InvalidRange(count));
        }

        let ramp = match self {
            GradientSpace::Lab => ramp::<Lab<D65, f64>>(start, end, count),
            GradientSpace::Lch => ramp::<Lch<D65, f64>>(start, end, count),
            GradientSpace::Oklab => ramp::<Oklab<f64>>(start, end, count),
        };

        Ok(ramp)
    }
}

impl fmt::Display for GradientSpace {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for GradientSpace {
    type Err = ChromalineError;

    fn from_str(s: &str) -> Result<Self> {
        match s.to_lowercase().as_str() {
            "lab" => Ok(GradientSpace::Lab),
            "lch" => Ok(GradientSpace::Lch),
            "oklab" => Ok(GradientSpace::Oklab),
            other => Err(ChromalineError::ConfigError(format!(
                "Unknown gradient space '{}' (expected lab, lch or oklab)",
                other
            ))),
        }
    }
}

/// Generate `count` colors from `start` to `end` in the default space, LCh.
///
/// Fails with `InvalidRange` when `count` is zero.
pub fn gradient_steps(start: Color, end: Color, count: usize) -> Result<Vec<Color>> {
    GradientSpace::default().steps(start, end, count)
}

fn ramp<C>(start: Color, end: Color, count: usize) -> Vec<Color>
where
    C: FromColor<LinSrgb<f64>> + Mix<Scalar = f64> + Copy,
    LinSrgb<f64>: FromColor<C>,
{
    let from = C::from_color(start.to_linear());
    let to = C::from_color(end.to_linear());

    if count == 1 {
        return vec![start];
    }

    (0..count)
        .map(|i| {
            let t = i as f64 / (count - 1) as f64;
            Color::from_linear(LinSrgb::from_color(from.mix(to, t)))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::color::distance;

    fn hex(value: &str) -> Color {
        Color::parse(value).unwrap()
    }

    const SPACES: [GradientSpace; 3] = [
        GradientSpace::Lab,
        GradientSpace::Lch,
        GradientSpace::Oklab,
    ];

    #[test]
    fn test_gradient_length() {
        let colors = gradient_steps(hex("#ff0000"), hex("#0000ff"), 7).unwrap();
        assert_eq!(colors.len(), 7);
    }

    #[test]
    fn test_gradient_count_zero_is_invalid() {
        let result = gradient_steps(hex("#ff0000"), hex("#0000ff"), 0);
        assert!(matches!(result, Err(ChromalineError::InvalidRange(0))));
    }

    #[test]
    fn test_gradient_count_one_is_start() {
        let colors = gradient_steps(hex("#ff0000"), hex("#0000ff"), 1).unwrap();
        assert_eq!(colors, vec![hex("#ff0000")]);
    }

    #[test]
    fn test_gradient_count_two_is_endpoints() {
        let colors = gradient_steps(hex("#ff0000"), hex("#0000ff"), 2).unwrap();
        assert_eq!(colors, vec![hex("#ff0000"), hex("#0000ff")]);
    }

    #[test]
    fn test_gradient_preserves_endpoints_in_every_space() {
        let cases = [
            ("#000000", "#ffffff"),
            ("#ff0000", "#00ff00"),
            ("#123456", "#abcdef"),
        ];

        for space in SPACES {
            for (start, end) in cases {
                let colors = space.steps(hex(start), hex(end), 10).unwrap();
                assert_eq!(colors[0], hex(start), "start mismatch in {}", space);
                assert_eq!(colors[9], hex(end), "end mismatch in {}", space);
            }
        }
    }

    #[test]
    fn test_gradient_lightness_is_monotonic() {
        let colors = gradient_steps(hex("#000000"), hex("#ffffff"), 12).unwrap();
        let lightness: Vec<f64> = colors.iter().map(|c| c.to_perceptual().l).collect();
        for pair in lightness.windows(2) {
            assert!(pair[0] < pair[1], "lightness went backwards: {:?}", lightness);
        }
    }

    #[test]
    fn test_gradient_steps_are_evenly_spaced() {
        // Grey ramp: consecutive steps should be roughly the same ΔE apart
        let colors = gradient_steps(hex("#000000"), hex("#ffffff"), 11).unwrap();
        for pair in colors.windows(2) {
            let d = distance(pair[0], pair[1]);
            assert!((d - 10.0).abs() < 1.0, "uneven step of {}", d);
        }
    }

    #[test]
    fn test_lch_keeps_saturation_between_complements() {
        // Lab passes through grey between red and cyan, Lch goes around the wheel
        let lab = GradientSpace::Lab
            .steps(hex("#ff0000"), hex("#00ffff"), 5)
            .unwrap();
        let lch = GradientSpace::Lch
            .steps(hex("#ff0000"), hex("#00ffff"), 5)
            .unwrap();

        let chroma = |c: Color| {
            let lab = c.to_perceptual();
            (lab.a * lab.a + lab.b * lab.b).sqrt()
        };
        assert!(chroma(lch[2]) > chroma(lab[2]));
    }

    #[test]
    fn test_space_from_str() {
        assert_eq!("lab".parse::<GradientSpace>().unwrap(), GradientSpace::Lab);
        assert_eq!("LCH".parse::<GradientSpace>().unwrap(), GradientSpace::Lch);
        assert_eq!(
            "oklab".parse::<GradientSpace>().unwrap(),
            GradientSpace::Oklab
        );
        assert!("hsv".parse::<GradientSpace>().is_err());
    }

    #[test]
    fn test_space_default() {
        assert_eq!(GradientSpace::default(), GradientSpace::Lch);
    }

    #[test]
    fn test_gradient_steps_use_lch() {
        let (red, blue) = (hex("#ff0000"), hex("#0000ff"));
        let default = gradient_steps(red, blue, 5).unwrap();
        assert_eq!(default, GradientSpace::Lch.steps(red, blue, 5).unwrap());
        assert_ne!(default, GradientSpace::Lab.steps(red, blue, 5).unwrap());
    }

    mod proptests {
        use super::*;
        use proptest::prelude::*;

        fn any_color() -> impl Strategy<Value = Color> {
            any::<(u8, u8, u8)>().prop_map(|(r, g, b)| Color::from_rgb(r, g, b))
        }

        proptest! {
            #[test]
            fn gradient_has_requested_length(
                a in any_color(),
                b in any_color(),
                count in 1usize..64,
            ) {
                prop_assert_eq!(gradient_steps(a, b, count).unwrap().len(), count);
            }

            #[test]
            fn gradient_of_one_color_is_constant(a in any_color(), count in 1usize..32) {
                for space in SPACES {
                    let colors = space.steps(a, a, count).unwrap();
                    prop_assert!(colors.iter().all(|c| *c == a), "{:?} in {}", colors, space);
                }
            }

            #[test]
            fn gradient_starts_and_ends_at_anchors(
                a in any_color(),
                b in any_color(),
                count in 2usize..32,
            ) {
                let colors = gradient_steps(a, b, count).unwrap();
                prop_assert_eq!(colors[0], a);
                prop_assert_eq!(colors[count - 1], b);
            }
        }
    }
}
