//! Crease rules and sharpness subdivision.
//!
//! Every vertex is classified by a [`Rule`] derived from its own sharpness
//! and the sharpness of its incident edges. The rules drive both the
//! subdivision masks (not part of this crate) and feature-adaptive selection.
//!
//! Sharpness values range from [`SHARPNESS_SMOOTH`] to
//! [`SHARPNESS_INFINITE`]. Anything in between is *semi-sharp* and decays
//! with every level of refinement.
use derive_more::{BitOr, BitOrAssign};
use num_enum::{IntoPrimitive, TryFromPrimitive};

use super::{CreasingMethod, Options};

/// Sharpness of a smooth edge or vertex.
pub const SHARPNESS_SMOOTH: f32 = 0.0;
/// Sharpness at which an edge or vertex is considered infinitely sharp.
pub const SHARPNESS_INFINITE: f32 = 10.0;

#[inline]
pub fn is_smooth(sharpness: f32) -> bool {
    sharpness <= SHARPNESS_SMOOTH
}

#[inline]
pub fn is_sharp(sharpness: f32) -> bool {
    sharpness > SHARPNESS_SMOOTH
}

#[inline]
pub fn is_infinite(sharpness: f32) -> bool {
    sharpness >= SHARPNESS_INFINITE
}

#[inline]
pub fn is_semi_sharp(sharpness: f32) -> bool {
    SHARPNESS_SMOOTH < sharpness && sharpness < SHARPNESS_INFINITE
}

/// Crease rule of a vertex.
///
/// The discriminants are distinct bits so that the rules of several vertices
/// can be combined into a [`RuleMask`].
#[repr(u8)]
#[derive(TryFromPrimitive, IntoPrimitive, Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub enum Rule {
    #[default]
    Unknown = 0,
    Smooth = 1 << 0,
    Dart = 1 << 1,
    Crease = 1 << 2,
    Corner = 1 << 3,
}

/// A union of [`Rule`]s, e.g. of all vertices of a face.
#[derive(BitOr, BitOrAssign, Copy, Clone, Debug, Default, PartialEq, Eq, Hash)]
pub struct RuleMask(u8);

impl RuleMask {
    #[inline]
    pub fn contains(self, rule: Rule) -> bool {
        let bit: u8 = rule.into();
        self.0 & bit != 0
    }

    #[inline]
    pub fn insert(&mut self, rule: Rule) {
        self.0 |= u8::from(rule);
    }
}

impl From<Rule> for RuleMask {
    fn from(rule: Rule) -> Self {
        RuleMask(rule.into())
    }
}

/// Applies the crease rules of a particular set of scheme [`Options`].
#[derive(Copy, Clone, Debug, Default)]
pub struct Crease {
    creasing_method: CreasingMethod,
}

impl Crease {
    pub fn new(options: &Options) -> Self {
        Self {
            creasing_method: options.creasing_method,
        }
    }

    /// Determines the rule of a vertex from its own sharpness and the
    /// sharpness of its incident edges.
    ///
    /// A sharp vertex is a [`Corner`](Rule::Corner). Otherwise the number of
    /// sharp incident edges decides: none is [`Smooth`](Rule::Smooth), one a
    /// [`Dart`](Rule::Dart), two a [`Crease`](Rule::Crease) and more a
    /// [`Corner`](Rule::Corner).
    pub fn determine_vertex_vertex_rule(
        vertex_sharpness: f32,
        incident_edge_sharpness: impl IntoIterator<Item = f32>,
    ) -> Rule {
        if is_sharp(vertex_sharpness) {
            return Rule::Corner;
        }

        match incident_edge_sharpness
            .into_iter()
            .filter(|&sharpness| is_sharp(sharpness))
            .count()
        {
            0 => Rule::Smooth,
            1 => Rule::Dart,
            2 => Rule::Crease,
            _ => Rule::Corner,
        }
    }

    /// Returns the sharpness of the child of a vertex.
    #[inline]
    pub fn subdivide_vertex_sharpness(&self, sharpness: f32) -> f32 {
        decrement_sharpness(sharpness)
    }

    /// Returns the sharpness of the child edge of an edge, at the end of the
    /// edge that touches a vertex with the given incident edge sharpness.
    ///
    /// `incident_edge_sharpness` includes the sharpness of the edge itself.
    pub fn subdivide_edge_sharpness_at_vertex(
        &self,
        edge_sharpness: f32,
        incident_edge_sharpness: &[f32],
    ) -> f32 {
        match self.creasing_method {
            CreasingMethod::Uniform => decrement_sharpness(edge_sharpness),
            CreasingMethod::Chaikin => {
                if is_smooth(edge_sharpness) || edge_sharpness <= 1.0 {
                    return SHARPNESS_SMOOTH;
                }
                if is_infinite(edge_sharpness) {
                    return SHARPNESS_INFINITE;
                }

                let (sharp_sum, sharp_count) = incident_edge_sharpness
                    .iter()
                    .filter(|&&sharpness| is_semi_sharp(sharpness))
                    .fold((0.0f32, 0usize), |(sum, count), &sharpness| {
                        (sum + sharpness, count + 1)
                    });

                let mut sharpness = edge_sharpness;
                if sharp_count > 1 {
                    // 3/4 of the edge + 1/4 of the average of the others.
                    let average = (sharp_sum - edge_sharpness) / (sharp_count - 1) as f32;
                    sharpness = 0.75 * edge_sharpness + 0.25 * average;
                }
                sharpness -= 1.0;

                if is_sharp(sharpness) {
                    sharpness
                } else {
                    SHARPNESS_SMOOTH
                }
            }
        }
    }
}

#[inline]
fn decrement_sharpness(sharpness: f32) -> f32 {
    if is_smooth(sharpness) {
        SHARPNESS_SMOOTH
    } else if is_infinite(sharpness) {
        SHARPNESS_INFINITE
    } else if sharpness > 1.0 {
        sharpness - 1.0
    } else {
        SHARPNESS_SMOOTH
    }
}
