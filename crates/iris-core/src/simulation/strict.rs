//! LMS confusion-line simulation (Brettel, Viénot & Mollon 1997).
//!
//! A dichromat's percepts lie on two half-planes in LMS space, each spanned
//! by the neutral axis (LMS of RGB white) and one monochromatic anchor:
//!
//! ```text
//! protan / deutan: 475 nm and 575 nm
//! tritan:          485 nm and 660 nm
//! ```
//!
//! The missing cone response is replaced by the value that puts the color on
//! the half-plane chosen by its side of the neutral axis:
//!
//! ```text
//! n = neutral × anchor
//! n · (L, M, S) = 0   solved for the missing coordinate
//! ```
//!
//! Grays lie on both half-planes and are reproduced exactly.

use glam::Vec3;

use crate::color::Color;
use crate::color_management::color_space::{Lms, lms_to_rgb, rgb_to_lms, xyz_to_lms};

use super::{ANOMALY_SEVERITY, Cone, CvdFilter};

// CIE 1931 2° colour-matching values of the anchor wavelengths.
const XYZ_475NM: [f32; 3] = [0.1421, 0.1126, 1.0419];
const XYZ_485NM: [f32; 3] = [0.05795, 0.1693, 0.6162];
const XYZ_575NM: [f32; 3] = [0.8425, 0.9154, 0.0018];
const XYZ_660NM: [f32; 3] = [0.1649, 0.0610, 0.0];

/// Project `input` onto the dichromat plane for `cone`. Unclamped.
pub fn project(input: Color, cone: Cone) -> Color {
    let lms = rgb_to_lms(input);
    let neutral = rgb_to_lms(Color::WHITE).to_vec3();
    let v = lms.to_vec3();

    let (anchor_a, anchor_b, on_a_side) = match cone {
        // Compare S/M (protan) or S/L (deutan) with the neutral ratio.
        Cone::Long => (XYZ_475NM, XYZ_575NM, lms.s * neutral.y >= lms.m * neutral.z),
        Cone::Medium => (XYZ_475NM, XYZ_575NM, lms.s * neutral.x >= lms.l * neutral.z),
        // Compare M/L with the neutral ratio.
        Cone::Short => (XYZ_485NM, XYZ_660NM, lms.m * neutral.x >= lms.l * neutral.y),
    };
    let anchor = xyz_to_lms(if on_a_side { anchor_a } else { anchor_b }).to_vec3();
    let n = neutral.cross(anchor);

    let projected = match cone {
        Cone::Long => Vec3::new(-(n.y * v.y + n.z * v.z) / n.x, v.y, v.z),
        Cone::Medium => Vec3::new(v.x, -(n.x * v.x + n.z * v.z) / n.y, v.z),
        Cone::Short => Vec3::new(v.x, v.y, -(n.x * v.x + n.y * v.y) / n.z),
    };
    lms_to_rgb(Lms::from_vec3(projected))
}

/// Strict simulation for the cone-loss types; other filters pass through.
pub fn simulate(input: Color, filter: CvdFilter) -> Color {
    let Some(cone) = filter.deficient_cone() else {
        return input;
    };
    let dichromat = project(input, cone);
    if filter.is_anomalous() {
        input.lerp(dichromat, ANOMALY_SEVERITY).saturate()
    } else {
        dichromat.saturate()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    const EPSILON: f32 = 1e-4;

    #[test]
    fn test_grays_are_fixed_points() {
        for v in [0.0, 0.1, 0.5, 0.9, 1.0] {
            let gray = Color::splat(v);
            for cone in [Cone::Long, Cone::Medium, Cone::Short] {
                let out = project(gray, cone);
                assert!(out.distance(gray) < EPSILON, "{cone:?} {gray} -> {out}");
            }
        }
    }

    #[test]
    fn test_projection_preserves_remaining_cones() {
        let input = Color::new(0.7, 0.2, 0.4);
        let before = rgb_to_lms(input);
        let after = rgb_to_lms(project(input, Cone::Long));
        assert!((before.m - after.m).abs() < EPSILON);
        assert!((before.s - after.s).abs() < EPSILON);
    }

    #[test]
    fn test_projection_is_idempotent() {
        let input = Color::new(0.6, 0.3, 0.2);
        for cone in [Cone::Long, Cone::Medium, Cone::Short] {
            let once = project(input, cone);
            let twice = project(once, cone);
            assert!(once.distance(twice) < 1e-3, "{cone:?}: {once} vs {twice}");
        }
    }

    #[test]
    fn test_protan_confuses_red_and_green() {
        let red = simulate(Color::new(0.8, 0.2, 0.1), CvdFilter::Protanopia);
        let green = simulate(Color::new(0.2, 0.8, 0.1), CvdFilter::Protanopia);
        let normal = Color::new(0.8, 0.2, 0.1).distance(Color::new(0.2, 0.8, 0.1));
        assert!(
            red.distance(green) < normal,
            "simulated pair should be closer than the originals"
        );
    }

    #[test]
    fn test_anomaly_blends_toward_dichromat() {
        let input = Color::new(0.2, 0.6, 0.3);
        let full = simulate(input, CvdFilter::Deuteranopia);
        let partial = simulate(input, CvdFilter::Deuteranomaly);
        assert!(partial.distance(input) < full.distance(input) + EPSILON);
    }
}
