//! Projective transform helpers.
//!
//! - `quad_to_quad`: the unique homography sending four points onto four
//!   points, solved as an 8×8 linear system after normalizing both point sets.
//! - `apply_homography_point(s)`: map points through a homography.
//! - `rotation_about`: rotation by an angle in degrees about a pivot point.
use nalgebra::{Matrix3, SMatrix, SVector, Vector3};

const EPS: f64 = 1e-12;

/// Composes `h` with an axis scale applied on the output side.
pub fn rescale_homography(h: &Matrix3<f64>, sx: f64, sy: f64) -> Matrix3<f64> {
    let scale = Matrix3::new(sx, 0.0, 0.0, 0.0, sy, 0.0, 0.0, 0.0, 1.0);
    scale * h
}

/// Maps a single point through `h`. Returns `None` when the homogeneous
/// weight vanishes or any component is non-finite.
pub fn apply_homography_point(h: &Matrix3<f64>, p: [f64; 2]) -> Option<[f64; 2]> {
    let v = h * Vector3::new(p[0], p[1], 1.0);
    let w = v[2];
    if !w.is_finite() || w.abs() <= EPS || !v[0].is_finite() || !v[1].is_finite() {
        return None;
    }
    Some([v[0] / w, v[1] / w])
}

/// Rotation by `degrees` about `(cx, cy)`.
///
/// Uses the standard `[[cos, -sin], [sin, cos]]` form, so in a y-down frame a
/// positive angle turns clockwise on screen.
pub fn rotation_about(degrees: f64, cx: f64, cy: f64) -> Matrix3<f64> {
    let (s, c) = degrees.to_radians().sin_cos();
    // T(c) * R * T(-c), expanded
    Matrix3::new(
        c,
        -s,
        cx - c * cx + s * cy,
        s,
        c,
        cy - s * cx - c * cy,
        0.0,
        0.0,
        1.0,
    )
}

/// Solves the homography `H` with `H * src[i] ~ dst[i]` for four
/// correspondences.
///
/// Both point sets are first moved to their centroid and scaled to unit mean
/// distance, which keeps the system well conditioned when one side is in
/// degrees and the other in meters. Returns `None` for degenerate inputs
/// (three collinear points, repeated points, non-finite coordinates).
pub fn quad_to_quad(src: &[[f64; 2]; 4], dst: &[[f64; 2]; 4]) -> Option<Matrix3<f64>> {
    let (t_src, src_n) = normalize_points(src)?;
    let (t_dst, dst_n) = normalize_points(dst)?;

    let mut a = SMatrix::<f64, 8, 8>::zeros();
    let mut b = SVector::<f64, 8>::zeros();
    for i in 0..4 {
        let [x, y] = src_n[i];
        let [u, v] = dst_n[i];
        let r = 2 * i;
        a[(r, 0)] = x;
        a[(r, 1)] = y;
        a[(r, 2)] = 1.0;
        a[(r, 6)] = -u * x;
        a[(r, 7)] = -u * y;
        b[r] = u;

        a[(r + 1, 3)] = x;
        a[(r + 1, 4)] = y;
        a[(r + 1, 5)] = 1.0;
        a[(r + 1, 6)] = -v * x;
        a[(r + 1, 7)] = -v * y;
        b[r + 1] = v;
    }

    let lu = a.lu();
    if lu.determinant().abs() <= EPS {
        return None;
    }
    let h = lu.solve(&b)?;
    let hn = Matrix3::new(h[0], h[1], h[2], h[3], h[4], h[5], h[6], h[7], 1.0);

    let t_dst_inv = t_dst.try_inverse()?;
    let full = t_dst_inv * hn * t_src;
    let w = full[(2, 2)];
    if !w.is_finite() || w.abs() <= EPS {
        return None;
    }
    let full = full / w;
    if full.iter().all(|v| v.is_finite()) {
        Some(full)
    } else {
        None
    }
}

/// Similarity transform taking `pts` to zero centroid and mean distance √2.
fn normalize_points(pts: &[[f64; 2]; 4]) -> Option<(Matrix3<f64>, [[f64; 2]; 4])> {
    let cx = pts.iter().map(|p| p[0]).sum::<f64>() / 4.0;
    let cy = pts.iter().map(|p| p[1]).sum::<f64>() / 4.0;
    let mean_dist = pts
        .iter()
        .map(|p| ((p[0] - cx).powi(2) + (p[1] - cy).powi(2)).sqrt())
        .sum::<f64>()
        / 4.0;
    if !mean_dist.is_finite() || mean_dist <= EPS {
        return None;
    }
    let s = std::f64::consts::SQRT_2 / mean_dist;
    let translate = Matrix3::new(1.0, 0.0, -cx, 0.0, 1.0, -cy, 0.0, 0.0, 1.0);
    let t = rescale_homography(&translate, s, s);
    let mut out = [[0.0; 2]; 4];
    for (o, p) in out.iter_mut().zip(pts.iter()) {
        *o = [(p[0] - cx) * s, (p[1] - cy) * s];
    }
    Some((t, out))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn close(a: [f64; 2], b: [f64; 2], tol: f64) -> bool {
        (a[0] - b[0]).abs() < tol && (a[1] - b[1]).abs() < tol
    }

    #[test]
    fn maps_skewed_quad_onto_rectangle() {
        let src = [[10.0, 50.2], [10.6, 50.25], [10.55, 49.9], [9.98, 49.88]];
        let dst = [[0.0, 0.0], [42_000.0, 0.0], [42_000.0, 36_000.0], [0.0, 36_000.0]];
        let h = quad_to_quad(&src, &dst).expect("non-degenerate quad");
        for (s, d) in src.iter().zip(dst.iter()) {
            let m = apply_homography_point(&h, *s).unwrap();
            assert!(close(m, *d, 1e-6), "{s:?} -> {m:?}, expected {d:?}");
        }
    }

    #[test]
    fn axis_aligned_rectangle_gives_affine_map() {
        let src = [[0.0, 10.0], [10.0, 10.0], [10.0, 0.0], [0.0, 0.0]];
        let dst = [[0.0, 0.0], [100.0, 0.0], [100.0, 50.0], [0.0, 50.0]];
        let h = quad_to_quad(&src, &dst).unwrap();
        assert!(h[(2, 0)].abs() < 1e-12 && h[(2, 1)].abs() < 1e-12);
        let m = apply_homography_point(&h, [5.0, 5.0]).unwrap();
        assert!(close(m, [50.0, 25.0], 1e-9));
        let outside = apply_homography_point(&h, [15.0, 5.0]).unwrap();
        assert!(close(outside, [150.0, 25.0], 1e-9));
    }

    #[test]
    fn collinear_points_are_rejected() {
        let src = [[0.0, 0.0], [1.0, 0.0], [2.0, 0.0], [3.0, 0.0]];
        let dst = [[0.0, 0.0], [1.0, 0.0], [1.0, 1.0], [0.0, 1.0]];
        assert!(quad_to_quad(&src, &dst).is_none());
    }

    #[test]
    fn rotation_keeps_pivot_fixed() {
        let r = rotation_about(37.0, 5.0, -3.0);
        let m = apply_homography_point(&r, [5.0, -3.0]).unwrap();
        assert!(close(m, [5.0, -3.0], 1e-12));
    }

    #[test]
    fn quarter_turn_about_center() {
        let r = rotation_about(90.0, 2.0, 1.0);
        // offset (+1, 0) from the pivot becomes (0, +1)
        let m = apply_homography_point(&r, [3.0, 1.0]).unwrap();
        assert!(close(m, [2.0, 2.0], 1e-12));
    }

    #[test]
    fn mapping_fails_on_vanishing_weight() {
        let h = Matrix3::new(1.0, 0.0, 0.0, 0.0, 1.0, 0.0, 1.0, 0.0, 0.0);
        assert!(apply_homography_point(&h, [1.0, 1.0]).is_some());
        assert!(apply_homography_point(&h, [0.0, 1.0]).is_none());
    }
}
