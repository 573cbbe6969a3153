use splat_prep::glam::*;

pub fn approx_slice(a: &[f32], b: &[f32], epsilon: f32) {
    assert_eq!(a.len(), b.len(), "length mismatch\n left: {a:?}\nright: {b:?}");
    assert!(
        a.iter().zip(b.iter()).all(|(x, y)| (x - y).abs() < epsilon),
        " left: {a:?}\nright: {b:?}"
    );
}

/// Eigenvalues of a symmetric matrix in ascending order.
pub fn symmetric_eigenvalues(m: Mat3) -> [f64; 3] {
    let m = m.as_dmat3();
    let (a00, a11, a22) = (m.x_axis.x, m.y_axis.y, m.z_axis.z);
    let off_diagonal = m.y_axis.x.powi(2) + m.z_axis.x.powi(2) + m.z_axis.y.powi(2);

    let mut eigenvalues = if off_diagonal == 0.0 {
        [a00, a11, a22]
    } else {
        let q = (a00 + a11 + a22) / 3.0;
        let p = (((a00 - q).powi(2) + (a11 - q).powi(2) + (a22 - q).powi(2)
            + 2.0 * off_diagonal)
            / 6.0)
            .sqrt();
        let b = (m - DMat3::from_diagonal(DVec3::splat(q))) * (1.0 / p);
        let phi = (b.determinant() / 2.0).clamp(-1.0, 1.0).acos() / 3.0;

        let largest = q + 2.0 * p * phi.cos();
        let smallest = q + 2.0 * p * (phi + 2.0 * std::f64::consts::PI / 3.0).cos();
        [largest, 3.0 * q - largest - smallest, smallest]
    };

    eigenvalues.sort_by(f64::total_cmp);
    eigenvalues
}

pub fn positive_semidefinite(m: Mat3) {
    const EPSILON: f64 = 1e-5;

    assert!(
        m.abs_diff_eq(m.transpose(), 0.0),
        "matrix is not symmetric: {m:?}"
    );

    let eigenvalues = symmetric_eigenvalues(m);
    assert!(
        eigenvalues.iter().all(|&e| e >= -EPSILON),
        "matrix is not positive semidefinite: {m:?}, eigenvalues: {eigenvalues:?}"
    );
}

pub fn unit_quat(q: Quat) {
    assert!(
        (q.length() - 1.0).abs() < 1e-5,
        "quaternion is not unit: {q:?}, length {}",
        q.length()
    );
}
