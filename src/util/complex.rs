// internal utilities for dealing with Complex annoyances

use std::cmp::Ordering;

use num::Complex;

use crate::RealScalar;

pub(crate) fn c_is_finite<T: RealScalar>(z: &Complex<T>) -> bool {
    z.re.is_finite() && z.im.is_finite()
}

// sort a slice of complex numbers lexicographically, using their real part first
pub(crate) fn complex_sort_mut<T: RealScalar>(v: &mut [Complex<T>]) {
    v.sort_by(|a, b| {
        let re_ord = a.re.partial_cmp(&b.re).unwrap_or(Ordering::Equal);
        if re_ord != Ordering::Equal {
            return re_ord;
        }
        a.im.partial_cmp(&b.im).unwrap_or(Ordering::Equal)
    });
}

/// formatting for Complex in the engineering notation used by the reports,
/// e.g. `-0.5000 + j0.8660`
pub(crate) fn complex_fmt<T: RealScalar>(c: &Complex<T>, precision: usize) -> String {
    let (r, i) = (c.re, c.im);
    if i.is_zero() {
        format!("{r:.precision$}")
    } else if i.is_sign_negative() {
        format!("{r:.precision$} - j{:.precision$}", i.abs())
    } else {
        format!("{r:.precision$} + j{i:.precision$}")
    }
}

#[cfg(test)]
mod test {
    use num::complex::Complex64;

    use super::{complex_fmt, complex_sort_mut};

    #[test]
    fn sort() {
        let mut v = vec![
            Complex64::new(1.0, 0.0),
            Complex64::new(-1.0, 2.0),
            Complex64::new(-1.0, -2.0),
        ];
        complex_sort_mut(&mut v);
        assert_eq!(
            v,
            vec![
                Complex64::new(-1.0, -2.0),
                Complex64::new(-1.0, 2.0),
                Complex64::new(1.0, 0.0)
            ]
        );
    }

    #[test]
    fn display() {
        assert_eq!(complex_fmt(&Complex64::new(-0.5, 0.866), 3), "-0.500 + j0.866");
        assert_eq!(complex_fmt(&Complex64::new(-0.5, -0.866), 3), "-0.500 - j0.866");
        assert_eq!(complex_fmt(&Complex64::new(2.0, 0.0), 1), "2.0");
    }
}
