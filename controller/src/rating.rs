// Copyright (c) 2020 White Leaf
//
// This software is released under the MIT License.
// https://opensource.org/licenses/MIT

use crate::error::ErrorKind;

/// Clip a submitted score into `(min, max)`, this is the only place where
/// the active rating range is enforced, lookups trust what's stored.
pub fn clamp_rating(score: f64, (min, max): (f64, f64)) -> Result<f64, ErrorKind> {
    if score.is_nan() {
        return Err(ErrorKind::InvalidRating(score.to_string()));
    }

    Ok(score.max(min).min(max))
}

#[cfg(test)]
mod tests {
    use super::*;
    use assert_approx_eq::*;

    const RANGE: (f64, f64) = (0., 5.);

    #[test]
    fn scores_in_range_are_untouched() -> Result<(), ErrorKind> {
        assert_approx_eq!(clamp_rating(0., RANGE)?, 0.);
        assert_approx_eq!(clamp_rating(3.5, RANGE)?, 3.5);
        assert_approx_eq!(clamp_rating(5., RANGE)?, 5.);

        Ok(())
    }

    #[test]
    fn scores_out_of_range_are_clamped() -> Result<(), ErrorKind> {
        assert_approx_eq!(clamp_rating(7., RANGE)?, 5.);
        assert_approx_eq!(clamp_rating(-2., RANGE)?, 0.);
        assert_approx_eq!(clamp_rating(f64::INFINITY, RANGE)?, 5.);

        Ok(())
    }

    #[test]
    fn nan_is_rejected() {
        assert!(clamp_rating(f64::NAN, RANGE).is_err());
    }
}
