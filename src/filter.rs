// -*- coding: utf-8 -*-
// SPDX-License-Identifier: Apache-2.0 OR MIT

/// Arithmetic mean. Zero for an empty slice.
pub fn mean(samples: &[u16]) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let sum: u64 = samples.iter().map(|&s| u64::from(s)).sum();
    sum as f64 / samples.len() as f64
}

/// Population standard deviation around `mean`.
fn std_dev(samples: &[u16], mean: f64) -> f64 {
    if samples.is_empty() {
        return 0.0;
    }
    let var = samples
        .iter()
        .map(|&s| {
            let d = f64::from(s) - mean;
            d * d
        })
        .sum::<f64>()
        / samples.len() as f64;
    var.sqrt()
}

/// Standardized deviation of every sample from the batch mean.
///
/// All scores are zero, if there are less than two samples
/// or if all samples are equal.
pub fn z_scores(samples: &[u16]) -> Vec<f64> {
    if samples.len() < 2 {
        return vec![0.0; samples.len()];
    }
    let mean = mean(samples);
    let sd = std_dev(samples, mean);
    if sd == 0.0 {
        return vec![0.0; samples.len()];
    }
    samples.iter().map(|&s| (f64::from(s) - mean) / sd).collect()
}

#[derive(Copy, Clone, Debug, PartialEq)]
pub struct FilteredMean {
    /// Mean code of the samples that passed the filter.
    pub mean: f64,
    /// Number of samples that went into `mean`.
    pub kept: usize,
    /// Number of samples rejected as outliers.
    pub rejected: usize,
    /// Every sample was an outlier and `mean` is the unfiltered batch mean.
    pub fallback: bool,
}

/// Mean of all samples with an absolute z-score below `threshold`.
pub fn filtered_mean(samples: &[u16], threshold: f64) -> FilteredMean {
    let scores = z_scores(samples);
    let kept: Vec<u16> = samples
        .iter()
        .zip(scores.iter())
        .filter(|(_, z)| z.abs() < threshold)
        .map(|(&s, _)| s)
        .collect();

    if kept.is_empty() {
        FilteredMean {
            mean: mean(samples),
            kept: samples.len(),
            rejected: 0,
            fallback: true,
        }
    } else {
        FilteredMean {
            mean: mean(&kept),
            kept: kept.len(),
            rejected: samples.len() - kept.len(),
            fallback: false,
        }
    }
}

#[cfg(test)]
mod test {
    use super::*;

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[4095]), 4095.0);
        assert_eq!(mean(&[1, 2, 3, 4]), 2.5);
        assert_eq!(mean(&[4095; 1000]), 4095.0);
    }

    #[test]
    fn test_z_scores() {
        assert!(z_scores(&[]).is_empty());
        assert_eq!(z_scores(&[1234]), vec![0.0]);
        assert_eq!(z_scores(&[7, 7, 7]), vec![0.0, 0.0, 0.0]);

        // mean 2, population std dev 1
        let z = z_scores(&[1, 3, 1, 3]);
        assert_eq!(z, vec![-1.0, 1.0, -1.0, 1.0]);
    }

    #[test]
    fn test_single_outlier() {
        let mut samples = vec![2048_u16; 99];
        samples.push(0);
        let f = filtered_mean(&samples, 3.0);
        assert_eq!(f.mean, 2048.0);
        assert_eq!(f.kept, 99);
        assert_eq!(f.rejected, 1);
        assert!(!f.fallback);
    }

    #[test]
    fn test_noise_kept() {
        let samples: Vec<u16> = (0..100).map(|i| 1000 + (i % 5)).collect();
        let f = filtered_mean(&samples, 3.0);
        assert_eq!(f.rejected, 0);
        assert_eq!(f.mean, 1002.0);
    }

    #[test]
    fn test_too_few() {
        let f = filtered_mean(&[], 3.0);
        assert_eq!(f.mean, 0.0);
        assert!(f.fallback);

        let f = filtered_mean(&[100], 3.0);
        assert_eq!(f.mean, 100.0);
        assert_eq!(f.kept, 1);
        assert!(!f.fallback);
    }

    #[test]
    fn test_zero_variance() {
        let f = filtered_mean(&[555; 100], 3.0);
        assert_eq!(f.mean, 555.0);
        assert_eq!(f.kept, 100);
        assert_eq!(f.rejected, 0);
        assert!(!f.fallback);
    }

    #[test]
    fn test_fallback() {
        // Every sample is exactly one standard deviation away from the mean.
        let samples = [10, 30, 10, 30];
        let f = filtered_mean(&samples, 0.5);
        assert!(f.fallback);
        assert_eq!(f.mean, 20.0);
        assert_eq!(f.kept, 4);
        assert_eq!(f.rejected, 0);
    }

    #[test]
    fn test_threshold() {
        // mean 2, std dev 0.707: the outer samples have |z| > 1
        let f = filtered_mean(&[1, 3, 2, 2], 1.0);
        assert!(!f.fallback);
        assert_eq!(f.kept, 2);
        assert_eq!(f.mean, 2.0);
    }
}

// vim: ts=4 sw=4 expandtab
