#[derive(Debug, Clone, PartialEq)]
pub struct Bin {
    pub start: f64,
    pub end: f64,
    pub count: u32,
}

#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    pub bins: Vec<Bin>,
}

impl Histogram {
    /// Equal-width bins over `[min, max]`. The last bin is closed on the right.
    pub fn from_values(values: &[f64], bins: usize) -> Option<Histogram> {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let min = values.iter().copied().reduce(f64::min)?;
        let max = values.iter().copied().reduce(f64::max)?;

        if min == max {
            return Some(Histogram {
                bins: vec![Bin {
                    start: min - 0.5,
                    end: max + 0.5,
                    count: values.len() as u32,
                }],
            });
        }

        let bins = bins.max(1);
        let width = (max - min) / bins as f64;
        let mut histogram = Histogram {
            bins: (0..bins)
                .map(|i| Bin {
                    start: min + width * i as f64,
                    end: if i + 1 == bins {
                        max
                    } else {
                        min + width * (i + 1) as f64
                    },
                    count: 0,
                })
                .collect(),
        };

        for value in values {
            let index = (((value - min) / width) as usize).min(bins - 1);
            histogram.bins[index].count += 1;
        }

        Some(histogram)
    }

    pub fn max_count(&self) -> u32 {
        self.bins.iter().map(|b| b.count).max().unwrap_or(0)
    }

    pub fn total(&self) -> u32 {
        self.bins.iter().map(|b| b.count).sum()
    }

    pub fn range(&self) -> (f64, f64) {
        match (self.bins.first(), self.bins.last()) {
            (Some(first), Some(last)) => (first.start, last.end),
            _ => (0.0, 1.0),
        }
    }

    /// Gaussian kernel density estimate over the histogram's range, using Scott's bandwidth.
    /// The curve is scaled to bin counts so it can be drawn over the bars.
    pub fn density_curve(&self, values: &[f64], points: usize) -> Vec<(f64, f64)> {
        let values: Vec<f64> = values.iter().copied().filter(|v| v.is_finite()).collect();
        let n = values.len();
        if n < 2 || points < 2 || self.bins.is_empty() {
            return vec![];
        }

        let mean = values.iter().sum::<f64>() / n as f64;
        let variance = values.iter().map(|v| (v - mean).powi(2)).sum::<f64>() / (n - 1) as f64;
        let bandwidth = variance.sqrt() * (n as f64).powf(-0.2);
        if !(bandwidth.is_finite() && bandwidth > 0.0) {
            return vec![];
        }

        let (x_min, x_max) = self.range();
        let bin_width = (x_max - x_min) / self.bins.len() as f64;
        let norm = 1.0 / (n as f64 * bandwidth * (2.0 * std::f64::consts::PI).sqrt());
        let scale = n as f64 * bin_width;

        (0..points)
            .map(|i| {
                let x = x_min + (x_max - x_min) * i as f64 / (points - 1) as f64;
                let density: f64 = values
                    .iter()
                    .map(|v| (-0.5 * ((x - v) / bandwidth).powi(2)).exp())
                    .sum();
                (x, density * norm * scale)
            })
            .collect()
    }
}

/// Sturges' rule: `ceil(log2 n) + 1`.
pub fn sturges_bins(n: usize) -> usize {
    match n {
        0 | 1 => 1,
        n => (n as f64).log2().ceil() as usize + 1,
    }
}

#[cfg(test)]
mod tests {
    use super::{sturges_bins, Histogram};

    const RATINGS: [f64; 9] = [3.5, 3.9, 4.0, 4.2, 4.4, 4.7, 5.0, 5.0, 3.6];

    #[test]
    fn empty_input_has_no_histogram() {
        assert_eq!(Histogram::from_values(&[], 10), None);
        assert_eq!(Histogram::from_values(&[f64::NAN], 10), None);
    }

    #[test]
    fn counts_sum_to_input_len() {
        let histogram = Histogram::from_values(&RATINGS, 10).unwrap();

        assert_eq!(histogram.bins.len(), 10);
        assert_eq!(histogram.total(), RATINGS.len() as u32);
    }

    #[test]
    fn maximum_lands_in_last_bin() {
        let histogram = Histogram::from_values(&[0.0, 5.0, 10.0], 2).unwrap();

        assert_eq!(histogram.bins[0].count, 1);
        assert_eq!(histogram.bins[1].count, 2);
        assert_eq!(histogram.range(), (0.0, 10.0));
        assert_eq!(histogram.max_count(), 2);
    }

    #[test]
    fn identical_values_use_one_bin() {
        let histogram = Histogram::from_values(&[4.0, 4.0, 4.0], 10).unwrap();

        assert_eq!(histogram.bins.len(), 1);
        assert_eq!(histogram.bins[0].count, 3);
        assert_eq!(histogram.range(), (3.5, 4.5));
    }

    #[test]
    fn density_curve_is_finite_and_non_negative() {
        let histogram = Histogram::from_values(&RATINGS, 10).unwrap();

        let curve = histogram.density_curve(&RATINGS, 100);

        assert_eq!(curve.len(), 100);
        assert_eq!(curve.first().unwrap().0, 3.5);
        assert_eq!(curve.last().unwrap().0, 5.0);
        assert!(curve.iter().all(|(x, y)| x.is_finite() && y.is_finite() && *y >= 0.0));
        assert!(curve.iter().any(|(_, y)| *y > 0.0));
    }

    #[test]
    fn density_curve_follows_the_data() {
        let values = [1.0, 1.1, 1.2, 1.1, 1.0, 9.0];
        let histogram = Histogram::from_values(&values, 8).unwrap();

        let curve = histogram.density_curve(&values, 81);
        let (peak_x, peak_y) = curve
            .iter()
            .copied()
            .fold((0.0, f64::MIN), |best, point| if point.1 > best.1 { point } else { best });

        assert!(peak_x < 3.0, "peak at {peak_x}");
        assert!(peak_y <= histogram.max_count() as f64 * 2.0);
    }

    #[test]
    fn density_curve_needs_spread() {
        let histogram = Histogram::from_values(&[4.0, 4.0, 4.0], 10).unwrap();
        assert!(histogram.density_curve(&[4.0, 4.0, 4.0], 50).is_empty());

        let histogram = Histogram::from_values(&[4.0], 10).unwrap();
        assert!(histogram.density_curve(&[4.0], 50).is_empty());
    }

    #[test]
    fn sturges() {
        assert_eq!(sturges_bins(0), 1);
        assert_eq!(sturges_bins(1), 1);
        assert_eq!(sturges_bins(2), 2);
        assert_eq!(sturges_bins(117), 8);
    }
}
