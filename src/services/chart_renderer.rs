use std::path::{Path, PathBuf};

use plotters::{drawing::DrawingAreaErrorKind, prelude::*};

use crate::domain::{
    histogram::{sturges_bins, Histogram},
    product::Product,
};

const CHART_SIZE: (u32, u32) = (1000, 600);
const BAR_COLOR: RGBColor = RGBColor(76, 114, 176);
const DENSITY_COLOR: RGBColor = RGBColor(40, 62, 100);
const DENSITY_POINTS: usize = 200;

pub const PRICE_CHART_FILE: &str = "price_distribution.svg";
pub const RATING_CHART_FILE: &str = "rating_distribution.svg";

#[derive(Debug, thiserror::Error)]
pub enum ChartError {
    #[error("failed to prepare chart directory")]
    Io(#[from] std::io::Error),
    #[error("failed to draw chart")]
    Draw(#[from] DrawingAreaErrorKind<std::io::Error>),
}

pub struct ChartLabels<'a> {
    pub title: &'a str,
    pub x_label: &'a str,
}

pub fn render_histogram(
    histogram: &Histogram,
    density: &[(f64, f64)],
    path: &Path,
    labels: &ChartLabels<'_>,
) -> Result<(), ChartError> {
    let root = SVGBackend::new(path, CHART_SIZE).into_drawing_area();
    root.fill(&WHITE)?;

    let (x_min, x_max) = histogram.range();
    let y_max = density
        .iter()
        .map(|(_, y)| *y)
        .fold(histogram.max_count() as f64, f64::max);
    let mut chart = ChartBuilder::on(&root)
        .caption(labels.title, ("sans-serif", 28))
        .margin(20)
        .x_label_area_size(50)
        .y_label_area_size(60)
        .build_cartesian_2d(x_min..x_max, 0f64..y_max * 1.1 + 1.0)?;

    chart
        .configure_mesh()
        .disable_x_mesh()
        .x_desc(labels.x_label)
        .y_desc("Frequency")
        .draw()?;

    chart.draw_series(histogram.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            BAR_COLOR.filled(),
        )
    }))?;
    chart.draw_series(histogram.bins.iter().map(|bin| {
        Rectangle::new(
            [(bin.start, 0.0), (bin.end, bin.count as f64)],
            WHITE.stroke_width(1),
        )
    }))?;
    chart.draw_series(LineSeries::new(
        density.iter().copied(),
        DENSITY_COLOR.stroke_width(2),
    ))?;

    root.present()?;
    Ok(())
}

/// Writes the price and rating histograms into `static_dir` and returns their paths.
pub fn render_catalog_charts(
    products: &[Product],
    static_dir: &Path,
    rating_bins: usize,
) -> Result<Vec<PathBuf>, ChartError> {
    std::fs::create_dir_all(static_dir)?;

    let prices: Vec<f64> = products.iter().map(|p| p.price).collect();
    let ratings: Vec<f64> = products.iter().map(|p| p.rating).collect();

    let charts = [
        (
            &prices,
            Histogram::from_values(&prices, sturges_bins(prices.len())),
            PRICE_CHART_FILE,
            ChartLabels {
                title: "Product Price Distribution",
                x_label: "Price ($)",
            },
        ),
        (
            &ratings,
            Histogram::from_values(&ratings, rating_bins),
            RATING_CHART_FILE,
            ChartLabels {
                title: "Product Rating Distribution",
                x_label: "Rating",
            },
        ),
    ];

    let mut written = vec![];
    for (values, histogram, file_name, labels) in charts {
        let Some(histogram) = histogram else {
            log::warn!("No values to plot for {}", file_name);
            continue;
        };

        let density = histogram.density_curve(values, DENSITY_POINTS);
        let path = static_dir.join(file_name);
        render_histogram(&histogram, &density, &path, &labels)?;
        log::info!("{} saved to {}", labels.title, path.display());
        written.push(path);
    }

    Ok(written)
}

#[cfg(test)]
mod tests {
    use super::*;

    fn product(price: f64, rating: f64) -> Product {
        Product {
            title: "Dell Latitude".to_string(),
            price,
            rating,
            description: String::new(),
        }
    }

    #[test]
    fn render_catalog_charts_writes_both_charts() {
        let dir = tempfile::tempdir().unwrap();
        let static_dir = dir.path().join("static");
        let products = vec![
            product(295.99, 3.6),
            product(416.99, 4.1),
            product(1139.54, 4.9),
            product(1799.0, 5.0),
        ];

        let written = render_catalog_charts(&products, &static_dir, 10).unwrap();

        assert_eq!(
            written,
            vec![
                static_dir.join(PRICE_CHART_FILE),
                static_dir.join(RATING_CHART_FILE)
            ]
        );
        let price_svg = std::fs::read_to_string(&written[0]).unwrap();
        assert!(price_svg.contains("<svg"));
        assert!(price_svg.contains("Product Price Distribution"));
        let rating_svg = std::fs::read_to_string(&written[1]).unwrap();
        assert!(rating_svg.contains("Product Rating Distribution"));
    }

    #[test]
    fn density_curve_is_drawn_over_bars() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("ratings.svg");
        let ratings = [3.6, 4.1, 4.4, 4.9, 5.0];
        let histogram = Histogram::from_values(&ratings, 10).unwrap();
        let density = histogram.density_curve(&ratings, 50);
        let labels = ChartLabels {
            title: "Ratings",
            x_label: "Rating",
        };

        render_histogram(&histogram, &[], &path, &labels).unwrap();
        let bars_only = std::fs::read_to_string(&path).unwrap();
        render_histogram(&histogram, &density, &path, &labels).unwrap();
        let with_density = std::fs::read_to_string(&path).unwrap();

        let density_stroke = r##"stroke="#283E64""##;
        assert!(!bars_only.contains(density_stroke));
        assert!(with_density.contains(density_stroke));
    }

    #[test]
    fn render_catalog_charts_single_product() {
        let dir = tempfile::tempdir().unwrap();

        let written = render_catalog_charts(&[product(499.0, 4.5)], dir.path(), 10).unwrap();

        assert_eq!(written.len(), 2);
    }

    #[test]
    fn render_catalog_charts_skips_empty_catalog() {
        let dir = tempfile::tempdir().unwrap();

        let written = render_catalog_charts(&[], dir.path(), 10).unwrap();

        assert!(written.is_empty());
    }
}
