use std::ops::Range;
use std::path::Path;

use anyhow::{Result, anyhow};
use plotters::prelude::*;
use rand::rngs::StdRng;
use rand::{Rng, SeedableRng};

use crate::cluster::dataset::Point;
use crate::cluster::kmeans::Cluster;
use crate::constants::*;

const GRID_COLOR: RGBColor = RGBColor(220, 220, 220);

/// Axis ranges shared by every frame of one run.
#[derive(Debug, Clone, PartialEq)]
pub struct Bounds {
    pub x: Range<f64>,
    pub y: Range<f64>,
}

impl Bounds {
    /// Smallest box around `points`, widened by the plot padding.
    pub fn around(points: &[Point]) -> Self {
        let axis = |i: usize| {
            let (lo, hi) = points.iter().fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), p| {
                (lo.min(p[i]), hi.max(p[i]))
            });
            if !lo.is_finite() || !hi.is_finite() {
                return 0.0..1.0;
            }
            let span = hi - lo;
            if span <= f64::EPSILON {
                return (lo - 0.5)..(hi + 0.5);
            }
            (lo - span * PLOT_PADDING)..(hi + span * PLOT_PADDING)
        };
        Self { x: axis(0), y: axis(1) }
    }
}

/// One colour per cluster, identical across frames.
fn palette(count: usize) -> Vec<RGBColor> {
    let mut rng = StdRng::seed_from_u64(0);
    (0..count)
        .map(|_| {
            RGBColor(rng.random_range(0..255), rng.random_range(0..255), rng.random_range(0..255))
        })
        .collect()
}

/// Renders one k-means iteration as a PNG scatter plot.
pub fn render(clusters: &[Cluster], bounds: &Bounds, path: &Path) -> Result<()> {
    let root = BitMapBackend::new(path, (PLOT_WIDTH, PLOT_HEIGHT)).into_drawing_area();
    root.fill(&WHITE).map_err(|e| anyhow!("failed to clear plot: {}", e))?;

    let mut chart = ChartBuilder::on(&root)
        .margin(PLOT_MARGIN)
        .build_cartesian_2d(bounds.x.clone(), bounds.y.clone())
        .map_err(|e| anyhow!("failed to lay out plot: {}", e))?;

    let (x, y) = (&bounds.x, &bounds.y);
    let step = |r: &Range<f64>, i: usize| {
        r.start + (r.end - r.start) * i as f64 / PLOT_GRID_LINES as f64
    };
    let grid = (0..=PLOT_GRID_LINES).flat_map(|i| {
        [
            PathElement::new(
                vec![(step(x, i), y.start), (step(x, i), y.end)],
                GRID_COLOR.stroke_width(1),
            ),
            PathElement::new(
                vec![(x.start, step(y, i)), (x.end, step(y, i))],
                GRID_COLOR.stroke_width(1),
            ),
        ]
    });
    chart.draw_series(grid).map_err(|e| anyhow!("failed to draw grid: {}", e))?;

    for (cluster, color) in clusters.iter().zip(palette(clusters.len())) {
        chart
            .draw_series(
                cluster
                    .members
                    .iter()
                    .map(|p| Circle::new((p[0], p[1]), POINT_RADIUS, color.filled())),
            )
            .map_err(|e| anyhow!("failed to draw points: {}", e))?;
    }
    chart
        .draw_series(
            clusters
                .iter()
                .map(|c| Circle::new((c.center[0], c.center[1]), CENTER_RADIUS, BLACK.filled())),
        )
        .map_err(|e| anyhow!("failed to draw centres: {}", e))?;

    root.present().map_err(|e| anyhow!("failed to write {}: {}", path.display(), e))?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn bounds_pad_the_data_span() {
        let bounds = Bounds::around(&[[0.0, 10.0], [1.0, 20.0]]);
        assert!((bounds.x.start + 0.05).abs() < 1e-9);
        assert!((bounds.x.end - 1.05).abs() < 1e-9);
        assert!((bounds.y.start - 9.5).abs() < 1e-9);
        assert!((bounds.y.end - 20.5).abs() < 1e-9);
    }

    #[test]
    fn degenerate_bounds_stay_drawable() {
        let bounds = Bounds::around(&[[2.0, 2.0]]);
        assert_eq!(bounds.x, 1.5..2.5);
        assert_eq!(Bounds::around(&[]).y, 0.0..1.0);
    }

    #[test]
    fn palette_is_stable() {
        let rgb =
            |colors: Vec<RGBColor>| colors.iter().map(|c| (c.0, c.1, c.2)).collect::<Vec<_>>();
        assert_eq!(rgb(palette(4)), rgb(palette(4)));
        assert_eq!(rgb(palette(2)), rgb(palette(4))[..2]);
    }

    #[test]
    fn writes_a_png_of_the_plot_size() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("points_0000.png");
        let clusters = vec![
            Cluster { center: [0.2, 0.2], members: vec![[0.1, 0.2], [0.3, 0.2]] },
            Cluster { center: [0.8, 0.8], members: vec![[0.8, 0.7], [0.8, 0.9]] },
        ];
        let bounds = Bounds::around(&[[0.1, 0.2], [0.3, 0.2], [0.8, 0.7], [0.8, 0.9]]);

        render(&clusters, &bounds, &path).unwrap();
        let image = image::open(&path).unwrap();
        assert_eq!((image.width(), image.height()), (PLOT_WIDTH, PLOT_HEIGHT));
    }
}
