use std::path::Path;

use plotters::prelude::*;

use crate::error::{Result, TankError};

/// Index of the first maximum. Incomparable values (NaN) never win.
#[inline(always)]
pub fn argmax<T: PartialOrd>(values: impl Iterator<Item = T>) -> usize {
    let mut best: Option<(usize, T)> = None;
    for (i, v) in values.enumerate() {
        let replace = match &best {
            Some((_, b)) => v > *b,
            None => true,
        };
        if replace {
            best = Some((i, v));
        }
    }
    best.map_or(0, |(i, _)| i)
}

#[inline(always)]
pub fn max<'a>(values: impl Iterator<Item = &'a f64>) -> f64 {
    values.fold(f64::NEG_INFINITY, |acc, x| acc.max(*x))
}

/// Averages consecutive, non-overlapping windows; the last one may be shorter.
pub fn moving_average(window: usize, values: &[f64]) -> Vec<f64> {
    values
        .chunks(window.max(1))
        .map(|chunk| chunk.iter().sum::<f64>() / chunk.len() as f64)
        .collect()
}

fn plot_error(e: impl std::fmt::Display) -> TankError {
    TankError::Plot(e.to_string())
}

/// Writes one SVG line chart with a series per entry of `values`.
pub fn plot_moving_average(
    values: &[Vec<f64>],
    colors: &[&RGBColor],
    legends: &[&str],
    title: &str,
    path: &Path,
) -> Result<()> {
    let root = SVGBackend::new(path, (1024, 768)).into_drawing_area();
    root.fill(&WHITE).map_err(plot_error)?;

    let len = values.iter().map(Vec::len).max().unwrap_or(0).max(2);
    let (lo, hi) = values
        .iter()
        .flatten()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(lo, hi), v| {
            (lo.min(*v), hi.max(*v))
        });
    let (lo, hi) = match (lo.is_finite(), hi > lo) {
        (true, true) => (lo, hi),
        (true, false) => (lo - 1.0, lo + 1.0),
        _ => (0.0, 1.0),
    };

    let mut chart = ChartBuilder::on(&root)
        .caption(title, ("sans-serif", 30).into_font())
        .margin(10)
        .x_label_area_size(40)
        .y_label_area_size(60)
        .build_cartesian_2d(0f64..(len - 1) as f64, lo..hi)
        .map_err(plot_error)?;
    chart.configure_mesh().draw().map_err(plot_error)?;

    for ((series, color), legend) in values.iter().zip(colors).zip(legends) {
        let color = **color;
        chart
            .draw_series(LineSeries::new(
                series.iter().enumerate().map(|(i, v)| (i as f64, *v)),
                &color,
            ))
            .map_err(plot_error)?
            .label(*legend)
            .legend(move |(x, y)| PathElement::new(vec![(x, y), (x + 20, y)], &color));
    }

    chart
        .configure_series_labels()
        .background_style(&WHITE.mix(0.8))
        .border_style(&BLACK)
        .draw()
        .map_err(plot_error)?;
    root.present().map_err(plot_error)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn argmax_prefers_first_of_ties() {
        assert_eq!(argmax([1.0, 3.0, 3.0].iter()), 1);
        assert_eq!(argmax([5.0, 5.0, 5.0].iter()), 0);
        assert_eq!(argmax([-2.0, -1.0, -3.0].iter()), 1);
    }

    #[test]
    fn max_scans_all_values() {
        assert_eq!(max([-2.0, 7.5, 1.0].iter()), 7.5);
    }

    #[test]
    fn moving_average_handles_partial_tail() {
        let avg = moving_average(2, &[1.0, 3.0, 5.0, 7.0, 10.0]);
        assert_eq!(avg, vec![2.0, 6.0, 10.0]);
    }

    #[test]
    fn moving_average_with_zero_window_keeps_values() {
        assert_eq!(moving_average(0, &[1.0, 2.0]), vec![1.0, 2.0]);
    }
}
