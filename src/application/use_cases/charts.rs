// ============================================================
// CHART RENDERING USE CASE
// ============================================================
// Validate a chart request against the store, pull the data out, and
// draw it to PNG bytes. Axis styling mirrors the presentation layer's
// conventions; the heavy lifting is plotters on an in-memory bitmap.

use plotters::prelude::*;
use plotters::style::text_anchor::{HPos, Pos, VPos};
use tracing::info;

use crate::domain::chart::{ChartKind, ChartOptions, ChartRequest};
use crate::domain::error::{AppError, Result};
use crate::domain::table::TableStore;
use crate::infrastructure::render::{encode_png, pixel_buffer, render_error};

/// Histogram bin count, shared by every overlaid series
const HISTOGRAM_BINS: usize = 10;

/// Render the requested chart as PNG bytes. The store is never
/// mutated; a request that fails validation renders nothing.
pub fn render_chart(
    store: &TableStore,
    request: &ChartRequest,
    options: &ChartOptions,
) -> Result<Vec<u8>> {
    options.validate().map_err(AppError::ValidationError)?;
    request.validate(store)?;

    info!(
        "Rendering {} over columns {:?}",
        request.kind, request.columns
    );

    match request.kind {
        ChartKind::Line => render_line(store, &request.columns, options),
        ChartKind::Bar => render_bar(store, &request.columns, options),
        ChartKind::Scatter => render_scatter(store, &request.columns, options),
        ChartKind::Histogram => render_histogram(store, &request.columns, options),
        ChartKind::CorrelationHeatmap => render_heatmap(store, options),
    }
}

/// (row index, value) points of one numeric column, nulls skipped
fn series_points(store: &TableStore, name: &str) -> Result<Vec<(f64, f64)>> {
    let index = store
        .column_index(name)
        .ok_or_else(|| AppError::ValidationError(format!("Column not found: {}", name)))?;

    Ok(store
        .column_values(index)
        .enumerate()
        .filter_map(|(row, value)| value.as_number().map(|n| (row as f64, n)))
        .collect())
}

/// Value range padded so flat or empty data still draws a usable axis
fn padded(min: f64, max: f64) -> std::ops::Range<f64> {
    if !min.is_finite() || !max.is_finite() {
        return 0.0..1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        return (min - 1.0)..(max + 1.0);
    }
    let margin = (max - min) * 0.05;
    (min - margin)..(max + margin)
}

fn value_bounds<'a>(points: impl Iterator<Item = &'a (f64, f64)>) -> (f64, f64) {
    points.fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &(_, v)| {
        (min.min(v), max.max(v))
    })
}

fn caption_for(options: &ChartOptions, fallback: String) -> String {
    options.caption.clone().unwrap_or(fallback)
}

fn render_line(store: &TableStore, columns: &[String], options: &ChartOptions) -> Result<Vec<u8>> {
    let series: Vec<(String, Vec<(f64, f64)>)> = columns
        .iter()
        .map(|name| Ok((name.clone(), series_points(store, name)?)))
        .collect::<Result<_>>()?;

    let (y_min, y_max) = value_bounds(series.iter().flat_map(|(_, pts)| pts.iter()));
    let x_max = store.rows().len().saturating_sub(1) as f64;
    let caption = caption_for(options, ChartKind::Line.label().to_string());

    let (width, height) = (options.width, options.height);
    let mut raw = pixel_buffer(width, height);
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(padded(0.0, x_max), padded(y_min, y_max))
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Index")
            .y_desc("Values")
            .draw()
            .map_err(render_error)?;

        for (idx, (name, points)) in series.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            chart
                .draw_series(LineSeries::new(
                    points.iter().copied(),
                    color.stroke_width(2),
                ))
                .map_err(render_error)?
                .label(name.clone())
                .legend(move |(x, y)| {
                    PathElement::new(vec![(x, y), (x + 20, y)], color.stroke_width(2))
                });

            chart
                .draw_series(
                    points
                        .iter()
                        .map(|&point| Circle::new(point, 3, color.filled())),
                )
                .map_err(render_error)?;
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_png(width, height, raw)
}

fn render_bar(store: &TableStore, columns: &[String], options: &ChartOptions) -> Result<Vec<u8>> {
    let series: Vec<(String, Vec<(f64, f64)>)> = columns
        .iter()
        .map(|name| Ok((name.clone(), series_points(store, name)?)))
        .collect::<Result<_>>()?;

    let (y_min, y_max) = value_bounds(series.iter().flat_map(|(_, pts)| pts.iter()));
    // Bars grow from zero in either direction
    let y_range = padded(y_min.min(0.0), y_max.max(0.0));
    let x_max = store.rows().len() as f64;
    let caption = caption_for(options, ChartKind::Bar.label().to_string());

    let group_width = 0.8;
    let bar_width = group_width / series.len() as f64;

    let (width, height) = (options.width, options.height);
    let mut raw = pixel_buffer(width, height);
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(-1.0..x_max, y_range)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Index")
            .y_desc("Values")
            .draw()
            .map_err(render_error)?;

        for (idx, (name, points)) in series.iter().enumerate() {
            let color = Palette99::pick(idx).to_rgba();
            let offset = idx as f64 * bar_width - group_width / 2.0;

            chart
                .draw_series(points.iter().map(|&(row, value)| {
                    let x0 = row + offset;
                    Rectangle::new([(x0, 0.0), (x0 + bar_width, value)], color.filled())
                }))
                .map_err(render_error)?
                .label(name.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_png(width, height, raw)
}

fn render_scatter(
    store: &TableStore,
    columns: &[String],
    options: &ChartOptions,
) -> Result<Vec<u8>> {
    // Only the first two selected columns are drawn
    let (x_name, y_name) = (&columns[0], &columns[1]);
    let x_index = store
        .column_index(x_name)
        .ok_or_else(|| AppError::ValidationError(format!("Column not found: {}", x_name)))?;
    let y_index = store
        .column_index(y_name)
        .ok_or_else(|| AppError::ValidationError(format!("Column not found: {}", y_name)))?;

    // Rows where either side is missing are dropped
    let points: Vec<(f64, f64)> = store
        .rows()
        .iter()
        .filter_map(|row| match (row[x_index].as_number(), row[y_index].as_number()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();

    let (x_min, x_max) = points
        .iter()
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &(x, _)| {
            (min.min(x), max.max(x))
        });
    let (y_min, y_max) = value_bounds(points.iter());
    let caption = caption_for(options, format!("Scatter Plot: {} vs {}", x_name, y_name));

    let (width, height) = (options.width, options.height);
    let mut raw = pixel_buffer(width, height);
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(padded(x_min, x_max), padded(y_min, y_max))
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc(x_name.as_str())
            .y_desc(y_name.as_str())
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series(
                points
                    .iter()
                    .map(|&point| Circle::new(point, 4, BLUE.filled())),
            )
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_png(width, height, raw)
}

fn render_histogram(
    store: &TableStore,
    columns: &[String],
    options: &ChartOptions,
) -> Result<Vec<u8>> {
    let series: Vec<(String, Vec<f64>)> = columns
        .iter()
        .map(|name| {
            let values = series_points(store, name)?
                .into_iter()
                .map(|(_, v)| v)
                .collect();
            Ok((name.clone(), values))
        })
        .collect::<Result<_>>()?;

    // Shared bin edges across every overlaid distribution
    let (mut min, mut max) = series
        .iter()
        .flat_map(|(_, values)| values.iter())
        .fold((f64::INFINITY, f64::NEG_INFINITY), |(min, max), &v| {
            (min.min(v), max.max(v))
        });
    if !min.is_finite() || !max.is_finite() {
        min = 0.0;
        max = 1.0;
    }
    if (max - min).abs() < f64::EPSILON {
        min -= 0.5;
        max += 0.5;
    }
    let bin_width = (max - min) / HISTOGRAM_BINS as f64;

    let binned: Vec<(String, Vec<usize>)> = series
        .into_iter()
        .map(|(name, values)| {
            let mut counts = vec![0usize; HISTOGRAM_BINS];
            for value in values {
                let bin = (((value - min) / bin_width) as usize).min(HISTOGRAM_BINS - 1);
                counts[bin] += 1;
            }
            (name, counts)
        })
        .collect();

    let tallest = binned
        .iter()
        .flat_map(|(_, counts)| counts.iter())
        .copied()
        .max()
        .unwrap_or(0);
    let caption = caption_for(options, ChartKind::Histogram.label().to_string());

    let (width, height) = (options.width, options.height);
    let mut raw = pixel_buffer(width, height);
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(30)
            .y_label_area_size(40)
            .build_cartesian_2d(min..max, 0.0..(tallest.max(1) as f64 * 1.1))
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .x_desc("Value")
            .y_desc("Frequency")
            .draw()
            .map_err(render_error)?;

        for (idx, (name, counts)) in binned.iter().enumerate() {
            // Semi-transparent so overlapping distributions stay visible
            let color = Palette99::pick(idx).to_rgba().mix(0.5);

            chart
                .draw_series(counts.iter().enumerate().filter(|&(_, &c)| c > 0).map(
                    |(bin, &count)| {
                        let x0 = min + bin as f64 * bin_width;
                        Rectangle::new([(x0, 0.0), (x0 + bin_width, count as f64)], color.filled())
                    },
                ))
                .map_err(render_error)?
                .label(name.clone())
                .legend(move |(x, y)| {
                    Rectangle::new([(x, y - 5), (x + 10, y + 5)], color.filled())
                });
        }

        chart
            .configure_series_labels()
            .border_style(&BLACK)
            .background_style(&WHITE.mix(0.8))
            .draw()
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_png(width, height, raw)
}

fn render_heatmap(store: &TableStore, options: &ChartOptions) -> Result<Vec<u8>> {
    let indices = store.numeric_column_indices();
    let names: Vec<String> = indices
        .iter()
        .map(|&idx| store.columns()[idx].name.clone())
        .collect();
    let size = indices.len();

    let matrix: Vec<Vec<Option<f64>>> = indices
        .iter()
        .map(|&a| indices.iter().map(|&b| pearson(store, a, b)).collect())
        .collect();

    let caption = caption_for(options, ChartKind::CorrelationHeatmap.label().to_string());

    let (width, height) = (options.width, options.height);
    let mut raw = pixel_buffer(width, height);
    {
        let root = BitMapBackend::with_buffer(&mut raw, (width, height)).into_drawing_area();
        root.fill(&WHITE).map_err(render_error)?;

        let mut chart = ChartBuilder::on(&root)
            .caption(&caption, ("sans-serif", 30).into_font())
            .margin(10)
            .x_label_area_size(60)
            .y_label_area_size(80)
            .build_cartesian_2d(0.0..size as f64, 0.0..size as f64)
            .map_err(render_error)?;

        chart
            .configure_mesh()
            .disable_x_mesh()
            .disable_y_mesh()
            .x_labels(size)
            .y_labels(size)
            .x_label_formatter(&|v| label_at(&names, *v))
            .y_label_formatter(&|v| label_at(&names, *v))
            .draw()
            .map_err(render_error)?;

        chart
            .draw_series((0..size).flat_map(|col| {
                let matrix = &matrix;
                (0..size).map(move |row| {
                    let fill = match matrix[col][row] {
                        Some(r) => correlation_color(r),
                        None => RGBColor(220, 220, 220),
                    };
                    Rectangle::new(
                        [
                            (col as f64, row as f64),
                            ((col + 1) as f64, (row + 1) as f64),
                        ],
                        fill.filled(),
                    )
                })
            }))
            .map_err(render_error)?;

        // Annotate each cell with its coefficient
        let annotation = ("sans-serif", 15)
            .into_font()
            .color(&BLACK)
            .pos(Pos::new(HPos::Center, VPos::Center));
        chart
            .draw_series((0..size).flat_map(|col| {
                let matrix = &matrix;
                let annotation = annotation.clone();
                (0..size).filter_map(move |row| {
                    matrix[col][row].map(|r| {
                        Text::new(
                            format!("{:.2}", r),
                            (col as f64 + 0.5, row as f64 + 0.5),
                            annotation.clone(),
                        )
                    })
                })
            }))
            .map_err(render_error)?;

        root.present().map_err(render_error)?;
    }

    encode_png(width, height, raw)
}

fn label_at(names: &[String], position: f64) -> String {
    let index = position.floor();
    if index < 0.0 {
        return String::new();
    }
    names
        .get(index as usize)
        .cloned()
        .unwrap_or_default()
}

/// Pairwise-complete Pearson correlation between two numeric columns.
/// None when fewer than two complete pairs exist or a side is constant.
fn pearson(store: &TableStore, a: usize, b: usize) -> Option<f64> {
    let pairs: Vec<(f64, f64)> = store
        .rows()
        .iter()
        .filter_map(|row| match (row[a].as_number(), row[b].as_number()) {
            (Some(x), Some(y)) => Some((x, y)),
            _ => None,
        })
        .collect();

    if pairs.len() < 2 {
        return None;
    }

    let n = pairs.len() as f64;
    let mean_x = pairs.iter().map(|(x, _)| x).sum::<f64>() / n;
    let mean_y = pairs.iter().map(|(_, y)| y).sum::<f64>() / n;

    let mut cov = 0.0;
    let mut var_x = 0.0;
    let mut var_y = 0.0;
    for &(x, y) in &pairs {
        cov += (x - mean_x) * (y - mean_y);
        var_x += (x - mean_x).powi(2);
        var_y += (y - mean_y).powi(2);
    }

    let denominator = (var_x * var_y).sqrt();
    if denominator == 0.0 {
        return None;
    }

    Some(cov / denominator)
}

/// Map a coefficient in [-1, 1] onto a cool-to-warm gradient
fn correlation_color(r: f64) -> RGBColor {
    let clamped = r.clamp(-1.0, 1.0);
    let blend = |from: u8, to: u8, t: f64| (from as f64 + (to as f64 - from as f64) * t) as u8;

    let neutral = (245u8, 245u8, 245u8);
    let (target, t) = if clamped < 0.0 {
        ((59u8, 76u8, 192u8), -clamped)
    } else {
        ((180u8, 4u8, 38u8), clamped)
    };

    RGBColor(
        blend(neutral.0, target.0, t),
        blend(neutral.1, target.1, t),
        blend(neutral.2, target.2, t),
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::application::use_cases::ingestion::ingest;
    use crate::domain::chart::{ChartKind, ChartRequest};

    const PNG_SIGNATURE: [u8; 8] = [0x89, b'P', b'N', b'G', b'\r', b'\n', 0x1A, b'\n'];

    const SAMPLE_CSV: &str = "\
x,y,label
1,2,a
2,4,b
3,6,a
4,,b
5,10,a";

    fn sample_store() -> TableStore {
        ingest(SAMPLE_CSV.as_bytes(), "csv").unwrap()
    }

    fn small_options() -> ChartOptions {
        ChartOptions {
            width: 320,
            height: 240,
            caption: None,
        }
    }

    #[test]
    fn test_line_chart_renders_png() {
        let store = sample_store();
        let request = ChartRequest::new(ChartKind::Line, vec!["x".to_string(), "y".to_string()]);
        let png = render_chart(&store, &request, &small_options()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_bar_chart_renders_png() {
        let store = sample_store();
        let request = ChartRequest::new(ChartKind::Bar, vec!["y".to_string()]);
        let png = render_chart(&store, &request, &small_options()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_scatter_chart_renders_png() {
        let store = sample_store();
        let request =
            ChartRequest::new(ChartKind::Scatter, vec!["x".to_string(), "y".to_string()]);
        let png = render_chart(&store, &request, &small_options()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_histogram_renders_png() {
        let store = sample_store();
        let request = ChartRequest::new(ChartKind::Histogram, vec!["x".to_string()]);
        let png = render_chart(&store, &request, &small_options()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_heatmap_renders_png() {
        let store = sample_store();
        let request = ChartRequest::new(ChartKind::CorrelationHeatmap, vec![]);
        let png = render_chart(&store, &request, &small_options()).unwrap();
        assert_eq!(&png[..8], &PNG_SIGNATURE);
    }

    #[test]
    fn test_scatter_with_one_column_is_rejected() {
        let store = sample_store();
        let request = ChartRequest::new(ChartKind::Scatter, vec!["x".to_string()]);
        let result = render_chart(&store, &request, &small_options());
        assert!(matches!(result, Err(AppError::ValidationError(_))));
    }

    #[test]
    fn test_pearson_perfect_correlation() {
        let store = sample_store();
        let x = store.column_index("x").unwrap();
        let y = store.column_index("y").unwrap();
        // y = 2x on every complete pair
        let r = pearson(&store, x, y).unwrap();
        assert!((r - 1.0).abs() < 1e-9);
    }

    #[test]
    fn test_pearson_constant_column_is_undefined() {
        let store = ingest(b"a,b\n1,5\n2,5\n3,5", "csv").unwrap();
        assert_eq!(pearson(&store, 0, 1), None);
    }

    #[test]
    fn test_correlation_color_extremes() {
        assert_eq!(correlation_color(1.0), RGBColor(180, 4, 38));
        assert_eq!(correlation_color(-1.0), RGBColor(59, 76, 192));
        assert_eq!(correlation_color(0.0), RGBColor(245, 245, 245));
    }
}
