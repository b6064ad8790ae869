use eframe::egui::{
    self, Align2, Color32, FontId, Pos2, RichText, ScrollArea, Sense, Shape, Stroke, Ui, Vec2,
};
use egui_plot::{Bar, BarChart, BoxElem, BoxPlot, BoxSpread, GridMark, Plot, PlotPoints, Points};
use egui_extras::{Column as TableColumn, TableBuilder};

use crate::color;
use crate::data::model::{Cell, Table};
use crate::data::stats::{CorrelationMatrix, SummaryResult};
use crate::data::view::{self, ChartKind, Payload};
use crate::state::AppState;

// ---------------------------------------------------------------------------
// Central panel – the selected view's charts
// ---------------------------------------------------------------------------

/// Render the current view.  Payloads are recomputed per frame; the survey
/// tables are small enough that this stays interactive.
pub fn central_panel(ui: &mut Ui, state: &AppState) {
    let Some(table) = state.table.clone() else {
        ui.centered_and_justified(|ui: &mut Ui| {
            ui.heading("Open a survey file to begin  (File → Open…)");
        });
        return;
    };

    ui.heading(state.view.label());
    ui.separator();

    let mut payloads = match view::view_payloads(&table, state.view, state.requested()) {
        Ok(p) => p,
        Err(e) => {
            ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
            return;
        }
    };

    // The relation view adds a scatter pair chosen in the side panel.
    if !state.view.scatter_variables().is_empty() {
        if state.scatter_x == state.scatter_y {
            payloads.push(Payload::Scatter {
                x_column: state.scatter_x.clone(),
                y_column: state.scatter_y.clone(),
                points: Vec::new(),
            });
        } else {
            match view::scatter_payload(&table, &state.scatter_x, &state.scatter_y) {
                Ok(p) => payloads.push(p),
                Err(e) => {
                    ui.label(RichText::new(format!("Error: {e}")).color(Color32::RED));
                }
            }
        }
    }

    let accents = color::generate_palette(payloads.len().max(1));

    ScrollArea::vertical()
        .auto_shrink([false, false])
        .show(ui, |ui: &mut Ui| {
            // Frequency/distribution charts flow in a two-column grid;
            // heatmap, scatter and the raw table span the full width.
            let (small, wide): (Vec<_>, Vec<_>) =
                payloads.iter().enumerate().partition(|(_, p)| {
                    matches!(p, Payload::Frequency { .. } | Payload::Distribution { .. })
                });

            for pair in small.chunks(2) {
                ui.columns(2, |cols: &mut [Ui]| {
                    for (slot, (i, payload)) in pair.iter().enumerate() {
                        let accent = accents[i % accents.len()];
                        render_small(&mut cols[slot], payload, accent);
                    }
                });
                ui.add_space(8.0);
            }

            for (_, payload) in wide {
                render_wide(ui, &table, payload);
                ui.add_space(8.0);
            }
        });
}

fn render_small(ui: &mut Ui, payload: &Payload, accent: Color32) {
    match payload {
        Payload::Frequency {
            column,
            chart,
            counts,
        } => {
            ui.group(|ui: &mut Ui| {
                ui.strong(column.replace('_', " "));
                match chart {
                    ChartKind::Pie => pie_chart(ui, column, counts),
                    _ => category_bar_chart(ui, column, counts, accent),
                }
            });
        }
        Payload::Distribution {
            column,
            values,
            summary,
            mean,
        } => {
            ui.group(|ui: &mut Ui| {
                ui.strong(column.replace('_', " "));
                histogram(ui, column, values, accent);
                summary_box(ui, column, summary, accent);
                summary_line(ui, summary, *mean);
            });
        }
        _ => {}
    }
}

fn render_wide(ui: &mut Ui, table: &Table, payload: &Payload) {
    match payload {
        Payload::Heatmap { matrix } => {
            ui.group(|ui: &mut Ui| {
                ui.strong("Correlation Matrix (numerical variables only)");
                heatmap(ui, matrix);
            });
        }
        Payload::Scatter {
            x_column,
            y_column,
            points,
        } => {
            ui.group(|ui: &mut Ui| {
                ui.strong(format!(
                    "{} vs {}",
                    x_column.replace('_', " "),
                    y_column.replace('_', " ")
                ));
                if x_column == y_column {
                    ui.label("Pick two different variables to compare.");
                } else {
                    scatter(ui, x_column, y_column, points);
                }
            });
        }
        Payload::RawTable => raw_table(ui, table),
        _ => {}
    }
}

// ---------------------------------------------------------------------------
// Bar chart for category counts
// ---------------------------------------------------------------------------

fn category_bar_chart(ui: &mut Ui, id: &str, counts: &[(String, u64)], accent: Color32) {
    let bars: Vec<Bar> = counts
        .iter()
        .enumerate()
        .map(|(i, (label, count))| {
            Bar::new(i as f64, *count as f64)
                .width(0.7)
                .name(label.clone())
        })
        .collect();

    let labels: Vec<String> = counts.iter().map(|(label, _)| label.clone()).collect();
    Plot::new(format!("bar_{id}"))
        .height(220.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .x_axis_formatter(move |mark: GridMark, _range| {
            let idx = mark.value.round();
            if (mark.value - idx).abs() < 0.05 && idx >= 0.0 && (idx as usize) < labels.len() {
                truncate(&labels[idx as usize], 14)
            } else {
                String::new()
            }
        })
        .y_axis_label("Count")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(accent));
        });
}

// ---------------------------------------------------------------------------
// Histogram + box plot for numeric distributions
// ---------------------------------------------------------------------------

const HISTOGRAM_BINS: usize = 10;

fn histogram(ui: &mut Ui, id: &str, values: &[f64], accent: Color32) {
    let bars = histogram_bars(values, HISTOGRAM_BINS);
    Plot::new(format!("hist_{id}"))
        .height(200.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .y_axis_label("Frequency")
        .show(ui, |plot_ui| {
            plot_ui.bar_chart(BarChart::new(bars).color(accent));
        });
}

fn histogram_bars(values: &[f64], bins: usize) -> Vec<Bar> {
    if values.is_empty() || bins == 0 {
        return Vec::new();
    }
    let min = values.iter().cloned().fold(f64::INFINITY, f64::min);
    let max = values.iter().cloned().fold(f64::NEG_INFINITY, f64::max);
    let span = max - min;
    if span == 0.0 {
        return vec![Bar::new(min, values.len() as f64).width(1.0)];
    }

    let width = span / bins as f64;
    let mut counts = vec![0usize; bins];
    for &v in values {
        let idx = (((v - min) / width) as usize).min(bins - 1);
        counts[idx] += 1;
    }
    counts
        .into_iter()
        .enumerate()
        .map(|(i, count)| {
            Bar::new(min + (i as f64 + 0.5) * width, count as f64).width(width * 0.95)
        })
        .collect()
}

fn summary_box(ui: &mut Ui, id: &str, summary: &SummaryResult, accent: Color32) {
    let spread = BoxSpread::new(
        summary.min,
        summary.q1,
        summary.median,
        summary.q3,
        summary.max,
    );
    let element = BoxElem::new(0.0, spread).box_width(0.5).fill(accent);
    Plot::new(format!("box_{id}"))
        .height(70.0)
        .allow_drag(false)
        .allow_scroll(false)
        .allow_zoom(false)
        .allow_boxed_zoom(false)
        .show_axes([true, false])
        .show(ui, |plot_ui| {
            plot_ui.box_plot(BoxPlot::new(vec![element]).horizontal());
        });
}

fn summary_line(ui: &mut Ui, summary: &SummaryResult, mean: f64) {
    ui.label(
        RichText::new(format!(
            "Min {:.2}   Q1 {:.2}   Median {:.2}   Q3 {:.2}   Max {:.2}   Mean {:.2}",
            summary.min, summary.q1, summary.median, summary.q3, summary.max, mean
        ))
        .small(),
    );
}

// ---------------------------------------------------------------------------
// Pie chart (custom painter – egui_plot has no pie primitive)
// ---------------------------------------------------------------------------

fn pie_chart(ui: &mut Ui, id: &str, counts: &[(String, u64)]) {
    let total: f64 = counts.iter().map(|(_, c)| *c as f64).sum();
    if total == 0.0 {
        ui.label("No responses.");
        return;
    }

    let segment_colors = color::generate_palette(counts.len());

    ui.push_id(format!("pie_{id}"), |ui: &mut Ui| {
        let size = ui.available_width().min(220.0);
        let (response, painter) =
            ui.allocate_painter(Vec2::new(size, size), Sense::hover());
        let rect = response.rect;
        let center = rect.center();
        let radius = rect.width().min(rect.height()) * 0.45;

        let mut start = -std::f64::consts::FRAC_PI_2;
        for (seg, (_, count)) in counts.iter().enumerate() {
            let sweep = (*count as f64 / total) * std::f64::consts::TAU;
            let steps = ((sweep / std::f64::consts::TAU) * 72.0).ceil().max(2.0) as usize;

            let mut points = Vec::with_capacity(steps + 2);
            points.push(center);
            for s in 0..=steps {
                let angle = start + sweep * s as f64 / steps as f64;
                points.push(Pos2::new(
                    center.x + radius * angle.cos() as f32,
                    center.y + radius * angle.sin() as f32,
                ));
            }
            painter.add(Shape::convex_polygon(
                points,
                segment_colors[seg],
                Stroke::NONE,
            ));
            start += sweep;
        }

        for (seg, (label, count)) in counts.iter().enumerate() {
            let pct = *count as f64 / total * 100.0;
            ui.colored_label(
                segment_colors[seg],
                format!("■ {}  {pct:.1}%", truncate(label, 24)),
            );
        }
    });
}

// ---------------------------------------------------------------------------
// Correlation heatmap (custom painter)
// ---------------------------------------------------------------------------

fn heatmap(ui: &mut Ui, matrix: &CorrelationMatrix) {
    if matrix.is_empty() {
        ui.label("No numerical columns available for a correlation heatmap.");
        return;
    }

    let n = matrix.columns.len();
    let cell = 52.0_f32;
    let label_width = 150.0_f32;
    let label_height = 20.0_f32;

    let size = Vec2::new(label_width + n as f32 * cell, n as f32 * cell + label_height);
    let (response, painter) = ui.allocate_painter(size, Sense::hover());
    let origin = response.rect.min;
    let grid = Pos2::new(origin.x + label_width, origin.y);

    let text_font = FontId::proportional(11.0);

    for i in 0..n {
        // row label, right-aligned against the grid
        painter.text(
            Pos2::new(grid.x - 6.0, grid.y + (i as f32 + 0.5) * cell),
            Align2::RIGHT_CENTER,
            truncate(&matrix.columns[i], 20),
            text_font.clone(),
            ui.visuals().text_color(),
        );

        for j in 0..n {
            let value = matrix.get(i, j).unwrap_or(f64::NAN);
            let rect = egui::Rect::from_min_size(
                Pos2::new(grid.x + j as f32 * cell, grid.y + i as f32 * cell),
                Vec2::splat(cell),
            );
            painter.rect_filled(
                rect.shrink(1.0),
                egui::CornerRadius::same(2),
                color::diverging(value),
            );

            let text = if value.is_nan() {
                "–".to_string()
            } else {
                format!("{value:.2}")
            };
            let text_color = if value.is_nan() || value.abs() < 0.55 {
                Color32::BLACK
            } else {
                Color32::WHITE
            };
            painter.text(
                rect.center(),
                Align2::CENTER_CENTER,
                text,
                text_font.clone(),
                text_color,
            );
        }
    }

    // column labels along the bottom
    for j in 0..n {
        painter.text(
            Pos2::new(grid.x + (j as f32 + 0.5) * cell, grid.y + n as f32 * cell + 4.0),
            Align2::CENTER_TOP,
            truncate(&matrix.columns[j], 9),
            text_font.clone(),
            ui.visuals().text_color(),
        );
    }
}

// ---------------------------------------------------------------------------
// Scatter comparison
// ---------------------------------------------------------------------------

fn scatter(ui: &mut Ui, x_column: &str, y_column: &str, points: &[(f64, f64)]) {
    let plot_points: PlotPoints = points.iter().map(|&(x, y)| [x, y]).collect();
    Plot::new(format!("scatter_{x_column}_{y_column}"))
        .height(280.0)
        .x_axis_label(x_column.replace('_', " "))
        .y_axis_label(y_column.replace('_', " "))
        .show(ui, |plot_ui| {
            plot_ui.points(
                Points::new(plot_points)
                    .radius(3.0)
                    .color(Color32::from_rgb(0, 250, 154)),
            );
        });
}

// ---------------------------------------------------------------------------
// Raw dataset table
// ---------------------------------------------------------------------------

fn raw_table(ui: &mut Ui, table: &Table) {
    ui.strong("Full dataset");
    let n_cols = table.columns().len();

    ui.push_id("raw_table", |ui: &mut Ui| {
        TableBuilder::new(ui)
            .striped(true)
            .resizable(true)
            .min_scrolled_height(200.0)
            .max_scroll_height(420.0)
            .columns(TableColumn::auto().at_least(90.0), n_cols)
            .header(20.0, |mut header| {
                for name in table.column_names() {
                    header.col(|ui: &mut Ui| {
                        ui.strong(name.replace('_', " "));
                    });
                }
            })
            .body(|body| {
                body.rows(18.0, table.len(), |mut row| {
                    let r = row.index();
                    for c in 0..n_cols {
                        row.col(|ui: &mut Ui| {
                            match table.cell(r, c) {
                                Some(Cell::Null) | None => {
                                    ui.weak("–");
                                }
                                Some(cell) => {
                                    ui.label(cell.to_string());
                                }
                            };
                        });
                    }
                });
            });
    });
}

fn truncate(s: &str, max_chars: usize) -> String {
    if s.chars().count() <= max_chars {
        s.to_string()
    } else {
        let kept: String = s.chars().take(max_chars.saturating_sub(1)).collect();
        format!("{kept}…")
    }
}
