use serde::Serialize;

use super::error::{DataError, Result};
use super::explode::{explode, keep_prefix};
use super::model::Table;
use super::stats::{self, CorrelationMatrix, SummaryResult};

// ---------------------------------------------------------------------------
// ViewKind – the fixed set of dashboard views
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Serialize)]
pub enum ViewKind {
    Overview,
    OperationalScale,
    CustomerBehavior,
    FoodPreparation,
    WasteManagement,
    FactorsComparison,
    VariablesRelation,
}

impl ViewKind {
    pub const ALL: [ViewKind; 7] = [
        ViewKind::Overview,
        ViewKind::OperationalScale,
        ViewKind::CustomerBehavior,
        ViewKind::FoodPreparation,
        ViewKind::WasteManagement,
        ViewKind::FactorsComparison,
        ViewKind::VariablesRelation,
    ];

    /// Stable identifier used by the view-request interface.
    pub fn name(self) -> &'static str {
        match self {
            ViewKind::Overview => "Overview",
            ViewKind::OperationalScale => "OperationalScale",
            ViewKind::CustomerBehavior => "CustomerBehavior",
            ViewKind::FoodPreparation => "FoodPreparation",
            ViewKind::WasteManagement => "WasteManagement",
            ViewKind::FactorsComparison => "FactorsComparison",
            ViewKind::VariablesRelation => "VariablesRelation",
        }
    }

    /// Human-readable title shown in the sidebar.
    pub fn label(self) -> &'static str {
        match self {
            ViewKind::Overview => "Dataset Overview",
            ViewKind::OperationalScale => "Operational Scale",
            ViewKind::CustomerBehavior => "Customer Behavior",
            ViewKind::FoodPreparation => "Food Preparation",
            ViewKind::WasteManagement => "Food Waste Management",
            ViewKind::FactorsComparison => "Factors Comparison",
            ViewKind::VariablesRelation => "Variables Relation",
        }
    }

    /// Resolve a requested view identifier.
    pub fn from_name(name: &str) -> Result<ViewKind> {
        ViewKind::ALL
            .into_iter()
            .find(|v| v.name() == name)
            .ok_or_else(|| DataError::UnknownView(name.to_string()))
    }

    /// The static variable routes of this view, in default display order.
    pub fn routes(self) -> &'static [VariableRoute] {
        match self {
            ViewKind::Overview => OVERVIEW_ROUTES,
            ViewKind::OperationalScale => OPERATIONAL_SCALE_ROUTES,
            ViewKind::CustomerBehavior => CUSTOMER_BEHAVIOR_ROUTES,
            ViewKind::FoodPreparation => FOOD_PREPARATION_ROUTES,
            ViewKind::WasteManagement => WASTE_MANAGEMENT_ROUTES,
            ViewKind::FactorsComparison => FACTORS_COMPARISON_ROUTES,
            ViewKind::VariablesRelation => &[],
        }
    }

    /// Overview appends the full raw dataset below its charts.
    pub fn includes_raw_table(self) -> bool {
        matches!(self, ViewKind::Overview)
    }

    /// VariablesRelation renders the all-numeric correlation heatmap.
    pub fn includes_heatmap(self) -> bool {
        matches!(self, ViewKind::VariablesRelation)
    }

    /// Variables offered for the scatter comparison, if the view has one.
    pub fn scatter_variables(self) -> &'static [&'static str] {
        match self {
            ViewKind::VariablesRelation => NUMERIC_FACTORS,
            _ => &[],
        }
    }
}

// ---------------------------------------------------------------------------
// Route declarations – view -> variable -> (transform, chart)
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
pub enum ChartKind {
    /// Histogram with a box plot and five-number summary underneath.
    Histogram,
    Bar,
    Pie,
}

/// How a multi-valued cell is reduced to countable values.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SplitRule {
    /// One count per token ("Lunch, Dinner" counts Lunch and Dinner).
    AllTokens(char),
    /// Count only the text before the first separator; "key=value"
    /// answers contribute their key and nothing else.
    Prefix(char),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TransformKind {
    /// Frequency counts; `split` names the per-column rule for
    /// multi-valued answers (None counts whole cells).
    Frequency { split: Option<SplitRule> },
    /// Five-number summary plus the underlying series.
    Summary,
}

/// One chart of a view: which column, how to reshape it, how to draw it.
#[derive(Debug, Clone, Copy)]
pub struct VariableRoute {
    pub column: &'static str,
    pub transform: TransformKind,
    pub chart: ChartKind,
}

const fn freq(column: &'static str, chart: ChartKind) -> VariableRoute {
    VariableRoute {
        column,
        transform: TransformKind::Frequency { split: None },
        chart,
    }
}

const fn freq_explode(column: &'static str, sep: char, chart: ChartKind) -> VariableRoute {
    VariableRoute {
        column,
        transform: TransformKind::Frequency {
            split: Some(SplitRule::AllTokens(sep)),
        },
        chart,
    }
}

const fn freq_prefix(column: &'static str, sep: char, chart: ChartKind) -> VariableRoute {
    VariableRoute {
        column,
        transform: TransformKind::Frequency {
            split: Some(SplitRule::Prefix(sep)),
        },
        chart,
    }
}

const fn dist(column: &'static str) -> VariableRoute {
    VariableRoute {
        column,
        transform: TransformKind::Summary,
        chart: ChartKind::Histogram,
    }
}

/// The four numeric survey factors shared by Overview, FactorsComparison
/// and the scatter comparison.
pub const NUMERIC_FACTORS: &[&str] = &[
    "Staff_per_Shift",
    "Servings_per_Item",
    "Daily_Customers",
    "PreConsumer_Waste_",
];

const OVERVIEW_ROUTES: &[VariableRoute] = &[
    dist("Staff_per_Shift"),
    dist("Servings_per_Item"),
    dist("Daily_Customers"),
    dist("PreConsumer_Waste_"),
];

const OPERATIONAL_SCALE_ROUTES: &[VariableRoute] = &[
    freq("Opening_Hours", ChartKind::Pie),
    dist("Staff_per_Shift"),
    freq_explode("Peak_Hours", ',', ChartKind::Bar),
    // Day_Influence answers are "key=value" pairs; only the day key is
    // counted.  The '=' rule is a per-column override, never the default.
    freq_prefix("Day_Influence", '=', ChartKind::Bar),
    freq_explode("Occasion_Impact", ',', ChartKind::Bar),
];

const CUSTOMER_BEHAVIOR_ROUTES: &[VariableRoute] = &[
    freq_explode("Popular_Menu_Items", ',', ChartKind::Bar),
    freq("Prep_Quantity_Basis", ChartKind::Bar),
    freq("Sales_Tracking", ChartKind::Bar),
    dist("Daily_Customers"),
];

const FOOD_PREPARATION_ROUTES: &[VariableRoute] = &[
    dist("Servings_per_Item"),
    dist("PreConsumer_Waste_"),
    freq("Storage_Methods", ChartKind::Bar),
];

const WASTE_MANAGEMENT_ROUTES: &[VariableRoute] = &[
    freq("Leftover_Handling", ChartKind::Bar),
    freq("PostConsumer_Waste_Measure", ChartKind::Bar),
];

const FACTORS_COMPARISON_ROUTES: &[VariableRoute] = &[
    dist("Staff_per_Shift"),
    dist("Servings_per_Item"),
    dist("Daily_Customers"),
    dist("PreConsumer_Waste_"),
];

// ---------------------------------------------------------------------------
// Resolution – requested variables -> ordered routes
// ---------------------------------------------------------------------------

/// Routes to execute for a view.  An empty request selects the view's full
/// default set; otherwise the request is intersected with the view's
/// variables, preserving the requested order.  Names outside the view's
/// set, and repeats of a name already resolved, are dropped silently.
pub fn resolve(view: ViewKind, requested: &[String]) -> Vec<VariableRoute> {
    let all = view.routes();
    if requested.is_empty() {
        return all.to_vec();
    }
    let mut routes: Vec<VariableRoute> = Vec::new();
    for name in requested {
        if routes.iter().any(|r| r.column == name) {
            continue;
        }
        if let Some(route) = all.iter().find(|r| r.column == name) {
            routes.push(*route);
        }
    }
    routes
}

// ---------------------------------------------------------------------------
// Payloads – the render boundary
// ---------------------------------------------------------------------------

/// Chart-ready data handed to the renderer.  Everything visual (colors,
/// layout, widgets) happens on the other side of this boundary.
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum Payload {
    /// Category counts for a bar or pie chart, sorted by descending count.
    Frequency {
        column: String,
        chart: ChartKind,
        counts: Vec<(String, u64)>,
    },
    /// A numeric series with its five-number summary and mean, for a
    /// histogram/box-plot pair.
    Distribution {
        column: String,
        values: Vec<f64>,
        summary: SummaryResult,
        mean: f64,
    },
    /// Correlation heatmap data; may be empty ("nothing to show").
    Heatmap { matrix: CorrelationMatrix },
    /// Paired observations for a scatter comparison.
    Scatter {
        x_column: String,
        y_column: String,
        points: Vec<(f64, f64)>,
    },
    /// Marker: render the source table itself.
    RawTable,
}

/// Execute a view: run each resolved route over `table` and produce the
/// render-boundary payloads in display order.
pub fn view_payloads(table: &Table, view: ViewKind, requested: &[String]) -> Result<Vec<Payload>> {
    let mut payloads = Vec::new();

    for route in resolve(view, requested) {
        match route.transform {
            TransformKind::Frequency { split } => {
                let freq = match split {
                    Some(SplitRule::AllTokens(sep)) => {
                        let exploded = explode(table, route.column, sep)?;
                        stats::frequency(&exploded, route.column)?
                    }
                    Some(SplitRule::Prefix(sep)) => {
                        let trimmed = keep_prefix(table, route.column, sep)?;
                        stats::frequency(&trimmed, route.column)?
                    }
                    None => stats::frequency(table, route.column)?,
                };
                payloads.push(Payload::Frequency {
                    column: route.column.to_string(),
                    chart: route.chart,
                    counts: freq.by_descending_count(),
                });
            }
            TransformKind::Summary => {
                payloads.push(Payload::Distribution {
                    column: route.column.to_string(),
                    values: stats::numeric_series(table, route.column)?,
                    summary: stats::five_number_summary(table, route.column)?,
                    mean: stats::mean(table, route.column)?,
                });
            }
        }
    }

    if view.includes_heatmap() {
        payloads.push(Payload::Heatmap {
            matrix: stats::correlation(table),
        });
    }
    if view.includes_raw_table() {
        payloads.push(Payload::RawTable);
    }

    Ok(payloads)
}

/// Paired scatter observations for two numeric columns, using the rows
/// where both values are present.
pub fn scatter_payload(table: &Table, x_column: &str, y_column: &str) -> Result<Payload> {
    let x = table.column(x_column)?;
    let y = table.column(y_column)?;
    if x.ty != super::model::ColumnType::Numeric {
        return Err(DataError::NonNumericColumn(x_column.to_string()));
    }
    if y.ty != super::model::ColumnType::Numeric {
        return Err(DataError::NonNumericColumn(y_column.to_string()));
    }

    let points = x
        .cells
        .iter()
        .zip(&y.cells)
        .filter_map(|(a, b)| Some((a.as_f64()?, b.as_f64()?)))
        .filter(|(a, b)| !a.is_nan() && !b.is_nan())
        .collect();

    Ok(Payload::Scatter {
        x_column: x_column.to_string(),
        y_column: y_column.to_string(),
        points,
    })
}
