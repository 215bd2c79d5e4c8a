//! Series and the definitions derived from them.

use crate::AxisType;

/// A plotted variable pair, as configured on a `Series` node.
#[derive(Clone, Debug, PartialEq)]
pub struct Series {
    pub name:       String,
    pub enabled:    bool,
    pub table_name: String,
    pub x_field:    String,
    pub y_field:    String,
    pub x_axis:     AxisType,
    pub y_axis:     AxisType,
}

impl Series {
    /// An enabled series of `y_field` against `Day` on the bottom/left axes.
    pub fn new(name: impl Into<String>, y_field: impl Into<String>) -> Self {
        Self {
            name:       name.into(),
            enabled:    true,
            table_name: "Report".into(),
            x_field:    X_FIELD_DAY.into(),
            y_field:    y_field.into(),
            x_axis:     AxisType::Bottom,
            y_axis:     AxisType::Left,
        }
    }

    pub fn on_axes(mut self, x_axis: AxisType, y_axis: AxisType) -> Self {
        self.x_axis = x_axis;
        self.y_axis = y_axis;
        self
    }

    pub fn with_x_field(mut self, x_field: impl Into<String>) -> Self {
        self.x_field = x_field.into();
        self
    }

    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }
}

/// The x field that plots against simulated day.
pub const X_FIELD_DAY: &str = "Day";

/// Ready-to-plot data for one series in one simulation.
#[derive(Clone, Debug, PartialEq)]
pub struct SeriesDefinition {
    pub series:         String,
    pub simulation:     String,
    pub table_name:     String,
    pub x_field:        String,
    pub y_field:        String,
    pub x_axis:         AxisType,
    pub y_axis:         AxisType,
    /// `false` if the graph lists this series as hidden from the legend.
    pub show_in_legend: bool,
    /// `(x, y)` pairs in day order.
    pub points:         Vec<(f64, f64)>,
}
