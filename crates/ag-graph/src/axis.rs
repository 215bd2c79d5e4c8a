use std::fmt;
use std::str::FromStr;

/// One of the four axis slots around a plot.
#[derive(Copy, Clone, Debug, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub enum AxisType {
    Bottom,
    Left,
    Top,
    Right,
}

impl AxisType {
    pub const ALL: [AxisType; 4] = [AxisType::Bottom, AxisType::Left, AxisType::Top, AxisType::Right];

    pub fn is_horizontal(self) -> bool {
        matches!(self, AxisType::Bottom | AxisType::Top)
    }
}

impl fmt::Display for AxisType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        fmt::Debug::fmt(self, f)
    }
}

impl FromStr for AxisType {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        AxisType::ALL
            .iter()
            .copied()
            .find(|t| t.to_string() == s)
            .ok_or_else(|| format!("unknown axis type {s:?}"))
    }
}

/// A plot axis.  `axis_type` is the key: a graph holds at most one axis per
/// slot.
#[derive(Clone, Debug, PartialEq)]
pub struct Axis {
    pub axis_type:     AxisType,
    pub title:         String,
    pub inverted:      bool,
    pub cross_at_zero: bool,
}

impl Axis {
    /// A default axis for `axis_type`.
    pub fn new(axis_type: AxisType) -> Self {
        Self { axis_type, title: String::new(), inverted: false, cross_at_zero: false }
    }

    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }
}
