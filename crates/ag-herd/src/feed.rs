//! `FeedActivity`: applies feed groups to a herd once per day.

use ag_core::ModelId;
use ag_tree::{ModelTree, ModelType};

use crate::{FeedStyle, FilterGroup, Herd, HerdError, HerdResult, SelectionContext};

/// Totals from one day's feeding.
#[derive(Clone, Debug, Default, PartialEq)]
pub struct FeedOutcome {
    /// Feed handed out, kg.  Includes food offered beyond intake limits.
    pub fed:      f64,
    /// Individual feedings across all groups.
    pub feedings: usize,
    /// Individuals excluded by filter evaluation errors.
    pub skipped:  usize,
}

/// A `RuminantActivityFeed` node and its feed groups.
#[derive(Clone, Debug, PartialEq)]
pub struct FeedActivity {
    pub name:           String,
    pub style:          FeedStyle,
    pub feed_type:      String,
    pub feed_available: f64,
    pub groups:         Vec<FilterGroup>,
}

impl FeedActivity {
    pub fn new(name: impl Into<String>, style: FeedStyle, feed_type: impl Into<String>) -> Self {
        Self { name: name.into(), style, feed_type: feed_type.into(), feed_available: 0.0, groups: Vec::new() }
    }

    pub fn with_group(mut self, group: FilterGroup) -> Self {
        self.groups.push(group);
        self
    }

    pub fn from_tree(tree: &ModelTree, id: ModelId) -> HerdResult<Self> {
        let node = tree.node(id)?;
        if node.model_type() != ModelType::RuminantActivityFeed {
            return Err(HerdError::WrongNodeType { path: tree.path(id), expected: "RuminantActivityFeed" });
        }
        let missing = |property: &str| HerdError::MissingProperty { path: tree.path(id), property: property.into() };
        let style_name = node.text("feed_style").ok_or_else(|| missing("feed_style"))?;
        let style = style_name
            .parse::<FeedStyle>()
            .map_err(|_| HerdError::UnknownFeedStyle { path: tree.path(id), style: style_name.to_string() })?;

        let groups = tree
            .children_of_type(id, ModelType::RuminantFeedGroup)
            .filter(|(_, n)| n.is_enabled())
            .map(|(group, _)| FilterGroup::from_tree(tree, group))
            .collect::<HerdResult<Vec<_>>>()?;

        Ok(Self {
            name: node.name().to_string(),
            style,
            feed_type: node.text("feed_type").unwrap_or_default().to_string(),
            feed_available: node.number("feed_available").unwrap_or(0.0),
            groups,
        })
    }

    /// Evaluate every group against the current herd, in order, and feed
    /// each selected animal its weight.  Later groups see the intake left by
    /// earlier ones.
    pub fn apply(&self, herd: &mut Herd) -> FeedOutcome {
        let ctx = SelectionContext { style: self.style, feed_available: self.feed_available };
        let mut outcome = FeedOutcome::default();
        for group in &self.groups {
            let selection = group.evaluate(&herd.individuals, ctx);
            outcome.skipped += selection.skipped.len();
            for entry in &selection.entries {
                outcome.fed += herd.individuals[entry.index].feed(entry.weight);
                outcome.feedings += 1;
            }
        }
        tracing::debug!(activity = %self.name, fed = outcome.fed, feedings = outcome.feedings, "feed applied");
        outcome
    }
}
