//! `ModelNode`: one named, typed unit of the model tree.

use ag_core::ModelId;

use crate::property::{Property, PropertyValue};
use crate::{ModelType, ValidationError};

/// A named node with typed properties.
///
/// Nodes are created detached (`parent == None`) and become part of a tree
/// through `ModelTree::add_child` / `ModelTree::attach`, which own the
/// `parent` and `children` links.  Back-references are lookup-only.
#[derive(Clone, Debug)]
pub struct ModelNode {
    pub(crate) name:       String,
    pub(crate) model_type: ModelType,
    pub(crate) enabled:    bool,
    pub(crate) properties: Vec<Property>,
    pub(crate) parent:     Option<ModelId>,
    pub(crate) children:   Vec<ModelId>,
}

impl ModelNode {
    /// A new enabled node carrying the schema defaults for `model_type`.
    pub fn new(model_type: ModelType, name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            model_type,
            enabled: true,
            properties: model_type.schema(),
            parent: None,
            children: Vec::new(),
        }
    }

    /// Builder-style property assignment.
    ///
    /// ```
    /// use ag_tree::{ModelNode, ModelType};
    ///
    /// let group = ModelNode::new(ModelType::RuminantFeedGroup, "Cows")
    ///     .with("value", 2.5)
    ///     .unwrap();
    /// assert_eq!(group.number("value"), Some(2.5));
    /// ```
    pub fn with(mut self, property: &str, value: impl Into<PropertyValue>) -> Result<Self, ValidationError> {
        self.set(property, value)?;
        Ok(self)
    }

    /// Builder-style disable.
    pub fn disabled(mut self) -> Self {
        self.enabled = false;
        self
    }

    // ── Accessors ─────────────────────────────────────────────────────────

    #[inline]
    pub fn name(&self) -> &str {
        &self.name
    }

    #[inline]
    pub fn model_type(&self) -> ModelType {
        self.model_type
    }

    #[inline]
    pub fn is_enabled(&self) -> bool {
        self.enabled
    }

    #[inline]
    pub fn parent(&self) -> Option<ModelId> {
        self.parent
    }

    /// Direct children in insertion order.
    #[inline]
    pub fn children(&self) -> &[ModelId] {
        &self.children
    }

    pub fn properties(&self) -> &[Property] {
        &self.properties
    }

    pub fn property(&self, name: &str) -> Option<&Property> {
        self.properties.iter().find(|p| p.name == name)
    }

    pub fn value(&self, name: &str) -> Option<&PropertyValue> {
        self.property(name).map(Property::value)
    }

    pub fn number(&self, name: &str) -> Option<f64> {
        self.value(name).and_then(PropertyValue::as_f64)
    }

    pub fn integer(&self, name: &str) -> Option<i64> {
        self.value(name).and_then(PropertyValue::as_i64)
    }

    pub fn flag(&self, name: &str) -> Option<bool> {
        self.value(name).and_then(PropertyValue::as_bool)
    }

    pub fn text(&self, name: &str) -> Option<&str> {
        self.value(name).and_then(PropertyValue::as_str)
    }

    // ── Mutation ──────────────────────────────────────────────────────────

    /// Validate and assign an existing property.
    pub fn set(&mut self, property: &str, value: impl Into<PropertyValue>) -> Result<(), ValidationError> {
        match self.properties.iter_mut().find(|p| p.name == property) {
            Some(p) => p.assign(value),
            None => Err(ValidationError::new(property, format!("{} has no such property", self.model_type))),
        }
    }

    /// Add a property outside the type's schema (e.g. a manager parameter),
    /// or replace the declared one of the same name.
    pub fn add_property(&mut self, property: Property) {
        match self.properties.iter_mut().find(|p| p.name == property.name) {
            Some(existing) => *existing = property,
            None => self.properties.push(property),
        }
    }

    /// Warning-level messages for this node's properties as
    /// `(property, message)` pairs.
    pub fn warnings(&self) -> Vec<(String, String)> {
        self.properties
            .iter()
            .flat_map(|p| p.warnings().into_iter().map(move |w| (p.name.clone(), w)))
            .collect()
    }

    /// Copy of the node without tree links.
    pub(crate) fn unlinked(&self) -> Self {
        Self { parent: None, children: Vec::new(), ..self.clone() }
    }
}
