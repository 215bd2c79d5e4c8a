//! `ag-tree`: the model composition tree.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                      |
//! |-----------------|---------------------------------------------------------------|
//! | [`property`]    | `Property`, `PropertyKind`, `PropertyValue`, `Constraint`, `Rule` |
//! | [`model_type`]  | `ModelType` registry: accepted parents and property schemas   |
//! | [`node`]        | `ModelNode`                                                   |
//! | [`tree`]        | `ModelTree` arena, `ModelSubtree`, `Descendants`              |
//! | [`document`]    | `NodeDocument` JSON round-trip                                |
//! | [`error`]       | `TreeError`, `InvalidParentError`, `ValidationError`          |
//!
//! # Quick-start
//!
//! ```
//! use ag_tree::{ModelNode, ModelTree, ModelType};
//!
//! let mut tree = ModelTree::new(ModelNode::new(ModelType::Simulations, "Simulations"));
//! let sim = tree.add_child(tree.root(), ModelNode::new(ModelType::Simulation, "Sim")).unwrap();
//! let zone = tree.add_child(sim, ModelNode::new(ModelType::Zone, "Paddock")).unwrap();
//!
//! // A feed group must sit under a feed activity.
//! let group = ModelNode::new(ModelType::RuminantFeedGroup, "Cows");
//! assert!(tree.add_child(zone, group).is_err());
//! assert_eq!(tree.path(zone), ".Simulations.Sim.Paddock");
//! ```

pub mod document;
pub mod error;
pub mod model_type;
pub mod node;
pub mod property;
pub mod tree;


pub use document::NodeDocument;
pub use error::{InvalidParentError, TreeError, TreeResult, ValidationError};
pub use model_type::ModelType;
pub use node::ModelNode;
pub use property::{Constraint, Property, PropertyKind, PropertyValue, Rule, Severity};
pub use tree::{Descendants, ModelSubtree, ModelTree, ValidationWarning};
