//! `ag-herd`: ruminant herds and rule-based selection.
//!
//! # Crate layout
//!
//! | Module          | Contents                                                   |
//! |-----------------|------------------------------------------------------------|
//! | [`individual`]  | `Individual` trait, `AttributeValue`                       |
//! | [`ruminant`]    | `Ruminant`, `Sex`, intake constants                        |
//! | [`herd`]        | `Herd`, `HerdBuilder`, `Cohort`                            |
//! | [`predicate`]   | `Predicate` AST and `CompareOp`                            |
//! | [`selection`]   | `FilterGroup`, `FeedStyle`, `Selection`                    |
//! | [`feed`]        | `FeedActivity` daily feeding                               |
//! | [`error`]       | `FilterEvaluationError`, `HerdError`                       |
//!
//! # Feature flags
//!
//! | Flag       | Effect                                                  |
//! |------------|---------------------------------------------------------|
//! | `parallel` | Evaluate predicates with Rayon; output order unchanged. |

pub mod error;
pub mod feed;
pub mod herd;
pub mod individual;
pub mod predicate;
pub mod ruminant;
pub mod selection;

#[cfg(test)]
mod tests;

pub use error::{FilterEvaluationError, HerdError, HerdResult};
pub use feed::{FeedActivity, FeedOutcome};
pub use herd::{Cohort, Herd, HerdBuilder};
pub use individual::{AttributeValue, Individual};
pub use predicate::{CompareOp, Predicate};
pub use ruminant::{Ruminant, Sex, SexState};
pub use selection::{FeedStyle, FilterGroup, Selected, Selection, SelectionContext};
