//! Unit tests for ag-herd.

use ag_core::{IndividualId, SimRng};

use crate::{Cohort, Herd, HerdBuilder, Ruminant, Sex, SexState};

// ── Helpers ───────────────────────────────────────────────────────────────────

fn cow(id: u32, weight: f64, lactating: bool) -> Ruminant {
    Ruminant::new(IndividualId(id), "Bos indicus", SexState::Female { lactating, pregnant: false }, 36.0, weight)
}

fn steer(id: u32, weight: f64) -> Ruminant {
    Ruminant::new(IndividualId(id), "Bos indicus", SexState::Male { castrated: true }, 20.0, weight)
}

/// Two cows (300 kg, 400 kg lactating) and one 200 kg steer.
fn small_herd() -> Herd {
    Herd { breed: "Bos indicus".into(), individuals: vec![cow(0, 300.0, false), cow(1, 400.0, true), steer(2, 200.0)] }
}

// ── Ruminant ──────────────────────────────────────────────────────────────────

#[cfg(test)]
mod ruminant {
    use super::*;
    use crate::ruminant::{INTAKE_LIMIT_FACTOR, POTENTIAL_INTAKE_FRACTION};
    use crate::{AttributeValue, Individual};

    #[test]
    fn sex_specific_attributes() {
        let c = cow(0, 300.0, true);
        let s = steer(1, 200.0);
        assert_eq!(c.attribute("Lactating"), Some(AttributeValue::Bool(true)));
        assert_eq!(c.attribute("Castrated"), None);
        assert_eq!(s.attribute("Castrated"), Some(AttributeValue::Bool(true)));
        assert_eq!(s.attribute("Pregnant"), None);
        assert_eq!(s.attribute("Sex"), Some(AttributeValue::from("Male")));
        assert_eq!(s.attribute("Colour"), None);
    }

    #[test]
    fn potential_intake_from_weight() {
        let c = cow(0, 300.0, false);
        assert!((c.potential_intake - 300.0 * POTENTIAL_INTAKE_FRACTION).abs() < 1e-12);
        assert!(cow(1, 300.0, true).potential_intake > c.potential_intake);
    }

    #[test]
    fn intake_capped_but_excess_counted_as_fed() {
        let mut c = cow(0, 400.0, false);
        let limit = c.potential_intake * INTAKE_LIMIT_FACTOR;
        let fed = c.feed(100.0);
        assert_eq!(fed, 100.0);
        assert!((c.intake - limit).abs() < 1e-12);
        assert_eq!(c.remaining_intake(), 0.0);
    }

    #[test]
    fn start_day_resets_intake_and_ages() {
        let mut c = cow(0, 300.0, false);
        c.feed(2.0);
        let age = c.age;
        c.start_day();
        assert_eq!(c.intake, 0.0);
        assert!(c.age > age);
    }
}

// ── Herd ──────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod herd {
    use super::*;

    #[test]
    fn builder_is_deterministic_per_seed() {
        let build = |seed| {
            HerdBuilder::new("Bos taurus")
                .cohort(Cohort::new(Sex::Female, 20, 30.0, 300.0).with_weight_sd(25.0))
                .build(&mut SimRng::new(seed))
                .unwrap()
        };
        assert_eq!(build(7), build(7));
        assert_ne!(build(7), build(8));
    }

    #[test]
    fn jitter_stays_within_spread() {
        let herd = HerdBuilder::new("Bos taurus")
            .cohort(Cohort::new(Sex::Male, 50, 12.0, 200.0).with_weight_sd(10.0).castrated())
            .build(&mut SimRng::new(1))
            .unwrap();
        assert_eq!(herd.len(), 50);
        assert!(herd.individuals.iter().all(|r| (190.0..=210.0).contains(&r.weight)));
        assert!(herd.individuals.iter().all(|r| r.state == SexState::Male { castrated: true }));
    }

    #[test]
    fn ids_follow_cohort_order() {
        let herd = HerdBuilder::new("Bos taurus")
            .cohort(Cohort::new(Sex::Female, 2, 30.0, 300.0))
            .cohort(Cohort::new(Sex::Male, 1, 30.0, 300.0))
            .build(&mut SimRng::new(0))
            .unwrap();
        let ids: Vec<u32> = herd.individuals.iter().map(|r| r.id.0).collect();
        assert_eq!(ids, [0, 1, 2]);
        assert_eq!(herd.get(IndividualId(2)).map(|r| r.sex()), Some(Sex::Male));
    }
}

// ── Predicates ────────────────────────────────────────────────────────────────

#[cfg(test)]
mod predicate {
    use super::*;
    use crate::{AttributeValue, CompareOp, FilterEvaluationError, Predicate};

    #[test]
    fn compare_numbers_and_text() {
        let c = cow(0, 300.0, false);
        assert!(Predicate::compare("Weight", CompareOp::Ge, 300.0).evaluate(&c).unwrap());
        assert!(!Predicate::compare("Weight", CompareOp::Gt, 300.0).evaluate(&c).unwrap());
        assert!(Predicate::compare("Sex", CompareOp::Eq, "female").evaluate(&c).unwrap());
    }

    #[test]
    fn combinators() {
        let c = cow(0, 300.0, true);
        let heavy = Predicate::compare("Weight", CompareOp::Gt, 350.0);
        let lactating = Predicate::compare("Lactating", CompareOp::Eq, true);
        assert!(Predicate::always().evaluate(&c).unwrap());
        assert!(Predicate::Any(vec![heavy.clone(), lactating.clone()]).evaluate(&c).unwrap());
        assert!(!Predicate::All(vec![heavy.clone(), lactating]).evaluate(&c).unwrap());
        assert!(Predicate::Not(Box::new(heavy)).evaluate(&c).unwrap());
        assert!(!Predicate::Any(vec![]).evaluate(&c).unwrap());
    }

    #[test]
    fn missing_attribute_is_an_error() {
        let s = steer(4, 200.0);
        let err = Predicate::compare("Pregnant", CompareOp::Eq, false).evaluate(&s).unwrap_err();
        assert_eq!(
            err,
            FilterEvaluationError::MissingAttribute { individual: IndividualId(4), attribute: "Pregnant".into() }
        );
    }

    #[test]
    fn ordering_on_bool_is_a_type_mismatch() {
        let c = cow(0, 300.0, false);
        let err = Predicate::compare("Lactating", CompareOp::Lt, true).evaluate(&c).unwrap_err();
        assert!(matches!(err, FilterEvaluationError::TypeMismatch { .. }));
        assert!(Predicate::compare("Weight", CompareOp::Eq, "heavy").evaluate(&c).is_err());
    }

    #[test]
    fn operand_parsing() {
        assert_eq!(AttributeValue::parse(" 12.5 "), AttributeValue::Number(12.5));
        assert_eq!(AttributeValue::parse("TRUE"), AttributeValue::Bool(true));
        assert_eq!(AttributeValue::parse("Male"), AttributeValue::from("Male"));
        assert_eq!("<=".parse::<CompareOp>(), Ok(CompareOp::Le));
        assert!("=>".parse::<CompareOp>().is_err());
    }
}

// ── Selection ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod selection {
    use super::*;
    use crate::{CompareOp, FeedStyle, FilterGroup, Predicate, SelectionContext};

    fn ctx(style: FeedStyle) -> SelectionContext {
        SelectionContext { style, feed_available: 90.0 }
    }

    fn females(value: f64) -> FilterGroup {
        FilterGroup::new("Cows", value, vec![Predicate::compare("Sex", CompareOp::Eq, "Female")])
    }

    #[test]
    fn empty_filter_list_matches_everyone() {
        let herd = small_herd();
        let sel = FilterGroup::new("All", 1.0, vec![]).evaluate(&herd.individuals, ctx(FeedStyle::SpecifiedDailyAmount));
        assert_eq!(sel.len(), 3);
        assert_eq!(sel.proportion, 1.0);
    }

    #[test]
    fn filters_are_anded_and_keep_population_order() {
        let herd = small_herd();
        let group = FilterGroup::new(
            "HeavyCows",
            1.0,
            vec![
                Predicate::compare("Sex", CompareOp::Eq, "Female"),
                Predicate::compare("Weight", CompareOp::Gt, 350.0),
            ],
        );
        let sel = group.evaluate(&herd.individuals, ctx(FeedStyle::SpecifiedDailyAmount));
        assert_eq!(sel.ids().collect::<Vec<_>>(), [IndividualId(1)]);
        assert!((sel.proportion - 1.0 / 3.0).abs() < 1e-12);
    }

    #[test]
    fn missing_attribute_excluded_and_counted() {
        let herd = small_herd();
        let group = FilterGroup::new("Dry", 1.0, vec![Predicate::compare("Lactating", CompareOp::Eq, false)]);
        let sel = group.evaluate(&herd.individuals, ctx(FeedStyle::SpecifiedDailyAmount));
        assert_eq!(sel.ids().collect::<Vec<_>>(), [IndividualId(0)]);
        assert_eq!(sel.skipped.len(), 1);
    }

    #[test]
    fn weights_per_style() {
        let herd = small_herd();
        let pop = &herd.individuals;
        let cows = |style| females(2.0).evaluate(pop, ctx(style));

        let shared = cows(FeedStyle::SpecifiedDailyAmount);
        assert_eq!(shared.entries.iter().map(|e| e.weight).collect::<Vec<_>>(), [1.0, 1.0]);

        let each = cows(FeedStyle::SpecifiedDailyAmountPerIndividual);
        assert_eq!(each.total_weight(), 4.0);

        let available = cows(FeedStyle::ProportionOfFeedAvailable);
        assert_eq!(available.total_weight(), 180.0);

        let by_weight = cows(FeedStyle::ProportionOfWeight);
        assert_eq!(by_weight.entries[0].weight, 600.0);

        let potential = cows(FeedStyle::ProportionOfPotentialIntake);
        assert!((potential.entries[0].weight - 2.0 * pop[0].potential_intake).abs() < 1e-12);
    }

    #[test]
    fn remaining_intake_never_negative() {
        let mut herd = small_herd();
        herd.individuals[0].feed(1000.0);
        let sel = females(1.0).evaluate(&herd.individuals, ctx(FeedStyle::ProportionOfRemainingIntakeRequired));
        assert_eq!(sel.entries[0].weight, 0.0);
        assert!((sel.entries[1].weight - herd.individuals[1].potential_intake).abs() < 1e-12);
    }

    #[test]
    fn non_positive_value_selects_with_zero_weight() {
        let herd = small_herd();
        for value in [0.0, -5.0] {
            let sel = females(value).evaluate(&herd.individuals, ctx(FeedStyle::ProportionOfWeight));
            assert_eq!(sel.len(), 2);
            assert_eq!(sel.total_weight(), 0.0);
        }
    }

    #[test]
    fn empty_population() {
        let sel = females(1.0).evaluate::<Ruminant>(&[], ctx(FeedStyle::SpecifiedDailyAmount));
        assert!(sel.is_empty());
        assert_eq!(sel.proportion, 0.0);
    }

    #[test]
    fn feed_style_names_match_registry() {
        let names: Vec<String> = FeedStyle::ALL.iter().map(ToString::to_string).collect();
        assert_eq!(names, ag_tree::model_type::FEED_STYLES);
        for name in ag_tree::model_type::FEED_STYLES {
            assert!(name.parse::<FeedStyle>().is_ok());
        }
    }
}

// ── Tree binding ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod from_tree {
    use super::*;
    use crate::{FeedActivity, FeedStyle, HerdError};
    use ag_tree::{ModelNode, ModelTree, ModelType};

    fn tree() -> ModelTree {
        let mut tree = ModelTree::new(ModelNode::new(ModelType::Simulations, "Simulations"));
        let sim = tree.add_child(tree.root(), ModelNode::new(ModelType::Simulation, "Sim")).unwrap();
        let herd = tree.add_child(sim, ModelNode::new(ModelType::RuminantHerd, "Herd")).unwrap();
        let cows = ModelNode::new(ModelType::RuminantCohort, "Cows").with("count", 4i64).unwrap();
        tree.add_child(herd, cows).unwrap();
        let bulls = ModelNode::new(ModelType::RuminantCohort, "Bulls")
            .with("sex", "Male")
            .unwrap()
            .with("count", 2i64)
            .unwrap()
            .with("weight", 500.0)
            .unwrap();
        tree.add_child(herd, bulls).unwrap();

        let feed = ModelNode::new(ModelType::RuminantActivityFeed, "Feed")
            .with("feed_style", "SpecifiedDailyAmountPerIndividual")
            .unwrap();
        let feed = tree.add_child(sim, feed).unwrap();
        let group = ModelNode::new(ModelType::RuminantFeedGroup, "Bulls").with("value", 3.0).unwrap();
        let group = tree.add_child(feed, group).unwrap();
        let filter = ModelNode::new(ModelType::RuminantFilter, "Males").with("parameter", "Sex").unwrap();
        let filter = filter.with("operator", "==").unwrap().with("value", "Male").unwrap();
        tree.add_child(group, filter).unwrap();
        let ignored = ModelNode::new(ModelType::RuminantFilter, "Off").with("parameter", "Pregnant").unwrap();
        tree.add_child(group, ignored.disabled()).unwrap();
        tree
    }

    #[test]
    fn herd_from_cohorts() {
        let tree = tree();
        let id = tree.find_by_path(".Simulations.Sim.Herd").unwrap();
        let herd = Herd::from_tree(&tree, id, &mut SimRng::new(3)).unwrap();
        assert_eq!(herd.len(), 6);
        assert_eq!(herd.individuals.iter().filter(|r| r.sex() == Sex::Male).count(), 2);
    }

    #[test]
    fn activity_compiles_enabled_filters_only() {
        let tree = tree();
        let id = tree.find_by_path(".Simulations.Sim.Feed").unwrap();
        let activity = FeedActivity::from_tree(&tree, id).unwrap();
        assert_eq!(activity.style, FeedStyle::SpecifiedDailyAmountPerIndividual);
        assert_eq!(activity.groups.len(), 1);
        assert_eq!(activity.groups[0].predicate.to_string(), "(Sex == \"Male\")");
    }

    #[test]
    fn feeding_the_herd() {
        let tree = tree();
        let mut herd = Herd::from_tree(&tree, tree.find_by_path(".Simulations.Sim.Herd").unwrap(), &mut SimRng::new(3))
            .unwrap();
        let activity = FeedActivity::from_tree(&tree, tree.find_by_path(".Simulations.Sim.Feed").unwrap()).unwrap();
        let outcome = activity.apply(&mut herd);
        assert_eq!(outcome.feedings, 2);
        assert_eq!(outcome.fed, 6.0);
        assert_eq!(herd.individuals.iter().filter(|r| r.intake > 0.0).count(), 2);
    }

    #[test]
    fn oversized_cohort_count_rejected() {
        let cohort = ModelNode::new(ModelType::RuminantCohort, "Mob");
        assert!(cohort.clone().with("count", ag_tree::model_type::MAX_COHORT_COUNT).is_ok());
        assert!(cohort.with("count", i64::MAX).is_err());
    }

    #[test]
    fn wrong_node_type_rejected() {
        let tree = tree();
        let herd = tree.find_by_path(".Simulations.Sim.Herd").unwrap();
        assert!(matches!(FeedActivity::from_tree(&tree, herd), Err(HerdError::WrongNodeType { .. })));
    }
}
