//! Unit tests for ag-phenology.

use crate::{Accumulation, DailyWeather, PhaseContext};

// ── Helpers ───────────────────────────────────────────────────────────────────

const THERMAL: Accumulation = Accumulation::ThermalTime { base: 0.0, optimum: 26.0, maximum: 34.0 };

/// A day whose thermal time is exactly `tt` (for `tt` below 26).
fn day(tt: f64) -> PhaseContext {
    PhaseContext::new(DailyWeather::new(100, tt, tt))
}

// ── Accumulation ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod accumulation {
    use super::*;

    #[test]
    fn thermal_time_response() {
        let at = |t: f64| THERMAL.daily(&DailyWeather::new(1, t, t));
        assert_eq!(at(-3.0), 0.0);
        assert_eq!(at(10.0), 10.0);
        assert_eq!(at(26.0), 26.0);
        assert_eq!(at(30.0), 13.0);
        assert_eq!(at(40.0), 0.0);
    }

    #[test]
    fn mean_of_min_and_max() {
        assert_eq!(THERMAL.daily(&DailyWeather::new(1, 4.0, 16.0)), 10.0);
        assert_eq!(Accumulation::Days.daily(&DailyWeather::new(1, -20.0, -10.0)), 1.0);
    }
}

// ── Phase ─────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod phase {
    use super::*;
    use crate::{Phase, PhenologyError, Target, ThermalTimePhase};

    #[test]
    fn carry_over_within_a_day() {
        let mut p = ThermalTimePhase::new("Vegetative", 10.0, THERMAL);
        let first = p.do_time_step(1.0, &day(8.0)).unwrap();
        assert!(!first.completed);
        assert_eq!(p.tt_in_phase(), 8.0);

        let step = p.do_time_step(1.0, &day(5.0)).unwrap();
        assert!(step.completed);
        assert!((step.consumed_fraction - 0.4).abs() < 1e-12);
        assert!((step.leftover - 0.6).abs() < 1e-12);
        assert_eq!(p.tt_in_phase(), 10.0);
        assert_eq!(p.tt_for_timestep(), 2.0);
        assert_eq!(p.fraction_complete(), 1.0);
    }

    #[test]
    fn exact_target_completes_with_nothing_left() {
        let mut p = ThermalTimePhase::new("P", 5.0, THERMAL);
        let step = p.do_time_step(1.0, &day(5.0)).unwrap();
        assert!(step.completed);
        assert_eq!(step.leftover, 0.0);
    }

    #[test]
    fn partial_day_scales_accumulation() {
        let mut p = ThermalTimePhase::new("P", 100.0, THERMAL);
        p.do_time_step(0.5, &day(10.0)).unwrap();
        assert_eq!(p.tt_for_timestep(), 5.0);
        assert_eq!(p.fraction_complete(), 0.05);
    }

    #[test]
    fn reset_zeroes_accumulators() {
        let mut p = ThermalTimePhase::new("P", 100.0, THERMAL);
        p.do_time_step(1.0, &day(10.0)).unwrap();
        p.reset_phase();
        assert_eq!(p.tt_in_phase(), 0.0);
        assert_eq!(p.tt_for_timestep(), 0.0);
        assert_eq!(p.fraction_complete(), 0.0);
    }

    #[test]
    fn dynamic_target_is_read_fresh() {
        let mut p = ThermalTimePhase::new("P", Target::dynamic(|ctx| ctx.weather.max_temp * 2.0), THERMAL);
        p.do_time_step(1.0, &day(10.0)).unwrap();
        assert_eq!(p.target(), 20.0);
        assert_eq!(p.fraction_complete(), 0.5);
        p.do_time_step(1.0, &day(4.0)).unwrap();
        assert_eq!(p.target(), 8.0);
        assert_eq!(p.fraction_complete(), 1.0);
    }

    #[test]
    fn unreachable_target_names_the_phase() {
        for bad in [0.0, -1.0, f64::NAN, f64::INFINITY] {
            let mut p = ThermalTimePhase::new("Flowering", bad, THERMAL);
            match p.do_time_step(1.0, &day(10.0)) {
                Err(PhenologyError::TargetUnreachable { phase, .. }) => assert_eq!(phase, "Flowering"),
                other => panic!("expected TargetUnreachable, got {other:?}"),
            }
        }
    }

    #[test]
    fn summary_line() {
        let mut p = ThermalTimePhase::new("Grain", 50.0, THERMAL).with_events("Flowering", "Maturity");
        p.do_time_step(1.0, &day(10.0)).unwrap();
        let mut out = Vec::new();
        p.write_summary(&mut out).unwrap();
        let line = String::from_utf8(out).unwrap();
        assert!(line.contains("Grain"));
        assert!(line.contains("10.0"));
        assert!(line.contains("Flowering -> Maturity"));
    }
}

// ── Phenology ─────────────────────────────────────────────────────────────────

#[cfg(test)]
mod phenology {
    use super::*;
    use crate::{FinalPhasePolicy, Phase, Phenology, PhenologyError, ThermalTimePhase};

    fn three_phases(policy: FinalPhasePolicy) -> Phenology {
        let phases: Vec<Box<dyn Phase>> = vec![
            Box::new(ThermalTimePhase::new("Emerging", 10.0, THERMAL).with_events("Sowing", "Emergence")),
            Box::new(ThermalTimePhase::new("Vegetative", 20.0, THERMAL).with_events("Emergence", "Flowering")),
            Box::new(ThermalTimePhase::new("Reproductive", 5.0, THERMAL).with_events("Flowering", "Maturity")),
        ];
        Phenology::new("Phenology", phases, policy).unwrap()
    }

    #[test]
    fn one_day_can_finish_a_phase_and_start_the_next() {
        let mut ph = three_phases(FinalPhasePolicy::Terminate);
        ph.advance_day(&day(8.0)).unwrap();
        let transitions = ph.advance_day(&day(5.0)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert_eq!(transitions[0].from, "Emerging");
        assert_eq!(transitions[0].to.as_deref(), Some("Vegetative"));
        assert_eq!(transitions[0].end_event, "Emergence");
        assert_eq!(ph.current_phase_name(), "Vegetative");
        // 0.6 of a 5-degree day carried into the next phase.
        assert!((ph.current_phase().tt_in_phase() - 3.0).abs() < 1e-12);
        assert!((ph.stage() - 2.15).abs() < 1e-12);
    }

    #[test]
    fn several_phases_in_one_day() {
        let mut ph = three_phases(FinalPhasePolicy::Terminate);
        ph.advance_day(&day(10.0)).unwrap();
        ph.advance_day(&day(20.0)).unwrap();
        assert_eq!(ph.current_phase_name(), "Reproductive");
        let transitions = ph.advance_day(&day(25.0)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert!(ph.is_finished());
        assert_eq!(transitions[0].to, None);
    }

    #[test]
    fn terminate_ignores_further_days() {
        let mut ph = three_phases(FinalPhasePolicy::Terminate);
        for _ in 0..10 {
            ph.advance_day(&day(25.0)).unwrap();
        }
        assert!(ph.is_finished());
        assert_eq!(ph.current_phase_name(), "Reproductive");
        assert!(ph.advance_day(&day(25.0)).unwrap().is_empty());
    }

    #[test]
    fn loop_wraps_with_fresh_accumulators() {
        let mut ph = three_phases(FinalPhasePolicy::Loop);
        ph.advance_day(&day(10.0)).unwrap();
        ph.advance_day(&day(20.0)).unwrap();
        let transitions = ph.advance_day(&day(6.0)).unwrap();
        assert_eq!(transitions.len(), 1);
        assert!(transitions[0].looped);
        assert_eq!(ph.current_phase_name(), "Emerging");
        // 1 of the 6 degrees carried over into the fresh first phase.
        assert!((ph.current_phase().tt_in_phase() - 1.0).abs() < 1e-12);
        assert!(!ph.is_finished());
    }

    #[test]
    fn tiny_loop_target_finishes_the_day() {
        for target in [1e-17, 1e-9] {
            let phases: Vec<Box<dyn Phase>> = vec![Box::new(ThermalTimePhase::new("P", target, Accumulation::Days))];
            let mut ph = Phenology::new("Phenology", phases, FinalPhasePolicy::Loop).unwrap();
            let transitions = ph.advance_day(&day(10.0)).unwrap();
            assert_eq!(transitions.len(), 1, "target {target}");
            assert!(transitions[0].looped);
            assert!(!ph.is_finished());
        }
    }

    #[test]
    fn a_day_completes_each_phase_at_most_once() {
        let phases: Vec<Box<dyn Phase>> = vec![
            Box::new(ThermalTimePhase::new("A", 1.0, THERMAL)),
            Box::new(ThermalTimePhase::new("B", 1.0, THERMAL)),
        ];
        let mut ph = Phenology::new("Phenology", phases, FinalPhasePolicy::Loop).unwrap();
        let transitions = ph.advance_day(&day(20.0)).unwrap();
        assert_eq!(transitions.len(), 2);
        assert_eq!(ph.current_phase_name(), "A");
        assert!(transitions[1].looped);
    }

    #[test]
    fn reset_restarts_without_transition() {
        let mut ph = three_phases(FinalPhasePolicy::Terminate);
        ph.advance_day(&day(15.0)).unwrap();
        ph.reset();
        assert_eq!(ph.current_index(), 0);
        assert_eq!(ph.fraction_complete(), 0.0);
    }

    #[test]
    fn unknown_phase_target() {
        let mut ph = three_phases(FinalPhasePolicy::Loop);
        assert!(matches!(ph.set_target("Harvest", 1.0.into()), Err(PhenologyError::UnknownPhase(_))));
        ph.set_target("Emerging", 1.0.into()).unwrap();
        assert_eq!(ph.advance_day(&day(1.0)).unwrap().len(), 1);
    }

    #[test]
    fn empty_phase_list_rejected() {
        assert!(matches!(
            Phenology::new("Empty", vec![], FinalPhasePolicy::Loop),
            Err(PhenologyError::NoPhases { .. })
        ));
    }
}

// ── Tree binding ──────────────────────────────────────────────────────────────

#[cfg(test)]
mod from_tree {
    use super::*;
    use crate::{FinalPhasePolicy, Phenology};
    use ag_tree::{ModelNode, ModelTree, ModelType};

    #[test]
    fn reads_policy_and_enabled_phases() {
        let mut tree = ModelTree::new(ModelNode::new(ModelType::Simulations, "Simulations"));
        let sim = tree.add_child(tree.root(), ModelNode::new(ModelType::Simulation, "Sim")).unwrap();
        let zone = tree.add_child(sim, ModelNode::new(ModelType::Zone, "Field")).unwrap();
        let plant = tree.add_child(zone, ModelNode::new(ModelType::Plant, "Wheat")).unwrap();
        let phen = ModelNode::new(ModelType::Phenology, "Phenology").with("final_phase_policy", "Loop").unwrap();
        let phen = tree.add_child(plant, phen).unwrap();
        let a = ModelNode::new(ModelType::Phase, "A").with("target", 3.0).unwrap().with("accumulation", "Days").unwrap();
        tree.add_child(phen, a).unwrap();
        tree.add_child(phen, ModelNode::new(ModelType::Phase, "Skipped").disabled()).unwrap();
        tree.add_child(phen, ModelNode::new(ModelType::Phase, "B")).unwrap();

        let mut ph = Phenology::from_tree(&tree, phen).unwrap();
        assert_eq!(ph.policy(), FinalPhasePolicy::Loop);
        assert_eq!(ph.phase_names().collect::<Vec<_>>(), ["A", "B"]);
        for _ in 0..3 {
            ph.advance_day(&day(20.0)).unwrap();
        }
        assert_eq!(ph.current_phase_name(), "B");
    }
}
