//! Unit tests for ag-core primitives.

#[cfg(test)]
mod ids {
    use crate::{IndividualId, ModelId};

    #[test]
    fn slot_index_roundtrip() {
        let id = ModelId::from_index(42).unwrap();
        assert_eq!(id, ModelId(42));
        assert_eq!(id.index(), 42);
        assert_eq!(ModelId::from_index(0), Some(ModelId::ROOT));
    }

    #[test]
    fn sentinel_slot_is_never_handed_out() {
        let last = u32::MAX as usize;
        assert_eq!(ModelId::from_index(last - 1), Some(ModelId(u32::MAX - 1)));
        assert_eq!(ModelId::from_index(last), None);
        assert_eq!(IndividualId::from_index(last), None);
        if let Some(past) = last.checked_add(1) {
            assert_eq!(ModelId::from_index(past), None);
        }
    }

    #[test]
    fn default_is_invalid() {
        assert_eq!(IndividualId::default(), IndividualId::INVALID);
        assert!(!ModelId::default().is_valid());
        assert!(ModelId::ROOT.is_valid());
    }

    #[test]
    fn display() {
        assert_eq!(IndividualId(7).to_string(), "individual 7");
        assert_eq!(ModelId(3).to_string(), "node #3");
        assert_eq!(ModelId::INVALID.to_string(), "node #invalid");
    }
}

#[cfg(test)]
mod time {
    use crate::{SimClock, SimConfig, Tick};

    #[test]
    fn advance_moves_one_day() {
        let mut clock = SimClock::new(1);
        clock.advance();
        clock.advance();
        assert_eq!(clock.current_tick, Tick(2));
        assert_eq!(Tick(2).to_string(), "D2");
    }

    #[test]
    fn day_of_year_wraps() {
        let mut clock = SimClock::new(364);
        assert_eq!(clock.day_of_year(), 364);
        clock.advance();
        assert_eq!(clock.day_of_year(), 365);
        clock.advance();
        assert_eq!(clock.day_of_year(), 1);
        assert_eq!(clock.elapsed_years(), 1);
    }

    #[test]
    fn display_shows_day() {
        let clock = SimClock::new(32);
        assert_eq!(clock.to_string(), "D0 (year 0 day 032)");
    }

    #[test]
    fn config_end_tick() {
        let config = SimConfig { total_days: 90, ..SimConfig::default() };
        assert_eq!(config.end_tick(), Tick(90));
        assert_eq!(config.make_clock().current_tick, Tick::ZERO);
    }

    #[test]
    fn config_validation() {
        assert!(SimConfig::default().validate().is_ok());
        let zero_days = SimConfig { total_days: 0, ..SimConfig::default() };
        assert!(zero_days.validate().is_err());
        let bad_start = SimConfig { start_day_of_year: 0, ..SimConfig::default() };
        assert!(bad_start.validate().is_err());
        let no_name = SimConfig { simulation_name: "  ".into(), ..SimConfig::default() };
        assert!(no_name.validate().is_err());
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_toml() {
        let config = SimConfig::from_toml_str(
            r#"
            simulation_name      = "Paddock"
            start_day_of_year    = 121
            total_days           = 30
            seed                 = 7
            output_interval_days = 1
            "#,
        )
        .unwrap();
        assert_eq!(config.simulation_name, "Paddock");
        assert_eq!(config.total_days, 30);
    }

    #[cfg(feature = "serde")]
    #[test]
    fn config_from_toml_rejects_invalid() {
        let result = SimConfig::from_toml_str(
            r#"
            simulation_name      = "Paddock"
            start_day_of_year    = 400
            total_days           = 30
            seed                 = 7
            output_interval_days = 1
            "#,
        );
        assert!(result.is_err());
    }
}

#[cfg(test)]
mod rng {
    use crate::SimRng;

    #[test]
    fn same_seed_same_stream() {
        let mut a = SimRng::new(9);
        let mut b = SimRng::new(9);
        for _ in 0..10 {
            assert_eq!(a.jitter(100.0, 50.0), b.jitter(100.0, 50.0));
        }
    }

    #[test]
    fn jitter_stays_within_spread() {
        let mut rng = SimRng::new(1);
        for _ in 0..100 {
            let v = rng.jitter(200.0, 10.0);
            assert!((190.0..=210.0).contains(&v), "got {v}");
        }
    }

    #[test]
    fn zero_spread_is_identity() {
        let mut rng = SimRng::new(1);
        assert_eq!(rng.jitter(5.0, 0.0), 5.0);
        assert_eq!(rng.jitter(5.0, f64::NAN), 5.0);
    }
}
