mod tests {
    use myrtio_string_effects::EffectError;
    use myrtio_string_effects::phase::{CycleSpec, assign_phases, candidate_periods};

    #[test]
    fn test_candidate_periods_divide_loop() {
        assert_eq!(candidate_periods(12, 3, 8), vec![3, 4, 6]);
        assert_eq!(candidate_periods(120, 4, 8), vec![4, 5, 6, 8]);
    }

    #[test]
    fn test_candidate_periods_fallback() {
        // No period in 5..=7 divides 11
        assert_eq!(candidate_periods(11, 5, 7), vec![5, 6, 7]);
        // Unbounded loops use the whole range
        assert_eq!(candidate_periods(0, 2, 4), vec![2, 3, 4]);
    }

    #[test]
    fn test_assign_phases_fixed() {
        let phases = assign_phases(CycleSpec::Fixed(4), 8, 10);
        assert_eq!(phases.len(), 10);
        for (i, phase) in phases.iter().enumerate() {
            assert_eq!(phase.period, 4);
            assert_eq!(phase.offset, (i * 11) % 4);
        }
    }

    #[test]
    fn test_assign_phases_divide_loop() {
        for loop_len in [12, 24, 60, 120, 240] {
            let phases = assign_phases(CycleSpec::range(3, 10), loop_len, 100);
            for phase in &phases {
                assert_eq!(loop_len % phase.period, 0, "loop {loop_len}");
                assert!(phase.offset < phase.period);
            }
        }
    }

    #[test]
    fn test_assign_phases_hashing() {
        let phases = assign_phases(CycleSpec::range(3, 6), 0, 8);
        let periods: Vec<usize> = phases.iter().map(|p| p.period).collect();
        // periods[(i * 13) % 4] over [3, 4, 5, 6]
        assert_eq!(periods, vec![3, 4, 5, 6, 3, 4, 5, 6]);
        assert_eq!(phases[1].offset, 11 % 4);
        assert_eq!(phases[2].offset, 22 % 5);
    }

    #[test]
    fn test_assign_phases_prime_collision() {
        // 13 candidates switch the period hash to 7
        let phases = assign_phases(CycleSpec::range(1, 13), 0, 3);
        assert_eq!(phases[1].period, 8);
        assert_eq!(phases[2].period, 2);
    }

    #[test]
    fn test_neighbours_differ() {
        let phases = assign_phases(CycleSpec::range(4, 8), 120, 50);
        let identical = phases.windows(2).filter(|w| w[0] == w[1]).count();
        assert_eq!(identical, 0);
    }

    #[test]
    fn test_cycle_validation() {
        assert!(CycleSpec::range(2, 5).validate().is_ok());
        assert_eq!(
            CycleSpec::Fixed(0).validate(),
            Err(EffectError::InvalidCycle { lo: 0, hi: 0 })
        );
        assert_eq!(
            CycleSpec::range(6, 3).validate(),
            Err(EffectError::InvalidCycle { lo: 6, hi: 3 })
        );
    }
}
