mod tests {
    use myrtio_string_effects::color::Color;
    use myrtio_string_effects::effect::{Effect, GlowConfig, GlowEffect, GlowVariant};
    use myrtio_string_effects::phase::CycleSpec;
    use myrtio_string_effects::topology::Topology;
    use myrtio_string_effects::{EffectError, Frame};
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    const COLORS: [Color; 2] = [Color::new(0.1, 1.0, 0.0), Color::new(0.6, 1.0, -0.5)];

    fn collect_frames<E: Effect>(effect: &mut E, count: usize) -> Vec<Frame> {
        (0..count).map(|_| effect.next_frame()).collect()
    }

    #[test]
    fn test_two_color_fixed_cycle_loop() {
        let topology = Topology::single(12);
        let config = GlowConfig::new(&COLORS, 1.0, CycleSpec::Fixed(4)).unwrap();
        let mut glow = GlowEffect::with_rng(&topology, config, SmallRng::seed_from_u64(1)).unwrap();
        glow.reset(8).unwrap();

        assert!(glow.phases().iter().all(|phase| 8 % phase.period == 0));

        let frames = collect_frames(&mut glow, 32);
        for k in 0..24 {
            assert_eq!(frames[k], frames[k + 8], "frame {k}");
        }
    }

    #[test]
    fn test_range_cycle_loop() {
        let topology = Topology::with_strings(&[20, 20]).unwrap();
        let config = GlowVariant::Fire.config().unwrap();
        let mut glow = GlowEffect::with_rng(&topology, config, SmallRng::seed_from_u64(9)).unwrap();
        glow.reset(60).unwrap();

        assert!(glow.phases().iter().all(|phase| 60 % phase.period == 0));

        let frames = collect_frames(&mut glow, 180);
        for k in 0..120 {
            assert_eq!(frames[k], frames[k + 60], "frame {k}");
        }
    }

    #[test]
    fn test_loop_length_without_divisor() {
        let topology = Topology::single(10);
        let config = GlowConfig::new(&COLORS, 1.0, CycleSpec::range(4, 5)).unwrap();
        let mut glow = GlowEffect::with_rng(&topology, config, SmallRng::seed_from_u64(2)).unwrap();
        glow.reset(7).unwrap();

        let frames = collect_frames(&mut glow, 21);
        for k in 0..14 {
            assert_eq!(frames[k], frames[k + 7]);
        }
    }

    #[test]
    fn test_single_color_is_constant() {
        let color = Color::new(0.3, 0.8, 0.1);
        let topology = Topology::single(6);
        let config = GlowConfig::new(&[color], 2.0, CycleSpec::range(2, 4)).unwrap();
        let mut glow = GlowEffect::with_rng(&topology, config, SmallRng::seed_from_u64(3)).unwrap();
        glow.reset(0).unwrap();

        for frame in collect_frames(&mut glow, 20) {
            assert_eq!(frame.len(), 6);
            assert!(frame.iter().all(|&c| c == color));
        }
    }

    #[test]
    fn test_live_colors_stay_between_palette_colors() {
        let topology = Topology::single(16);
        let config = GlowConfig::new(&COLORS, 1.0, CycleSpec::range(3, 6)).unwrap();
        let mut glow = GlowEffect::with_rng(&topology, config, SmallRng::seed_from_u64(4)).unwrap();

        for frame in collect_frames(&mut glow, 50) {
            for color in frame.iter() {
                assert!((-0.5..=0.0).contains(&color.light));
                assert_eq!(color.sat, 1.0);
            }
        }
    }

    #[test]
    fn test_invalid_config() {
        assert_eq!(
            GlowConfig::new(&[], 1.0, CycleSpec::Fixed(4)),
            Err(EffectError::EmptyPalette)
        );
        assert_eq!(
            GlowConfig::new(&COLORS, 1.0, CycleSpec::Fixed(0)),
            Err(EffectError::InvalidCycle { lo: 0, hi: 0 })
        );
    }

    #[test]
    fn test_invalid_bend() {
        assert_eq!(
            GlowConfig::new(&COLORS, -1.0, CycleSpec::Fixed(4)),
            Err(EffectError::InvalidBend(-1.0))
        );
        assert!(matches!(
            GlowConfig::new(&COLORS, f32::NAN, CycleSpec::Fixed(4)),
            Err(EffectError::InvalidBend(_))
        ));
        assert!(GlowConfig::new(&COLORS, f32::INFINITY, CycleSpec::Fixed(4)).is_err());
        assert!(GlowConfig::new(&COLORS, 0.0, CycleSpec::Fixed(4)).is_ok());

        // The public field is checked again when the effect is built
        let mut config = GlowConfig::new(&COLORS, 1.0, CycleSpec::Fixed(4)).unwrap();
        config.bend = -0.5;
        let topology = Topology::single(4);
        assert!(matches!(
            GlowEffect::with_rng(&topology, config, SmallRng::seed_from_u64(9)),
            Err(EffectError::InvalidBend(_))
        ));
    }

    #[test]
    fn test_presets() {
        let topology = Topology::single(8);
        for variant in [
            GlowVariant::Charcoal,
            GlowVariant::Fire,
            GlowVariant::Water,
            GlowVariant::Meadow,
            GlowVariant::Aurora,
            GlowVariant::Brown,
        ] {
            let config = variant.config().unwrap();
            let glow = GlowEffect::new(&topology, config).unwrap();
            assert!(glow.pacing().fps > 0.0);
        }
        let fire = GlowEffect::new(&topology, GlowVariant::Fire.config().unwrap()).unwrap();
        assert_eq!(fire.pacing().fps, 20.0);
        let meadow = GlowEffect::new(&topology, GlowVariant::Meadow.config().unwrap()).unwrap();
        assert_eq!(meadow.pacing().fps, 8.0);
        assert_eq!(meadow.pacing().frame_count, 120);
    }
}
