mod tests {
    use myrtio_string_effects::color::Color;
    use myrtio_string_effects::effect::{
        Channel, Effect, SparkleColor, SparkleConfig, SparkleEffect, SparkleEnvelope,
        SparkleProfile, SparkleStep, SparkleStrategy, SparkleVariant,
    };
    use myrtio_string_effects::topology::Topology;
    use myrtio_string_effects::{EffectError, Frame};
    use rand::rngs::SmallRng;
    use rand::{Rng, SeedableRng};

    const BACKGROUND: Color = Color::new(0.5, 0.2, -0.8);

    /// White for two frames, then cut short
    struct Fizzle;

    impl SparkleStrategy for Fizzle {
        type Descriptor = ();

        fn create<R: Rng + ?Sized>(&self, _index: usize, _time: usize, _rng: &mut R) {}

        fn advance(&self, _index: usize, elapsed: usize, _descriptor: &()) -> SparkleStep {
            if elapsed < 2 {
                SparkleStep::Continuing(Color::WHITE)
            } else {
                SparkleStep::Aborted
            }
        }
    }

    /// Never ends
    struct Steady;

    impl SparkleStrategy for Steady {
        type Descriptor = ();

        fn create<R: Rng + ?Sized>(&self, _index: usize, _time: usize, _rng: &mut R) {}

        fn advance(&self, _index: usize, _elapsed: usize, _descriptor: &()) -> SparkleStep {
            SparkleStep::Continuing(Color::WHITE)
        }
    }

    fn profile(envelope: SparkleEnvelope) -> SparkleProfile {
        SparkleProfile::new(
            SparkleColor::random(Channel::Any, Channel::Fixed(1.0), Channel::Fixed(0.0)),
            envelope,
        )
    }

    fn effect<S: SparkleStrategy>(
        topology: &Topology,
        config: SparkleConfig<S>,
        seed: u64,
    ) -> SparkleEffect<S, SmallRng> {
        SparkleEffect::with_rng(topology, config, SmallRng::seed_from_u64(seed))
    }

    fn assert_partition<S: SparkleStrategy>(effect: &SparkleEffect<S, SmallRng>, num_leds: usize) {
        let mut all: Vec<usize> = effect.available().to_vec();
        let active = effect.active_indices();
        assert!(
            active.iter().all(|index| !effect.available().contains(index)),
            "pixel both free and busy"
        );
        all.extend(active);
        all.sort_unstable();
        assert_eq!(all, (0..num_leds).collect::<Vec<_>>());
    }

    fn assert_loops<E: Effect>(effect: &mut E, loop_len: usize) {
        let frames: Vec<Frame> = (0..3 * loop_len).map(|_| effect.next_frame()).collect();
        for k in 0..2 * loop_len {
            assert_eq!(frames[k], frames[k + loop_len], "frame {k}");
        }
    }

    #[test]
    fn test_zero_frequency_keeps_background() {
        let topology = Topology::single(20);
        let config = SparkleConfig::new(profile(SparkleEnvelope::pulse(2, 2, 2)), 0.0, BACKGROUND)
            .unwrap();
        let mut sparkle = effect(&topology, config, 1);

        for _ in 0..30 {
            let frame = sparkle.next_frame();
            assert!(frame.iter().all(|&c| c == BACKGROUND));
            assert!(sparkle.active_indices().is_empty());
            assert_eq!(sparkle.available().len(), 20);
        }
    }

    #[test]
    fn test_free_and_busy_pixels_partition_unbounded() {
        let topology = Topology::single(25);
        let config =
            SparkleConfig::new(profile(SparkleEnvelope::pulse(3, 2, 3)), 2.0, BACKGROUND).unwrap();
        let mut sparkle = effect(&topology, config, 2);

        for _ in 0..200 {
            sparkle.next_frame();
            assert_partition(&sparkle, 25);
            for record in sparkle.records() {
                assert!(record.index < 25);
            }
        }
    }

    #[test]
    fn test_free_and_busy_pixels_partition_looped() {
        let topology = Topology::with_strings(&[15, 15]).unwrap();
        let config =
            SparkleConfig::new(profile(SparkleEnvelope::pulse(4, 3, 4)), 1.5, BACKGROUND).unwrap();
        let mut sparkle = effect(&topology, config, 3);
        sparkle.reset(24).unwrap();

        for _ in 0..120 {
            sparkle.next_frame();
            assert_partition(&sparkle, 30);
        }
    }

    #[test]
    fn test_busy_pixels_are_not_background() {
        let topology = Topology::single(40);
        let config = SparkleConfig::new(
            SparkleProfile::new(
                SparkleColor::Fixed(Color::WHITE),
                SparkleEnvelope::pulse(0, 3, 0),
            ),
            2.0,
            BACKGROUND,
        )
        .unwrap();
        let mut sparkle = effect(&topology, config, 4);

        for _ in 0..50 {
            let frame = sparkle.next_frame();
            for record in sparkle.records() {
                assert_eq!(frame[record.index], Color::WHITE);
            }
            let lit = frame.iter().filter(|&&c| c == Color::WHITE).count();
            assert_eq!(lit, sparkle.records().len());
        }
    }

    #[test]
    fn test_custom_profile_loops() {
        let topology = Topology::single(30);
        let config =
            SparkleConfig::new(profile(SparkleEnvelope::pulse(3, 2, 3)), 1.0, BACKGROUND).unwrap();
        let mut sparkle = effect(&topology, config, 5);
        sparkle.reset(20).unwrap();
        assert_loops(&mut sparkle, 20);
    }

    #[test]
    fn test_crowded_loop() {
        // Far more arrivals than free pixels
        let topology = Topology::single(6);
        let config =
            SparkleConfig::new(profile(SparkleEnvelope::pulse(2, 1, 2)), 5.0, BACKGROUND).unwrap();
        let mut sparkle = effect(&topology, config, 6);
        sparkle.reset(12).unwrap();
        assert_loops(&mut sparkle, 12);
    }

    #[test]
    fn test_presets_loop() {
        let topology = Topology::with_strings(&[30, 30]).unwrap();
        for (seed, variant) in [
            SparkleVariant::SimpleBlink,
            SparkleVariant::SimpleStars,
            SparkleVariant::Pulselight,
            SparkleVariant::Looplight,
            SparkleVariant::LooplightReverse,
            SparkleVariant::LooplightSpectrum,
            SparkleVariant::SparkleRandom,
            SparkleVariant::SparkleStars,
        ]
        .into_iter()
        .enumerate()
        {
            let mut sparkle = effect(&topology, variant.config().unwrap(), seed as u64);
            sparkle.reset(60).unwrap();
            assert_loops(&mut sparkle, 60);
        }
    }

    #[test]
    fn test_loop_shorter_than_sparkle() {
        let topology = Topology::single(10);
        let config = SparkleVariant::SparkleRandom.config().unwrap();
        let mut sparkle = effect(&topology, config, 7);

        assert_eq!(
            sparkle.reset(10),
            Err(EffectError::LoopTooShort {
                loop_len: 10,
                lead_in: 40
            })
        );
        for _ in 0..5 {
            let frame = sparkle.next_frame();
            assert!(frame.iter().all(|&c| c == Color::BLACK));
        }

        // A long enough loop brings it back
        assert!(sparkle.reset(40).is_ok());
    }

    #[test]
    fn test_endless_sparkle() {
        let topology = Topology::single(10);
        let config = SparkleConfig::new(Steady, 1.0, BACKGROUND).unwrap();
        let mut sparkle = effect(&topology, config, 11);

        assert_eq!(
            sparkle.reset(100),
            Err(EffectError::EndlessSparkle { limit: 4096 })
        );
        assert!(sparkle.next_frame().iter().all(|&c| c == BACKGROUND));
        // Without a loop nothing has to end
        assert!(sparkle.reset(0).is_ok());
    }

    #[test]
    fn test_aborted_sparkle_keeps_color_and_loops() {
        let topology = Topology::single(20);
        let config = SparkleConfig::new(Fizzle, 1.0, BACKGROUND).unwrap();
        let mut sparkle = effect(&topology, config, 12);
        sparkle.reset(30).unwrap();

        // The last frame of the pass wraps and clears, stop short of it
        let mut aborted = 0;
        for _ in 0..29 {
            let before: Vec<usize> = sparkle.records().iter().map(|r| r.index).collect();
            let frame = sparkle.next_frame();
            assert_partition(&sparkle, 20);

            for index in before {
                if sparkle.records().iter().any(|r| r.index == index) {
                    continue;
                }
                aborted += 1;
                assert_eq!(frame[index], Color::WHITE, "pixel {index} reverted");
            }
        }
        assert!(aborted > 0);

        sparkle.reset(30).unwrap();
        assert_loops(&mut sparkle, 30);
    }

    #[test]
    fn test_pulse_envelope() {
        let color = Color::new(0.3, 1.0, 0.0);
        let strategy = SparkleProfile::new(SparkleColor::Fixed(color), SparkleEnvelope::pulse(1, 1, 1));
        let mut rng = SmallRng::seed_from_u64(8);
        let descriptor = strategy.create(0, 0, &mut rng);
        assert_eq!(descriptor, color);

        let light = |elapsed| match strategy.advance(0, elapsed, &descriptor) {
            SparkleStep::Continuing(c) => c.light,
            step => panic!("unexpected {step:?}"),
        };
        assert!((light(0) + 0.75).abs() < 1e-6);
        assert_eq!(strategy.advance(0, 1, &descriptor), SparkleStep::Continuing(color));
        assert!((light(2) + 0.75).abs() < 1e-6);
        assert_eq!(strategy.advance(0, 3, &descriptor), SparkleStep::Completed);
        assert!(strategy.advance(0, 3, &descriptor).is_terminal());
    }

    #[test]
    fn test_flash_envelope() {
        let color = Color::new(0.3, 1.0, 0.0);
        let envelope = SparkleEnvelope::flash(2, 2);
        assert_eq!(envelope.lifetime(), 5);

        let strategy = SparkleProfile::new(SparkleColor::Fixed(color), envelope);
        assert_eq!(
            strategy.advance(0, 0, &color),
            SparkleStep::Continuing(Color::WHITE)
        );
        assert_eq!(strategy.advance(0, 2, &color), SparkleStep::Continuing(color));
        assert_eq!(strategy.advance(0, 5, &color), SparkleStep::Completed);
    }

    #[test]
    fn test_loop_envelope_peaks_white() {
        let color = Color::new(0.3, 1.0, 0.0);
        let strategy = SparkleProfile::new(SparkleColor::Fixed(color), SparkleEnvelope::looping(4, 4));
        match strategy.advance(0, 3, &color) {
            SparkleStep::Continuing(c) => assert_eq!(c.light, 1.0),
            step => panic!("unexpected {step:?}"),
        }
        assert_eq!(strategy.advance(0, 8, &color), SparkleStep::Completed);
    }

    #[test]
    fn test_channels() {
        let strategy = SparkleProfile::new(
            SparkleColor::random(Channel::Range(0.2, 0.4), Channel::Fixed(0.5), Channel::Any),
            SparkleEnvelope::pulse(0, 1, 0),
        );
        let mut rng = SmallRng::seed_from_u64(9);
        for time in 0..100 {
            let color = strategy.create(0, time, &mut rng);
            assert!((0.2..=0.4).contains(&color.hue));
            assert_eq!(color.sat, 0.5);
            assert!((-1.0..=1.0).contains(&color.light));
        }
    }

    #[test]
    fn test_circular_hue_follows_time() {
        let strategy = SparkleProfile::new(SparkleColor::circular(4), SparkleEnvelope::pulse(0, 1, 0));
        let mut rng = SmallRng::seed_from_u64(10);
        assert_eq!(strategy.create(0, 1, &mut rng).hue, 0.25);
        assert_eq!(strategy.create(0, 6, &mut rng).hue, 0.5);
    }

    #[test]
    fn test_selected_colors() {
        let colors = [Color::new(0.1, 1.0, 0.0), Color::new(0.7, 1.0, 0.0)];
        let strategy = SparkleProfile::new(
            SparkleColor::selected(&colors, Some(&[0.0, 1.0])).unwrap(),
            SparkleEnvelope::pulse(0, 1, 0),
        );
        let mut rng = SmallRng::seed_from_u64(11);
        for time in 0..20 {
            assert_eq!(strategy.create(0, time, &mut rng), colors[1]);
        }
    }

    #[test]
    fn test_mismatched_weights() {
        let colors = [Color::WHITE, Color::BLACK];
        assert_eq!(
            SparkleColor::selected(&colors, Some(&[1.0])).unwrap_err(),
            EffectError::MismatchedWeights { expected: 2 }
        );
        assert_eq!(
            SparkleColor::circular_with_offsets(10, &[0.0, 0.5], &[1.0, 1.0, 1.0], 0.0)
                .unwrap_err(),
            EffectError::MismatchedWeights { expected: 2 }
        );
        assert_eq!(
            SparkleColor::circular_with_offsets(0, &[], &[], 0.0).unwrap_err(),
            EffectError::InvalidCycle { lo: 0, hi: 0 }
        );
        assert_eq!(
            SparkleColor::selected(&[], None).unwrap_err(),
            EffectError::EmptyPalette
        );
    }

    #[test]
    fn test_pacing() {
        let topology = Topology::single(4);
        let pacing = |variant: SparkleVariant| effect(&topology, variant.config().unwrap(), 0).pacing();

        assert_eq!(pacing(SparkleVariant::SimpleBlink).fps, 8.0);
        assert_eq!(pacing(SparkleVariant::SparkleStars).fps, 12.0);
        assert_eq!(pacing(SparkleVariant::LooplightSpectrum).frame_count, 240);
        assert_eq!(pacing(SparkleVariant::Looplight).frame_count, 120);
    }

    #[test]
    fn test_from_palette() {
        let topology = Topology::single(30);
        let colors = [Color::new(0.1, 1.0, 0.0)];
        let config = SparkleConfig::from_palette(&colors).unwrap();
        let mut sparkle = effect(&topology, config, 12);
        sparkle.reset(40).unwrap();
        for _ in 0..40 {
            let frame = sparkle.next_frame();
            for color in frame.iter() {
                assert!(*color == Color::BLACK || (color.hue - 0.1).abs() < 1e-6);
            }
        }
    }
}
