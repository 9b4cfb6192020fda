mod tests {
    use embassy_time::Duration;
    use myrtio_string_effects::color::Color;
    use myrtio_string_effects::effect::{DEFAULT_FPS, DEFAULT_FRAME_COUNT, Pacing};
    use myrtio_string_effects::palette::Palette;
    use myrtio_string_effects::random::Arrivals;
    use myrtio_string_effects::EffectError;
    use rand::SeedableRng;
    use rand::rngs::SmallRng;

    fn palette(len: usize) -> Palette {
        Palette::new((0..len).map(|i| Color::new(i as f32 / 10.0, 1.0, 0.0)).collect()).unwrap()
    }

    #[test]
    fn test_empty_palette() {
        assert_eq!(Palette::new(Vec::new()), Err(EffectError::EmptyPalette));
    }

    #[test]
    fn test_biased_index_in_range() {
        let palette = palette(5);
        let mut rng = SmallRng::seed_from_u64(1);
        for bend in [0.0, 0.5, 1.0, 3.0] {
            for _ in 0..200 {
                assert!(palette.biased_index(&mut rng, bend) < 5);
            }
        }
    }

    #[test]
    fn test_bend_favors_front() {
        let palette = palette(4);
        let mut rng = SmallRng::seed_from_u64(2);
        let mut counts = [0usize; 4];
        for _ in 0..4000 {
            counts[palette.biased_index(&mut rng, 3.0)] += 1;
        }
        // u^3 < 1/4 for u < 0.63
        assert!(counts[0] > 2 * counts[1]);
        assert!(counts[0] > 2000);
    }

    #[test]
    fn test_bend_zero_picks_last() {
        // u^0 is one, clamped to the last color
        let palette = palette(3);
        let mut rng = SmallRng::seed_from_u64(3);
        assert_eq!(palette.biased_index(&mut rng, 0.0), 2);
    }

    #[test]
    fn test_arrivals() {
        let mut rng = SmallRng::seed_from_u64(4);
        let none = Arrivals::new(0.0).unwrap();
        assert!((0..100).all(|_| none.sample(&mut rng) == 0));

        let some = Arrivals::new(2.0).unwrap();
        let total: usize = (0..1000).map(|_| some.sample(&mut rng)).sum();
        assert!((1500..2500).contains(&total), "total {total}");

        assert_eq!(
            Arrivals::new(-0.5).unwrap_err(),
            EffectError::InvalidFrequency(-0.5)
        );
        assert!(Arrivals::new(f64::NAN).is_err());
    }

    #[test]
    fn test_pacing() {
        let pacing = Pacing::default();
        assert_eq!(pacing.fps, DEFAULT_FPS);
        assert_eq!(pacing.frame_count, DEFAULT_FRAME_COUNT);
        assert_eq!(pacing.frame_duration(), Duration::from_millis(125));

        let custom = pacing.with_fps(Some(20.0)).with_frame_count(None);
        assert_eq!(custom.frame_duration(), Duration::from_millis(50));
        assert_eq!(custom.frame_count, DEFAULT_FRAME_COUNT);

        assert_eq!(Pacing::new(0.0, 1).frame_duration(), Duration::MAX);
    }
}
