//! Invariants of navigation, bars and speed clamping over arbitrary inputs

use proptest::prelude::*;
use slideshow_engine::{
    BarState, ControllerOptions, ManualClock, SlideNavigator, PlaybackState, ProgressRenderer,
    SlideshowController, SpeedDirection, SpeedLevel, SpeedTable,
};

fn speed() -> SpeedLevel {
    SpeedLevel::from_millis(1000).unwrap()
}

proptest! {
    #[test]
    fn prop_forward_total_times_is_identity(total in 1usize..64, start in 0usize..64) {
        let mut state = PlaybackState::new(total, start, speed());
        let origin = state.current_index();
        for _ in 0..total {
            SlideNavigator::advance_forward(&mut state);
        }
        prop_assert_eq!(state.current_index(), origin);
    }

    #[test]
    fn prop_backward_undoes_forward(total in 1usize..64, start in 0usize..64) {
        let mut state = PlaybackState::new(total, start, speed());
        let origin = state.current_index();
        SlideNavigator::advance_forward(&mut state);
        SlideNavigator::advance_backward(&mut state);
        prop_assert_eq!(state.current_index(), origin);
    }

    #[test]
    fn prop_exactly_one_active_bar(total in 1usize..64, current in 0usize..64) {
        let current = current % total;
        let mut renderer = ProgressRenderer::new();
        renderer.render_all_bars(current, total);

        let bars = renderer.bars();
        prop_assert_eq!(bars.len(), total);
        prop_assert_eq!(bars.iter().filter(|b| b.state == BarState::Active).count(), 1);
        for (i, bar) in bars.iter().enumerate() {
            let expected = if i < current {
                BarState::Complete
            } else if i == current {
                BarState::Active
            } else {
                BarState::Pending
            };
            prop_assert_eq!(bar.state, expected);
        }
    }

    #[test]
    fn prop_speed_stays_in_table(steps in proptest::collection::vec(any::<bool>(), 0..40)) {
        let options = ControllerOptions::default();
        let table = SpeedTable::default();
        let mut c = SlideshowController::new(ManualClock::new(), options);
        c.open(vec!["a".into(), "b".into()], 0);
        c.toggle();
        for faster in steps {
            c.change_speed(if faster { SpeedDirection::Faster } else { SpeedDirection::Slower });
            prop_assert!(table.contains(c.state().current_speed()));
            prop_assert_eq!(c.pending_timeouts(), 1);
        }
    }

    #[test]
    fn prop_at_most_one_timer(ops in proptest::collection::vec(0u8..6, 0..60)) {
        let clock = ManualClock::new();
        let mut c = SlideshowController::new(clock.clone(), ControllerOptions::default());
        c.open((0..5).map(|i| i.to_string()).collect(), 0);
        for op in ops {
            match op {
                0 => c.toggle(),
                1 => c.next(),
                2 => c.previous(),
                3 => c.change_speed_by(1),
                4 => c.change_speed_by(-1),
                _ => {
                    clock.advance_millis(700);
                    c.pump();
                }
            }
            prop_assert!(c.pending_timeouts() <= 1);
            prop_assert!(c.pending_frames() <= 1);
            prop_assert_eq!(c.pending_timeouts() == 1, c.state().is_playing());
        }
    }
}
