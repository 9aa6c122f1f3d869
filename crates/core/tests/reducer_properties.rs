use lipcurve_core::classifier::{classify_frame, dominant_viseme};
use lipcurve_core::reducer::{KeyframeReducer, ReducerConfig};
use lipcurve_model::status::ClassifiedFrame;
use lipcurve_model::viseme::{VisemeFrame, MOUTH_SHAPE_OPEN, VISEME_COUNT};
use proptest::prelude::*;

fn classified_sequence() -> impl Strategy<Value = Vec<ClassifiedFrame>> {
    (
        0i64..1_000,
        prop::collection::vec((0i64..80, any::<bool>(), 0usize..VISEME_COUNT), 1..80),
    )
        .prop_map(|(start, steps)| {
            let mut time = start;
            steps
                .into_iter()
                .map(|(delta, is_open, caliber)| {
                    time += delta;
                    ClassifiedFrame::new(time, is_open, caliber)
                })
                .collect()
        })
}

proptest! {
    #[test]
    fn first_key_is_closed_anchor(frames in classified_sequence(), interval in 1i64..400) {
        let curve = KeyframeReducer::new(ReducerConfig::new(interval)).reduce(&frames).unwrap();
        let first = curve.first().unwrap();
        prop_assert_eq!(first.time_ms, frames[0].time_ms);
        prop_assert_eq!(first.open, 0.0);
    }

    #[test]
    fn key_times_never_decrease(frames in classified_sequence(), interval in 1i64..400) {
        let curve = KeyframeReducer::new(ReducerConfig::new(interval)).reduce(&frames).unwrap();
        for pair in curve.keyframes.windows(2) {
            prop_assert!(pair[0].time_ms <= pair[1].time_ms);
        }
    }

    #[test]
    fn curve_ends_closed_and_values_are_binary(
        frames in classified_sequence(),
        interval in 1i64..400,
    ) {
        let curve = KeyframeReducer::new(ReducerConfig::new(interval)).reduce(&frames).unwrap();
        prop_assert_eq!(curve.last().unwrap().open, 0.0);
        prop_assert!(curve.keyframes.iter().all(|k| k.open == 0.0 || k.open == 1.0));
    }

    #[test]
    fn open_keys_come_at_most_in_pairs(frames in classified_sequence(), interval in 1i64..400) {
        let curve = KeyframeReducer::new(ReducerConfig::new(interval)).reduce(&frames).unwrap();
        let mut run = 0;
        for key in &curve.keyframes {
            run = if key.is_open() { run + 1 } else { 0 };
            prop_assert!(run <= 2, "more than two consecutive open keys");
        }
    }

    #[test]
    fn reduction_is_repeatable(frames in classified_sequence(), interval in 1i64..400) {
        let reducer = KeyframeReducer::new(ReducerConfig::new(interval));
        let a = reducer.reduce(&frames).unwrap();
        let b = reducer.reduce(&frames).unwrap();
        prop_assert_eq!(
            serde_json::to_string(&a).unwrap(),
            serde_json::to_string(&b).unwrap()
        );
    }

    #[test]
    fn tied_maximum_picks_lower_index(
        low in 0usize..VISEME_COUNT,
        gap in 1usize..VISEME_COUNT,
        peak in 0.2f32..1.0,
    ) {
        let high = (low + gap) % VISEME_COUNT;
        let (low, high) = (low.min(high), low.max(high));
        let mut visemes = [0.0f32; VISEME_COUNT];
        for (i, slot) in visemes.iter_mut().enumerate() {
            *slot = peak * 0.1 * (i % 3) as f32;
        }
        visemes[low] = peak;
        visemes[high] = peak;
        prop_assert_eq!(dominant_viseme(&visemes), low);
    }

    #[test]
    fn equal_open_and_closed_mass_is_open(
        open_idx in prop::sample::select(
            (0..VISEME_COUNT).filter(|&i| MOUTH_SHAPE_OPEN[i]).collect::<Vec<_>>()
        ),
        closed_idx in prop::sample::select(
            (0..VISEME_COUNT).filter(|&i| !MOUTH_SHAPE_OPEN[i]).collect::<Vec<_>>()
        ),
        mass in 0.0f32..1.0,
    ) {
        let mut visemes = [0.0f32; VISEME_COUNT];
        visemes[open_idx] = mass;
        visemes[closed_idx] = mass;
        let classified = classify_frame(&VisemeFrame::new(0, 0, visemes));
        prop_assert!(classified.is_open);
    }
}
