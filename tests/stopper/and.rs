use std::sync::Arc;

use tune_stoppers::stopper::{
    AndStopper, NoImprovementStopper, NopStopper, Stopper, ThresholdStopper,
};
use tune_stoppers::{Error, Mode};

use super::run_to_end;

fn no_improvement(patience: u64) -> NoImprovementStopper {
    NoImprovementStopper::builder("loss")
        .patience(patience)
        .build()
        .unwrap()
}

#[test]
fn single_child_behaves_like_child() {
    let stopper: AndStopper = AndStopper::default().with(no_improvement(3));
    assert!(run_to_end(&stopper, &[4.0, 3.0, 2.0, 1.0]));
}

#[test]
fn identical_children_agree() {
    let stopper: AndStopper = AndStopper::default()
        .with(no_improvement(3))
        .with(no_improvement(3));
    assert!(run_to_end(&stopper, &[4.0, 3.0, 2.0, 1.0]));
}

#[test]
fn mixed_children_wait_for_the_slowest() {
    let stopper: AndStopper = AndStopper::default()
        .with(no_improvement(1))
        .with(no_improvement(3));
    assert!(run_to_end(&stopper, &[4.0, 3.0, 2.0, 1.0]));
}

/// An AND over no stoppers stops every trial on its first report.
#[test]
fn empty_combination_stops_immediately() {
    let stopper: AndStopper = AndStopper::new(Vec::new());
    assert!(stopper.should_stop(&0, &[("loss", 4.0)]).unwrap());
    assert!(stopper.stop_all());
}

#[test]
fn nop_guard_keeps_empty_combination_running() {
    let stopper: AndStopper = AndStopper::default().with(NopStopper);
    for loss in [4.0, 3.0, 2.0, 1.0] {
        assert!(!stopper.should_stop(&0, &[("loss", loss)]).unwrap());
    }
    assert!(!stopper.stop_all());
}

#[test]
fn nested_combinations() {
    let inner: AndStopper = AndStopper::default()
        .with(no_improvement(1))
        .with(ThresholdStopper::new("loss").threshold(1, 10.0));
    let outer: AndStopper = AndStopper::default().with(inner).with(no_improvement(3));
    assert!(run_to_end(&outer, &[4.0, 3.0, 2.0, 1.0]));
}

#[test]
fn errors_propagate() {
    let stopper: AndStopper = AndStopper::default()
        .with(ThresholdStopper::new("loss").threshold(1, 0.0))
        .with(ThresholdStopper::new("acc").threshold(1, 0.0));
    let err = stopper.should_stop(&0, &[("loss", 1.0)]).unwrap_err();
    assert!(matches!(err, Error::MissingMetric { ref metric } if metric == "acc"));
}

/// Decisions and per-child state match calling each child directly.
#[test]
fn matches_children_called_independently() {
    let mut rng = fastrand::Rng::with_seed(42);

    for _ in 0..50 {
        let patience = rng.u64(1..5);
        let grace = rng.u64(0..4);
        let threshold = rng.f64();
        let mode = if rng.bool() { Mode::Max } else { Mode::Min };

        let make_plateau = || -> NoImprovementStopper {
            NoImprovementStopper::builder("loss")
                .mode(mode)
                .patience(patience)
                .grace_period(grace)
                .rel_change_threshold(0.05)
                .build()
                .unwrap()
        };
        let make_threshold = || -> ThresholdStopper {
            ThresholdStopper::new("loss")
                .threshold(3, threshold)
                .mode(mode)
        };

        let plateau = Arc::new(make_plateau());
        let cutoff = Arc::new(make_threshold());
        let combined: AndStopper = AndStopper::default()
            .with(Arc::clone(&plateau))
            .with(Arc::clone(&cutoff));

        let solo_plateau = make_plateau();
        let solo_cutoff = make_threshold();

        for _ in 0..20 {
            let trial = rng.u64(0..3);
            let result = [("loss", rng.f64() * 2.0 - 0.5)];

            let expected = solo_plateau.should_stop(&trial, &result).unwrap()
                & solo_cutoff.should_stop(&trial, &result).unwrap();
            assert_eq!(combined.should_stop(&trial, &result).unwrap(), expected);
            assert_eq!(plateau.state(&trial), solo_plateau.state(&trial));
            assert_eq!(cutoff.epoch(&trial), solo_cutoff.epoch(&trial));
        }
    }
}

#[test]
fn boxed_children() {
    let children: Vec<Box<dyn Stopper>> = vec![Box::new(NopStopper), Box::new(no_improvement(1))];
    let stopper: AndStopper = children.into_iter().collect();
    assert_eq!(stopper.len(), 2);
    assert!(!stopper.should_stop(&0, &[("loss", 1.0)]).unwrap());
}

#[test]
fn children_stay_in_step_on_missing_metric() {
    let cutoff: Arc<ThresholdStopper> = Arc::new(ThresholdStopper::new("loss").threshold(5, 0.0));
    let plateau = Arc::new(no_improvement(3));
    let stopper: AndStopper = AndStopper::default()
        .with(Arc::clone(&cutoff))
        .with(Arc::clone(&plateau));

    let err = stopper.should_stop(&0, &[("acc", 1.0)]).unwrap_err();
    assert!(matches!(err, Error::MissingMetric { .. }));
    assert_eq!(cutoff.epoch(&0), 1);
    assert_eq!(plateau.state(&0).map(|state| state.epoch), Some(1));

    assert!(!stopper.should_stop(&0, &[("loss", 1.0)]).unwrap());
    assert_eq!(cutoff.epoch(&0), 2);
    assert_eq!(plateau.state(&0).map(|state| state.epoch), Some(2));
}
