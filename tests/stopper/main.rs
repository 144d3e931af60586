mod and;
mod logged;

use tune_stoppers::stopper::Stopper;

/// Feed `metrics` as `loss` reports for trial 0, one per epoch.
///
/// Asserts that the stopper never stops before the last report, never asks
/// to stop the whole experiment, and returns the decision for the last
/// report.
fn run_to_end(stopper: &dyn Stopper, metrics: &[f64]) -> bool {
    let (last, head) = metrics.split_last().expect("at least one report");
    for (i, &loss) in head.iter().enumerate() {
        let stop = stopper.should_stop(&0, &[("loss", loss)]).unwrap();
        assert!(!stop, "stopped early at epoch {}", i + 1);
        assert!(!stopper.stop_all());
    }
    let stop = stopper.should_stop(&0, &[("loss", *last)]).unwrap();
    assert!(!stopper.stop_all());
    stop
}

/// Collect the decision for every report of `metrics` for trial 0.
fn decisions(stopper: &dyn Stopper, metrics: &[f64]) -> Vec<bool> {
    metrics
        .iter()
        .map(|&loss| stopper.should_stop(&0, &[("loss", loss)]).unwrap())
        .collect()
}
