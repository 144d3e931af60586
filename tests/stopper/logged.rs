use std::sync::{Arc, Mutex};

use tune_stoppers::stopper::{LoggedStopper, NoImprovementStopper, Stopper, ThresholdStopper};

use super::decisions;

#[test]
fn decisions_pass_through() {
    let inner: NoImprovementStopper = NoImprovementStopper::builder("loss")
        .patience(1)
        .grace_period(0)
        .build()
        .unwrap();
    let stopper = LoggedStopper::new("plateau", inner);
    assert_eq!(decisions(&stopper, &[2.0, 1.0]), [false, true]);
    assert_eq!(stopper.label(), "plateau");
    assert_eq!(stopper.inner().state(&0).unwrap().epoch, 2);
}

#[test]
fn errors_pass_through() {
    let inner: ThresholdStopper = ThresholdStopper::new("loss").threshold(1, 0.0);
    let stopper = LoggedStopper::new("cutoff", inner);
    assert!(stopper.should_stop(&0, &[("acc", 1.0)]).is_err());
    assert!(!stopper.stop_all());
}

/// Collects everything the subscriber writes.
#[derive(Clone, Default)]
struct Captured(Arc<Mutex<Vec<u8>>>);

impl std::io::Write for Captured {
    fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}

#[test]
fn emits_event_when_trial_stops() {
    let captured = Captured::default();
    let writer = captured.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_ansi(false)
        .with_max_level(tracing::Level::DEBUG)
        .with_writer(move || writer.clone())
        .finish();

    let inner: ThresholdStopper = ThresholdStopper::new("loss").threshold(2, 1.0);
    let stopper = LoggedStopper::new("cutoff", inner);
    tracing::subscriber::with_default(subscriber, || {
        assert!(!stopper.should_stop(&7, &[("loss", 0.0)]).unwrap());
        assert!(stopper.should_stop(&7, &[("loss", 0.0)]).unwrap());
    });

    let output = String::from_utf8(captured.0.lock().unwrap().clone()).unwrap();
    if cfg!(feature = "tracing") {
        assert!(output.contains("trial stopped"), "{output}");
        assert!(output.contains("cutoff"), "{output}");
        assert_eq!(output.matches("trial stopped").count(), 1);
    } else {
        assert!(output.is_empty());
    }
}
