//! Outward navigation used by the review screens.

/// Route of the practice home screen the back button returns to.
pub const PRACTICE_ROUTE: &str = "/practice";

/// Fire-and-forget navigation; the review logic never consumes a result.
pub trait NavigationService {
    fn go_back(&self, target: &str);
}

/// No-op navigator for tests and headless runs.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoopNavigator;

impl NavigationService for NoopNavigator {
    fn go_back(&self, _target: &str) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;

    struct RecordingNavigator {
        targets: RefCell<Vec<String>>,
    }

    impl NavigationService for RecordingNavigator {
        fn go_back(&self, target: &str) {
            self.targets.borrow_mut().push(target.to_string());
        }
    }

    #[test]
    fn go_back_passes_the_target_through() {
        let nav = RecordingNavigator {
            targets: RefCell::new(Vec::new()),
        };
        nav.go_back(PRACTICE_ROUTE);
        assert_eq!(nav.targets.borrow().as_slice(), [PRACTICE_ROUTE]);
    }
}
