//! Input debouncing.
//!
//! Each logical action remembers when it was last accepted; a repeat
//! inside that action's interval is dropped. Navigation uses a shorter
//! interval than confirming actions.

use std::collections::HashMap;
use std::rc::Rc;
use std::time::Duration;

use pineapple_types::clock::Clock;

/// Logical inputs that are debounced independently.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum InputAction {
    Navigate,
    Confirm,
    Cancel,
    Seek,
    Fullscreen,
}

impl InputAction {
    /// Minimum time between two accepted inputs of this kind.
    pub fn interval(self) -> Duration {
        match self {
            Self::Navigate | Self::Seek => Duration::from_millis(50),
            Self::Confirm | Self::Cancel | Self::Fullscreen => Duration::from_millis(100),
        }
    }
}

pub struct Debouncer {
    clock: Rc<dyn Clock>,
    last_accepted: HashMap<InputAction, Duration>,
}

impl Debouncer {
    pub fn new(clock: Rc<dyn Clock>) -> Self {
        Self {
            clock,
            last_accepted: HashMap::new(),
        }
    }

    /// Accept `action` unless it repeats too soon. Accepting records the
    /// current time.
    pub fn accept(&mut self, action: InputAction) -> bool {
        let now = self.clock.now();
        if let Some(last) = self.last_accepted.get(&action) {
            if now.saturating_sub(*last) < action.interval() {
                log::debug!("Debounced {action:?}");
                return false;
            }
        }
        self.last_accepted.insert(action, now);
        true
    }
}
