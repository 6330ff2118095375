use std::sync::Arc;
use zoo_core::{Animal, FoodItem, Memento};

use crate::ZooError;

pub const MAX_SAVED_STATES: usize = 3;

/// One saved picture of the whole zoo.
#[derive(Debug)]
pub struct ZooMemento {
    pub(crate) entries: Vec<(Arc<Animal>, Memento)>,
    pub(crate) food: Option<FoodItem>,
}

impl ZooMemento {
    pub fn capture(animals: &[Arc<Animal>], food: Option<FoodItem>) -> Self {
        Self {
            entries: animals
                .iter()
                .map(|animal| (animal.clone(), animal.save_state()))
                .collect(),
            food,
        }
    }
}

/// Holds a bounded number of saved states. Restoring a state consumes it.
#[derive(Debug, Default)]
pub struct Caretaker {
    states: Vec<ZooMemento>,
}

impl Caretaker {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn len(&self) -> usize {
        self.states.len()
    }

    pub fn is_empty(&self) -> bool {
        self.states.is_empty()
    }

    pub fn push(&mut self, state: ZooMemento) -> Result<usize, ZooError> {
        if self.states.len() >= MAX_SAVED_STATES {
            return Err(ZooError::TooManySavedStates(MAX_SAVED_STATES));
        }
        self.states.push(state);
        Ok(self.states.len() - 1)
    }

    pub fn get(&self, index: usize) -> Result<&ZooMemento, ZooError> {
        self.states.get(index).ok_or(ZooError::NoSavedState(index))
    }

    pub fn take(&mut self, index: usize) -> Result<ZooMemento, ZooError> {
        if index >= self.states.len() {
            return Err(ZooError::NoSavedState(index));
        }
        Ok(self.states.remove(index))
    }

    pub fn clear(&mut self) {
        self.states.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn holds_at_most_three_states() {
        let mut caretaker = Caretaker::new();
        for expected in 0..MAX_SAVED_STATES {
            assert_eq!(caretaker.push(ZooMemento::capture(&[], None)).unwrap(), expected);
        }
        assert!(matches!(
            caretaker.push(ZooMemento::capture(&[], None)),
            Err(ZooError::TooManySavedStates(3))
        ));
    }

    #[test]
    fn taking_consumes_the_state() {
        let mut caretaker = Caretaker::new();
        caretaker.push(ZooMemento::capture(&[], None)).unwrap();
        assert!(caretaker.get(0).is_ok());
        assert!(caretaker.take(0).is_ok());
        assert!(caretaker.is_empty());
        assert!(matches!(caretaker.take(0), Err(ZooError::NoSavedState(0))));
    }
}
