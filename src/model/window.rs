use std::collections::VecDeque;

use serde::Serialize;

/// Fixed-length rolling window of price samples, oldest first.
///
/// The length is set once from the initial series and never changes:
/// every push evicts the oldest sample.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(transparent)]
pub struct PriceWindow {
    samples: VecDeque<f64>,
}

impl PriceWindow {
    pub fn from_samples(samples: Vec<f64>) -> Self {
        assert!(!samples.is_empty(), "price window must not be empty");
        Self {
            samples: samples.into(),
        }
    }

    /// Append `price`, dropping the oldest sample.
    pub fn push(&mut self, price: f64) {
        self.samples.pop_front();
        self.samples.push_back(price);
    }

    /// Copy of the window with `price` appended.
    pub fn with_pushed(&self, price: f64) -> Self {
        let mut next = self.clone();
        next.push(price);
        next
    }

    pub fn len(&self) -> usize {
        self.samples.len()
    }

    pub fn is_empty(&self) -> bool {
        self.samples.is_empty()
    }

    pub fn latest(&self) -> Option<f64> {
        self.samples.back().copied()
    }

    pub fn oldest(&self) -> Option<f64> {
        self.samples.front().copied()
    }

    pub fn iter(&self) -> impl Iterator<Item = f64> + '_ {
        self.samples.iter().copied()
    }

    pub fn to_vec(&self) -> Vec<f64> {
        self.samples.iter().copied().collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn push_evicts_oldest() {
        let mut w = PriceWindow::from_samples(vec![1.0, 2.0, 3.0]);
        w.push(4.0);
        assert_eq!(w.to_vec(), vec![2.0, 3.0, 4.0]);
        assert_eq!(w.oldest(), Some(2.0));
        assert_eq!(w.latest(), Some(4.0));
    }

    #[test]
    fn with_pushed_leaves_original() {
        let w = PriceWindow::from_samples(vec![1.0, 2.0]);
        let next = w.with_pushed(9.0);
        assert_eq!(w.to_vec(), vec![1.0, 2.0]);
        assert_eq!(next.to_vec(), vec![2.0, 9.0]);
    }

    #[test]
    fn serializes_as_plain_array() {
        let w = PriceWindow::from_samples(vec![1.5, 2.5]);
        assert_eq!(serde_json::to_string(&w).unwrap(), "[1.5,2.5]");
    }

    #[test]
    #[should_panic(expected = "price window must not be empty")]
    fn empty_window_panics() {
        PriceWindow::from_samples(Vec::new());
    }
}
