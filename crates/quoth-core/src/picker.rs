//! Random quote selection
//!
//! Picks never retry: when the previously shown index must be avoided,
//! the draw is made over the remaining candidates and mapped back, so
//! every pick costs a single draw.

use crate::models::CategoryFilter;
use crate::store::QuoteStore;

/// Source of uniformly distributed indices
pub trait RandomSource {
    /// Return a value in `0..upper`. `upper` is always at least 1.
    fn next_below(&mut self, upper: usize) -> usize;
}

/// Random source backed by the operating system
#[derive(Debug, Default, Clone, Copy)]
pub struct OsRandom;

impl RandomSource for OsRandom {
    fn next_below(&mut self, upper: usize) -> usize {
        let mut bytes = [0u8; 8];
        if let Err(e) = getrandom::getrandom(&mut bytes) {
            tracing::warn!("OS random source unavailable: {}", e);
            return 0;
        }
        // Multiply-shift maps the 64-bit draw onto 0..upper
        let draw = u64::from_le_bytes(bytes) as u128;
        ((draw * upper as u128) >> 64) as usize
    }
}

/// Pick a random index into `store`
///
/// With `exclude` set and more than one quote, the excluded index is
/// never returned. A one-quote store always yields 0.
pub fn pick_random(
    store: &QuoteStore,
    exclude: Option<usize>,
    rng: &mut impl RandomSource,
) -> Option<usize> {
    let candidates: Vec<usize> = (0..store.len()).collect();
    pick_from(&candidates, exclude, rng)
}

/// Pick a random index among quotes passing `filter`
///
/// Returns `None` when no quote matches.
pub fn pick_random_filtered(
    store: &QuoteStore,
    filter: &CategoryFilter,
    exclude: Option<usize>,
    rng: &mut impl RandomSource,
) -> Option<usize> {
    let candidates = store.filtered_indices(filter);
    pick_from(&candidates, exclude, rng)
}

fn pick_from(
    candidates: &[usize],
    exclude: Option<usize>,
    rng: &mut impl RandomSource,
) -> Option<usize> {
    match candidates.len() {
        0 => None,
        1 => Some(candidates[0]),
        n => {
            let excluded_pos = exclude.and_then(|e| candidates.iter().position(|&c| c == e));
            match excluded_pos {
                None => Some(candidates[rng.next_below(n)]),
                Some(skip) => {
                    let draw = rng.next_below(n - 1);
                    let pos = if draw >= skip { draw + 1 } else { draw };
                    Some(candidates[pos])
                }
            }
        }
    }
}

#[cfg(test)]
pub(crate) mod tests {
    use super::*;
    use crate::models::Quote;

    /// Replays a fixed sequence of draws, clamped into range
    pub(crate) struct SequenceRandom {
        values: Vec<usize>,
        next: usize,
    }

    impl SequenceRandom {
        pub(crate) fn new(values: Vec<usize>) -> Self {
            Self { values, next: 0 }
        }
    }

    impl RandomSource for SequenceRandom {
        fn next_below(&mut self, upper: usize) -> usize {
            let value = self.values[self.next % self.values.len()];
            self.next += 1;
            value % upper
        }
    }

    fn store_of(n: usize) -> QuoteStore {
        QuoteStore::from_quotes(
            (0..n)
                .map(|i| Quote::new(format!("quote {}", i), "Test").unwrap())
                .collect(),
        )
    }

    #[test]
    fn test_empty_store_has_nothing_to_show() {
        let mut rng = SequenceRandom::new(vec![0]);
        assert_eq!(pick_random(&QuoteStore::new(), None, &mut rng), None);
        assert_eq!(pick_random(&QuoteStore::new(), Some(0), &mut rng), None);
    }

    #[test]
    fn test_single_quote_ignores_exclusion() {
        let mut rng = SequenceRandom::new(vec![5]);
        assert_eq!(pick_random(&store_of(1), Some(0), &mut rng), Some(0));
    }

    #[test]
    fn test_never_repeats_excluded_index() {
        let store = store_of(4);
        let mut rng = SequenceRandom::new((0..32).collect());

        let mut last = pick_random(&store, None, &mut rng).unwrap();
        for _ in 0..200 {
            let next = pick_random(&store, Some(last), &mut rng).unwrap();
            assert_ne!(next, last);
            assert!(next < store.len());
            last = next;
        }
    }

    #[test]
    fn test_every_other_index_reachable() {
        let store = store_of(4);
        let mut picked: Vec<usize> = (0..3)
            .map(|draw| {
                let mut rng = SequenceRandom::new(vec![draw]);
                pick_random(&store, Some(1), &mut rng).unwrap()
            })
            .collect();
        picked.sort();
        assert_eq!(picked, vec![0, 2, 3]);
    }

    #[test]
    fn test_out_of_range_exclusion_is_ignored() {
        let store = store_of(3);
        let mut rng = SequenceRandom::new(vec![2]);
        assert_eq!(pick_random(&store, Some(99), &mut rng), Some(2));
    }

    #[test]
    fn test_filtered_pick() {
        let mut store = store_of(2);
        store.add("Carpe diem", "Latin").unwrap();
        store.add("Alea iacta est", "Latin").unwrap();

        let latin = CategoryFilter::parse("Latin");
        let mut rng = SequenceRandom::new(vec![0, 1, 0, 1]);
        for _ in 0..4 {
            let index = pick_random_filtered(&store, &latin, None, &mut rng).unwrap();
            assert_eq!(store.get(index).unwrap().category, "Latin");
        }

        let mut rng = SequenceRandom::new(vec![0]);
        assert_eq!(
            pick_random_filtered(&store, &latin, Some(2), &mut rng),
            Some(3)
        );
    }

    #[test]
    fn test_filtered_pick_without_matches() {
        let store = store_of(3);
        let mut rng = SequenceRandom::new(vec![0]);
        let filter = CategoryFilter::parse("Missing");
        assert_eq!(pick_random_filtered(&store, &filter, None, &mut rng), None);
    }

    #[test]
    fn test_os_random_stays_in_range() {
        let mut rng = OsRandom;
        for upper in 1..50 {
            assert!(rng.next_below(upper) < upper);
        }
    }
}
