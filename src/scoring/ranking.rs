/// Place shared by a tie group of `size` entries starting at 1-based `position`.
///
/// `(position * size + size - 1) / size`, so a single entry keeps its position
/// and two entries tied at position 2 share 2.5.
pub fn tie_place(position: usize, size: usize) -> f64 {
    let size = size.max(1);
    (position * size + size - 1) as f64 / size as f64
}

/// Assign tie-averaged places to `(index, key)` candidates, lowest key first.
///
/// Returns `(index, place)` pairs in ranked order. The sort is stable, so equal
/// keys keep their input order.
pub fn award_places<K>(candidates: &[(usize, K)]) -> Vec<(usize, f64)>
where
    K: Ord + Copy,
{
    let mut sorted = candidates.to_vec();
    sorted.sort_by_key(|&(_, key)| key);

    let mut places = Vec::with_capacity(sorted.len());
    let mut position = 1;
    for group in sorted.chunk_by(|a, b| a.1 == b.1) {
        let place = tie_place(position, group.len());
        places.extend(group.iter().map(|&(index, _)| (index, place)));
        position += group.len();
    }
    places
}

#[cfg(test)]
mod tests {
    use super::*;
    use proptest::prelude::*;

    fn places_by_index(keys: &[u64]) -> Vec<f64> {
        let candidates: Vec<(usize, u64)> = keys.iter().copied().enumerate().collect();
        let mut places = vec![0.0; keys.len()];
        for (index, place) in award_places(&candidates) {
            places[index] = place;
        }
        places
    }

    #[test]
    fn test_tie_place_single() {
        assert_eq!(tie_place(1, 1), 1.0);
        assert_eq!(tie_place(7, 1), 7.0);
    }

    #[test]
    fn test_tie_place_pair() {
        assert_eq!(tie_place(1, 2), 1.5);
        assert_eq!(tie_place(2, 2), 2.5);
    }

    #[test]
    fn test_distinct_keys() {
        assert_eq!(places_by_index(&[300, 100, 200]), vec![3.0, 1.0, 2.0]);
    }

    #[test]
    fn test_leading_tie_then_resume() {
        assert_eq!(places_by_index(&[100, 100, 150]), vec![1.5, 1.5, 3.0]);
    }

    #[test]
    fn test_middle_tie() {
        assert_eq!(places_by_index(&[90, 100, 100, 150]), vec![1.0, 2.5, 2.5, 4.0]);
    }

    #[test]
    fn test_all_tied() {
        let places = places_by_index(&[100, 100, 100]);
        let expected = tie_place(1, 3);
        assert!(places.iter().all(|p| *p == expected));
    }

    #[test]
    fn test_empty() {
        let candidates: Vec<(usize, u64)> = vec![];
        assert!(award_places(&candidates).is_empty());
    }

    #[test]
    fn test_ranked_order_is_stable_for_ties() {
        let candidates = vec![(4, 100u64), (1, 100), (2, 50)];
        let ranked: Vec<usize> = award_places(&candidates).into_iter().map(|(i, _)| i).collect();
        assert_eq!(ranked, vec![2, 4, 1]);
    }

    proptest! {
        #[test]
        fn test_places_follow_keys(keys in proptest::collection::vec(1u64..50, 0..40)) {
            let places = places_by_index(&keys);
            for i in 0..keys.len() {
                for j in 0..keys.len() {
                    if keys[i] < keys[j] {
                        prop_assert!(places[i] < places[j]);
                    }
                    if keys[i] == keys[j] {
                        prop_assert_eq!(places[i], places[j]);
                    }
                }
            }
        }

        #[test]
        fn test_places_within_bounds(keys in proptest::collection::vec(1u64..50, 1..40)) {
            let places = places_by_index(&keys);
            for place in places {
                prop_assert!(place >= 1.0);
                prop_assert!(place <= keys.len() as f64);
            }
        }
    }
}
