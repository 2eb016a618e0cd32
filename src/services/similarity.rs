use crate::models::UserHistory;
use crate::services::correlation::pearson;

/// Scores of the movies both users rated, as `(score_a, score_b)`
///
/// Pairs come out in ascending movie id order.
pub fn co_rated_pairs(a: &UserHistory, b: &UserHistory) -> Vec<(f64, f64)> {
    a.iter()
        .filter_map(|(movie_id, score_a)| {
            b.score(movie_id)
                .map(|score_b| (f64::from(score_a), f64::from(score_b)))
        })
        .collect()
}

/// Taste similarity of two users in `[-1.0, 1.0]`
///
/// Pearson correlation over the co-rated movies. Users with nothing in
/// common get a neutral `0.0`.
pub fn similarity(a: &UserHistory, b: &UserHistory) -> f64 {
    let pairs = co_rated_pairs(a, b);
    if pairs.is_empty() {
        return 0.0;
    }
    pearson(&pairs)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::RatingSample;
    use proptest::prelude::*;

    fn history(user_id: i32, scores: &[(i32, i32)]) -> UserHistory {
        UserHistory::from_samples(
            user_id,
            scores
                .iter()
                .map(|&(movie_id, score)| RatingSample::new(user_id, movie_id, score).unwrap()),
        )
        .unwrap()
    }

    #[test]
    fn test_linear_taste_is_fully_similar() {
        let u1 = history(1, &[(1, 5), (2, 3)]);
        let u2 = history(2, &[(1, 4), (2, 2)]);
        assert_eq!(similarity(&u1, &u2), 1.0);
    }

    #[test]
    fn test_flat_taste_is_neutral() {
        let u1 = history(1, &[(1, 5), (2, 3)]);
        let u3 = history(3, &[(1, 1), (2, 1)]);
        assert_eq!(similarity(&u1, &u3), 0.0);
    }

    #[test]
    fn test_no_common_movies_is_neutral() {
        let a = history(1, &[(1, 5), (2, 3)]);
        let b = history(2, &[(3, 5), (4, 1)]);
        assert!(co_rated_pairs(&a, &b).is_empty());
        assert_eq!(similarity(&a, &b), 0.0);
    }

    #[test]
    fn test_empty_history_is_neutral() {
        let a = history(1, &[(1, 5)]);
        assert_eq!(similarity(&a, &UserHistory::new(2)), 0.0);
    }

    #[test]
    fn test_opposite_taste() {
        let a = history(1, &[(1, 5), (2, 1), (3, 3)]);
        let b = history(2, &[(1, 1), (2, 5), (3, 3)]);
        assert_eq!(similarity(&a, &b), -1.0);
    }

    #[test]
    fn test_only_common_movies_are_paired() {
        let a = history(1, &[(1, 5), (2, 3), (9, 1)]);
        let b = history(2, &[(2, 2), (1, 4), (7, 5)]);
        assert_eq!(co_rated_pairs(&a, &b), vec![(5.0, 4.0), (3.0, 2.0)]);
    }

    #[test]
    fn test_self_similarity() {
        let a = history(1, &[(1, 5), (2, 3), (3, 4)]);
        assert!((similarity(&a, &a) - 1.0).abs() < 1e-12);
    }

    fn arb_history(user_id: i32) -> impl Strategy<Value = UserHistory> {
        prop::collection::btree_map(1..30i32, 1..=5i32, 0..15).prop_map(move |scores| {
            let scores: Vec<(i32, i32)> = scores.into_iter().collect();
            history(user_id, &scores)
        })
    }

    proptest! {
        #[test]
        fn similarity_is_symmetric(a in arb_history(1), b in arb_history(2)) {
            prop_assert_eq!(similarity(&a, &b).to_bits(), similarity(&b, &a).to_bits());
        }

        #[test]
        fn similarity_stays_in_range(a in arb_history(1), b in arb_history(2)) {
            let s = similarity(&a, &b);
            prop_assert!((-1.0..=1.0).contains(&s), "similarity {} out of range", s);
        }

        #[test]
        fn similarity_is_deterministic(a in arb_history(1), b in arb_history(2)) {
            prop_assert_eq!(similarity(&a, &b).to_bits(), similarity(&a.clone(), &b.clone()).to_bits());
        }
    }
}
