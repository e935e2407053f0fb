//! Overlap resolution across detector outputs
//!
//! Candidates are ordered by start offset, longest first on equal starts,
//! and accepted greedily when they do not overlap anything accepted so far.
//! The sort is stable: candidates with identical spans keep detector order.

use crate::detector::Hit;

/// Reduce candidate hits to a non-overlapping set ordered by start offset
pub fn resolve(candidates: &[Hit]) -> Vec<Hit> {
    let mut ordered: Vec<&Hit> = candidates.iter().collect();
    ordered.sort_by_key(|hit| (hit.start(), std::cmp::Reverse(hit.len())));

    // Accepted spans are sorted and disjoint, so only the last end matters
    let mut accepted: Vec<Hit> = Vec::with_capacity(ordered.len());
    let mut accepted_end = 0;
    for hit in ordered {
        if hit.is_empty() || hit.start() < accepted_end {
            continue;
        }
        accepted_end = hit.end();
        accepted.push(hit.clone());
    }

    accepted
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::detector::{HitKind, HitType};
    use proptest::prelude::*;

    fn hit(kind: HitKind, start: usize, end: usize) -> Hit {
        Hit::new(kind, start, end, "x".repeat(end - start))
    }

    #[test]
    fn test_earliest_wins() {
        let hits = vec![hit(HitKind::Phone, 5, 15), hit(HitKind::Email, 0, 8)];
        let resolved = resolve(&hits);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind(), HitKind::Email);
    }

    #[test]
    fn test_longest_wins_on_same_start() {
        let hits = vec![
            hit(HitKind::Phone, 0, 15),
            hit(HitKind::CreditCard, 0, 16),
        ];
        let resolved = resolve(&hits);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind(), HitKind::CreditCard);
    }

    #[test]
    fn test_identical_spans_keep_detector_order() {
        let hits = vec![
            hit(HitKind::NationalId, 0, 11),
            hit(HitKind::Phone, 0, 11),
        ];
        assert_eq!(resolve(&hits)[0].kind(), HitKind::NationalId);
    }

    #[test]
    fn test_credential_swallows_contained_number() {
        let hits = vec![
            hit(HitKind::Phone, 12, 22),
            Hit::new(HitType::tagged(HitKind::ApiKey, "potential_secret"), 4, 44, "s".repeat(40)),
        ];
        let resolved = resolve(&hits);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].hit_type.to_string(), "api_key.potential_secret");
    }

    #[test]
    fn test_touching_spans_both_kept() {
        let hits = vec![hit(HitKind::Email, 10, 20), hit(HitKind::Phone, 0, 10)];
        let resolved = resolve(&hits);

        assert_eq!(resolved.len(), 2);
        assert_eq!(resolved[0].start(), 0);
        assert_eq!(resolved[1].start(), 10);
    }

    #[test]
    fn test_empty() {
        assert!(resolve(&[]).is_empty());
    }

    #[test]
    fn test_zero_length_candidates_dropped() {
        let hits = vec![hit(HitKind::Email, 3, 3), hit(HitKind::Phone, 5, 9)];
        let resolved = resolve(&hits);

        assert_eq!(resolved.len(), 1);
        assert_eq!(resolved[0].kind(), HitKind::Phone);
    }

    #[test]
    fn test_many_candidates_resolve_quickly() {
        // Disjoint hits plus a contained duplicate for each one
        let mut hits = Vec::with_capacity(100_000);
        for i in 0..50_000 {
            let start = i * 10;
            hits.push(hit(HitKind::Email, start, start + 8));
            hits.push(hit(HitKind::Phone, start + 2, start + 6));
        }

        let started = std::time::Instant::now();
        let resolved = resolve(&hits);
        assert!(started.elapsed() < std::time::Duration::from_secs(2));

        assert_eq!(resolved.len(), 50_000);
        assert!(resolved.iter().all(|h| h.kind() == HitKind::Email));
    }

    fn candidates() -> impl Strategy<Value = Vec<Hit>> {
        prop::collection::vec((0usize..200, 1usize..40, 0usize..4), 0..40).prop_map(|raw| {
            raw.into_iter()
                .map(|(start, len, k)| {
                    let kind = [HitKind::Email, HitKind::Phone, HitKind::ApiKey, HitKind::Iban][k];
                    hit(kind, start, start + len)
                })
                .collect()
        })
    }

    proptest! {
        #[test]
        fn prop_resolved_spans_never_overlap(hits in candidates()) {
            let resolved = resolve(&hits);
            for (i, a) in resolved.iter().enumerate() {
                for b in &resolved[i + 1..] {
                    prop_assert!(a.end() <= b.start() || b.end() <= a.start());
                }
            }
        }

        #[test]
        fn prop_resolved_sorted_by_start(hits in candidates()) {
            let resolved = resolve(&hits);
            prop_assert!(resolved.windows(2).all(|w| w[0].start() < w[1].start()));
        }

        #[test]
        fn prop_resolution_is_idempotent(hits in candidates()) {
            let once = resolve(&hits);
            prop_assert_eq!(resolve(&hits), once.clone());
            prop_assert_eq!(resolve(&once), once);
        }

        #[test]
        fn prop_every_candidate_is_covered(hits in candidates()) {
            // A dropped candidate always overlaps something that was kept
            let resolved = resolve(&hits);
            for candidate in &hits {
                prop_assert!(resolved.iter().any(|kept| kept.overlaps(candidate)));
            }
        }
    }
}
