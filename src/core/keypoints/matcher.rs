//! Brute-force descriptor matching with cross-check.
//!
//! Every candidate descriptor is paired with its nearest reference
//! descriptor under Hamming distance, and the pair is kept only when the
//! reference descriptor also picks that candidate as its own nearest
//! neighbour. The mutual check means a reference keypoint can never be
//! claimed by two candidates, and it prunes most false matches without
//! needing a distance threshold.

use super::descriptor::BinaryDescriptor;

/// One kept keypoint pairing. Indices point into the reference and
/// candidate keypoint sets; lower distance is a better match.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DescriptorMatch {
    pub reference_idx: usize,
    pub candidate_idx: usize,
    pub distance: u32,
}

/// Match two descriptor sets, returning mutual nearest-neighbour pairs
/// sorted ascending by distance (best first).
///
/// Either set being empty yields no matches. Nearest-neighbour ties are
/// resolved toward the lower index, keeping the matcher deterministic.
pub fn match_descriptors(
    reference: &[BinaryDescriptor],
    candidate: &[BinaryDescriptor],
) -> Vec<DescriptorMatch> {
    if reference.is_empty() || candidate.is_empty() {
        return Vec::new();
    }

    let nearest_in_reference: Vec<(usize, u32)> = candidate
        .iter()
        .map(|desc| nearest(desc, reference))
        .collect();
    let nearest_in_candidate: Vec<(usize, u32)> = reference
        .iter()
        .map(|desc| nearest(desc, candidate))
        .collect();

    let mut matches: Vec<DescriptorMatch> = nearest_in_reference
        .iter()
        .enumerate()
        .filter_map(|(cand_idx, &(ref_idx, distance))| {
            // Cross-check: keep only mutual nearest neighbours.
            (nearest_in_candidate[ref_idx].0 == cand_idx).then_some(DescriptorMatch {
                reference_idx: ref_idx,
                candidate_idx: cand_idx,
                distance,
            })
        })
        .collect();

    matches.sort_by_key(|m| (m.distance, m.reference_idx));
    matches
}

fn nearest(needle: &BinaryDescriptor, haystack: &[BinaryDescriptor]) -> (usize, u32) {
    let mut best_idx = 0;
    let mut best_distance = u32::MAX;
    for (idx, other) in haystack.iter().enumerate() {
        let d = needle.distance(other);
        if d < best_distance {
            best_distance = d;
            best_idx = idx;
        }
    }
    (best_idx, best_distance)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::keypoints::descriptor::DESCRIPTOR_BYTES;

    fn descriptor(fill: u8) -> BinaryDescriptor {
        BinaryDescriptor([fill; DESCRIPTOR_BYTES])
    }

    fn descriptor_with(first: u8, fill: u8) -> BinaryDescriptor {
        let mut bytes = [fill; DESCRIPTOR_BYTES];
        bytes[0] = first;
        BinaryDescriptor(bytes)
    }

    #[test]
    fn empty_sets_yield_no_matches() {
        let some = vec![descriptor(0xAA)];
        assert!(match_descriptors(&[], &some).is_empty());
        assert!(match_descriptors(&some, &[]).is_empty());
        assert!(match_descriptors(&[], &[]).is_empty());
    }

    #[test]
    fn identical_sets_match_completely() {
        let set = vec![descriptor(0x00), descriptor(0x0F), descriptor(0xFF)];
        let matches = match_descriptors(&set, &set);

        assert_eq!(matches.len(), 3);
        for m in &matches {
            assert_eq!(m.reference_idx, m.candidate_idx);
            assert_eq!(m.distance, 0);
        }
    }

    #[test]
    fn cross_check_rejects_one_sided_pairs() {
        // Both candidates are nearest to reference 0, but reference 0
        // can only answer one of them.
        let reference = vec![descriptor(0x00), descriptor(0xFF)];
        let candidate = vec![descriptor_with(0x01, 0x00), descriptor_with(0x03, 0x00)];

        let matches = match_descriptors(&reference, &candidate);

        assert_eq!(matches.len(), 1);
        assert_eq!(matches[0].reference_idx, 0);
        assert_eq!(matches[0].candidate_idx, 0);
    }

    #[test]
    fn match_count_is_bounded_by_smaller_set() {
        let reference = vec![descriptor(0x00), descriptor(0x55), descriptor(0xAA), descriptor(0xFF)];
        let candidate = vec![descriptor(0x00), descriptor(0xFF)];

        let matches = match_descriptors(&reference, &candidate);
        assert!(matches.len() <= candidate.len());
    }

    #[test]
    fn matches_are_sorted_best_first() {
        let reference = vec![descriptor(0x00), descriptor(0xF0)];
        let candidate = vec![descriptor_with(0x07, 0x00), descriptor(0xF0)];

        let matches = match_descriptors(&reference, &candidate);

        assert_eq!(matches.len(), 2);
        assert!(matches[0].distance <= matches[1].distance);
        assert_eq!(matches[0].distance, 0);
    }

    #[test]
    fn each_side_is_claimed_at_most_once() {
        let reference = vec![descriptor(0x00), descriptor(0x01), descriptor(0xFF)];
        let candidate = vec![descriptor(0x00), descriptor(0x01), descriptor(0xFF)];

        let matches = match_descriptors(&reference, &candidate);

        let mut ref_seen = std::collections::HashSet::new();
        let mut cand_seen = std::collections::HashSet::new();
        for m in &matches {
            assert!(ref_seen.insert(m.reference_idx));
            assert!(cand_seen.insert(m.candidate_idx));
        }
    }
}
