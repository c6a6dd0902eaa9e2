// Unit tests for stem metadata merging

use super::*;

fn entries(names: &[&str]) -> StemTable {
    names
        .iter()
        .map(|name| StemEntry::new(*name, "#123456").unwrap())
        .collect()
}

fn tracks(count: usize) -> Vec<String> {
    (0..count).map(|i| format!("stem{}.wav", i)).collect()
}

#[test]
fn test_merge_length_matches_track_count() {
    let defaults = default_stems();
    for num_stems in 0..10 {
        for num_supplied in 0..10 {
            let supplied = entries(&vec!["S"; num_supplied]);
            let outcome = MetadataMerger::merge(&tracks(num_stems), Some(supplied.as_slice()), &defaults);
            assert_eq!(
                outcome.stems.len(),
                num_stems,
                "stems={} supplied={}",
                num_stems,
                num_supplied
            );
            assert!(outcome.stems.iter().all(|e| e.validate().is_ok()));
        }
    }
}

#[test]
fn test_merge_truncates_when_supplied_covers_tracks() {
    let supplied = entries(&["A", "B", "C", "D", "E"]);
    let outcome = MetadataMerger::merge_with_defaults(&tracks(3), Some(supplied.as_slice()));

    assert_eq!(outcome.stems, supplied[..3].to_vec());
    assert!(outcome.notice.is_none());
}

#[test]
fn test_merge_exact_count_has_no_notice() {
    let supplied = entries(&["A", "B"]);
    let outcome = MetadataMerger::merge_with_defaults(&tracks(2), Some(supplied.as_slice()));

    assert_eq!(outcome.stems, supplied);
    assert!(outcome.notice.is_none());
}

#[test]
fn test_merge_pads_from_defaults() {
    let supplied = entries(&["Kick"]);
    let outcome = MetadataMerger::merge_with_defaults(&tracks(3), Some(supplied.as_slice()));

    let names: Vec<&str> = outcome.stems.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Kick", "Bass", "Other"]);
    assert_eq!(outcome.stems[1].color, "#D55E00");

    let notice = outcome.notice.unwrap();
    assert_eq!(notice.supplied, 1);
    assert_eq!(notice.from_defaults, 2);
    assert_eq!(notice.synthesized, 0);
}

#[test]
fn test_merge_without_metadata_uses_defaults_then_placeholders() {
    let outcome = MetadataMerger::merge_with_defaults(&tracks(6), None);

    let names: Vec<&str> = outcome.stems.iter().map(|e| e.name.as_str()).collect();
    assert_eq!(names, vec!["Drums", "Bass", "Other", "Vox", "Stem_4", "Stem_5"]);
    assert_eq!(outcome.stems[4].color, PLACEHOLDER_COLOR);
    assert_eq!(outcome.stems[5].color, PLACEHOLDER_COLOR);
    assert_eq!(outcome.notice.unwrap().synthesized, 2);
}

#[test]
fn test_merge_placeholders_when_supplied_exceeds_defaults() {
    let supplied = entries(&["A", "B", "C", "D", "E"]);
    let outcome = MetadataMerger::merge_with_defaults(&tracks(7), Some(supplied.as_slice()));

    assert_eq!(outcome.stems.len(), 7);
    assert_eq!(outcome.stems[..5].to_vec(), supplied);
    assert_eq!(outcome.stems[5], StemEntry::placeholder(5));
    assert_eq!(outcome.stems[6], StemEntry::placeholder(6));
}

#[test]
fn test_placeholder_indices_strictly_increase() {
    let outcome = MetadataMerger::merge(&tracks(8), None, &default_stems()[..2]);

    let indices: Vec<usize> = outcome
        .stems
        .iter()
        .filter(|e| e.color == PLACEHOLDER_COLOR)
        .map(|e| e.name.strip_prefix("Stem_").unwrap().parse().unwrap())
        .collect();

    assert_eq!(indices, vec![2, 3, 4, 5, 6, 7]);
    assert!(indices.windows(2).all(|w| w[0] < w[1]));
}

#[test]
fn test_merge_zero_stems() {
    let outcome = MetadataMerger::merge_with_defaults::<String>(&[], None);
    assert!(outcome.stems.is_empty());
    assert!(outcome.notice.is_none());
}
