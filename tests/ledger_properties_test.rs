use gin_tasting::core::report::{podium, ranking_report};
use gin_tasting::{Ledger, TastingError};

const RATERS: [&str; 5] = ["Anna", "Ben", "Carla", "Dev", "Emil"];

/// 以固定公式產生不重複的分數，避免依賴亂數
fn scripted_score(sample: usize, rater: usize) -> i64 {
    ((sample * 7 + rater * 3) % 10 + 1) as i64
}

fn filled_ledger(samples: usize, raters: usize) -> Ledger {
    let mut ledger = Ledger::initialize(samples, &RATERS[..raters]).unwrap();
    for s in 0..samples {
        for (r, rater) in RATERS[..raters].iter().enumerate() {
            let id = format!("Sample {}", s + 1);
            ledger.set_score(&id, rater, scripted_score(s, r)).unwrap();
        }
    }
    ledger
}

#[test]
fn test_totals_match_sum_of_scores() {
    for raters in 1..=5 {
        let ledger = filled_ledger(20, raters);
        for s in 0..20 {
            let expected: i64 = (0..raters).map(|r| scripted_score(s, r)).sum();
            let id = format!("Sample {}", s + 1);
            assert_eq!(i64::from(ledger.total_score(&id).unwrap()), expected);
        }
    }
}

#[test]
fn test_ranking_is_stable_descending_permutation() {
    let ledger = filled_ledger(20, 3);
    let ranking = ledger.ranking();

    assert_eq!(ranking.len(), 20);

    let mut ids: Vec<&str> = ranking.iter().map(|r| r.id).collect();
    ids.sort();
    let mut expected: Vec<String> = (1..=20).map(|i| format!("Sample {}", i)).collect();
    expected.sort();
    assert_eq!(ids, expected);

    let position = |id: &str| ledger.samples().iter().position(|s| s.id == id).unwrap();
    for pair in ranking.windows(2) {
        assert!(pair[0].total >= pair[1].total);
        if pair[0].total == pair[1].total {
            assert!(position(pair[0].id) < position(pair[1].id));
        }
    }
}

#[test]
fn test_export_rows_are_idempotent() {
    let ledger = filled_ledger(7, 4);

    let first: Vec<_> = ledger.export_rows().collect();
    let second: Vec<_> = ledger.export_rows().collect();

    assert_eq!(first.len(), 28);
    assert_eq!(first, second);
}

#[test]
fn test_rename_keeps_scores_and_comments() {
    let mut ledger = filled_ledger(3, 2);
    ledger.set_comment("Sample 3", "Ben", "cucumber").unwrap();
    let totals_before: Vec<u32> = ledger.samples().iter().map(|s| s.total()).collect();

    ledger.rename_sample("Sample 3", "Hendrick's").unwrap();

    let totals_after: Vec<u32> = ledger.samples().iter().map(|s| s.total()).collect();
    assert_eq!(totals_before, totals_after);
    assert_eq!(ledger.comment("Sample 3", "Ben").unwrap(), "cucumber");
    assert!(ranking_report(&ledger).contains("Hendrick's: "));
    assert!(ledger.export_rows().any(|row| row.sample == "Hendrick's" && row.comment == "cucumber"));
    assert!(!ledger.export_rows().any(|row| row.sample == "Sample 3"));
}

#[test]
fn test_top_n_and_podium_with_two_samples() {
    let mut ledger = Ledger::initialize(2, &["A", "B"]).unwrap();
    ledger.set_score("Sample 1", "A", 8).unwrap();
    ledger.set_score("Sample 1", "B", 6).unwrap();
    ledger.set_score("Sample 2", "A", 9).unwrap();
    ledger.set_score("Sample 2", "B", 9).unwrap();

    let top = ledger.top_n(5);
    assert_eq!(top.len(), 2);
    assert_eq!(top[0].id, "Sample 2");
    assert_eq!(top[0].total, 18);

    let podium = podium(&ledger, 3);
    assert_eq!(podium.lines().count(), 3);
}

#[test]
fn test_invalid_setup_is_rejected() {
    assert!(matches!(
        Ledger::initialize(21, &["A"]),
        Err(TastingError::InvalidConfiguration { .. })
    ));
    assert!(matches!(
        Ledger::initialize(3, &["", "B"]),
        Err(TastingError::InvalidConfiguration { .. })
    ));
}
