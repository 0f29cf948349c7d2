use super::*;

#[test]
fn lazy_dataset_loads_once() {
    let mut ds = LazyDataset::default();
    let mut calls = 0;
    for _ in 0..3 {
        let v = ds
            .get_or_try_load(|| {
                calls += 1;
                Ok(vec![1, 2, 3])
            })
            .unwrap();
        assert_eq!(v.len(), 3);
    }
    assert_eq!(calls, 1);
    assert_eq!(ds.attempts(), 1);
}

#[test]
fn lazy_dataset_retries_after_failure() {
    let mut ds: LazyDataset<u32> = LazyDataset::default();
    assert!(
        ds.get_or_try_load(|| Err(HitMatrixError::data("offline")))
            .is_err()
    );
    assert!(ds.get().is_none());
    assert_eq!(*ds.get_or_try_load(|| Ok(7)).unwrap(), 7);
    assert_eq!(ds.attempts(), 2);
}

#[test]
fn in_memory_failure_injection_counts_down() {
    let mut src = InMemorySource::new(vec![], vec![], vec![]).fail_next_genre_loads(1);
    assert!(src.load_genre_rows().is_err());
    assert!(src.load_genre_rows().is_ok());
    assert_eq!(src.genre_loads(), 2);
}

#[test]
fn json_file_source_reports_missing_file_with_path() {
    let mut src = JsonFileSource::new("does/not/exist.json", "a.json", "b.json");
    let err = src.load_genre_rows().unwrap_err();
    assert!(err.to_string().contains("does/not/exist.json"));
}

#[test]
fn json_file_source_reads_rows() {
    let dir = std::path::PathBuf::from("target").join("source_unit");
    std::fs::create_dir_all(&dir).unwrap();
    let fears = dir.join("fears.json");
    std::fs::write(&fears, r#"[{"fear": "Death"}, {"fear": "Madness"}]"#).unwrap();
    let mut src = JsonFileSource::new(dir.join("missing.json"), &fears, &fears);
    let rows = src.load_fear_rows(FearTable::Base).unwrap();
    assert_eq!(rows.len(), 2);
    assert_eq!(rows[0].label.as_deref(), Some("Death"));
}
