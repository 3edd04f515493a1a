use bible_reader_lib::{
    load_range, BibleRange, CorpusCache, InitializeOptions, ReadingPlan, StoreConfig, TextStore,
    TextStoreError,
};
use std::time::Duration;

const CORPUS_JSON: &str = r#"{"books":{
    "창":{"chapters":{
        "1":{"verses":{"10":"하나님이 뭍을 땅이라 부르시고","2":"땅이 혼돈하고","1":"태초에"}},
        "3":{"verses":{"1":"뱀은 들짐승 중에 가장 간교하니라"}}
    }}
}}"#;

const PLAN_JSON: &str = r#"{
    "id": "default",
    "name": "1년 통독",
    "year": 2025,
    "months": {"1": {"1": {"ranges": [{"book": "창", "startChapter": 1, "endChapter": 3}]}}}
}"#;

/// A store loaded from a pre-populated cache; no network involved
async fn cached_store(dir: &tempfile::TempDir) -> TextStore {
    let config = StoreConfig {
        data_dir: dir.path().to_path_buf(),
        source_url: "http://127.0.0.1:9/bible.json".to_string(),
        fetch_timeout: Duration::from_secs(2),
        use_cache: true,
    };
    let corpus = serde_json::from_str(CORPUS_JSON).unwrap();
    CorpusCache::new(config.cache_db_path()).store(&corpus).unwrap();

    let store = TextStore::new(config).unwrap();
    store.initialize(InitializeOptions::new()).await.unwrap();
    store
}

#[tokio::test]
async fn test_load_range_skips_missing_chapters_and_sorts_verses() {
    let dir = tempfile::tempdir().unwrap();
    let store = cached_store(&dir).await;
    let plan: ReadingPlan = serde_json::from_str(PLAN_JSON).unwrap();

    let reading = plan.reading_for(1, 1).unwrap();
    assert_eq!(reading.label(), "창세기 1-3장");

    let chapters = load_range(&store, &reading.ranges[0]).unwrap();
    let numbers: Vec<u32> = chapters.iter().map(|c| c.chapter).collect();
    assert_eq!(numbers, vec![1, 3]);

    let verses: Vec<&str> = chapters[0].verses.iter().map(|v| v.verse.as_str()).collect();
    assert_eq!(verses, vec!["1", "2", "10"]);
    assert_eq!(chapters[0].verses[0].text, "태초에");
}

#[tokio::test]
async fn test_unknown_book_yields_no_chapters() {
    let dir = tempfile::tempdir().unwrap();
    let store = cached_store(&dir).await;

    let range = BibleRange { book: "없음".into(), start_chapter: 1, end_chapter: 2 };
    assert!(load_range(&store, &range).unwrap().is_empty());
}

#[test]
fn test_load_range_requires_initialized_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = TextStore::new(StoreConfig {
        data_dir: dir.path().to_path_buf(),
        ..StoreConfig::default()
    })
    .unwrap();

    let range = BibleRange { book: "창".into(), start_chapter: 1, end_chapter: 1 };
    assert!(matches!(load_range(&store, &range), Err(TextStoreError::NotInitialized)));
}
