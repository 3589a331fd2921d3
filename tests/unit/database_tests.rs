/*!
 * Tests for the metadata sink contract
 */

use std::path::PathBuf;
use vocaclip::database::{ClipRecord, MetadataSink, Repository};

fn record(name: &str, word: Option<&str>) -> ClipRecord {
    let mut record = ClipRecord::new(&PathBuf::from(format!("/clips/{}", name)), 512, 2.0);
    if let Some(word) = word {
        record = record.with_word(word);
    }
    record
}

/// The repository satisfies the sink contract behind a trait object
#[tokio::test]
async fn test_metadataSink_create_shouldReturnAssignedId() {
    let repo = Repository::new_in_memory().unwrap();
    let sink: &dyn MetadataSink = &repo;

    let id = sink.create(&record("a.mp4", Some("cat"))).await.unwrap();
    assert!(id > 0);
    assert_eq!(repo.count_clips().await.unwrap(), 1);
}

/// The schema's positive-duration constraint rejects bad records
#[tokio::test]
async fn test_metadataSink_create_withZeroDuration_shouldFail() {
    let repo = Repository::new_in_memory().unwrap();

    let mut bad = record("a.mp4", None);
    bad.duration_secs = 0;

    assert!(repo.create_clip(&bad).await.is_err());
    assert_eq!(repo.count_clips().await.unwrap(), 0);
}

/// Fan-out rows for one clip share file metadata but differ by word
#[tokio::test]
async fn test_metadataSink_fanOutRecords_shouldShareFileMetadata() {
    let repo = Repository::new_in_memory().unwrap();

    let base = record("lesson_sentence_000_Fast_car.mp4", None)
        .with_sentence("Fast car!")
        .with_thumbnail(Some(&PathBuf::from(
            "/clips/lesson_sentence_000_Fast_car_thumb.jpg",
        )));

    for word in ["fast", "car"] {
        let row = base.clone().with_word(word);
        repo.create_clip(&row).await.unwrap();
    }

    let fast = repo.find_by_word("fast").await.unwrap();
    let car = repo.find_by_word("car").await.unwrap();
    assert_eq!(fast.len(), 1);
    assert_eq!(car.len(), 1);

    assert_eq!(fast[0].file_url, car[0].file_url);
    assert_eq!(fast[0].file_size, car[0].file_size);
    assert_eq!(fast[0].duration_secs, car[0].duration_secs);
    assert_eq!(fast[0].thumbnail, car[0].thumbnail);
    assert_eq!(fast[0].sentence, car[0].sentence);
}
