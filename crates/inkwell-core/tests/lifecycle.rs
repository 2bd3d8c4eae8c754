use std::collections::HashSet;
use std::thread::sleep;
use std::time::Duration;

use chrono::{TimeZone, Utc};
use inkwell_core::query::{build_archive_index, build_tag_index, filter_by_tags, search};
use inkwell_core::storage::{FileBlobStore, MemoryBlobStore, SqliteBlobStore};
use inkwell_core::store::STORAGE_KEY;
use inkwell_core::text::word_count;
use inkwell_core::{
    EditorSession, Entry, EntryId, EntryStatus, EntryStore, Journal, PublicRoute,
};
use tempfile::TempDir;

fn empty_store() -> EntryStore {
    EntryStore::load(Box::new(MemoryBlobStore::new().with_blob(STORAGE_KEY, "[]")))
}

fn tagged(id: &str, tags: &[&str]) -> Entry {
    let mut entry = Entry::new_draft();
    entry.id = EntryId::from(id);
    entry.title = id.to_string();
    entry.tags = tags.iter().map(|t| t.to_string()).collect();
    entry
}

fn commit_new(store: &mut EntryStore, title: &str, publish: bool) -> Entry {
    let mut session = EditorSession::begin(None);
    session.set_title(title);
    if publish {
        session.commit_publish(store).unwrap()
    } else {
        session.commit_save(store).unwrap()
    }
}

#[test]
fn ids_stay_unique_across_mixed_operations() {
    let mut store = EntryStore::load(Box::new(MemoryBlobStore::new()));

    let a = commit_new(&mut store, "A", false);
    let b = commit_new(&mut store, "B", true);
    let mut session = EditorSession::begin(Some(&a));
    session.set_content("<p>more</p>");
    session.commit_publish(&mut store).unwrap();
    store.delete(&b.id).unwrap();
    commit_new(&mut store, "C", false);

    let ids: HashSet<&EntryId> = store.list().iter().map(|e| &e.id).collect();
    assert_eq!(ids.len(), store.len());
    assert_eq!(store.len(), 5);
}

#[test]
fn public_flag_always_follows_status() {
    let mut store = empty_store();
    let draft = commit_new(&mut store, "draft", false);
    let published = commit_new(&mut store, "published", true);

    let mut forced = draft.clone();
    forced.is_public = true;
    store.upsert(forced).unwrap();

    for entry in store.list() {
        assert_eq!(entry.is_public, entry.status == EntryStatus::Published);
    }
    assert!(store.get(&published.id).unwrap().is_public);
    assert!(!store.get(&draft.id).unwrap().is_public);
}

#[test]
fn published_date_is_set_once_and_never_moves() {
    let mut store = empty_store();
    let mut session = EditorSession::begin(None);
    session.set_title("Stable date");

    let first = session.commit_publish(&mut store).unwrap();
    let published_at = first.published_date;
    assert!(published_at.is_some());

    for _ in 0..3 {
        sleep(Duration::from_millis(10));
        session.set_content("<p>edited again</p>");
        let entry = session.commit_publish(&mut store).unwrap();
        assert_eq!(entry.published_date, published_at);
        assert!(entry.updated_at >= entry.published_date.unwrap());
    }
}

#[test]
fn word_count_ignores_markup_and_blank_content() {
    assert_eq!(word_count("<p>Hello <b>world</b></p>"), 2);
    assert_eq!(word_count(""), 0);
    assert_eq!(word_count("   "), 0);

    let mut store = empty_store();
    let mut session = EditorSession::begin(None);
    session.set_title("Counted");
    session.set_content("<h1>One</h1><p>two three</p>");
    assert_eq!(session.commit_save(&mut store).unwrap().word_count, 3);
}

#[test]
fn search_returns_ordered_subset() {
    let store = EntryStore::load(Box::new(MemoryBlobStore::new()));
    let all: Vec<&Entry> = store.list().iter().collect();

    assert_eq!(search(store.list(), ""), all);

    let hits = search(store.list(), "the");
    let positions: Vec<usize> = hits
        .iter()
        .map(|hit| all.iter().position(|e| e.id == hit.id).unwrap())
        .collect();
    let mut sorted = positions.clone();
    sorted.sort_unstable();
    assert_eq!(positions, sorted);
    assert!(hits.len() <= all.len());
}

#[test]
fn tag_filter_is_or_and_skips_untagged() {
    let entries = vec![
        tagged("1", &["work"]),
        tagged("2", &["cooking"]),
        tagged("3", &["work", "writing"]),
        tagged("4", &[]),
    ];

    let hits = filter_by_tags(&entries, &["cooking", "writing"]);
    let ids: Vec<&str> = hits.iter().map(|e| e.id.as_str()).collect();
    assert_eq!(ids, vec!["2", "3"]);

    let none: [&str; 0] = [];
    assert_eq!(filter_by_tags(&entries, &none).len(), 4);
}

#[test]
fn delete_twice_is_same_as_once() {
    let mut store = empty_store();
    let keep = commit_new(&mut store, "keep", false);
    let gone = commit_new(&mut store, "gone", false);

    store.delete(&gone.id).unwrap();
    let after_once = store.list().to_vec();
    store.delete(&gone.id).unwrap();

    assert_eq!(store.list(), after_once.as_slice());
    assert!(store.contains(&keep.id));
}

#[test]
fn collection_round_trips_through_disk_backends() {
    let temp_dir = TempDir::new().unwrap();
    let db_path = temp_dir.path().join("inkwell.db");

    let written: Vec<Entry> = {
        let mut store = EntryStore::load(Box::new(FileBlobStore::new(temp_dir.path())));
        let mut session = EditorSession::begin(None);
        session.set_title("Round trip");
        session.set_content("<p>Ünïcode survives</p>");
        session.add_tag("travel");
        session.commit_publish(&mut store).unwrap();
        store.list().to_vec()
    };
    let reread = EntryStore::load(Box::new(FileBlobStore::new(temp_dir.path())));
    assert_eq!(reread.list(), written.as_slice());

    let written: Vec<Entry> = {
        let mut store = EntryStore::load(Box::new(SqliteBlobStore::open(&db_path).unwrap()));
        commit_new(&mut store, "In the database", false);
        store.list().to_vec()
    };
    let reread = EntryStore::load(Box::new(SqliteBlobStore::open(&db_path).unwrap()));
    assert_eq!(reread.list(), written.as_slice());
}

#[test]
fn saving_a_new_empty_entry_creates_a_private_draft() {
    let mut store = empty_store();
    let mut session = EditorSession::begin(None);
    session.set_title("Draft A");

    let entry = session.commit_save(&mut store).unwrap();

    assert_eq!(entry.status, EntryStatus::Draft);
    assert_eq!(entry.word_count, 0);
    assert!(!entry.is_public);
}

#[test]
fn saving_after_publish_keeps_publication_date() {
    let mut store = empty_store();
    let mut session = EditorSession::begin(None);
    session.set_title("Published first");

    let published = session.commit_publish(&mut store).unwrap();
    assert_eq!(published.published_date, Some(published.updated_at));

    sleep(Duration::from_millis(10));
    let saved = session.commit_save(&mut store).unwrap();

    assert_eq!(saved.published_date, published.published_date);
    assert!(saved.updated_at > published.updated_at);
    assert_eq!(saved.status, EntryStatus::Draft);
}

#[test]
fn tag_index_counts_entries_per_tag() {
    let entries = vec![
        tagged("1", &["work"]),
        tagged("2", &["cooking"]),
        tagged("3", &["work", "writing"]),
    ];

    let index = build_tag_index(&entries);

    assert_eq!(index.len(), 3);
    assert_eq!(index.get("work"), Some(2));
    assert_eq!(index.get("cooking"), Some(1));
    assert_eq!(index.get("writing"), Some(1));
}

#[test]
fn archive_index_groups_by_month() {
    let entries: Vec<Entry> = [3, 4, 5]
        .iter()
        .map(|day| {
            let mut entry = tagged(&format!("jan-{}", day), &[]);
            let at = Utc.with_ymd_and_hms(2025, 1, *day, 12, 0, 0).unwrap();
            entry.status = EntryStatus::Published;
            entry.created_at = at;
            entry.updated_at = at;
            entry.published_date = Some(at);
            entry
        })
        .collect();

    let archive = build_archive_index(&entries);
    let map = archive.to_map();

    assert_eq!(map.len(), 1);
    assert_eq!(map[&2025].len(), 1);
    assert_eq!(map[&2025]["January"], 3);
}

#[tokio::test]
async fn journal_drives_the_full_lifecycle() {
    let temp_dir = TempDir::new().unwrap();
    let journal = Journal::new(EntryStore::load(Box::new(FileBlobStore::new(
        temp_dir.path(),
    ))));
    assert_eq!(journal.stats().await.total, 3);

    journal.begin_edit(None).await.unwrap();
    journal
        .with_session(|s| {
            s.set_title("From the journal");
            s.add_tag("work");
        })
        .await
        .unwrap();
    let draft = journal.save_draft().await.unwrap();

    let home = journal.public_view(&PublicRoute::Home).await;
    assert!(home.entries.iter().all(|e| e.id != draft.id));

    let published = journal.publish().await.unwrap();
    let tag_page = journal
        .public_view(&PublicRoute::Tag("WORK".to_string()))
        .await;
    assert!(tag_page.entries.iter().any(|e| e.id == published.id));
    assert_eq!(tag_page.tags.get("work"), Some(2));

    journal.delete_entry(&published.id).await.unwrap();
    let reopened = EntryStore::load(Box::new(FileBlobStore::new(temp_dir.path())));
    assert_eq!(reopened.len(), 3);
    assert!(!reopened.contains(&published.id));
}
