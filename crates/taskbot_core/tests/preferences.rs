use std::sync::{Arc, Barrier};
use std::thread;
use taskbot_core::{
    CoreError, MemoryTaskStore, PreferenceService, RecordKind, SqliteTaskStore, TaskStore,
};

#[test]
fn get_or_create_defaults_to_enabled_and_is_stable() {
    let store = Arc::new(SqliteTaskStore::open_in_memory().unwrap());
    let service = PreferenceService::new(Arc::clone(&store));

    let created = service.get_or_create(42).unwrap();
    assert_eq!(created.owner, 42);
    assert!(created.reminders_enabled);

    let again = service.get_or_create(42).unwrap();
    assert_eq!(again, created);
}

#[test]
fn get_or_create_returns_existing_disabled_record_unchanged() {
    let store = Arc::new(MemoryTaskStore::new());
    let service = PreferenceService::new(Arc::clone(&store));

    service.get_or_create(9).unwrap();
    service.set_reminders(9, false).unwrap();

    assert!(!service.get_or_create(9).unwrap().reminders_enabled);
    assert_eq!(store.preference_count(), 1);
}

#[test]
fn set_reminders_without_record_is_not_found_and_creates_nothing() {
    let store = Arc::new(MemoryTaskStore::new());
    let service = PreferenceService::new(Arc::clone(&store));

    let err = service.set_reminders(7, false).unwrap_err();
    assert!(matches!(err, CoreError::NotFound(RecordKind::Preference)));
    assert_eq!(store.preference_count(), 0);
}

#[test]
fn set_reminders_toggles_and_persists() {
    let store = Arc::new(SqliteTaskStore::open_in_memory().unwrap());
    let service = PreferenceService::new(Arc::clone(&store));
    service.get_or_create(3).unwrap();

    service.set_reminders(3, false).unwrap();
    assert!(!store.get_preference_by_owner(3).unwrap().unwrap().reminders_enabled);

    service.set_reminders(3, true).unwrap();
    assert!(store.get_preference_by_owner(3).unwrap().unwrap().reminders_enabled);
}

#[test]
fn concurrent_first_access_creates_exactly_one_record() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("prefs.db");
    // Run migrations once before racing connections.
    drop(SqliteTaskStore::open(&path).unwrap());

    const WORKERS: usize = 4;
    let barrier = Arc::new(Barrier::new(WORKERS));
    let results: Vec<_> = thread::scope(|scope| {
        let handles: Vec<_> = (0..WORKERS)
            .map(|_| {
                let barrier = Arc::clone(&barrier);
                let path = path.clone();
                scope.spawn(move || {
                    let service = PreferenceService::new(SqliteTaskStore::open(&path).unwrap());
                    barrier.wait();
                    service.get_or_create(555).unwrap()
                })
            })
            .collect();
        handles
            .into_iter()
            .map(|handle| handle.join().unwrap())
            .collect()
    });

    let first = &results[0];
    assert!(first.reminders_enabled);
    assert!(results.iter().all(|preference| preference == first));

    let conn = rusqlite::Connection::open(&path).unwrap();
    let count: i64 = conn
        .query_row(
            "SELECT COUNT(*) FROM user_preferences WHERE owner = 555;",
            [],
            |row| row.get(0),
        )
        .unwrap();
    assert_eq!(count, 1);
}

#[test]
fn concurrent_first_access_on_shared_memory_store_creates_one_record() {
    let store = Arc::new(MemoryTaskStore::new());
    let barrier = Arc::new(Barrier::new(2));

    let handles: Vec<_> = (0..2)
        .map(|_| {
            let store = Arc::clone(&store);
            let barrier = Arc::clone(&barrier);
            thread::spawn(move || {
                let service = PreferenceService::new(store);
                barrier.wait();
                service.get_or_create(1).unwrap()
            })
        })
        .collect();

    let results: Vec<_> = handles
        .into_iter()
        .map(|handle| handle.join().unwrap())
        .collect();
    assert_eq!(results[0], results[1]);
    assert_eq!(store.preference_count(), 1);
}
