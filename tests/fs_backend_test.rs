use cardz::error::CardzError;
use cardz::model::{Deck, Record};
use cardz::store::fs_backend::{FsBackend, DECKS_FILENAME};
use cardz::store::{CollectionStore, StorageBackend};
use std::fs;

fn sample() -> Vec<Deck> {
    vec![
        Deck::new("Hayvanlar").with_records([
            Record::new("kedi", "cat"),
            Record::new("köpek", "dog"),
        ]),
        Deck::new("Empty"),
    ]
}

#[test]
fn missing_file_loads_as_nothing() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(dir.path().join("not-yet"));
    assert!(backend.load_decks().unwrap().is_none());
}

#[test]
fn save_and_load_round_trip() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(dir.path().join("nested"));
    let decks = sample();

    backend.save_decks(&decks).unwrap();
    let loaded = backend.load_decks().unwrap().unwrap();

    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, decks[0].id);
    assert_eq!(loaded[0].name, "Hayvanlar");
    assert_eq!(loaded[0].records(), decks[0].records());
    assert_eq!(loaded[0].cards[1].id, decks[0].cards[1].id);
    assert!(loaded[1].cards.is_empty());
}

#[test]
fn save_leaves_no_temp_files() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());

    backend.save_decks(&sample()).unwrap();
    backend.save_decks(&sample()[..1]).unwrap();

    let names: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .collect();
    assert_eq!(names, vec![DECKS_FILENAME.to_string()]);
    assert_eq!(backend.load_decks().unwrap().unwrap().len(), 1);
}

#[cfg(unix)]
#[test]
fn failed_save_keeps_the_previous_file() {
    use std::os::unix::fs::PermissionsExt;

    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    let original = sample();
    backend.save_decks(&original).unwrap();

    fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o555)).unwrap();
    // Permission bits don't bind a privileged user.
    let writable = fs::write(dir.path().join("check"), "").is_ok();
    let result = backend.save_decks(&[Deck::new("Replacement")]);
    fs::set_permissions(dir.path(), fs::Permissions::from_mode(0o755)).unwrap();
    if writable {
        return;
    }

    assert!(result.is_err());
    let loaded = backend.load_decks().unwrap().unwrap();
    assert_eq!(loaded.len(), 2);
    assert_eq!(loaded[0].id, original[0].id);
    assert_eq!(loaded[0].records(), original[0].records());

    let leftovers: Vec<String> = fs::read_dir(dir.path())
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name.ends_with(".tmp"))
        .collect();
    assert!(leftovers.is_empty(), "{:?}", leftovers);
}

#[test]
fn corrupt_file_is_an_error() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(DECKS_FILENAME), "{ not json").unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());

    let err = backend.load_decks().unwrap_err();
    assert!(matches!(err, CardzError::Serialization(_)));
}

#[test]
fn store_seeds_and_replaces_a_corrupt_file() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join(DECKS_FILENAME);
    fs::write(&path, "[{\"broken\": true}]").unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());

    let store = CollectionStore::load(&backend);
    assert_eq!(store.decks().len(), 1);
    assert_eq!(store.decks()[0].cards.len(), 3);

    let on_disk = backend.load_decks().unwrap().unwrap();
    assert_eq!(on_disk[0].name, store.decks()[0].name);
}

#[test]
fn store_loads_what_was_saved() {
    let dir = tempfile::tempdir().unwrap();
    let backend = FsBackend::new(dir.path().to_path_buf());
    backend.save_decks(&sample()).unwrap();

    let store = CollectionStore::load(&backend);
    let names: Vec<String> = store.decks().into_iter().map(|d| d.name).collect();
    assert_eq!(names, vec!["Hayvanlar", "Empty"]);
}
