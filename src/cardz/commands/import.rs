use crate::codec;
use crate::commands::{CmdMessage, CmdResult};
use crate::encoding::EncodingDetector;
use crate::error::{CardzError, Result};
use crate::store::CollectionStore;
use std::fs;
use std::path::Path;

use super::helpers::{resolve_deck, DeckSelector};

/// Decode, parse and merge raw bytes into a deck.
///
/// Input that yields no records is "nothing to import": the deck is left
/// untouched and no error is raised.
pub fn run(
    store: &CollectionStore,
    selector: &DeckSelector,
    bytes: &[u8],
    detector: &EncodingDetector,
) -> Result<CmdResult> {
    let deck = resolve_deck(store, selector)?;
    let (encoding, text) = detector.detect(bytes)?;
    let records = codec::parse(&text);

    let mut result = CmdResult::default();
    if records.is_empty() {
        result.add_message(CmdMessage::warning("Nothing to import."));
        return Ok(result);
    }

    let added = store.merge(deck.id, records)?;
    tracing::info!(deck = %deck.name, added, encoding = %encoding, "imported cards");

    result.add_message(CmdMessage::success(format!(
        "Imported {} cards into {} (read as {})",
        added, deck.name, encoding
    )));
    Ok(result)
}

/// Import a file. The file is read completely before anything is parsed, so
/// a failed read never merges a partial result.
pub fn from_path(
    store: &CollectionStore,
    selector: &DeckSelector,
    path: &Path,
    detector: &EncodingDetector,
) -> Result<CmdResult> {
    let bytes = fs::read(path).map_err(CardzError::Io)?;
    let mut result = run(store, selector, &bytes, detector)?;
    result
        .messages
        .insert(0, CmdMessage::info(format!("Read {}", path.display())));
    Ok(result)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::commands::MessageLevel;
    use crate::encoding::EncodingCandidate;
    use crate::model::{Deck, Record};
    use crate::store::ChangeEvent;
    use std::sync::atomic::{AtomicUsize, Ordering};
    use std::sync::Arc;

    fn store_with(records: Vec<Record>) -> CollectionStore {
        CollectionStore::new(vec![Deck::new("Words").with_records(records)])
    }

    fn deck() -> DeckSelector {
        DeckSelector::Index(1)
    }

    #[test]
    fn imports_utf8_and_merges() {
        let store = store_with(vec![Record::new("ev", "house")]);
        let text = "Soru;Cevap\nkedi;cat\nköpek;dog\n";

        run(&store, &deck(), text.as_bytes(), &EncodingDetector::default()).unwrap();

        let mut prompts: Vec<String> = store.decks()[0]
            .cards
            .iter()
            .map(|c| c.prompt.clone())
            .collect();
        prompts.sort();
        assert_eq!(prompts, vec!["ev", "kedi", "köpek"]);
    }

    #[test]
    fn imports_turkish_code_page() {
        let store = store_with(Vec::new());
        // "kuş;bird" in windows-1254
        let bytes = [b'k', b'u', 0xFE, b';', b'b', b'i', b'r', b'd'];

        run(&store, &deck(), &bytes, &EncodingDetector::default()).unwrap();
        assert_eq!(store.decks()[0].records(), vec![Record::new("kuş", "bird")]);
    }

    #[test]
    fn imports_utf16_with_bom() {
        let store = store_with(Vec::new());
        let mut bytes = vec![0xFF, 0xFE];
        for unit in "Question;Answer\r\nsu;water\r\n".encode_utf16() {
            bytes.extend_from_slice(&unit.to_le_bytes());
        }

        run(&store, &deck(), &bytes, &EncodingDetector::default()).unwrap();
        assert_eq!(store.decks()[0].records(), vec![Record::new("su", "water")]);
    }

    #[test]
    fn nothing_to_import_leaves_deck_alone() {
        let store = store_with(vec![Record::new("ev", "house")]);
        let events = Arc::new(AtomicUsize::new(0));
        let counter = Arc::clone(&events);
        store.subscribe(Box::new(move |_: &ChangeEvent| {
            counter.fetch_add(1, Ordering::SeqCst);
        }));

        let result = run(
            &store,
            &deck(),
            b"Question;Answer\nlonely\n;\n",
            &EncodingDetector::default(),
        )
        .unwrap();

        assert_eq!(result.messages[0].content, "Nothing to import.");
        assert!(matches!(result.messages[0].level, MessageLevel::Warning));
        assert_eq!(store.decks()[0].cards.len(), 1);
        assert_eq!(events.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn undecodable_input_is_an_error() {
        let store = store_with(Vec::new());
        let strict = EncodingDetector::new(vec![EncodingCandidate::Utf8]);
        let err = run(&store, &deck(), &[0xFF, b';', 0xFE], &strict).unwrap_err();
        assert!(matches!(err, CardzError::UndecodableInput));
        assert!(store.decks()[0].cards.is_empty());
    }

    #[test]
    fn missing_file_merges_nothing() {
        let store = store_with(Vec::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("missing.csv");

        let err = from_path(&store, &deck(), &path, &EncodingDetector::default()).unwrap_err();
        assert!(matches!(err, CardzError::Io(_)));
        assert!(store.decks()[0].cards.is_empty());
    }

    #[test]
    fn imports_from_file() {
        let store = store_with(Vec::new());
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("words.csv");
        fs::write(&path, "\u{feff}elma;apple\r\narmut;pear\r\n").unwrap();

        let result = from_path(&store, &deck(), &path, &EncodingDetector::default()).unwrap();
        assert_eq!(result.messages.len(), 2);
        assert_eq!(store.decks()[0].cards.len(), 2);
    }
}
