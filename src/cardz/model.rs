use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// A prompt/response pair as produced by the codec or typed in by a user.
///
/// Records carry no identity: two records with the same text are equal.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct Record {
    pub prompt: String,
    pub response: String,
}

impl Record {
    pub fn new(prompt: impl Into<String>, response: impl Into<String>) -> Self {
        Self {
            prompt: prompt.into(),
            response: response.into(),
        }
    }
}

/// A record that belongs to a deck. The id is assigned when the record
/// enters the collection and never changes afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Card {
    pub id: Uuid,
    pub prompt: String,
    pub response: String,
}

impl Card {
    pub fn new(record: Record) -> Self {
        Self {
            id: Uuid::new_v4(),
            prompt: record.prompt,
            response: record.response,
        }
    }

    pub fn record(&self) -> Record {
        Record::new(self.prompt.clone(), self.response.clone())
    }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Deck {
    pub id: Uuid,
    pub name: String,
    pub created_at: DateTime<Utc>,
    #[serde(default)]
    pub cards: Vec<Card>,
}

impl Deck {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            id: Uuid::new_v4(),
            name: name.into(),
            created_at: Utc::now(),
            cards: Vec::new(),
        }
    }

    pub fn with_records<I: IntoIterator<Item = Record>>(mut self, records: I) -> Self {
        self.cards.extend(records.into_iter().map(Card::new));
        self
    }

    pub fn records(&self) -> Vec<Record> {
        self.cards.iter().map(Card::record).collect()
    }
}
