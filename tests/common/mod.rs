#![cfg(feature = "rusqlite")]

use chrono::{NaiveDate, NaiveDateTime};
use rowmap::prelude::*;
use rowmap::sqlite::connect;

/// Blog, Entry and EntryTag registered on a fresh in-memory database.
pub struct TestDb {
    pub db: Database,
    pub blog: Model,
    pub entry: Model,
    pub entry_tag: Model,
}

pub fn setup_db() -> TestDb {
    let mut registry = Registry::new();
    let blog = registry
        .define(ModelDef::new("Blog").field("title", FieldType::char()))
        .expect("Failed to define Blog");
    let entry = registry
        .define(
            ModelDef::new("Entry")
                .field("title", FieldType::char_with_length(50))
                .field("content", FieldType::text())
                .field("pub_date", FieldType::datetime())
                .field("blog", FieldType::foreign_key(&blog)),
        )
        .expect("Failed to define Entry");
    let entry_tag = registry
        .define(
            ModelDef::new("EntryTag")
                .field("tag", FieldType::char_with_length(50))
                .field("entry", FieldType::foreign_key(&entry)),
        )
        .expect("Failed to define EntryTag");

    let db = connect(&Config::in_memory(), registry).expect("Failed to open in-memory database");
    db.create_tables().expect("Failed to create tables");

    TestDb {
        db,
        blog,
        entry,
        entry_tag,
    }
}

impl TestDb {
    pub fn create_blog(&self, title: &str) -> Record {
        let mut blog = Record::new(&self.blog).with("title", title).unwrap();
        blog.save(&self.db).expect("Failed to save blog");
        blog
    }

    pub fn create_entry(&self, title: &str, blog: &Record) -> Record {
        self.save_entry(Record::new(&self.entry).with("title", title).unwrap(), blog)
    }

    pub fn create_entry_with(
        &self,
        title: &str,
        content: &str,
        pub_date: Option<NaiveDateTime>,
        blog: &Record,
    ) -> Record {
        let entry = Record::new(&self.entry)
            .with("title", title)
            .unwrap()
            .with("content", content)
            .unwrap()
            .with("pub_date", pub_date)
            .unwrap();
        self.save_entry(entry, blog)
    }

    fn save_entry(&self, mut entry: Record, blog: &Record) -> Record {
        entry.set_related("blog", blog).unwrap();
        entry.save(&self.db).expect("Failed to save entry");
        entry
    }

    pub fn create_entry_tag(&self, tag: &str, entry: &Record) -> Record {
        let mut entry_tag = Record::new(&self.entry_tag)
            .with("tag", tag)
            .unwrap()
            .with("entry", entry)
            .unwrap();
        entry_tag.save(&self.db).expect("Failed to save entry tag");
        entry_tag
    }
}

/// Blogs a, b with entries a1, a2, b1, b2 and tags t1 (on a2), t2 (on b2).
pub struct Common {
    pub a: Record,
    pub a1: Record,
    pub a2: Record,
    pub b: Record,
    pub b1: Record,
    pub b2: Record,
    pub t1: Record,
    pub t2: Record,
}

pub fn common_objects(t: &TestDb) -> Common {
    let a = t.create_blog("a");
    let a1 = t.create_entry_with("a1", "a1", None, &a);
    let a2 = t.create_entry_with("a2", "a2", None, &a);
    let b = t.create_blog("b");
    let b1 = t.create_entry_with("b1", "b1", None, &b);
    let b2 = t.create_entry_with("b2", "b2", None, &b);
    let t1 = t.create_entry_tag("t1", &a2);
    let t2 = t.create_entry_tag("t2", &b2);
    Common {
        a,
        a1,
        a2,
        b,
        b1,
        b2,
        t1,
        t2,
    }
}

/// Midnight on January `day`, 2010.
pub fn jan(day: u32) -> NaiveDateTime {
    NaiveDate::from_ymd_opt(2010, 1, day)
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .expect("valid date")
}

pub fn text(record: &Record, name: &str) -> String {
    record
        .get(name)
        .and_then(Value::as_str)
        .unwrap_or_default()
        .to_string()
}

/// Titles of `records`, sorted.
pub fn titles(records: impl IntoIterator<Item = Record>) -> Vec<String> {
    let mut titles: Vec<_> = records
        .into_iter()
        .map(|record| text(&record, "title"))
        .collect();
    titles.sort();
    titles
}

pub fn ids(records: impl IntoIterator<Item = Record>) -> Vec<i64> {
    let mut ids: Vec<_> = records.into_iter().filter_map(|record| record.id()).collect();
    ids.sort_unstable();
    ids
}
