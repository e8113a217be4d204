use crate::common::{common_objects, setup_db};
use rowmap::error::RowmapError;
use rowmap::prelude::*;

#[test]
fn forward_accessor() {
    let t = setup_db();
    let mut c = common_objects(&t);

    // Records loaded from the database start with an empty cache.
    let mut a1 = t.db.get(&t.entry, lookups!["title" => "a1"]).unwrap();
    assert_eq!(a1.related(&t.db, "blog").unwrap(), Some(&c.a));
    assert_ne!(a1.related(&t.db, "blog").unwrap(), Some(&c.b));

    assert_eq!(a1.get("blog_id"), Some(&Value::from(&c.a)));
    assert_eq!(c.a2.get("blog_id"), a1.get("blog_id"));

    assert_eq!(c.b1.related(&t.db, "blog").unwrap(), Some(&c.b));

    let mut t1_entry = c.t1.related(&t.db, "entry").unwrap().cloned().unwrap();
    assert_eq!(t1_entry.related(&t.db, "blog").unwrap(), Some(&c.a));
    let mut t2_entry = c.t2.related(&t.db, "entry").unwrap().cloned().unwrap();
    assert_eq!(t2_entry.related(&t.db, "blog").unwrap(), Some(&c.b));
}

#[test]
fn assigning_related_records() {
    let t = setup_db();
    let c = common_objects(&t);

    let mut a3 = Record::new(&t.entry)
        .with("title", "a3")
        .unwrap()
        .with("content", "a3")
        .unwrap();
    a3.set_related("blog", &c.a).unwrap();
    assert_eq!(a3.related(&t.db, "blog").unwrap(), Some(&c.a));
    assert_eq!(a3.get("blog_id").and_then(Value::as_i64), c.a.id());

    a3.save(&t.db).unwrap();
    assert_eq!(a3.related(&t.db, "blog").unwrap(), Some(&c.a));
    assert_eq!(a3.get("blog_id").and_then(Value::as_i64), c.a.id());

    a3.set_related("blog", &c.b).unwrap();
    assert_eq!(a3.related(&t.db, "blog").unwrap(), Some(&c.b));
    a3.save(&t.db).unwrap();

    let mut reloaded = t.db.get(&t.entry, lookups!["title" => "a3"]).unwrap();
    assert_eq!(reloaded, a3);
    assert_eq!(reloaded.related(&t.db, "blog").unwrap(), Some(&c.b));

    let err = a3.set_related("blog", &c.t1).unwrap_err();
    assert!(matches!(err, RowmapError::TypeMismatch { .. }));
}

#[test]
fn setting_the_key_invalidates_the_cache() {
    let t = setup_db();
    let c = common_objects(&t);

    let mut a1 = c.a1.clone();
    assert_eq!(a1.related(&t.db, "blog").unwrap(), Some(&c.a));
    a1.set("blog_id", &c.b).unwrap();
    assert_eq!(a1.related(&t.db, "blog").unwrap(), Some(&c.b));
}

#[test]
fn null_and_dangling_keys() {
    let t = setup_db();
    let mut orphan = Record::new(&t.entry).with("title", "x").unwrap();
    assert_eq!(orphan.related(&t.db, "blog").unwrap(), None);

    orphan.set("blog", 99).unwrap();
    assert!(matches!(
        orphan.related(&t.db, "blog"),
        Err(RowmapError::NotFound)
    ));
}

#[test]
fn reverse_accessor() {
    let t = setup_db();
    let c = common_objects(&t);

    let entries = c.a.related_set(&t.db, "entry_set").unwrap();
    assert_eq!(entries.all().unwrap(), [c.a1.clone(), c.a2.clone()]);

    let filtered = entries.r#where(lookups!["title" => "a1"]).unwrap();
    assert_eq!(filtered.all().unwrap(), [c.a1.clone()]);

    assert!(c.a1.related_set(&t.db, "entrytag_set").unwrap().all().unwrap().is_empty());
    assert_eq!(
        c.a2.related_set(&t.db, "entrytag_set").unwrap().all().unwrap(),
        [c.t1.clone()]
    );

    let err = c.a.related_set(&t.db, "entrytag_set").unwrap_err();
    assert!(matches!(err, RowmapError::UnknownField { .. }));
}
