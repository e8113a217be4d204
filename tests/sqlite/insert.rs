use crate::common::{setup_db, text};
use rowmap::error::RowmapError;
use rowmap::prelude::*;

#[test]
fn insert_returns_new_ids() {
    let t = setup_db();

    let insert = t.db.insert(&t.blog).values(lookups!["title" => "a"]).unwrap();
    assert_eq!(insert.sql().unwrap(), r#"INSERT INTO blog (title) VALUES ("a")"#);
    assert_eq!(insert.execute().unwrap(), 1);
    assert_eq!(text(&t.db.get(&t.blog, lookups!["id" => 1]).unwrap(), "title"), "a");

    let insert = t.db.insert(&t.blog).values(lookups!["title" => "b"]).unwrap();
    assert_eq!(insert.execute().unwrap(), 2);
    assert_eq!(text(&t.db.get(&t.blog, lookups!["id" => 2]).unwrap(), "title"), "b");
}

#[test]
fn sequential_ids() {
    let t = setup_db();
    let ids: Vec<i64> = (0..5)
        .map(|i| {
            t.db.insert(&t.blog)
                .values(lookups!["title" => format!("blog{i}")])
                .unwrap()
                .execute()
                .unwrap()
        })
        .collect();
    assert_eq!(ids, [1, 2, 3, 4, 5]);
}

#[test]
fn insert_by_column_or_relation_name() {
    let t = setup_db();
    let a = t.create_blog("a");

    let by_column = t
        .db
        .insert(&t.entry)
        .values(lookups!["title" => "a1", "blog_id" => &a])
        .unwrap();
    let by_relation = t
        .db
        .insert(&t.entry)
        .values(lookups!["title" => "a1", "blog" => &a])
        .unwrap();
    assert_eq!(by_column.sql().unwrap(), by_relation.sql().unwrap());
    assert_eq!(
        by_column.sql().unwrap(),
        r#"INSERT INTO entry (title,blog_id) VALUES ("a1",1)"#
    );
    assert_eq!(by_relation.execute().unwrap(), 1);
}

#[test]
fn insert_truncates_bounded_text() {
    let t = setup_db();
    let long = "x".repeat(80);
    let a = t.create_blog("a");
    let id = t
        .db
        .insert(&t.entry)
        .values(lookups!["title" => long.as_str(), "blog" => &a])
        .unwrap()
        .execute()
        .unwrap();
    let entry = t.db.get(&t.entry, lookups!["id" => id]).unwrap();
    assert_eq!(text(&entry, "title").len(), 50);
}

#[test]
fn insert_rejects_filters_and_joins() {
    let t = setup_db();
    let insert = || t.db.insert(&t.blog).values(lookups!["title" => "a"]).unwrap();

    assert!(matches!(
        insert().r#where(lookups!["title" => "b"]),
        Err(RowmapError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        insert().where_raw("id = 1"),
        Err(RowmapError::UnsupportedOperation(_))
    ));
    assert!(matches!(
        insert().join(&t.entry),
        Err(RowmapError::UnsupportedOperation(_))
    ));
}
