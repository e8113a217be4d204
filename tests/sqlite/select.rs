use crate::common::{ids, setup_db, text, titles};
use rowmap::prelude::*;

#[test]
fn select_all_and_filtered() {
    let t = setup_db();
    for title in ["a", "b", "c"] {
        t.create_blog(title);
    }

    let all = t.db.select(&t.blog);
    assert_eq!(ids(all.execute().unwrap()), [1, 2, 3]);
    assert_eq!(titles(all.execute().unwrap()), ["a", "b", "c"]);

    let a = t.db.select(&t.blog).r#where(lookups!["title" => "a"]).unwrap();
    assert_eq!(ids(a.execute().unwrap()), [1]);

    let a = a.r#where(lookups!["id" => 1]).unwrap();
    assert_eq!(titles(a.execute().unwrap()), ["a"]);

    let in_list = t
        .db
        .select(&t.blog)
        .r#where(lookups!["title__in" => vec!["a", "b"]])
        .unwrap();
    assert_eq!(ids(in_list.execute().unwrap()), [1, 2]);
    assert_eq!(titles(in_list.all().unwrap()), ["a", "b"]);
}

#[test]
fn select_ordering() {
    let t = setup_db();
    let a = t.create_blog("a");
    let b = t.create_blog("b");
    let c = t.create_blog("c");

    let a1 = t.create_entry("a1", &a);
    let a2 = t.create_entry("a2", &a);
    let b1 = t.create_entry("b1", &b);
    let b2 = t.create_entry("b2", &b);
    let c1 = t.create_entry("c1", &c);

    let ascending = t.db.select(&t.blog).order_by(["title"]).all().unwrap();
    assert_eq!(ascending, [a.clone(), b.clone(), c.clone()]);

    let descending = t.db.select(&t.blog).order_by([desc("title")]).all().unwrap();
    assert_eq!(descending, [c.clone(), b.clone(), a.clone()]);

    let filtered = t
        .db
        .select(&t.entry)
        .order_by([desc("title")])
        .join(&t.blog)
        .unwrap()
        .r#where(lookups!["title" => "a"])
        .unwrap()
        .all()
        .unwrap();
    assert_eq!(filtered, [a2.clone(), a1.clone()]);

    let both = t
        .db
        .select(&t.entry)
        .order_by([desc("title")])
        .join(&t.blog)
        .unwrap()
        .order_by(["title"]);
    assert_eq!(
        both.sql().unwrap(),
        "SELECT t1.* FROM entry AS t1 INNER JOIN blog AS t2 ON t1.blog_id = t2.id ORDER BY t1.title DESC, t2.title ASC"
    );
    assert_eq!(both.all().unwrap(), [c1, b2, b1, a2, a1]);
}

#[test]
fn count() {
    let t = setup_db();
    for i in 0..10 {
        t.create_blog(&format!("a{i}"));
    }

    assert_eq!(t.db.select(&t.blog).count().unwrap(), 10);

    for blog in t.db.select(&t.blog).all().unwrap() {
        for i in 0..20 {
            t.create_entry(&format!("entry{i}"), &blog);
        }
    }

    assert_eq!(t.db.select(&t.entry).count().unwrap(), 200);

    let joined = t
        .db
        .select(&t.entry)
        .join(&t.blog)
        .unwrap()
        .r#where(lookups!["title" => "a0"])
        .unwrap();
    assert_eq!(joined.count().unwrap(), 20);

    let narrowed = t
        .db
        .select(&t.entry)
        .r#where(lookups!["title__icontains" => "0"])
        .unwrap()
        .join(&t.blog)
        .unwrap()
        .r#where(lookups!["title" => "a5"])
        .unwrap();
    assert_eq!(narrowed.count().unwrap(), 2);
}

#[test]
fn count_primary_key_is_unique() {
    let t = setup_db();
    t.create_blog("a");
    t.create_blog("b");

    for id in 0..4 {
        let count = t
            .db
            .select(&t.blog)
            .r#where(lookups!["id" => id])
            .unwrap()
            .count()
            .unwrap();
        assert!(count == 0 || count == 1);
    }
}

#[test]
fn pagination() {
    let t = setup_db();
    for i in 0..100 {
        t.create_blog(&i.to_string());
    }

    let page = |number, size| -> Vec<String> {
        t.db
            .select(&t.blog)
            .order_by(["id"])
            .paginate(number, size)
            .execute()
            .unwrap()
            .map(|blog| text(&blog, "title"))
            .collect()
    };

    let expected = |range: std::ops::Range<i32>| -> Vec<String> { range.map(|i| i.to_string()).collect() };

    assert_eq!(page(1, 20), expected(0..20));
    assert_eq!(page(3, 30), expected(60..90));
    assert_eq!(page(0, 10), expected(0..10));
    assert!(page(11, 10).is_empty());
}

#[test]
fn count_ignores_pagination() {
    let t = setup_db();
    for i in 0..25 {
        t.create_blog(&i.to_string());
    }
    let paged = t.db.select(&t.blog).paginate(2, 10);
    assert_eq!(paged.count().unwrap(), 25);
    assert_eq!(paged.all().unwrap().len(), 10);
}

#[test]
fn records_are_single_pass() {
    let t = setup_db();
    t.create_blog("a");
    t.create_blog("b");

    let query = t.db.select(&t.blog);
    let mut records = query.execute().unwrap();
    assert_eq!(records.columns(), ["id", "title"]);
    assert!(records.next().is_some());
    assert!(records.next().is_some());
    assert!(records.next().is_none());

    // Executing again starts over.
    assert_eq!(query.execute().unwrap().count(), 2);
    assert!(query.first().unwrap().is_some());
}
