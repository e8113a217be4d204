/// Builds a list of `(key, Value)` lookups for `r#where`, `values`, `set` and `Database::get`.
///
/// Keys are field names, optionally suffixed with `__op`
/// (`lt`, `lte`, `gt`, `gte`, `eq`, `in`, `icontains`, `contains`).
///
/// ```
/// use rowmap::{Value, lookups};
///
/// let filter = lookups!["title__in" => vec!["a", "b"], "id__gt" => 3];
/// assert_eq!(filter[1], ("id__gt", Value::Integer(3)));
///
/// let none = lookups![];
/// assert!(none.is_empty());
/// ```
#[macro_export]
macro_rules! lookups {
    () => {
        ::std::vec::Vec::<(&'static str, $crate::Value)>::new()
    };
    ($($key:expr => $value:expr),+ $(,)?) => {
        ::std::vec![$(($key, $crate::Value::from($value))),+]
    };
}
