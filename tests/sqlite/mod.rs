mod foreign_keys;
mod insert;
mod select;
