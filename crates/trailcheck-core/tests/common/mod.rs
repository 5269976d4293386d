use std::collections::BTreeMap;
use trailcheck_core::record;

record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Point {
        pub x: i32,
        pub y: i32,
    }
}

record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Line {
        pub a: Point,
        pub b: Point,
    }
}

record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Inner {
        pub val: String,
    }
}

record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Outer {
        pub s: Inner,
    }
}

record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Account {
        pub id: u64,
        pub tags: Vec<String>,
        pub limits: BTreeMap<String, i64>,
        secret: String,
    }
}

record! {
    #[allow(dead_code)]
    #[derive(Debug, Clone)]
    pub struct Node {
        pub val: i32,
        pub next: Option<Box<Node>>,
    }
}

/// Point with the given coordinates
#[allow(dead_code)]
pub fn point(x: i32, y: i32) -> Point {
    Point { x, y }
}

/// Account whose unexported field is set to `secret`
#[allow(dead_code)]
pub fn account(id: u64, tags: &[&str], limits: &[(&str, i64)], secret: &str) -> Account {
    Account {
        id,
        tags: tags.iter().map(|t| t.to_string()).collect(),
        limits: limits.iter().map(|(k, v)| (k.to_string(), *v)).collect(),
        secret: secret.to_string(),
    }
}

/// Linked chain of `len` nodes valued `0..len`
#[allow(dead_code)]
pub fn chain(len: i32) -> Node {
    let mut node = Node {
        val: len - 1,
        next: None,
    };
    for val in (0..len - 1).rev() {
        node = Node {
            val,
            next: Some(Box::new(node)),
        };
    }
    node
}
