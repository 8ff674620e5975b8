//! Cross-component integration tests
//!
//! These tests exercise the formatter, bindings, and template store
//! together, including loading template definitions from disk.

use std::fs;
use std::path::PathBuf;

use chrono::Utc;
use pretty_assertions::assert_eq;
use serde_json::json;

use stencil::template::{
    create_template_store, format_value, placeholders, Bindings, FormatOptions, MissingPolicy,
    Template, TemplateError, TemplateStore, TemplateUpdate,
};

fn template(id: &str, name: &str, body: &str) -> Template {
    Template {
        id: id.to_string(),
        name: name.to_string(),
        body: body.to_string(),
        description: None,
        created_at: Utc::now(),
        updated_at: Utc::now(),
    }
}

/// Temporary directory that cleans up after itself
struct TempDir {
    path: PathBuf,
}

impl TempDir {
    fn new(label: &str) -> Self {
        let path = std::env::temp_dir().join(format!("stencil-test-{}-{}", label, std::process::id()));
        fs::create_dir_all(&path).unwrap();
        Self { path }
    }
}

impl Drop for TempDir {
    fn drop(&mut self) {
        let _ = fs::remove_dir_all(&self.path);
    }
}

#[test]
fn test_store_create_and_render() {
    let store = TemplateStore::new();

    store
        .create(template("status", "Status Line", "{message}"))
        .unwrap();

    let bindings = Bindings::from([("message", "PASSED")]);
    assert_eq!(store.render("status", &bindings).unwrap(), "PASSED");
}

#[test]
fn test_render_with_json_bindings() {
    let store = TemplateStore::new();

    store
        .create(template(
            "order-shipped",
            "Order Shipped",
            "Order {order_id} ships in {days} days",
        ))
        .unwrap();

    let bindings = Bindings::from_json(&json!({
        "order_id": "ORD-123",
        "days": 2
    }))
    .unwrap();

    let rendered = store.render("order-shipped", &bindings).unwrap();
    assert_eq!(rendered, "Order ORD-123 ships in 2 days");
}

#[test]
fn test_render_missing_binding_is_all_or_nothing() {
    let store = TemplateStore::new();

    store
        .create(template("partial", "Partial", "{a} then {b}"))
        .unwrap();

    let bindings = Bindings::from([("a", "first")]);
    match store.render("partial", &bindings) {
        Err(TemplateError::MissingBinding(name)) => assert_eq!(name, "b"),
        other => panic!("expected MissingBinding, got {:?}", other),
    }

    // The same template renders fully once every name is bound.
    let bindings = Bindings::from([("a", "first"), ("b", "second")]);
    assert_eq!(store.render("partial", &bindings).unwrap(), "first then second");
}

#[test]
fn test_policy_override_per_render() {
    let store = TemplateStore::new();

    store
        .create(template("greeting", "Greeting", "{greeting}, {name}!"))
        .unwrap();

    let bindings = Bindings::from([("greeting", "Hello")]);

    let keep = FormatOptions {
        missing: MissingPolicy::Keep,
    };
    assert_eq!(
        store.render_with("greeting", &bindings, &keep).unwrap(),
        "Hello, {name}!"
    );

    let empty = FormatOptions {
        missing: MissingPolicy::Empty,
    };
    assert_eq!(
        store.render_with("greeting", &bindings, &empty).unwrap(),
        "Hello, !"
    );
}

#[test]
fn test_update_then_render() {
    let store = TemplateStore::new();

    store
        .create(template("welcome", "Welcome", "Hi {user}"))
        .unwrap();

    store
        .update(
            "welcome",
            TemplateUpdate {
                body: Some("Welcome back, {user}!".to_string()),
                ..Default::default()
            },
        )
        .unwrap();

    let bindings = Bindings::from([("user", "alice")]);
    assert_eq!(
        store.render("welcome", &bindings).unwrap(),
        "Welcome back, alice!"
    );
}

#[test]
fn test_load_dir_and_render() {
    let dir = TempDir::new("load");

    fs::write(
        dir.path.join("greeting.json"),
        serde_json::to_string_pretty(&json!({
            "id": "greeting",
            "name": "Greeting",
            "body": "Hello, {name}!"
        }))
        .unwrap(),
    )
    .unwrap();

    fs::write(
        dir.path.join("farewell.json"),
        serde_json::to_string_pretty(&json!({
            "id": "farewell",
            "name": "Farewell",
            "body": "Goodbye, {name}.",
            "description": "Sign-off line"
        }))
        .unwrap(),
    )
    .unwrap();

    // Non-JSON files are ignored.
    fs::write(dir.path.join("notes.txt"), "not a template").unwrap();

    let store = TemplateStore::new();
    let loaded = store.load_dir(&dir.path).unwrap();
    assert_eq!(loaded, 2);

    let bindings = Bindings::from([("name", "World")]);
    assert_eq!(store.render("greeting", &bindings).unwrap(), "Hello, World!");
    assert_eq!(store.render("farewell", &bindings).unwrap(), "Goodbye, World.");
}

#[test]
fn test_load_dir_rejects_malformed_template_file() {
    let dir = TempDir::new("malformed");

    fs::write(
        dir.path.join("broken.json"),
        serde_json::to_string(&json!({
            "id": "broken",
            "name": "Broken",
            "body": "never closed {oops"
        }))
        .unwrap(),
    )
    .unwrap();

    let store = TemplateStore::new();
    assert!(matches!(
        store.load_dir(&dir.path),
        Err(TemplateError::Malformed { .. })
    ));
}

#[test]
fn test_json_payload_rendering() {
    let payload = json!({
        "title": "Order {order_id} shipped",
        "meta": {
            "tracking": "{tracking_number}",
            "attempts": 1
        }
    });

    let bindings = Bindings::from_json(&json!({
        "order_id": "ORD-456",
        "tracking_number": "TW123456789"
    }))
    .unwrap();

    let rendered = format_value(&payload, &bindings, &FormatOptions::default()).unwrap();
    assert_eq!(rendered["title"], "Order ORD-456 shipped");
    assert_eq!(rendered["meta"]["tracking"], "TW123456789");
    assert_eq!(rendered["meta"]["attempts"], 1);
}

#[test]
fn test_concurrent_renders_share_store() {
    let store = create_template_store();
    store
        .create(template("shared", "Shared", "Hello, {name}!"))
        .unwrap();

    let handles: Vec<_> = (0..4)
        .map(|i| {
            let store = store.clone();
            std::thread::spawn(move || {
                let bindings =
                    Bindings::from_iter([("name".to_string(), format!("user-{}", i))]);
                store.render("shared", &bindings).unwrap()
            })
        })
        .collect();

    for (i, handle) in handles.into_iter().enumerate() {
        assert_eq!(handle.join().unwrap(), format!("Hello, user-{}!", i));
    }
}

#[test]
fn test_placeholders_drive_binding_checks() {
    let body = "Dear {name}, your {item} arrives {when}.";
    let names = placeholders(body).unwrap();
    assert_eq!(names, vec!["name", "item", "when"]);

    // A bindings set covering every extracted name renders cleanly.
    let bindings: Bindings = names
        .iter()
        .map(|n| (n.clone(), format!("<{}>", n)))
        .collect();
    let rendered = stencil::template::format(body, &bindings).unwrap();
    assert_eq!(rendered, "Dear <name>, your <item> arrives <when>.");
}
