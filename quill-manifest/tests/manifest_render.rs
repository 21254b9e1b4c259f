//! Snapshot tests rendering complete manifests.
//!
//! Run `cargo insta review` to update snapshots when making intentional changes.

use std::str::FromStr;

use quill_codegen::{AbbreviationLevel, NamingPolicy};
use quill_core::QualifiedName;
use quill_manifest::Manifest;

const GREETER: &str = r#"
package = "com.example.greet"
primary = "Greeter"
header = "// Generated by quill. Do not edit."

[render]
indent_unit = "  "

[imports]
static_wildcards = ["java.util.Objects"]

[[body]]
doc = "Greets people by name."
block = "public final class Greeter"

[[body.body]]
statement = "private final {{T}} names"
args = [{ type = "java.util.List", args = [{ type = "java.lang.String" }] }]

[[body.body]]
blank = true

[[body.body]]
block = "public Greeter({{T}} names)"
args = [{ type = "java.util.List", args = [{ type = "java.lang.String" }] }]

[[body.body.body]]
statement = "this.names = {{N}}(names)"
args = [{ name = "java.util.Objects#requireNonNull" }]

[[body.body]]
blank = true

[[body.body]]
block = "public {{T}} greet()"
args = [{ type = "java.lang.String", dims = 1 }]

[[body.body.body]]
statement = "{{T}} out = new {{T}}[names.size()]"
args = [{ type = "java.lang.String", dims = 1 }, { type = "java.lang.String" }]

[[body.body.body]]
block = "for (int i = 0; i < out.length; i++)"

[[body.body.body.body]]
statement = "out[i] = {{E}} + names.get(i)"
args = ["Hello, "]

[[body.body.body]]
statement = "return out"
"#;

fn greeter() -> Manifest {
    Manifest::from_str(GREETER).expect("Failed to parse manifest")
}

#[test]
fn test_greeter_render() {
    let manifest = greeter();
    let text = manifest.to_document().render(&manifest.render).unwrap();
    insta::assert_snapshot!(text, @r#"
// Generated by quill. Do not edit.

package com.example.greet;

import static java.util.Objects.*;
import java.util.List;

/** Greets people by name. */
public final class Greeter {
  private final List<String> names;

  public Greeter(List<String> names) {
    this.names = requireNonNull(names);
  }

  public String[] greet() {
    String[] out = new String[names.size()];
    for (int i = 0; i < out.length; i++) {
      out[i] = "Hello, " + names.get(i);
    }
    return out;
  }
}
"#);
}

#[test]
fn test_greeter_plan() {
    let manifest = greeter();
    let plan = manifest.to_document().plan(&manifest.render).unwrap();
    let require = QualifiedName::parse("java.util.Objects#requireNonNull").unwrap();
    assert_eq!(plan.level(&require), AbbreviationLevel::Bare);
    assert_eq!(plan.imports().statics().count(), 0);
    assert_eq!(plan.imports().types().count(), 1);
    assert!(plan.shadowed().is_empty());
}

#[test]
fn test_greeter_canonical() {
    let manifest = greeter();
    let config = manifest.render.clone().naming(NamingPolicy::Canonical);
    let text = manifest.to_document().render(&config).unwrap();
    assert!(text.contains("  private final java.util.List<java.lang.String> names;\n"));
    assert!(text.contains("this.names = java.util.Objects.requireNonNull(names);"));
    assert!(text.contains("import static java.util.Objects.*;\n\n/**"));
}

#[test]
fn test_greeter_source_file() {
    let dir = tempfile::tempdir().unwrap();
    let manifest = greeter();
    let file = manifest.to_document().source_file(&manifest.render).unwrap();
    let written = file.write(dir.path()).unwrap();
    assert_eq!(
        written,
        dir.path().join("com").join("example").join("greet").join("Greeter.java")
    );
}

#[test]
fn test_block_with_close() {
    let manifest = Manifest::from_str(
        r#"
        primary = "Loop"

        [[body]]
        block = "do"
        close = "} while ({{$}});"
        close_args = ["running"]

        [[body.body]]
        statement = "step()"
        "#,
    )
    .unwrap();
    let text = manifest.to_document().render(&manifest.render).unwrap();
    assert_eq!(text, "do {\n    step();\n} while (running);\n");
}
