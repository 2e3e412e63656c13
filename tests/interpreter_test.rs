use std::{
    fs::{read_dir, read_to_string},
    path::Path,
};

use color_eyre::{eyre::Context, Result};
use novolang::interpreter::{
    context::BufferedContext, dispatch::FunctionTable, TreeWalkInterpreter,
};
use serde_json::Value as JsonValue;

#[test]
fn test_assignment() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/assignment");
    test_engine(input_dir)
}

#[test]
fn test_auto_call() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/auto_call");
    test_engine(input_dir)
}

#[test]
fn test_block() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/block");
    test_engine(input_dir)
}

#[test]
fn test_error() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/error");
    test_engine(input_dir)
}

#[test]
fn test_if() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/if");
    test_engine(input_dir)
}

#[test]
fn test_loop() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/loop");
    test_engine(input_dir)
}

#[test]
fn test_operator() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/operator");
    test_engine(input_dir)
}

#[test]
fn test_print() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/print");
    test_engine(input_dir)
}

#[test]
fn test_unsupported() -> Result<()> {
    let input_dir = Path::new("./test_data/interpreter/unsupported");
    test_engine(input_dir)
}

/// Hosts `ok`, which always succeeds, and `fail`, which always fails with `boom`.
fn test_dispatcher() -> FunctionTable {
    let mut table = FunctionTable::new();
    table
        .register(&["ok"], |_| Ok(()))
        .register(&["fail"], |_| Err("boom".into()));
    table
}

struct TestCase {
    name: String,
    tree: JsonValue,
    output: String,
    diagnostics: String,
}

impl TestCase {
    pub fn check(&self) {
        let mut interpreter = TreeWalkInterpreter::new(BufferedContext::new(), test_dispatcher());
        interpreter.execute(&self.tree);
        let (output, diagnostics) = interpreter.into_context().into_parts();
        assert_eq!(
            self.output, output,
            "Failed test {} at output.",
            self.name
        );
        assert_eq!(
            self.diagnostics, diagnostics,
            "Failed test {} at diagnostics.",
            self.name
        );
    }
}

fn test_engine(input_dir: &Path) -> Result<()> {
    let mut succeeded = true;
    let mut count = 0;
    for entry in read_dir(input_dir).context("Failed to open input test data folder")? {
        let entry = entry?;
        let path = entry.path();

        let Some(extension) = path.extension() else {
            continue;
        };

        if extension != "json" {
            continue;
        }

        println!("Loading {path:?}");
        let test_case = parse_test_case(&path)?;
        println!("Checking {}", test_case.name);
        count += 1;

        let res = std::panic::catch_unwind(|| {
            test_case.check();
        });
        if res.is_err() {
            println!("\tFails test case {}", test_case.name);
            succeeded = false;
        }
    }

    assert!(count > 0, "No test cases found in {input_dir:?}");
    assert!(succeeded, "Some test cases in {input_dir:?} failed");

    Ok(())
}

fn parse_test_case(input_path: &Path) -> Result<TestCase> {
    let test_name = AsRef::<Path>::as_ref(
        input_path
            .file_name()
            .expect("File name can't be none as the path is to a real file."),
    )
    .to_string_lossy();

    let input = read_to_string(input_path).context("Failed to open input test data file")?;
    let tree = serde_json::from_str(&input).context("Test data is not valid JSON")?;

    let output = read_to_string(input_path.with_extension("out"))
        .context("Failed to open expected output file")?;
    let error_path = input_path.with_extension("err");
    let diagnostics = if error_path.exists() {
        read_to_string(&error_path).context("Failed to open expected diagnostics file")?
    } else {
        String::new()
    };

    Ok(TestCase {
        name: test_name.into_owned(),
        tree,
        output,
        diagnostics,
    })
}
