use assert_cmd::Command;
use assert_fs::TempDir;
use assert_fs::prelude::*;
use serde_json::Value;
use std::fs;

const DEFINITION: &str = "form-title = Merveilles Stickers
form-password = hihi-stickertown
input[Name] = First and last name
number[Sticker sheet amount]#amount = min=1, max=5, value=1
radio[Size]=Small, Medium, Large
";

fn formc() -> Command {
    let mut cmd = Command::cargo_bin("formc").expect("formc binary");
    cmd.env_remove("FORMC_OUTPUT_DIR");
    cmd
}

#[test]
fn build_writes_both_artifacts() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    let input = workspace.child("form.def");
    input.write_str(DEFINITION)?;

    let output = formc()
        .arg("build")
        .arg("--input")
        .arg(input.path())
        .arg("--out")
        .arg(workspace.path())
        .arg("--json-schema")
        .arg("schemas/answers.json")
        .output()?;
    assert!(output.status.success(), "{:?}", output);
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("Wrote HTML document"));
    assert!(stdout.contains("Wrote schema source"));

    let html = fs::read_to_string(workspace.path().join("index-template.html"))?;
    assert!(html.contains("<title>Merveilles Stickers</title>"));
    assert!(html.contains(r#"id="size-option-large" value="large" name="size""#));

    let source =
        fs::read_to_string(workspace.path().join("myform/generated_form_model.rs"))?;
    assert!(source.contains(r#"pub const BASIC_PASSWORD: &str = "hihi-stickertown";"#));
    assert!(source.contains("pub amount: String,"));

    let schema: Value = serde_json::from_str(&fs::read_to_string(
        workspace.path().join("schemas/answers.json"),
    )?)?;
    let keys: Vec<_> = schema["properties"]
        .as_object()
        .expect("properties")
        .keys()
        .cloned()
        .collect();
    assert_eq!(keys, vec!["name", "amount", "size"]);
    Ok(())
}

#[test]
fn build_refuses_to_overwrite_without_force() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    let input = workspace.child("form.def");
    input.write_str(DEFINITION)?;
    workspace.child("index-template.html").write_str("keep me")?;

    formc()
        .arg("build")
        .arg("--input")
        .arg(input.path())
        .arg("--out")
        .arg(workspace.path())
        .assert()
        .failure();
    assert_eq!(
        fs::read_to_string(workspace.path().join("index-template.html"))?,
        "keep me"
    );
    // The other artifact is still written.
    assert!(workspace.path().join("myform/generated_form_model.rs").exists());

    formc()
        .arg("build")
        .arg("--input")
        .arg(input.path())
        .arg("--out")
        .arg(workspace.path())
        .arg("--force")
        .assert()
        .success();
    assert!(fs::read_to_string(workspace.path().join("index-template.html"))?.contains("<form"));
    Ok(())
}

#[test]
fn strict_build_fails_on_warnings() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    let input = workspace.child("form.def");
    input.write_str("input[Name] = x\nnot a field\n")?;

    let output = formc()
        .arg("build")
        .arg("--input")
        .arg(input.path())
        .arg("--out")
        .arg(workspace.path())
        .arg("--strict")
        .output()?;
    assert!(!output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("missing_separator"));
    assert!(!workspace.path().join("index-template.html").exists());
    Ok(())
}

#[test]
fn build_reads_stdin() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    formc()
        .arg("build")
        .arg("--input")
        .arg("-")
        .arg("--out")
        .arg(workspace.path())
        .arg("--html")
        .arg("public/form.html")
        .write_stdin(DEFINITION)
        .assert()
        .success();
    assert!(workspace.path().join("public/form.html").exists());
    Ok(())
}

#[test]
fn build_uses_output_dir_from_environment() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    let input = workspace.child("form.def");
    input.write_str(DEFINITION)?;
    let out = workspace.child("out");

    formc()
        .env("FORMC_OUTPUT_DIR", out.path())
        .arg("build")
        .arg("--input")
        .arg(input.path())
        .assert()
        .success();
    assert!(out.path().join("index-template.html").exists());
    Ok(())
}

#[test]
fn check_reports_warnings_with_line_numbers() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    let input = workspace.child("form.def");
    input.write_str("input[Name] = x\nnumber[Count] = min=1, oops\n")?;

    let output = formc()
        .arg("check")
        .arg("--input")
        .arg(input.path())
        .output()?;
    assert!(!output.status.success());
    let stdout = String::from_utf8(output.stdout)?;
    assert!(stdout.contains("warning: line 2: skipping option 'oops'"));
    assert!(stdout.contains(" - count (Count)"));
    Ok(())
}

#[test]
fn check_accepts_clean_definition() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    let input = workspace.child("form.def");
    input.write_str(DEFINITION)?;

    let output = formc()
        .arg("check")
        .arg("--input")
        .arg(input.path())
        .output()?;
    assert!(output.status.success());
    assert!(String::from_utf8(output.stdout)?.contains("Definition is clean."));
    Ok(())
}

#[test]
fn parse_prints_model_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = formc()
        .arg("parse")
        .arg("--input")
        .arg("-")
        .write_stdin(DEFINITION)
        .output()?;
    assert!(output.status.success());
    let model: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(model["metadata"]["title"], "Merveilles Stickers");
    assert_eq!(model["fields"][3]["kind"], "number");
    assert_eq!(model["fields"][3]["explicit_key"], "amount");
    assert_eq!(model["fields"][3]["line"], 4);
    Ok(())
}

#[test]
fn model_schema_is_json() -> Result<(), Box<dyn std::error::Error>> {
    let output = formc().arg("model-schema").output()?;
    assert!(output.status.success());
    let schema: Value = serde_json::from_slice(&output.stdout)?;
    assert_eq!(schema["title"], "FormModel");
    Ok(())
}

#[test]
fn init_writes_sample_that_builds() -> Result<(), Box<dyn std::error::Error>> {
    let workspace = TempDir::new()?;
    let sample = workspace.path().join("sample.def");

    formc()
        .arg("init")
        .arg("--out")
        .arg(&sample)
        .assert()
        .success();
    formc()
        .arg("init")
        .arg("--out")
        .arg(&sample)
        .assert()
        .failure();
    formc()
        .arg("check")
        .arg("--input")
        .arg(&sample)
        .assert()
        .success();
    Ok(())
}
