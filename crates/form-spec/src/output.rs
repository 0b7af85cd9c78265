use std::{
    fmt, fs, io,
    path::{Path, PathBuf},
};

use tracing::{error, info};

use crate::assemble::Compilation;
use crate::error::OutputError;

/// Default file name of the HTML document.
pub const DEFAULT_HTML_PATH: &str = "index-template.html";
/// Default location of the generated schema source.
pub const DEFAULT_SCHEMA_SOURCE_PATH: &str = "myform/generated_form_model.rs";

/// Files written from a compilation.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Artifact {
    HtmlDocument,
    SchemaSource,
    JsonSchema,
}

impl fmt::Display for Artifact {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Artifact::HtmlDocument => write!(f, "HTML document"),
            Artifact::SchemaSource => write!(f, "schema source"),
            Artifact::JsonSchema => write!(f, "answer JSON schema"),
        }
    }
}

/// Destinations for each artifact. The JSON schema is optional.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OutputPaths {
    pub html: PathBuf,
    pub schema_source: PathBuf,
    pub json_schema: Option<PathBuf>,
}

impl OutputPaths {
    /// Default layout under `root`.
    pub fn under(root: &Path) -> Self {
        Self {
            html: root.join(DEFAULT_HTML_PATH),
            schema_source: root.join(DEFAULT_SCHEMA_SOURCE_PATH),
            json_schema: None,
        }
    }
}

/// Outcome of writing every artifact.
#[derive(Debug, Default)]
pub struct WriteReport {
    pub written: Vec<(Artifact, PathBuf)>,
    pub failures: Vec<OutputError>,
}

impl WriteReport {
    pub fn is_success(&self) -> bool {
        self.failures.is_empty()
    }
}

/// Write each artifact independently. A failed write is recorded and the
/// remaining artifacts are still attempted; nothing is rolled back.
pub fn write_artifacts(
    compilation: &Compilation,
    paths: &OutputPaths,
    overwrite: bool,
) -> WriteReport {
    let json_schema = paths.json_schema.as_ref().map(|path| {
        let contents = serde_json::to_string_pretty(&compilation.answers_schema)
            .map(|mut text| {
                text.push('\n');
                text
            })
            .map_err(io::Error::other);
        (path.as_path(), contents)
    });

    let mut jobs: Vec<(Artifact, &Path, io::Result<String>)> = vec![
        (
            Artifact::HtmlDocument,
            paths.html.as_path(),
            Ok(compilation.html.clone()),
        ),
        (
            Artifact::SchemaSource,
            paths.schema_source.as_path(),
            Ok(compilation.schema_source.clone()),
        ),
    ];
    if let Some((path, contents)) = json_schema {
        jobs.push((Artifact::JsonSchema, path, contents));
    }

    let mut report = WriteReport::default();
    for (artifact, path, contents) in jobs {
        let result = contents
            .map_err(|source| OutputError::Io {
                artifact,
                path: path.to_path_buf(),
                source,
            })
            .and_then(|contents| write_one(artifact, path, &contents, overwrite));
        match result {
            Ok(()) => {
                info!(artifact = %artifact, path = %path.display(), "wrote artifact");
                report.written.push((artifact, path.to_path_buf()));
            }
            Err(err) => {
                error!(artifact = %artifact, path = %path.display(), "{}", err);
                report.failures.push(err);
            }
        }
    }
    report
}

fn write_one(
    artifact: Artifact,
    path: &Path,
    contents: &str,
    overwrite: bool,
) -> Result<(), OutputError> {
    if !overwrite && path.exists() {
        return Err(OutputError::Exists {
            artifact,
            path: path.to_path_buf(),
        });
    }
    let io_error = |source| OutputError::Io {
        artifact,
        path: path.to_path_buf(),
        source,
    };
    if let Some(parent) = path.parent()
        && !parent.as_os_str().is_empty()
    {
        fs::create_dir_all(parent).map_err(io_error)?;
    }
    fs::write(path, contents).map_err(io_error)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::assemble::compile;
    use tempfile::TempDir;

    #[test]
    fn writes_default_layout() {
        let dir = TempDir::new().expect("temp dir");
        let compilation = compile("form-title = T\ninput[Name] = x").unwrap();
        let mut paths = OutputPaths::under(dir.path());
        paths.json_schema = Some(dir.path().join("schemas/answers.schema.json"));

        let report = write_artifacts(&compilation, &paths, false);
        assert!(report.is_success(), "{:?}", report.failures);
        assert_eq!(report.written.len(), 3);

        let html = fs::read_to_string(dir.path().join(DEFAULT_HTML_PATH)).unwrap();
        assert_eq!(html, compilation.html);
        let source = fs::read_to_string(dir.path().join(DEFAULT_SCHEMA_SOURCE_PATH)).unwrap();
        assert!(source.contains("pub struct FormAnswer {"));
        let schema: serde_json::Value = serde_json::from_str(
            &fs::read_to_string(dir.path().join("schemas/answers.schema.json")).unwrap(),
        )
        .unwrap();
        assert_eq!(schema["properties"]["name"]["type"], "string");
    }

    #[test]
    fn one_failed_write_does_not_stop_the_other() {
        let dir = TempDir::new().expect("temp dir");
        let blocker = dir.path().join("blocker");
        fs::write(&blocker, "a file, not a directory").unwrap();

        let compilation = compile("input[Name] = x").unwrap();
        let paths = OutputPaths {
            html: dir.path().join("index.html"),
            schema_source: blocker.join("model.rs"),
            json_schema: None,
        };

        let report = write_artifacts(&compilation, &paths, false);
        assert!(!report.is_success());
        assert_eq!(report.failures.len(), 1);
        assert_eq!(report.failures[0].artifact(), Artifact::SchemaSource);
        assert_eq!(report.written, vec![(Artifact::HtmlDocument, paths.html.clone())]);
        assert!(paths.html.exists());
    }

    #[test]
    fn existing_files_are_kept_without_overwrite() {
        let dir = TempDir::new().expect("temp dir");
        let paths = OutputPaths::under(dir.path());
        let compilation = compile("input[Name] = x").unwrap();
        assert!(write_artifacts(&compilation, &paths, false).is_success());

        let again = write_artifacts(&compilation, &paths, false);
        assert_eq!(again.failures.len(), 2);
        assert!(matches!(again.failures[0], OutputError::Exists { .. }));

        assert!(write_artifacts(&compilation, &paths, true).is_success());
    }
}
