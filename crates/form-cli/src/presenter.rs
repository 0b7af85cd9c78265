use form_spec::{Compilation, Diagnostic, WriteReport};

/// Controls how much of a compilation the CLI prints.
#[derive(Copy, Clone, Eq, PartialEq)]
pub enum Verbosity {
    /// Written paths and warnings only.
    Clean,
    /// Also the derived fields and page metadata.
    Verbose,
}

impl Verbosity {
    pub fn from_verbose(verbose: bool) -> Self {
        if verbose {
            Verbosity::Verbose
        } else {
            Verbosity::Clean
        }
    }

    pub fn is_verbose(&self) -> bool {
        matches!(self, Verbosity::Verbose)
    }
}

pub struct Presenter {
    verbosity: Verbosity,
}

impl Presenter {
    pub fn new(verbosity: Verbosity) -> Self {
        Self { verbosity }
    }

    pub fn show_warnings(&self, warnings: &[Diagnostic]) {
        for warning in warnings {
            println!("warning: {}", warning);
        }
    }

    pub fn show_summary(&self, compilation: &Compilation) {
        if !self.verbosity.is_verbose() {
            return;
        }
        print!("{}", describe(compilation));
    }

    pub fn show_report(&self, report: &WriteReport) {
        for (artifact, path) in &report.written {
            println!("Wrote {} to {}", artifact, path.display());
        }
        for failure in &report.failures {
            eprintln!("error: {}", failure);
        }
    }
}

/// Human readable description of what a definition compiles to.
pub fn describe(compilation: &Compilation) -> String {
    let metadata = &compilation.model.metadata;
    let mut lines = Vec::new();
    lines.push(format!("Page title: {}", display_or_none(&metadata.title)));
    lines.push(format!(
        "Description: {}",
        display_or_none(&metadata.description)
    ));
    lines.push(format!("Image: {}", display_or_none(&metadata.image)));
    lines.push(format!(
        "Password protected: {}",
        if compilation.password().is_empty() {
            "no"
        } else {
            "yes"
        }
    ));
    lines.push(format!("Answer fields ({}):", compilation.schema_fields.len()));
    for field in &compilation.schema_fields {
        lines.push(format!(" - {} ({})", field.json_key, field.identifier_name));
    }
    let mut text = lines.join("\n");
    text.push('\n');
    text
}

fn display_or_none(value: &str) -> &str {
    if value.is_empty() { "<none>" } else { value }
}
