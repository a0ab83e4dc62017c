//! Help resource index
//!
//! Tracks staged help files and renders two documents from them: an HTML
//! index for browsing and a markdown overview for the SDK docs tree. Both are
//! pure functions of the current entries, which are rebuilt wholesale on
//! every [`ResourceIndex::build`].

use std::collections::HashMap;
use std::path::{Path, PathBuf};

use serde::Serialize;
use tera::{Context, Tera};
use tracing::{debug, info};

use crate::error::IndexError;
use crate::manifest::Manifest;
use crate::sync::StagedArtifact;

const INDEX_TEMPLATE: &str = "help_index.html";
const DOCUMENTATION_TEMPLATE: &str = "help_documentation.md";
const INDEX_TITLE: &str = "ALPHACAM SDK Help Index";

/// File name of the rendered HTML index inside `<workspace>/help/`
pub const INDEX_FILE_NAME: &str = "help_index.html";

/// Location of the rendered markdown relative to the workspace root
pub const DOCUMENTATION_PATH: &[&str] = &["docs", "help", "HELP_DOCUMENTATION.md"];

/// A staged help file
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct DocEntry {
    pub name: String,
    pub workspace_path: PathBuf,
    pub description: Option<String>,
}

impl DocEntry {
    /// File name without its extension
    pub fn display_name(&self) -> &str {
        Path::new(&self.name)
            .file_stem()
            .and_then(|s| s.to_str())
            .unwrap_or(&self.name)
    }
}

/// Paths written by [`ResourceIndex::write_outputs`]
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RenderedOutputs {
    pub index_path: PathBuf,
    pub documentation_path: PathBuf,
}

#[derive(Serialize)]
struct EntryContext<'a> {
    display_name: &'a str,
    file_name: &'a str,
    path: String,
    description: Option<&'a str>,
}

/// Ordered collection of staged help files
pub struct ResourceIndex {
    descriptions: HashMap<String, String>,
    entries: Vec<DocEntry>,
    tera: Tera,
}

impl ResourceIndex {
    /// Create an empty index; descriptions are taken from `manifest`
    pub fn new(manifest: &Manifest) -> Result<Self, IndexError> {
        let mut tera = Tera::default();
        tera.add_raw_template(INDEX_TEMPLATE, include_str!("templates/help_index.html.tera"))?;
        tera.add_raw_template(
            DOCUMENTATION_TEMPLATE,
            include_str!("templates/help_documentation.md.tera"),
        )?;

        let descriptions = manifest
            .entries()
            .iter()
            .filter_map(|e| e.description.clone().map(|d| (e.name.clone(), d)))
            .collect();

        Ok(Self {
            descriptions,
            entries: Vec::new(),
            tera,
        })
    }

    /// Replace every entry with `staged`, keeping its order
    pub fn build(&mut self, staged: &[StagedArtifact]) {
        self.entries = staged
            .iter()
            .map(|artifact| DocEntry {
                name: artifact.name.clone(),
                workspace_path: artifact.path.clone(),
                description: self.descriptions.get(&artifact.name).cloned(),
            })
            .collect();
        debug!("Resource index holds {} help file(s)", self.entries.len());
    }

    /// Workspace path of a staged help file
    pub fn get(&self, name: &str) -> Option<&Path> {
        self.entries
            .iter()
            .find(|e| e.name == name)
            .map(|e| e.workspace_path.as_path())
    }

    pub fn all(&self) -> &[DocEntry] {
        &self.entries
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Render the HTML help index
    pub fn render_index_document(&self) -> Result<String, IndexError> {
        let mut context = self.context();
        context.insert("title", INDEX_TITLE);
        Ok(self.tera.render(INDEX_TEMPLATE, &context)?)
    }

    /// Render the markdown help overview
    pub fn render_documentation(&self) -> Result<String, IndexError> {
        Ok(self.tera.render(DOCUMENTATION_TEMPLATE, &self.context())?)
    }

    /// Write both rendered documents under `workspace_root`
    pub async fn write_outputs(&self, workspace_root: &Path) -> Result<RenderedOutputs, IndexError> {
        let index_path = workspace_root.join("help").join(INDEX_FILE_NAME);
        let documentation_path = DOCUMENTATION_PATH
            .iter()
            .fold(workspace_root.to_path_buf(), |path, part| path.join(part));

        write_file(&index_path, self.render_index_document()?).await?;
        write_file(&documentation_path, self.render_documentation()?).await?;

        info!(
            "Wrote help index {} and documentation {}",
            index_path.display(),
            documentation_path.display()
        );

        Ok(RenderedOutputs {
            index_path,
            documentation_path,
        })
    }

    fn context(&self) -> Context {
        let entries: Vec<EntryContext<'_>> = self
            .entries
            .iter()
            .map(|e| EntryContext {
                display_name: e.display_name(),
                file_name: &e.name,
                path: e.workspace_path.display().to_string(),
                description: e.description.as_deref(),
            })
            .collect();

        let mut context = Context::new();
        context.insert("entries", &entries);
        context
    }
}

impl std::fmt::Debug for ResourceIndex {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("ResourceIndex")
            .field("entries", &self.entries)
            .finish()
    }
}

async fn write_file(path: &Path, contents: String) -> Result<(), IndexError> {
    if let Some(parent) = path.parent() {
        tokio::fs::create_dir_all(parent)
            .await
            .map_err(|source| IndexError::Write {
                path: parent.to_path_buf(),
                source,
            })?;
    }
    tokio::fs::write(path, contents)
        .await
        .map_err(|source| IndexError::Write {
            path: path.to_path_buf(),
            source,
        })
}
