//! Build artifacts.
//!
//! A [`Dist`] is one compiled output file; [`Dists`] is the ordered
//! collection a build produces for a component. [`CompileResponse`] is the
//! envelope a compiler hands back — typed construction for in-process
//! compilers, [`CompileResponse::from_json`] for dynamically-typed plugin
//! payloads.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::component::SourceFile;
use crate::errors::ContractViolation;

// ─────────────────────────────────────────────────────────────────────────────
// Compiler output
// ─────────────────────────────────────────────────────────────────────────────

/// One file as returned by a compiler's compile capability.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct OutputFile {
    /// Path relative to the resolved dist directory.
    pub path: PathBuf,
    /// Base directory the path is resolved against.
    #[serde(default)]
    pub base: PathBuf,
    /// Raw file contents.
    pub contents: Vec<u8>,
}

impl OutputFile {
    /// Create an output file from a relative path and contents.
    #[must_use]
    pub fn new(path: impl Into<PathBuf>, contents: impl Into<Vec<u8>>) -> Self {
        Self {
            path: path.into(),
            base: PathBuf::new(),
            contents: contents.into(),
        }
    }

    /// Set the base directory.
    #[must_use]
    pub fn with_base(mut self, base: impl Into<PathBuf>) -> Self {
        self.base = base.into();
        self
    }
}

/// Response envelope of a compile invocation.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct CompileResponse {
    /// Output files in the order the compiler produced them.
    pub files: Vec<OutputFile>,
}

impl CompileResponse {
    /// Create a response from already-typed output files.
    #[must_use]
    pub fn new(files: Vec<OutputFile>) -> Self {
        Self { files }
    }

    /// Build a response from a dynamically-typed plugin payload.
    ///
    /// The payload must be an object carrying a `files` array; each entry
    /// must carry a string `path` and `contents` that are either a string or
    /// a byte array. Anything else is a contract violation attributed to
    /// `compiler`.
    pub fn from_json(compiler: &str, payload: &Value) -> Result<Self, ContractViolation> {
        let files = payload
            .as_object()
            .and_then(|object| object.get("files"))
            .and_then(Value::as_array)
            .ok_or_else(|| ContractViolation::MissingFiles {
                compiler: compiler.to_owned(),
            })?;

        files
            .iter()
            .map(|entry| Self::file_from_json(compiler, entry))
            .collect::<Result<Vec<_>, _>>()
            .map(Self::new)
    }

    fn file_from_json(compiler: &str, entry: &Value) -> Result<OutputFile, ContractViolation> {
        let invalid = |reason: &str| ContractViolation::InvalidFile {
            compiler: compiler.to_owned(),
            reason: reason.to_owned(),
        };

        let object = entry.as_object().ok_or_else(|| invalid("not an object"))?;
        let path = object
            .get("path")
            .and_then(Value::as_str)
            .ok_or_else(|| invalid("missing string 'path'"))?;
        let base = object.get("base").and_then(Value::as_str).unwrap_or("");

        let contents = match object.get("contents") {
            Some(Value::String(text)) => text.clone().into_bytes(),
            Some(Value::Array(bytes)) => bytes
                .iter()
                .map(|byte| {
                    byte.as_u64()
                        .and_then(|n| u8::try_from(n).ok())
                        .ok_or_else(|| invalid("byte array entry out of range"))
                })
                .collect::<Result<Vec<u8>, _>>()?,
            _ => return Err(invalid("missing 'contents'")),
        };

        Ok(OutputFile::new(path, contents).with_base(base))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// Dist / Dists
// ─────────────────────────────────────────────────────────────────────────────

/// One compiled output file of a component.
///
/// Immutable once constructed. Contents are stored as raw bytes; the
/// string-coercibility contract is enforced at construction from compiler
/// output, while identity builds copy source bytes verbatim.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Dist {
    /// Path relative to the dist base directory.
    pub path: PathBuf,
    /// Base directory the path is resolved against.
    #[serde(default)]
    pub base: PathBuf,
    /// File contents.
    pub contents: Vec<u8>,
}

impl Dist {
    /// Construct from a compiler output record, enforcing the string
    /// contract.
    ///
    /// Returns [`ContractViolation::NonTextContents`] when the contents are
    /// not valid UTF-8.
    pub fn from_output(file: OutputFile, compiler: &str) -> Result<Self, ContractViolation> {
        if std::str::from_utf8(&file.contents).is_err() {
            return Err(ContractViolation::NonTextContents {
                compiler: compiler.to_owned(),
                path: file.path.display().to_string(),
            });
        }
        Ok(Self {
            path: file.path,
            base: file.base,
            contents: file.contents,
        })
    }

    /// Construct from a source file, byte-for-byte (identity build).
    #[must_use]
    pub fn from_source(file: &SourceFile) -> Self {
        Self {
            path: file.path.clone(),
            base: file.base.clone(),
            contents: file.contents.clone(),
        }
    }

    /// Contents as text, when valid UTF-8.
    #[must_use]
    pub fn contents_utf8(&self) -> Option<&str> {
        std::str::from_utf8(&self.contents).ok()
    }

    /// Re-serialize into the compiler output record form.
    #[must_use]
    pub fn into_output(self) -> OutputFile {
        OutputFile {
            path: self.path,
            base: self.base,
            contents: self.contents,
        }
    }
}

/// Ordered collection of a component's build outputs.
///
/// Insertion order is compiler execution order. Replaced wholesale on every
/// successful build.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct Dists(Vec<Dist>);

impl Dists {
    /// Create from an ordered list of dists.
    #[must_use]
    pub fn new(dists: Vec<Dist>) -> Self {
        Self(dists)
    }

    /// Whether the collection holds no dists.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }

    /// Number of dists.
    #[must_use]
    pub fn len(&self) -> usize {
        self.0.len()
    }

    /// Iterate over the dists in order.
    pub fn iter(&self) -> std::slice::Iter<'_, Dist> {
        self.0.iter()
    }

    /// The dists as a slice.
    #[must_use]
    pub fn as_slice(&self) -> &[Dist] {
        &self.0
    }

    /// Serializable form.
    #[must_use]
    pub fn to_json(&self) -> Value {
        serde_json::to_value(self).unwrap_or(Value::Null)
    }
}

impl From<Vec<Dist>> for Dists {
    fn from(dists: Vec<Dist>) -> Self {
        Self(dists)
    }
}

impl FromIterator<Dist> for Dists {
    fn from_iter<I: IntoIterator<Item = Dist>>(iter: I) -> Self {
        Self(iter.into_iter().collect())
    }
}

impl IntoIterator for Dists {
    type Item = Dist;
    type IntoIter = std::vec::IntoIter<Dist>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.into_iter()
    }
}

impl<'a> IntoIterator for &'a Dists {
    type Item = &'a Dist;
    type IntoIter = std::slice::Iter<'a, Dist>;

    fn into_iter(self) -> Self::IntoIter {
        self.0.iter()
    }
}
