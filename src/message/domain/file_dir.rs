//! File and directory references.
//!
//! Paths are carried as plain strings. They are never opened or checked for
//! existence here; a target may name a file that is yet to be created.

use serde_json::Value;

use super::{Timestamp, content::check_content_type, content_type, fields};
use crate::message::{error::ValidationError, ports::decoder::DecodeResult};

/// The single target a [`FileOrDirectory`] payload refers to.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FileTarget {
    /// One file.
    File(String),
    /// Several files.
    FileList(Vec<String>),
    /// One directory.
    Directory(String),
    /// Several directories.
    DirectoryList(Vec<String>),
}

impl FileTarget {
    /// Returns the JSON key this target is stored under.
    #[must_use]
    pub const fn field(&self) -> &'static str {
        match self {
            Self::File(_) => "file",
            Self::FileList(_) => "file_list",
            Self::Directory(_) => "directory",
            Self::DirectoryList(_) => "directory_list",
        }
    }

    fn to_json(&self) -> Value {
        match self {
            Self::File(path) | Self::Directory(path) => Value::String(path.clone()),
            Self::FileList(paths) | Self::DirectoryList(paths) => {
                Value::Array(paths.iter().cloned().map(Value::String).collect())
            }
        }
    }
}

/// A payload referring to at most one of a file, a file list, a directory,
/// or a directory list.
///
/// An empty payload is permitted and represents a target that is not yet
/// specified.
///
/// # Invariants
///
/// - At most one of the four targets is set; constructors and setters
///   reject a second one.
///
/// # Examples
///
/// ```
/// use insightful_messages::message::domain::FileOrDirectory;
///
/// let payload = FileOrDirectory::from_file("/path/to/filename.dcm");
/// assert_eq!(payload.file(), Some("/path/to/filename.dcm"));
///
/// let conflict = FileOrDirectory::new(
///     Some("/a.dcm".to_owned()),
///     None,
///     Some("/series".to_owned()),
///     None,
/// );
/// assert!(conflict.is_err());
/// ```
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct FileOrDirectory {
    target: Option<FileTarget>,
    timestamp: Option<Timestamp>,
}

impl FileOrDirectory {
    /// Creates a payload from the four optional targets.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MultipleExclusiveFields`] if more than one
    /// target is supplied.
    pub fn new(
        file: Option<String>,
        file_list: Option<Vec<String>>,
        directory: Option<String>,
        directory_list: Option<Vec<String>>,
    ) -> Result<Self, ValidationError> {
        let mut targets: Vec<FileTarget> = [
            file.map(FileTarget::File),
            file_list.map(FileTarget::FileList),
            directory.map(FileTarget::Directory),
            directory_list.map(FileTarget::DirectoryList),
        ]
        .into_iter()
        .flatten()
        .collect();

        if targets.len() > 1 {
            return Err(ValidationError::MultipleExclusiveFields {
                fields: targets.iter().map(FileTarget::field).collect(),
            });
        }

        Ok(Self {
            target: targets.pop(),
            timestamp: None,
        })
    }

    /// Creates a payload with no target.
    #[must_use]
    pub const fn empty() -> Self {
        Self {
            target: None,
            timestamp: None,
        }
    }

    /// Creates a payload referring to one file.
    #[must_use]
    pub fn from_file(path: impl Into<String>) -> Self {
        Self::from_target(FileTarget::File(path.into()))
    }

    /// Creates a payload referring to several files.
    #[must_use]
    pub fn from_file_list<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_target(FileTarget::FileList(
            paths.into_iter().map(Into::into).collect(),
        ))
    }

    /// Creates a payload referring to one directory.
    #[must_use]
    pub fn from_directory(path: impl Into<String>) -> Self {
        Self::from_target(FileTarget::Directory(path.into()))
    }

    /// Creates a payload referring to several directories.
    #[must_use]
    pub fn from_directory_list<I, S>(paths: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        Self::from_target(FileTarget::DirectoryList(
            paths.into_iter().map(Into::into).collect(),
        ))
    }

    const fn from_target(target: FileTarget) -> Self {
        Self {
            target: Some(target),
            timestamp: None,
        }
    }

    /// Sets the timestamp.
    #[must_use]
    pub fn with_timestamp(mut self, timestamp: impl Into<Timestamp>) -> Self {
        self.timestamp = Some(timestamp.into());
        self
    }

    /// Returns the target, if one is set.
    #[must_use]
    pub const fn target(&self) -> Option<&FileTarget> {
        self.target.as_ref()
    }

    /// Returns `true` if no target is set.
    #[must_use]
    pub const fn is_empty(&self) -> bool {
        self.target.is_none()
    }

    /// Returns the file path, if the target is a single file.
    #[must_use]
    pub fn file(&self) -> Option<&str> {
        match &self.target {
            Some(FileTarget::File(path)) => Some(path),
            _ => None,
        }
    }

    /// Returns the file paths, if the target is a file list.
    #[must_use]
    pub fn file_list(&self) -> Option<&[String]> {
        match &self.target {
            Some(FileTarget::FileList(paths)) => Some(paths),
            _ => None,
        }
    }

    /// Returns the directory path, if the target is a single directory.
    #[must_use]
    pub fn directory(&self) -> Option<&str> {
        match &self.target {
            Some(FileTarget::Directory(path)) => Some(path),
            _ => None,
        }
    }

    /// Returns the directory paths, if the target is a directory list.
    #[must_use]
    pub fn directory_list(&self) -> Option<&[String]> {
        match &self.target {
            Some(FileTarget::DirectoryList(paths)) => Some(paths),
            _ => None,
        }
    }

    /// Sets the target, replacing a target of the same kind.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError::MultipleExclusiveFields`] if a target of a
    /// different kind is already set; the payload is left unchanged.
    pub fn set_target(&mut self, target: FileTarget) -> Result<(), ValidationError> {
        if let Some(current) = &self.target {
            if current.field() != target.field() {
                return Err(ValidationError::MultipleExclusiveFields {
                    fields: vec![current.field(), target.field()],
                });
            }
        }
        self.target = Some(target);
        Ok(())
    }

    /// Sets a single file target.
    ///
    /// # Errors
    ///
    /// See [`FileOrDirectory::set_target`].
    pub fn set_file(&mut self, path: impl Into<String>) -> Result<(), ValidationError> {
        self.set_target(FileTarget::File(path.into()))
    }

    /// Sets a file list target.
    ///
    /// # Errors
    ///
    /// See [`FileOrDirectory::set_target`].
    pub fn set_file_list(&mut self, paths: Vec<String>) -> Result<(), ValidationError> {
        self.set_target(FileTarget::FileList(paths))
    }

    /// Sets a single directory target.
    ///
    /// # Errors
    ///
    /// See [`FileOrDirectory::set_target`].
    pub fn set_directory(&mut self, path: impl Into<String>) -> Result<(), ValidationError> {
        self.set_target(FileTarget::Directory(path.into()))
    }

    /// Sets a directory list target.
    ///
    /// # Errors
    ///
    /// See [`FileOrDirectory::set_target`].
    pub fn set_directory_list(&mut self, paths: Vec<String>) -> Result<(), ValidationError> {
        self.set_target(FileTarget::DirectoryList(paths))
    }

    /// Removes the target, whichever kind it is.
    pub fn clear(&mut self) {
        self.target = None;
    }

    /// Returns the timestamp, if any.
    #[must_use]
    pub const fn timestamp(&self) -> Option<&Timestamp> {
        self.timestamp.as_ref()
    }

    /// Replaces the timestamp.
    pub fn set_timestamp(&mut self, timestamp: Option<Timestamp>) {
        self.timestamp = timestamp;
    }

    /// Renders the canonical JSON object. Only the set target is written.
    #[must_use]
    pub fn to_json(&self) -> Value {
        let mut out = serde_json::Map::new();
        out.insert(
            "content_type".to_owned(),
            Value::String(content_type::FILEDIR.to_owned()),
        );
        Timestamp::write(self.timestamp.as_ref(), &mut out);
        if let Some(target) = &self.target {
            out.insert(target.field().to_owned(), target.to_json());
        }
        Value::Object(out)
    }

    /// Reconstructs a payload from its JSON object, reading whichever of
    /// the four targets is present.
    ///
    /// # Errors
    ///
    /// Returns a validation error if more than one target is present or a
    /// target has the wrong type.
    pub fn from_json(content: &Value) -> DecodeResult<Self> {
        let object = fields::object(content, "content")?;
        check_content_type(object, content_type::FILEDIR)?;
        let payload = Self::new(
            fields::optional_str(object, "file")?,
            fields::optional_str_list(object, "file_list")?,
            fields::optional_str(object, "directory")?,
            fields::optional_str_list(object, "directory_list")?,
        )?;
        Ok(Self {
            timestamp: Timestamp::read(object),
            ..payload
        })
    }
}
