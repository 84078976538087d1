//! Multipart upload parsing.
//!
//! A multipart body carries an optional `json` part, parsed with a regular
//! parser, next to uploaded files. The web framework is expected to have
//! split the body into [`Part`]s already.

use bytes::Bytes;
use serde_json::{json, Value};

use crate::error::{ErrorCode, ParseError, SimpleParseError};
use crate::interop::SchemaContext;
use crate::location::Segment;
use crate::parser::Parser;

/// Name of the part holding the JSON payload.
pub const JSON_PART: &str = "json";

/// A file received in a multipart body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct UploadedFile {
    pub filename: Option<String>,
    pub content_type: Option<String>,
    pub data: Bytes,
}

impl UploadedFile {
    pub fn new(filename: impl Into<String>, data: impl Into<Bytes>) -> Self {
        Self {
            filename: Some(filename.into()),
            content_type: None,
            data: data.into(),
        }
    }

    pub fn with_content_type(mut self, content_type: impl Into<String>) -> Self {
        self.content_type = Some(content_type.into());
        self
    }

    fn has_filename(&self) -> bool {
        self.filename.as_deref().is_some_and(|name| !name.is_empty())
    }
}

/// The body of one part.
#[derive(Debug, Clone, PartialEq)]
pub enum PartContent {
    /// Already decoded JSON.
    Json(Value),
    /// A plain form value.
    Text(String),
    File(UploadedFile),
}

#[derive(Debug, Clone, PartialEq)]
pub struct Part {
    pub name: String,
    pub content: PartContent,
}

/// The parts of a multipart body, in submission order.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct MultipartForm {
    parts: Vec<Part>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn push(&mut self, name: impl Into<String>, content: PartContent) {
        self.parts.push(Part {
            name: name.into(),
            content,
        });
    }

    /// Adds a decoded `json` part.
    pub fn json(mut self, value: Value) -> Self {
        self.push(JSON_PART, PartContent::Json(value));
        self
    }

    /// Adds a text part.
    pub fn text(mut self, name: impl Into<String>, text: impl Into<String>) -> Self {
        self.push(name, PartContent::Text(text.into()));
        self
    }

    /// Adds a file part.
    pub fn file(mut self, name: impl Into<String>, file: UploadedFile) -> Self {
        self.push(name, PartContent::File(file));
        self
    }

    pub fn parts(&self) -> &[Part] {
        &self.parts
    }

    fn named<'a>(&'a self, name: &'a str) -> impl Iterator<Item = &'a PartContent> + 'a {
        self.parts
            .iter()
            .filter(move |part| part.name == name)
            .map(|part| &part.content)
    }
}

impl FromIterator<Part> for MultipartForm {
    fn from_iter<I: IntoIterator<Item = Part>>(iter: I) -> Self {
        Self {
            parts: iter.into_iter().collect(),
        }
    }
}

/// The result of a multipart parse.
#[derive(Debug, Clone, PartialEq)]
pub struct Upload<T> {
    /// The parsed `json` part, if one was sent.
    pub json: Option<T>,
    /// Files under the configured field, in submission order.
    pub files: Vec<UploadedFile>,
}

impl<T> Upload<T> {
    /// Returns the first file, the only one in single mode.
    pub fn file(&self) -> Option<&UploadedFile> {
        self.files.first()
    }
}

/// Parses a `json` part plus file parts under one field name.
///
/// Files without a filename (an empty file input) are skipped. In single mode
/// only the first remaining file is kept.
///
/// # Example
///
/// ```rust
/// use reqshape::multipart::{MultipartForm, MultipartUpload, UploadedFile};
/// use reqshape::Shape;
/// use serde_json::json;
///
/// let upload = MultipartUpload::new(Shape::lookup(Shape::string()), "avatar");
/// let form = MultipartForm::new()
///     .json(json!({"caption": "me"}))
///     .file("avatar", UploadedFile::new("me.png", &b"\x89PNG"[..]));
///
/// let parsed = upload.try_parse(&form).unwrap();
/// assert_eq!(parsed.file().unwrap().filename.as_deref(), Some("me.png"));
/// assert_eq!(parsed.json.as_ref().unwrap()["caption"], "me");
/// ```
#[derive(Debug, Clone)]
pub struct MultipartUpload<P> {
    inner: P,
    file_field: String,
    multiple: bool,
}

impl<P: Parser> MultipartUpload<P> {
    pub fn new(inner: P, file_field: impl Into<String>) -> Self {
        Self {
            inner,
            file_field: file_field.into(),
            multiple: false,
        }
    }

    /// Accepts any number of files under the field.
    pub fn multiple(mut self) -> Self {
        self.multiple = true;
        self
    }

    pub fn file_field(&self) -> &str {
        &self.file_field
    }

    pub fn is_multiple(&self) -> bool {
        self.multiple
    }

    /// Parses the `json` part and collects the uploaded files.
    ///
    /// Only the `json` part can fail; its errors are located under `json`.
    pub fn try_parse(&self, form: &MultipartForm) -> Result<Upload<P::Output>, ParseError> {
        let json = form
            .named(JSON_PART)
            .next()
            .map(|content| self.parse_json(content))
            .transpose()
            .map_err(|e| e.add_location(Segment::key(JSON_PART)))?;

        let files = form
            .named(&self.file_field)
            .filter_map(|content| match content {
                PartContent::File(file) if file.has_filename() => Some(file.clone()),
                _ => None,
            })
            .take(if self.multiple { usize::MAX } else { 1 })
            .collect();

        Ok(Upload { json, files })
    }

    fn parse_json(&self, content: &PartContent) -> Result<P::Output, ParseError> {
        let decoded = match content {
            PartContent::Json(value) => return self.inner.try_parse(value),
            PartContent::Text(text) => decode(text.as_bytes()),
            PartContent::File(file) => decode(&file.data),
        };
        self.inner.try_parse(&decoded?)
    }

    pub fn to_open_api(&self, _ctx: &mut SchemaContext) -> Value {
        let file = json!({"type": "string", "format": "binary"});
        let files = if self.multiple {
            json!({"type": "array", "items": file})
        } else {
            file
        };
        json!({
            "type": "object",
            "properties": {
                JSON_PART: {"type": "object"},
                self.file_field.as_str(): files,
            },
            "required": [JSON_PART],
        })
    }

    pub fn describe(&self) -> String {
        let files = if self.multiple { "List[file]" } else { "file" };
        format!(
            "MultipartUpload[json: {}, {}: {}]",
            self.inner.describe(),
            self.file_field,
            files
        )
    }
}

fn decode(bytes: &[u8]) -> Result<Value, ParseError> {
    serde_json::from_slice(bytes).map_err(|e| {
        let text = String::from_utf8_lossy(bytes);
        SimpleParseError::new("JSON", &Value::String(text.into_owned()))
            .with_code(ErrorCode::InvalidFormat)
            .with_detail(format!("is not valid JSON ({e})"))
            .into()
    })
}
