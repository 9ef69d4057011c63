//! Request descriptors
//!
//! A [`RequestDescriptor`] captures everything needed to (re)send one call:
//! the dispatcher may send it twice when a token refresh succeeds, so bodies
//! are kept in a form that can be rebuilt for every attempt.

use reqwest::multipart::{Form, Part};
use reqwest::Method;
use serde_json::Value;

/// Body of a request
#[derive(Debug, Clone)]
pub enum RequestBody {
    Json(Value),
    Multipart(MultipartForm),
}

/// One call to the backend, relative to the configured base URL unless the
/// endpoint is an absolute `http(s)` URL.
#[derive(Debug, Clone)]
pub struct RequestDescriptor {
    pub endpoint: String,
    pub method: Method,
    pub body: Option<RequestBody>,
    pub headers: Vec<(String, String)>,
    pub skip_auth: bool,
}

impl RequestDescriptor {
    pub fn new(method: Method, endpoint: impl Into<String>) -> Self {
        Self { endpoint: endpoint.into(), method, body: None, headers: Vec::new(), skip_auth: false }
    }

    pub fn get(endpoint: impl Into<String>) -> Self {
        Self::new(Method::GET, endpoint)
    }

    pub fn post(endpoint: impl Into<String>) -> Self {
        Self::new(Method::POST, endpoint)
    }

    pub fn put(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PUT, endpoint)
    }

    pub fn patch(endpoint: impl Into<String>) -> Self {
        Self::new(Method::PATCH, endpoint)
    }

    pub fn delete(endpoint: impl Into<String>) -> Self {
        Self::new(Method::DELETE, endpoint)
    }

    /// Attach a JSON body. Ignored on `GET`.
    pub fn json(mut self, body: Value) -> Self {
        self.body = Some(RequestBody::Json(body));
        self
    }

    pub fn multipart(mut self, form: MultipartForm) -> Self {
        self.body = Some(RequestBody::Multipart(form));
        self
    }

    /// Add a caller header. `Content-Type` and `Authorization` set by the
    /// dispatcher take precedence.
    pub fn header(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.headers.push((name.into(), value.into()));
        self
    }

    pub fn skip_auth(mut self) -> Self {
        self.skip_auth = true;
        self
    }

    pub fn is_form_data(&self) -> bool {
        matches!(self.body, Some(RequestBody::Multipart(_)))
    }
}

#[derive(Debug, Clone)]
enum FormField {
    Text { name: String, value: String },
    File { name: String, file_name: String, mime: String, bytes: Vec<u8> },
}

/// Buffered multipart form that can produce a fresh [`Form`] per attempt
#[derive(Debug, Clone, Default)]
pub struct MultipartForm {
    fields: Vec<FormField>,
}

impl MultipartForm {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn text(mut self, name: impl Into<String>, value: impl Into<String>) -> Self {
        self.fields.push(FormField::Text { name: name.into(), value: value.into() });
        self
    }

    pub fn file(
        mut self,
        name: impl Into<String>,
        file_name: impl Into<String>,
        mime: impl Into<String>,
        bytes: Vec<u8>,
    ) -> Self {
        self.fields.push(FormField::File {
            name: name.into(),
            file_name: file_name.into(),
            mime: mime.into(),
            bytes,
        });
        self
    }

    /// Value of a text field, mostly useful in tests and logs
    pub fn text_value(&self, name: &str) -> Option<&str> {
        self.fields.iter().find_map(|field| match field {
            FormField::Text { name: field_name, value } if field_name == name => {
                Some(value.as_str())
            }
            _ => None,
        })
    }

    pub fn len(&self) -> usize {
        self.fields.len()
    }

    pub fn is_empty(&self) -> bool {
        self.fields.is_empty()
    }

    /// Build the `reqwest` form.
    ///
    /// A part whose MIME type does not parse is sent without one.
    pub fn to_form(&self) -> Form {
        self.fields.iter().fold(Form::new(), |form, field| match field {
            FormField::Text { name, value } => form.text(name.clone(), value.clone()),
            FormField::File { name, file_name, mime, bytes } => {
                let part = Part::bytes(bytes.clone()).file_name(file_name.clone());
                let part = match part.mime_str(mime) {
                    Ok(typed) => typed,
                    Err(_) => Part::bytes(bytes.clone()).file_name(file_name.clone()),
                };
                form.part(name.clone(), part)
            }
        })
    }
}
