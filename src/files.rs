//! Browser file handles and preview resources.
//!
//! [`WebFile`] wraps a [`web_sys::File`] together with the object URL used
//! for its thumbnail. The URL is acquired once at selection time and
//! revoked when the last handle is dropped, so removing a candidate,
//! clearing the list or unmounting the view always releases it.

use std::rc::Rc;

use web_sys::{Blob, File, Url};

use crate::controller::FileLike;

/// Scoped object URL. Revoked on drop.
pub struct ObjectUrl {
    url: String,
}

impl ObjectUrl {
    pub fn for_blob(blob: &Blob) -> Option<Self> {
        match Url::create_object_url_with_blob(blob) {
            Ok(url) => Some(Self { url }),
            Err(e) => {
                log::warn!("Failed to create object URL: {:?}", e);
                None
            }
        }
    }

    pub fn as_str(&self) -> &str {
        &self.url
    }
}

impl Drop for ObjectUrl {
    fn drop(&mut self) {
        let _ = Url::revoke_object_url(&self.url);
    }
}

/// A selected file plus its preview resource.
///
/// Cheap to clone: the browser `File` is a JS handle and the preview URL
/// is shared behind an `Rc`, so render snapshots never keep a revoked URL
/// alive on their own.
#[derive(Clone)]
pub struct WebFile {
    file: File,
    preview: Option<Rc<ObjectUrl>>,
}

impl WebFile {
    /// Wrap a browser file, acquiring a preview URL for images.
    pub fn new(file: File) -> Self {
        let preview = if file.type_().starts_with("image/") {
            ObjectUrl::for_blob(&file).map(Rc::new)
        } else {
            None
        };
        Self { file, preview }
    }

    /// Object URL for the thumbnail, when the file is an image.
    pub fn preview_url(&self) -> Option<String> {
        self.preview.as_ref().map(|url| url.as_str().to_string())
    }

    /// The underlying browser file, for multipart assembly.
    pub fn raw(&self) -> &File {
        &self.file
    }
}

impl FileLike for WebFile {
    fn name(&self) -> String {
        self.file.name()
    }

    fn mime(&self) -> String {
        self.file.type_()
    }

    fn size(&self) -> u64 {
        self.file.size() as u64
    }
}
