//! HTTP upload service.
//!
//! Sends the multipart payload with `XmlHttpRequest` rather than `fetch`,
//! because only XHR exposes upload progress events. One POST per submit,
//! no retries, no timeout override; platform defaults apply.

use js_sys::Promise;
use thiserror::Error;
use wasm_bindgen::prelude::*;
use wasm_bindgen::JsCast;
use wasm_bindgen_futures::JsFuture;
use web_sys::{FormData, ProgressEvent, XmlHttpRequest};

use crate::config::{FILE_FIELD, UPLOAD_URL};
use crate::files::WebFile;

/// Metadata of a 2xx response. The body is opaque text.
#[derive(Clone, Debug)]
pub struct ResponseMeta {
    pub status: u16,
    pub status_text: String,
    pub body: Option<String>,
}

/// Why an upload failed.
#[derive(Clone, Debug, Error)]
pub enum UploadError {
    /// Network unreachable, timeout, or the request never left.
    #[error("HTTP request failed: {0}")]
    Transport(String),
    /// The server answered with a non-2xx status.
    #[error("Server error ({status})")]
    Server { status: u16, body: Option<String> },
}

impl UploadError {
    /// Text shown to the user: the server-provided message when there is
    /// one, otherwise a generic fallback.
    pub fn user_message(&self) -> String {
        match self {
            UploadError::Transport(_) => "Network issue".to_string(),
            UploadError::Server { status, body } => body
                .clone()
                .filter(|body| !body.is_empty())
                .unwrap_or_else(|| format!("Server error ({status})")),
        }
    }
}

/// Assemble the multipart payload, every candidate under the same field.
pub fn build_form_data(files: &[WebFile]) -> Result<FormData, UploadError> {
    let form = FormData::new()
        .map_err(|e| UploadError::Transport(format!("Failed to create FormData: {:?}", e)))?;
    for file in files {
        form.append_with_blob(FILE_FIELD, file.raw())
            .map_err(|e| UploadError::Transport(format!("Failed to append file: {:?}", e)))?;
    }
    Ok(form)
}

/// POST the payload to the fixed endpoint.
///
/// `on_progress` receives `(loaded, total)` for every transport progress
/// event with a computable length; it may fire many times per request.
/// Resolves with [`ResponseMeta`] on any 2xx status.
pub async fn send_files(
    form: &FormData,
    mut on_progress: impl FnMut(f64, f64) + 'static,
) -> Result<ResponseMeta, UploadError> {
    let xhr = XmlHttpRequest::new()
        .map_err(|e| UploadError::Transport(format!("Failed to create request: {:?}", e)))?;
    xhr.open_with_async("POST", UPLOAD_URL, true)
        .map_err(|e| UploadError::Transport(format!("Failed to open request: {:?}", e)))?;
    // The browser fills in the multipart/form-data content type with its
    // boundary; setting it by hand would break the payload.

    let upload = xhr
        .upload()
        .map_err(|e| UploadError::Transport(format!("Upload channel unavailable: {:?}", e)))?;
    // Every callback closure lives in a local until the request settles,
    // then the handlers are disconnected before the closures drop. No
    // per-request leak across retries.
    let onprogress = Closure::wrap(Box::new(move |event: ProgressEvent| {
        if event.length_computable() {
            on_progress(event.loaded(), event.total());
        }
    }) as Box<dyn FnMut(ProgressEvent)>);
    upload.set_onprogress(Some(onprogress.as_ref().unchecked_ref()));

    // Bridge the XHR completion events into an awaitable promise.
    let mut completion: Option<[Closure<dyn FnMut(web_sys::Event)>; 3]> = None;
    let done = Promise::new(&mut |resolve: js_sys::Function, reject: js_sys::Function| {
        let onload = Closure::once(move |_: web_sys::Event| {
            let _ = resolve.call0(&JsValue::NULL);
        });
        xhr.set_onload(Some(onload.as_ref().unchecked_ref()));

        let reject_err = reject.clone();
        let onerror = Closure::once(move |_: web_sys::Event| {
            let _ = reject_err.call1(&JsValue::NULL, &JsValue::from_str("network request failed"));
        });
        xhr.set_onerror(Some(onerror.as_ref().unchecked_ref()));

        let ontimeout = Closure::once(move |_: web_sys::Event| {
            let _ = reject.call1(&JsValue::NULL, &JsValue::from_str("request timed out"));
        });
        xhr.set_ontimeout(Some(ontimeout.as_ref().unchecked_ref()));

        completion = Some([onload, onerror, ontimeout]);
    });

    let outcome = match xhr
        .send_with_opt_form_data(Some(form))
        .map_err(|e| UploadError::Transport(format!("Failed to send request: {:?}", e)))
    {
        Ok(()) => JsFuture::from(done).await.map_err(|e| {
            UploadError::Transport(
                e.as_string()
                    .unwrap_or_else(|| "request failed".to_string()),
            )
        }),
        Err(err) => Err(err),
    };

    upload.set_onprogress(None);
    xhr.set_onload(None);
    xhr.set_onerror(None);
    xhr.set_ontimeout(None);
    drop(completion);
    drop(onprogress);

    outcome?;

    let status = xhr.status().unwrap_or(0);
    let body = xhr.response_text().ok().flatten().filter(|b| !b.is_empty());
    if (200..300).contains(&status) {
        Ok(ResponseMeta {
            status,
            status_text: xhr.status_text().unwrap_or_default(),
            body,
        })
    } else {
        Err(UploadError::Server { status, body })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn transport_failure_falls_back_to_generic_message() {
        let err = UploadError::Transport("network request failed".to_string());
        assert_eq!(err.user_message(), "Network issue");
        assert_eq!(err.to_string(), "HTTP request failed: network request failed");
    }

    #[test]
    fn server_failure_surfaces_the_body_when_present() {
        let err = UploadError::Server {
            status: 413,
            body: Some("payload too large".to_string()),
        };
        assert_eq!(err.user_message(), "payload too large");
    }

    #[test]
    fn server_failure_without_body_names_the_status() {
        let err = UploadError::Server {
            status: 500,
            body: Some(String::new()),
        };
        assert_eq!(err.user_message(), "Server error (500)");
    }
}
