use anyhow::Context;
use lambda_http::http::header::{ACCEPT, CONTENT_TYPE};
use lambda_http::{run, service_fn, tracing, Body, Error, Request, Response};
use parking_lot::Mutex;
use retrofit_savings::output::{Output, SinkOutput};
use retrofit_savings::{run_project, CalculationResults, ProjectFlags};
use serde_json::json;
use std::io;
use std::io::{ErrorKind, Write};
use std::str::from_utf8;
use std::sync::Arc;
use uuid::Uuid;

async fn function_handler(event: Request) -> Result<Response<Body>, Error> {
    let input = match request_body(&event) {
        Ok(input) => input.as_bytes(),
        Err(e) => return error_response(e),
    };

    let wants_csv = event
        .headers()
        .get(ACCEPT)
        .and_then(|accept| accept.to_str().ok())
        .is_some_and(|accept| accept.contains("text/csv"));
    let flags = ProjectFlags::DEFAULT_SCENARIO | ProjectFlags::DETAILED_OUTPUT;

    let result: anyhow::Result<Body> = if wants_csv {
        let output = LambdaOutput::new();
        run_project(input, &output, &flags)
            .map(|_| Body::from(output))
            .map_err(anyhow::Error::from)
    } else {
        run_project(input, SinkOutput, &flags)
            .map_err(anyhow::Error::from)
            .and_then(|results: CalculationResults| Ok(serde_json::to_string(&results)?.into()))
    };

    let resp = match result {
        Ok(body) => Response::builder()
            .status(200)
            .header(
                CONTENT_TYPE,
                if wants_csv { "text/csv" } else { "application/json" },
            )
            .body(body)
            .map_err(Box::new)?,
        Err(e) => return error_response(e),
    };

    Ok(resp)
}

fn request_body(event: &Request) -> anyhow::Result<&str> {
    match event.body() {
        Body::Empty => Ok(""),
        Body::Text(text) => Ok(text.as_str()),
        Body::Binary(bytes) => from_utf8(bytes).context("Request body is not valid UTF-8"),
    }
}

fn error_response(e: anyhow::Error) -> Result<Response<Body>, Error> {
    Ok(Response::builder()
        .status(422)
        .header(CONTENT_TYPE, "application/json")
        .body(Body::from(serde_json::to_string(&json!({"errors": [{"id": Uuid::new_v4(), "status": "422", "detail": e.to_string()}]}))?))
        .map_err(Box::new)?)
}

#[tokio::main]
async fn main() -> Result<(), Error> {
    tracing::init_default_subscriber();

    run(service_fn(function_handler)).await
}

/// This output uses a shared string that individual "file" writers (the FileLikeStringWriter type)
/// can write to - this string can then be used as the response body for the Lambda.
#[derive(Debug)]
struct LambdaOutput(Arc<Mutex<String>>);

impl LambdaOutput {
    fn new() -> Self {
        Self(Arc::new(Mutex::new(String::with_capacity(
            // four small CSV reports
            2usize.pow(12),
        ))))
    }
}

impl Output for &LambdaOutput {
    fn writer_for_location_key(
        &self,
        location_key: &str,
        file_extension: &str,
    ) -> anyhow::Result<impl Write> {
        Ok(FileLikeStringWriter::new(
            self.0.clone(),
            location_key,
            file_extension,
        ))
    }
}

impl From<LambdaOutput> for Body {
    fn from(value: LambdaOutput) -> Self {
        let string = Arc::try_unwrap(value.0)
            .map(|mutex| mutex.into_inner())
            .unwrap_or_else(|shared| shared.lock().clone());
        string.into()
    }
}

/// Represents a writer for an individual "file".
struct FileLikeStringWriter {
    string: Arc<Mutex<String>>,
    location_key: String,
    file_extension: String,
    has_output_file_header: bool,
}

impl FileLikeStringWriter {
    fn new(string: Arc<Mutex<String>>, location_key: &str, file_extension: &str) -> Self {
        Self {
            string,
            location_key: location_key.to_string(),
            file_extension: file_extension.to_string(),
            has_output_file_header: false,
        }
    }
}

impl Write for FileLikeStringWriter {
    /// Writes out bytes to this "file" (part of the wider LambdaOutput string), making sure there is
    /// a human-readable header at the start of the file so a human can know which report each part
    /// of the output is.
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        if !self.has_output_file_header {
            let mut output_string = self.string.lock();
            if !output_string.is_empty() {
                output_string.push_str("\n\n");
            }
            output_string.push_str(
                format!(
                    "Writing out file '{}.{}':\n\n",
                    self.location_key, self.file_extension
                )
                .as_str(),
            );
            self.has_output_file_header = true;
        }
        let utf8 = match from_utf8(buf) {
            Ok(utf8) => utf8,
            Err(_) => {
                return Err(io::Error::new(
                    ErrorKind::InvalidData,
                    "Tried to write out invalid UTF-8.",
                ));
            }
        };
        self.string.lock().push_str(utf8);
        Ok(utf8.len())
    }

    fn flush(&mut self) -> std::io::Result<()> {
        Ok(())
    }
}
