//! Remote report database client.
//!
//! Two exchanges: a duplicate check keyed by the device description and a
//! multipart upload of the serialized report. The HTTP wire format matches
//! what the database already accepts, including the fixed `*****` multipart
//! boundary and answers carried in the HTTP reason phrase.
//!
//! Every call is bounded: the blocking request runs on a worker thread while
//! the caller polls a [`CancelToken`] and a deadline, and abandons the worker
//! when either fires.

use crate::model::ImplementationReport;
use crate::serializer;
use log::{debug, warn};
use std::fmt;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::mpsc::{self, RecvTimeoutError};
use std::thread;
use std::time::{Duration, Instant};

pub const DEFAULT_BASE_URL: &str = "https://opengles.gpuinfo.org";
pub const DEFAULT_TIMEOUT: Duration = Duration::from_secs(30);

const CHECK_ENDPOINT: &str = "gles_checkreport.php";
const REPORT_ENDPOINT: &str = "gles_generatereport.php";
const UPLOAD_ENDPOINT: &str = "gles_uploadreport.php";
const MULTIPART_BOUNDARY: &str = "*****";
const UPLOAD_FILENAME: &str = "glescapsviewerreport.xml";
const POLL_INTERVAL: Duration = Duration::from_millis(25);

/// Cooperative cancellation shared between a caller and in-flight requests.
#[derive(Debug, Clone, Default)]
pub struct CancelToken(Arc<AtomicBool>);

impl CancelToken {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn cancel(&self) {
        self.0.store(true, Ordering::SeqCst);
    }

    pub fn is_cancelled(&self) -> bool {
        self.0.load(Ordering::SeqCst)
    }
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Presence {
    Present { report_id: String, url: String },
    Absent,
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum UploadOutcome {
    Uploaded,
    Duplicate,
    /// Any other answer; the text is shown to the user as-is.
    Rejected(String),
}

/// Result of the check-then-upload flow.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Submission {
    /// The database already holds a report for this description.
    AlreadyPresent { url: String },
    Uploaded(UploadOutcome),
}

#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ServiceError {
    Transport(String),
    Cancelled,
    TimedOut(Duration),
    /// Serialization produced no document; nothing was sent.
    EmptyDocument,
    /// The request worker died without answering.
    WorkerLost,
}

impl fmt::Display for ServiceError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            ServiceError::Transport(message) => write!(f, "request failed: {message}"),
            ServiceError::Cancelled => write!(f, "request cancelled"),
            ServiceError::TimedOut(after) => {
                write!(f, "no response within {}s", after.as_secs())
            }
            ServiceError::EmptyDocument => {
                write!(f, "report serialization failed; nothing was uploaded")
            }
            ServiceError::WorkerLost => write!(f, "request worker exited without a response"),
        }
    }
}

impl std::error::Error for ServiceError {}

/// The remote database as seen by the uploader.
pub trait ReportService {
    fn check_present(&self, description: &str, cancel: &CancelToken)
    -> Result<Presence, ServiceError>;

    fn upload(&self, document: &str, cancel: &CancelToken) -> Result<UploadOutcome, ServiceError>;

    /// Landing page for "open database in browser".
    fn database_url(&self) -> String;
}

/// Check for an existing report and upload only when none is present.
pub fn submit_report<S: ReportService + ?Sized>(
    service: &S,
    report: &ImplementationReport,
    submitter: &str,
    cancel: &CancelToken,
) -> Result<Submission, ServiceError> {
    if let Presence::Present { url, report_id } =
        service.check_present(&report.description(), cancel)?
    {
        debug!("report {report_id} already present");
        return Ok(Submission::AlreadyPresent { url });
    }
    let document = serializer::serialize(report, submitter);
    if document.is_empty() {
        return Err(ServiceError::EmptyDocument);
    }
    service.upload(&document, cancel).map(Submission::Uploaded)
}

/// Interpret the duplicate-check reason phrase (`report_present <id>`).
pub fn parse_presence(base_url: &str, reason: &str) -> Presence {
    let mut parts = reason.split(' ');
    match (parts.next(), parts.next()) {
        (Some("report_present"), Some(id)) if !id.is_empty() => Presence::Present {
            url: report_url(base_url, id),
            report_id: id.to_string(),
        },
        _ => Presence::Absent,
    }
}

/// Interpret the upload answer.
pub fn parse_upload_outcome(message: &str) -> UploadOutcome {
    if message.contains("res_duplicate") {
        UploadOutcome::Duplicate
    } else if message.contains("res_uploaded") {
        UploadOutcome::Uploaded
    } else {
        UploadOutcome::Rejected(message.to_string())
    }
}

pub fn report_url(base_url: &str, report_id: &str) -> String {
    format!("{}/{REPORT_ENDPOINT}?reportID={report_id}", base_url.trim_end_matches('/'))
}

/// Multipart body for the upload endpoint.
pub fn multipart_body(document: &str) -> Vec<u8> {
    let mut body = String::with_capacity(document.len() + 160);
    body.push_str("--");
    body.push_str(MULTIPART_BOUNDARY);
    body.push_str("\r\n");
    body.push_str(&format!(
        "Content-Disposition: form-data; name=\"data\";filename=\"{UPLOAD_FILENAME}\"\r\n"
    ));
    body.push_str("\r\n");
    body.push_str(document);
    body.push_str("\r\n");
    body.push_str("--");
    body.push_str(MULTIPART_BOUNDARY);
    body.push_str("--\r\n");
    body.into_bytes()
}

/// Run `request` on a worker thread, returning early on cancel or deadline.
///
/// An abandoned worker finishes in the background; its answer is dropped.
pub fn run_bounded<T, F>(cancel: &CancelToken, timeout: Duration, request: F) -> Result<T, ServiceError>
where
    T: Send + 'static,
    F: FnOnce() -> Result<T, ServiceError> + Send + 'static,
{
    if cancel.is_cancelled() {
        return Err(ServiceError::Cancelled);
    }
    let (tx, rx) = mpsc::sync_channel(1);
    thread::Builder::new()
        .name("glescaps-request".to_string())
        .spawn(move || {
            let _ = tx.send(request());
        })
        .map_err(|err| ServiceError::Transport(format!("spawning request worker: {err}")))?;

    let deadline = Instant::now() + timeout;
    loop {
        match rx.recv_timeout(POLL_INTERVAL) {
            Ok(result) => return result,
            Err(RecvTimeoutError::Disconnected) => return Err(ServiceError::WorkerLost),
            Err(RecvTimeoutError::Timeout) => {
                if cancel.is_cancelled() {
                    return Err(ServiceError::Cancelled);
                }
                if Instant::now() >= deadline {
                    warn!("request abandoned after {}s", timeout.as_secs());
                    return Err(ServiceError::TimedOut(timeout));
                }
            }
        }
    }
}

/// [`ReportService`] over HTTP.
#[derive(Clone)]
pub struct HttpReportService {
    base_url: String,
    timeout: Duration,
    agent: ureq::Agent,
}

impl HttpReportService {
    pub fn new(base_url: impl Into<String>, timeout: Duration) -> Self {
        let base_url = base_url.into().trim_end_matches('/').to_string();
        let agent = ureq::AgentBuilder::new()
            .timeout_connect(timeout)
            .timeout(timeout)
            .build();
        Self {
            base_url,
            timeout,
            agent,
        }
    }

    pub fn base_url(&self) -> &str {
        &self.base_url
    }
}

/// Reason phrase and body of a response, whatever its status.
fn read_response(result: Result<ureq::Response, ureq::Error>) -> Result<(String, String), ServiceError> {
    let response = match result {
        Ok(response) => response,
        Err(ureq::Error::Status(code, response)) => {
            debug!("server answered HTTP {code}");
            response
        }
        Err(ureq::Error::Transport(transport)) => {
            return Err(ServiceError::Transport(transport.to_string()));
        }
    };
    let reason = response.status_text().to_string();
    let body = response
        .into_string()
        .map_err(|err| ServiceError::Transport(format!("reading response body: {err}")))?;
    Ok((reason, body))
}

impl ReportService for HttpReportService {
    fn check_present(
        &self,
        description: &str,
        cancel: &CancelToken,
    ) -> Result<Presence, ServiceError> {
        let agent = self.agent.clone();
        let base_url = self.base_url.clone();
        let url = format!("{base_url}/{CHECK_ENDPOINT}");
        let description = description.to_string();
        run_bounded(cancel, self.timeout, move || {
            let (reason, _) = read_response(agent.get(&url).query("description", &description).call())?;
            debug!("duplicate check answered {reason:?}");
            Ok(parse_presence(&base_url, &reason))
        })
    }

    fn upload(&self, document: &str, cancel: &CancelToken) -> Result<UploadOutcome, ServiceError> {
        if document.is_empty() {
            return Err(ServiceError::EmptyDocument);
        }
        let agent = self.agent.clone();
        let url = format!("{}/{UPLOAD_ENDPOINT}", self.base_url);
        let body = multipart_body(document);
        run_bounded(cancel, self.timeout, move || {
            let result = agent
                .post(&url)
                .set("Connection", "Keep-Alive")
                .set("ENCTYPE", "multipart/form-data")
                .set(
                    "Content-Type",
                    &format!("multipart/form-data;boundary={MULTIPART_BOUNDARY}"),
                )
                .set("name", UPLOAD_FILENAME)
                .send_bytes(&body);
            let (reason, text) = read_response(result)?;
            debug!("upload answered {reason:?}");
            // Some deployments put the result code in the body instead.
            match (parse_upload_outcome(&reason), parse_upload_outcome(&text)) {
                (UploadOutcome::Rejected(_), from_body @ (UploadOutcome::Uploaded | UploadOutcome::Duplicate)) => {
                    Ok(from_body)
                }
                (from_reason, _) => Ok(from_reason),
            }
        })
    }

    fn database_url(&self) -> String {
        self.base_url.clone()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::{DeviceProfile, EglInfo, GlInfo};
    use std::io::{BufRead, BufReader, Read, Write};
    use std::net::TcpListener;
    use std::sync::Mutex;

    /// Accept one connection, answer with `status_line`, return the raw request.
    fn one_shot_server(status_line: &'static str, body: &'static str) -> (String, thread::JoinHandle<Vec<u8>>) {
        let listener = TcpListener::bind("127.0.0.1:0").expect("bind");
        let base = format!("http://{}", listener.local_addr().expect("addr"));
        let handle = thread::spawn(move || {
            let (stream, _) = listener.accept().expect("accept");
            let mut reader = BufReader::new(stream);
            let mut request = Vec::new();
            let mut content_length = 0usize;
            loop {
                let mut line = String::new();
                reader.read_line(&mut line).expect("read header");
                request.extend_from_slice(line.as_bytes());
                let lower = line.to_ascii_lowercase();
                if let Some(value) = lower.strip_prefix("content-length:") {
                    content_length = value.trim().parse().expect("length");
                }
                if line == "\r\n" || line.is_empty() {
                    break;
                }
            }
            let mut payload = vec![0u8; content_length];
            reader.read_exact(&mut payload).expect("read body");
            request.extend_from_slice(&payload);
            let mut stream = reader.into_inner();
            write!(
                stream,
                "{status_line}\r\nContent-Length: {}\r\nConnection: close\r\n\r\n{body}",
                body.len()
            )
            .expect("write response");
            request
        });
        (base, handle)
    }

    fn report() -> ImplementationReport {
        let device = DeviceProfile {
            name: "Pixel 7".to_string(),
            os: "14".to_string(),
            ..DeviceProfile::default()
        };
        let gl = GlInfo {
            version: "OpenGL ES 3.2".to_string(),
            ..GlInfo::default()
        };
        ImplementationReport::new(gl, EglInfo::unavailable(), device)
    }

    #[test]
    fn presence_comes_from_reason_phrase() {
        assert_eq!(
            parse_presence("https://db.example", "report_present 4711"),
            Presence::Present {
                report_id: "4711".to_string(),
                url: "https://db.example/gles_generatereport.php?reportID=4711".to_string(),
            }
        );
        assert_eq!(parse_presence("https://db.example", "OK"), Presence::Absent);
        assert_eq!(parse_presence("https://db.example", "report_present"), Presence::Absent);
    }

    #[test]
    fn upload_codes_map_to_outcomes() {
        assert_eq!(parse_upload_outcome("res_duplicate"), UploadOutcome::Duplicate);
        assert_eq!(parse_upload_outcome("OK res_uploaded"), UploadOutcome::Uploaded);
        assert_eq!(
            parse_upload_outcome("invalid xml"),
            UploadOutcome::Rejected("invalid xml".to_string())
        );
    }

    #[test]
    fn multipart_body_is_byte_exact() {
        let body = multipart_body("<report/>");
        assert_eq!(
            String::from_utf8(body).expect("utf8"),
            "--*****\r\nContent-Disposition: form-data; name=\"data\";filename=\"glescapsviewerreport.xml\"\r\n\r\n<report/>\r\n--*****--\r\n"
        );
    }

    #[test]
    fn check_sends_encoded_description() {
        let (base, server) = one_shot_server("HTTP/1.1 200 report_present 99", "");
        let service = HttpReportService::new(base.as_str(), Duration::from_secs(5));
        let presence = service
            .check_present("Pixel 7 14 OpenGL ES 3.2", &CancelToken::new())
            .expect("check");
        assert_eq!(
            presence,
            Presence::Present {
                report_id: "99".to_string(),
                url: format!("{base}/gles_generatereport.php?reportID=99"),
            }
        );
        let request = String::from_utf8(server.join().expect("server")).expect("utf8");
        assert!(request.starts_with(
            "GET /gles_checkreport.php?description=Pixel+7+14+OpenGL+ES+3.2 HTTP/1.1\r\n"
        ));
    }

    #[test]
    fn upload_posts_multipart_with_legacy_headers() {
        let (base, server) = one_shot_server("HTTP/1.1 200 res_uploaded", "");
        let service = HttpReportService::new(base, Duration::from_secs(5));
        let outcome = service.upload("<report/>", &CancelToken::new()).expect("upload");
        assert_eq!(outcome, UploadOutcome::Uploaded);

        let request = String::from_utf8(server.join().expect("server")).expect("utf8");
        let lower = request.to_ascii_lowercase();
        assert!(request.starts_with("POST /gles_uploadreport.php HTTP/1.1\r\n"));
        assert!(lower.contains("content-type: multipart/form-data;boundary=*****\r\n"));
        assert!(lower.contains("enctype: multipart/form-data\r\n"));
        assert!(lower.contains("name: glescapsviewerreport.xml\r\n"));
        assert!(request.ends_with("\r\n\r\n<report/>\r\n--*****--\r\n"));
    }

    #[test]
    fn error_status_still_yields_reason() {
        let (base, server) = one_shot_server("HTTP/1.1 500 database offline", "");
        let service = HttpReportService::new(base, Duration::from_secs(5));
        let outcome = service.upload("<report/>", &CancelToken::new()).expect("upload");
        assert_eq!(outcome, UploadOutcome::Rejected("database offline".to_string()));
        server.join().expect("server");
    }

    #[test]
    fn cancelled_token_short_circuits() {
        let cancel = CancelToken::new();
        cancel.cancel();
        let result: Result<(), ServiceError> = run_bounded(&cancel, Duration::from_secs(5), || Ok(()));
        assert_eq!(result, Err(ServiceError::Cancelled));
    }

    #[test]
    fn hung_request_is_abandoned_at_deadline() {
        let started = Instant::now();
        let result: Result<(), ServiceError> =
            run_bounded(&CancelToken::new(), Duration::from_millis(100), || {
                thread::sleep(Duration::from_secs(5));
                Ok(())
            });
        assert_eq!(result, Err(ServiceError::TimedOut(Duration::from_millis(100))));
        assert!(started.elapsed() < Duration::from_secs(2));
    }

    #[test]
    fn cancel_interrupts_in_flight_wait() {
        let cancel = CancelToken::new();
        let remote = cancel.clone();
        thread::spawn(move || {
            thread::sleep(Duration::from_millis(50));
            remote.cancel();
        });
        let result: Result<(), ServiceError> = run_bounded(&cancel, Duration::from_secs(10), || {
            thread::sleep(Duration::from_secs(5));
            Ok(())
        });
        assert_eq!(result, Err(ServiceError::Cancelled));
    }

    #[derive(Default)]
    struct FakeService {
        present: Option<String>,
        uploads: Mutex<Vec<String>>,
    }

    impl ReportService for FakeService {
        fn check_present(&self, _: &str, _: &CancelToken) -> Result<Presence, ServiceError> {
            Ok(match &self.present {
                Some(id) => Presence::Present {
                    report_id: id.clone(),
                    url: report_url("https://db.example", id),
                },
                None => Presence::Absent,
            })
        }

        fn upload(&self, document: &str, _: &CancelToken) -> Result<UploadOutcome, ServiceError> {
            self.uploads.lock().expect("lock").push(document.to_string());
            Ok(UploadOutcome::Uploaded)
        }

        fn database_url(&self) -> String {
            "https://db.example".to_string()
        }
    }

    #[test]
    fn present_report_is_not_uploaded_again() {
        let service = FakeService {
            present: Some("12".to_string()),
            ..FakeService::default()
        };
        let outcome = submit_report(&service, &report(), "", &CancelToken::new()).expect("submit");
        assert_eq!(
            outcome,
            Submission::AlreadyPresent {
                url: "https://db.example/gles_generatereport.php?reportID=12".to_string()
            }
        );
        assert!(service.uploads.lock().expect("lock").is_empty());
    }

    #[test]
    fn absent_report_uploads_serialized_document() {
        let service = FakeService::default();
        let outcome = submit_report(&service, &report(), "alice", &CancelToken::new()).expect("submit");
        assert_eq!(outcome, Submission::Uploaded(UploadOutcome::Uploaded));
        let uploads = service.uploads.lock().expect("lock");
        assert_eq!(uploads.len(), 1);
        assert!(uploads[0].contains("submitter=\"alice\""));
    }
}
