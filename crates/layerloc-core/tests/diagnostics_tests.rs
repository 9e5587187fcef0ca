use layerloc_core::{
    derive_id_or_empty, CatalogEntry, FileReference, LayerMetadata, Location, MemoryCatalog,
};
use serde::ser::Error as _;
use std::io;
use std::sync::{Arc, Mutex};

/// Shared buffer the test subscriber writes formatted events into.
#[derive(Clone, Default)]
struct LogBuffer(Arc<Mutex<Vec<u8>>>);

impl io::Write for LogBuffer {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.0.lock().unwrap().extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

/// Run `f` with a WARN-level subscriber and return everything it logged.
fn capture_warnings<T>(f: impl FnOnce() -> T) -> (T, String) {
    let buffer = LogBuffer::default();
    let writer = buffer.clone();
    let subscriber = tracing_subscriber::fmt()
        .with_writer(move || writer.clone())
        .with_max_level(tracing::Level::WARN)
        .with_ansi(false)
        .finish();

    let result = tracing::subscriber::with_default(subscriber, f);
    let output = String::from_utf8(buffer.0.lock().unwrap().clone()).unwrap();
    (result, output)
}

struct Unencodable;

impl serde::Serialize for Unencodable {
    fn serialize<S: serde::Serializer>(&self, _serializer: S) -> Result<S::Ok, S::Error> {
        Err(S::Error::custom("cannot encode"))
    }
}

#[test]
fn test_catalog_miss_logs_warning() {
    let (location, output) = capture_warnings(|| {
        Location::from_image("/bin/sh", FileReference::new(11, "/bin/dash"), &MemoryCatalog::new())
    });

    assert_eq!(location.file_system_id(), "");
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("unable to find file catalog entry"), "{output}");
    assert!(output.contains("/bin/dash"), "{output}");
}

#[test]
fn test_fingerprint_failure_logs_warning() {
    let (id, output) = capture_warnings(|| derive_id_or_empty(&Unencodable, "unencodable value"));

    assert!(id.is_empty());
    assert!(output.contains("WARN"), "{output}");
    assert!(output.contains("unable to get fingerprint"), "{output}");
    assert!(output.contains("cannot encode"), "{output}");
}

#[test]
fn test_catalog_hit_is_silent() {
    let reference = FileReference::new(12, "/bin/dash");
    let catalog = MemoryCatalog::new();
    catalog.insert(
        &reference,
        CatalogEntry::new(LayerMetadata::new(0, "sha256:aaa")),
    );

    let (location, output) = capture_warnings(|| Location::from_image("/bin/sh", reference, &catalog));
    assert_eq!(location.file_system_id(), "sha256:aaa");
    assert!(output.is_empty(), "{output}");
}
