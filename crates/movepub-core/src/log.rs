//! Logging setup.
//!
//! Installs a `tracing-subscriber` fmt subscriber whose writer sends each
//! formatted line to the browser console, picking `console.error`,
//! `console.warn`, `console.info` or `console.debug` from the event level.
//! Native builds (tests) write to stderr instead.

use std::io;
use std::sync::Once;

use tracing::{Level, Metadata};
use tracing_subscriber::fmt::MakeWriter;

/// Buffers one formatted event and emits it when dropped.
pub struct ConsoleWriter {
    level: Level,
    buffer: Vec<u8>,
}

impl io::Write for ConsoleWriter {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.buffer.extend_from_slice(buf);
        Ok(buf.len())
    }

    fn flush(&mut self) -> io::Result<()> {
        Ok(())
    }
}

impl Drop for ConsoleWriter {
    fn drop(&mut self) {
        let line = String::from_utf8_lossy(&self.buffer);
        let line = line.trim_end();
        if !line.is_empty() {
            emit(self.level, line);
        }
    }
}

#[cfg(target_arch = "wasm32")]
fn emit(level: Level, line: &str) {
    let value = wasm_bindgen::JsValue::from_str(line);
    match level {
        Level::ERROR => web_sys::console::error_1(&value),
        Level::WARN => web_sys::console::warn_1(&value),
        Level::INFO => web_sys::console::info_1(&value),
        _ => web_sys::console::debug_1(&value),
    }
}

#[cfg(not(target_arch = "wasm32"))]
fn emit(_level: Level, line: &str) {
    eprintln!("{}", line);
}

/// [`MakeWriter`] producing a [`ConsoleWriter`] per event.
#[derive(Clone, Copy, Debug, Default)]
pub struct ConsoleMakeWriter;

impl<'a> MakeWriter<'a> for ConsoleMakeWriter {
    type Writer = ConsoleWriter;

    fn make_writer(&'a self) -> Self::Writer {
        ConsoleWriter {
            level: Level::INFO,
            buffer: Vec::new(),
        }
    }

    fn make_writer_for(&'a self, meta: &Metadata<'_>) -> Self::Writer {
        ConsoleWriter {
            level: *meta.level(),
            buffer: Vec::new(),
        }
    }
}

/// Install the console subscriber at `level`.
///
/// Returns `false` if a global subscriber was already set.
pub fn init(level: Level) -> bool {
    tracing_subscriber::fmt()
        .with_writer(ConsoleMakeWriter)
        .with_max_level(level)
        .without_time()
        .with_ansi(false)
        .with_target(false)
        .try_init()
        .is_ok()
}

static TEST_LOGGING_INIT: Once = Once::new();

/// Debug-level logging for tests; safe to call from every test.
pub fn init_for_tests() {
    TEST_LOGGING_INIT.call_once(|| {
        init(Level::DEBUG);
    });
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::io::Write;
    use std::sync::{Arc, Mutex};

    use tracing::{Event, Subscriber};
    use tracing_subscriber::layer::{Context, Layer, SubscriberExt};

    /// Records the writer level chosen for each event.
    struct LevelRecorder {
        seen: Arc<Mutex<Vec<Level>>>,
    }

    impl<S: Subscriber> Layer<S> for LevelRecorder {
        fn on_event(&self, event: &Event<'_>, _ctx: Context<'_, S>) {
            let writer = ConsoleMakeWriter.make_writer_for(event.metadata());
            self.seen.lock().unwrap().push(writer.level);
        }
    }

    #[test]
    fn test_writer_level_follows_event() {
        let seen = Arc::new(Mutex::new(Vec::new()));
        let subscriber = tracing_subscriber::registry().with(LevelRecorder { seen: seen.clone() });
        tracing::subscriber::with_default(subscriber, || {
            tracing::warn!("compile request failed");
            tracing::error!("publish failed");
            tracing::info!("collected package");
        });
        assert_eq!(*seen.lock().unwrap(), vec![Level::WARN, Level::ERROR, Level::INFO]);
    }

    #[test]
    fn test_writer_buffers_until_dropped() {
        let mut writer = ConsoleMakeWriter.make_writer();
        assert_eq!(writer.level, Level::INFO);
        writer.write_all(b"collected package\n").unwrap();
        assert_eq!(writer.buffer, b"collected package\n");
    }

    #[test]
    fn test_init_is_idempotent() {
        init_for_tests();
        init_for_tests();
        assert!(!init(Level::INFO));
    }
}
