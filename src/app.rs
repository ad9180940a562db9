//! Startup and session orchestration
//!
//! Connect, open the store, load the snapshot, then hand over to the shell.
//! Once the store is open it is closed exactly once, here, whether the
//! session ended cleanly or failed.

use crate::daemon::DaemonClient;
use crate::shell::{LineReader, SessionOutcome, Shell};
use crate::snapshot::load_snapshot;
use crate::storage::RelationalStore;
use crate::ui::{self, ResultRenderer, Spinner};
use crate::Result;

/// Run one dockersql session.
///
/// `Err` means the process should exit non-zero: a startup failure (no
/// prompt was ever shown) or a rendering failure mid-session.
pub fn run<D, S, R, W>(
    connect: impl FnOnce() -> Result<D>,
    open_store: impl FnOnce() -> Result<S>,
    reader: R,
    renderer: W,
) -> Result<SessionOutcome>
where
    D: DaemonClient,
    S: RelationalStore,
    R: LineReader,
    W: ResultRenderer,
{
    let client = connect()?;
    let store = open_store()?;

    let outcome = session(client, &store, reader, renderer);

    if let Err(e) = store.close() {
        tracing::error!("Failed to close database: {}", e);
    }
    outcome
}

fn session<D, R, W>(
    client: D,
    store: &dyn RelationalStore,
    reader: R,
    renderer: W,
) -> Result<SessionOutcome>
where
    D: DaemonClient,
    R: LineReader,
    W: ResultRenderer,
{
    let spinner = Spinner::new("Loading containers and images...");
    let loaded = load_snapshot(&client, store);
    spinner.finish_and_clear();
    let stats = loaded?;
    // The daemon is not consulted again for the rest of the session
    drop(client);

    ui::success(&format!("Loaded {}", stats));

    let mut shell = Shell::new(reader, store, renderer);
    shell.run()
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::daemon::fixture::FixtureDaemon;
    use crate::shell::fixture::{RecordingRenderer, ScriptedReader};
    use crate::shell::ReadError;
    use crate::storage::{QueryResult, SqliteStore, TableSchema, Value};
    use crate::Error;
    use std::cell::Cell;
    use std::rc::Rc;

    /// Records how often the store is closed
    struct TrackedStore {
        inner: SqliteStore,
        closes: Rc<Cell<usize>>,
    }

    impl RelationalStore for TrackedStore {
        fn create_table(&self, table: &TableSchema) -> Result<()> {
            self.inner.create_table(table)
        }

        fn insert(&self, table: &TableSchema, values: &[Value]) -> Result<()> {
            self.inner.insert(table, values)
        }

        fn query(&self, sql: &str) -> Result<QueryResult> {
            self.inner.query(sql)
        }

        fn begin(&self) -> Result<()> {
            self.inner.begin()
        }

        fn commit(&self) -> Result<()> {
            self.inner.commit()
        }

        fn close(self) -> Result<()> {
            self.closes.set(self.closes.get() + 1);
            self.inner.close()
        }
    }

    fn tracked(closes: Rc<Cell<usize>>) -> impl FnOnce() -> Result<TrackedStore> {
        move || {
            Ok(TrackedStore {
                inner: SqliteStore::open_in_memory()?,
                closes,
            })
        }
    }

    #[test]
    fn test_daemon_failure_never_prompts() {
        let closes = Rc::new(Cell::new(0));
        let daemon = FixtureDaemon {
            fail_containers: true,
            ..FixtureDaemon::sample()
        };
        let mut reader = ScriptedReader::new(&["SELECT 1"]);
        let mut renderer = RecordingRenderer::default();

        let result = run(|| Ok(daemon), tracked(Rc::clone(&closes)), &mut reader, &mut renderer);

        assert!(matches!(result, Err(Error::Daemon(_))));
        assert_eq!(reader.prompts, 0);
        assert!(renderer.results.is_empty());
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_connect_failure_never_opens_store() {
        let closes = Rc::new(Cell::new(0));
        let opened = Cell::new(false);
        let mut reader = ScriptedReader::new(&[]);

        let result = run(
            || -> Result<FixtureDaemon> { Err(Error::Config("no daemon".to_string())) },
            || {
                opened.set(true);
                tracked(Rc::clone(&closes))()
            },
            &mut reader,
            RecordingRenderer::default(),
        );

        assert!(matches!(result, Err(Error::Config(_))));
        assert!(!opened.get());
        assert_eq!(reader.prompts, 0);
        assert_eq!(closes.get(), 0);
    }

    #[test]
    fn test_eof_on_first_prompt() {
        let closes = Rc::new(Cell::new(0));
        let mut reader = ScriptedReader::new(&[]).then(ReadError::Eof);

        let result = run(
            || Ok(FixtureDaemon::sample()),
            tracked(Rc::clone(&closes)),
            &mut reader,
            RecordingRenderer::default(),
        );

        assert_eq!(result.unwrap(), SessionOutcome::Interrupted);
        assert_eq!(reader.prompts, 1);
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_queries_run_against_snapshot() {
        let closes = Rc::new(Cell::new(0));
        let mut reader = ScriptedReader::new(&[
            "SELEC broken",
            "SELECT state FROM containers WHERE id='c1'",
        ]);
        let mut renderer = RecordingRenderer::default();

        let result = run(
            || Ok(FixtureDaemon::sample()),
            tracked(Rc::clone(&closes)),
            &mut reader,
            &mut renderer,
        );

        assert_eq!(result.unwrap(), SessionOutcome::Interrupted);
        assert_eq!(renderer.results.len(), 1);
        assert_eq!(
            renderer.results[0].scalar(),
            Some(&Value::Text("running".to_string()))
        );
        assert_eq!(closes.get(), 1);
    }

    #[test]
    fn test_render_failure_closes_store_once() {
        let closes = Rc::new(Cell::new(0));
        let mut reader = ScriptedReader::new(&["SELECT count(*) FROM images"]);
        let renderer = RecordingRenderer {
            fail: true,
            ..Default::default()
        };

        let result = run(|| Ok(FixtureDaemon::sample()), tracked(Rc::clone(&closes)), &mut reader, renderer);

        assert!(matches!(result, Err(Error::Render(_))));
        assert_eq!(closes.get(), 1);
    }
}
