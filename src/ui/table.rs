use std::io::Write;

use tabled::builder::Builder;
use tabled::settings::Style;

use crate::storage::QueryResult;
use crate::ui::dim;
use crate::{Error, Result};

/// Presents query results to the operator
pub trait ResultRenderer {
    fn render(&mut self, result: &QueryResult) -> Result<()>;
}

impl<T: ResultRenderer + ?Sized> ResultRenderer for &mut T {
    fn render(&mut self, result: &QueryResult) -> Result<()> {
        (**self).render(result)
    }
}

/// Renders results as a rounded table followed by a row count
pub struct TableRenderer<W: Write> {
    out: W,
}

impl<W: Write> TableRenderer<W> {
    pub fn new(out: W) -> Self {
        Self { out }
    }

    pub fn into_inner(self) -> W {
        self.out
    }
}

impl TableRenderer<std::io::Stdout> {
    pub fn stdout() -> Self {
        Self::new(std::io::stdout())
    }
}

pub fn build_table(result: &QueryResult) -> String {
    if result.columns.is_empty() {
        return String::new();
    }

    let mut builder = Builder::default();
    builder.push_record(result.columns.iter().cloned());
    for row in &result.rows {
        builder.push_record(row.iter().map(|v| v.to_string()));
    }

    builder.build().with(Style::rounded()).to_string()
}

fn row_count_line(count: usize) -> String {
    match count {
        1 => "(1 row)".to_string(),
        n => format!("({} rows)", n),
    }
}

impl<W: Write> ResultRenderer for TableRenderer<W> {
    fn render(&mut self, result: &QueryResult) -> Result<()> {
        let table = build_table(result);
        let write = |out: &mut W| -> std::io::Result<()> {
            if !table.is_empty() {
                writeln!(out, "{}", table)?;
            }
            writeln!(out, "{}", dim(&row_count_line(result.row_count())))?;
            out.flush()
        };
        write(&mut self.out).map_err(|e| Error::Render(e.to_string()))
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::Value;

    fn sample() -> QueryResult {
        QueryResult {
            columns: vec!["id".to_string(), "state".to_string(), "size".to_string()],
            rows: vec![
                vec!["c1".into(), "running".into(), Value::Integer(10)],
                vec!["c2".into(), Value::Null, Value::Integer(20)],
            ],
        }
    }

    #[test]
    fn test_table_contains_cells() {
        let table = build_table(&sample());
        assert!(table.contains("id"));
        assert!(table.contains("running"));
        assert!(table.contains("NULL"));
        assert!(table.contains("20"));
    }

    #[test]
    fn test_render_to_buffer() {
        let mut renderer = TableRenderer::new(Vec::new());
        renderer.render(&sample()).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("c2"));
        assert!(out.contains("(2 rows)"));
    }

    #[test]
    fn test_render_without_columns() {
        let mut renderer = TableRenderer::new(Vec::new());
        renderer.render(&QueryResult::default()).unwrap();
        let out = String::from_utf8(renderer.into_inner()).unwrap();
        assert!(out.contains("(0 rows)"));
    }

    struct BrokenPipe;

    impl Write for BrokenPipe {
        fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
            Err(std::io::Error::new(std::io::ErrorKind::BrokenPipe, "closed"))
        }

        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn test_write_failure_is_render_error() {
        let mut renderer = TableRenderer::new(BrokenPipe);
        assert!(matches!(renderer.render(&sample()), Err(Error::Render(_))));
    }
}
