use std::collections::HashMap;

use anyhow::Result;

/// Cell-level access to a single worksheet. An empty string means the cell
/// has never been written.
#[allow(async_fn_in_trait)]
pub trait Grid {
    async fn read(&self, row: u32, col: u32) -> Result<String>;
    async fn write(&mut self, row: u32, col: u32, value: &str) -> Result<()>;
}

/// In-memory grid backing the `preview` subcommand and the writer tests.
#[derive(Debug, Clone, Default)]
pub struct MemoryGrid {
    cells: HashMap<(u32, u32), String>,
}

impl MemoryGrid {
    pub fn new() -> Self {
        Self::default()
    }

    /// Seed a cell, e.g. to simulate data from a previous run.
    pub fn seed(&mut self, row: u32, col: u32, value: &str) {
        self.cells.insert((row, col), value.to_string());
    }

    pub fn get(&self, row: u32, col: u32) -> &str {
        self.cells.get(&(row, col)).map(String::as_str).unwrap_or("")
    }

    /// Render the written region as pipe-separated rows.
    pub fn render(&self) -> String {
        let Some(&(r0, _)) = self.cells.keys().min_by_key(|(r, _)| r) else {
            return String::new();
        };
        let r1 = self.cells.keys().map(|(r, _)| *r).max().unwrap_or(r0);
        let c0 = self.cells.keys().map(|(_, c)| *c).min().unwrap_or(1);
        let c1 = self.cells.keys().map(|(_, c)| *c).max().unwrap_or(c0);

        let mut out = String::new();
        for row in r0..=r1 {
            let line: Vec<&str> = (c0..=c1).map(|col| self.get(row, col)).collect();
            out.push_str(line.join(" | ").trim_end());
            out.push('\n');
        }
        out
    }
}

impl Grid for MemoryGrid {
    async fn read(&self, row: u32, col: u32) -> Result<String> {
        Ok(self.get(row, col).to_string())
    }

    async fn write(&mut self, row: u32, col: u32, value: &str) -> Result<()> {
        self.cells.insert((row, col), value.to_string());
        Ok(())
    }
}
