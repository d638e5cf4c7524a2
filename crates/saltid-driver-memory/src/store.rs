use indexmap::IndexMap;
use saltid_core::stmt::Record;

#[derive(Debug, Default)]
pub(crate) struct Store {
    tables: IndexMap<String, Table>,
}

#[derive(Debug, Default)]
struct Table {
    rows: Vec<Record>,

    /// Last value handed out for auto-increment fields
    last_id: i64,
}

impl Store {
    pub(crate) fn rows(&self, model: &str) -> &[Record] {
        self.tables
            .get(model)
            .map_or(&[], |table| table.rows.as_slice())
    }

    pub(crate) fn rows_mut(&mut self, model: &str) -> &mut Vec<Record> {
        &mut self.table(model).rows
    }

    pub(crate) fn next_id(&mut self, model: &str) -> i64 {
        let table = self.table(model);
        table.last_id += 1;
        table.last_id
    }

    /// Keep the sequence ahead of an explicitly assigned id.
    pub(crate) fn observe_id(&mut self, model: &str, id: i64) {
        let table = self.table(model);
        table.last_id = table.last_id.max(id);
    }

    fn table(&mut self, model: &str) -> &mut Table {
        self.tables.entry(model.to_string()).or_default()
    }
}
