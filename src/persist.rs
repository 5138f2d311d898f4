//! Storage-agnostic persistence seam. A host implements `Sink`/`Source`
//! against whatever table, file, or blob store it already has; this crate
//! only produces and consumes [`Record`] sequences.

use crate::record::Record;

pub trait Sink {
    type Error;

    fn write(&mut self, records: &[Record]) -> Result<(), Self::Error>;
}

pub trait Source {
    type Error;

    fn read_tree(&mut self, root_id: u64) -> Result<Vec<Record>, Self::Error>;
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::builder::{int, Binding, IntoOperand};
    use crate::record::flatten;
    use std::convert::Infallible;

    struct MemoryStore {
        rows: Vec<Record>,
    }

    impl Sink for MemoryStore {
        type Error = Infallible;

        fn write(&mut self, records: &[Record]) -> Result<(), Self::Error> {
            self.rows.extend_from_slice(records);
            Ok(())
        }
    }

    impl Source for MemoryStore {
        type Error = Infallible;

        fn read_tree(&mut self, root_id: u64) -> Result<Vec<Record>, Self::Error> {
            let roots: Vec<u64> = self
                .rows
                .iter()
                .filter(|r| r.parent_id.is_none() && r.id == root_id)
                .map(|r| r.id)
                .collect();
            let mut wanted = std::collections::HashSet::new();
            wanted.extend(roots);
            let mut grown = true;
            while grown {
                grown = false;
                for r in &self.rows {
                    if let Some(pid) = r.parent_id {
                        if wanted.contains(&pid) && wanted.insert(r.id) {
                            grown = true;
                        }
                    }
                }
            }
            Ok(self
                .rows
                .iter()
                .filter(|r| wanted.contains(&r.id))
                .cloned()
                .collect())
        }
    }

    #[test]
    fn sink_then_source_round_trips_records() {
        let a = int(Binding::named("a", 1).into_operand()).unwrap();
        let b = Binding::named("b", 2);
        let tree = a.plus(b).unwrap();
        let records = flatten(tree.node());
        let root_id = tree.node().id().raw();

        let mut store = MemoryStore { rows: Vec::new() };
        store.write(&records).unwrap();
        let fetched = store.read_tree(root_id).unwrap();
        assert_eq!(fetched.len(), records.len());
    }
}
