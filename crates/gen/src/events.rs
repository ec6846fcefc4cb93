use devfile_schema::{Events, SchemaWriter};

use crate::store::TestDevfile;

/// Most command ids bound to a single event list.
const MAX_BINDINGS: usize = 4;

impl<W: SchemaWriter> TestDevfile<W> {
    /// Each list is present half the time with distinct existing command ids.
    pub(crate) fn roll_events(&self, events: &mut Events) {
        let ids: Vec<&str> = self.schema.commands.iter().map(|c| c.id.as_str()).collect();
        for (_, list) in events.lists_mut() {
            list.clear();
            if ids.is_empty() || !self.ctx.binary() {
                continue;
            }
            let amount = self.ctx.bounded(ids.len().min(MAX_BINDINGS));
            list.extend(self.ctx.sample(&ids, amount).into_iter().map(|id| id.to_string()));
        }
    }
}
