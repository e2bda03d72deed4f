// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Per-kind issue/return bookkeeping with an append-only movement history.

use serde::Serialize;
use tracing::debug;

use crate::error::LedgerError;
use crate::ident::{next_after, KindId, MovementId};

/// An item kind that can be issued.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ItemKind {
    /// Kind id.
    pub id: KindId,
    /// Display name.
    pub name: String,
}

/// Units of one kind currently held.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct HeldRow {
    /// Kind held.
    pub kind: KindId,
    /// Kind name at time of issue.
    pub kind_name: String,
    /// Units held (always > 0).
    pub quantity: u32,
}

/// Direction of a movement.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum MovementOp {
    /// Units handed out.
    Issued,
    /// Units handed back.
    Returned,
}

/// History entry.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct Movement {
    /// Entry id (max + 1).
    pub id: MovementId,
    /// Date label.
    pub date: String,
    /// Direction.
    pub op: MovementOp,
    /// Kind moved.
    pub kind: KindId,
    /// Kind name.
    pub kind_name: String,
    /// Units moved.
    pub quantity: u32,
}

/// Held-units table plus movement history (most recent first).
#[derive(Debug, Clone)]
pub struct MovementLog {
    kinds: Vec<ItemKind>,
    held: Vec<HeldRow>,
    history: Vec<Movement>,
}

impl MovementLog {
    /// Empty log over the given kinds.
    pub fn new(kinds: Vec<ItemKind>) -> Self {
        Self {
            kinds,
            held: Vec::new(),
            history: Vec::new(),
        }
    }

    /// Log over the default issue-form kinds.
    pub fn seeded() -> Self {
        Self::new(crate::seed::item_kinds())
    }

    /// Known kinds.
    pub fn kinds(&self) -> &[ItemKind] {
        &self.kinds
    }

    /// Currently held rows.
    pub fn held(&self) -> &[HeldRow] {
        &self.held
    }

    /// Movement history, most recent first.
    pub fn history(&self) -> &[Movement] {
        &self.history
    }

    /// Issue `quantity` units of `kind`. A zero quantity is ignored (`Ok(None)`).
    pub fn issue(
        &mut self,
        kind: KindId,
        quantity: u32,
        date: impl Into<String>,
    ) -> Result<Option<MovementId>, LedgerError> {
        self.record(MovementOp::Issued, kind, quantity, date.into())
    }

    /// Take back `quantity` units of `kind`. The held count stops at zero and
    /// an emptied row disappears; the movement is recorded either way.
    pub fn return_items(
        &mut self,
        kind: KindId,
        quantity: u32,
        date: impl Into<String>,
    ) -> Result<Option<MovementId>, LedgerError> {
        self.record(MovementOp::Returned, kind, quantity, date.into())
    }

    fn record(
        &mut self,
        op: MovementOp,
        kind: KindId,
        quantity: u32,
        date: String,
    ) -> Result<Option<MovementId>, LedgerError> {
        let kind_name = self
            .kinds
            .iter()
            .find(|k| k.id == kind)
            .map(|k| k.name.clone())
            .ok_or(LedgerError::UnknownKind(kind))?;
        if quantity == 0 {
            return Ok(None);
        }

        match op {
            MovementOp::Issued => self.add_held(kind, &kind_name, quantity),
            MovementOp::Returned => self.remove_held(kind, quantity),
        }

        let id = next_after(self.history.iter().map(|m| m.id.value()), MovementId);
        debug!(id = %id, ?op, kind = %kind, quantity, "movement recorded");
        self.history.insert(
            0,
            Movement {
                id,
                date,
                op,
                kind,
                kind_name,
                quantity,
            },
        );
        Ok(Some(id))
    }

    fn add_held(&mut self, kind: KindId, name: &str, quantity: u32) {
        match self.held.iter_mut().find(|r| r.kind == kind) {
            Some(row) => row.quantity = row.quantity.saturating_add(quantity),
            None => self.held.push(HeldRow {
                kind,
                kind_name: name.to_owned(),
                quantity,
            }),
        }
    }

    fn remove_held(&mut self, kind: KindId, quantity: u32) {
        if let Some(pos) = self.held.iter().position(|r| r.kind == kind) {
            let left = self.held[pos].quantity.saturating_sub(quantity);
            if left == 0 {
                self.held.remove(pos);
            } else {
                self.held[pos].quantity = left;
            }
        }
    }
}
