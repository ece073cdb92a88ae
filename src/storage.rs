// Copyright (c) 2025 Soumyadip Sarkar.
// All rights reserved.
//
// This source code is licensed under the license found in the
// LICENSE file in the root directory of this source tree.

//! Durable key-value slots backing the store.

use rusqlite::{Connection, OptionalExtension, params};
use std::collections::HashMap;
use std::fmt;

use crate::error::StoreResult;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Slot {
    Transactions,
    Categories,
    Budgets,
    SavingsTransactions,
    Debtors,
}

impl Slot {
    pub const ALL: [Slot; 5] = [
        Slot::Transactions,
        Slot::Categories,
        Slot::Budgets,
        Slot::SavingsTransactions,
        Slot::Debtors,
    ];

    pub fn key(&self) -> &'static str {
        match self {
            Slot::Transactions => "tallybook.transactions",
            Slot::Categories => "tallybook.categories",
            Slot::Budgets => "tallybook.budgets",
            Slot::SavingsTransactions => "tallybook.savings_transactions",
            Slot::Debtors => "tallybook.debtors",
        }
    }
}

impl fmt::Display for Slot {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.key())
    }
}

pub trait SlotStorage {
    fn read(&self, slot: Slot) -> StoreResult<Option<String>>;

    fn write(&mut self, slot: Slot, payload: &str) -> StoreResult<()>;

    fn remove(&mut self, slot: Slot) -> StoreResult<()>;
}

/// Slots kept in a single SQLite table.
pub struct SqliteSlots {
    conn: Connection,
}

impl SqliteSlots {
    /// Wraps a connection whose schema was prepared by [`crate::db::init_schema`].
    pub fn new(conn: Connection) -> Self {
        SqliteSlots { conn }
    }

    pub fn connection(&self) -> &Connection {
        &self.conn
    }
}

impl SlotStorage for SqliteSlots {
    fn read(&self, slot: Slot) -> StoreResult<Option<String>> {
        let v: Option<String> = self
            .conn
            .query_row(
                "SELECT value FROM slots WHERE key=?1",
                params![slot.key()],
                |r| r.get(0),
            )
            .optional()?;
        Ok(v)
    }

    fn write(&mut self, slot: Slot, payload: &str) -> StoreResult<()> {
        self.conn.execute(
            "INSERT INTO slots(key, value) VALUES (?1, ?2)
             ON CONFLICT(key) DO UPDATE SET value=excluded.value, updated_at=datetime('now')",
            params![slot.key(), payload],
        )?;
        Ok(())
    }

    fn remove(&mut self, slot: Slot) -> StoreResult<()> {
        self.conn
            .execute("DELETE FROM slots WHERE key=?1", params![slot.key()])?;
        Ok(())
    }
}

#[derive(Debug, Default, Clone)]
pub struct MemorySlots {
    values: HashMap<Slot, String>,
}

impl MemorySlots {
    pub fn new() -> Self {
        Self::default()
    }

    /// Pre-populates a slot, e.g. with a payload written by an older build.
    pub fn with(mut self, slot: Slot, payload: impl Into<String>) -> Self {
        self.values.insert(slot, payload.into());
        self
    }

    pub fn get(&self, slot: Slot) -> Option<&str> {
        self.values.get(&slot).map(String::as_str)
    }
}

impl SlotStorage for MemorySlots {
    fn read(&self, slot: Slot) -> StoreResult<Option<String>> {
        Ok(self.values.get(&slot).cloned())
    }

    fn write(&mut self, slot: Slot, payload: &str) -> StoreResult<()> {
        self.values.insert(slot, payload.to_string());
        Ok(())
    }

    fn remove(&mut self, slot: Slot) -> StoreResult<()> {
        self.values.remove(&slot);
        Ok(())
    }
}
