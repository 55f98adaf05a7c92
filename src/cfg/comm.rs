//======---------------------------------------------------------------======//
//                                                                           //
// Copyright 2022-2023 Evan Cox <evanacox00@gmail.com>. All rights reserved. //
//                                                                           //
// Use of this source code is governed by a BSD-style license that can be    //
// found in the LICENSE.txt file at the root of this project, or at the      //
// following link: https://opensource.org/licenses/BSD-3-Clause              //
//                                                                           //
//======---------------------------------------------------------------======//

use crate::arena::ArenaMap;
use crate::ast::{Stmt, Symbol};
use crate::dense_arena_key;
use crate::utility::SaHashMap;
use smallvec::SmallVec;

#[cfg(feature = "enable-serde")]
use serde::{Deserialize, Serialize};

dense_arena_key! {
    /// Identifies a registered communication unit. Code generation uses these
    /// to tag the messages that belong to each unit.
    pub struct CommId;
}

/// A single unit of inter-vertex communication.
#[derive(Copy, Clone, Debug, Hash, Eq, PartialEq)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub enum CommUnit {
    /// The messages sent by an inner neighbor loop.
    Nested {
        /// The inner `Foreach`.
        foreach: Stmt,
    },
    /// The messages sent by random-write assignments hosted by a sequencing
    /// block and targeting a specific vertex symbol.
    RandomWrite {
        /// The sequencing block hosting the send.
        sent_block: Stmt,
        /// The remote vertex being written to.
        symbol: Symbol,
    },
}

/// Every communication unit of a procedure, along with the assignments behind
/// each random-write unit.
///
/// Registering the same unit twice yields the same [`CommId`].
#[derive(Clone, Debug, Default)]
#[cfg_attr(feature = "enable-serde", derive(Serialize, Deserialize))]
pub struct CommRegistry {
    units: ArenaMap<CommId, CommUnit>,
    ids: SaHashMap<CommUnit, CommId>,
    random_write_targets: SaHashMap<Stmt, SmallVec<[Symbol; 2]>>,
    random_write_sents: SaHashMap<(Stmt, Symbol), Vec<Stmt>>,
}

impl CommRegistry {
    /// Creates an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Registers a unit (if it isn't already) and returns its id.
    pub fn register(&mut self, unit: CommUnit) -> CommId {
        if let Some(id) = self.ids.get(&unit) {
            return *id;
        }

        let id = self.units.insert(unit);

        self.ids.insert(unit, id);

        id
    }

    /// Registers the communication unit of an inner loop.
    pub fn add_communication_unit_nested(&mut self, foreach: Stmt) -> CommId {
        self.register(CommUnit::Nested { foreach })
    }

    /// Registers the communication unit for random writes to `symbol` hosted
    /// by `sent_block`.
    pub fn add_communication_unit_random_write(&mut self, sent_block: Stmt, symbol: Symbol) -> CommId {
        let id = self.register(CommUnit::RandomWrite { sent_block, symbol });
        let targets = self.random_write_targets.entry(sent_block).or_default();

        if !targets.contains(&symbol) {
            targets.push(symbol);
        }

        id
    }

    /// Records that `assign` is one of the random writes that `sent_block`
    /// sends to `symbol`. Recording the same assignment twice is a no-op.
    pub fn add_random_write_sent(&mut self, sent_block: Stmt, symbol: Symbol, assign: Stmt) {
        let sents = self.random_write_sents.entry((sent_block, symbol)).or_default();

        if !sents.contains(&assign) {
            sents.push(assign);
        }
    }

    /// Gets the id of a registered unit, or `None` if it was never registered.
    pub fn comm_id(&self, unit: CommUnit) -> Option<CommId> {
        self.ids.get(&unit).copied()
    }

    /// Resolves a [`CommId`].
    pub fn unit(&self, id: CommId) -> CommUnit {
        self.units[id]
    }

    /// Every registered unit, in registration order.
    pub fn units(&self) -> impl Iterator<Item = (CommId, CommUnit)> + '_ {
        self.units.iter().map(|(id, unit)| (id, *unit))
    }

    /// Gets the number of registered units.
    pub fn len(&self) -> usize {
        self.units.len()
    }

    /// Checks if nothing was registered.
    pub fn is_empty(&self) -> bool {
        self.units.is_empty()
    }

    /// The symbols that `sent_block` sends random writes to, in registration order.
    pub fn random_write_targets(&self, sent_block: Stmt) -> &[Symbol] {
        self.random_write_targets
            .get(&sent_block)
            .map(|targets| targets.as_slice())
            .unwrap_or(&[])
    }

    /// The random-write assignments that `sent_block` sends to `symbol`, in program order.
    pub fn random_write_sents(&self, sent_block: Stmt, symbol: Symbol) -> &[Stmt] {
        self.random_write_sents
            .get(&(sent_block, symbol))
            .map(|sents| sents.as_slice())
            .unwrap_or(&[])
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::arena::ArenaKey;

    #[test]
    fn registration_is_idempotent() {
        let mut registry = CommRegistry::new();
        let (fe1, fe2) = (Stmt::key_new(3), Stmt::key_new(7));

        let a = registry.add_communication_unit_nested(fe1);
        let b = registry.add_communication_unit_nested(fe2);
        let c = registry.add_communication_unit_nested(fe1);

        assert_eq!(a, c);
        assert_ne!(a, b);
        assert_eq!(registry.len(), 2);
        assert_eq!(registry.unit(b), CommUnit::Nested { foreach: fe2 });
        assert_eq!(
            registry.comm_id(CommUnit::Nested {
                foreach: Stmt::key_new(99)
            }),
            None
        );
    }

    #[test]
    fn random_write_bookkeeping() {
        let mut registry = CommRegistry::new();
        let sb = Stmt::key_new(1);
        let (a1, a2) = (Stmt::key_new(2), Stmt::key_new(3));
        let (u, v) = (Symbol::key_new(0), Symbol::key_new(1));

        let id_u = registry.add_communication_unit_random_write(sb, u);
        registry.add_random_write_sent(sb, u, a1);
        registry.add_random_write_sent(sb, u, a2);
        registry.add_random_write_sent(sb, u, a1);

        let id_v = registry.add_communication_unit_random_write(sb, v);
        registry.add_random_write_sent(sb, v, a2);

        assert_eq!(registry.add_communication_unit_random_write(sb, u), id_u);
        assert_ne!(id_u, id_v);
        assert_eq!(registry.random_write_targets(sb), [u, v]);
        assert_eq!(registry.random_write_sents(sb, u), [a1, a2]);
        assert_eq!(registry.random_write_sents(sb, v), [a2]);
        assert!(registry.random_write_targets(a1).is_empty());
        assert_eq!(
            registry.units().map(|(_, unit)| unit).collect::<Vec<_>>(),
            [
                CommUnit::RandomWrite {
                    sent_block: sb,
                    symbol: u
                },
                CommUnit::RandomWrite {
                    sent_block: sb,
                    symbol: v
                }
            ]
        );
    }
}
