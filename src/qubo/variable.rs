//! Dense variable arena.
//!
//! Every (request, host, slot) triple gets a dense integer identity, laid
//! out request-major, then host, then slot:
//!
//! ```text
//! id = (request * host_count + host) * SLOT_COUNT + slot
//! ```
//!
//! This matches input order, so iterating ids in ascending order visits
//! requests, hosts and slots exactly as they were given. Weights are stored
//! against ids; the string form only exists at the JSON boundary.

use std::ops::Range;

use serde::{Deserialize, Serialize};

use crate::models::{Slot, SLOT_COUNT};

/// Dense identity of a binary variable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(transparent)]
pub struct VariableId(pub usize);

impl VariableId {
    /// Position in weight and assignment vectors.
    #[inline]
    pub fn index(self) -> usize {
        self.0
    }
}

/// Structural meaning of a variable: "request is met by host in slot".
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Variable {
    /// Request position in input order.
    pub request: usize,
    /// Host position in input order.
    pub host: usize,
    /// Calendar slot.
    pub slot: Slot,
}

/// Bijection between [`Variable`]s and [`VariableId`]s for one problem.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VariableArena {
    request_count: usize,
    host_count: usize,
}

impl VariableArena {
    /// Creates the arena for `request_count × host_count × SLOT_COUNT` variables.
    pub fn new(request_count: usize, host_count: usize) -> Self {
        Self {
            request_count,
            host_count,
        }
    }

    /// Number of requests.
    pub fn request_count(&self) -> usize {
        self.request_count
    }

    /// Number of hosts.
    pub fn host_count(&self) -> usize {
        self.host_count
    }

    /// Total number of variables.
    pub fn len(&self) -> usize {
        self.request_count * self.host_count * SLOT_COUNT
    }

    /// Whether the arena holds no variable.
    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }

    /// Id of a variable. The caller guarantees the positions are in range.
    #[inline]
    pub fn id_of(&self, variable: Variable) -> VariableId {
        VariableId(
            (variable.request * self.host_count + variable.host) * SLOT_COUNT
                + variable.slot.index(),
        )
    }

    /// Variable for an id, or `None` if the id is outside the arena.
    pub fn variable(&self, id: VariableId) -> Option<Variable> {
        if id.index() >= self.len() {
            return None;
        }
        let slot = Slot::new(id.index() % SLOT_COUNT)?;
        let pair = id.index() / SLOT_COUNT;
        Some(Variable {
            request: pair / self.host_count,
            host: pair % self.host_count,
            slot,
        })
    }

    /// All variables in ascending id order.
    pub fn iter(&self) -> impl Iterator<Item = (VariableId, Variable)> + '_ {
        (0..self.len()).filter_map(move |i| {
            let id = VariableId(i);
            self.variable(id).map(|v| (id, v))
        })
    }

    /// Contiguous id range holding every variable of one request.
    pub fn request_block(&self, request: usize) -> Range<usize> {
        let width = self.host_count * SLOT_COUNT;
        request * width..(request + 1) * width
    }

    /// Ids sharing one (host, slot), in request order.
    pub fn host_slot_family(&self, host: usize, slot: Slot) -> impl Iterator<Item = VariableId> + '_ {
        (0..self.request_count).map(move |request| {
            self.id_of(Variable {
                request,
                host,
                slot,
            })
        })
    }
}

/// String key used for a variable at the JSON boundary: `{request}_{host}_{slot}`.
pub fn variable_key(request_id: &str, host_id: &str, slot: Slot) -> String {
    format!("{request_id}_{host_id}_{}", slot.index())
}
