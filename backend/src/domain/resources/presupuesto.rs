//! Budget lines. Identifiers are assigned by the client, not the database.

use serde::{Deserialize, Serialize};
use utoipa::ToSchema;

use super::{Changeset, Resource};
use crate::domain::validation::common::SEARCH;
use crate::domain::validation::{
    Change, Field, FromInput, IntField, Issues, RawInput, SearchTerm, TextField,
    ValidationFailure,
};

const ID: IntField<i32> = IntField::id("id");
const DESCRIPCION: TextField = TextField::new("descripcion", 100);
const ORDEN: IntField<i16> = IntField::count("orden");

/// Stored budget line.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize, ToSchema)]
#[serde(rename_all = "camelCase")]
pub struct Presupuesto {
    /// Client-assigned identifier.
    pub id: i32,
    /// Description.
    pub descripcion: String,
    /// Display order.
    pub orden: Option<i16>,
}

/// Create payload.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct CreatePresupuesto {
    /// Identifier to store.
    pub id: i32,
    /// Description.
    pub descripcion: String,
    /// Display order.
    pub orden: Option<i16>,
}

impl FromInput for CreatePresupuesto {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let id = issues.take(ID.required(input));
        let descripcion = issues.take(DESCRIPCION.required(input));
        let orden = issues.take(ORDEN.optional(input));
        issues.finish(|| {
            Some(Self {
                id: id?,
                descripcion: descripcion?,
                orden: orden?,
            })
        })
    }
}

/// Update payload. The identifier itself cannot change.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct UpdatePresupuesto {
    /// New description.
    pub descripcion: Option<String>,
    /// Display order change.
    pub orden: Change<i16>,
}

impl FromInput for UpdatePresupuesto {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        let mut issues = Issues::default();
        let descripcion = issues.take(DESCRIPCION.patch(input));
        let orden = issues.take(ORDEN.change(input));
        issues.finish(|| {
            Some(Self {
                descripcion: descripcion?,
                orden: orden?,
            })
        })
    }
}

impl Changeset for UpdatePresupuesto {
    fn is_empty(&self) -> bool {
        self.descripcion.is_none() && self.orden.is_keep()
    }
}

/// Filter shared by listing and pickers.
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct PresupuestoFilter {
    /// Search on `descripcion`.
    pub q: Option<SearchTerm>,
}

impl FromInput for PresupuestoFilter {
    fn from_input(input: &RawInput) -> Result<Self, ValidationFailure> {
        SEARCH
            .optional(input)
            .map(|q| Self { q })
            .map_err(|issue| ValidationFailure::new(vec![issue]))
    }
}

/// Marker tying the budget schemas together.
#[derive(Debug, Clone, Copy, Default)]
pub struct Presupuestos;

impl Resource for Presupuestos {
    const NAME: &'static str = "Presupuesto";

    type Record = Presupuesto;
    type Create = CreatePresupuesto;
    type Update = UpdatePresupuesto;
    type ListFilter = PresupuestoFilter;
    type SelectFilter = PresupuestoFilter;
}
